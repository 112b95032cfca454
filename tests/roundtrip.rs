use bytepair::{
    DecodeError, MergeRule, TokenPair, Tokenizer, TrainError, Vocabulary, decode, encode,
    merge_pair, train, unmerge_pair,
};
use proptest::prelude::*;

const CORPUS_LINES: [&str; 8] = [
    "Hello, world!",
    "hello hello helper help",
    " leading space",
    "trailing space ",
    "naïve café",
    "emoji 😊 works",
    "日本語テキスト mixed",
    "über Straße",
];

fn rule(id: usize, left: usize, right: usize) -> MergeRule {
    MergeRule {
        id,
        pair: TokenPair(left, right),
    }
}

#[test]
fn worked_example() {
    let text = "aaabdaaabac";
    let vocab = train(text, 259).expect("three merges fit");

    assert_eq!(
        vocab.rules(),
        &[rule(256, 97, 97), rule(257, 256, 97), rule(258, 257, 98)]
    );

    let ids = encode(text, &vocab);
    assert_eq!(ids, vec![258, 100, 258, 97, 99]);
    assert_eq!(decode(&ids, &vocab).expect("round trip"), text);
}

#[test]
fn empty_input() {
    let vocab = train("", 256).expect("no merges requested");
    assert!(vocab.is_empty());

    let empty = Vocabulary::default();
    assert!(encode("", &empty).is_empty());
    assert_eq!(decode(&[], &empty).expect("nothing to decode"), "");
}

#[test]
fn exhausted_training_returns_no_vocabulary() {
    let result = train("ab", 260);
    assert!(matches!(
        result,
        Err(TrainError::TrainingExhausted {
            vocab_size: 260,
            learned: 1
        })
    ));
}

#[test]
fn unmerge_order_is_load_bearing() {
    // 257 is built on top of 256.
    let vocab = Vocabulary::from_rules([rule(256, 97, 97), rule(257, 256, 97)])
        .expect("valid rules");
    let ids = vec![257];

    let mut descending = ids.clone();
    for r in vocab.iter().rev() {
        descending = unmerge_pair(&descending, r.pair, r.id);
    }

    let mut ascending = ids;
    for r in vocab.iter() {
        ascending = unmerge_pair(&ascending, r.pair, r.id);
    }

    assert_eq!(descending, vec![97, 97, 97]);
    assert_eq!(ascending, vec![256, 97]);
    assert_ne!(ascending, descending);
}

#[test]
fn greedy_non_overlap() {
    assert_eq!(merge_pair(&[5, 5, 5], TokenPair(5, 5), 9), vec![9, 5]);
}

#[test]
fn corpus_roundtrip() {
    let corpus = CORPUS_LINES.join("\n");
    let tok = Tokenizer::train(&corpus, 320).expect("corpus long enough");
    assert_eq!(tok.vocabulary().len(), 64);

    for line in CORPUS_LINES {
        let ids = tok.encode(line);
        assert_eq!(tok.decode(&ids).expect("round trip"), line);
    }

    // Text never seen during training still round-trips.
    let unseen = "Zebras ✓ quietly graze";
    assert_eq!(tok.decode(&tok.encode(unseen)).expect("round trip"), unseen);
}

#[test]
fn foreign_ids_rejected() {
    let tok = Tokenizer::train("abababab", 258).expect("two merges fit");
    let result = tok.decode(&[97, 258]);
    assert!(matches!(result, Err(DecodeError::UnknownToken(258))));
}

#[test]
fn split_multibyte_char_fails_utf8() {
    // 'é' = [0xC3, 0xA9]; decoding only the lead byte is invalid UTF-8.
    let tok = Tokenizer::train("é", 256).expect("no merges requested");
    let ids = tok.encode("é");
    assert_eq!(ids, vec![0xC3, 0xA9]);
    assert!(matches!(
        tok.decode(&ids[..1]),
        Err(DecodeError::InvalidUtf8(_))
    ));
}

#[test]
fn tokenizer_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Tokenizer>();
    assert_send_sync::<Vocabulary>();
}

proptest! {
    #[test]
    fn prop_roundtrip(text in ".{0,48}", vocab_size in 200_usize..300) {
        match train(&text, vocab_size) {
            Ok(vocab) => {
                prop_assert_eq!(vocab.len(), vocab_size.saturating_sub(256));
                let ids = encode(&text, &vocab);
                prop_assert!(ids.len() <= text.len());
                prop_assert_eq!(decode(&ids, &vocab).expect("round trip"), text);
            }
            Err(TrainError::TrainingExhausted { learned, .. }) => {
                prop_assert!(learned < vocab_size - 256);
            }
            Err(e) => prop_assert!(false, "unexpected error: {}", e),
        }
    }

    #[test]
    fn prop_roundtrip_unseen_text(train_text in "[a-e ]{8,64}", text in ".{0,32}") {
        if let Ok(vocab) = train(&train_text, 262) {
            let ids = encode(&text, &vocab);
            prop_assert_eq!(decode(&ids, &vocab).expect("round trip"), text);
        }
    }

    #[test]
    fn prop_training_is_deterministic(text in "[a-c]{2,40}") {
        let first = train(&text, 257).expect("one merge always fits");
        let second = train(&text, 257).expect("one merge always fits");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_unmerge_inverts_merge(
        seq in prop::collection::vec(0_usize..256, 0..64),
        left in 0_usize..256,
        right in 0_usize..256,
    ) {
        let pair = TokenPair(left, right);
        let merged = merge_pair(&seq, pair, 256);
        prop_assert_eq!(unmerge_pair(&merged, pair, 256), seq);
    }
}
