use bytepair::{TokenPair, Tokenizer, TrainConfig, Vocabulary, train};
use serde_json::json;

#[test]
fn vocabulary_serializes_as_ordered_rules() {
    let vocab = train("aaabdaaabac", 259).expect("three merges fit");
    let value = serde_json::to_value(&vocab).expect("serializable");
    assert_eq!(
        value,
        json!([
            { "id": 256, "pair": [97, 97] },
            { "id": 257, "pair": [256, 97] },
            { "id": 258, "pair": [257, 98] },
        ])
    );
}

#[test]
fn reloaded_vocabulary_decodes_identically() {
    let text = "the cat sat on the mat with the hat";
    let tok = Tokenizer::train(text, 270).expect("text long enough");
    let ids = tok.encode(text);

    let json = serde_json::to_string(tok.vocabulary()).expect("serializable");
    let restored: Vocabulary = serde_json::from_str(&json).expect("valid vocabulary");
    assert_eq!(&restored, tok.vocabulary());

    let reloaded = Tokenizer::from_vocabulary(restored);
    assert_eq!(reloaded.encode(text), ids);
    assert_eq!(reloaded.decode(&ids).expect("round trip"), text);
}

#[test]
fn gap_in_ids_rejected() {
    let json = r#"[{"id":256,"pair":[97,98]},{"id":258,"pair":[256,99]}]"#;
    let err = serde_json::from_str::<Vocabulary>(json).expect_err("gap must be rejected");
    assert!(err.to_string().contains("contiguous"), "{err}");
}

#[test]
fn forward_reference_rejected() {
    let json = r#"[{"id":256,"pair":[257,98]},{"id":257,"pair":[97,99]}]"#;
    let err = serde_json::from_str::<Vocabulary>(json).expect_err("forward ref must be rejected");
    assert!(err.to_string().contains("undefined token 257"), "{err}");
}

#[test]
fn empty_vocabulary_round_trips() {
    let json = serde_json::to_string(&Vocabulary::default()).expect("serializable");
    assert_eq!(json, "[]");
    let restored: Vocabulary = serde_json::from_str(&json).expect("valid vocabulary");
    assert!(restored.is_empty());
}

#[test]
fn train_config_defaults_fill_in() {
    let cfg: TrainConfig = serde_json::from_str(r#"{"vocab_size": 512}"#).expect("valid config");
    assert_eq!(cfg, TrainConfig::new(512));

    let cfg: TrainConfig = serde_json::from_str(
        r#"{"vocab_size": 300, "show_progress": true, "parallel_threshold": 8}"#,
    )
    .expect("valid config");
    assert!(cfg.show_progress);
    assert_eq!(cfg.parallel_threshold, 8);
}

#[test]
fn pair_tuple_conversion() {
    let pair: TokenPair = (3, 4).into();
    assert_eq!(pair, TokenPair(3, 4));
    let (l, r): (usize, usize) = pair.into();
    assert_eq!((l, r), (3, 4));
}
