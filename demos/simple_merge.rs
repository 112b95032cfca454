use bytepair::{BpeTrainer, Tokenizer};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let text = "aaabdaaabac";

    let mut trainer = BpeTrainer::from_bytes(text.as_bytes());
    println!("Initial tokens: {:?}", trainer.encodings());

    while trainer.merge_history().len() < 3 {
        let Some(rule) = trainer.merge_step() else {
            break;
        };
        println!(
            "({}, {}) -> {}: {:?}",
            rule.pair.0,
            rule.pair.1,
            rule.id,
            trainer.encodings()
        );
    }

    let tokenizer = Tokenizer::from_vocabulary(trainer.into_vocabulary()?);
    let ids = tokenizer.encode(text);
    println!("\nEncoded: {ids:?}");
    println!("Decoded: {}", tokenizer.decode(&ids)?);

    Ok(())
}
