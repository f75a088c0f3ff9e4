use fsm_tracegen::{GenerationRequest, GeneratorOptions, LanguageBuilder, MatchMode, Registry};
use fsm_tracegen::{ResultWriter, TraceGenerator};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

fn main() {
    tracing_subscriber::fmt::init();

    // A turnstile: a coin unlocks, a push locks again. Symbols may be longer than one character.
    let turnstile = LanguageBuilder::new("turnstile", "(coin(coin)*push)*")
        .with_title("Turnstile")
        .with_alphabet(["coin", "push"])
        .with_star_limit(3)
        .build()
        .unwrap();

    let mut registry = Registry::builtin().unwrap();
    registry.register(turnstile).unwrap();

    for language in registry.iter() {
        info!("available: {} ({})", language.name(), language.title());
    }

    let turnstile = registry.get("turnstile").unwrap();
    let options = GeneratorOptions::default()
        .match_mode(MatchMode::Anchored)
        .max_attempts(100_000);
    let generator = TraceGenerator::new(turnstile, &options).unwrap();

    let traces = generator
        .generate(
            &GenerationRequest::new(5, 5, 6),
            &mut StdRng::seed_from_u64(2024),
        )
        .unwrap();

    let path = ResultWriter::new(std::env::temp_dir())
        .write(&traces, turnstile.file_prefix())
        .unwrap();
    info!("traces written to {}", path.display());
}
