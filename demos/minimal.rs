use fsm_tracegen::{language, GenerationRequest, GeneratorOptions, TraceGenerator};

fn main() {
    // Prints INFO events to STDOUT.
    tracing_subscriber::fmt::init();

    // The small binary DFA from the registry.
    let small = language::small().unwrap();

    // Anchored matching and a ceiling of one million attempts per collection.
    let generator = TraceGenerator::new(&small, &GeneratorOptions::default()).unwrap();

    // Three passing traces and three failing traces of at most five symbols.
    let traces = generator
        .generate(&GenerationRequest::new(3, 3, 5), &mut rand::thread_rng())
        .unwrap();

    println!("passed: {:?}", traces.passed);
    println!("failed: {:?}", traces.failed);
}
