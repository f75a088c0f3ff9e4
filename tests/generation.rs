use arbtest::arbtest;
use fsm_tracegen::error::GenerateError;
use fsm_tracegen::generator::{GenerationRequest, TraceGenerator};
use fsm_tracegen::language::{self, Language};
use fsm_tracegen::oracle::MatchMode;
use fsm_tracegen::options::GeneratorOptions;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn languages() -> Vec<Language> {
    vec![
        language::small().unwrap(),
        language::car_alarm().unwrap(),
        language::bridge().unwrap(),
    ]
}

#[test]
fn generated_traces_are_classified_and_distinct() {
    let languages = languages();

    arbtest(|u| {
        let language = u.choose(&languages)?;
        let mode = if u.arbitrary()? {
            MatchMode::Anchored
        } else {
            MatchMode::Prefix
        };
        let request = GenerationRequest::new(
            u.int_in_range(0..=6)?,
            u.int_in_range(0..=6)?,
            u.int_in_range(4..=12)?,
        );
        let mut rng = StdRng::seed_from_u64(u.arbitrary()?);

        let options = GeneratorOptions::default().match_mode(mode);
        let generator = TraceGenerator::new(language, &options).unwrap();
        let traces = generator.generate(&request, &mut rng).unwrap();

        assert_eq!(traces.passed.len(), request.num_passing);
        assert_eq!(traces.failed.len(), request.num_failing);

        let passed: HashSet<&String> = traces.passed.iter().collect();
        let failed: HashSet<&String> = traces.failed.iter().collect();
        assert_eq!(passed.len(), traces.passed.len());
        assert_eq!(failed.len(), traces.failed.len());
        assert!(passed.is_disjoint(&failed));

        let oracle = generator.oracle();
        for trace in &traces.passed {
            assert!(oracle.accepts(trace), "{}: {:?}", language.name(), trace);
        }
        for trace in &traces.failed {
            assert!(!oracle.accepts(trace), "{}: {:?}", language.name(), trace);
            assert!(trace.len() <= request.max_length);
        }
        Ok(())
    })
    .budget_ms(500);
}

#[test]
fn attempt_ceiling_surfaces_as_exhaustion() {
    let small = language::small().unwrap();
    let options = GeneratorOptions::default().max_attempts(1);
    let generator = TraceGenerator::new(&small, &options).unwrap();

    let err = generator
        .generate(
            &GenerationRequest::new(50, 0, 5),
            &mut StdRng::seed_from_u64(2),
        )
        .unwrap_err();

    assert!(matches!(err, GenerateError::Exhausted { attempts: 1, .. }));
}
