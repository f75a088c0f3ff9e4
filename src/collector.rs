use crate::error::GenerateError;
use crate::generator::TraceClass;
use crate::oracle::Oracle;
use crate::sampler::Sampler;
use rand::Rng;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Distinct traces of one class, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collected {
    pub traces: Vec<String>,

    /// Every candidate drawn, including wrong-class and duplicate ones.
    pub attempts: u64,
}

/// Repeatedly samples and classifies candidates until enough distinct ones of a class are found.
///
/// Without a ceiling or deadline an unreachable target makes [Collector::collect] run forever.
#[derive(Debug, Clone, Default)]
pub struct Collector {
    max_attempts: Option<u64>,
    deadline: Option<Duration>,
}

impl Collector {
    pub fn new(max_attempts: Option<u64>, deadline: Option<Duration>) -> Self {
        Collector {
            max_attempts,
            deadline,
        }
    }

    pub fn max_attempts(&self) -> Option<u64> {
        self.max_attempts
    }

    /// Collect `count` distinct traces that `oracle` classifies as `class`.
    pub fn collect<S, R>(
        &self,
        class: TraceClass,
        count: usize,
        sampler: &S,
        oracle: &Oracle,
        rng: &mut R,
    ) -> Result<Collected, GenerateError>
    where
        S: Sampler,
        R: Rng + ?Sized,
    {
        info!("collecting {} {} traces", count, class);

        let started = Instant::now();
        let mut seen: HashSet<String> = HashSet::with_capacity(count);
        let mut traces: Vec<String> = Vec::with_capacity(count);
        let mut attempts: u64 = 0;

        while traces.len() < count {
            if let Some(max_attempts) = self.max_attempts {
                if attempts >= max_attempts {
                    warn!(
                        "exhausted {} attempts with {} of {} {} traces",
                        attempts,
                        traces.len(),
                        count,
                        class
                    );
                    return Err(GenerateError::Exhausted {
                        class,
                        found: traces.len(),
                        requested: count,
                        attempts,
                    });
                }
            }

            if let Some(deadline) = self.deadline {
                if started.elapsed() >= deadline {
                    warn!(
                        "deadline passed after {} attempts with {} of {} {} traces",
                        attempts,
                        traces.len(),
                        count,
                        class
                    );
                    return Err(GenerateError::DeadlineExceeded {
                        class,
                        found: traces.len(),
                        requested: count,
                        deadline,
                    });
                }
            }

            attempts += 1;
            let candidate = sampler.sample(rng);

            if oracle.accepts(&candidate) != class.is_accepted() {
                debug!("discard {:?}: not {}", candidate, class);
                continue;
            }

            if seen.contains(&candidate) {
                debug!("discard {:?}: duplicate", candidate);
                continue;
            }

            debug!("keep {:?}", candidate);
            seen.insert(candidate.clone());
            traces.push(candidate);
        }

        info!(
            "it took {} attempts to collect {} {} traces",
            attempts, count, class
        );

        Ok(Collected { traces, attempts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language;
    use crate::oracle::MatchMode;
    use crate::sampler::UniformSampler;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_oracle() -> Oracle {
        Oracle::new(&language::small().unwrap(), MatchMode::Anchored).unwrap()
    }

    #[test]
    fn zero_requested_draws_nothing() {
        let small = language::small().unwrap();
        let sampler = UniformSampler::new(&small, 4).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let collected = Collector::new(Some(0), None)
            .collect(TraceClass::Failing, 0, &sampler, &small_oracle(), &mut rng)
            .unwrap();

        assert_eq!(collected, Collected::default());
    }

    #[test]
    fn collects_distinct_traces_of_the_requested_class() {
        let small = language::small().unwrap();
        let sampler = UniformSampler::new(&small, 6).unwrap();
        let oracle = small_oracle();
        let mut rng = StdRng::seed_from_u64(9);

        let failing = Collector::default()
            .collect(TraceClass::Failing, 10, &sampler, &oracle, &mut rng)
            .unwrap();
        let passing = Collector::default()
            .collect(TraceClass::Passing, 5, &sampler, &oracle, &mut rng)
            .unwrap();

        assert_eq!(failing.traces.len(), 10);
        assert_eq!(passing.traces.len(), 5);
        assert!(failing.attempts >= 10);

        let unique: HashSet<&String> = failing.traces.iter().collect();
        assert_eq!(unique.len(), 10);

        assert!(failing.traces.iter().all(|t| !oracle.accepts(t)));
        assert!(passing.traces.iter().all(|t| oracle.accepts(t)));
    }

    #[test]
    fn unreachable_target_exhausts_the_ceiling() {
        let small = language::small().unwrap();
        let sampler = UniformSampler::new(&small, 1).unwrap();
        let mut rng = StdRng::seed_from_u64(4);

        // Only "0" and "1" exist at length one.
        let err = Collector::new(Some(500), None)
            .collect(TraceClass::Failing, 3, &sampler, &small_oracle(), &mut rng)
            .unwrap_err();

        match err {
            GenerateError::Exhausted {
                class,
                found,
                requested,
                attempts,
            } => {
                assert_eq!(class, TraceClass::Failing);
                assert_eq!(found, 2);
                assert_eq!(requested, 3);
                assert_eq!(attempts, 500);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn elapsed_deadline_stops_collection() {
        let small = language::small().unwrap();
        let sampler = UniformSampler::new(&small, 1).unwrap();
        let mut rng = StdRng::seed_from_u64(4);

        let err = Collector::new(None, Some(Duration::ZERO))
            .collect(TraceClass::Passing, 1, &sampler, &small_oracle(), &mut rng)
            .unwrap_err();

        assert!(matches!(
            err,
            GenerateError::DeadlineExceeded { found: 0, requested: 1, .. }
        ));
    }
}
