//! Generation requests and their results.
//!
//! A [TraceGenerator] binds a [Language] to an [Oracle] and a [Collector] and turns a
//! [GenerationRequest] into a [TraceSet]. Failing traces are collected first, then passing
//! ones; each collection keeps its own duplicate tracking.
//!
//! ```
//! use fsm_tracegen::generator::{GenerationRequest, TraceGenerator};
//! use fsm_tracegen::language;
//! use fsm_tracegen::options::GeneratorOptions;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let small = language::small().unwrap();
//! let generator = TraceGenerator::new(&small, &GeneratorOptions::default()).unwrap();
//!
//! let traces = generator
//!     .generate(&GenerationRequest::new(3, 3, 5), &mut StdRng::seed_from_u64(1))
//!     .unwrap();
//!
//! assert_eq!(traces.passed.len(), 3);
//! assert_eq!(traces.failed.len(), 3);
//! ```

use crate::collector::Collector;
use crate::error::{GenerateError, LanguageError, RequestError};
use crate::language::Language;
use crate::oracle::Oracle;
use crate::options::GeneratorOptions;
use crate::sampler::{GrammarSampler, UniformSampler};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Which side of the language a trace is on.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TraceClass {
    Passing,
    Failing,
}

impl TraceClass {
    /// The oracle verdict traces of this class must receive.
    pub fn is_accepted(self) -> bool {
        matches!(self, TraceClass::Passing)
    }
}

impl fmt::Display for TraceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceClass::Passing => write!(f, "passing"),
            TraceClass::Failing => write!(f, "failing"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GenerationRequest {
    pub num_passing: usize,
    pub num_failing: usize,

    /// Longest failing trace, in symbols. Passing traces are bounded by the star limit instead.
    pub max_length: usize,
}

impl GenerationRequest {
    pub fn new(num_passing: usize, num_failing: usize, max_length: usize) -> Self {
        GenerationRequest {
            num_passing,
            num_failing,
            max_length,
        }
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        if self.max_length == 0 {
            return Err(RequestError::NonPositiveLength);
        }
        Ok(())
    }
}

/// Attempts spent on each collection.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct GenerationStats {
    pub passing_attempts: u64,
    pub failing_attempts: u64,
}

/// The passing and failing traces of one request, in discovery order.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TraceSet {
    #[serde(rename = "PASSED")]
    pub passed: Vec<String>,
    #[serde(rename = "FAILED")]
    pub failed: Vec<String>,
    #[serde(skip)]
    pub stats: GenerationStats,
}

#[derive(Debug, Clone)]
pub struct TraceGenerator<'a> {
    language: &'a Language,
    oracle: Oracle,
    collector: Collector,
    star_limit: u32,
}

impl<'a> TraceGenerator<'a> {
    pub fn new(language: &'a Language, options: &GeneratorOptions) -> Result<Self, LanguageError> {
        let oracle = Oracle::new(language, options.get_match_mode())?;
        let collector = Collector::new(options.resolved_max_attempts(), options.get_deadline());
        let star_limit = options
            .get_star_limit()
            .unwrap_or_else(|| language.star_limit());

        Ok(TraceGenerator {
            language,
            oracle,
            collector,
            star_limit,
        })
    }

    pub fn language(&self) -> &Language {
        self.language
    }

    pub fn oracle(&self) -> &Oracle {
        &self.oracle
    }

    /// Collect the failing and then the passing traces for `request`.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        request: &GenerationRequest,
        rng: &mut R,
    ) -> Result<TraceSet, GenerateError> {
        request.validate()?;

        info!(
            "generating {} passing and {} failing traces for {} ({} match, ceiling {:?})",
            request.num_passing,
            request.num_failing,
            self.language.name(),
            self.oracle.mode(),
            self.collector.max_attempts()
        );

        let uniform = UniformSampler::new(self.language, request.max_length)?;
        let available = uniform.candidate_space();
        debug!(
            "failing trace lengths {}, at most {} candidates",
            uniform.lengths(),
            available
        );
        if request.num_failing as u128 > available {
            return Err(GenerateError::Infeasible {
                class: TraceClass::Failing,
                requested: request.num_failing,
                available,
            });
        }

        let failed = self.collector.collect(
            TraceClass::Failing,
            request.num_failing,
            &uniform,
            &self.oracle,
            rng,
        )?;

        let grammar = GrammarSampler::new(self.language).with_star_limit(self.star_limit);
        let passed = self.collector.collect(
            TraceClass::Passing,
            request.num_passing,
            &grammar,
            &self.oracle,
            rng,
        )?;

        Ok(TraceSet {
            passed: passed.traces,
            failed: failed.traces,
            stats: GenerationStats {
                passing_attempts: passed.attempts,
                failing_attempts: failed.attempts,
            },
        })
    }
}
