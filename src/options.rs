//! Generator configuration.
//!
//! ```
//! use fsm_tracegen::oracle::MatchMode;
//! use fsm_tracegen::options::GeneratorOptions;
//!
//! let options = GeneratorOptions::default()
//!     .match_mode(MatchMode::Prefix)
//!     .max_attempts(50_000)
//!     .deadline_ms(2_000);
//!
//! assert_eq!(options.resolved_max_attempts(), Some(50_000));
//! ```

use crate::oracle::MatchMode;
use std::time::Duration;

/// Attempts allowed per collection when neither the caller nor the environment says otherwise.
pub const DEFAULT_MAX_ATTEMPTS: u64 = 1_000_000;

/// Overrides [DEFAULT_MAX_ATTEMPTS]. A value of `0` removes the ceiling.
pub const MAX_ATTEMPTS_ENV: &str = "TRACEGEN_MAX_ATTEMPTS";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AttemptLimit {
    At(u64),
    Unbounded,
}

#[derive(Clone, Debug, Default)]
pub struct GeneratorOptions {
    match_mode: MatchMode,
    attempts: Option<AttemptLimit>,
    deadline: Option<Duration>,
    star_limit: Option<u32>,
}

impl GeneratorOptions {
    pub fn match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    /// Give up on a collection after `attempts` candidates.
    ///
    /// Defaults to one million, can be overridden via the `TRACEGEN_MAX_ATTEMPTS` environment
    /// variable.
    pub fn max_attempts(mut self, attempts: u64) -> Self {
        self.attempts = Some(AttemptLimit::At(attempts));
        self
    }

    /// Keep sampling until every requested trace is found, however long that takes.
    pub fn unbounded(mut self) -> Self {
        self.attempts = Some(AttemptLimit::Unbounded);
        self
    }

    /// Give up on a collection once `deadline` has elapsed since it started.
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn deadline_ms(self, ms: u64) -> Self {
        self.deadline(Duration::from_millis(ms))
    }

    /// Replace the language's own star limit for passing-trace expansion.
    pub fn star_limit(mut self, limit: u32) -> Self {
        self.star_limit = Some(limit);
        self
    }

    pub fn get_match_mode(&self) -> MatchMode {
        self.match_mode
    }

    pub fn get_deadline(&self) -> Option<Duration> {
        self.deadline
    }

    pub fn get_star_limit(&self) -> Option<u32> {
        self.star_limit
    }

    /// The attempt ceiling to enforce, `None` meaning no ceiling.
    pub fn resolved_max_attempts(&self) -> Option<u64> {
        let limit = self
            .attempts
            .or_else(env_max_attempts)
            .unwrap_or(AttemptLimit::At(DEFAULT_MAX_ATTEMPTS));

        match limit {
            AttemptLimit::At(attempts) => Some(attempts),
            AttemptLimit::Unbounded => None,
        }
    }
}

fn env_max_attempts() -> Option<AttemptLimit> {
    let var = std::env::var(MAX_ATTEMPTS_ENV).ok()?;
    let attempts = var.trim().parse::<u64>().ok()?;
    Some(match attempts {
        0 => AttemptLimit::Unbounded,
        attempts => AttemptLimit::At(attempts),
    })
}
