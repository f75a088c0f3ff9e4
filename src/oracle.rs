//! Membership testing for candidate traces.
//!
//! The oracle wraps a compiled regular expression. It never builds an automaton of its own;
//! deciding membership is left entirely to the `regex` crate.
//!
//! Two modes exist because historical trace files were produced under different rules:
//!
//! * [MatchMode::Anchored] accepts a candidate only if the whole string is in the language.
//! * [MatchMode::Prefix] accepts a candidate if some prefix of it is in the language, so an
//!   accepted trace followed by arbitrary symbols still counts as accepted. Failing traces
//!   collected in this mode are therefore a strict subset of the anchored ones.
//!
//! ```
//! use fsm_tracegen::language;
//! use fsm_tracegen::oracle::{MatchMode, Oracle};
//!
//! let small = language::small().unwrap();
//! let anchored = Oracle::new(&small, MatchMode::Anchored).unwrap();
//! let prefix = Oracle::new(&small, MatchMode::Prefix).unwrap();
//!
//! assert!(anchored.accepts("011"));
//! assert!(!anchored.accepts("110"));
//! assert!(prefix.accepts("110"));
//! ```

use crate::error::LanguageError;
use crate::language::Language;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum MatchMode {
    /// The pattern must match starting at the first character; trailing input is ignored.
    Prefix,
    /// The pattern must match the entire candidate.
    #[default]
    Anchored,
}

impl MatchMode {
    fn wrap(self, pattern: &str) -> String {
        match self {
            MatchMode::Prefix => format!("^(?:{})", pattern),
            MatchMode::Anchored => format!("^(?:{})$", pattern),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Prefix => write!(f, "prefix"),
            MatchMode::Anchored => write!(f, "anchored"),
        }
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prefix" => Ok(MatchMode::Prefix),
            "anchored" => Ok(MatchMode::Anchored),
            other => Err(format!(
                "unknown match mode `{}`, expected `prefix` or `anchored`",
                other
            )),
        }
    }
}

/// Decides whether a candidate trace belongs to a [Language].
#[derive(Debug, Clone)]
pub struct Oracle {
    regex: Regex,
    mode: MatchMode,
}

impl Oracle {
    pub fn new(language: &Language, mode: MatchMode) -> Result<Self, LanguageError> {
        let regex = Regex::new(&mode.wrap(language.pattern())).map_err(|source| {
            LanguageError::InvalidPattern {
                name: language.name().into(),
                source: Box::new(source),
            }
        })?;

        Ok(Oracle { regex, mode })
    }

    /// Checks if `candidate` is accepted under this oracle's [MatchMode].
    pub fn accepts(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language;
    use arbtest::arbtest;

    fn small(mode: MatchMode) -> Oracle {
        Oracle::new(&language::small().unwrap(), mode).unwrap()
    }

    #[test]
    fn small_language_verdicts_agree_in_both_modes() {
        for mode in [MatchMode::Prefix, MatchMode::Anchored] {
            let oracle = small(mode);
            assert!(oracle.accepts("011"), "{}", mode);
            assert!(oracle.accepts("11"), "{}", mode);
            assert!(!oracle.accepts("0"), "{}", mode);
            assert!(!oracle.accepts("00"), "{}", mode);
        }
    }

    #[test]
    fn single_symbols_are_rejected_by_small_language() {
        for mode in [MatchMode::Prefix, MatchMode::Anchored] {
            let oracle = small(mode);
            assert!(!oracle.accepts("0"));
            assert!(!oracle.accepts("1"));
        }
    }

    #[test]
    fn prefix_mode_ignores_trailing_symbols() {
        let prefix = small(MatchMode::Prefix);
        let anchored = small(MatchMode::Anchored);

        assert!(prefix.accepts("110"));
        assert!(!anchored.accepts("110"));

        let car_alarm = language::car_alarm().unwrap();
        let prefix = Oracle::new(&car_alarm, MatchMode::Prefix).unwrap();
        let anchored = Oracle::new(&car_alarm, MatchMode::Anchored).unwrap();
        assert!(prefix.accepts("ca"));
        assert!(!anchored.accepts("ca"));
        assert!(anchored.accepts("lu"));
        assert!(!anchored.accepts("a"));
    }

    #[test]
    fn bridge_language_verdicts() {
        let bridge = language::bridge().unwrap();
        let oracle = Oracle::new(&bridge, MatchMode::Anchored).unwrap();

        assert!(oracle.accepts("A"));
        assert!(oracle.accepts("X"));
        assert!(oracle.accepts("XA"));
        assert!(!oracle.accepts("B"));
        assert!(!oracle.accepts("BX"));
        assert!(!oracle.accepts(""));
    }

    #[test]
    fn match_mode_parses() {
        assert_eq!("prefix".parse::<MatchMode>(), Ok(MatchMode::Prefix));
        assert_eq!("anchored".parse::<MatchMode>(), Ok(MatchMode::Anchored));
        assert!("full".parse::<MatchMode>().is_err());
        assert_eq!(MatchMode::default(), MatchMode::Anchored);
    }

    #[test]
    fn verdicts_are_stable() {
        let prefix = small(MatchMode::Prefix);
        let anchored = small(MatchMode::Anchored);

        arbtest(|u| {
            let bits: Vec<bool> = u.arbitrary()?;
            let trace: String = bits.iter().map(|&b| if b { '1' } else { '0' }).collect();

            let verdict = anchored.accepts(&trace);
            assert_eq!(verdict, anchored.accepts(&trace));

            // Anything accepted whole is accepted by prefix too.
            if verdict {
                assert!(prefix.accepts(&trace));
            }
            Ok(())
        });
    }
}
