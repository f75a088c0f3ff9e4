//! Candidate generation.
//!
//! Failing candidates come from a [UniformSampler]: a uniformly chosen length followed by
//! independent, uniformly chosen symbols. Passing candidates come from a [GrammarSampler],
//! which walks the parsed pattern and expands it as a generative grammar. Neither sampler
//! remembers earlier draws, and neither stops on its own; the collector decides when enough
//! has been drawn.

use crate::bound::Bound;
use crate::error::RequestError;
use crate::language::Language;
use rand::Rng;
use regex_syntax::hir::{Class, Hir, HirKind, Literal, Repetition};

/// A source of candidate traces.
pub trait Sampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> String;
}

/// Draws traces of uniformly random length from the alphabet, with replacement.
#[derive(Debug, Clone)]
pub struct UniformSampler {
    alphabet: Vec<String>,
    lengths: Bound<usize>,
}

impl UniformSampler {
    /// Sample traces of `1..=max_length` symbols over the alphabet of `language`.
    pub fn new(language: &Language, max_length: usize) -> Result<Self, RequestError> {
        if max_length == 0 {
            return Err(RequestError::NonPositiveLength);
        }

        Ok(UniformSampler {
            alphabet: language.alphabet().to_vec(),
            lengths: Bound::closed(1, max_length),
        })
    }

    /// Inclusive range of trace lengths, counted in symbols.
    pub fn lengths(&self) -> Bound<usize> {
        self.lengths
    }

    /// Number of distinct symbol sequences this sampler can draw, saturating at `u128::MAX`.
    ///
    /// With multi-character symbols two sequences may concatenate to the same string, so this
    /// is an upper bound on the number of distinct traces.
    ///
    /// ```
    /// use fsm_tracegen::language;
    /// use fsm_tracegen::sampler::UniformSampler;
    ///
    /// let sampler = UniformSampler::new(&language::small().unwrap(), 3).unwrap();
    /// assert_eq!(sampler.candidate_space(), 2 + 4 + 8);
    /// ```
    pub fn candidate_space(&self) -> u128 {
        let symbols = self.alphabet.len() as u128;
        let (lower, upper) = self.lengths.as_explicit();

        // A single symbol never saturates, but gives exactly one sequence per length.
        if symbols == 1 {
            return (upper - lower) as u128 + 1;
        }

        let mut total: u128 = 0;
        let mut sequences: u128 = symbols.saturating_pow(lower as u32);
        for _ in lower..=upper {
            total = total.saturating_add(sequences);
            if total == u128::MAX {
                break;
            }
            sequences = sequences.saturating_mul(symbols);
        }
        total
    }
}

impl Sampler for UniformSampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let (lower, upper) = self.lengths.as_explicit();
        let length = rng.gen_range(lower..=upper);

        let mut trace = String::new();
        for _ in 0..length {
            let idx = rng.gen_range(0..self.alphabet.len());
            trace.push_str(&self.alphabet[idx]);
        }
        trace
    }
}

/// Expands the language's pattern as a grammar.
///
/// Alternations pick a branch uniformly, classes pick a member character uniformly, and a
/// repetition `{min,max}` picks its count uniformly from `[min, max]` capped at
/// `max(min, star_limit)`. Every expansion is a member of the pattern's language, though
/// callers still verify each candidate with the oracle.
#[derive(Debug, Clone)]
pub struct GrammarSampler {
    grammar: Hir,
    star_limit: u32,
}

impl GrammarSampler {
    pub fn new(language: &Language) -> Self {
        GrammarSampler {
            grammar: language.grammar().clone(),
            star_limit: language.star_limit(),
        }
    }

    /// Override the language's own star limit.
    pub fn with_star_limit(mut self, limit: u32) -> Self {
        self.star_limit = limit;
        self
    }

    pub fn star_limit(&self) -> u32 {
        self.star_limit
    }

    fn expand<R: Rng + ?Sized>(&self, hir: &Hir, rng: &mut R, out: &mut String) {
        match hir.kind() {
            // Assertions are zero-width.
            HirKind::Empty | HirKind::Look(_) => {}
            HirKind::Literal(Literal(bytes)) => out.push_str(&String::from_utf8_lossy(bytes)),
            HirKind::Class(class) => {
                if let Some(c) = pick_from_class(class, rng) {
                    out.push(c);
                }
            }
            HirKind::Repetition(rep) => {
                for _ in 0..self.repeat_count(rep, rng) {
                    self.expand(&rep.sub, rng, out);
                }
            }
            HirKind::Capture(capture) => self.expand(&capture.sub, rng, out),
            HirKind::Concat(subs) => {
                for sub in subs {
                    self.expand(sub, rng, out);
                }
            }
            HirKind::Alternation(alternatives) => {
                let idx = rng.gen_range(0..alternatives.len());
                self.expand(&alternatives[idx], rng, out);
            }
        }
    }

    fn repeat_count<R: Rng + ?Sized>(&self, rep: &Repetition, rng: &mut R) -> u32 {
        let requested = Bound {
            lower: Some(rep.min),
            upper: rep.max,
        };
        let limit = Bound {
            lower: None,
            upper: Some(rep.min.max(self.star_limit)),
        };

        // The limit never drops below `min`, so the intersection is never empty.
        let (lower, upper) = requested
            .intersect(&limit)
            .map(|bound| bound.as_explicit())
            .unwrap_or((rep.min, rep.min));

        rng.gen_range(lower..=upper)
    }
}

impl Sampler for GrammarSampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let mut trace = String::new();
        self.expand(&self.grammar, rng, &mut trace);
        trace
    }
}

/// Uniformly pick a member of `class`, or `None` if the class is empty.
fn pick_from_class<R: Rng + ?Sized>(class: &Class, rng: &mut R) -> Option<char> {
    match class {
        Class::Unicode(class) => {
            let ranges: Vec<(u32, u32)> = class
                .ranges()
                .iter()
                .map(|range| (range.start() as u32, range.end() as u32))
                .collect();
            let code = pick_from_ranges(&ranges, rng)?;

            // A range may straddle the surrogate gap; fall back to its first member.
            char::from_u32(code).or_else(|| class.ranges().first().map(|range| range.start()))
        }
        Class::Bytes(class) => {
            let ranges: Vec<(u32, u32)> = class
                .ranges()
                .iter()
                .map(|range| (range.start() as u32, range.end() as u32))
                .collect();
            pick_from_ranges(&ranges, rng).and_then(char::from_u32)
        }
    }
}

fn pick_from_ranges<R: Rng + ?Sized>(ranges: &[(u32, u32)], rng: &mut R) -> Option<u32> {
    let total: u64 = ranges
        .iter()
        .map(|(start, end)| u64::from(end - start) + 1)
        .sum();
    if total == 0 {
        return None;
    }

    let mut offset = rng.gen_range(0..total);
    for (start, end) in ranges {
        let width = u64::from(end - start) + 1;
        if offset < width {
            return Some(start + offset as u32);
        }
        offset -= width;
    }
    None
}
