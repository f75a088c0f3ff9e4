//! Language specifications: a regular expression over a finite alphabet of symbols.
//!
//! A [Language] is immutable once built and is validated exactly once, by the
//! [builder](LanguageBuilder). The pattern must compile for membership testing and must parse
//! into a grammar for passing-trace expansion; a language that passes [`LanguageBuilder::build`]
//! never fails later on a candidate.
//!
//! ```
//! use fsm_tracegen::language::LanguageBuilder;
//!
//! let language = LanguageBuilder::new("toggle", "(ab)*a")
//!     .with_alphabet(["a", "b"])
//!     .with_star_limit(4)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(language.alphabet(), ["a", "b"]);
//! assert_eq!(language.file_prefix(), "toggle-traces");
//! ```

use crate::error::LanguageError;
use regex::Regex;
use regex_syntax::hir::{Class, Hir, HirKind, Literal};
use std::collections::HashSet;
use tracing::{debug, info};

/// Repetitions expanded by the grammar sampler when a language does not say otherwise.
pub const DEFAULT_STAR_LIMIT: u32 = 2;

const SMALL_PATTERN: &str = "0*1(00*1)*1((1|0)0*1(00*1)*1)*";

const CAR_ALARM_PATTERN: &str = concat!(
    "c(l(u|au))*(l(a|o|u|au)|l|o)|(l|c(l(u|au))*lo)(c(o|(u|au)(l(u|au))*lo))*(c(a|(u|au)(l(u|",
    "au))*(l(a|o|u|au)|o|l)|u|au|o)|c|u)|(c(l(u|au))*o|(l|c(l(u|au))*lo)(c(o|(u|au)(l(u|au))*",
    "lo))*(u|c(u|au)(l(u|au))*o))(c(l(u|au))*o|(l|c(l(u|au))*lo)(c(o|(u|au)(l(u|au))*lo))*(u|",
    "c(u|au)(l(u|au))*o))*(c(l(u|au))*(l(a|o|u|au)|l|o)|(l|c(l(u|au))*lo)(c(o|(u|au)(l(u|au))",
    "*lo))*(c(a|(u|au)(l(u|au))*(l(a|o|u|au)|o|l)|u|au|o)|c|u)|c|l)|c|l",
);

const BRIDGE_PATTERN: &str = concat!(
    "X(ABC)*(YA|A(Y|B|BC)|A|(YA|AY|Y)Z)|(A|X(ABC)*(YA|AY)Z)((XY|(XB|BX)C(ABC)*(YA|AY))Z)*(X(Y",
    "|B|YZ)|(XB|BX)(C(ABC)*(YA|A(Y|B|BC)|A|(YA|AY|Y)Z)|C)|B(X|C)|X)|(X(ABC)*YZ|(A|X(ABC)*(YA|",
    "AY)Z)((XY|(XB|BX)C(ABC)*(YA|AY))Z)*(BC|(XB|BX)C(ABC)*YZ))(X(ABC)*YZ|(A|X(ABC)*(YA|AY)Z)(",
    "(XY|(XB|BX)C(ABC)*(YA|AY))Z)*(BC|(XB|BX)C(ABC)*YZ))*(X(ABC)*(YA|A(Y|B|BC)|A|(YA|AY|Y)Z)|",
    "(A|X(ABC)*(YA|AY)Z)((XY|(XB|BX)C(ABC)*(YA|AY))Z)*(X(Y|B|YZ)|(XB|BX)(C(ABC)*(YA|A(Y|B|BC)",
    "|A|(YA|AY|Y)Z)|C)|B(X|C)|X)|X|A)|(X|(A|X(ABC)*(YA|AY)Z)((XY|(XB|BX)C(ABC)*(YA|AY))Z)*(XB",
    "|BX)C|(X(ABC)*YZ|(A|X(ABC)*(YA|AY)Z)((XY|(XB|BX)C(ABC)*(YA|AY))Z)*(BC|(XB|BX)C(ABC)*YZ))",
    "(X(ABC)*YZ|(A|X(ABC)*(YA|AY)Z)((XY|(XB|BX)C(ABC)*(YA|AY))Z)*(BC|(XB|BX)C(ABC)*YZ))*(X|(A",
    "|X(ABC)*(YA|AY)Z)((XY|(XB|BX)C(ABC)*(YA|AY))Z)*(XB|BX)C))(ABC)*Y|(A|X(ABC)*(YA|AY)Z|(X(A",
    "BC)*YZ|(A|X(ABC)*(YA|AY)Z)((XY|(XB|BX)C(ABC)*(YA|AY))Z)*(BC|(XB|BX)C(ABC)*YZ))(X(ABC)*YZ",
    "|(A|X(ABC)*(YA|AY)Z)((XY|(XB|BX)C(ABC)*(YA|AY))Z)*(BC|(XB|BX)C(ABC)*YZ))*(A|X(ABC)*(YA|A",
    "Y)Z))((XY|(XB|BX)C(ABC)*(YA|AY))Z)*B|X|A",
);

/// An accepted language together with the alphabet its traces are drawn from.
///
/// # See also
///
/// * [LanguageBuilder]
/// * [Registry]
#[derive(Debug, Clone)]
pub struct Language {
    name: String,
    title: String,
    file_prefix: String,
    pattern: String,
    alphabet: Vec<String>,
    star_limit: u32,

    // Parsed once at build time and shared by every grammar sampler.
    grammar: Hir,
}

impl Language {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable name shown in the selection menu.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Prefix of the artifact file name; the writer appends a timestamp.
    pub fn file_prefix(&self) -> &str {
        &self.file_prefix
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn alphabet(&self) -> &[String] {
        &self.alphabet
    }

    /// Upper bound on the repeat count chosen for each `*` while expanding the grammar.
    pub fn star_limit(&self) -> u32 {
        self.star_limit
    }

    pub fn grammar(&self) -> &Hir {
        &self.grammar
    }
}

/// Helps with specifying [Languages](Language).
pub struct LanguageBuilder {
    name: String,
    pattern: String,
    title: Option<String>,
    file_prefix: Option<String>,
    alphabet: Vec<String>,
    star_limit: u32,
}

impl LanguageBuilder {
    /// Start a language called `name` accepting the strings matched by `pattern`.
    pub fn new(name: &str, pattern: &str) -> Self {
        LanguageBuilder {
            name: name.into(),
            pattern: pattern.into(),
            title: None,
            file_prefix: None,
            alphabet: Vec::new(),
            star_limit: DEFAULT_STAR_LIMIT,
        }
    }

    /// Add a single symbol to the alphabet. Symbols may be longer than one character.
    pub fn with_symbol(mut self, symbol: &str) -> Self {
        self.alphabet.push(symbol.into());
        self
    }

    /// Add every symbol in `symbols` to the alphabet, in order.
    pub fn with_alphabet<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alphabet.extend(symbols.into_iter().map(Into::into));
        self
    }

    pub fn with_star_limit(mut self, limit: u32) -> Self {
        self.star_limit = limit;
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Defaults to `<name>-traces`.
    pub fn with_file_prefix(mut self, prefix: &str) -> Self {
        self.file_prefix = Some(prefix.into());
        self
    }

    /// Validate the specification and return the finished language.
    pub fn build(self) -> Result<Language, LanguageError> {
        let name = self.name;

        if self.alphabet.is_empty() {
            return Err(LanguageError::EmptyAlphabet(name));
        }

        {
            let mut seen = HashSet::new();
            for symbol in &self.alphabet {
                if symbol.is_empty() {
                    return Err(LanguageError::EmptySymbol(name));
                }
                if !seen.insert(symbol.as_str()) {
                    return Err(LanguageError::DuplicateSymbol {
                        name,
                        symbol: symbol.clone(),
                    });
                }
            }
        }

        if let Err(source) = Regex::new(&self.pattern) {
            return Err(LanguageError::InvalidPattern {
                name,
                source: Box::new(source),
            });
        }

        let grammar = match regex_syntax::parse(&self.pattern) {
            Ok(hir) => hir,
            Err(source) => {
                return Err(LanguageError::UnexpandablePattern {
                    name,
                    source: Box::new(source),
                })
            }
        };

        let characters: HashSet<char> = self.alphabet.iter().flat_map(|s| s.chars()).collect();
        if let Some(character) = outside_alphabet(&grammar, &characters) {
            return Err(LanguageError::OutsideAlphabet { name, character });
        }

        info!(
            "build language {} with {} symbols, star limit {}",
            name,
            self.alphabet.len(),
            self.star_limit
        );

        Ok(Language {
            title: self.title.unwrap_or_else(|| name.clone()),
            file_prefix: self
                .file_prefix
                .unwrap_or_else(|| format!("{}-traces", name)),
            name,
            pattern: self.pattern,
            alphabet: self.alphabet,
            star_limit: self.star_limit,
            grammar,
        })
    }
}

/// The first character `hir` can produce that is not in `characters`.
fn outside_alphabet(hir: &Hir, characters: &HashSet<char>) -> Option<char> {
    match hir.kind() {
        HirKind::Empty | HirKind::Look(_) => None,
        HirKind::Literal(Literal(bytes)) => String::from_utf8_lossy(bytes)
            .chars()
            .find(|c| !characters.contains(c)),
        HirKind::Class(class) => {
            let ranges: Vec<(u32, u32)> = match class {
                Class::Unicode(class) => class
                    .ranges()
                    .iter()
                    .map(|range| (range.start() as u32, range.end() as u32))
                    .collect(),
                Class::Bytes(class) => class
                    .ranges()
                    .iter()
                    .map(|range| (u32::from(range.start()), u32::from(range.end())))
                    .collect(),
            };
            ranges.into_iter().find_map(|(start, end)| {
                // Stops at the first stray, so wide ranges are never walked far.
                (start..=end)
                    .filter_map(char::from_u32)
                    .find(|c| !characters.contains(c))
            })
        }
        HirKind::Repetition(rep) => outside_alphabet(&rep.sub, characters),
        HirKind::Capture(capture) => outside_alphabet(&capture.sub, characters),
        HirKind::Concat(subs) | HirKind::Alternation(subs) => subs
            .iter()
            .find_map(|sub| outside_alphabet(sub, characters)),
    }
}

/// The binary language of the small DFA: every trace contains at least two `1`s.
pub fn small() -> Result<Language, LanguageError> {
    LanguageBuilder::new("small", SMALL_PATTERN)
        .with_title("Small DFA")
        .with_file_prefix("small-dfa-traces")
        .with_alphabet(["0", "1"])
        .with_star_limit(3)
        .build()
}

/// The car alarm DFA over lock, close, arm, unlock and open.
pub fn car_alarm() -> Result<Language, LanguageError> {
    LanguageBuilder::new("car-alarm", CAR_ALARM_PATTERN)
        .with_title("Car Alarm DFA")
        .with_file_prefix("car-alarm-dfa-traces")
        .with_alphabet(["l", "c", "a", "u", "o"])
        .with_star_limit(2)
        .build()
}

/// The bridge controller DFA.
pub fn bridge() -> Result<Language, LanguageError> {
    LanguageBuilder::new("bridge", BRIDGE_PATTERN)
        .with_title("Bridge DFA")
        .with_file_prefix("bridge-dfa-traces")
        .with_alphabet(["A", "B", "C", "X", "Y", "Z"])
        .with_star_limit(2)
        .build()
}

/// Named languages in registration order.
///
/// Menu positions are 1-based, matching the interactive selector.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    languages: Vec<Language>,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            languages: Vec::new(),
        }
    }

    /// The small, car alarm and bridge languages, in that order.
    pub fn builtin() -> Result<Self, LanguageError> {
        let mut registry = Registry::new();
        registry.register(small()?)?;
        registry.register(car_alarm()?)?;
        registry.register(bridge()?)?;
        Ok(registry)
    }

    pub fn register(&mut self, language: Language) -> Result<(), LanguageError> {
        if self.get(language.name()).is_some() {
            return Err(LanguageError::DuplicateName(language.name));
        }

        debug!("register language {}", language.name());
        self.languages.push(language);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Language> {
        self.languages.iter().find(|language| language.name == name)
    }

    /// Look up by 1-based menu position.
    pub fn by_index(&self, index: usize) -> Option<&Language> {
        index.checked_sub(1).and_then(|idx| self.languages.get(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Language> {
        self.languages.iter()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_languages_are_registered_in_menu_order() {
        let registry = Registry::builtin().unwrap();

        let names: Vec<&str> = registry.iter().map(Language::name).collect();
        assert_eq!(names, ["small", "car-alarm", "bridge"]);

        assert_eq!(registry.by_index(1).unwrap().name(), "small");
        assert_eq!(registry.by_index(3).unwrap().name(), "bridge");
        assert!(registry.by_index(0).is_none());
        assert!(registry.by_index(4).is_none());
    }

    #[test]
    fn builtin_constants() {
        let small = small().unwrap();
        assert_eq!(small.pattern(), SMALL_PATTERN);
        assert_eq!(small.star_limit(), 3);
        assert_eq!(small.file_prefix(), "small-dfa-traces");

        let car_alarm = car_alarm().unwrap();
        assert_eq!(car_alarm.alphabet(), ["l", "c", "a", "u", "o"]);
        assert_eq!(car_alarm.pattern().len(), 418);

        let bridge = bridge().unwrap();
        assert_eq!(bridge.alphabet().len(), 6);
        assert_eq!(bridge.pattern().len(), 1008);
        assert!(bridge.pattern().ends_with("B|X|A"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = Registry::builtin().unwrap();
        let again = LanguageBuilder::new("small", "1")
            .with_symbol("1")
            .build()
            .unwrap();

        assert!(matches!(
            registry.register(again),
            Err(LanguageError::DuplicateName(name)) if name == "small"
        ));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn malformed_pattern_fails_at_build() {
        let result = LanguageBuilder::new("broken", "(ab")
            .with_alphabet(["a", "b"])
            .build();

        assert!(matches!(result, Err(LanguageError::InvalidPattern { .. })));
    }

    #[test]
    fn alphabet_is_validated() {
        assert!(matches!(
            LanguageBuilder::new("empty", "a").build(),
            Err(LanguageError::EmptyAlphabet(_))
        ));
        assert!(matches!(
            LanguageBuilder::new("blank", "a").with_symbol("").build(),
            Err(LanguageError::EmptySymbol(_))
        ));
        assert!(matches!(
            LanguageBuilder::new("twice", "a")
                .with_alphabet(["a", "b", "a"])
                .build(),
            Err(LanguageError::DuplicateSymbol { symbol, .. }) if symbol == "a"
        ));
    }

    #[test]
    fn patterns_stay_inside_the_alphabet() {
        for (pattern, stray) in [("a.b", '\0'), (r"a\wb", '0'), ("[a-c]+", 'c'), ("ab|z", 'z')] {
            match LanguageBuilder::new("stray", pattern)
                .with_alphabet(["a", "b"])
                .build()
            {
                Err(LanguageError::OutsideAlphabet { character, .. }) => {
                    assert_eq!(character, stray, "{}", pattern)
                }
                other => panic!("{}: expected a stray character, got {:?}", pattern, other),
            }
        }

        let language = LanguageBuilder::new("ranged", "[a-b](ab)*$")
            .with_alphabet(["a", "b"])
            .build()
            .unwrap();
        assert_eq!(language.pattern(), "[a-b](ab)*$");
    }

    #[test]
    fn multi_character_symbols() {
        let language = LanguageBuilder::new("tokens", "(on|off)*")
            .with_symbol("on")
            .with_symbol("off")
            .with_title("Switch")
            .build()
            .unwrap();

        assert_eq!(language.title(), "Switch");
        assert_eq!(language.alphabet(), ["on", "off"]);
        assert_eq!(language.star_limit(), DEFAULT_STAR_LIMIT);
    }
}
