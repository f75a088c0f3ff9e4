use crate::generator::TraceClass;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// A language specification could not be loaded.
#[derive(Debug, Error)]
pub enum LanguageError {
    #[error("language `{name}`: invalid pattern: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: Box<regex::Error>,
    },
    #[error("language `{name}`: pattern cannot be expanded: {source}")]
    UnexpandablePattern {
        name: String,
        #[source]
        source: Box<regex_syntax::Error>,
    },
    #[error("language `{0}` has an empty alphabet")]
    EmptyAlphabet(String),
    #[error("language `{0}` has an empty symbol")]
    EmptySymbol(String),
    #[error("language `{name}` lists symbol `{symbol}` twice")]
    DuplicateSymbol { name: String, symbol: String },
    #[error("language `{name}`: pattern can produce `{character:?}`, which no symbol contains")]
    OutsideAlphabet { name: String, character: char },
    #[error("language `{0}` is already registered")]
    DuplicateName(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("maximum trace length must be at least 1")]
    NonPositiveLength,
}

/// A single generation request could not be satisfied.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    InvalidRequest(#[from] RequestError),
    #[error(
        "gave up after {attempts} attempts with {found} of {requested} distinct {class} traces"
    )]
    Exhausted {
        class: TraceClass,
        found: usize,
        requested: usize,
        attempts: u64,
    },
    #[error("deadline of {deadline:?} passed with {found} of {requested} distinct {class} traces")]
    DeadlineExceeded {
        class: TraceClass,
        found: usize,
        requested: usize,
        deadline: Duration,
    },
    #[error(
        "{requested} distinct {class} traces requested but only {available} candidates exist"
    )]
    Infeasible {
        class: TraceClass,
        requested: usize,
        available: u128,
    },
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("output I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("refusing to overwrite existing file {}", .0.display())]
    NameConflict(PathBuf),
}

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("input ended before an answer was given")]
    EndOfInput,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Language(#[from] LanguageError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error("unknown language `{0}`")]
    UnknownLanguage(String),
}
