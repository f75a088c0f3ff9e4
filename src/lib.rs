//! # Trace generation for finite-state machines
//!
//! `fsm_tracegen` produces test inputs for a finite-state machine whose accepted language is
//! given as a regular expression. A [language](Language) pairs that expression with the
//! alphabet of symbols the machine reads. For each request the [generator](TraceGenerator)
//! returns a requested number of distinct __passing__ traces (accepted by the language) and
//! distinct __failing__ traces (rejected by it), and the [writer](ResultWriter) stores them as
//! a timestamped JSON document.
//!
//! Membership is always decided by a regex [oracle](Oracle); no automaton is constructed.
//! Failing traces are drawn uniformly at random over the alphabet, passing traces by expanding
//! the pattern itself as a grammar.
//!
//! ```no_run
//! use fsm_tracegen::{language, GenerationRequest, GeneratorOptions, ResultWriter, TraceGenerator};
//!
//! let bridge = language::bridge().unwrap();
//! let generator = TraceGenerator::new(&bridge, &GeneratorOptions::default()).unwrap();
//! let traces = generator
//!     .generate(&GenerationRequest::new(10, 10, 12), &mut rand::thread_rng())
//!     .unwrap();
//!
//! let path = ResultWriter::new(".").write(&traces, bridge.file_prefix()).unwrap();
//! println!("traces written to {}", path.display());
//! ```

pub mod bound;
pub mod collector;
pub mod error;
pub mod generator;
pub mod language;
pub mod options;
pub mod oracle;
pub mod sampler;
pub mod shell;
pub mod writer;

pub use error::Error;
pub use generator::{GenerationRequest, TraceClass, TraceGenerator, TraceSet};
pub use language::{Language, LanguageBuilder, Registry};
pub use options::GeneratorOptions;
pub use oracle::{MatchMode, Oracle};
pub use writer::ResultWriter;
