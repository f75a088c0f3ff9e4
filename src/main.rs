use clap::Parser;
use fsm_tracegen::error::{Error, WriteError};
use fsm_tracegen::{shell, GeneratorOptions, Language, MatchMode, Registry, ResultWriter};
use fsm_tracegen::{TraceGenerator, TraceSet};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, IsTerminal};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Generate passing and failing test traces for a DFA.
///
/// Any generation parameter not given on the command line is asked for interactively.
#[derive(Debug, Parser)]
#[command(name = "fsm-tracegen", version)]
struct Cli {
    /// Language to generate for, by name (see --list).
    #[arg(short, long)]
    language: Option<String>,

    /// Number of distinct passing traces.
    #[arg(short, long)]
    passing: Option<usize>,

    /// Number of distinct failing traces.
    #[arg(short, long)]
    failing: Option<usize>,

    /// Longest failing trace, in symbols.
    #[arg(short = 'n', long)]
    max_length: Option<NonZeroUsize>,

    /// Directory the trace file is written to.
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,

    /// Give up on a collection after this many candidates.
    #[arg(long, conflicts_with = "unbounded")]
    max_attempts: Option<u64>,

    /// Never give up on a collection.
    #[arg(long)]
    unbounded: bool,

    /// Give up on a collection after this many milliseconds.
    #[arg(long)]
    deadline_ms: Option<u64>,

    /// `anchored` accepts whole traces only, `prefix` also accepts traces with an accepted prefix.
    #[arg(long, default_value_t = MatchMode::Anchored)]
    match_mode: MatchMode,

    /// Maximum repetitions per `*` when expanding passing traces.
    #[arg(long)]
    star_limit: Option<u32>,

    /// List the available languages and exit.
    #[arg(long)]
    list: bool,
}

impl Cli {
    fn options(&self) -> GeneratorOptions {
        let mut options = GeneratorOptions::default().match_mode(self.match_mode);
        if let Some(attempts) = self.max_attempts {
            options = options.max_attempts(attempts);
        }
        if self.unbounded {
            options = options.unbounded();
        }
        if let Some(ms) = self.deadline_ms {
            options = options.deadline_ms(ms);
        }
        if let Some(limit) = self.star_limit {
            options = options.star_limit(limit);
        }
        options
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let registry = Registry::builtin()?;

    if cli.list {
        for language in registry.iter() {
            println!(
                "{:<10} {:<14} alphabet {{{}}}",
                language.name(),
                language.title(),
                language.alphabet().join(",")
            );
        }
        return Ok(());
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let language: &Language = match &cli.language {
        Some(name) => registry
            .get(name)
            .ok_or_else(|| Error::UnknownLanguage(name.clone()))?,
        None => shell::select_language(&registry, &mut input, &mut output)?,
    };

    let request = shell::complete_request(
        cli.passing,
        cli.failing,
        cli.max_length.map(NonZeroUsize::get),
        &mut input,
        &mut output,
    )?;

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let generator = TraceGenerator::new(language, &cli.options())?;
    let traces = generator.generate(&request, &mut rng)?;

    println!(
        "it took {} attempts at creating {} failing and {} attempts at creating {} passing",
        traces.stats.failing_attempts,
        traces.failed.len(),
        traces.stats.passing_attempts,
        traces.passed.len()
    );

    let path = write_with_retry(
        &cli.out_dir,
        &traces,
        generator.language(),
        &mut input,
        &mut output,
    )?;
    println!("The generated traces have been written to file: {}", path.display());
    Ok(())
}

/// Write `traces`, offering another directory on failure when a user is at the terminal.
fn write_with_retry<R, W>(
    dir: &Path,
    traces: &TraceSet,
    language: &Language,
    input: &mut R,
    output: &mut W,
) -> Result<PathBuf, Error>
where
    R: io::BufRead,
    W: io::Write,
{
    let mut writer = ResultWriter::new(dir);

    loop {
        match writer.write(traces, language.file_prefix()) {
            Ok(path) => return Ok(path),
            Err(err) if io::stdin().is_terminal() && retryable(&err) => {
                error!("{} (in {})", err, writer.dir().display());
                let dir = shell::prompt_line(
                    input,
                    output,
                    "The traces could not be written. Enter another output directory:",
                )?;
                info!("retrying in {}", dir);
                writer = ResultWriter::new(dir);
            }
            Err(err) => return Err(err.into()),
        }
    }
}

fn retryable(err: &WriteError) -> bool {
    matches!(err, WriteError::Io(_) | WriteError::NameConflict(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_length_must_be_positive() {
        assert!(Cli::try_parse_from(["fsm-tracegen", "-n", "0"]).is_err());
        assert!(Cli::try_parse_from(["fsm-tracegen", "-n", "-3"]).is_err());

        let cli = Cli::try_parse_from(["fsm-tracegen", "--max-length", "12"]).unwrap();
        assert_eq!(cli.max_length.map(NonZeroUsize::get), Some(12));
    }

    #[test]
    fn max_length_covers_the_platform_word() {
        let max = usize::MAX.to_string();
        let cli = Cli::try_parse_from(["fsm-tracegen", "-n", max.as_str()]).unwrap();
        assert_eq!(cli.max_length.map(NonZeroUsize::get), Some(usize::MAX));

        let beyond = format!("{}0", max);
        assert!(Cli::try_parse_from(["fsm-tracegen", "-n", beyond.as_str()]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
