//! Interactive prompts for the command-line front end.
//!
//! Every prompt re-asks until it gets a usable answer; only I/O failure or end of input is an
//! error. The functions take any reader and writer so they can be driven from tests.

use crate::error::PromptError;
use crate::generator::GenerationRequest;
use crate::language::{Language, Registry};
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::debug;

/// Ask `question` and return the first trimmed line that is not empty.
pub fn prompt_line<R, W>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> Result<String, PromptError>
where
    R: BufRead,
    W: Write,
{
    loop {
        writeln!(output, "{}", question)?;
        write!(output, "> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(PromptError::EndOfInput);
        }

        let answer = line.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
    }
}

/// Ask `question` until the answer parses as a `T` that satisfies `valid`.
pub fn prompt_number<T, R, W, F>(
    input: &mut R,
    output: &mut W,
    question: &str,
    valid: F,
) -> Result<T, PromptError>
where
    T: FromStr,
    R: BufRead,
    W: Write,
    F: Fn(&T) -> bool,
{
    loop {
        let answer = prompt_line(input, output, question)?;
        match answer.parse::<T>() {
            Ok(value) if valid(&value) => return Ok(value),
            _ => {
                debug!("rejected answer {:?}", answer);
                writeln!(output, "Error in input. Please try again.")?;
            }
        }
    }
}

/// Show the registry as a numbered menu and return the chosen language.
///
/// The answer may be a menu number or a language name.
pub fn select_language<'r, R, W>(
    registry: &'r Registry,
    input: &mut R,
    output: &mut W,
) -> Result<&'r Language, PromptError>
where
    R: BufRead,
    W: Write,
{
    let mut question = String::from("Which DFA do you wish to generate traces for?");
    for (idx, language) in registry.iter().enumerate() {
        question.push_str(&format!("\n{}. {}", idx + 1, language.title()));
    }

    loop {
        let answer = prompt_line(input, output, &question)?;

        let choice = match answer.parse::<usize>() {
            Ok(index) => registry.by_index(index),
            Err(_) => registry.get(&answer),
        };

        match choice {
            Some(language) => return Ok(language),
            None => writeln!(output, "Wrong input.")?,
        }
    }
}

/// Ask for whichever request fields are missing.
pub fn complete_request<R, W>(
    num_passing: Option<usize>,
    num_failing: Option<usize>,
    max_length: Option<usize>,
    input: &mut R,
    output: &mut W,
) -> Result<GenerationRequest, PromptError>
where
    R: BufRead,
    W: Write,
{
    let num_passing = match num_passing {
        Some(n) => n,
        None => prompt_number(
            input,
            output,
            "How many passing traces should be generated?",
            |_: &usize| true,
        )?,
    };

    let num_failing = match num_failing {
        Some(n) => n,
        None => prompt_number(
            input,
            output,
            "How many failing traces should be generated?",
            |_: &usize| true,
        )?,
    };

    let max_length = match max_length {
        Some(n) => n,
        None => prompt_number(
            input,
            output,
            "How many symbols long may failing traces be? Between 10-15 recommended.",
            |n: &usize| *n > 0,
        )?,
    };

    Ok(GenerationRequest::new(num_passing, num_failing, max_length))
}
