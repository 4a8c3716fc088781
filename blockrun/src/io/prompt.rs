//! Blocking prompt provider: one question at a time, no timeout.
//!
//! The engine only depends on the [`PromptProvider`] trait; the terminal
//! widgets live behind it so navigation and form synthesis stay scriptable
//! in tests (see `test_support::ScriptedPrompt`).

use std::io::{BufRead, Write};

use anyhow::{Context, Result, anyhow};

/// Free-text validator; returning `Err` makes the provider re-ask.
pub type Validator<'a> = &'a dyn Fn(&str) -> Result<(), String>;

/// Single-threaded request/response prompting.
///
/// Every call blocks until the user answers; there is exactly one
/// outstanding question at any time.
pub trait PromptProvider {
    /// Ask for one free-text line. With a validator, the provider keeps
    /// re-asking until the answer passes.
    fn input(&mut self, message: &str, validate: Option<Validator<'_>>) -> Result<String>;

    /// Present a single-select list, returning the chosen index.
    fn select(&mut self, message: &str, choices: &[String]) -> Result<usize>;

    /// Ask a yes/no question with the given default.
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;
}

/// Line-oriented prompt provider over stdin/stdout.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    pub fn new() -> Self {
        Self
    }

    fn read_line(&self) -> Result<String> {
        let mut line = String::new();
        let read = std::io::stdin()
            .lock()
            .read_line(&mut line)
            .context("read from stdin")?;
        if read == 0 {
            return Err(anyhow!("input stream closed"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn ask(&self, message: &str) -> Result<String> {
        let mut out = std::io::stdout().lock();
        write!(out, "{message} ").context("write prompt")?;
        out.flush().context("flush prompt")?;
        drop(out);
        self.read_line()
    }
}

impl PromptProvider for TerminalPrompt {
    fn input(&mut self, message: &str, validate: Option<Validator<'_>>) -> Result<String> {
        loop {
            let answer = self.ask(message)?;
            match validate {
                Some(check) => match check(&answer) {
                    Ok(()) => return Ok(answer),
                    Err(reason) => println!("{reason}"),
                },
                None => return Ok(answer),
            }
        }
    }

    fn select(&mut self, message: &str, choices: &[String]) -> Result<usize> {
        debug_assert!(!choices.is_empty(), "select requires at least one choice");
        println!("{message}");
        for (i, choice) in choices.iter().enumerate() {
            println!("  {}. {choice}", i + 1);
        }
        loop {
            let answer = self.ask(&format!("Choice [1-{}]:", choices.len()))?;
            match answer.trim().parse::<usize>() {
                Ok(n) if (1..=choices.len()).contains(&n) => return Ok(n - 1),
                _ => println!("Please enter a number between 1 and {}", choices.len()),
            }
        }
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            let answer = self.ask(&format!("{message} {hint}"))?;
            match answer.trim().to_ascii_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => println!("Please answer y or n"),
            }
        }
    }
}
