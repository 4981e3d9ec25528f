use std::io::{BufRead, Write};

use color_eyre::eyre::{self, WrapErr};
use dialoguer::Input;

pub const NAME_PROMPT: &str = "New repository name";
pub const VISIBILITY_PROMPT: &str = "Make it a private repository? (y/n)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    /// Only a case-insensitive `y` selects a private repository. Anything else,
    /// including `yes` or a padded `y`, stays public.
    pub fn from_answer(answer: &str) -> Self {
        if answer.to_lowercase() == "y" {
            Visibility::Private
        } else {
            Visibility::Public
        }
    }

    pub fn is_private(self) -> bool {
        matches!(self, Visibility::Private)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitAnswers {
    pub name: String,
    pub visibility: Visibility,
}

/// Asks one question and returns the answer as typed.
pub trait Ask {
    fn ask(&mut self, label: &str) -> color_eyre::Result<String>;

    fn collect_answers(&mut self) -> color_eyre::Result<InitAnswers> {
        let name = self.ask(NAME_PROMPT)?;
        let visibility = Visibility::from_answer(&self.ask(VISIBILITY_PROMPT)?);
        Ok(InitAnswers { name, visibility })
    }
}

/// Interactive prompts for a terminal session.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Ask for TerminalPrompter {
    fn ask(&mut self, label: &str) -> color_eyre::Result<String> {
        Input::<String>::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()
            .wrap_err_with(|| eyre::eyre!("failed to read answer for `{label}`"))
    }
}

/// Line-oriented prompts over any reader, used when stdin is not a terminal.
#[derive(Debug)]
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R, W> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R, W> Ask for Prompter<R, W>
where
    R: BufRead,
    W: Write,
{
    fn ask(&mut self, label: &str) -> color_eyre::Result<String> {
        write!(self.output, "{label}: ").wrap_err("failed to write prompt")?;
        self.output.flush().wrap_err("failed to flush prompt")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .wrap_err_with(|| eyre::eyre!("failed to read answer for `{label}`"))?;
        if read == 0 {
            return Err(eyre::eyre!(
                "standard input closed before `{label}` was answered"
            ));
        }

        Ok(strip_line_ending(line))
    }
}

fn strip_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}
