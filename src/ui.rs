// UI layer: the prompts the menu controller talks through.
//
// `TerminalPrompter` uses `dialoguer` for an interactive terminal: arrow-key
// menus, hidden password entry and colored messages. `LinePrompter` reads one
// answer per line from any reader, which is what piped input and the tests
// use.

use std::io::{BufRead, ErrorKind, Write};
use std::time::Duration;

use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::{Input, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};

/// How a message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Error,
}

/// What the operator typed at a menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuInput {
    Choice(u32),
    /// Anything that is not a number.
    Invalid(String),
}

impl MenuInput {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line.parse::<u32>() {
            Ok(n) => MenuInput::Choice(n),
            Err(_) => MenuInput::Invalid(line.to_string()),
        }
    }
}

/// Every method returns `Ok(None)` once input is exhausted.
pub trait Prompter {
    fn menu(&mut self, title: &str, options: &[(u32, &str)]) -> Result<Option<MenuInput>>;

    fn text(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Like [`Prompter::text`], hiding the input where the terminal allows.
    fn secret(&mut self, prompt: &str) -> Result<Option<String>>;

    fn say(&mut self, tone: Tone, message: &str) -> Result<()>;

    /// Run `work` while telling the operator something is happening.
    fn busy<T>(&mut self, _message: &str, work: impl FnOnce() -> T) -> T {
        work()
    }
}

fn eof_as_none<T>(result: std::io::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Interactive prompts for a real terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn menu(&mut self, title: &str, options: &[(u32, &str)]) -> Result<Option<MenuInput>> {
        let items: Vec<String> = options.iter().map(|(n, label)| format!("{n}. {label}")).collect();
        // `Select` shows a keyboard-navigable list in the terminal.
        let picked = eof_as_none(Select::new().with_prompt(title).items(&items).default(0).interact())?;
        Ok(picked.map(|idx| MenuInput::Choice(options[idx].0)))
    }

    fn text(&mut self, prompt: &str) -> Result<Option<String>> {
        eof_as_none(Input::<String>::new().with_prompt(prompt).allow_empty(true).interact_text())
    }

    fn secret(&mut self, prompt: &str) -> Result<Option<String>> {
        eof_as_none(Password::new().with_prompt(prompt).allow_empty_password(true).interact())
    }

    fn say(&mut self, tone: Tone, message: &str) -> Result<()> {
        match tone {
            Tone::Info => println!("{message}"),
            Tone::Success => println!("{}", message.green()),
            Tone::Error => println!("{}", message.red()),
        }
        Ok(())
    }

    fn busy<T>(&mut self, message: &str, work: impl FnOnce() -> T) -> T {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        let out = work();
        spinner.finish_and_clear();
        out
    }
}

/// Numbered menus and one answer per line, for non-interactive input.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}: ")?;
        self.output.flush()?;
        self.read_line()
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn menu(&mut self, title: &str, options: &[(u32, &str)]) -> Result<Option<MenuInput>> {
        writeln!(self.output, "\n===== {title} =====")?;
        for (n, label) in options {
            writeln!(self.output, "{n}. {label}")?;
        }
        let answer = self.ask("Choose an option")?;
        Ok(answer.map(|line| MenuInput::parse(&line)))
    }

    fn text(&mut self, prompt: &str) -> Result<Option<String>> {
        self.ask(prompt)
    }

    fn secret(&mut self, prompt: &str) -> Result<Option<String>> {
        self.ask(prompt)
    }

    fn say(&mut self, _tone: Tone, message: &str) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }
}
