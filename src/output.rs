use owo_colors::OwoColorize;
use serde_json::Value;
use std::fmt::Display;

/// Consistent, optionally colored user-facing messages.
///
/// Color is decided once at construction from the `nocolor` preference and
/// whether stdout is a TTY; nothing here reads process-wide state afterwards.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    color: bool,
}

/// Tone of a plain line, mapped to a color when color is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Good,
    Caution,
    Bad,
}

impl Output {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Color only when requested and stdout is a terminal.
    pub fn for_terminal(nocolor: bool) -> Self {
        Self::new(!nocolor && atty::is(atty::Stream::Stdout))
    }

    pub fn color_enabled(&self) -> bool {
        self.color
    }

    pub fn info(&self, msg: &str) {
        if self.color {
            println!("{} {}", "info:".cyan().bold(), msg);
        } else {
            println!("info: {}", msg);
        }
    }

    pub fn warn(&self, msg: &str) {
        if self.color {
            eprintln!("{} {}", "warn:".yellow().bold(), msg);
        } else {
            eprintln!("warn: {}", msg);
        }
    }

    pub fn error(&self, msg: &str) {
        if self.color {
            eprintln!("{} {}", "error:".red().bold(), msg);
        } else {
            eprintln!("error: {}", msg);
        }
    }

    /// Bold, underlined section heading.
    pub fn heading(&self, msg: &str) {
        if self.color {
            println!("{}", msg.bold().underline());
        } else {
            println!("{}", msg);
        }
    }

    /// Bold line introducing a target.
    pub fn banner(&self, msg: &str) {
        if self.color {
            println!("\n{}", msg.bold());
        } else {
            println!("\n{}", msg);
        }
    }

    /// Indented bullet line under the current target.
    pub fn bullet(&self, msg: &str, tone: Tone) {
        println!("  - {}", self.paint(msg, tone));
    }

    /// Plain line in the given tone (summary lines).
    pub fn line(&self, msg: &str, tone: Tone) {
        println!("{}", self.paint(msg, tone));
    }

    /// Titled listing of displayable items.
    pub fn listing<T: Display>(&self, title: &str, items: impl IntoIterator<Item = T>) {
        self.heading(&format!("\n{title}:"));
        let mut any = false;
        for item in items {
            any = true;
            println!("  - {item}");
        }
        if !any {
            println!("  None");
        }
    }

    /// Titled listing of key/value pairs, values rendered as compact JSON.
    pub fn key_values<'a>(&self, title: &str, entries: impl IntoIterator<Item = (&'a str, &'a Value)>) {
        self.listing(title, entries.into_iter().map(|(k, v)| format!("{k}: {v}")));
    }

    fn paint(&self, msg: &str, tone: Tone) -> String {
        if !self.color {
            return msg.to_string();
        }
        match tone {
            Tone::Plain => msg.to_string(),
            Tone::Good => msg.green().to_string(),
            Tone::Caution => msg.yellow().to_string(),
            Tone::Bad => msg.red().to_string(),
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new(false)
    }
}
