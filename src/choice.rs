//! Interactive choice surface.
//!
//! A `Chooser` is shown a target and its candidates and answers with a pick, an
//! explicit skip of this one target, or a request to quit the whole batch.

use std::io::{self, BufRead, Write};

use crate::target::{Metadata, Target};

/// Operator decision for one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Zero-based index into the candidate list.
    Pick(usize),
    Skip,
    Quit,
}

pub trait Chooser {
    fn choose(&mut self, target: &Target, candidates: &[Metadata]) -> Choice;
}

impl<C: Chooser + ?Sized> Chooser for &mut C {
    fn choose(&mut self, target: &Target, candidates: &[Metadata]) -> Choice {
        (**self).choose(target, candidates)
    }
}

impl<C: Chooser + ?Sized> Chooser for Box<C> {
    fn choose(&mut self, target: &Target, candidates: &[Metadata]) -> Choice {
        (**self).choose(target, candidates)
    }
}

/// Always takes the top candidate; used for non-interactive runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoChooser;

impl Chooser for AutoChooser {
    fn choose(&mut self, _target: &Target, candidates: &[Metadata]) -> Choice {
        if candidates.is_empty() {
            Choice::Skip
        } else {
            Choice::Pick(0)
        }
    }
}

/// Prompts on a line-oriented terminal.
///
/// Accepts a 1-based number, an empty line for the first candidate, `s` to
/// skip and `q` to quit. End of input counts as quit; anything else re-prompts.
pub struct TerminalChooser<R, W> {
    input: R,
    output: W,
}

impl TerminalChooser<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalChooser<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn prompt(&mut self, candidates: &[Metadata]) -> io::Result<Option<String>> {
        for (i, candidate) in candidates.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i + 1, candidate)?;
        }
        write!(self.output, "  [1-{}], [s]kip, [q]uit (default 1): ", candidates.len())?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_ascii_lowercase()))
    }
}

/// Interpret one line of operator input.
pub fn parse_answer(answer: &str, count: usize) -> Option<Choice> {
    match answer {
        "" => (count > 0).then_some(Choice::Pick(0)),
        "s" | "skip" => Some(Choice::Skip),
        "q" | "quit" | "exit" => Some(Choice::Quit),
        n => n
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=count).contains(n))
            .map(|n| Choice::Pick(n - 1)),
    }
}

impl<R: BufRead, W: Write> Chooser for TerminalChooser<R, W> {
    fn choose(&mut self, target: &Target, candidates: &[Metadata]) -> Choice {
        if candidates.is_empty() {
            return Choice::Skip;
        }
        loop {
            match self.prompt(candidates) {
                Ok(Some(answer)) => match parse_answer(&answer, candidates.len()) {
                    Some(choice) => return choice,
                    None => {
                        let _ = writeln!(self.output, "  invalid selection '{answer}' for {target}");
                    }
                },
                Ok(None) => return Choice::Quit,
                Err(e) => {
                    tracing::warn!(error = %e, "terminal input failed; quitting");
                    return Choice::Quit;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use std::io::Cursor;

    fn target() -> Target {
        Target::new("/tmp/Alien.1979.mkv", &Configuration::default())
    }

    fn candidates() -> Vec<Metadata> {
        vec![Metadata::movie("Alien", Some(1979)), Metadata::movie("Aliens", Some(1986))]
    }

    #[test]
    fn answers() {
        assert_eq!(parse_answer("", 2), Some(Choice::Pick(0)));
        assert_eq!(parse_answer("2", 2), Some(Choice::Pick(1)));
        assert_eq!(parse_answer("s", 2), Some(Choice::Skip));
        assert_eq!(parse_answer("q", 2), Some(Choice::Quit));
        assert_eq!(parse_answer("3", 2), None);
        assert_eq!(parse_answer("0", 2), None);
    }

    #[test]
    fn invalid_input_reprompts() {
        let mut chooser = TerminalChooser::new(Cursor::new("7\nxyz\n2\n"), Vec::new());
        assert_eq!(chooser.choose(&target(), &candidates()), Choice::Pick(1));
        let shown = String::from_utf8(chooser.into_output()).unwrap();
        assert_eq!(shown.matches("1. Alien (1979)").count(), 3);
        assert!(shown.contains("invalid selection '7'"));
    }

    #[test]
    fn end_of_input_quits() {
        let mut chooser = TerminalChooser::new(Cursor::new(""), Vec::new());
        assert_eq!(chooser.choose(&target(), &candidates()), Choice::Quit);
    }

    #[test]
    fn auto_takes_top_candidate() {
        assert_eq!(AutoChooser.choose(&target(), &candidates()), Choice::Pick(0));
    }
}
