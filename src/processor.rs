//! Batch orchestrator.
//!
//! Visits targets strictly in order. Each visit runs
//! `Pending -> LookedUp -> Choosing -> {Confirmed | SkippedByUser | NotFound}`
//! and a confirmed target then ends `Relocated` or `RelocationFailed`.
//! A quit, or a Ctrl-C observed at a checkpoint (before lookup, before choosing
//! and before moving), stops the batch; the current and remaining targets stay
//! un-visited.

use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::choice::{Choice, Chooser};
use crate::config::Configuration;
use crate::errors::MediaNameError;
use crate::output::{Output, Tone};
use crate::provider::Provider;
use crate::shutdown;
use crate::target::{Metadata, Target};

/// Re-prompts allowed when a chooser answers with an index that does not exist.
const MAX_CHOICE_ATTEMPTS: usize = 5;

/// Terminal disposition of a visited target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Moved (or would have been moved, under dry-run).
    Relocated { destination: PathBuf, dry_run: bool },
    RelocationFailed { reason: String },
    SkippedByUser,
    NotFound { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Relocated,
    RelocationFailed,
    SkippedByUser,
    NotFound,
}

impl Outcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Relocated { .. } => OutcomeKind::Relocated,
            Outcome::RelocationFailed { .. } => OutcomeKind::RelocationFailed,
            Outcome::SkippedByUser => OutcomeKind::SkippedByUser,
            Outcome::NotFound { .. } => OutcomeKind::NotFound,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Relocated { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub source: PathBuf,
    pub outcome: Outcome,
}

/// How the run went overall; only used to pick the summary color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    All,
    None,
    Partial,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Summary {
    /// Targets discovered for this run.
    pub total: usize,
    /// One record per visited target, in visit order.
    pub records: Vec<Record>,
    /// True if the operator (or a signal) ended the batch early.
    pub aborted: bool,
}

impl Summary {
    pub fn successes(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_success()).count()
    }

    pub fn visited(&self) -> usize {
        self.records.len()
    }

    pub fn unvisited(&self) -> usize {
        self.total.saturating_sub(self.visited())
    }

    pub fn count(&self, kind: OutcomeKind) -> usize {
        self.records.iter().filter(|r| r.outcome.kind() == kind).count()
    }

    pub fn grade(&self) -> Grade {
        match self.successes() {
            0 => Grade::None,
            n if n == self.total => Grade::All,
            _ => Grade::Partial,
        }
    }

    pub fn message(&self) -> String {
        format!("{} out of {} files moved successfully", self.successes(), self.total)
    }
}

enum Step {
    Done(Outcome),
    Abort,
}

pub struct Processor<'a, P, C> {
    config: &'a Configuration,
    provider: P,
    chooser: C,
    out: Output,
}

impl<'a, P: Provider, C: Chooser> Processor<'a, P, C> {
    pub fn new(config: &'a Configuration, provider: P, chooser: C, out: Output) -> Self {
        Self {
            config,
            provider,
            chooser,
            out,
        }
    }

    /// Process every target in order and return the summary.
    pub fn run(&mut self, targets: &mut [Target]) -> Summary {
        let mut summary = Summary {
            total: targets.len(),
            ..Default::default()
        };
        self.out.heading("Starting medianame");

        for target in targets.iter_mut() {
            if self.config.flag("debug") {
                self.print_fields(target);
            }
            self.out.banner(&format!(
                "Processing {} \"{}\"",
                capitalize(target.media().as_str()),
                target.source.filename
            ));

            match self.process(target) {
                Step::Done(outcome) => {
                    debug!(file = %target.source.filename, outcome = ?outcome.kind(), "Target finished");
                    summary.records.push(Record {
                        source: target.source.path.clone(),
                        outcome,
                    });
                }
                Step::Abort => {
                    summary.aborted = true;
                    break;
                }
            }
        }

        info!(
            total = summary.total,
            visited = summary.visited(),
            succeeded = summary.successes(),
            aborted = summary.aborted,
            "Batch finished"
        );
        summary
    }

    fn process(&mut self, target: &mut Target) -> Step {
        if shutdown::is_requested() {
            return self.interrupted();
        }

        let hits = self.config.integer("hits").unwrap_or(0) as usize;
        let candidates = match target.lookup(&self.provider, hits) {
            Ok(c) => c,
            Err(e) => {
                if e.is_lookup() {
                    info!(code = e.code(), kind = e.kind(), file = %target.source.filename, "No match");
                } else {
                    warn!(code = e.code(), kind = e.kind(), file = %target.source.filename, error = %e, "Provider failed");
                }
                self.out.bullet(&format!("NOT FOUND: {e}"), Tone::Caution);
                return Step::Done(Outcome::NotFound { reason: e.to_string() });
            }
        };

        if shutdown::is_requested() {
            return self.interrupted();
        }

        let chosen = if self.config.flag("batch") {
            0
        } else {
            match self.choose(target, &candidates) {
                Choice::Pick(i) => i,
                Choice::Skip => {
                    self.out.bullet("SKIPPING as per user request", Tone::Caution);
                    return Step::Done(Outcome::SkippedByUser);
                }
                Choice::Quit => {
                    self.out.bullet("EXITING as per user request", Tone::Bad);
                    return Step::Abort;
                }
            }
        };

        if shutdown::is_requested() {
            return self.interrupted();
        }

        let candidate = candidates[chosen].clone();
        let destination = match target.confirm(candidate, self.config) {
            Ok(dest) => dest.to_path_buf(),
            Err(e) => {
                warn!(code = e.code(), kind = e.kind(), file = %target.source.filename, error = %e, "Could not compute destination");
                self.out.bullet(&format!("FAILED: {e}"), Tone::Bad);
                return Step::Done(Outcome::RelocationFailed { reason: e.to_string() });
            }
        };
        self.out.bullet(&format!("moving to {}", destination.display()), Tone::Plain);

        let dry_run = self.config.flag("test");
        match target.relocate(self.config) {
            Ok(written) => {
                if written != destination {
                    self.out.bullet(&format!("renamed to {}", written.display()), Tone::Caution);
                }
                self.out.bullet(if dry_run { "OK! (dry run)" } else { "OK!" }, Tone::Good);
                Step::Done(Outcome::Relocated {
                    destination: written,
                    dry_run,
                })
            }
            Err(e) => {
                warn!(code = e.code(), kind = e.kind(), error = %e, "Relocation failed");
                self.out.bullet(&format!("FAILED: {e}"), Tone::Bad);
                Step::Done(Outcome::RelocationFailed { reason: e.to_string() })
            }
        }
    }

    fn interrupted(&self) -> Step {
        let e = MediaNameError::Interrupted;
        warn!(code = e.code(), kind = e.kind(), "Stopping batch");
        self.out.bullet("EXITING on interrupt", Tone::Bad);
        Step::Abort
    }

    /// Ask the chooser, re-entering the choice when it names a candidate that does not exist.
    fn choose(&mut self, target: &Target, candidates: &[Metadata]) -> Choice {
        for _ in 0..MAX_CHOICE_ATTEMPTS {
            match self.chooser.choose(target, candidates) {
                Choice::Pick(i) if i >= candidates.len() => {
                    warn!(index = i, available = candidates.len(), "Chooser picked a missing candidate");
                }
                choice => return choice,
            }
        }
        Choice::Skip
    }

    fn print_fields(&self, target: &Target) {
        let fields = serde_json::to_value(&target.guess)
            .ok()
            .and_then(|v| v.as_object().cloned())
            .unwrap_or_default();
        self.out.key_values(
            &target.source.filename,
            fields.iter().map(|(k, v)| (k.as_str(), v)),
        );
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Print the closing summary line colored by grade.
pub fn print_summary(out: &Output, summary: &Summary) {
    let tone = match summary.grade() {
        Grade::All => Tone::Good,
        Grade::None => Tone::Bad,
        Grade::Partial => Tone::Caution,
    };
    out.line(&format!("\n{}", summary.message()), tone);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(outcome: Outcome) -> Record {
        Record {
            source: PathBuf::from("/x"),
            outcome,
        }
    }

    #[test]
    fn grades() {
        let ok = || record(Outcome::Relocated { destination: PathBuf::from("/y"), dry_run: false });
        let mut s = Summary { total: 2, records: vec![ok(), ok()], aborted: false };
        assert_eq!(s.grade(), Grade::All);
        s.records[1] = record(Outcome::SkippedByUser);
        assert_eq!(s.grade(), Grade::Partial);
        s.records[0] = record(Outcome::NotFound { reason: "x".into() });
        assert_eq!(s.grade(), Grade::None);
        assert_eq!(s.message(), "0 out of 2 files moved successfully");
    }

    #[test]
    fn unvisited_counts_remainder() {
        let s = Summary { total: 5, records: vec![record(Outcome::SkippedByUser)], aborted: true };
        assert_eq!(s.visited(), 1);
        assert_eq!(s.unvisited(), 4);
        assert_eq!(s.count(OutcomeKind::SkippedByUser), 1);
    }

    #[test]
    fn capitalize_media() {
        assert_eq!(capitalize("television"), "Television");
    }
}
