use serial_test::serial;
use std::fs;
use tempfile::tempdir;

use medianame::errors::Result;
use medianame::output::Output;
use medianame::{shutdown, Choice, Chooser, Configuration, Metadata, ParsedNameProvider, Processor, Provider, Query, Target};

/// Picks the top candidate and requests shutdown as a side effect, like Ctrl-C at the prompt.
struct InterruptOnChoice;

impl Chooser for InterruptOnChoice {
    fn choose(&mut self, _target: &Target, _candidates: &[Metadata]) -> Choice {
        shutdown::request();
        Choice::Pick(0)
    }
}

/// Answers normally but requests shutdown while the search is running.
struct InterruptDuringLookup;

impl Provider for InterruptDuringLookup {
    fn search(&self, query: &Query) -> Result<Vec<Metadata>> {
        shutdown::request();
        ParsedNameProvider.search(query)
    }
}

/// Counts how often the operator would have been prompted.
#[derive(Default)]
struct CountingChooser(usize);

impl Chooser for CountingChooser {
    fn choose(&mut self, _target: &Target, _candidates: &[Metadata]) -> Choice {
        self.0 += 1;
        Choice::Pick(0)
    }
}

fn targets(root: &std::path::Path, cfg: &Configuration) -> Vec<Target> {
    for name in ["Heat.1995.mkv", "Ronin.1998.mkv"] {
        fs::write(root.join(name), name).unwrap();
    }
    Target::populate_paths(&[root], cfg).unwrap()
}

#[test]
#[serial]
fn interrupt_before_start_visits_nothing() {
    let td = tempdir().unwrap();
    let cfg = Configuration::new([("batch", serde_json::json!(true))]).unwrap();
    let mut targets = targets(td.path(), &cfg);

    shutdown::request();
    let summary = Processor::new(&cfg, ParsedNameProvider, InterruptOnChoice, Output::default())
        .run(&mut targets);
    shutdown::reset();

    assert!(summary.aborted);
    assert_eq!(summary.visited(), 0);
    assert_eq!(summary.unvisited(), 2);
    assert!(targets.iter().all(|t| t.source.path.exists()));
}

#[test]
#[serial]
fn interrupt_during_choice_skips_relocation() {
    let td = tempdir().unwrap();
    let cfg = Configuration::default();
    let mut targets = targets(td.path(), &cfg);

    let summary = Processor::new(&cfg, ParsedNameProvider, InterruptOnChoice, Output::default())
        .run(&mut targets);
    shutdown::reset();

    assert!(summary.aborted);
    assert_eq!(summary.visited(), 0);
    assert!(targets.iter().all(|t| t.source.path.exists()));
    assert!(!td.path().join("Heat (1995).mkv").exists());
}

#[test]
#[serial]
fn interrupt_during_lookup_never_prompts() {
    let td = tempdir().unwrap();
    let cfg = Configuration::default();
    let mut targets = targets(td.path(), &cfg);

    let mut chooser = CountingChooser::default();
    let summary = Processor::new(&cfg, InterruptDuringLookup, &mut chooser, Output::default())
        .run(&mut targets);
    shutdown::reset();

    assert!(summary.aborted);
    assert_eq!(summary.visited(), 0);
    assert_eq!(chooser.0, 0);
    assert!(targets.iter().all(|t| t.source.path.exists()));
}
