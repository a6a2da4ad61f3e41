//! Specification tree and the depth-first runner.
//!
//! The tree is three levels deep and fully built before anything runs:
//!
//! ```text
//! Describe "Calculator"
//!   It "adds"
//!     Assertion (deferred matcher)
//!     Assertion (deferred matcher)
//!   It "bad math"
//!     Assertion (deferred matcher)
//! ```
//!
//! Running visits describes, its and assertions in declaration order and
//! evaluates every matcher exactly once. With `--verbose` the runner also
//! prints a progress tree to stderr:
//!
//! ```text
//! Calculator
//!   ✓ adds
//!   ✗ bad math
//!     expected `5` to be `6`
//! ```

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, trace};

use crate::error::{panic_message, SpecError};
use crate::matcher::{Matcher, Verdict};
use crate::report::Report;

// ============================================================================
// Tree types
// ============================================================================

/// A named group of examples.
pub(crate) struct Describe {
    pub(crate) name: String,
    pub(crate) its: Vec<It>,
}

/// A single named example.
pub(crate) struct It {
    pub(crate) name: String,
    pub(crate) assertions: Vec<Assertion>,
}

/// The leaf: one deferred matcher.
pub(crate) struct Assertion {
    pub(crate) matcher: Box<dyn Matcher>,
}

impl Describe {
    fn run(&self, config: &RunConfig, report: &mut Report) -> Result<(), SpecError> {
        debug!(describe = %self.name, its = self.its.len(), "running describe");
        if config.verbose {
            eprintln!("{}", bold(&self.name));
        }
        for it in &self.its {
            it.run(&self.name, config, report)?;
        }
        Ok(())
    }
}

impl It {
    fn run(&self, describe: &str, config: &RunConfig, report: &mut Report) -> Result<(), SpecError> {
        if !config.matches(describe, &self.name) {
            for _ in &self.assertions {
                report.skip();
            }
            return Ok(());
        }

        debug!(describe, it = %self.name, assertions = self.assertions.len(), "running it");
        let mut failures = Vec::new();
        for assertion in &self.assertions {
            match assertion.evaluate(describe, &self.name)? {
                Verdict::Pass => report.pass(),
                Verdict::Fail(message) => {
                    report.fail(format!("{describe} - {} - {message}", self.name));
                    failures.push(message);
                }
            }
        }

        if config.verbose {
            if self.assertions.is_empty() {
                eprintln!("  {} {}", yellow("-"), dim(&self.name));
            } else if failures.is_empty() {
                eprintln!("  {} {}", green("✓"), self.name);
            } else {
                eprintln!("  {} {}", red("✗"), red(&self.name));
                for message in &failures {
                    eprintln!("    {}", red(message));
                }
            }
        }
        Ok(())
    }
}

impl Assertion {
    fn evaluate(&self, describe: &str, it: &str) -> Result<Verdict, SpecError> {
        let verdict = catch_unwind(AssertUnwindSafe(|| self.matcher.evaluate())).map_err(|e| {
            SpecError::MatcherPanicked {
                describe: describe.to_string(),
                it: it.to_string(),
                message: panic_message(e.as_ref()),
            }
        })?;
        trace!(describe, it, pass = verdict.is_pass(), "assertion evaluated");
        Ok(verdict)
    }
}

// ============================================================================
// ANSI color helpers
// ============================================================================

fn use_color() -> bool {
    // Respect NO_COLOR env var (https://no-color.org/)
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

fn paint(code: &str, s: &str) -> String {
    if use_color() {
        format!("\x1b[{code}m{s}\x1b[0m")
    } else {
        s.to_string()
    }
}

fn green(s: &str) -> String {
    paint("32", s)
}

fn red(s: &str) -> String {
    paint("31", s)
}

fn yellow(s: &str) -> String {
    paint("33", s)
}

fn bold(s: &str) -> String {
    paint("1", s)
}

fn dim(s: &str) -> String {
    paint("2", s)
}

// ============================================================================
// Runner
// ============================================================================

/// Configuration parsed from command-line args.
#[derive(Debug, Default, Clone)]
pub struct RunConfig {
    /// Filter string — only evaluate examples whose `describe > it` path contains this.
    pub filter: Option<String>,
    /// Only list examples, don't evaluate them.
    pub list: bool,
    /// Print a progress tree to stderr.
    pub verbose: bool,
}

impl RunConfig {
    /// Parse from the process args (compatible with `cargo test -- <args>`).
    pub fn from_args() -> Self {
        Self::parse(std::env::args().skip(1))
    }

    /// Parse from an explicit argument list, without the binary name.
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = RunConfig::default();
        for arg in args {
            match arg.as_ref() {
                "--list" => config.list = true,
                "--verbose" | "-v" => config.verbose = true,
                arg if !arg.starts_with('-') => {
                    config.filter = Some(arg.to_string());
                }
                _ => {} // ignore unknown flags
            }
        }
        config
    }

    fn matches(&self, describe: &str, it: &str) -> bool {
        match &self.filter {
            Some(f) => path(describe, it).to_lowercase().contains(&f.to_lowercase()),
            None => true,
        }
    }
}

fn path(describe: &str, it: &str) -> String {
    format!("{describe} > {it}")
}

/// Evaluate every assertion in declaration order and collect the results.
///
/// Assertion failures never stop the traversal; a panicking matcher does.
pub(crate) fn run_tree(describes: &[Describe], config: &RunConfig) -> Result<Report, SpecError> {
    let mut report = Report::new();

    if config.list {
        list_tree(describes, config);
        return Ok(report);
    }

    debug!(describes = describes.len(), "running specification");
    for describe in describes {
        describe.run(config, &mut report)?;
    }
    debug!(
        passed = report.passed,
        failed = report.failed,
        skipped = report.skipped,
        "specification finished"
    );

    Ok(report)
}

fn list_tree(describes: &[Describe], config: &RunConfig) {
    for describe in describes {
        for it in &describe.its {
            if config.matches(&describe.name, &it.name) {
                println!("{}", path(&describe.name, &it.name));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{Be, Polarity};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn assertion(matcher: impl Matcher + 'static) -> Assertion {
        Assertion {
            matcher: Box::new(matcher),
        }
    }

    fn tree(order: &Rc<RefCell<Vec<&'static str>>>) -> Vec<Describe> {
        let record = |label: &'static str, pass: bool| {
            let order = Rc::clone(order);
            assertion(move || {
                order.borrow_mut().push(label);
                Verdict::check(pass, || format!("{label} failed"))
            })
        };
        vec![
            Describe {
                name: "A".into(),
                its: vec![
                    It {
                        name: "one".into(),
                        assertions: vec![record("a1", true), record("a2", false)],
                    },
                    It {
                        name: "empty".into(),
                        assertions: Vec::new(),
                    },
                ],
            },
            Describe {
                name: "B".into(),
                its: vec![It {
                    name: "two".into(),
                    assertions: vec![record("b1", false), record("b2", true)],
                }],
            },
        ]
    }

    #[test]
    fn test_visits_in_declaration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let report = run_tree(&tree(&order), &RunConfig::default()).unwrap();

        assert_eq!(*order.borrow(), vec!["a1", "a2", "b1", "b2"]);
        assert_eq!(report.passed, 2);
        assert_eq!(report.failed, 2);
        assert_eq!(
            report.failures,
            vec!["A - one - a2 failed".to_string(), "B - two - b1 failed".to_string()]
        );
    }

    #[test]
    fn test_filter_skips_without_evaluating() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let config = RunConfig::parse(["b > TWO"]);
        let report = run_tree(&tree(&order), &config).unwrap();

        assert_eq!(*order.borrow(), vec!["b1", "b2"]);
        assert_eq!(report.total(), 2);
        assert_eq!(report.skipped, 2);
    }

    #[test]
    fn test_list_evaluates_nothing() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let config = RunConfig::parse(["--list"]);
        let report = run_tree(&tree(&order), &config).unwrap();

        assert!(order.borrow().is_empty());
        assert_eq!(report.total(), 0);
    }

    #[test]
    fn test_panicking_matcher_aborts_run() {
        let describes = vec![Describe {
            name: "Boom".into(),
            its: vec![It {
                name: "explodes".into(),
                assertions: vec![
                    assertion(Be::new(1, 1, Polarity::Should)),
                    assertion(|| -> Verdict { panic!("kaboom") }),
                ],
            }],
        }];

        let err = run_tree(&describes, &RunConfig::default()).unwrap_err();
        match err {
            SpecError::MatcherPanicked { describe, it, message } => {
                assert_eq!(describe, "Boom");
                assert_eq!(it, "explodes");
                assert_eq!(message, "kaboom");
            }
        }
    }

    #[test]
    fn test_parse_args() {
        let config = RunConfig::parse(["--verbose", "--nocapture", "calc"]);
        assert!(config.verbose);
        assert!(!config.list);
        assert_eq!(config.filter.as_deref(), Some("calc"));

        let config = RunConfig::parse(Vec::<String>::new());
        assert!(config.filter.is_none());
    }
}
