//! Declaration API — Specification, DescribeScope, ItScope, and `run()`.
//!
//! Declaring only builds the tree. Every `that` captures its value and a
//! matcher, and nothing is compared until the specification is executed.

use std::fmt::Debug;
use std::panic::Location;

use tracing::debug;

use crate::error::{SpecError, UsageError};
use crate::matcher::{Be, Compare, Contain, Contains, Matcher, Polarity, Satisfy};
use crate::report::Report;
use crate::runner::{self, Assertion, Describe, It, RunConfig};

// ============================================================================
// Specification — the top-level registry
// ============================================================================

/// An ordered collection of `describe` scopes.
///
/// # Example
///
/// ```rust,no_run
/// let mut spec = specify::Specification::new();
/// spec.describe("Calculator", |d| {
///     d.it("adds", |t| {
///         t.that(1 + 1).should().be(2);
///     });
/// });
/// spec.run();
/// ```
#[derive(Default)]
pub struct Specification {
    describes: Vec<Describe>,
}

impl Specification {
    pub fn new() -> Self {
        Specification::default()
    }

    /// Declare a named group of examples.
    ///
    /// `body` receives a handle to the new scope and is called immediately.
    /// Describes do not nest.
    pub fn describe(&mut self, name: &str, body: impl FnOnce(&mut DescribeScope)) {
        let mut scope = DescribeScope {
            name: name.to_string(),
            its: Vec::new(),
        };
        body(&mut scope);
        debug!(describe = name, its = scope.its.len(), "declared describe");
        self.describes.push(Describe {
            name: scope.name,
            its: scope.its,
        });
    }

    /// Number of assertions declared so far.
    pub fn assertion_count(&self) -> usize {
        self.describes
            .iter()
            .flat_map(|d| &d.its)
            .map(|it| it.assertions.len())
            .sum()
    }

    /// Evaluate every assertion and return the report.
    ///
    /// Consumes the specification: a tree runs once.
    pub fn execute(self, config: &RunConfig) -> Result<Report, SpecError> {
        runner::run_tree(&self.describes, config)
    }

    /// Execute with args from the command line, print the summary, and exit
    /// with a non-zero status if anything failed.
    pub fn run(self) {
        let config = RunConfig::from_args();
        let result = self.execute(&config);
        match &result {
            Ok(report) if !config.list => println!("{}", report.summary()),
            Ok(_) => {}
            Err(err) => eprintln!("{err}"),
        }
        let code = exit_code(&result);
        if code != 0 {
            std::process::exit(code);
        }
    }
}

/// Process status for a finished run: 0 when everything passed, 1 when any
/// assertion failed, 2 when the run was aborted.
fn exit_code(result: &Result<Report, SpecError>) -> i32 {
    match result {
        Ok(report) if report.is_success() => 0,
        Ok(_) => 1,
        Err(_) => 2,
    }
}

// ============================================================================
// Scopes
// ============================================================================

/// Handle passed to a `describe` body.
pub struct DescribeScope {
    name: String,
    its: Vec<It>,
}

impl DescribeScope {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare a named example.
    ///
    /// # Panics
    ///
    /// Panics with [`UsageError::MissingVerb`] if any `that` in `body` never
    /// had a matcher verb attached.
    pub fn it(&mut self, name: &str, body: impl FnOnce(&mut ItScope)) {
        let mut scope = ItScope {
            name: name.to_string(),
            slots: Vec::new(),
        };
        body(&mut scope);
        let it = scope.seal(&self.name);
        self.its.push(it);
    }
}

struct Slot {
    matcher: Option<Box<dyn Matcher>>,
    location: &'static Location<'static>,
}

/// Handle passed to an `it` body.
pub struct ItScope {
    name: String,
    slots: Vec<Slot>,
}

impl ItScope {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start an assertion about `value`. Attach a verb with
    /// `.should()` or `.should_not()`.
    ///
    /// The value is kept until the run, so verbs require it (and the
    /// expected value) to be `'static`. Borrowed data must be owned or
    /// cloned first: `t.that(name.clone())`, not `t.that(name.as_str())`.
    #[track_caller]
    pub fn that<T>(&mut self, value: T) -> That<'_, T> {
        let index = self.slots.len();
        self.slots.push(Slot {
            matcher: None,
            location: Location::caller(),
        });
        That {
            slot: &mut self.slots[index],
            value,
        }
    }

    /// Attach a ready-made matcher as its own assertion.
    #[track_caller]
    pub fn expect(&mut self, matcher: impl Matcher + 'static) {
        self.slots.push(Slot {
            matcher: Some(Box::new(matcher)),
            location: Location::caller(),
        });
    }

    fn seal(self, describe: &str) -> It {
        let mut assertions = Vec::with_capacity(self.slots.len());
        for slot in self.slots {
            match slot.matcher {
                Some(matcher) => assertions.push(Assertion { matcher }),
                None => panic!(
                    "{}",
                    UsageError::MissingVerb {
                        describe: describe.to_string(),
                        it: self.name.clone(),
                        location: slot.location,
                    }
                ),
            }
        }
        It {
            name: self.name,
            assertions,
        }
    }
}

// ============================================================================
// That / Should — verb builders
// ============================================================================

/// An assertion waiting for its polarity.
#[must_use = "a `that` needs a matcher verb, e.g. `.should().be(..)`"]
pub struct That<'s, T> {
    slot: &'s mut Slot,
    value: T,
}

impl<'s, T> That<'s, T> {
    pub fn should(self) -> Should<'s, T> {
        Should {
            slot: self.slot,
            value: self.value,
            polarity: Polarity::Should,
        }
    }

    pub fn should_not(self) -> Should<'s, T> {
        Should {
            slot: self.slot,
            value: self.value,
            polarity: Polarity::ShouldNot,
        }
    }
}

/// An assertion waiting for its verb.
///
/// Custom verbs can be added with an extension trait that calls
/// [`Should::verb`].
#[must_use = "call a matcher verb, e.g. `.be(..)`"]
pub struct Should<'s, T> {
    slot: &'s mut Slot,
    value: T,
    polarity: Polarity,
}

impl<'s, T: Debug + 'static> Should<'s, T> {
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Attach a matcher built from the subject value and polarity.
    pub fn verb<M: Matcher + 'static>(self, build: impl FnOnce(T, Polarity) -> M) {
        self.slot.matcher = Some(Box::new(build(self.value, self.polarity)));
    }

    pub fn be<E>(self, expected: E)
    where
        T: PartialEq<E>,
        E: Debug + 'static,
    {
        self.verb(|value, polarity| Be::new(value, expected, polarity));
    }

    pub fn be_greater_than<E>(self, bound: E)
    where
        T: PartialOrd<E>,
        E: Debug + 'static,
    {
        self.verb(|value, polarity| Compare::greater_than(value, bound, polarity));
    }

    pub fn be_less_than<E>(self, bound: E)
    where
        T: PartialOrd<E>,
        E: Debug + 'static,
    {
        self.verb(|value, polarity| Compare::less_than(value, bound, polarity));
    }

    pub fn contain<E>(self, item: E)
    where
        T: Contains<E>,
        E: Debug + 'static,
    {
        self.verb(|value, polarity| Contain::new(value, item, polarity));
    }

    /// `that(4).should().satisfy("be even", |n| n % 2 == 0)`
    pub fn satisfy(self, description: &str, predicate: impl Fn(&T) -> bool + 'static) {
        let description = description.to_string();
        self.verb(|value, polarity| Satisfy::new(value, description, predicate, polarity));
    }

    /// Match with a googletest matcher: `that(5).should().match_that(gt(&3))`.
    #[cfg(feature = "googletest")]
    pub fn match_that<M>(self, matcher: M)
    where
        M: for<'a> googletest::matcher::Matcher<&'a T> + 'static,
    {
        self.verb(|value, polarity| crate::matcher::MatchThat::new(value, matcher, polarity));
    }
}

// ============================================================================
// run() — entry point
// ============================================================================

/// Build and run a specification.
///
/// Call it from `fn main()` in a test target with `harness = false`.
///
/// ```rust,no_run
/// fn main() {
///     specify::run(|spec| {
///         spec.describe("Calculator", |d| {
///             d.it("adds", |t| t.that(2 + 3).should().be(5));
///         });
///     });
/// }
/// ```
pub fn run(body: impl FnOnce(&mut Specification)) {
    let mut spec = Specification::new();
    body(&mut spec);
    spec.run();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::Verdict;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn execute(spec: Specification) -> Report {
        spec.execute(&RunConfig::default()).unwrap()
    }

    #[test]
    fn test_declaration_does_not_evaluate() {
        use std::cell::Cell;
        use std::rc::Rc;

        let calls = Rc::new(Cell::new(0));
        let mut spec = Specification::new();
        spec.describe("Lazy", |d| {
            d.it("waits", |t| {
                let calls = Rc::clone(&calls);
                t.that(1).should().satisfy("be counted", move |_| {
                    calls.set(calls.get() + 1);
                    true
                });
            });
        });

        assert_eq!(calls.get(), 0);
        let report = execute(spec);
        assert_eq!(calls.get(), 1);
        assert_eq!(report.passed, 1);
    }

    #[test]
    fn test_missing_verb_panics_at_declaration() {
        let mut spec = Specification::new();
        let result = catch_unwind(AssertUnwindSafe(|| {
            spec.describe("Calculator", |d| {
                d.it("forgets", |t| {
                    let _ = t.that(5);
                });
            });
        }));

        let payload = result.unwrap_err();
        let message = crate::error::panic_message(payload.as_ref());
        assert!(message.contains("`Calculator - forgets`"), "{message}");
        assert!(message.contains("spec.rs"), "{message}");
    }

    #[test]
    fn test_missing_verb_after_should_panics() {
        let mut spec = Specification::new();
        let result = catch_unwind(AssertUnwindSafe(|| {
            spec.describe("Calculator", |d| {
                d.it("half done", |t| {
                    let _ = t.that(5).should();
                });
            });
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_expect_accepts_custom_matcher() {
        let mut spec = Specification::new();
        spec.describe("Custom", |d| {
            d.it("closure", |t| {
                t.expect(|| Verdict::Fail("always".into()));
            });
        });
        let report = execute(spec);
        assert_eq!(report.failures, vec!["Custom - closure - always".to_string()]);
    }

    #[test]
    fn test_verb_extension() {
        trait BeEmpty {
            fn be_empty(self);
        }

        impl<'s> BeEmpty for Should<'s, Vec<i32>> {
            fn be_empty(self) {
                self.verb(|value, polarity| {
                    move || {
                        Verdict::check(polarity.holds(value.is_empty()), || {
                            format!("expected `{value:?}` {} be empty", polarity.to())
                        })
                    }
                });
            }
        }

        let mut spec = Specification::new();
        spec.describe("Vec", |d| {
            d.it("empty", |t| {
                t.that(Vec::<i32>::new()).should().be_empty();
                t.that(vec![1]).should_not().be_empty();
                t.that(vec![2]).should().be_empty();
                t.that(Vec::<i32>::new()).should_not().be_empty();
            });
        });
        let report = execute(spec);
        assert_eq!(report.passed, 2);
        assert_eq!(
            report.failures,
            vec![
                "Vec - empty - expected `[2]` to be empty".to_string(),
                "Vec - empty - expected `[]` not to be empty".to_string(),
            ]
        );
    }

    #[test]
    fn test_exit_code_success() {
        let mut spec = Specification::new();
        spec.describe("Calculator", |d| {
            d.it("adds", |t| t.that(1 + 1).should().be(2));
        });
        assert_eq!(exit_code(&spec.execute(&RunConfig::default())), 0);

        let empty = Specification::new();
        assert_eq!(exit_code(&empty.execute(&RunConfig::default())), 0);
    }

    #[test]
    fn test_exit_code_on_failure() {
        let mut spec = Specification::new();
        spec.describe("Calculator", |d| {
            d.it("adds", |t| t.that(1 + 1).should().be(2));
            d.it("bad math", |t| t.that(5).should().be(6));
        });
        let result = spec.execute(&RunConfig::default());
        assert_eq!(result.as_ref().map(|r| r.failed).ok(), Some(1));
        assert_eq!(exit_code(&result), 1);
    }

    #[test]
    fn test_exit_code_on_fatal_error() {
        let mut spec = Specification::new();
        spec.describe("Fragile", |d| {
            d.it("explodes", |t| t.expect(|| -> Verdict { panic!("kaboom") }));
        });
        let result = spec.execute(&RunConfig::default());
        assert!(result.is_err());
        assert_eq!(exit_code(&result), 2);
    }

    #[test]
    fn test_listing_exits_cleanly() {
        let mut spec = Specification::new();
        spec.describe("Calculator", |d| {
            d.it("bad math", |t| t.that(5).should().be(6));
        });
        let result = spec.execute(&RunConfig::parse(["--list"]));
        assert_eq!(exit_code(&result), 0);
    }

    #[test]
    fn test_assertion_count() {
        let mut spec = Specification::new();
        spec.describe("A", |d| {
            d.it("one", |t| {
                t.that(1).should().be(1);
                t.that(2).should_not().be(1);
            });
            d.it("none", |_| {});
        });
        spec.describe("B", |d| {
            d.it("two", |t| t.that("x").should().be("x"));
        });
        assert_eq!(spec.assertion_count(), 3);
        assert_eq!(execute(spec).total(), 3);
    }

    #[test]
    fn test_scope_names() {
        let mut spec = Specification::new();
        spec.describe("Outer", |d| {
            assert_eq!(d.name(), "Outer");
            d.it("inner", |t| assert_eq!(t.name(), "inner"));
        });
    }
}
