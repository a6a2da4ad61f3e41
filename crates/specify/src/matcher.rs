//! Deferred matchers — the verbs attached to a `that` assertion.
//!
//! A matcher owns the subject value and whatever it compares against. Nothing
//! is evaluated when the matcher is attached; the runner calls
//! [`Matcher::evaluate`] exactly once per assertion during a run.
//!
//! New verbs only need to implement [`Matcher`]. The runner never looks past
//! the trait, so adding a verb never touches traversal.

use std::any::Any;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::fmt::Debug;
use std::hash::{BuildHasher, Hash};

// ============================================================================
// Capability
// ============================================================================

/// Outcome of evaluating one matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    /// Failure with a message such as ``expected `5` to be `6` ``.
    Fail(String),
}

impl Verdict {
    /// Pass if `passed`, otherwise fail with the lazily built message.
    pub fn check(passed: bool, message: impl FnOnce() -> String) -> Self {
        if passed {
            Verdict::Pass
        } else {
            Verdict::Fail(message())
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

/// A deferred comparison.
///
/// Implementations must be pure: evaluating the same matcher twice yields the
/// same verdict.
pub trait Matcher {
    fn evaluate(&self) -> Verdict;
}

impl<F> Matcher for F
where
    F: Fn() -> Verdict,
{
    fn evaluate(&self) -> Verdict {
        self()
    }
}

/// Which way a verb is read: `should()` or `should_not()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Should,
    ShouldNot,
}

impl Polarity {
    /// Apply this polarity to the raw match result.
    pub fn holds(self, matched: bool) -> bool {
        match self {
            Polarity::Should => matched,
            Polarity::ShouldNot => !matched,
        }
    }

    /// `"to"` or `"not to"`, for building failure messages.
    pub fn to(self) -> &'static str {
        match self {
            Polarity::Should => "to",
            Polarity::ShouldNot => "not to",
        }
    }
}

/// Render a value for a failure message. Strings and chars print bare,
/// everything else through `Debug`.
pub fn render<V: Debug + 'static>(value: &V) -> String {
    let any = value as &dyn Any;
    if let Some(s) = any.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = any.downcast_ref::<String>() {
        s.clone()
    } else if let Some(c) = any.downcast_ref::<char>() {
        c.to_string()
    } else {
        format!("{value:?}")
    }
}

fn expectation<A, E>(actual: &A, polarity: Polarity, verb: &str, expected: &E) -> String
where
    A: Debug + 'static,
    E: Debug + 'static,
{
    format!(
        "expected `{}` {} {verb} `{}`",
        render(actual),
        polarity.to(),
        render(expected)
    )
}

// ============================================================================
// Be
// ============================================================================

/// Equality through `PartialEq`. Aggregates compare structurally.
pub struct Be<T, E> {
    actual: T,
    expected: E,
    polarity: Polarity,
}

impl<T, E> Be<T, E> {
    pub fn new(actual: T, expected: E, polarity: Polarity) -> Self {
        Be {
            actual,
            expected,
            polarity,
        }
    }
}

impl<T, E> Matcher for Be<T, E>
where
    T: PartialEq<E> + Debug + 'static,
    E: Debug + 'static,
{
    fn evaluate(&self) -> Verdict {
        let matched = self.actual == self.expected;
        Verdict::check(self.polarity.holds(matched), || {
            expectation(&self.actual, self.polarity, "be", &self.expected)
        })
    }
}

// ============================================================================
// Ordering
// ============================================================================

/// `be_greater_than` / `be_less_than`.
///
/// Incomparable pairs (NaN) never match, so the negated form passes.
pub struct Compare<T, E> {
    actual: T,
    bound: E,
    ordering: Ordering,
    polarity: Polarity,
}

impl<T, E> Compare<T, E> {
    pub fn greater_than(actual: T, bound: E, polarity: Polarity) -> Self {
        Compare {
            actual,
            bound,
            ordering: Ordering::Greater,
            polarity,
        }
    }

    pub fn less_than(actual: T, bound: E, polarity: Polarity) -> Self {
        Compare {
            actual,
            bound,
            ordering: Ordering::Less,
            polarity,
        }
    }
}

impl<T, E> Matcher for Compare<T, E>
where
    T: PartialOrd<E> + Debug + 'static,
    E: Debug + 'static,
{
    fn evaluate(&self) -> Verdict {
        let matched = self.actual.partial_cmp(&self.bound) == Some(self.ordering);
        let verb = match self.ordering {
            Ordering::Greater => "be greater than",
            _ => "be less than",
        };
        Verdict::check(self.polarity.holds(matched), || {
            expectation(&self.actual, self.polarity, verb, &self.bound)
        })
    }
}

// ============================================================================
// Contain
// ============================================================================

/// Collections that can answer membership for `contain`.
pub trait Contains<E> {
    fn contains_item(&self, item: &E) -> bool;
}

impl<T: PartialEq<E>, E> Contains<E> for Vec<T> {
    fn contains_item(&self, item: &E) -> bool {
        self.iter().any(|x| x == item)
    }
}

impl<T: PartialEq<E>, E, const N: usize> Contains<E> for [T; N] {
    fn contains_item(&self, item: &E) -> bool {
        self.iter().any(|x| x == item)
    }
}

impl<'s, T: PartialEq<E>, E> Contains<E> for &'s [T] {
    fn contains_item(&self, item: &E) -> bool {
        self.iter().any(|x| x == item)
    }
}

impl<T: Eq + Hash, S: BuildHasher> Contains<T> for HashSet<T, S> {
    fn contains_item(&self, item: &T) -> bool {
        self.contains(item)
    }
}

impl<T: Ord> Contains<T> for BTreeSet<T> {
    fn contains_item(&self, item: &T) -> bool {
        self.contains(item)
    }
}

impl Contains<char> for String {
    fn contains_item(&self, item: &char) -> bool {
        self.contains(*item)
    }
}

impl<'a> Contains<&'a str> for String {
    fn contains_item(&self, item: &&'a str) -> bool {
        self.contains(*item)
    }
}

impl<'s> Contains<char> for &'s str {
    fn contains_item(&self, item: &char) -> bool {
        str::contains(self, *item)
    }
}

impl<'s, 'a> Contains<&'a str> for &'s str {
    fn contains_item(&self, item: &&'a str) -> bool {
        str::contains(self, *item)
    }
}

pub struct Contain<T, E> {
    actual: T,
    item: E,
    polarity: Polarity,
}

impl<T, E> Contain<T, E> {
    pub fn new(actual: T, item: E, polarity: Polarity) -> Self {
        Contain {
            actual,
            item,
            polarity,
        }
    }
}

impl<T, E> Matcher for Contain<T, E>
where
    T: Contains<E> + Debug + 'static,
    E: Debug + 'static,
{
    fn evaluate(&self) -> Verdict {
        let matched = self.actual.contains_item(&self.item);
        Verdict::check(self.polarity.holds(matched), || {
            expectation(&self.actual, self.polarity, "contain", &self.item)
        })
    }
}

// ============================================================================
// Satisfy
// ============================================================================

/// An arbitrary predicate with a human description, e.g. `"be even"`.
pub struct Satisfy<T, F> {
    actual: T,
    description: String,
    predicate: F,
    polarity: Polarity,
}

impl<T, F> Satisfy<T, F> {
    pub fn new(actual: T, description: impl Into<String>, predicate: F, polarity: Polarity) -> Self {
        Satisfy {
            actual,
            description: description.into(),
            predicate,
            polarity,
        }
    }
}

impl<T, F> Matcher for Satisfy<T, F>
where
    T: Debug + 'static,
    F: Fn(&T) -> bool,
{
    fn evaluate(&self) -> Verdict {
        let matched = (self.predicate)(&self.actual);
        Verdict::check(self.polarity.holds(matched), || {
            format!(
                "expected `{}` {} {}",
                render(&self.actual),
                self.polarity.to(),
                self.description
            )
        })
    }
}

// ============================================================================
// googletest adapter
// ============================================================================

/// Adapts a googletest matcher, e.g. `gt(&3)` or `contains_substring("ell")`.
#[cfg(feature = "googletest")]
pub struct MatchThat<T, M> {
    actual: T,
    matcher: M,
    polarity: Polarity,
}

#[cfg(feature = "googletest")]
impl<T, M> MatchThat<T, M> {
    pub fn new(actual: T, matcher: M, polarity: Polarity) -> Self {
        MatchThat {
            actual,
            matcher,
            polarity,
        }
    }
}

#[cfg(feature = "googletest")]
impl<T, M> Matcher for MatchThat<T, M>
where
    T: Debug + 'static,
    M: for<'a> googletest::matcher::Matcher<&'a T>,
{
    fn evaluate(&self) -> Verdict {
        use googletest::matcher::MatcherResult;

        let matched = self.matcher.matches(&self.actual).is_match();
        Verdict::check(self.polarity.holds(matched), || {
            format!(
                "expected `{}` {} match: {}",
                render(&self.actual),
                self.polarity.to(),
                self.matcher.describe(MatcherResult::Match)
            )
        })
    }
}
