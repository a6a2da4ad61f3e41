//! # specify — a minimal describe/it/that behavior-specification DSL
//!
//! Declare named `describe` groups of `it` examples, each holding deferred
//! `that` assertions, then run them all and get a pass/fail report.
//!
//! ## Quick example
//!
//! ```rust,no_run
//! fn main() {
//!     specify::run(|spec| {
//!         spec.describe("Calculator", |d| {
//!             d.it("adds", |t| {
//!                 t.that(1 + 1).should().be(2);
//!                 t.that(2 + 2).should_not().be(5);
//!             });
//!
//!             d.it("compares", |t| {
//!                 t.that(3).should().be_greater_than(2);
//!                 t.that(vec![1, 2, 3]).should().contain(2);
//!             });
//!         });
//!     });
//! }
//! ```
//!
//! Output:
//!
//! ```text
//! Passed: 4 Failed: 0 Total: 4
//! ```
//!
//! Nothing is compared while declaring. Each `that` captures its value and
//! a [`Matcher`]; [`Specification::run`] evaluates every matcher once, in
//! declaration order, prints the summary and exits non-zero on failure.
//!
//! ## Features
//!
//! - `macros` (default) — the [`spec!`] and [`specify!`] DSL macros
//! - `googletest` — `Should::match_that` and a re-export of googletest matchers via `specify::matchers`

mod error;
pub mod matcher;
pub mod report;
pub mod runner;
mod spec;

pub use error::{SpecError, UsageError};
pub use matcher::{Contains, Matcher, Polarity, Verdict};
pub use report::Report;
pub use runner::RunConfig;
pub use spec::{run, DescribeScope, ItScope, Should, Specification, That};

#[cfg(feature = "macros")]
pub use specify_macros::{spec, specify};

/// Re-export of the [`googletest`] crate. Available with the `googletest` feature.
#[cfg(feature = "googletest")]
pub use googletest;

/// Composable matchers re-exported from [`googletest::prelude`].
#[cfg(feature = "googletest")]
pub mod matchers {
    pub use googletest::prelude::*;
}
