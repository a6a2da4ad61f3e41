//! Proc macros for the `specify` behavior-specification DSL.

mod codegen;
mod dsl;

/// Build a `specify::Specification` from a describe/it/that DSL.
///
/// Expands to an expression; nothing is evaluated until the specification
/// is executed or run.
///
/// # Example
///
/// ```text
/// let spec = specify::spec! {
///     describe "Calculator" {
///         it "adds" {
///             let sum = 1 + 1;
///             that (sum) should be 2;
///             that (sum) should_not be 3;
///         }
///
///         it "compares" {
///             that (3) should be_greater_than 2;
///             that (vec![1, 2, 3]) should contain 2;
///             that (4) should satisfy "be even", |n| n % 2 == 0;
///         }
///     }
/// };
/// spec.run();
/// ```
///
/// # Grammar
///
/// - `describe "name" { ... }` — top level only; describes do not nest
/// - `it "name" { ... }` — inside a `describe`
/// - `that (<expr>) should <verb> <args>;` / `that (<expr>) should_not <verb> <args>;`
///   — expands to `.that(<expr>).should().<verb>(<args>)`, so any verb
///   method works, including ones added by extension traits
/// - any other statement inside `it` is passed through unchanged and runs
///   while the specification is declared
///
/// Subjects and expected values are stored until the run and must be
/// `'static`. Borrow from a local and the expansion fails to compile;
/// pass an owned value instead (`that (name.clone()) should be "ada";`).
#[proc_macro]
pub fn spec(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let suite = syn::parse_macro_input!(input as dsl::Suite);
    codegen::generate_spec(&suite).into()
}

/// Generate `fn main()` that builds the specification and runs it.
///
/// Use in a test target with `harness = false`.
///
/// In `Cargo.toml`:
/// ```toml
/// [[test]]
/// name = "calculator_spec"
/// harness = false
/// ```
///
/// In your test file:
/// ```text
/// specify::specify! {
///     describe "Calculator" {
///         it "adds" { that (2 + 3) should be 5; }
///     }
/// }
/// ```
///
/// The process exits with status 1 if any assertion failed and 2 if a
/// matcher panicked.
#[proc_macro]
pub fn specify(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let suite = syn::parse_macro_input!(input as dsl::Suite);
    codegen::generate_main(&suite).into()
}
