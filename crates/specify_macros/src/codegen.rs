//! Code generation — transforms the DSL AST into `specify` builder calls.

use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};

use crate::dsl::*;

/// Expression evaluating to a `specify::Specification`.
pub fn generate_spec(suite: &Suite) -> TokenStream {
    let describes: Vec<TokenStream> = suite.describes.iter().map(generate_describe).collect();
    quote! {
        {
            let mut __specify_spec = specify::Specification::new();
            #(#describes)*
            __specify_spec
        }
    }
}

/// `fn main()` that builds the specification and runs it.
pub fn generate_main(suite: &Suite) -> TokenStream {
    let spec = generate_spec(suite);
    quote! {
        fn main() {
            let __specify_spec: specify::Specification = #spec;
            __specify_spec.run();
        }
    }
}

fn generate_describe(block: &DescribeBlock) -> TokenStream {
    let name = &block.name;
    let its: Vec<TokenStream> = block.its.iter().map(generate_it).collect();
    quote! {
        __specify_spec.describe(#name, |__specify_describe| {
            #(#its)*
        });
    }
}

fn generate_it(block: &ItBlock) -> TokenStream {
    let name = &block.name;
    let items: Vec<TokenStream> = block
        .items
        .iter()
        .map(|item| match item {
            ItItem::That(that) => generate_that(that),
            ItItem::Stmt(stmt) => quote! { #stmt },
        })
        .collect();
    quote! {
        __specify_describe.it(#name, |__specify_it| {
            #(#items)*
        });
    }
}

/// The `that` call carries the span of the `that` keyword so the recorded
/// caller location points into the user's source.
fn generate_that(that: &ThatStmt) -> TokenStream {
    let value = &that.value;
    let verb = &that.verb;
    let args = &that.args;
    let polarity = if that.negated {
        quote! { should_not }
    } else {
        quote! { should }
    };
    quote_spanned! {that.that.span()=>
        __specify_it.that(#value).#polarity().#verb(#(#args),*);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(src: &str) -> String {
        let suite: Suite = syn::parse_str(src).unwrap();
        generate_spec(&suite).to_string()
    }

    #[test]
    fn test_generates_builder_calls() {
        let out = expand(
            r#"
            describe "Calculator" {
                it "adds" {
                    that (1 + 1) should be 2;
                    that ("a") should_not be "b";
                }
            }
            "#,
        );

        assert!(out.contains("specify :: Specification :: new ()"), "{out}");
        assert!(out.contains(r#"describe ("Calculator""#), "{out}");
        assert!(out.contains(r#"it ("adds""#), "{out}");
        assert!(out.contains("that (1 + 1) . should () . be (2)"), "{out}");
        assert!(out.contains(r#"that ("a") . should_not () . be ("b")"#), "{out}");
    }

    #[test]
    fn test_passes_statements_through() {
        let out = expand(r#"describe "D" { it "i" { let x = 3; that (x) should be 3; } }"#);
        let let_pos = out.find("let x = 3").unwrap();
        let that_pos = out.find("that (x)").unwrap();
        assert!(let_pos < that_pos);
    }

    #[test]
    fn test_main_wraps_run() {
        let suite: Suite = syn::parse_str(r#"describe "D" {}"#).unwrap();
        let out = generate_main(&suite).to_string();
        assert!(out.starts_with("fn main ()"), "{out}");
        assert!(out.contains("__specify_spec . run ()"), "{out}");
    }
}
