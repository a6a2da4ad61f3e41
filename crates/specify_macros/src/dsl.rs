//! DSL AST types and `syn::parse::Parse` implementations.
//!
//! ```text
//! describe "name" {
//!     it "name" {
//!         let x = 1;                      // passed through
//!         that (x + 1) should be 2;       // assertion
//!         that (x) should_not be 3;
//!     }
//! }
//! ```

use proc_macro2::Delimiter;
use syn::parse::{Parse, ParseStream};
use syn::{braced, parenthesized, Expr, Ident, LitStr, Result, Stmt, Token};

// ============================================================================
// AST types
// ============================================================================

/// Top-level suite — a list of describe blocks.
#[derive(Debug)]
pub struct Suite {
    pub describes: Vec<DescribeBlock>,
}

/// `describe "name" { it ... }`
#[derive(Debug)]
pub struct DescribeBlock {
    pub name: LitStr,
    pub its: Vec<ItBlock>,
}

/// `it "name" { ... }`
#[derive(Debug)]
pub struct ItBlock {
    pub name: LitStr,
    pub items: Vec<ItItem>,
}

/// One statement inside an `it` body.
#[derive(Debug)]
pub enum ItItem {
    That(ThatStmt),
    Stmt(Stmt),
}

/// `that (value) should|should_not verb args,*;`
#[derive(Debug)]
pub struct ThatStmt {
    pub that: Ident,
    pub value: Expr,
    pub negated: bool,
    pub verb: Ident,
    pub args: Vec<Expr>,
}

// ============================================================================
// Parsing
// ============================================================================

impl Parse for Suite {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut describes = Vec::new();
        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            match ident.to_string().as_str() {
                "describe" => describes.push(parse_describe_block(input)?),
                "it" => {
                    return Err(syn::Error::new(
                        ident.span(),
                        "`it` must be declared inside a `describe` block",
                    ))
                }
                "that" => {
                    return Err(syn::Error::new(
                        ident.span(),
                        "`that` must be declared inside an `it` block",
                    ))
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown DSL keyword `{other}`. Expected `describe`"),
                    ))
                }
            }
        }
        Ok(Suite { describes })
    }
}

/// Parse: `"name" { it ... }`
fn parse_describe_block(input: ParseStream) -> Result<DescribeBlock> {
    let name: LitStr = input.parse()?;
    let content;
    braced!(content in input);

    let mut its = Vec::new();
    while !content.is_empty() {
        let ident: Ident = content.parse()?;
        match ident.to_string().as_str() {
            "it" => its.push(parse_it_block(&content)?),
            "describe" => {
                return Err(syn::Error::new(
                    ident.span(),
                    "nested `describe` blocks are not supported; declare each `describe` at the top level",
                ))
            }
            other => {
                return Err(syn::Error::new(
                    ident.span(),
                    format!("expected `it` inside `describe`, found `{other}`"),
                ))
            }
        }
    }
    Ok(DescribeBlock { name, its })
}

/// Parse: `"name" { items... }`
fn parse_it_block(input: ParseStream) -> Result<ItBlock> {
    let name: LitStr = input.parse()?;
    let content;
    braced!(content in input);

    let mut items = Vec::new();
    while !content.is_empty() {
        if peek_that(&content) {
            items.push(ItItem::That(content.parse()?));
        } else {
            items.push(ItItem::Stmt(content.parse()?));
        }
    }
    Ok(ItBlock { name, items })
}

/// `that` followed by a parenthesized group starts an assertion.
fn peek_that(input: ParseStream) -> bool {
    input.cursor().ident().is_some_and(|(ident, rest)| {
        ident == "that" && rest.group(Delimiter::Parenthesis).is_some()
    })
}

impl Parse for ThatStmt {
    fn parse(input: ParseStream) -> Result<Self> {
        let that: Ident = input.parse()?;
        let value_content;
        parenthesized!(value_content in input);
        let value: Expr = value_content.parse()?;

        let polarity: Ident = input.parse().map_err(|e| {
            syn::Error::new(e.span(), "expected `should` or `should_not` after `that (..)`")
        })?;
        let negated = match polarity.to_string().as_str() {
            "should" => false,
            "should_not" => true,
            other => {
                return Err(syn::Error::new(
                    polarity.span(),
                    format!("expected `should` or `should_not`, found `{other}`"),
                ))
            }
        };

        let verb: Ident = input.parse().map_err(|e| {
            syn::Error::new(e.span(), "expected a matcher verb such as `be`")
        })?;

        let mut args = Vec::new();
        while !input.peek(Token![;]) {
            if input.is_empty() {
                return Err(input.error("expected `;` after `that` assertion"));
            }
            args.push(input.parse::<Expr>()?);
            if !input.peek(Token![;]) {
                input.parse::<Token![,]>()?;
            }
        }
        input.parse::<Token![;]>()?;

        Ok(ThatStmt {
            that,
            value,
            negated,
            verb,
            args,
        })
    }
}
