//! Procedural macros for the pairtest harness.
//!
//! - `wrap!`: pairs a function with its `<name>_test` function by naming convention and runs it through a harness.

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::{parse_macro_input, Expr, ExprPath, PathArguments, Token};

/// Wrap a function with its paired test function.
///
/// The paired test is the function named `<name>_test`, resolved in the lexical scope of the macro call. A missing
/// pair is therefore a compile error rather than a runtime diagnostic; use `Harness::wrap` with a `TestScope` when the
/// pair may legitimately be absent.
///
/// Forms:
/// - `wrap!(harness, add)` runs through an existing harness (any expression yielding `Harness` or `&mut Harness`).
/// - `wrap!(add)` runs through a fresh `Harness::new()`, configured from the environment.
/// - `wrap!(harness, add as fn(i32, i32) -> i32)` coerces the target first, for paired tests written against a
///   concrete function-pointer type.
///
/// # Example
/// ```ignore
/// fn add(a: i32, b: i32) -> i32 { a + b }
///
/// fn add_test(t: &mut TestSession, add: &impl Fn(i32, i32) -> i32) -> TestFnResult {
///     t.equal(add(2, 3), 5)?;
///     Ok(())
/// }
///
/// // Expands to:
/// //     (harness).wrap_with("add", add, add_test)
/// let add = wrap!(harness, add)?;
/// ```
#[proc_macro]
pub fn wrap(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as WrapInput);
    match expand_wrap(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

struct WrapInput {
    harness: Option<Expr>,
    target: Expr,
}

impl Parse for WrapInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let first: Expr = input.parse()?;
        if input.is_empty() {
            return Ok(Self {
                harness: None,
                target: first,
            });
        }

        input.parse::<Token![,]>()?;
        if input.is_empty() {
            return Ok(Self {
                harness: None,
                target: first,
            });
        }

        let target: Expr = input.parse()?;
        let _trailing: Option<Token![,]> = input.parse()?;
        if !input.is_empty() {
            return Err(input.error("expected `wrap!(harness, function)` or `wrap!(function)`"));
        }

        Ok(Self {
            harness: Some(first),
            target,
        })
    }
}

fn expand_wrap(input: WrapInput) -> syn::Result<proc_macro2::TokenStream> {
    let target_path = function_path(&input.target)?;
    let last = target_path
        .path
        .segments
        .last()
        .ok_or_else(|| syn::Error::new_spanned(target_path, "wrap! expects a function name"))?;

    let name = last.ident.unraw().to_string();

    // `add` -> `add_test`, keeping the call-site span so the pair resolves where `wrap!` was written.
    let mut pair = target_path.clone();
    if let Some(seg) = pair.path.segments.last_mut() {
        seg.ident = format_ident!("{}_test", name, span = seg.ident.span());
        seg.arguments = PathArguments::None;
    }

    let harness = match &input.harness {
        Some(expr) => quote! { (#expr) },
        None => quote! { ::pairtest::Harness::new() },
    };
    let target = &input.target;

    Ok(quote! {
        #harness.wrap_with(#name, #target, #pair)
    })
}

/// Find the function path inside the target expression, looking through casts and parentheses.
fn function_path(expr: &Expr) -> syn::Result<&ExprPath> {
    match expr {
        Expr::Path(path) => Ok(path),
        Expr::Cast(cast) => function_path(&cast.expr),
        Expr::Paren(paren) => function_path(&paren.expr),
        Expr::Group(group) => function_path(&group.expr),
        other => Err(syn::Error::new_spanned(
            other,
            "wrap! expects a function path such as `add` or `math::add`",
        )),
    }
}
