use proc_macro::TokenStream;

mod map;

/// Builds a scalar from other scalars.
///
/// `map!(|a, &b| body)` clones `a` and `b` into a new `ScalarOf`. Every time that scalar is
/// evaluated, `a` and `b` are evaluated first and rebound to their values (`&b` binds a reference
/// to the value instead), then `body` yields the result. Failures of the arguments propagate, and
/// `body` may use `?` itself.
#[proc_macro]
pub fn map(input: TokenStream) -> TokenStream {
    map::map(input)
}
