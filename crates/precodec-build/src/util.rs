use proc_macro2::TokenStream;
use quote::quote;
use syn::WhereClause;

pub fn where_clause_with_bounds(
    where_clause: Option<&WhereClause>,
    bounds: &[TokenStream],
) -> TokenStream {
    if bounds.is_empty() {
        return where_clause.map_or_else(TokenStream::new, |wc| quote!(#wc));
    }

    let preds = where_clause.into_iter().flat_map(|wc| wc.predicates.iter());

    quote!(where #(#preds,)* #(#bounds),*)
}

/// Root of the runtime as seen from generated code.
pub fn runtime() -> TokenStream {
    quote!(::precodec::__internal::core)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_to_existing_predicates() {
        let wc: WhereClause = syn::parse_quote!(where T: Clone);
        let out = where_clause_with_bounds(Some(&wc), &[quote!(T: 'static)]);

        assert_eq!(out.to_string(), quote!(where T: Clone, T: 'static).to_string());
    }

    #[test]
    fn no_bounds_keeps_clause() {
        assert!(where_clause_with_bounds(None, &[]).is_empty());
    }
}
