extern crate proc_macro;

use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use syn::{parse_macro_input, Data, DeriveInput, Fields, Index};

/// Derives `scanraster::barycentric::Interpolate` by interpolating every field independently.
#[proc_macro_derive(Interpolate)]
pub fn interpolate_derive(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    if input.generics.lt_token.is_some() || input.generics.where_clause.is_some() {
        return quote!(compile_error!(
            "generics and where clauses are not supported"
        ))
        .into();
    }

    let Data::Struct(structure) = input.data else {
        return quote!(compile_error!("only structs are supported")).into();
    };

    let ident = input.ident;
    let body = match structure.fields {
        Fields::Named(fields) => {
            let inits = fields.named.iter().map(|field| {
                let name = &field.ident;
                let value = interpolate_field(quote!(#name));
                quote!(#name: #value)
            });
            quote!(#ident { #(#inits),* })
        }
        Fields::Unnamed(fields) => {
            let inits = (0..fields.unnamed.len())
                .map(|i| interpolate_field(Index::from(i).into_token_stream()));
            quote!(#ident(#(#inits),*))
        }
        Fields::Unit => quote!(#ident),
    };

    quote! {
        impl ::scanraster::barycentric::Interpolate for #ident {
            #[inline]
            fn interpolate(
                a: &Self,
                b: &Self,
                c: &Self,
                bar: ::scanraster::barycentric::Barycentric,
            ) -> Self {
                #body
            }
        }
    }
    .into()
}

fn interpolate_field(member: TokenStream) -> TokenStream {
    quote! {
        ::scanraster::barycentric::Interpolate::interpolate(&a.#member, &b.#member, &c.#member, bar)
    }
}
