use proc_macro::TokenStream as TokenStream1;
use proc_macro2::{Span, TokenStream};
use proc_macro_error::{abort, proc_macro_error};
use syn::*;
use template_quote::quote;

struct Constant {
    ident: Ident,
    description: Option<LitStr>,
}

fn take_description(attrs: &mut Vec<Attribute>) -> Option<LitStr> {
    let mut description = None;
    let mut err = None;
    attrs.retain(|a| {
        if !a.path().is_ident("description") {
            return true;
        }
        let lit = match &a.meta {
            Meta::List(list) => list.parse_args::<LitStr>().ok(),
            Meta::NameValue(MetaNameValue {
                value:
                    Expr::Lit(ExprLit {
                        lit: Lit::Str(s), ..
                    }),
                ..
            }) => Some(s.clone()),
            _ => None,
        };
        match (lit, description.is_some()) {
            (Some(lit), false) => description = Some(lit),
            (Some(_), true) => {
                err.get_or_insert((a.clone(), "duplicated #[description] attribute"));
            }
            (None, _) => {
                err.get_or_insert((
                    a.clone(),
                    "expected #[description(\"...\")] or #[description = \"...\"]",
                ));
            }
        }
        false
    });
    if let Some((attr, msg)) = err {
        abort!(attr, msg);
    }
    description
}

fn internal(krate: Path, mut input: ItemImpl) -> TokenStream {
    if let Some((_, trait_, _)) = &input.trait_ {
        abort!(trait_, "#[rich_enum] is only applicable on inherent impl blocks.");
    }
    let mut members = Vec::new();
    for item in &mut input.items {
        let ImplItem::Const(item) = item else {
            continue;
        };
        let description = take_description(&mut item.attrs);
        if let Visibility::Public(_) = &item.vis {
            members.push(Constant {
                ident: item.ident.clone(),
                description,
            });
        } else if description.is_some() {
            abort!(
                item.ident,
                "#[description] is only meaningful on `pub` constants."
            );
        }
    }
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();
    quote! {
        #input

        #[automatically_derived]
        impl #impl_generics #krate::RichEnum for #{&input.self_ty} #where_clause {
            fn declarations() -> ::std::vec::Vec<#krate::Declaration> {
                ::std::vec![
                    #(for Constant { ident, description } in &members) {
                        #krate::Declaration::new(#{ident.to_string()}, Self::#ident)
                        #(if let Some(description) = description) {
                            .with_description(#description)
                        },
                    }
                ]
            }
        }
    }
}

/// Implements `RichEnum` from the `pub const` items of an inherent impl block.
#[proc_macro_attribute]
#[proc_macro_error]
pub fn rich_enum(attr: TokenStream1, item: TokenStream1) -> TokenStream1 {
    let krate: Path = if attr.is_empty() {
        parse_quote!(::rich_enum)
    } else {
        parse(attr).unwrap_or_else(|_| {
            abort!(
                Span::call_site(),
                "expected a path to the rich_enum crate, like #[rich_enum(::rich_enum)]."
            )
        })
    };
    internal(
        krate,
        parse(item).unwrap_or_else(|_| {
            abort!(
                Span::call_site(),
                "#[rich_enum] is only applicable on inherent impl blocks."
            )
        }),
    )
    .into()
}
