use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{parse_macro_input, Attribute, FnArg, Ident, ItemFn, LitStr, Pat, PathArguments, Type};

struct Input {
    ident: Ident,
    /// Name of the local holding this argument inside the generated body.
    local: Ident,
    ty: Type,
    state: bool,
}

pub fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let name = if attr.is_empty() {
        None
    } else {
        Some(parse_macro_input!(attr as LitStr))
    };
    let func = parse_macro_input!(item as ItemFn);

    match expand_handler(name, func) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand_handler(name: Option<LitStr>, mut func: ItemFn) -> syn::Result<TokenStream2> {
    if let Some(receiver) = func.sig.receiver() {
        return Err(syn::Error::new_spanned(
            receiver,
            "#[handler] needs a free function; pass shared state with #[state] parameters",
        ));
    }
    if !func.sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &func.sig.generics,
            "#[handler] functions cannot be generic",
        ));
    }

    let mut inputs = Vec::new();
    for arg in func.sig.inputs.iter_mut() {
        let FnArg::Typed(pat_type) = arg else {
            continue;
        };
        let state = take_state_attr(&mut pat_type.attrs);
        let ident = match &*pat_type.pat {
            Pat::Ident(pat_ident) if pat_ident.subpat.is_none() => pat_ident.ident.clone(),
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "#[handler] parameters must be plain identifiers; the name is what gets bound",
                ))
            }
        };
        let local = format_ident!("__arg{}", inputs.len());
        inputs.push(Input {
            ident,
            local,
            ty: (*pat_type.ty).clone(),
            state,
        });
    }

    let fn_ident = &func.sig.ident;
    let vis = &func.vis;
    let ctor_ident = format_ident!("{}_handler", fn_ident.unraw());
    let handler_name = name
        .map(|n| n.value())
        .unwrap_or_else(|| fn_ident.unraw().to_string());

    let declared: Vec<String> = inputs
        .iter()
        .filter(|i| !i.state)
        .map(|i| {
            let name = i.ident.unraw().to_string();
            if is_option(&i.ty) {
                format!("{}?", name)
            } else {
                name
            }
        })
        .collect();

    let state_params = inputs.iter().filter(|i| i.state).map(|i| {
        let ident = &i.ident;
        let ty = &i.ty;
        quote! { #ident: #ty }
    });
    // Positional locals: a parameter may share the function's name, and
    // names like `_id` must not turn into non-snake-case identifiers.
    let state_clones = inputs.iter().filter(|i| i.state).map(|i| {
        let ident = &i.ident;
        let local = &i.local;
        quote! { let #local = ::core::clone::Clone::clone(&#ident); }
    });
    let bound_lets = inputs.iter().filter(|i| !i.state).enumerate().map(|(idx, i)| {
        let local = &i.local;
        let ty = &i.ty;
        quote! { let #local: #ty = __args.take(#idx)?; }
    });
    let call_args = inputs.iter().map(|i| &i.local);
    let await_call = if func.sig.asyncness.is_some() {
        quote! { .await }
    } else {
        quote! {}
    };
    let args_binding = if declared.is_empty() {
        quote! { __args }
    } else {
        quote! { mut __args }
    };

    let doc = format!(
        "Route handler for [`{}`], binding `({})`.",
        fn_ident,
        declared.join(", ")
    );

    Ok(quote! {
        #func

        #[doc = #doc]
        #vis fn #ctor_ident(#(#state_params),*) -> ::concept_router::Handler {
            ::concept_router::Handler::new(
                #handler_name,
                &[#(#declared),*] as &[&str],
                move |#args_binding: ::concept_router::BoundArgs| {
                    #(#state_clones)*
                    async move {
                        #(#bound_lets)*
                        ::concept_router::IntoHandlerResult::into_handler_result(
                            #fn_ident(#(#call_args),*) #await_call
                        )
                    }
                },
            )
        }
    })
}

/// Remove `#[state]` from a parameter's attributes, reporting whether it was there.
fn take_state_attr(attrs: &mut Vec<Attribute>) -> bool {
    let before = attrs.len();
    attrs.retain(|attr| !attr.path().is_ident("state"));
    attrs.len() != before
}

fn is_option(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => type_path
            .path
            .segments
            .last()
            .map(|seg| {
                seg.ident == "Option" && matches!(seg.arguments, PathArguments::AngleBracketed(_))
            })
            .unwrap_or(false),
        Type::Group(group) => is_option(&group.elem),
        Type::Paren(paren) => is_option(&paren.elem),
        _ => false,
    }
}
