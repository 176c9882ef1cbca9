use crate::CodecBuilder;
use proc_macro2::TokenStream;
use quote::quote;

pub fn generate(builder: &CodecBuilder<'_>) -> TokenStream {
    let mut tokens = quote!();
    tokens.extend(factory(builder));
    tokens.extend(codable(builder));

    tokens
}

// Claims exactly the model's own parameterization; anything else is a miss.
fn factory(builder: &CodecBuilder<'_>) -> TokenStream {
    let rt = &builder.rt;
    let model = builder.model;
    let vis = &model.vis;
    let codec_ident = model.identity.codec_ident();
    let factory_ident = model.identity.factory_ident();
    let generics = &model.generics;
    let (impl_generics, ty_generics, _) = generics.split_for_impl();
    let model_ty = builder.model_ty();
    let struct_where = builder.struct_where();
    let impl_where = builder.impl_where();

    quote! {
        #vis struct #factory_ident #generics #struct_where {
            _model: ::core::marker::PhantomData<fn() -> #model_ty>,
        }

        impl #impl_generics #factory_ident #ty_generics #struct_where {
            #[must_use]
            #vis const fn new() -> Self {
                Self {
                    _model: ::core::marker::PhantomData,
                }
            }
        }

        impl #impl_generics ::core::default::Default for #factory_ident #ty_generics #struct_where {
            fn default() -> Self {
                Self::new()
            }
        }

        impl #impl_generics #rt::registry::CodecFactory for #factory_ident #ty_generics #impl_where {
            fn create(
                &self,
                registry: &#rt::registry::Registry,
                token: &#rt::registry::TypeToken,
            ) -> ::core::option::Option<
                ::core::result::Result<#rt::codec::ErasedCodec, #rt::error::ResolveError>
            > {
                let own = #rt::registry::TypeToken::of::<#model_ty>();
                if token.raw_name() != own.raw_name() || *token != own {
                    return ::core::option::Option::None;
                }

                ::core::option::Option::Some(<#codec_ident #ty_generics>::new(registry).map(|codec| {
                    #rt::codec::ErasedCodec::new::<#model_ty>(::std::sync::Arc::new(codec))
                }))
            }
        }
    }
}

// static fallback used when no registered factory claims the model
fn codable(builder: &CodecBuilder<'_>) -> TokenStream {
    let rt = &builder.rt;
    let model = builder.model;
    let codec_ident = model.identity.codec_ident();
    let (impl_generics, ty_generics, _) = model.generics.split_for_impl();
    let model_ty = builder.model_ty();
    let impl_where = builder.impl_where();

    quote! {
        impl #impl_generics #rt::codec::Codable for #model_ty #impl_where {
            fn default_codec(
                registry: &#rt::registry::Registry,
            ) -> ::core::result::Result<
                ::std::sync::Arc<dyn #rt::codec::Codec<Self>>,
                #rt::error::ResolveError,
            > {
                let codec = <#codec_ident #ty_generics>::new(registry)?;

                ::core::result::Result::Ok(::std::sync::Arc::new(codec))
            }
        }
    }
}

///
/// TESTS
///
