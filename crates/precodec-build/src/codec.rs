use crate::{CodecBuilder, codec_slot, value_slot};
use precodec_schema::{
    field::{FieldDef, FieldStrategy},
    model::Construction,
};
use proc_macro2::TokenStream;
use quote::quote;

pub fn generate(builder: &CodecBuilder<'_>) -> TokenStream {
    let mut tokens = quote!();
    tokens.extend(definition(builder));
    tokens.extend(codec_impl(builder));

    tokens
}

// struct + constructor resolving every delegate once
fn definition(builder: &CodecBuilder<'_>) -> TokenStream {
    let rt = &builder.rt;
    let model = builder.model;
    let vis = &model.vis;
    let codec_ident = model.identity.codec_ident();
    let generics = &model.generics;
    let (impl_generics, ty_generics, _) = generics.split_for_impl();
    let model_ty = builder.model_ty();
    let struct_where = builder.struct_where();
    let impl_where = builder.impl_where();
    let doc = format!(" Generated codec for [`{}`].", model.identity.name());

    let slots = builder.delegates().map(|field| {
        let slot = codec_slot(field);
        let ty = &field.ty;

        quote! {
            #slot: ::std::sync::Arc<dyn #rt::codec::Codec<#ty>>
        }
    });

    let resolve = builder.delegates().map(|field| {
        let slot = codec_slot(field);
        let ty = &field.ty;

        quote! {
            #slot: registry.codec::<#ty>()?
        }
    });

    quote! {
        #[doc = #doc]
        #vis struct #codec_ident #generics #struct_where {
            #(#slots,)*
            _model: ::core::marker::PhantomData<fn() -> #model_ty>,
        }

        impl #impl_generics #codec_ident #ty_generics #impl_where {
            /// Resolve the nested codecs of every delegating field.
            #[allow(unused_variables)]
            #vis fn new(
                registry: &#rt::registry::Registry,
            ) -> ::core::result::Result<Self, #rt::error::ResolveError> {
                ::core::result::Result::Ok(Self {
                    #(#resolve,)*
                    _model: ::core::marker::PhantomData,
                })
            }
        }
    }
}

fn codec_impl(builder: &CodecBuilder<'_>) -> TokenStream {
    let rt = &builder.rt;
    let model = builder.model;
    let codec_ident = model.identity.codec_ident();
    let (impl_generics, ty_generics, _) = model.generics.split_for_impl();
    let model_ty = builder.model_ty();
    let impl_where = builder.impl_where();

    let write = write_body(builder);
    let read = match model.construction {
        Construction::Default => read_default(builder),
        Construction::Accumulate => read_accumulate(builder),
    };

    quote! {
        impl #impl_generics #rt::codec::Codec<#model_ty> for #codec_ident #ty_generics #impl_where {
            #[allow(unused_variables)]
            fn write(
                &self,
                writer: &mut #rt::stream::JsonWriter<'_>,
                value: &#model_ty,
            ) -> ::core::result::Result<(), #rt::error::StreamError> {
                #write
            }

            #[allow(unused_mut, clippy::match_single_binding)]
            fn read(
                &self,
                reader: &mut #rt::stream::JsonReader<'_>,
            ) -> ::core::result::Result<#model_ty, #rt::error::StreamError> {
                #read
            }
        }
    }
}

// begin, one name/value pair per field in declared order, end
fn write_body(builder: &CodecBuilder<'_>) -> TokenStream {
    let fields = builder.model.fields.iter().map(|field| {
        let member = &field.member;
        let name = field.canonical_name();
        let write = match &field.strategy {
            FieldStrategy::Delegate => {
                let slot = codec_slot(field);
                quote!(self.#slot.write(writer, &value.#member)?;)
            }
            FieldStrategy::With(path) => quote!(#path::write(writer, &value.#member)?;),
        };

        quote! {
            writer.name(#name)?;
            #write
        }
    });

    quote! {
        writer.begin_object()?;
        #(#fields)*
        writer.end_object()
    }
}

// expression reading one value for `field`
fn read_value(field: &FieldDef) -> TokenStream {
    match &field.strategy {
        FieldStrategy::Delegate => {
            let slot = codec_slot(field);
            quote!(self.#slot.read(reader)?)
        }
        FieldStrategy::With(path) => quote!(#path::read(reader)?),
    }
}

fn read_loop(arms: impl Iterator<Item = TokenStream>) -> TokenStream {
    quote! {
        reader.begin_object()?;
        while reader.has_next()? {
            match reader.next_name()?.as_str() {
                #(#arms)*
                _ => reader.skip_value()?,
            }
        }
        reader.end_object()?;
    }
}

fn read_default(builder: &CodecBuilder<'_>) -> TokenStream {
    let model_ty = builder.model_ty();

    let arms = builder.model.fields.iter().map(|field| {
        let member = &field.member;
        let names = field.names.iter();
        let value = read_value(field);

        quote! {
            #(#names)|* => {
                object.#member = #value;
            }
        }
    });
    let body = read_loop(arms);

    quote! {
        let mut object = <#model_ty as ::core::default::Default>::default();
        #body

        ::core::result::Result::Ok(object)
    }
}

fn read_accumulate(builder: &CodecBuilder<'_>) -> TokenStream {
    let model = builder.model;
    let ident = model.identity.ident();

    let slots = model.fields.iter().map(|field| {
        let slot = value_slot(field);
        let ty = &field.ty;

        quote! {
            let mut #slot: ::core::option::Option<#ty> = ::core::option::Option::None;
        }
    });

    let arms = model.fields.iter().map(|field| {
        let slot = value_slot(field);
        let names = field.names.iter();
        let value = read_value(field);

        quote! {
            #(#names)|* => {
                #slot = ::core::option::Option::Some(#value);
            }
        }
    });
    let body = read_loop(arms);

    let finish = model.fields.iter().map(|field| {
        let member = &field.member;
        let slot = value_slot(field);

        quote!(#member: #slot.unwrap_or_default())
    });
    let skipped = model.skipped.iter();

    quote! {
        #(#slots)*
        #body

        ::core::result::Result::Ok(#ident {
            #(#finish,)*
            #(#skipped: ::core::default::Default::default(),)*
        })
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use precodec_schema::{field::FieldDef, identity::TypeIdentity, model::ModelDef};

    fn person() -> ModelDef {
        ModelDef::builder(TypeIdentity::new("models", "Person"))
            .field(FieldDef::parse("name", "String").unwrap().alias("n"))
            .field(FieldDef::parse("age", "u32").unwrap())
            .build()
            .unwrap()
    }

    fn squash(tokens: &TokenStream) -> String {
        tokens.to_string().replace(' ', "")
    }

    #[test]
    fn writes_fields_in_declared_order() {
        let model = person();
        let out = squash(&write_body(&CodecBuilder::new(&model)));

        let name = out.find(r#"writer.name("name")"#).unwrap();
        let age = out.find(r#"writer.name("age")"#).unwrap();
        assert!(name < age);
        assert!(!out.contains(r#""n""#), "aliases are never written");
    }

    #[test]
    fn read_arm_lists_every_candidate() {
        let model = person();
        let out = squash(&read_default(&CodecBuilder::new(&model)));

        assert!(out.contains(r#""name"|"n"=>{object.name=self.name_codec.read(reader)?;}"#));
        assert!(out.contains("_=>reader.skip_value()?"));
    }

    #[test]
    fn with_fields_bypass_the_registry() {
        let model = ModelDef::builder(TypeIdentity::new("models", "Event"))
            .field(
                FieldDef::parse("at", "u64")
                    .unwrap()
                    .with_path("crate::unix")
                    .unwrap(),
            )
            .build()
            .unwrap();
        let builder = CodecBuilder::new(&model);

        assert!(squash(&write_body(&builder)).contains("crate::unix::write(writer,&value.at)?"));
        assert!(!squash(&definition(&builder)).contains("at_codec"));
    }

    #[test]
    fn accumulate_fills_skipped_members_with_default() {
        let model = ModelDef::builder(TypeIdentity::new("models", "Job"))
            .field(FieldDef::parse("id", "u64").unwrap())
            .skip("cache")
            .unwrap()
            .accumulate()
            .build()
            .unwrap();
        let out = squash(&read_accumulate(&CodecBuilder::new(&model)));

        assert!(out.contains("id:id_slot.unwrap_or_default()"));
        assert!(out.contains("cache:::core::default::Default::default()"));
    }
}
