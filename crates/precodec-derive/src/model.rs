use darling::{FromDeriveInput, FromField, ast::Data, util::Ignored};
use precodec_schema::{
    field::FieldDef,
    identity::TypeIdentity,
    model::{Construction, ModelDef},
};
use proc_macro2::{Ident, TokenStream};
use syn::{DeriveInput, Generics, Path, Type, Visibility};

///
/// CodecInput
///

#[derive(FromDeriveInput)]
#[darling(attributes(codec), supports(struct_named))]
struct CodecInput {
    ident: Ident,
    vis: Visibility,
    generics: Generics,
    data: Data<Ignored, CodecField>,

    #[darling(default)]
    accumulate: bool,

    #[darling(default)]
    namespace: Option<String>,
}

///
/// CodecField
///

#[derive(FromField)]
#[darling(attributes(codec))]
struct CodecField {
    ident: Option<Ident>,
    ty: Type,

    #[darling(default)]
    rename: Option<String>,

    #[darling(multiple)]
    alias: Vec<String>,

    #[darling(default)]
    skip: bool,

    #[darling(default)]
    with: Option<Path>,
}

pub fn derive_codec(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    let input = match CodecInput::from_derive_input(&input) {
        Ok(input) => input,
        Err(err) => return err.write_errors(),
    };

    let span = input.ident.span();
    let model = match model_def(input) {
        Ok(model) => model,
        Err(err) => return err.write_errors(),
    };

    precodec_build::generate(&model)
        .unwrap_or_else(|err| syn::Error::new(span, err.to_string()).to_compile_error())
}

fn model_def(input: CodecInput) -> darling::Result<ModelDef> {
    let identity = TypeIdentity::new(
        input.namespace.unwrap_or_default(),
        input.ident.to_string(),
    );
    let Data::Struct(body) = input.data else {
        return Err(darling::Error::unsupported_shape("enum"));
    };

    let mut fields = Vec::new();
    let mut skipped = Vec::new();

    for field in body.fields {
        let Some(member) = field.ident else {
            return Err(darling::Error::unsupported_shape("tuple struct"));
        };

        if field.skip {
            skipped.push(member);
            continue;
        }

        let mut def = FieldDef::new(member, field.ty);
        if let Some(name) = field.rename {
            def = def.rename(name);
        }
        for alias in field.alias {
            def = def.alias(alias);
        }
        if let Some(path) = field.with {
            def = def.with(path);
        }

        fields.push(def);
    }

    Ok(ModelDef {
        identity,
        vis: input.vis,
        generics: input.generics,
        fields,
        skipped,
        construction: if input.accumulate {
            Construction::Accumulate
        } else {
            Construction::Default
        },
    })
}
