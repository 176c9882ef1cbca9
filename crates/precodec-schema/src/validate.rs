use crate::{error::SchemaError, model::ModelDef};
use std::collections::{BTreeSet, HashMap};
use syn::{GenericParam, ext::IdentExt};

/// Check that a model can be emitted as a codec.
///
/// Every wire name (canonical or alias) must map to exactly one field, since
/// the read procedure dispatches on the name alone.
pub fn validate_model(model: &ModelDef) -> Result<(), SchemaError> {
    let path = model.identity.path();

    model.identity.validate()?;

    if model
        .generics
        .params
        .iter()
        .any(|param| matches!(param, GenericParam::Lifetime(_)))
    {
        return Err(SchemaError::Lifetime { model: path });
    }

    let mut members = BTreeSet::new();
    let all_members = model
        .fields
        .iter()
        .map(|field| field.member_name())
        .chain(model.skipped.iter().map(|ident| ident.unraw().to_string()));
    for member in all_members {
        if !members.insert(member.clone()) {
            return Err(SchemaError::DuplicateMember {
                model: path,
                member,
            });
        }
    }

    let mut claimed: HashMap<&str, String> = HashMap::new();
    for field in &model.fields {
        let member = field.member_name();

        for name in field.names.iter() {
            if name.is_empty() {
                return Err(SchemaError::EmptyName { model: path, member });
            }
            if let Some(first) = claimed.insert(name.as_str(), member.clone()) {
                return Err(SchemaError::DuplicateAlias {
                    model: path,
                    name: name.clone(),
                    first,
                    second: member,
                });
            }
        }
    }

    Ok(())
}

///
/// TESTS
///
