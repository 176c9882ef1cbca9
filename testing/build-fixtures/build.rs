use precodec_build::schema::{
    SchemaError, field::FieldDef, identity::TypeIdentity, model::ModelDef,
};

fn models() -> Result<Vec<ModelDef>, SchemaError> {
    let address = ModelDef::builder(TypeIdentity::new("models", "Address"))
        .field(FieldDef::parse("street", "String")?)
        .field(FieldDef::parse("city", "String")?.alias("town"))
        .build()?;

    let customer = ModelDef::builder(TypeIdentity::new("models", "Customer"))
        .field(FieldDef::parse("id", "u64")?)
        .field(
            FieldDef::parse("full_name", "String")?
                .rename("fullName")
                .alias("name"),
        )
        .field(FieldDef::parse("address", "Address")?)
        .field(FieldDef::parse("tags", "Vec<String>")?)
        .field(FieldDef::parse("notes", "Option<String>")?)
        .skip("session")?
        .build()?;

    let envelope = ModelDef::builder(TypeIdentity::new("models", "Envelope"))
        .generics_str("<T>")?
        .field(FieldDef::parse("payload", "T")?)
        .field(FieldDef::parse("sent_at", "Duration")?.with_path("crate::millis")?)
        .build()?;

    let ledger = ModelDef::builder(TypeIdentity::new("models", "Ledger"))
        .field(FieldDef::parse("owner", "String")?)
        .field(FieldDef::parse("entries", "BTreeMap<String, i64>")?)
        .accumulate()
        .build()?;

    Ok(vec![address, customer, envelope, ledger])
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    precodec_build::build!(models()?)?;

    Ok(())
}
