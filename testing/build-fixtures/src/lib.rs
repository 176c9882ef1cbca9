//! Models whose codecs are written by `build.rs` rather than derived.

pub mod models {
    use std::{collections::BTreeMap, time::Duration};

    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    pub struct Address {
        pub street: String,
        pub city: String,
    }

    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    pub struct Customer {
        pub id: u64,
        pub full_name: String,
        pub address: Address,
        pub tags: Vec<String>,
        pub notes: Option<String>,
        pub session: Option<u64>,
    }

    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    pub struct Envelope<T> {
        pub payload: T,
        pub sent_at: Duration,
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct Ledger {
        pub owner: String,
        pub entries: BTreeMap<String, i64>,
    }

    precodec::include_codecs!("models");
}

/// `Duration` on the wire as whole milliseconds.
pub mod millis {
    use precodec::{JsonReader, JsonWriter, StreamError};
    use std::time::Duration;

    pub fn write(writer: &mut JsonWriter<'_>, value: &Duration) -> Result<(), StreamError> {
        let millis = u64::try_from(value.as_millis()).map_err(StreamError::custom)?;

        writer.u64_value(millis)
    }

    pub fn read(reader: &mut JsonReader<'_>) -> Result<Duration, StreamError> {
        reader.next_u64().map(Duration::from_millis)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use std::path::Path;

    #[test]
    fn units_follow_the_crate_config() {
        let dir = Path::new(env!("OUT_DIR")).join("models");

        for file in [
            "address_json.rs",
            "customer_json.rs",
            "envelope_json.rs",
            "ledger_json.rs",
            "codecs.rs",
        ] {
            assert!(dir.join(file).is_file(), "missing {file}");
        }
    }

    #[test]
    fn index_includes_every_unit() {
        let index = std::fs::read_to_string(
            Path::new(env!("OUT_DIR")).join("models").join("codecs.rs"),
        )
        .unwrap();

        assert!(index.starts_with("// @generated"));
        assert!(index.contains(r#"include!("customer_json.rs");"#));
        assert!(index.contains(r#"include!("ledger_json.rs");"#));
    }
}
