use precodec::{CodecFactory, Registry, TypeToken};
use precodec_build_fixtures::models::{
    Address, Customer, CustomerCodecFactory, Envelope, EnvelopeCodecFactory, Ledger,
};
use proptest::prelude::*;
use std::{collections::BTreeMap, time::Duration};

fn customer() -> Customer {
    Customer {
        id: 7,
        full_name: "Ann Lee".to_string(),
        address: Address {
            street: "1 Main St".to_string(),
            city: "Oslo".to_string(),
        },
        tags: vec!["vip".to_string()],
        notes: None,
        session: None,
    }
}

#[test]
fn generated_codec_writes_canonical_names() {
    let json = precodec::to_string(&customer()).unwrap();

    assert_eq!(
        json,
        r#"{"id":7,"fullName":"Ann Lee","address":{"street":"1 Main St","city":"Oslo"},"tags":["vip"],"notes":null}"#
    );
}

#[test]
fn generated_codec_reads_aliases_and_skips_unknowns() {
    let json = r#"{
        "name": "Ann Lee",
        "session": 99,
        "address": {"town": "Oslo", "street": "1 Main St", "zip": "0150"},
        "id": 7,
        "tags": ["vip"]
    }"#;
    let read: Customer = precodec::from_str(json).unwrap();

    assert_eq!(read, customer());
}

#[test]
fn with_path_bypasses_the_registry() {
    let envelope = Envelope {
        payload: customer().address,
        sent_at: Duration::from_millis(1_500),
    };
    let json = precodec::to_string(&envelope).unwrap();

    assert_eq!(
        json,
        r#"{"payload":{"street":"1 Main St","city":"Oslo"},"sent_at":1500}"#
    );
    assert_eq!(
        precodec::from_str::<Envelope<Address>>(&json).unwrap(),
        envelope
    );
}

#[test]
fn accumulated_model_without_default() {
    let ledger: Ledger = precodec::from_str(r#"{"entries": {"rent": -900, "pay": 3000}}"#).unwrap();

    assert_eq!(ledger.owner, "");
    assert_eq!(
        ledger.entries,
        BTreeMap::from([("pay".to_string(), 3000), ("rent".to_string(), -900)])
    );
}

#[test]
fn generated_factories_plug_into_a_registry() {
    let registry = Registry::builder()
        .factory(CustomerCodecFactory::new())
        .factory(EnvelopeCodecFactory::<String>::new())
        .build();

    assert!(registry.resolve(&TypeToken::of::<Customer>()).is_ok());
    assert!(registry.resolve(&TypeToken::of::<Envelope<String>>()).is_ok());
    assert!(
        EnvelopeCodecFactory::<String>::new()
            .create(&registry, &TypeToken::of::<Envelope<u64>>())
            .is_none()
    );

    let json = registry.to_string(&customer()).unwrap();
    assert_eq!(registry.from_str::<Customer>(&json).unwrap(), customer());
}

proptest! {
    #[test]
    fn envelopes_round_trip(payload in any::<i64>(), millis in any::<u32>()) {
        let envelope = Envelope {
            payload,
            sent_at: Duration::from_millis(u64::from(millis)),
        };
        let json = precodec::to_string(&envelope).unwrap();

        prop_assert_eq!(precodec::from_str::<Envelope<i64>>(&json).unwrap(), envelope);
    }
}
