#![allow(dead_code)]

use precodec::{Codec, JsonReader, JsonWriter, StreamError};
use std::collections::BTreeMap;
use tracing_subscriber::filter::LevelFilter;

/// Route registry traces to the test harness output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(LevelFilter::TRACE)
        .try_init();
}

#[derive(Clone, Codec, Debug, Default, PartialEq)]
pub struct Person {
    #[codec(alias = "n")]
    pub name: String,
    pub age: u32,
}

impl Person {
    pub fn new(name: &str, age: u32) -> Self {
        Self {
            name: name.to_string(),
            age,
        }
    }
}

#[derive(Clone, Codec, Debug, Default, PartialEq)]
pub struct Team {
    pub lead: Person,
    pub members: Vec<Person>,
    pub scores: BTreeMap<String, u32>,
}

#[derive(Clone, Codec, Debug, Default, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

#[derive(Clone, Codec, Debug, Default, PartialEq)]
pub struct Node {
    pub value: i32,
    pub children: Vec<Node>,
}

#[derive(Clone, Codec, Debug, Default, PartialEq)]
pub struct Chain {
    pub value: u8,
    pub next: Option<Box<Chain>>,
}

/// Colour stored as a number, written as lowercase hex text.
pub mod hex {
    use super::{JsonReader, JsonWriter, StreamError};

    pub fn write(writer: &mut JsonWriter<'_>, value: &u32) -> Result<(), StreamError> {
        writer.string_value(&format!("{value:06x}"))
    }

    pub fn read(reader: &mut JsonReader<'_>) -> Result<u32, StreamError> {
        let text = reader.next_string()?;

        u32::from_str_radix(&text, 16).map_err(StreamError::custom)
    }
}

#[derive(Clone, Codec, Debug, Default, PartialEq)]
pub struct Profile {
    #[codec(rename = "displayName", alias = "display_name")]
    pub display_name: String,

    #[codec(with = "hex")]
    pub colour: u32,

    pub nickname: Option<String>,

    #[codec(skip)]
    pub views: u64,
}

/// No `Default`: only buildable through accumulated slots.
#[derive(Clone, Codec, Debug, PartialEq)]
#[codec(accumulate)]
pub struct Job {
    pub id: u64,
    #[codec(alias = "labels")]
    pub tags: Vec<String>,
    #[codec(skip)]
    pub attempts: u8,
}
