use precodec_core::{
    error::StreamError,
    stream::{JsonReader, JsonWriter, Token},
};
use proptest::prelude::*;

fn write(f: impl FnOnce(&mut JsonWriter<'_>) -> Result<(), StreamError>) -> String {
    let mut buf = Vec::new();
    let mut writer = JsonWriter::new(&mut buf);
    f(&mut writer).unwrap();
    writer.finish().unwrap();

    String::from_utf8(buf).unwrap()
}

proptest! {
    #[test]
    fn strings_survive_the_stream(text in any::<String>()) {
        let json = write(|w| w.string_value(&text));
        let mut reader = JsonReader::new(&json);

        prop_assert_eq!(reader.next_string()?, text);
        reader.finish()?;
    }

    #[test]
    fn written_strings_are_valid_json(text in any::<String>()) {
        let json = write(|w| w.string_value(&text));

        prop_assert_eq!(serde_json::from_str::<String>(&json).unwrap(), text);
    }

    #[test]
    fn integers_survive_the_stream(signed in any::<i64>(), unsigned in any::<u64>()) {
        let json = write(|w| {
            w.begin_array()?;
            w.i64_value(signed)?;
            w.u64_value(unsigned)?;
            w.end_array()
        });
        let mut reader = JsonReader::new(&json);

        reader.begin_array()?;
        prop_assert_eq!(reader.next_i64()?, signed);
        prop_assert_eq!(reader.next_u64()?, unsigned);
        reader.end_array()?;
    }

    #[test]
    fn skipping_leaves_the_next_member_readable(depth in 0usize..32, tail in "[a-z]{1,8}") {
        let nested = format!("{}{}", "[{\"k\":".repeat(depth), "null")
            + &"}]".repeat(depth);
        let json = format!("{{\"skip\": {nested}, \"keep\": \"{tail}\"}}");
        let mut reader = JsonReader::new(&json);

        reader.begin_object()?;
        prop_assert_eq!(reader.next_name()?, "skip");
        reader.skip_value()?;
        prop_assert_eq!(reader.next_name()?, "keep");
        prop_assert_eq!(reader.next_string()?, tail);
        prop_assert_eq!(reader.peek()?, Token::EndObject);
    }
}
