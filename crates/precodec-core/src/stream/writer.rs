use super::Scope;
use crate::error::StreamError;
use std::{fmt::Display, io::Write};

///
/// JsonWriter
///
/// Push encoder writing straight into the sink; nothing is buffered beyond
/// what the sink itself buffers.
///

pub struct JsonWriter<'w> {
    out: &'w mut dyn Write,
    stack: Vec<Scope>,
    indent: Option<String>,
}

impl<'w> JsonWriter<'w> {
    /// Compact writer: no whitespace between tokens.
    pub fn new(out: &'w mut dyn Write) -> Self {
        Self {
            out,
            stack: vec![Scope::EmptyDocument],
            indent: None,
        }
    }

    /// Pretty writer: one element per line, nested by `indent`.
    pub fn with_indent(out: &'w mut dyn Write, indent: impl Into<String>) -> Self {
        let indent = indent.into();

        Self {
            out,
            stack: vec![Scope::EmptyDocument],
            indent: (!indent.is_empty()).then_some(indent),
        }
    }

    pub fn begin_object(&mut self) -> Result<(), StreamError> {
        self.before_value()?;
        self.stack.push(Scope::EmptyObject);
        self.raw(b"{")
    }

    pub fn end_object(&mut self) -> Result<(), StreamError> {
        self.close(Scope::EmptyObject, Scope::NonEmptyObject, b"}")
    }

    pub fn begin_array(&mut self) -> Result<(), StreamError> {
        self.before_value()?;
        self.stack.push(Scope::EmptyArray);
        self.raw(b"[")
    }

    pub fn end_array(&mut self) -> Result<(), StreamError> {
        self.close(Scope::EmptyArray, Scope::NonEmptyArray, b"]")
    }

    /// Write an object key; the next call must write its value.
    pub fn name(&mut self, name: &str) -> Result<(), StreamError> {
        match self.top() {
            Scope::EmptyObject => {}
            Scope::NonEmptyObject => self.raw(b",")?,
            Scope::DanglingName => {
                return Err(StreamError::IllegalState("name written while a value is pending"));
            }
            _ => return Err(StreamError::IllegalState("name written outside an object")),
        }

        self.newline()?;
        self.set_top(Scope::DanglingName);
        self.quoted(name)
    }

    pub fn string_value(&mut self, value: &str) -> Result<(), StreamError> {
        self.before_value()?;
        self.quoted(value)
    }

    pub fn bool_value(&mut self, value: bool) -> Result<(), StreamError> {
        let text: &[u8] = if value { b"true" } else { b"false" };

        self.before_value()?;
        self.raw(text)
    }

    pub fn null_value(&mut self) -> Result<(), StreamError> {
        self.before_value()?;
        self.raw(b"null")
    }

    pub fn i64_value(&mut self, value: i64) -> Result<(), StreamError> {
        self.number(value)
    }

    pub fn u64_value(&mut self, value: u64) -> Result<(), StreamError> {
        self.number(value)
    }

    pub fn f64_value(&mut self, value: f64) -> Result<(), StreamError> {
        if !value.is_finite() {
            return Err(StreamError::NonFiniteNumber(value));
        }

        self.number(value)
    }

    pub fn f32_value(&mut self, value: f32) -> Result<(), StreamError> {
        if !value.is_finite() {
            return Err(StreamError::NonFiniteNumber(f64::from(value)));
        }

        self.number(value)
    }

    /// Check the document is complete and flush the sink.
    pub fn finish(&mut self) -> Result<(), StreamError> {
        if self.stack.as_slice() != [Scope::NonEmptyDocument] {
            return Err(StreamError::IllegalState("incomplete document"));
        }

        self.out.flush()?;

        Ok(())
    }

    //
    // helpers
    //

    fn number(&mut self, value: impl Display) -> Result<(), StreamError> {
        self.before_value()?;
        write!(self.out, "{value}")?;

        Ok(())
    }

    fn before_value(&mut self) -> Result<(), StreamError> {
        match self.top() {
            Scope::EmptyDocument => self.set_top(Scope::NonEmptyDocument),
            Scope::NonEmptyDocument => {
                return Err(StreamError::IllegalState(
                    "document already holds a top-level value",
                ));
            }
            Scope::EmptyArray => {
                self.set_top(Scope::NonEmptyArray);
                self.newline()?;
            }
            Scope::NonEmptyArray => {
                self.raw(b",")?;
                self.newline()?;
            }
            Scope::DanglingName => {
                let separator: &[u8] = if self.indent.is_some() { b": " } else { b":" };
                self.raw(separator)?;
                self.set_top(Scope::NonEmptyObject);
            }
            Scope::EmptyObject | Scope::NonEmptyObject => {
                return Err(StreamError::IllegalState("value written without a name"));
            }
        }

        Ok(())
    }

    fn close(&mut self, empty: Scope, non_empty: Scope, bracket: &[u8]) -> Result<(), StreamError> {
        let top = self.top();
        if top == Scope::DanglingName {
            return Err(StreamError::IllegalState("dangling name"));
        }
        if top != empty && top != non_empty {
            return Err(StreamError::IllegalState("nesting problem"));
        }

        self.stack.pop();
        if top == non_empty {
            self.newline()?;
        }

        self.raw(bracket)
    }

    fn newline(&mut self) -> Result<(), StreamError> {
        let Some(indent) = &self.indent else {
            return Ok(());
        };

        let depth = self.stack.len().saturating_sub(1);
        self.out.write_all(b"\n")?;
        for _ in 0..depth {
            self.out.write_all(indent.as_bytes())?;
        }

        Ok(())
    }

    fn quoted(&mut self, value: &str) -> Result<(), StreamError> {
        serde_json::to_writer(&mut *self.out, value).map_err(std::io::Error::from)?;

        Ok(())
    }

    fn raw(&mut self, bytes: &[u8]) -> Result<(), StreamError> {
        self.out.write_all(bytes)?;

        Ok(())
    }

    fn top(&self) -> Scope {
        self.stack.last().copied().unwrap_or(Scope::NonEmptyDocument)
    }

    fn set_top(&mut self, scope: Scope) {
        if let Some(top) = self.stack.last_mut() {
            *top = scope;
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn compact(f: impl FnOnce(&mut JsonWriter<'_>) -> Result<(), StreamError>) -> String {
        let mut buf = Vec::new();
        let mut writer = JsonWriter::new(&mut buf);
        f(&mut writer).unwrap();
        writer.finish().unwrap();

        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn writes_nested_structures() {
        let out = compact(|w| {
            w.begin_object()?;
            w.name("a")?;
            w.begin_array()?;
            w.i64_value(-1)?;
            w.u64_value(2)?;
            w.begin_object()?;
            w.end_object()?;
            w.end_array()?;
            w.name("b")?;
            w.null_value()?;
            w.name("c")?;
            w.bool_value(false)?;
            w.end_object()
        });

        assert_eq!(out, r#"{"a":[-1,2,{}],"b":null,"c":false}"#);
    }

    #[test]
    fn escapes_strings() {
        let out = compact(|w| w.string_value("quote\" slash\\ nl\n tab\t"));

        assert_eq!(out, r#""quote\" slash\\ nl\n tab\t""#);
    }

    #[test]
    fn indents_when_asked() {
        let mut buf = Vec::new();
        let mut writer = JsonWriter::with_indent(&mut buf, "  ");
        writer.begin_object().unwrap();
        writer.name("a").unwrap();
        writer.begin_array().unwrap();
        writer.i64_value(1).unwrap();
        writer.end_array().unwrap();
        writer.name("b").unwrap();
        writer.begin_object().unwrap();
        writer.end_object().unwrap();
        writer.end_object().unwrap();
        writer.finish().unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "{\n  \"a\": [\n    1\n  ],\n  \"b\": {}\n}"
        );
    }

    #[test]
    fn rejects_name_outside_object() {
        let mut buf = Vec::new();
        let mut writer = JsonWriter::new(&mut buf);

        assert!(matches!(
            writer.name("x"),
            Err(StreamError::IllegalState(_))
        ));
    }

    #[test]
    fn rejects_value_without_name() {
        let mut buf = Vec::new();
        let mut writer = JsonWriter::new(&mut buf);
        writer.begin_object().unwrap();

        assert!(writer.i64_value(1).is_err());
    }

    #[test]
    fn rejects_dangling_name_on_close() {
        let mut buf = Vec::new();
        let mut writer = JsonWriter::new(&mut buf);
        writer.begin_object().unwrap();
        writer.name("x").unwrap();

        assert!(matches!(
            writer.end_object(),
            Err(StreamError::IllegalState("dangling name"))
        ));
    }

    #[test]
    fn rejects_second_top_level_value() {
        let mut buf = Vec::new();
        let mut writer = JsonWriter::new(&mut buf);
        writer.bool_value(true).unwrap();

        assert!(writer.bool_value(true).is_err());
    }

    #[test]
    fn rejects_incomplete_document() {
        let mut buf = Vec::new();
        let mut writer = JsonWriter::new(&mut buf);
        writer.begin_array().unwrap();

        assert!(writer.finish().is_err());
    }

    #[test]
    fn rejects_non_finite_numbers() {
        let mut buf = Vec::new();
        let mut writer = JsonWriter::new(&mut buf);

        assert!(matches!(
            writer.f64_value(f64::NAN),
            Err(StreamError::NonFiniteNumber(_))
        ));
    }

    #[test]
    fn sink_failure_surfaces_as_io() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk gone"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut sink = Broken;
        let mut writer = JsonWriter::new(&mut sink);

        assert!(matches!(writer.begin_object(), Err(StreamError::Io(_))));
    }
}
