use super::{Scope, Token};
use crate::error::StreamError;

///
/// JsonReader
///
/// Pull parser over a borrowed buffer. Every `next_*` call consumes exactly
/// one token; `skip_value` consumes exactly one complete value.
///

pub struct JsonReader<'a> {
    input: &'a [u8],
    pos: usize,
    stack: Vec<Scope>,
    peeked: Option<Token>,
}

impl<'a> JsonReader<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self::from_slice(input.as_bytes())
    }

    #[must_use]
    pub fn from_slice(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            stack: vec![Scope::EmptyDocument],
            peeked: None,
        }
    }

    /// Byte offset of the cursor.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.pos
    }

    /// Kind of the next token, without consuming it.
    pub fn peek(&mut self) -> Result<Token, StreamError> {
        if let Some(token) = self.peeked {
            return Ok(token);
        }

        let token = self.do_peek()?;
        self.peeked = Some(token);

        Ok(token)
    }

    /// True while the current array or object has more elements.
    pub fn has_next(&mut self) -> Result<bool, StreamError> {
        let token = self.peek()?;

        Ok(!matches!(
            token,
            Token::EndArray | Token::EndObject | Token::EndDocument
        ))
    }

    pub fn begin_object(&mut self) -> Result<(), StreamError> {
        self.expect(Token::BeginObject, "'{'")?;
        self.consume(1);
        self.stack.push(Scope::EmptyObject);

        Ok(())
    }

    pub fn end_object(&mut self) -> Result<(), StreamError> {
        self.expect(Token::EndObject, "'}'")?;
        self.consume(1);
        self.stack.pop();

        Ok(())
    }

    pub fn begin_array(&mut self) -> Result<(), StreamError> {
        self.expect(Token::BeginArray, "'['")?;
        self.consume(1);
        self.stack.push(Scope::EmptyArray);

        Ok(())
    }

    pub fn end_array(&mut self) -> Result<(), StreamError> {
        self.expect(Token::EndArray, "']'")?;
        self.consume(1);
        self.stack.pop();

        Ok(())
    }

    pub fn next_name(&mut self) -> Result<String, StreamError> {
        self.expect(Token::Name, "a name")?;
        self.read_quoted()
    }

    pub fn next_string(&mut self) -> Result<String, StreamError> {
        self.expect(Token::String, "a string")?;
        self.read_quoted()
    }

    pub fn next_bool(&mut self) -> Result<bool, StreamError> {
        self.expect(Token::Bool, "a boolean")?;

        if self.literal(b"true")? {
            Ok(true)
        } else if self.literal(b"false")? {
            Ok(false)
        } else {
            Err(self.syntax_at(self.pos, "a boolean"))
        }
    }

    pub fn next_null(&mut self) -> Result<(), StreamError> {
        self.expect(Token::Null, "null")?;

        if self.literal(b"null")? {
            Ok(())
        } else {
            Err(self.syntax_at(self.pos, "null"))
        }
    }

    /// Raw text of the next number token.
    pub fn next_number(&mut self) -> Result<&'a str, StreamError> {
        self.expect(Token::Number, "a number")?;

        let input = self.input;
        let start = self.pos;
        let end = self.scan_number(start)?;
        self.consume(end - start);

        // scan_number only accepts ASCII, so this cannot fail
        std::str::from_utf8(&input[start..end]).map_err(|_| StreamError::InvalidNumber {
            text: String::from_utf8_lossy(&input[start..end]).into_owned(),
            target: "number",
            offset: start,
        })
    }

    pub fn next_i64(&mut self) -> Result<i64, StreamError> {
        let offset = self.pos;
        let text = self.next_number()?;

        text.parse().map_err(|_| invalid_number(text, "i64", offset))
    }

    pub fn next_u64(&mut self) -> Result<u64, StreamError> {
        let offset = self.pos;
        let text = self.next_number()?;

        text.parse().map_err(|_| invalid_number(text, "u64", offset))
    }

    pub fn next_f64(&mut self) -> Result<f64, StreamError> {
        let offset = self.pos;
        let text = self.next_number()?;

        text.parse().map_err(|_| invalid_number(text, "f64", offset))
    }

    /// Consume one complete value (scalar, array or object) without
    /// interpreting it.
    pub fn skip_value(&mut self) -> Result<(), StreamError> {
        let mut depth = 0usize;

        loop {
            match self.peek()? {
                Token::BeginObject => {
                    self.begin_object()?;
                    depth += 1;
                }
                Token::BeginArray => {
                    self.begin_array()?;
                    depth += 1;
                }
                Token::EndObject if depth > 0 => {
                    self.end_object()?;
                    depth -= 1;
                }
                Token::EndArray if depth > 0 => {
                    self.end_array()?;
                    depth -= 1;
                }
                Token::Name => {
                    // a name is never a value on its own
                    self.expect(Token::Name, "a name")?;
                    self.skip_quoted()?;
                    continue;
                }
                Token::String => {
                    self.skip_quoted()?;
                }
                Token::Number => {
                    self.next_number()?;
                }
                Token::Bool => {
                    self.next_bool()?;
                }
                Token::Null => {
                    self.next_null()?;
                }
                Token::EndDocument => {
                    return Err(StreamError::UnexpectedEof { offset: self.pos });
                }
                found @ (Token::EndObject | Token::EndArray) => {
                    return Err(StreamError::UnexpectedToken {
                        expected: "a value",
                        found,
                        offset: self.pos,
                    });
                }
            }

            if depth == 0 {
                return Ok(());
            }
        }
    }

    /// Assert that the document holds nothing after the value just read.
    pub fn finish(&mut self) -> Result<(), StreamError> {
        match self.peek()? {
            Token::EndDocument => Ok(()),
            found => Err(StreamError::UnexpectedToken {
                expected: "end of document",
                found,
                offset: self.pos,
            }),
        }
    }

    //
    // token classification
    //

    fn do_peek(&mut self) -> Result<Token, StreamError> {
        let top = self.top();

        match top {
            Scope::EmptyArray => {
                self.set_top(Scope::NonEmptyArray);
                if self.peek_byte()? == b']' {
                    return Ok(Token::EndArray);
                }
            }
            Scope::NonEmptyArray => match self.peek_byte()? {
                b']' => return Ok(Token::EndArray),
                b',' => self.pos += 1,
                other => return Err(self.syntax(other, "',' or ']'")),
            },
            Scope::EmptyObject | Scope::NonEmptyObject => {
                let c = self.peek_byte()?;
                if c == b'}' {
                    return Ok(Token::EndObject);
                }
                if top == Scope::NonEmptyObject {
                    if c != b',' {
                        return Err(self.syntax(c, "',' or '}'"));
                    }
                    self.pos += 1;
                }

                let c = self.peek_byte()?;
                if c != b'"' {
                    return Err(self.syntax(c, "a quoted name"));
                }
                self.set_top(Scope::DanglingName);

                return Ok(Token::Name);
            }
            Scope::DanglingName => {
                let c = self.peek_byte()?;
                if c != b':' {
                    return Err(self.syntax(c, "':'"));
                }
                self.pos += 1;
                self.set_top(Scope::NonEmptyObject);
            }
            Scope::EmptyDocument => self.set_top(Scope::NonEmptyDocument),
            Scope::NonEmptyDocument => {
                self.skip_whitespace();
                if self.pos >= self.input.len() {
                    return Ok(Token::EndDocument);
                }

                return Err(StreamError::TrailingData { offset: self.pos });
            }
        }

        self.peek_value()
    }

    fn peek_value(&mut self) -> Result<Token, StreamError> {
        let token = match self.peek_byte()? {
            b'{' => Token::BeginObject,
            b'[' => Token::BeginArray,
            b'"' => Token::String,
            b't' | b'f' => Token::Bool,
            b'n' => Token::Null,
            b'-' | b'0'..=b'9' => Token::Number,
            other => return Err(self.syntax(other, "a value")),
        };

        Ok(token)
    }

    fn expect(&mut self, expected: Token, label: &'static str) -> Result<(), StreamError> {
        let found = self.peek()?;
        if found != expected {
            return Err(StreamError::UnexpectedToken {
                expected: label,
                found,
                offset: self.pos,
            });
        }

        Ok(())
    }

    //
    // byte level
    //

    fn top(&self) -> Scope {
        self.stack.last().copied().unwrap_or(Scope::NonEmptyDocument)
    }

    fn set_top(&mut self, scope: Scope) {
        if let Some(top) = self.stack.last_mut() {
            *top = scope;
        }
    }

    fn consume(&mut self, len: usize) {
        self.pos += len;
        self.peeked = None;
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.input.get(self.pos) {
            self.pos += 1;
        }
    }

    // next significant byte, left in place
    fn peek_byte(&mut self) -> Result<u8, StreamError> {
        self.skip_whitespace();

        self.input
            .get(self.pos)
            .copied()
            .ok_or(StreamError::UnexpectedEof { offset: self.pos })
    }

    fn literal(&mut self, word: &[u8]) -> Result<bool, StreamError> {
        let rest = &self.input[self.pos..];
        if rest.starts_with(word) {
            self.consume(word.len());
            return Ok(true);
        }
        if word.starts_with(rest) {
            return Err(StreamError::UnexpectedEof {
                offset: self.input.len(),
            });
        }

        Ok(false)
    }

    // Returns the end offset of the number starting at `start`.
    fn scan_number(&self, start: usize) -> Result<usize, StreamError> {
        let mut x = start;
        if self.input.get(x) == Some(&b'-') {
            x += 1;
        }
        x = self.scan_digits(x, "a digit")?;

        if self.input.get(x) == Some(&b'.') {
            x = self.scan_digits(x + 1, "a fraction digit")?;
        }

        if let Some(b'e' | b'E') = self.input.get(x) {
            x += 1;
            if let Some(b'+' | b'-') = self.input.get(x) {
                x += 1;
            }
            x = self.scan_digits(x, "an exponent digit")?;
        }

        Ok(x)
    }

    fn scan_digits(&self, start: usize, expected: &'static str) -> Result<usize, StreamError> {
        let mut x = start;
        while self.input.get(x).is_some_and(u8::is_ascii_digit) {
            x += 1;
        }

        if x == start {
            return match self.input.get(x) {
                None => Err(StreamError::UnexpectedEof { offset: x }),
                Some(_) => Err(self.syntax_at(x, expected)),
            };
        }

        Ok(x)
    }

    // Returns the offset of the closing quote and whether escapes were seen.
    fn scan_quoted(&self) -> Result<(usize, bool), StreamError> {
        let mut x = self.pos + 1;
        let mut escaped = false;

        loop {
            match self.input.get(x) {
                None => return Err(StreamError::UnexpectedEof { offset: x }),
                Some(b'"') => return Ok((x, escaped)),
                Some(b'\\') => {
                    escaped = true;
                    x += 2;
                }
                Some(_) => x += 1,
            }
        }
    }

    fn skip_quoted(&mut self) -> Result<(), StreamError> {
        let (end, _) = self.scan_quoted()?;
        self.consume(end + 1 - self.pos);

        Ok(())
    }

    fn read_quoted(&mut self) -> Result<String, StreamError> {
        let start = self.pos;
        let (end, escaped) = self.scan_quoted()?;
        let body = &self.input[start + 1..end];

        let decoded = if escaped {
            // quotes included so serde_json sees a complete string literal
            serde_json::from_slice::<String>(&self.input[start..=end]).map_err(|err| {
                StreamError::InvalidString {
                    offset: start,
                    reason: err.to_string(),
                }
            })?
        } else {
            if body.iter().any(|b| *b < 0x20) {
                return Err(StreamError::InvalidString {
                    offset: start,
                    reason: "unescaped control character".to_string(),
                });
            }

            std::str::from_utf8(body)
                .map_err(|err| StreamError::InvalidString {
                    offset: start,
                    reason: err.to_string(),
                })?
                .to_string()
        };

        self.consume(end + 1 - start);

        Ok(decoded)
    }

    fn syntax(&self, found: u8, expected: &'static str) -> StreamError {
        StreamError::Syntax {
            expected,
            found: char::from(found),
            offset: self.pos,
        }
    }

    fn syntax_at(&self, offset: usize, expected: &'static str) -> StreamError {
        StreamError::Syntax {
            expected,
            found: self.input.get(offset).map_or('\0', |b| char::from(*b)),
            offset,
        }
    }
}

fn invalid_number(text: &str, target: &'static str, offset: usize) -> StreamError {
    StreamError::InvalidNumber {
        text: text.to_string(),
        target,
        offset,
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_flat_object() {
        let mut reader = JsonReader::new(r#" { "name" : "Ann", "age": 30, "ok": true, "x": null } "#);

        reader.begin_object().unwrap();
        assert_eq!(reader.next_name().unwrap(), "name");
        assert_eq!(reader.next_string().unwrap(), "Ann");
        assert_eq!(reader.next_name().unwrap(), "age");
        assert_eq!(reader.next_i64().unwrap(), 30);
        assert_eq!(reader.next_name().unwrap(), "ok");
        assert!(reader.next_bool().unwrap());
        assert_eq!(reader.next_name().unwrap(), "x");
        reader.next_null().unwrap();
        assert!(!reader.has_next().unwrap());
        reader.end_object().unwrap();
        reader.finish().unwrap();
    }

    #[test]
    fn reads_arrays() {
        let mut reader = JsonReader::new("[1, -2.5e3, [], {}]");

        reader.begin_array().unwrap();
        assert_eq!(reader.next_u64().unwrap(), 1);
        assert!((reader.next_f64().unwrap() + 2500.0).abs() < f64::EPSILON);
        reader.begin_array().unwrap();
        assert!(!reader.has_next().unwrap());
        reader.end_array().unwrap();
        reader.begin_object().unwrap();
        reader.end_object().unwrap();
        reader.end_array().unwrap();
        reader.finish().unwrap();
    }

    #[test]
    fn decodes_escapes() {
        let mut reader = JsonReader::new(r#""a\"b\\c\né""#);

        assert_eq!(reader.next_string().unwrap(), "a\"b\\c\né");
    }

    #[test]
    fn skip_value_consumes_one_nested_value() {
        let mut reader = JsonReader::new(r#"{"skip": {"a": [1, {"b": "}"}], "c": null}, "keep": 7}"#);

        reader.begin_object().unwrap();
        assert_eq!(reader.next_name().unwrap(), "skip");
        reader.skip_value().unwrap();
        assert_eq!(reader.next_name().unwrap(), "keep");
        assert_eq!(reader.next_i64().unwrap(), 7);
        reader.end_object().unwrap();
    }

    #[test]
    fn skip_value_rejects_end_token() {
        let mut reader = JsonReader::new("{}");

        reader.begin_object().unwrap();
        let err = reader.skip_value().unwrap_err();
        assert!(matches!(err, StreamError::UnexpectedToken { .. }));
    }

    #[test]
    fn truncated_string_is_eof() {
        let mut reader = JsonReader::new(r#"{"name": "An"#);

        reader.begin_object().unwrap();
        reader.next_name().unwrap();
        assert!(reader.next_string().unwrap_err().is_eof());
    }

    #[test]
    fn truncated_after_colon_is_eof() {
        let mut reader = JsonReader::new(r#"{"age":"#);

        reader.begin_object().unwrap();
        reader.next_name().unwrap();
        assert!(reader.peek().unwrap_err().is_eof());
    }

    #[test]
    fn truncated_literal_is_eof() {
        let mut reader = JsonReader::new("[tru");

        reader.begin_array().unwrap();
        assert!(reader.next_bool().unwrap_err().is_eof());
    }

    #[test]
    fn truncated_number_is_eof() {
        let mut reader = JsonReader::new("-");

        assert!(reader.next_i64().unwrap_err().is_eof());
    }

    #[test]
    fn missing_separator_is_syntax_error() {
        let mut reader = JsonReader::new(r#"{"a": 1 "b": 2}"#);

        reader.begin_object().unwrap();
        reader.next_name().unwrap();
        reader.next_i64().unwrap();
        let err = reader.has_next().unwrap_err();
        assert!(matches!(err, StreamError::Syntax { found: '"', .. }));
    }

    #[test]
    fn trailing_comma_is_rejected() {
        let mut reader = JsonReader::new(r#"{"a": 1,}"#);

        reader.begin_object().unwrap();
        reader.next_name().unwrap();
        reader.next_i64().unwrap();
        assert!(reader.has_next().is_err());
    }

    #[test]
    fn trailing_data_is_rejected() {
        let mut reader = JsonReader::new("1 2");

        reader.next_i64().unwrap();
        let err = reader.finish().unwrap_err();
        assert!(matches!(err, StreamError::TrailingData { offset: 2 }));
    }

    #[test]
    fn type_mismatch_reports_found_token() {
        let mut reader = JsonReader::new("\"x\"");

        let err = reader.next_i64().unwrap_err();
        assert!(matches!(
            err,
            StreamError::UnexpectedToken {
                found: Token::String,
                ..
            }
        ));
    }

    #[test]
    fn integer_overflow_is_invalid_number() {
        let mut reader = JsonReader::new("18446744073709551616");

        let err = reader.next_u64().unwrap_err();
        assert!(matches!(err, StreamError::InvalidNumber { target: "u64", .. }));
    }

    #[test]
    fn raw_control_character_is_rejected() {
        let mut reader = JsonReader::new("\"a\tb\"");

        assert!(matches!(
            reader.next_string().unwrap_err(),
            StreamError::InvalidString { .. }
        ));
    }
}
