//! JSON-backed token source.
//!
//! Walks a parsed document in document order (order-preserving maps).
//! The walker borrows the document; the caller keeps it alive for the
//! duration of the decode.

use crate::decode::token::{TokenError, TokenKind, TokenSource};
use modelwire_schema::ident::FieldName;
use serde_json::Value as JsonValue;

fn kind_of(value: &JsonValue) -> TokenKind {
    match value {
        JsonValue::Null => TokenKind::Null,
        JsonValue::Bool(_) => TokenKind::Bool,
        JsonValue::Number(_) => TokenKind::Number,
        JsonValue::String(_) => TokenKind::Text,
        JsonValue::Array(_) => TokenKind::List,
        JsonValue::Object(_) => TokenKind::Object,
    }
}

fn mismatch(expected: TokenKind, found: &JsonValue) -> TokenError {
    TokenError::Mismatch {
        expected,
        found: kind_of(found),
    }
}

///
/// Frame
///

enum Frame<'a> {
    Object(serde_json::map::Iter<'a>),
    List { items: &'a [JsonValue], pos: usize },
}

///
/// JsonTokenSource
///

pub struct JsonTokenSource<'a> {
    cursor: Option<&'a JsonValue>,
    frames: Vec<Frame<'a>>,
}

impl<'a> JsonTokenSource<'a> {
    #[must_use]
    pub const fn new(document: &'a JsonValue) -> Self {
        Self {
            cursor: Some(document),
            frames: Vec::new(),
        }
    }

    fn take_cursor(&mut self) -> Result<&'a JsonValue, TokenError> {
        self.cursor.take().ok_or(TokenError::Exhausted)
    }
}

impl TokenSource for JsonTokenSource<'_> {
    fn next_field(&mut self) -> Result<Option<FieldName>, TokenError> {
        match self.frames.last_mut() {
            Some(Frame::Object(iter)) => match iter.next() {
                Some((name, value)) => {
                    self.cursor = Some(value);
                    Ok(Some(FieldName::new(name.as_str())))
                }
                None => Ok(None),
            },
            _ => Err(TokenError::Malformed(
                "next_field outside an object scope".to_string(),
            )),
        }
    }

    fn peek_kind(&self) -> Result<TokenKind, TokenError> {
        self.cursor.map(kind_of).ok_or(TokenError::Exhausted)
    }

    fn read_text(&mut self) -> Result<String, TokenError> {
        match self.take_cursor()? {
            JsonValue::String(s) => Ok(s.clone()),
            other => Err(mismatch(TokenKind::Text, other)),
        }
    }

    fn read_boolean(&mut self) -> Result<bool, TokenError> {
        match self.take_cursor()? {
            JsonValue::Bool(b) => Ok(*b),
            other => Err(mismatch(TokenKind::Bool, other)),
        }
    }

    fn read_integer(&mut self) -> Result<i32, TokenError> {
        match self.take_cursor()? {
            JsonValue::Number(n) => n
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .ok_or_else(|| TokenError::NumberOutOfRange(n.to_string())),
            other => Err(mismatch(TokenKind::Number, other)),
        }
    }

    fn read_long(&mut self) -> Result<i64, TokenError> {
        match self.take_cursor()? {
            JsonValue::Number(n) => n
                .as_i64()
                .ok_or_else(|| TokenError::NumberOutOfRange(n.to_string())),
            other => Err(mismatch(TokenKind::Number, other)),
        }
    }

    fn read_double(&mut self) -> Result<f64, TokenError> {
        match self.take_cursor()? {
            JsonValue::Number(n) => n
                .as_f64()
                .ok_or_else(|| TokenError::NumberOutOfRange(n.to_string())),
            other => Err(mismatch(TokenKind::Number, other)),
        }
    }

    fn read_native(&mut self) -> Result<JsonValue, TokenError> {
        Ok(self.take_cursor()?.clone())
    }

    fn enter_object(&mut self) -> Result<(), TokenError> {
        match self.take_cursor()? {
            JsonValue::Object(map) => {
                self.frames.push(Frame::Object(map.iter()));
                Ok(())
            }
            other => Err(mismatch(TokenKind::Object, other)),
        }
    }

    fn leave_object(&mut self) -> Result<(), TokenError> {
        match self.frames.pop() {
            Some(Frame::Object(_)) => Ok(()),
            _ => Err(TokenError::Malformed(
                "leave_object outside an object scope".to_string(),
            )),
        }
    }

    fn enter_list(&mut self) -> Result<(), TokenError> {
        match self.take_cursor()? {
            JsonValue::Array(items) => {
                self.frames.push(Frame::List { items, pos: 0 });
                Ok(())
            }
            other => Err(mismatch(TokenKind::List, other)),
        }
    }

    fn next_element(&mut self) -> Result<bool, TokenError> {
        match self.frames.last_mut() {
            Some(Frame::List { items, pos }) => {
                if *pos < items.len() {
                    self.cursor = Some(&items[*pos]);
                    *pos += 1;
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            _ => Err(TokenError::Malformed(
                "next_element outside a list scope".to_string(),
            )),
        }
    }

    fn leave_list(&mut self) -> Result<(), TokenError> {
        match self.frames.pop() {
            Some(Frame::List { .. }) => Ok(()),
            _ => Err(TokenError::Malformed(
                "leave_list outside a list scope".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(json: &str) -> JsonValue {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn fields_surface_in_document_order() {
        let doc = doc(r#"{"z": 1, "a": 2, "m": 3}"#);
        let mut source = JsonTokenSource::new(&doc);

        source.enter_object().unwrap();
        let mut names = Vec::new();
        while let Some(name) = source.next_field().unwrap() {
            names.push(name.to_string());
            source.read_native().unwrap();
        }
        source.leave_object().unwrap();

        assert_eq!(names, ["z", "a", "m"]);
    }

    #[test]
    fn leaf_readers_enforce_token_kind() {
        let doc = doc(r#"{"flag": "not-a-bool"}"#);
        let mut source = JsonTokenSource::new(&doc);

        source.enter_object().unwrap();
        source.next_field().unwrap();

        assert!(matches!(
            source.read_boolean(),
            Err(TokenError::Mismatch {
                expected: TokenKind::Bool,
                found: TokenKind::Text,
            })
        ));
    }

    #[test]
    fn integer_width_is_checked() {
        let doc = doc(r#"{"big": 4294967296}"#);
        let mut source = JsonTokenSource::new(&doc);

        source.enter_object().unwrap();
        source.next_field().unwrap();

        assert!(matches!(
            source.read_integer(),
            Err(TokenError::NumberOutOfRange(_))
        ));
    }

    #[test]
    fn list_elements_iterate_in_order() {
        let doc = doc(r#"["a", "b"]"#);
        let mut source = JsonTokenSource::new(&doc);

        source.enter_list().unwrap();
        let mut items = Vec::new();
        while source.next_element().unwrap() {
            items.push(source.read_text().unwrap());
        }
        source.leave_list().unwrap();

        assert_eq!(items, ["a", "b"]);
    }

    #[test]
    fn nested_scopes_are_unambiguous() {
        let doc = doc(r#"{"outer": {"inner": true}}"#);
        let mut source = JsonTokenSource::new(&doc);

        source.enter_object().unwrap();
        assert_eq!(source.next_field().unwrap().unwrap(), "outer");

        source.enter_object().unwrap();
        assert_eq!(source.next_field().unwrap().unwrap(), "inner");
        assert!(source.read_boolean().unwrap());
        assert_eq!(source.next_field().unwrap(), None);
        source.leave_object().unwrap();

        assert_eq!(source.next_field().unwrap(), None);
        source.leave_object().unwrap();
    }

    #[test]
    fn structural_misuse_is_malformed() {
        let doc = doc(r#"[1]"#);
        let mut source = JsonTokenSource::new(&doc);

        assert!(matches!(
            source.next_field(),
            Err(TokenError::Malformed(_))
        ));
        assert!(matches!(
            source.enter_object(),
            Err(TokenError::Mismatch { .. })
        ));
    }
}
