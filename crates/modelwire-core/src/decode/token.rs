use derive_more::Display;
use modelwire_schema::ident::FieldName;
use serde_json::Value as JsonValue;
use thiserror::Error as ThisError;

///
/// TokenKind
///
/// Concrete kind of the token under the cursor, for mismatch reporting.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[remain::sorted]
pub enum TokenKind {
    Bool,
    List,
    Null,
    Number,
    Object,
    Text,
}

///
/// TokenError
///

#[derive(Debug, ThisError)]
pub enum TokenError {
    #[error("expected {expected} token, found {found}")]
    Mismatch { expected: TokenKind, found: TokenKind },

    #[error("number {0} does not fit the declared width")]
    NumberOutOfRange(String),

    #[error("token cursor is exhausted")]
    Exhausted,

    #[error("{0}")]
    Malformed(String),
}

///
/// TokenSource
///
/// Sequential, forward-only view of one wire document. Field names
/// surface in document order; nested scope boundaries are unambiguous.
///
/// A value becomes readable after `next_field` (object member) or
/// `next_element` (list element) positions the cursor on it; every leaf
/// reader consumes the cursor.
///

pub trait TokenSource {
    /// Next unread field name at the current depth, or `None` at the
    /// scope boundary.
    fn next_field(&mut self) -> Result<Option<FieldName>, TokenError>;

    /// Concrete kind of the value under the cursor.
    fn peek_kind(&self) -> Result<TokenKind, TokenError>;

    fn read_text(&mut self) -> Result<String, TokenError>;

    fn read_boolean(&mut self) -> Result<bool, TokenError>;

    fn read_integer(&mut self) -> Result<i32, TokenError>;

    fn read_long(&mut self) -> Result<i64, TokenError>;

    fn read_double(&mut self) -> Result<f64, TokenError>;

    /// Consume the value under the cursor without interpretation.
    fn read_native(&mut self) -> Result<JsonValue, TokenError>;

    /// Descend into the object under the cursor.
    fn enter_object(&mut self) -> Result<(), TokenError>;

    /// Scope-close: ascend out of the current object scope.
    fn leave_object(&mut self) -> Result<(), TokenError>;

    /// Descend into the list under the cursor.
    fn enter_list(&mut self) -> Result<(), TokenError>;

    /// Position the cursor on the next list element; `false` at the end
    /// of the list.
    fn next_element(&mut self) -> Result<bool, TokenError>;

    fn leave_list(&mut self) -> Result<(), TokenError>;
}
