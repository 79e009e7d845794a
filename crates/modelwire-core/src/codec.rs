//! Text-codec registry.
//!
//! Kinds with no native wire representation travel as text; a registered
//! codec parses the raw text into the richer runtime value. The registry
//! is the single source of codec metadata for the classifier and the
//! decoder's text path.

use crate::value::Value;
use std::{collections::HashMap, fmt, sync::Arc};
use thiserror::Error as ThisError;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Kind name the builtin date-time codec registers under.
pub const DATE_TIME_KIND: &str = "DateTime";

///
/// CodecError
///

#[derive(Debug, ThisError)]
#[error("codec '{kind}' rejected '{input}': {message}")]
pub struct CodecError {
    pub kind: String,
    pub input: String,
    pub message: String,
}

impl CodecError {
    #[must_use]
    pub fn new(
        kind: impl Into<String>,
        input: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            input: input.into(),
            message: message.into(),
        }
    }
}

///
/// TextCodec
///
/// Parses the raw text form of one kind into its runtime value.
///

pub trait TextCodec: Send + Sync {
    /// Kind name this codec is registered under.
    fn kind(&self) -> &str;

    fn decode(&self, raw: &str) -> Result<Value, CodecError>;
}

/// Parse an RFC 3339 date-time.
pub fn parse_date_time(raw: &str) -> Result<OffsetDateTime, CodecError> {
    OffsetDateTime::parse(raw, &Rfc3339)
        .map_err(|e| CodecError::new(DATE_TIME_KIND, raw, e.to_string()))
}

///
/// DateTimeCodec
///

#[derive(Debug)]
pub struct DateTimeCodec;

impl TextCodec for DateTimeCodec {
    fn kind(&self) -> &str {
        DATE_TIME_KIND
    }

    fn decode(&self, raw: &str) -> Result<Value, CodecError> {
        parse_date_time(raw).map(Value::DateTime)
    }
}

///
/// CodecRegistry
///

#[derive(Clone, Default)]
pub struct CodecRegistry {
    codecs: HashMap<String, Arc<dyn TextCodec>>,
}

impl CodecRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-loaded with the builtin codecs.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DateTimeCodec));
        registry
    }

    /// Register a codec under its kind name, replacing any previous codec
    /// for that kind.
    pub fn register(&mut self, codec: Arc<dyn TextCodec>) {
        self.codecs.insert(codec.kind().to_string(), codec);
    }

    #[must_use]
    pub fn get(&self, kind: &str) -> Option<&dyn TextCodec> {
        self.codecs.get(kind).map(|codec| &**codec)
    }

    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.codecs.contains_key(kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("kinds", &self.codecs.keys().collect::<Vec<_>>())
            .finish()
    }
}
