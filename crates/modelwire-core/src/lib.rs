pub mod codec;
pub mod context;
pub mod decode;
pub mod graph;
pub mod obs;
pub mod prototype;
pub mod types;
pub mod value;

use crate::{decode::DecodeError, prototype::ResolveError};
use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        codec::{CodecRegistry, TextCodec},
        context::Context,
        decode::{DecodeError, DecodeOptions, Decoder, json::JsonTokenSource, token::TokenSource},
        graph::{Model, ModelGraph, ModelId, ModelLink},
        obs::{DecodeEvent, DecodeSink, NullSink},
        prototype::{MissingBasePolicy, Prototype},
        types::AbstractType,
        value::{ChoiceValue, Value},
    };
    pub use modelwire_schema::prelude::*;
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Store(#[from] modelwire_schema::store::StoreError),
}
