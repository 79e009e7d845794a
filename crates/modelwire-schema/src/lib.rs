pub mod ident;
pub mod node;
pub mod store;
pub mod types;
pub mod validate;

/// Maximum length for schema and choice identifiers.
pub const MAX_SCHEMA_ID_LEN: usize = 255;

/// Maximum length for field and link-relation identifiers.
pub const MAX_NAME_LEN: usize = 64;

use crate::store::StoreError;
use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        err,
        ident::{ChoiceId, FieldName, KindName, RelationId, SchemaId},
        node::{Choice, Field, FieldList, Link, LinkList, Schema},
        store::{MemoryStore, SchemaStore},
        types::{KindRef, Literal, Primitive},
        validate::ErrorTree,
    };
    pub use serde::{Deserialize, Serialize};
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    StoreError(#[from] StoreError),
}
