use crate::{
    ident::{ChoiceId, SchemaId},
    node::{Choice, Schema},
    validate::{ErrorTree, validate_choice, validate_schema},
};
use std::collections::HashMap;
use thiserror::Error as ThisError;

///
/// SchemaStore
///
/// Lookup boundary the runtime resolves schemas and choice kinds through.
/// Implementations own fetch/caching policy; the runtime only reads.
///

pub trait SchemaStore {
    fn schema(&self, id: &str) -> Option<&Schema>;

    fn choice(&self, id: &str) -> Option<&Choice>;
}

///
/// StoreError
///

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("schema '{id}' failed validation: {tree}")]
    InvalidSchema { id: SchemaId, tree: ErrorTree },

    #[error("choice '{id}' failed validation: {tree}")]
    InvalidChoice { id: ChoiceId, tree: ErrorTree },

    #[error("schema '{0}' is already registered")]
    DuplicateSchema(SchemaId),

    #[error("choice '{0}' is already registered")]
    DuplicateChoice(ChoiceId),
}

///
/// MemoryStore
///
/// Validating in-memory store. Declarations are checked on insert so the
/// resolver never sees a malformed node.
///

#[derive(Debug, Default)]
pub struct MemoryStore {
    schemas: HashMap<SchemaId, Schema>,
    choices: HashMap<ChoiceId, Choice>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_schema(&mut self, schema: Schema) -> Result<(), StoreError> {
        validate_schema(&schema).map_err(|tree| StoreError::InvalidSchema {
            id: schema.id.clone(),
            tree,
        })?;

        if self.schemas.contains_key(schema.id.as_str()) {
            return Err(StoreError::DuplicateSchema(schema.id));
        }
        self.schemas.insert(schema.id.clone(), schema);

        Ok(())
    }

    pub fn insert_choice(&mut self, choice: Choice) -> Result<(), StoreError> {
        validate_choice(&choice).map_err(|tree| StoreError::InvalidChoice {
            id: choice.id.clone(),
            tree,
        })?;

        if self.choices.contains_key(choice.id.as_str()) {
            return Err(StoreError::DuplicateChoice(choice.id));
        }
        self.choices.insert(choice.id.clone(), choice);

        Ok(())
    }

    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

impl SchemaStore for MemoryStore {
    fn schema(&self, id: &str) -> Option<&Schema> {
        self.schemas.get(id)
    }

    fn choice(&self, id: &str) -> Option<&Choice> {
        self.choices.get(id)
    }
}
