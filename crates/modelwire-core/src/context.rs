//! Owning runtime context.
//!
//! The context holds everything one decoding session family shares: the
//! schema store handle, the memoized prototype cache, the codec registry,
//! decode options, and the event sink. There is no process-global state;
//! lifecycle is the owner's.

use crate::{
    codec::CodecRegistry,
    decode::{DecodeError, DecodeOptions, Decoder, token::TokenSource},
    graph::{ModelGraph, ModelId},
    obs::{DecodeSink, NullSink},
    prototype::{self, Prototype, ResolveError},
    types::{self, AbstractType},
};
use modelwire_schema::{ident::SchemaId, store::SchemaStore, types::KindRef};
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

///
/// Context
///

pub struct Context {
    store: Arc<dyn SchemaStore + Send + Sync>,
    codecs: CodecRegistry,
    options: DecodeOptions,
    sink: Arc<dyn DecodeSink>,
    prototypes: RwLock<HashMap<SchemaId, Arc<Prototype>>>,
}

impl Context {
    #[must_use]
    pub fn new(store: Arc<dyn SchemaStore + Send + Sync>) -> Self {
        Self {
            store,
            codecs: CodecRegistry::standard(),
            options: DecodeOptions::default(),
            sink: Arc::new(NullSink),
            prototypes: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DecodeSink>) -> Self {
        self.sink = sink;
        self
    }

    #[must_use]
    pub fn with_codecs(mut self, codecs: CodecRegistry) -> Self {
        self.codecs = codecs;
        self
    }

    #[must_use]
    pub fn store(&self) -> &dyn SchemaStore {
        self.store.as_ref()
    }

    #[must_use]
    pub const fn codecs(&self) -> &CodecRegistry {
        &self.codecs
    }

    #[must_use]
    pub const fn options(&self) -> &DecodeOptions {
        &self.options
    }

    #[must_use]
    pub fn sink(&self) -> &dyn DecodeSink {
        self.sink.as_ref()
    }

    /// Classify a declared kind against this context's store and codecs.
    #[must_use]
    pub fn classify(&self, kind: &KindRef) -> AbstractType {
        types::classify(kind, self.store.as_ref(), &self.codecs)
    }

    /// Resolve a schema's prototype, memoized per schema id.
    ///
    /// Resolution is pure, so two callers racing on an uncached id may
    /// compute the same value twice; the last insert wins harmlessly.
    pub fn resolve(&self, id: &SchemaId) -> Result<Arc<Prototype>, ResolveError> {
        {
            let cache = self
                .prototypes
                .read()
                .expect("prototype cache RwLock poisoned while acquiring read lock");
            if let Some(found) = cache.get(id.as_str()) {
                return Ok(Arc::clone(found));
            }
        }

        let resolved = Arc::new(prototype::resolve(
            self.store.as_ref(),
            id,
            self.options.missing_bases,
            self.sink.as_ref(),
        )?);

        self.prototypes
            .write()
            .expect("prototype cache RwLock poisoned while acquiring write lock")
            .insert(id.clone(), Arc::clone(&resolved));

        Ok(resolved)
    }

    /// Decode one document from a token source into a fresh model graph.
    pub fn decode<S: TokenSource>(
        &self,
        source: S,
        native_type: &SchemaId,
    ) -> Result<(ModelId, ModelGraph), DecodeError> {
        Decoder::new(self, source).read_model_graph(native_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelwire_schema::{
        node::{Field, Schema},
        store::MemoryStore,
        types::{KindRef, Primitive},
    };

    fn context() -> Context {
        let mut store = MemoryStore::new();
        store
            .insert_schema(
                Schema::new("urn:t:doc")
                    .with_field(Field::new("title", KindRef::primitive(Primitive::Text))),
            )
            .unwrap();

        Context::new(Arc::new(store))
    }

    #[test]
    fn resolve_is_memoized() {
        let ctx = context();
        let id = SchemaId::new("urn:t:doc");

        let first = ctx.resolve(&id).unwrap();
        let second = ctx.resolve(&id).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn resolve_unknown_schema_fails() {
        let ctx = context();

        assert!(matches!(
            ctx.resolve(&SchemaId::new("urn:t:missing")),
            Err(ResolveError::UnknownSchema(_))
        ));
    }

    #[test]
    fn classify_uses_owned_store_and_codecs() {
        let ctx = context();

        assert_eq!(
            ctx.classify(&KindRef::primitive(Primitive::Boolean)),
            AbstractType::Boolean
        );
        assert_eq!(
            ctx.classify(&KindRef::model("urn:t:doc")),
            AbstractType::Model
        );
    }
}
