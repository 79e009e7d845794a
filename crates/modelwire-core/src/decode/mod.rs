//! Streaming model-graph decoder.
//!
//! Depth-first recursive descent over one token source. Each field is
//! resolved against the focused model's prototype, dispatched on its
//! abstract type, and assigned onto the focus; nested models push and
//! pop the graph's focus stack as scopes open and close.

pub mod json;
pub mod token;

use crate::{
    codec::{self, CodecError},
    context::Context,
    graph::{GraphError, ModelGraph, ModelId, ModelLink},
    obs::DecodeEvent,
    prototype::{MissingBasePolicy, Prototype, ResolveError},
    types::AbstractType,
    value::{ChoiceValue, Value},
};
use modelwire_schema::{
    ident::{FieldName, KindName, SchemaId},
    types::{KindRef, Primitive},
};
use std::sync::Arc;
use thiserror::Error as ThisError;
use token::{TokenError, TokenSource};

/// Relationship name recorded for the root focus frame.
const ROOT_RELATIONSHIP: &str = "$";

/// Wire field carrying hypermedia links; kept out of the data-field loop.
const LINKS_FIELD: &str = "links";

/// Default bound on nested-object recursion depth.
pub const DEFAULT_MAX_DEPTH: usize = 128;

///
/// DecodeError
///

#[derive(Debug, ThisError)]
pub enum DecodeError {
    /// The input names a field the focused prototype does not declare.
    /// Wire data must conform to the declared contract; decode aborts.
    #[error("schema violation: '{schema}' declares no field '{field}'")]
    SchemaViolation { schema: SchemaId, field: FieldName },

    #[error("field '{field}': {source}")]
    Token { field: FieldName, source: TokenError },

    #[error(transparent)]
    Structure(#[from] TokenError),

    #[error("'{member}' is not a member of choice '{kind}'")]
    UnknownChoiceMember { kind: KindName, member: String },

    #[error("choice kind '{0}' is not registered")]
    UnknownChoiceKind(KindName),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(
        "configuration: kind '{kind}' of field '{field}' must carry exactly \
         {expected} parameter(s), found {found}"
    )]
    Configuration {
        field: FieldName,
        kind: String,
        expected: usize,
        found: usize,
    },

    #[error("nesting depth exceeds the configured limit of {limit}")]
    DepthExceeded { limit: usize },

    #[error("malformed links entry: {0}")]
    MalformedLink(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Focus-stack or graph-ownership mismatch: a decoder bug, never bad
    /// input. Unrecoverable; the operation aborts.
    #[error("internal consistency: {0}")]
    Internal(#[from] GraphError),
}

fn token_error(field: &FieldName, source: TokenError) -> DecodeError {
    DecodeError::Token {
        field: field.clone(),
        source,
    }
}

///
/// DecodeOptions
///

#[derive(Clone, Copy, Debug)]
pub struct DecodeOptions {
    /// Maximum nested-object depth before the decode aborts.
    pub max_depth: usize,

    /// What prototype resolution does about unresolvable base schemas.
    pub missing_bases: MissingBasePolicy,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            missing_bases: MissingBasePolicy::default(),
        }
    }
}

impl DecodeOptions {
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub const fn with_missing_bases(mut self, policy: MissingBasePolicy) -> Self {
        self.missing_bases = policy;
        self
    }
}

///
/// Decoder
///

pub struct Decoder<'ctx, S: TokenSource> {
    context: &'ctx Context,
    source: S,
}

impl<'ctx, S: TokenSource> Decoder<'ctx, S> {
    #[must_use]
    pub const fn new(context: &'ctx Context, source: S) -> Self {
        Self { context, source }
    }

    /// Decode one document into a fresh model graph.
    ///
    /// Returns the root model's handle together with the graph that owns
    /// every model built from the document.
    pub fn read_model_graph(
        mut self,
        native_type: &SchemaId,
    ) -> Result<(ModelId, ModelGraph), DecodeError> {
        let mut graph = ModelGraph::new();

        self.context.sink().on_event(DecodeEvent::GraphBegin {
            root: native_type.clone(),
        });

        let root = self.read_model(&mut graph, native_type, ROOT_RELATIONSHIP)?;

        self.context.sink().on_event(DecodeEvent::GraphEnd {
            root: native_type.clone(),
            models: graph.len(),
        });

        Ok((root, graph))
    }

    fn read_model(
        &mut self,
        graph: &mut ModelGraph,
        native_type: &SchemaId,
        relationship: &str,
    ) -> Result<ModelId, DecodeError> {
        let prototype = self.context.resolve(native_type)?;

        let limit = self.context.options().max_depth;
        if graph.depth() >= limit {
            return Err(DecodeError::DepthExceeded { limit });
        }

        let handle = graph.create(native_type.clone());
        graph.push_focus(handle, relationship)?;
        self.context.sink().on_event(DecodeEvent::FocusPushed {
            model: handle,
            relationship: relationship.to_string(),
        });

        self.source.enter_object()?;

        while graph.is_focused() {
            let Some(field_name) = self.source.next_field()? else {
                break;
            };

            // ownership invariant: the focus must belong to the graph
            // driving this call
            let focus = graph.current_focus()?;
            let focus_type = graph.model(focus)?.native_type().clone();

            if field_name == LINKS_FIELD {
                let links = self.read_links(&field_name)?;
                graph.model_mut(focus)?.add_links(links);
                continue;
            }

            let focus_proto: Arc<Prototype> = if focus == handle {
                Arc::clone(&prototype)
            } else {
                self.context.resolve(&focus_type)?
            };

            let Some(field) = focus_proto.field(field_name.as_str()) else {
                return Err(DecodeError::SchemaViolation {
                    schema: focus_type,
                    field: field_name,
                });
            };
            let kind = field.kind.clone();

            let value = self.read_value(graph, &field_name, &kind, field_name.as_str())?;
            graph.model_mut(focus)?.set(field_name.clone(), value);

            // defensive: a nested read that returned with focus shifted
            if graph.current_focus()? != focus {
                break;
            }
        }

        self.source.leave_object()?;

        let popped = graph.pop_focus()?;
        self.context
            .sink()
            .on_event(DecodeEvent::FocusPopped { model: popped });

        Ok(handle)
    }

    fn read_value(
        &mut self,
        graph: &mut ModelGraph,
        field: &FieldName,
        kind: &KindRef,
        relationship: &str,
    ) -> Result<Value, DecodeError> {
        match self.context.classify(kind) {
            AbstractType::Text => self.read_text_value(field, kind),

            AbstractType::Model => {
                // a model kind's name is the schema id it conforms to
                let schema_id = SchemaId::new(kind.name().as_str());
                let nested = self.read_model(graph, &schema_id, relationship)?;

                Ok(Value::Model(nested))
            }

            AbstractType::List => {
                let [element] = kind.params() else {
                    return Err(DecodeError::Configuration {
                        field: field.clone(),
                        kind: kind.to_string(),
                        expected: 1,
                        found: kind.params().len(),
                    });
                };

                // composite relationship name; diagnostic bookkeeping only
                let rel = format!("{field}[{element}]");

                self.source
                    .enter_list()
                    .map_err(|e| token_error(field, e))?;
                let mut items = Vec::new();
                while self
                    .source
                    .next_element()
                    .map_err(|e| token_error(field, e))?
                {
                    items.push(self.read_value(graph, field, element, &rel)?);
                }
                self.source
                    .leave_list()
                    .map_err(|e| token_error(field, e))?;

                Ok(Value::List(items))
            }

            AbstractType::Map => {
                let [key_kind, value_kind] = kind.params() else {
                    return Err(DecodeError::Configuration {
                        field: field.clone(),
                        kind: kind.to_string(),
                        expected: 2,
                        found: kind.params().len(),
                    });
                };

                let rel = format!("{field}[{key_kind}, {value_kind}]");

                self.source
                    .enter_object()
                    .map_err(|e| token_error(field, e))?;
                let mut entries = Vec::new();
                while let Some(key_name) = self
                    .source
                    .next_field()
                    .map_err(|e| token_error(field, e))?
                {
                    let key = self.decode_key(&key_name, key_kind)?;
                    let value = self.read_value(graph, field, value_kind, &rel)?;
                    entries.push((key, value));
                }
                self.source
                    .leave_object()
                    .map_err(|e| token_error(field, e))?;

                Ok(Value::Map(entries))
            }

            AbstractType::Boolean => {
                let v = self
                    .source
                    .read_boolean()
                    .map_err(|e| token_error(field, e))?;
                Ok(Value::Bool(v))
            }

            AbstractType::Integer => {
                let v = self
                    .source
                    .read_integer()
                    .map_err(|e| token_error(field, e))?;
                Ok(Value::Int(v))
            }

            AbstractType::Long => {
                let v = self.source.read_long().map_err(|e| token_error(field, e))?;
                Ok(Value::Long(v))
            }

            AbstractType::Double => {
                let v = self
                    .source
                    .read_double()
                    .map_err(|e| token_error(field, e))?;
                Ok(Value::Double(v))
            }

            AbstractType::Choice => {
                let raw = self.source.read_text().map_err(|e| token_error(field, e))?;

                let Some(choice) = self.context.store().choice(kind.name().as_str()) else {
                    return Err(DecodeError::UnknownChoiceKind(kind.name().clone()));
                };
                if !choice.has_member(&raw) {
                    return Err(DecodeError::UnknownChoiceMember {
                        kind: kind.name().clone(),
                        member: raw,
                    });
                }

                Ok(Value::Choice(ChoiceValue::new(kind.name().as_str(), raw)))
            }

            AbstractType::DateTime => {
                let raw = self.source.read_text().map_err(|e| token_error(field, e))?;

                Ok(Value::DateTime(codec::parse_date_time(&raw)?))
            }

            AbstractType::Native => {
                let v = self
                    .source
                    .read_native()
                    .map_err(|e| token_error(field, e))?;
                Ok(Value::Native(v))
            }
        }
    }

    /// Raw-text read; a non-plain-text kind goes through its registered
    /// codec, and an unregistered kind keeps the raw text as-is.
    fn read_text_value(&mut self, field: &FieldName, kind: &KindRef) -> Result<Value, DecodeError> {
        let raw = self.source.read_text().map_err(|e| token_error(field, e))?;

        if kind.as_primitive() == Some(Primitive::Text) {
            return Ok(Value::Text(raw));
        }

        match self.context.codecs().get(kind.name().as_str()) {
            Some(codec) => Ok(codec.decode(&raw)?),
            None => Ok(Value::Text(raw)),
        }
    }

    /// Map keys arrive as field names and decode through the text path.
    fn decode_key(&self, key: &FieldName, kind: &KindRef) -> Result<Value, DecodeError> {
        if kind.as_primitive() == Some(Primitive::Text) {
            return Ok(Value::Text(key.to_string()));
        }

        match self.context.codecs().get(kind.name().as_str()) {
            Some(codec) => Ok(codec.decode(key.as_str())?),
            None => Ok(Value::Text(key.to_string())),
        }
    }

    fn read_links(&mut self, field: &FieldName) -> Result<Vec<ModelLink>, DecodeError> {
        self.source
            .enter_list()
            .map_err(|e| token_error(field, e))?;

        let mut links = Vec::new();
        while self
            .source
            .next_element()
            .map_err(|e| token_error(field, e))?
        {
            links.push(self.read_link(field)?);
        }

        self.source
            .leave_list()
            .map_err(|e| token_error(field, e))?;

        Ok(links)
    }

    fn read_link(&mut self, field: &FieldName) -> Result<ModelLink, DecodeError> {
        self.source
            .enter_object()
            .map_err(|e| token_error(field, e))?;

        let mut rel = None;
        let mut href = None;
        let mut accepts = Vec::new();
        let mut returns = Vec::new();

        while let Some(key) = self
            .source
            .next_field()
            .map_err(|e| token_error(field, e))?
        {
            match key.as_str() {
                "rel" => rel = Some(self.source.read_text().map_err(|e| token_error(field, e))?),
                "href" => {
                    href = Some(self.source.read_text().map_err(|e| token_error(field, e))?);
                }
                "accepts" => accepts = self.read_text_list(field)?,
                "returns" => returns = self.read_text_list(field)?,
                other => {
                    return Err(DecodeError::MalformedLink(format!(
                        "unknown key '{other}'"
                    )));
                }
            }
        }

        self.source
            .leave_object()
            .map_err(|e| token_error(field, e))?;

        Ok(ModelLink {
            rel: rel.ok_or_else(|| DecodeError::MalformedLink("missing 'rel'".to_string()))?,
            href: href.ok_or_else(|| DecodeError::MalformedLink("missing 'href'".to_string()))?,
            accepts,
            returns,
        })
    }

    fn read_text_list(&mut self, field: &FieldName) -> Result<Vec<String>, DecodeError> {
        self.source
            .enter_list()
            .map_err(|e| token_error(field, e))?;

        let mut items = Vec::new();
        while self
            .source
            .next_element()
            .map_err(|e| token_error(field, e))?
        {
            items.push(self.source.read_text().map_err(|e| token_error(field, e))?);
        }

        self.source
            .leave_list()
            .map_err(|e| token_error(field, e))?;

        Ok(items)
    }
}
