//! Decode-event sink boundary.
//!
//! Observation is optional, injected by the caller, and must not affect
//! decode semantics. Core decode logic reports through [`DecodeSink`]
//! only; there is no global observer state.

use crate::graph::ModelId;
use modelwire_schema::ident::SchemaId;

///
/// DecodeEvent
///

#[derive(Clone, Debug)]
pub enum DecodeEvent {
    /// A model-graph decode started for a root of the given type.
    GraphBegin { root: SchemaId },

    /// The decode finished; `models` is the number of models built.
    GraphEnd { root: SchemaId, models: usize },

    /// A model became the current write target.
    FocusPushed {
        model: ModelId,
        relationship: String,
    },

    /// The current write target reverted to its parent.
    FocusPopped { model: ModelId },

    /// A base schema could not be found and its branch was skipped.
    /// Emitted only under [`MissingBasePolicy::Warn`].
    ///
    /// [`MissingBasePolicy::Warn`]: crate::prototype::MissingBasePolicy::Warn
    ResolutionWarning { subject: SchemaId, missing: SchemaId },
}

///
/// DecodeSink
///

pub trait DecodeSink: Send + Sync {
    fn on_event(&self, event: DecodeEvent);
}

///
/// NullSink
/// Default sink; discards every event.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DecodeSink for NullSink {
    fn on_event(&self, _: DecodeEvent) {}
}
