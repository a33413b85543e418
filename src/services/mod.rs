// Services module - input resolution and the external conversion engine
//
// This module contains:
// - InputResolver: turns heterogeneous drop/dialog payloads into one path
// - ConversionBackend / EngineClient: subprocess seam for conversion jobs

pub mod engine;
pub mod input;

pub use engine::{ConversionBackend, EngineClient, EngineError, EngineEvent};
pub use input::{
    DialogSelection, DropItem, DropPayload, DroppedFile, InputError, InputResolver, ItemKind,
    Resolution,
};
