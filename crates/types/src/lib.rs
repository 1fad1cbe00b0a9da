//! Shared data model for the Stepform editor engine.
//!
//! The types here describe what the flow designer hands to the engine (step
//! and definition documents), the descriptors the engine derives from them,
//! and the values widgets emit back through their change callbacks. Maps use
//! `IndexMap` so authoring order survives a load/save cycle.

pub mod definition;
pub mod descriptor;
pub mod value;

pub use definition::{Definition, Step, StepField};
pub use descriptor::{FieldDescriptor, MISSING_OPTION_NAME, OptionEntry, OptionSource, OptionSourceError, ValueType};
pub use value::{FieldValue, ObjectArrayPatch};
