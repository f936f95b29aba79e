//! Node domain module
//!
//! A node consumes the items handed over by the workflow host, performs at
//! most one operation per item and writes the outcome back into the item
//! under a destination key. Failures are isolated per item by
//! [`run_per_item`].

mod entity;
mod executor;
mod host;
mod item;
mod parameter;

pub use entity::{Node, NodeCredential, NodeDefaults, NodeDescription, MAIN_CONNECTION};
pub use executor::run_per_item;
pub use host::ExecuteFunctions;
pub use item::{ItemError, ItemResult, JsonObject, NodeOutput, WorkflowItem};
pub use parameter::{IntegerBounds, ItemParameters, NodeProperty, ParameterKind, TypeOptions};
