//! Policy document model and resolution.
//!
//! The document model is the permissive, serde-deserializable shape a host
//! application feeds in after loading its config format of choice;
//! [`resolve`] turns it into the strict, conflict-free audit policy the
//! engine consumes.

#![forbid(unsafe_code)]

pub mod model;
mod resolve;

pub use model::PolicyDocV1;
pub use resolve::{resolve, ResolvedPolicy};
