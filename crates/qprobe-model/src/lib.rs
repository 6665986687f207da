//! Data model shared by the probe crates.
//!
//! Everything here is request-scoped: a [`QueryStatement`] goes out, a set of [`NativeRow`]s comes back,
//! gets normalized into [`Row`]s and finally projected into [`LabelSchema`] / [`LabelAssignment`] pairs.
mod domain;
pub use domain::*;
