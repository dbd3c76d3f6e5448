//! Repository implementations.
//!
//! Currently one backend ships with the crate:
//! - `local`: in-memory implementation for unit testing, local development and
//!   hosts that persist elsewhere

pub mod local;

pub use local::LocalRepository;
