//! Helpers shared across the state providers and the presentation layer.
//!
//! SYSTEM CONTEXT
//! ==============
//! These modules hold pure string/byte logic with no host dependencies, so
//! they are tested directly without an environment.

pub mod contact;
pub mod data_uri;
