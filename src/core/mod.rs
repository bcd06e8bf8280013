//! Core types: the group tree, error marking, scoping, and the terminal gate.

pub mod error;
pub mod group;
pub mod scope;
pub mod terminal;
