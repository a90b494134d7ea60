#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub mod ast;
pub mod car;

/// Adapter rendering every field of every demo type.
#[derive(Clone, Copy, Debug, Default)]
pub struct Full;

/// Adapter rendering only a few car fields; engines and tires on their own
/// are deliberately left out.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sparse;
