#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod backend;
mod display;
mod dumper;
mod error;
mod identity;
mod impls;
mod renderer;
mod scope;

pub mod console;
pub mod forest;
pub mod fs;
pub mod latex;
pub mod plaintext;
pub mod tikz;
pub mod tree;

pub use backend::Backend;
pub use console::{Ansi, ConsoleRenderer};
pub use display::{DumpDisplay, DumpExt};
pub use dumper::{Dump, Dumper, render};
pub use error::DumpError;
pub use forest::ForestRenderer;
pub use fs::{FsOptions, write_files};
pub use identity::{AliasMap, Identity, short_type_name};
pub use plaintext::{Plain, PlainRenderer};
pub use renderer::{Attribute, Renderer};
pub use tikz::TikzRenderer;
pub use tree::{Palette, Role, TreeRenderer};
