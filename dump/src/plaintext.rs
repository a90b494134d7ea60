//! The plain tree backend: the console layout without any styling.

use core::fmt::{self, Write};

use crate::tree::{Palette, Role, TreeRenderer};

/// A palette that writes text unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct Plain;

impl Palette for Plain {
    fn name(&self) -> &'static str {
        "plaintext"
    }

    fn paint<W: Write + ?Sized>(&self, out: &mut W, _role: Role, text: &str) -> fmt::Result {
        out.write_str(text)
    }
}

/// Renders a value as a plain tree.
pub type PlainRenderer<W> = TreeRenderer<W, Plain>;
