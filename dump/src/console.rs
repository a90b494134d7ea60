//! The colored tree backend.

use core::fmt::{self, Write};

use owo_colors::{OwoColorize, Style};

use crate::tree::{Palette, Role, TreeRenderer};

/// ANSI styling for tree output.
///
/// By default colors are on unless the `NO_COLOR` environment variable is set.
#[derive(Clone, Copy, Debug)]
pub struct Ansi {
    use_colors: bool,
}

impl Ansi {
    /// Creates a palette, with colors on or off.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Whether this palette emits escape codes.
    pub fn use_colors(&self) -> bool {
        self.use_colors
    }

    fn style(role: Role) -> Style {
        match role {
            Role::Branch => Style::new().blue(),
            Role::Label => Style::new(),
            Role::Node => Style::new().bold().magenta(),
            Role::Value => Style::new().green(),
            Role::Enum | Role::Type => Style::new().yellow(),
            Role::Error => Style::new().bold().red(),
            Role::Undefined => Style::new().magenta(),
            Role::Address => Style::new().cyan(),
        }
    }
}

impl Default for Ansi {
    fn default() -> Self {
        Self::new(std::env::var_os("NO_COLOR").is_none())
    }
}

impl Palette for Ansi {
    fn name(&self) -> &'static str {
        "console"
    }

    fn paint<W: Write + ?Sized>(&self, out: &mut W, role: Role, text: &str) -> fmt::Result {
        if !self.use_colors || text.is_empty() || role == Role::Label {
            return out.write_str(text);
        }
        write!(out, "{}", text.style(Self::style(role)))
    }
}

/// Renders a value as an ANSI-colored tree.
pub type ConsoleRenderer<W> = TreeRenderer<W, Ansi>;

impl<W: Write> TreeRenderer<W, Ansi> {
    /// Turns colors on or off, overriding `NO_COLOR`.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.set_palette(Ansi::new(use_colors));
        self
    }
}

/// Removes ANSI escape sequences, turning console output into plaintext output.
pub fn unescape(text: &str) -> String {
    strip_ansi_escapes::strip_str(text)
}
