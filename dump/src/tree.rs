//! The indented tree shared by the console and plaintext backends.
//!
//! ```text
//! Car manufacturer 'Car Brand' model 'Model 2000' year '2002'
//! |- engine Engine fuel electric power '69'
//! `- tires [Tire; 4] size '4'
//!   |- item Tire manufacturer 'Tire Brand' width '215' size '16'
//!   `- item Tire manufacturer 'Tire Brand' width '215' size '16'
//! ```

use core::fmt::{self, Write};

use crate::scope::{Nesting, Scope};
use crate::{Attribute, DumpError, Identity, Renderer};

/// What a piece of tree output is, so a [`Palette`] can style it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Prefixes and branch glyphs.
    Branch,
    /// Attribute labels.
    Label,
    /// Node tags.
    Node,
    /// Scalar and text values, quotes included.
    Value,
    /// Enumeration tags.
    Enum,
    /// Diagnostics.
    Error,
    /// The `undefined` marker.
    Undefined,
    /// Type names in diagnostics.
    Type,
    /// Addresses in diagnostics.
    Address,
}

/// Styles tree output.
pub trait Palette {
    /// Name of the backend this palette produces, used in logs.
    fn name(&self) -> &'static str;

    /// Writes `text` to `out`, styled for `role`.
    fn paint<W: Write + ?Sized>(&self, out: &mut W, role: Role, text: &str) -> fmt::Result;
}

/// Renders a value as an indented tree with branch glyphs.
///
/// Non-inlined attributes start a new line with `|- ` (or `` `- `` for the
/// last child) and grow the prefix by `| ` (or two spaces). Inlined
/// attributes continue the current line.
pub struct TreeRenderer<W, P> {
    out: W,
    palette: P,
    prefix: String,
    /// Column of the current frame's text, relative to the end of `prefix`.
    indent: usize,
}

pub(crate) struct Saved {
    prefix_len: usize,
    indent: usize,
}

impl<W, P> Nesting for TreeRenderer<W, P> {
    type Saved = Saved;

    fn restore(&mut self, saved: Saved) {
        self.prefix.truncate(saved.prefix_len);
        self.indent = saved.indent;
    }
}

impl<W: Write, P: Palette + Default> TreeRenderer<W, P> {
    /// Creates a renderer writing to `out` with the default palette.
    pub fn new(out: W) -> Self {
        Self::with_palette(out, P::default())
    }
}

impl<W: Write, P: Palette> TreeRenderer<W, P> {
    /// Creates a renderer writing to `out` with `palette`.
    pub fn with_palette(out: W, palette: P) -> Self {
        Self {
            out,
            palette,
            prefix: String::new(),
            indent: 0,
        }
    }

    /// The palette in use.
    pub fn palette(&self) -> &P {
        &self.palette
    }

    /// Borrows the sink.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Returns the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    pub(crate) fn set_palette(&mut self, palette: P) {
        self.palette = palette;
    }

    fn enter(&mut self, attribute: &Attribute<'_>) -> Result<Scope<'_, Self>, DumpError> {
        let saved = Saved {
            prefix_len: self.prefix.len(),
            indent: self.indent,
        };
        let label_width = attribute.label.chars().count();
        if attribute.inlined {
            self.out.write_char(' ')?;
            self.indent = 1;
        } else {
            self.out.write_char('\n')?;
            let (glyph, segment) = if attribute.last_child {
                ("`- ", "  ")
            } else {
                ("|- ", "| ")
            };
            self.palette.paint(&mut self.out, Role::Branch, &self.prefix)?;
            self.palette.paint(&mut self.out, Role::Branch, glyph)?;
            self.prefix.push_str(segment);
            self.indent = if label_width == 0 { 1 } else { label_width + 2 };
        }
        if label_width > 0 {
            self.palette
                .paint(&mut self.out, Role::Label, attribute.label)?;
            self.out.write_char(' ')?;
        }
        Ok(Scope::new(self, saved))
    }

    /// Starts a continuation line aligned with the current frame's text.
    fn continuation(&mut self, extra: usize) -> Result<(), DumpError> {
        self.out.write_char('\n')?;
        self.palette.paint(&mut self.out, Role::Branch, &self.prefix)?;
        for _ in 0..self.indent + extra {
            self.out.write_char(' ')?;
        }
        Ok(())
    }
}

impl<W: Write, P: Palette> Renderer for TreeRenderer<W, P> {
    fn name(&self) -> &'static str {
        self.palette.name()
    }

    fn begin(&mut self) -> Result<(), DumpError> {
        self.prefix.clear();
        self.indent = 0;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), DumpError> {
        self.out.write_char('\n')?;
        Ok(())
    }

    fn node(&mut self, _identity: Option<Identity>, text: &str) -> Result<(), DumpError> {
        self.palette.paint(&mut self.out, Role::Node, text)?;
        Ok(())
    }

    fn attr<F>(&mut self, attribute: &Attribute<'_>, render: F) -> Result<(), DumpError>
    where
        F: FnOnce(&mut Self) -> Result<(), DumpError>,
    {
        let mut scope = self.enter(attribute)?;
        render(&mut *scope)
    }

    fn value(&mut self, text: &str) -> Result<(), DumpError> {
        if !text.contains('\n') {
            self.palette
                .paint(&mut self.out, Role::Value, &format!("'{text}'"))?;
            return Ok(());
        }
        // A trailing line break still ends in an empty continuation line.
        let lines: Vec<&str> = text.split('\n').collect();
        let count = lines.len();
        for (i, line) in lines.into_iter().enumerate() {
            let mut segment = String::with_capacity(line.len() + 2);
            if i == 0 {
                segment.push('\'');
            } else {
                // Skip past the opening quote.
                self.continuation(1)?;
            }
            segment.push_str(line);
            if i + 1 == count {
                segment.push('\'');
            }
            self.palette.paint(&mut self.out, Role::Value, &segment)?;
        }
        Ok(())
    }

    fn enum_tag(&mut self, text: &str) -> Result<(), DumpError> {
        self.palette.paint(&mut self.out, Role::Enum, text)?;
        Ok(())
    }

    fn block(&mut self, text: &str) -> Result<(), DumpError> {
        self.out.write_char('\n')?;
        self.palette.paint(&mut self.out, Role::Branch, &self.prefix)?;
        self.palette.paint(&mut self.out, Role::Branch, "`- ")?;
        for (i, line) in text.lines().enumerate() {
            if i > 0 {
                self.out.write_char('\n')?;
                self.palette.paint(&mut self.out, Role::Branch, &self.prefix)?;
                self.out.write_str("   ")?;
            }
            self.palette.paint(&mut self.out, Role::Value, line)?;
        }
        Ok(())
    }

    fn undefined(&mut self) -> Result<(), DumpError> {
        self.palette
            .paint(&mut self.out, Role::Undefined, "undefined")?;
        Ok(())
    }

    fn error(&mut self, text: &str) -> Result<(), DumpError> {
        self.palette.paint(&mut self.out, Role::Error, text)?;
        Ok(())
    }

    fn type_addr(&mut self, identity: Identity) -> Result<(), DumpError> {
        self.out.write_char(' ')?;
        self.palette
            .paint(&mut self.out, Role::Type, &identity.short_type_name())?;
        self.out.write_char(' ')?;
        self.palette.paint(
            &mut self.out,
            Role::Address,
            &format!("{:#x}", identity.address()),
        )?;
        Ok(())
    }
}
