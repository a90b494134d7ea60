//! The capability interface every backend implements.

use crate::{DumpError, Identity};

/// Where an attribute sits relative to its parent.
///
/// Handed to [`Renderer::attr`] before the child is rendered.
#[derive(Clone, Copy, Debug)]
pub struct Attribute<'a> {
    /// Identity of the value owning the attribute, if it has one.
    pub parent: Option<Identity>,
    /// Identity of the attribute's value, if it has one.
    pub child: Option<Identity>,
    /// Label printed in front of the value. May be empty.
    pub label: &'a str,
    /// Whether this is the last attribute of its parent.
    pub last_child: bool,
    /// Whether the value is absorbed into its parent's line or node.
    pub inlined: bool,
}

/// A rendering backend.
///
/// The traversal core never writes output itself: every structural
/// primitive of [`Dumper`](crate::Dumper) ends up in one of these hooks.
/// A renderer is bound to its sink when constructed; [`begin`](Self::begin)
/// and [`finish`](Self::finish) bracket a single render pass and must reset
/// any pass-scoped state.
pub trait Renderer {
    /// Short backend name, used in logs.
    fn name(&self) -> &'static str;

    /// Starts a render pass.
    fn begin(&mut self) -> Result<(), DumpError> {
        Ok(())
    }

    /// Ends a render pass and terminates the output with a newline.
    fn finish(&mut self) -> Result<(), DumpError>;

    /// Announces the node tag of a record-like value.
    fn node(&mut self, identity: Option<Identity>, text: &str) -> Result<(), DumpError>;

    /// Opens an attribute frame and runs `render` inside it.
    ///
    /// Everything `render` emits belongs to the attribute; the previous
    /// frame is restored before this returns.
    fn attr<F>(&mut self, attribute: &Attribute<'_>, render: F) -> Result<(), DumpError>
    where
        F: FnOnce(&mut Self) -> Result<(), DumpError>;

    /// A primitive leaf. Text may span several lines.
    fn value(&mut self, text: &str) -> Result<(), DumpError>;

    /// A fieldless enumeration value.
    fn enum_tag(&mut self, text: &str) -> Result<(), DumpError>;

    /// A free-form multi-line block.
    fn block(&mut self, text: &str) -> Result<(), DumpError>;

    /// The `undefined` marker for absent values.
    fn undefined(&mut self) -> Result<(), DumpError>;

    /// A diagnostic leaf.
    fn error(&mut self, text: &str) -> Result<(), DumpError>;

    /// The type name and address of a value, for diagnostics.
    fn type_addr(&mut self, identity: Identity) -> Result<(), DumpError>;

    /// Called when `outer` is dereferenced into `inner`.
    ///
    /// Only identity-aware backends care. They must reject
    /// `outer == inner` with [`DumpError::SelfAlias`].
    fn dereference(&mut self, outer: Identity, inner: Identity) -> Result<(), DumpError> {
        if outer == inner {
            return Err(DumpError::SelfAlias { identity: outer });
        }
        Ok(())
    }

    /// Called instead of descending into a shared referent that is already
    /// being rendered further up.
    fn cycle(&mut self, identity: Identity) -> Result<(), DumpError> {
        self.error("cycle detected")?;
        self.type_addr(identity)
    }
}
