//! Picking a backend at runtime.

use crate::{
    ConsoleRenderer, Dump, DumpError, ForestRenderer, PlainRenderer, TikzRenderer, render,
};

/// One of the four output forms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Backend {
    /// ANSI-colored tree.
    Console,
    /// Plain tree.
    Plaintext,
    /// LaTeX `forest` diagram.
    Forest,
    /// LaTeX TikZ graph.
    Tikz,
}

impl Backend {
    /// Every backend, in the order the file facility writes them.
    pub const ALL: [Backend; 4] = [
        Backend::Console,
        Backend::Plaintext,
        Backend::Tikz,
        Backend::Forest,
    ];

    /// File extension conventionally used for this backend's output.
    pub fn extension(self) -> &'static str {
        match self {
            Backend::Console => "ansi",
            Backend::Plaintext => "txt",
            Backend::Forest => "forest.tex",
            Backend::Tikz => "tikz.tex",
        }
    }

    /// Whether the output is a LaTeX diagram that needs a document around it.
    pub fn is_diagram(self) -> bool {
        matches!(self, Backend::Forest | Backend::Tikz)
    }

    /// Renders `value` into a fresh string.
    ///
    /// The console form always carries colors, whatever `NO_COLOR` says.
    pub fn render_to_string<A, T>(self, adapter: &A, value: &T) -> Result<String, DumpError>
    where
        A: ?Sized,
        T: Dump<A> + ?Sized,
    {
        match self {
            Backend::Console => {
                let mut renderer = ConsoleRenderer::new(String::new()).with_colors(true);
                render(&mut renderer, adapter, value)?;
                Ok(renderer.into_inner())
            }
            Backend::Plaintext => {
                let mut renderer = PlainRenderer::new(String::new());
                render(&mut renderer, adapter, value)?;
                Ok(renderer.into_inner())
            }
            Backend::Forest => {
                let mut renderer = ForestRenderer::new(String::new());
                render(&mut renderer, adapter, value)?;
                Ok(renderer.into_inner())
            }
            Backend::Tikz => {
                let mut renderer = TikzRenderer::new(String::new());
                render(&mut renderer, adapter, value)?;
                Ok(renderer.into_inner())
            }
        }
    }
}

impl core::fmt::Display for Backend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Backend::Console => "console",
            Backend::Plaintext => "plaintext",
            Backend::Forest => "forest",
            Backend::Tikz => "tikz",
        })
    }
}
