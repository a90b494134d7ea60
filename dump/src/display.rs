//! Display trait implementations for dumping values inline in `format!`

use core::fmt::{self, Display, Formatter};

use crate::{ConsoleRenderer, Dump, PlainRenderer, render};

/// Display wrapper rendering a value as a tree.
pub struct DumpDisplay<'a, A: ?Sized, T: ?Sized> {
    adapter: &'a A,
    value: &'a T,
    use_colors: bool,
}

impl<A: ?Sized, T: ?Sized> DumpDisplay<'_, A, T> {
    /// Renders with ANSI colors instead of plain text.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }
}

impl<A: ?Sized, T: Dump<A> + ?Sized> Display for DumpDisplay<'_, A, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // Every render error is fatal for the pass, so the formatter can only
        // report that it failed.
        if self.use_colors {
            let mut renderer = ConsoleRenderer::new(f).with_colors(true);
            render(&mut renderer, self.adapter, self.value).map_err(|_| fmt::Error)
        } else {
            let mut renderer = PlainRenderer::new(f);
            render(&mut renderer, self.adapter, self.value).map_err(|_| fmt::Error)
        }
    }
}

/// Extension trait to display any dumpable value
pub trait DumpExt<A: ?Sized>: Dump<A> {
    /// Get a displayable wrapper that renders this value through `adapter`
    fn dumped<'a>(&'a self, adapter: &'a A) -> DumpDisplay<'a, A, Self>;
}

impl<A: ?Sized, T: Dump<A> + ?Sized> DumpExt<A> for T {
    fn dumped<'a>(&'a self, adapter: &'a A) -> DumpDisplay<'a, A, Self> {
        DumpDisplay {
            adapter,
            value: self,
            use_colors: false,
        }
    }
}
