//! The bracketed diagram backend, emitting LaTeX `forest` markup.

use core::fmt::Write;

use crate::scope::{Nesting, Scope};
use crate::{Attribute, DumpError, Identity, Renderer};

const PREAMBLE: &str = r"\begin{forest}
  for tree={
    font=\ttfamily,
    grow'=0,
    child anchor=west,
    parent anchor=south,
    anchor=west,
    calign=first,
    edge path={
      \noexpand\path [draw, \forestoption{edge}]
      (!u.south west) +(7.5pt,0) |- node[fill,inner sep=1.25pt] {} (.child anchor)\forestoption{edge label};
    },
    before typesetting nodes={
      if n=1
        {insert before={[,phantom]}}
        {}
    },
    fit=band,
    before computing xy={l=15pt},
  }
";

/// Characters with a meaning in `forest` node content, and their escapes.
///
/// No escape is a prefix of another and every escape starts with `\` or `{`,
/// which are themselves escaped, so [`unescape`] can decode greedily.
const ESCAPES: &[(char, &str)] = &[
    ('\\', r"\textbackslash{}"),
    ('_', r"\_"),
    ('&', r"\&"),
    ('#', r"\#"),
    ('$', r"\$"),
    ('%', r"\%"),
    ('{', r"\{"),
    ('}', r"\}"),
    (',', "{,}"),
    ('[', "{[}"),
    (']', "{]}"),
    ('=', "{=}"),
    ('~', r"\textasciitilde{}"),
    ('^', r"\textasciicircum{}"),
];

/// Escapes `text` for use inside a `forest` node.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match ESCAPES.iter().find(|(raw, _)| *raw == c) {
            Some((_, escaped)) => out.push_str(escaped),
            None => out.push(c),
        }
    }
    out
}

/// Reverses [`escape`].
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    'outer: while let Some(c) = rest.chars().next() {
        for (raw, escaped) in ESCAPES {
            if let Some(tail) = rest.strip_prefix(*escaped) {
                out.push(*raw);
                rest = tail;
                continue 'outer;
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

/// Renders a value as a `forest` tree.
///
/// Every non-inlined attribute opens a bracket on its own line, indented by
/// depth; inlined attributes stay inside their parent's bracket.
pub struct ForestRenderer<W> {
    out: W,
    depth: usize,
}

impl<W> Nesting for ForestRenderer<W> {
    type Saved = usize;

    fn restore(&mut self, depth: usize) {
        self.depth = depth;
    }
}

impl<W: Write> ForestRenderer<W> {
    /// Creates a renderer writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out, depth: 0 }
    }

    /// Returns the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn enter(&mut self, attribute: &Attribute<'_>) -> Result<Scope<'_, Self>, DumpError> {
        let saved = self.depth;
        if attribute.inlined {
            self.out.write_char(' ')?;
        } else {
            self.depth += 1;
            self.out.write_char('\n')?;
            for _ in 0..self.depth {
                self.out.write_str("  ")?;
            }
            self.out.write_char('[')?;
        }
        if !attribute.label.is_empty() {
            write!(self.out, "{} ", escape(attribute.label))?;
        }
        Ok(Scope::new(self, saved))
    }
}

impl<W: Write> Renderer for ForestRenderer<W> {
    fn name(&self) -> &'static str {
        "forest"
    }

    fn begin(&mut self) -> Result<(), DumpError> {
        self.depth = 0;
        self.out.write_str(PREAMBLE)?;
        self.out.write_char('[')?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), DumpError> {
        self.out.write_str("]\n\\end{forest}\n")?;
        Ok(())
    }

    fn node(&mut self, _identity: Option<Identity>, text: &str) -> Result<(), DumpError> {
        write!(self.out, r"\textbf{{\textcolor{{magenta}}{{{}}}}}", escape(text))?;
        Ok(())
    }

    fn attr<F>(&mut self, attribute: &Attribute<'_>, render: F) -> Result<(), DumpError>
    where
        F: FnOnce(&mut Self) -> Result<(), DumpError>,
    {
        let mut scope = self.enter(attribute)?;
        render(&mut *scope)?;
        if !attribute.inlined {
            scope.out.write_char(']')?;
        }
        Ok(())
    }

    fn value(&mut self, text: &str) -> Result<(), DumpError> {
        if text.contains('\n') {
            return self.block(text);
        }
        write!(self.out, r"\textcolor{{green}}{{ {} }}", escape(text))?;
        Ok(())
    }

    fn enum_tag(&mut self, text: &str) -> Result<(), DumpError> {
        write!(self.out, r"\textcolor{{orange}}{{{}}}", escape(text))?;
        Ok(())
    }

    fn block(&mut self, text: &str) -> Result<(), DumpError> {
        let body = escape(text)
            .replace('\n', "\\\\\n  ")
            .replace(' ', "\\ ");
        write!(self.out, "\\\\\n\\ \\ {body}, align=left")?;
        Ok(())
    }

    fn undefined(&mut self) -> Result<(), DumpError> {
        self.out.write_str(r"\textcolor{violet}{undefined}")?;
        Ok(())
    }

    fn error(&mut self, text: &str) -> Result<(), DumpError> {
        write!(self.out, r"\textbf{{\textcolor{{red}}{{{}}}}}", escape(text))?;
        Ok(())
    }

    fn type_addr(&mut self, identity: Identity) -> Result<(), DumpError> {
        write!(
            self.out,
            r" \textcolor{{orange}}{{{}}} \textcolor{{cyan}}{{{:#x}}}",
            escape(&identity.short_type_name()),
            identity.address()
        )?;
        Ok(())
    }
}
