//! The graph diagram backend, emitting TikZ markup.
//!
//! Every non-inlined value with an identity becomes one `rectangle split`
//! node, drawn once no matter how many parents reach it. Inlined attributes
//! and nodeless leaves become node parts of the node they belong to, and
//! every parent/child pair of nodes is joined by an edge.

use core::fmt::Write;
use core::mem;
use std::collections::{BTreeMap, BTreeSet};

use tracing::{trace, warn};

use crate::{AliasMap, Attribute, DumpError, Identity, Renderer};

const PREAMBLE: &str = "\\begin{tikzpicture}[layered layout,every edge/.style={very thick, draw=blue!40!black!60, shorten >=1pt, shorten <=1pt}, every node/.style={rectangle, text ragged, inner sep=2mm, rounded corners, shade, top color=white, bottom color=blue!50!black!20, draw=blue!40!black!60, very thick }]\n";

const POSTSCRIPT: &str = "\\end{tikzpicture}\n";

/// Names the node drawn for a root value that produced no node of its own.
const ROOT: Identity = Identity::new(0, "root");

/// Names of the `rectangle split` parts after the node tag.
const NODEPARTS: [&str; 19] = [
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
    "twenty",
];

/// Escapes, longest source first where sources overlap.
///
/// Every escape starts with `\` or `$`, both of which are escaped too.
const ESCAPES: &[(&str, &str)] = &[
    ("\\", r"\textbackslash{}"),
    ("$", r"\$"),
    ("%", r"\%"),
    ("_", r"\_"),
    ("&", r"\&"),
    ("#", r"\#"),
    ("{", r"\{"),
    ("}", r"\}"),
    ("->", r"$\rightarrow$"),
    ("<=", r"$\leq$"),
    (">=", r"$\geq$"),
    ("<", "$<$"),
    (">", "$>$"),
];

fn replace_tokens(text: &str, table: &[(&str, &str)], forward: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    'outer: while let Some(c) = rest.chars().next() {
        for (raw, escaped) in table {
            let (from, to) = if forward {
                (*raw, *escaped)
            } else {
                (*escaped, *raw)
            };
            if let Some(tail) = rest.strip_prefix(from) {
                out.push_str(to);
                rest = tail;
                continue 'outer;
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

/// Escapes `text` for use inside a TikZ node.
pub fn escape(text: &str) -> String {
    replace_tokens(text, ESCAPES, true)
}

/// Reverses [`escape`].
pub fn unescape(text: &str) -> String {
    replace_tokens(text, ESCAPES, false)
}

/// Bookkeeping shared by every call of one render pass.
#[derive(Default)]
struct Pass {
    /// Resolved identities that produced a node.
    visited: BTreeSet<Identity>,
    aliases: AliasMap,
}

struct PendingNode {
    identity: Identity,
    tag: String,
}

/// Output of one attribute call, merged into its parent's frame when the
/// call returns.
#[derive(Default)]
struct Frame {
    inlined: bool,
    /// The value was already drawn elsewhere; only its edges count.
    duplicate: bool,
    text: String,
    node: Option<PendingNode>,
    parts: Vec<(String, String)>,
    /// Definitions of descendant nodes, in pre-order.
    nodes: String,
    edges: Vec<(Identity, Identity)>,
    child_edges: Vec<(Identity, Identity)>,
}

impl Frame {
    fn new(inlined: bool) -> Self {
        Self {
            inlined,
            ..Self::default()
        }
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(text);
    }
}

/// Renders a value as a TikZ graph with shared values drawn once.
pub struct TikzRenderer<W> {
    out: W,
    hints: BTreeMap<Identity, String>,
    pass: Pass,
    frame: Frame,
}

impl<W: Write> TikzRenderer<W> {
    /// Creates a renderer writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            hints: BTreeMap::new(),
            pass: Pass::default(),
            frame: Frame::default(),
        }
    }

    /// Appends `style` to the options of the node drawn for `identity`.
    pub fn with_hint(mut self, identity: Identity, style: impl Into<String>) -> Self {
        self.hints.insert(identity, style.into());
        self
    }

    /// Adds several node hints, see [`with_hint`](Self::with_hint).
    pub fn with_hints<I, S>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = (Identity, S)>,
        S: Into<String>,
    {
        self.hints
            .extend(hints.into_iter().map(|(identity, style)| (identity, style.into())));
        self
    }

    /// Aliases recorded by the last pass.
    pub fn aliases(&self) -> &AliasMap {
        &self.pass.aliases
    }

    /// Whether the last pass drew a node for the resolved `identity`.
    pub fn is_visited(&self, identity: &Identity) -> bool {
        self.pass.visited.contains(identity)
    }

    /// Returns the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn resolve(&self, identity: Option<Identity>) -> Result<Option<Identity>, DumpError> {
        identity
            .map(|identity| self.pass.aliases.resolve(identity))
            .transpose()
    }

    fn write_node(
        &self,
        out: &mut String,
        node: &PendingNode,
        parts: &[(String, String)],
    ) -> core::fmt::Result {
        if parts.len() > NODEPARTS.len() {
            warn!(
                identity = %node.identity,
                parts = parts.len(),
                kept = NODEPARTS.len(),
                "too many node parts, dropping the rest"
            );
        }
        let shown = parts.len().min(NODEPARTS.len());
        out.write_str("\\node\n")?;
        write!(
            out,
            "\t[rectangle split, rectangle split parts={}, text ragged",
            shown + 1
        )?;
        if let Some(hint) = self.hints.get(&node.identity) {
            write!(out, ", {hint}")?;
        }
        out.write_str("]\n")?;
        writeln!(out, "\t ({})", node.identity)?;
        out.write_str("\t{\n")?;
        writeln!(out, "\t\t\\textbf{{{}}}", node.tag)?;
        for (name, (label, text)) in NODEPARTS.iter().zip(parts) {
            writeln!(out, "\t\t\\nodepart{{{name}}}")?;
            writeln!(out, "\t\t\\textit{{{}}}", escape(label))?;
            writeln!(out, "\t\t{text}")?;
        }
        out.write_str("\t};\n")
    }

    /// Moves the text and parts of a child that drew no node of its own
    /// into the current frame, labelled under `label`.
    fn absorb(&mut self, label: &str, text: String, parts: Vec<(String, String)>) {
        if !text.is_empty() {
            self.frame.parts.push((label.to_owned(), text));
        }
        for (sub, text) in parts {
            let label = if label.is_empty() {
                sub
            } else {
                format!("{label} {sub}")
            };
            self.frame.parts.push((label, text));
        }
    }
}

impl<W: Write> Renderer for TikzRenderer<W> {
    fn name(&self) -> &'static str {
        "tikz"
    }

    fn begin(&mut self) -> Result<(), DumpError> {
        self.pass = Pass::default();
        self.frame = Frame::new(false);
        self.out.write_str(PREAMBLE)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), DumpError> {
        let root = mem::take(&mut self.frame);
        let mut nodes = String::new();
        match &root.node {
            Some(node) => self.write_node(&mut nodes, node, &root.parts)?,
            // A leaf root (absent value, diagnostic, scalar) still shows up.
            None if !root.text.is_empty() || !root.parts.is_empty() => {
                trace!(identity = %ROOT, "leaf root node");
                self.pass.visited.insert(ROOT);
                let node = PendingNode {
                    identity: ROOT,
                    tag: root.text.clone(),
                };
                self.write_node(&mut nodes, &node, &root.parts)?;
            }
            None => {}
        }
        nodes.push_str(&root.nodes);
        self.out.write_str(&nodes)?;

        let mut emitted = BTreeSet::new();
        for &(from, to) in root.edges.iter().chain(&root.child_edges) {
            // Both ends must have been drawn, otherwise the edge dangles.
            if !self.pass.visited.contains(&from) || !self.pass.visited.contains(&to) {
                continue;
            }
            if emitted.insert((from, to)) {
                trace!(%from, %to, "edge");
                writeln!(self.out, "\\draw ({from}) edge[->] ({to});")?;
            }
        }
        self.out.write_str(POSTSCRIPT)?;
        Ok(())
    }

    fn node(&mut self, identity: Option<Identity>, text: &str) -> Result<(), DumpError> {
        let tag = escape(text);
        if self.frame.inlined || self.frame.node.is_some() {
            self.frame.push_text(&tag);
            return Ok(());
        }
        let Some(identity) = self.resolve(identity)? else {
            self.frame.push_text(&tag);
            return Ok(());
        };
        if self.pass.visited.insert(identity) {
            trace!(%identity, tag = text, "node");
            self.frame.node = Some(PendingNode { identity, tag });
        } else {
            self.frame.duplicate = true;
        }
        Ok(())
    }

    fn attr<F>(&mut self, attribute: &Attribute<'_>, render: F) -> Result<(), DumpError>
    where
        F: FnOnce(&mut Self) -> Result<(), DumpError>,
    {
        if attribute.inlined
            && let (Some(parent), Some(child)) = (
                self.resolve(attribute.parent)?,
                self.resolve(attribute.child)?,
            )
            && parent != child
            && self.pass.aliases.add(child, parent)
        {
            trace!(%child, %parent, "inlined alias");
        }

        let outer = mem::replace(&mut self.frame, Frame::new(attribute.inlined));
        let result = render(self);
        let child = mem::replace(&mut self.frame, outer);
        result?;

        let Frame {
            duplicate,
            text,
            node,
            parts,
            nodes,
            edges,
            child_edges,
            ..
        } = child;
        match node {
            Some(node) => {
                let mut definition = String::new();
                self.write_node(&mut definition, &node, &parts)?;
                self.frame.nodes.push_str(&definition);
            }
            None if !duplicate => self.absorb(attribute.label, text, parts),
            None => {}
        }
        self.frame.nodes.push_str(&nodes);

        if !attribute.inlined
            && let (Some(parent), Some(child)) = (
                self.resolve(attribute.parent)?,
                self.resolve(attribute.child)?,
            )
            && parent != child
        {
            self.frame.edges.push((parent, child));
        }
        self.frame.child_edges.extend(edges);
        self.frame.child_edges.extend(child_edges);
        Ok(())
    }

    fn value(&mut self, text: &str) -> Result<(), DumpError> {
        let escaped = escape(text);
        let lines: Vec<&str> = escaped.split('\n').collect();
        self.frame.push_text(&lines.join(r" \\ "));
        Ok(())
    }

    fn enum_tag(&mut self, text: &str) -> Result<(), DumpError> {
        self.frame.push_text(&escape(text));
        Ok(())
    }

    fn block(&mut self, text: &str) -> Result<(), DumpError> {
        self.value(text)
    }

    fn undefined(&mut self) -> Result<(), DumpError> {
        self.frame.push_text("undefined");
        Ok(())
    }

    fn error(&mut self, text: &str) -> Result<(), DumpError> {
        self.frame.push_text(&escape(text));
        Ok(())
    }

    fn type_addr(&mut self, _identity: Identity) -> Result<(), DumpError> {
        Ok(())
    }

    fn dereference(&mut self, outer: Identity, inner: Identity) -> Result<(), DumpError> {
        if outer == inner {
            return Err(DumpError::SelfAlias { identity: outer });
        }
        let aliases = &mut self.pass.aliases;
        if self.frame.inlined {
            // The referent is absorbed into whatever `outer` is absorbed into.
            let from = aliases.resolve(inner)?;
            let to = aliases.resolve(outer)?;
            if from != to && aliases.add(from, to) {
                trace!(%from, %to, "inlined dereference alias");
            }
        } else {
            let to = aliases.resolve(inner)?;
            if aliases.resolve(outer)? != to && aliases.add(outer, to) {
                trace!(%outer, %to, "dereference alias");
            }
        }
        Ok(())
    }

    // Already on the path, so already drawn: the edge to it is enough.
    fn cycle(&mut self, identity: Identity) -> Result<(), DumpError> {
        trace!(%identity, "cycle");
        Ok(())
    }
}
