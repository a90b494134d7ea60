#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

use std::collections::BTreeSet;
use std::sync::LazyLock;
use std::time::Instant;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

struct Uptime;

impl FormatTime for Uptime {
    fn format_time(&self, w: &mut Writer<'_>) -> core::fmt::Result {
        let elapsed = START_TIME.elapsed();
        write!(w, "{:4}.{:03}s", elapsed.as_secs(), elapsed.subsec_millis())
    }
}

/// Installs the global subscriber exactly once per test binary.
static SUBSCRIBER_INIT: LazyLock<()> = LazyLock::new(|| {
    let _ = *START_TIME;

    let filter = std::env::var("DUMP_LOG")
        .ok()
        .and_then(|s| s.parse::<Targets>().ok())
        .unwrap_or_else(|| Targets::new().with_default(tracing::Level::INFO));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_test_writer()
                .with_timer(Uptime)
                .with_target(false)
                .with_level(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .ok();
});

/// Set up a tracing subscriber for tests.
///
/// The filter comes from the `DUMP_LOG` environment variable, using the
/// `Targets` syntax (`DUMP_LOG=dump=trace`), and defaults to `info`.
/// Safe to call from every test.
pub fn setup() {
    #[allow(clippy::let_unit_value)]
    let _ = *SUBSCRIBER_INIT;
}

/// A node parsed back from TikZ output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TikzNode {
    /// The node name, e.g. `0x7ffd3a10-dumpdemocarCar`.
    pub id: String,
    /// The bold tag line.
    pub tag: String,
    /// The node parts as `(label, text)`, in order.
    pub parts: Vec<(String, String)>,
}

/// Nodes and edges parsed back from TikZ output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TikzGraph {
    /// Node definitions, in output order.
    pub nodes: Vec<TikzNode>,
    /// Edges as `(from, to)`, in output order.
    pub edges: Vec<(String, String)>,
}

impl TikzGraph {
    /// Parses the output of a TikZ render pass.
    ///
    /// Panics on lines it does not expect, so a malformed picture fails the
    /// test that produced it.
    pub fn parse(source: &str) -> Self {
        let mut graph = TikzGraph::default();
        let mut lines = source.lines();
        while let Some(line) = lines.next() {
            if line == "\\node" {
                graph.nodes.push(parse_node(&mut lines));
            } else if let Some(edge) = line.strip_prefix("\\draw (") {
                let (from, rest) = edge
                    .split_once(") edge[->] (")
                    .unwrap_or_else(|| panic!("malformed edge: {line}"));
                let to = rest
                    .strip_suffix(");")
                    .unwrap_or_else(|| panic!("malformed edge: {line}"));
                graph.edges.push((from.to_owned(), to.to_owned()));
            } else if !(line.starts_with("\\begin{tikzpicture}") || line == "\\end{tikzpicture}") {
                panic!("unexpected line in TikZ output: {line:?}");
            }
        }
        graph
    }

    /// Nodes whose tag is `tag`.
    pub fn tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a TikzNode> + 'a {
        self.nodes.iter().filter(move |node| node.tag == tag)
    }

    /// The node named `id`.
    pub fn node(&self, id: &str) -> Option<&TikzNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Distinct sources of edges pointing at `id`.
    pub fn parents(&self, id: &str) -> BTreeSet<&str> {
        self.edges
            .iter()
            .filter(|(_, to)| to == id)
            .map(|(from, _)| from.as_str())
            .collect()
    }

    /// Edges whose ends are not both defined nodes.
    pub fn dangling_edges(&self) -> Vec<&(String, String)> {
        let ids: BTreeSet<&str> = self.nodes.iter().map(|node| node.id.as_str()).collect();
        self.edges
            .iter()
            .filter(|(from, to)| !ids.contains(from.as_str()) || !ids.contains(to.as_str()))
            .collect()
    }
}

fn parse_node<'a>(lines: &mut impl Iterator<Item = &'a str>) -> TikzNode {
    let mut next = || lines.next().unwrap_or_else(|| panic!("truncated node"));

    let style = next();
    assert!(style.starts_with("\t[rectangle split"), "bad node style: {style:?}");
    let id = next()
        .strip_prefix("\t (")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or_else(|| panic!("bad node id"))
        .to_owned();
    assert_eq!(next(), "\t{");
    let tag = next()
        .strip_prefix("\t\t\\textbf{")
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or_else(|| panic!("bad node tag"))
        .to_owned();

    let mut parts = Vec::new();
    loop {
        let line = next();
        if line == "\t};" {
            break;
        }
        assert!(line.starts_with("\t\t\\nodepart{"), "bad node part: {line:?}");
        let label = next()
            .strip_prefix("\t\t\\textit{")
            .and_then(|rest| rest.strip_suffix('}'))
            .unwrap_or_else(|| panic!("bad node part label"))
            .to_owned();
        let text = next()
            .strip_prefix("\t\t")
            .unwrap_or_else(|| panic!("bad node part text"))
            .to_owned();
        parts.push((label, text));
    }
    TikzNode { id, tag, parts }
}
