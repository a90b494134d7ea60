use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

use dump::{
    AliasMap, Backend, ConsoleRenderer, Dump, DumpError, Dumper, Identity, PlainRenderer,
    Renderer, TikzRenderer, dump_unimplemented, render,
};
use dump_testhelpers::{TikzGraph, setup};
use indoc::indoc;

struct Adapter;

struct Cell {
    name: &'static str,
    next: RefCell<Option<Rc<Cell>>>,
}

impl Dump<Adapter> for Cell {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, Adapter, R>) -> Result<(), DumpError> {
        d.node(self, "Cell")?;
        d.attr(self, "name", self.name, false, true)?;
        d.attr(self, "next", &self.next, true, false)
    }
}

fn ring() -> (Rc<Cell>, Rc<Cell>) {
    let a = Rc::new(Cell {
        name: "a",
        next: RefCell::new(None),
    });
    let b = Rc::new(Cell {
        name: "b",
        next: RefCell::new(Some(Rc::clone(&a))),
    });
    *a.next.borrow_mut() = Some(Rc::clone(&b));
    (a, b)
}

fn unlink(a: &Cell) {
    a.next.borrow_mut().take();
}

#[test]
fn cycles_are_cut_in_trees() {
    setup();
    let (a, _b) = ring();
    let out = Backend::Plaintext.render_to_string(&Adapter, &a).unwrap();
    unlink(&a);

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3, "{out}");
    assert_eq!(lines[0], "Cell name 'a'");
    assert_eq!(lines[1], "`- next Cell name 'b'");
    assert!(
        lines[2].starts_with("  `- next cycle detected Cell 0x"),
        "{}",
        lines[2]
    );
}

#[test]
fn cycles_close_into_edges_in_graphs() {
    setup();
    let (a, _b) = ring();
    let out = Backend::Tikz.render_to_string(&Adapter, &a).unwrap();
    unlink(&a);

    let graph = TikzGraph::parse(&out);
    assert_eq!(graph.nodes.len(), 2);
    let first = &graph.nodes[0].id;
    let second = &graph.nodes[1].id;
    assert_eq!(graph.edges, [(first.clone(), second.clone()), (second.clone(), first.clone())]);
}

#[test]
fn mutably_borrowed_cells_are_reported() {
    setup();
    let cell = RefCell::new(5u32);
    let _guard = cell.borrow_mut();
    let out = Backend::Plaintext.render_to_string(&Adapter, &cell).unwrap();
    assert!(
        out.starts_with("already mutably borrowed RefCell<u32> 0x"),
        "{out}"
    );
}

struct Loop;

impl Dump<Adapter> for Loop {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, Adapter, R>) -> Result<(), DumpError> {
        d.node(self, "Loop")?;
        d.tagged(self, self)
    }
}

#[test]
fn dereferencing_into_itself_is_fatal() {
    setup();
    for backend in Backend::ALL {
        let err = backend.render_to_string(&Adapter, &Loop).unwrap_err();
        match err {
            DumpError::SelfAlias { identity } => {
                assert_eq!(identity.type_name(), core::any::type_name::<Loop>());
            }
            other => panic!("{backend}: expected a self alias, got {other:?}"),
        }
    }
}

#[test]
fn alias_cycles_are_reported_with_their_chain() {
    setup();
    let a = Identity::new(0x10, "t::A");
    let b = Identity::new(0x20, "t::B");
    let mut aliases = AliasMap::new();
    assert!(aliases.add(a, b));
    assert!(aliases.add(b, a));

    let err = aliases.resolve(a).unwrap_err();
    assert_eq!(
        err.to_string(),
        "alias cycle while resolving 0x10-tA: 0x10-tA -> 0x20-tB -> 0x10-tA"
    );
}

#[test]
fn absent_values_are_undefined() {
    setup();
    let none: Option<u8> = None;
    assert_eq!(
        Backend::Plaintext.render_to_string(&Adapter, &none).unwrap(),
        "undefined\n"
    );

    let dead = {
        let strong = Arc::new(1u8);
        Arc::downgrade(&strong)
    };
    assert_eq!(
        Backend::Plaintext.render_to_string(&Adapter, &dead).unwrap(),
        "undefined\n"
    );
}

#[test]
fn pointers_are_transparent_in_trees() {
    setup();
    let value = Some(Box::new(Rc::new(Arc::new(7i64))));
    assert_eq!(
        Backend::Plaintext.render_to_string(&Adapter, &value).unwrap(),
        "'7'\n"
    );
}

#[test]
fn collections_list_their_items() {
    setup();
    let empty: Vec<u8> = Vec::new();
    assert_eq!(
        Backend::Plaintext.render_to_string(&Adapter, &empty).unwrap(),
        "Vec<u8> size '0'\n"
    );

    let queue = VecDeque::from([true, false]);
    assert_eq!(
        Backend::Plaintext.render_to_string(&Adapter, &queue).unwrap(),
        indoc! {"
            VecDeque<bool> size '2'
            |- item 'true'
            `- item 'false'
        "}
    );

    let set = BTreeSet::from(['b', 'a']);
    assert_eq!(
        Backend::Plaintext.render_to_string(&Adapter, &set).unwrap(),
        indoc! {"
            BTreeSet<char> size '2'
            |- item 'a'
            `- item 'b'
        "}
    );

    let nested = vec![vec![1u8], vec![]];
    assert_eq!(
        Backend::Plaintext.render_to_string(&Adapter, &nested).unwrap(),
        indoc! {"
            Vec<Vec<u8>> size '2'
            |- item Vec<u8> size '1'
            | `- item '1'
            `- item Vec<u8> size '0'
        "}
    );
}

#[test]
fn maps_render_items_with_key_and_value() {
    setup();
    let map = HashMap::from([("only", ())]);
    assert_eq!(
        Backend::Plaintext.render_to_string(&Adapter, &map).unwrap(),
        indoc! {"
            HashMap<&str, ()> size '1'
            `- item Item
              |- key 'only'
              `- value '()'
        "}
    );
}

#[cfg(feature = "indexmap")]
#[test]
fn index_maps_keep_insertion_order() {
    setup();
    let mut map = indexmap::IndexMap::new();
    map.insert("z", 1u8);
    map.insert("a", 2u8);
    let out = Backend::Plaintext.render_to_string(&Adapter, &map).unwrap();
    let keys: Vec<&str> = out.lines().filter(|line| line.contains("key")).collect();
    assert_eq!(keys, ["| |- key 'z'", "  |- key 'a'"]);
}

struct Note {
    body: &'static str,
}

impl Dump<Adapter> for Note {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, Adapter, R>) -> Result<(), DumpError> {
        d.node(self, "Note")?;
        d.block(self.body)
    }
}

#[test]
fn blocks_hang_below_their_node() {
    setup();
    let note = Note {
        body: "first line\nsecond line",
    };
    assert_eq!(
        Backend::Plaintext.render_to_string(&Adapter, &note).unwrap(),
        "Note\n`- first line\n   second line\n"
    );
}

#[test]
fn renderers_reset_between_passes() {
    setup();
    let (a, _b) = ring();
    let mut renderer = TikzRenderer::new(String::new());
    render(&mut renderer, &Adapter, &a).unwrap();
    let aliases = renderer.aliases().len();
    assert!(aliases > 0);
    assert!(renderer.is_visited(&Identity::of(&*a)));

    render(&mut renderer, &Adapter, &a).unwrap();
    assert_eq!(renderer.aliases().len(), aliases);
    unlink(&a);

    let out = renderer.into_inner();
    let (first, second) = out.split_at(out.len() / 2);
    assert_eq!(first, second);

    let mut plain = PlainRenderer::new(String::new());
    render(&mut plain, &Adapter, &"x").unwrap();
    render(&mut plain, &Adapter, &"y").unwrap();
    assert_eq!(plain.into_inner(), "'x'\n'y'\n");
}

#[test]
fn trailing_line_breaks_are_kept() {
    setup();
    assert_eq!(
        Backend::Plaintext.render_to_string(&Adapter, &"a\n").unwrap(),
        "'a\n '\n"
    );
    assert_eq!(
        Backend::Plaintext.render_to_string(&Adapter, &"a").unwrap(),
        "'a'\n"
    );
}

#[test]
fn tree_renderers_report_their_backend() {
    assert_eq!(PlainRenderer::new(String::new()).name(), "plaintext");
    assert_eq!(ConsoleRenderer::new(String::new()).name(), "console");
    assert_eq!(TikzRenderer::new(String::new()).name(), "tikz");
}

struct Leaf {
    v: u32,
}

impl Dump<Adapter> for Leaf {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, Adapter, R>) -> Result<(), DumpError> {
        d.node(self, "Leaf")?;
        d.attr(self, "v", &self.v, true, true)
    }
}

struct Opaque;

dump_unimplemented!(Adapter => Opaque);

fn single_node(out: &str) -> dump_testhelpers::TikzNode {
    let graph = TikzGraph::parse(out);
    assert_eq!(graph.nodes.len(), 1, "{out}");
    assert!(graph.edges.is_empty(), "{out}");
    graph.nodes[0].clone()
}

#[test]
fn leaf_roots_still_draw_a_node() {
    setup();
    let none: Option<Rc<Leaf>> = None;
    let out = Backend::Tikz.render_to_string(&Adapter, &none).unwrap();
    assert_eq!(single_node(&out).tag, "undefined");

    let out = Backend::Tikz.render_to_string(&Adapter, &Opaque).unwrap();
    assert_eq!(single_node(&out).tag, "not implemented");

    let mut renderer = TikzRenderer::new(String::new());
    render(&mut renderer, &Adapter, &5u32).unwrap();
    assert!(renderer.is_visited(&Identity::new(0, "root")));
    let node = single_node(&renderer.into_inner());
    assert_eq!(node.tag, "5");
    assert!(node.parts.is_empty());
}

struct Mid {
    leaf: Leaf,
}

impl Dump<Adapter> for Mid {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, Adapter, R>) -> Result<(), DumpError> {
        d.node(self, "Mid")?;
        d.attr(self, "leaf", &self.leaf, true, false)
    }
}

struct Top {
    name: &'static str,
    mid: Mid,
}

impl Dump<Adapter> for Top {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, Adapter, R>) -> Result<(), DumpError> {
        d.node(self, "Top")?;
        d.attr(self, "name", self.name, false, true)?;
        d.attr(self, "mid", &self.mid, true, true)
    }
}

#[test]
fn grandchildren_of_inlined_records_hang_off_the_outer_node() {
    setup();
    let top = Top {
        name: "top",
        mid: Mid {
            leaf: Leaf { v: 7 },
        },
    };
    let out = Backend::Tikz.render_to_string(&Adapter, &top).unwrap();
    let graph = TikzGraph::parse(&out);

    assert_eq!(graph.nodes.len(), 2, "{out}");
    assert_eq!(graph.tagged("Mid").count(), 0);
    let outer = &graph.nodes[0];
    assert_eq!(outer.tag, "Top");
    assert_eq!(
        outer.parts,
        [
            ("name".to_owned(), "top".to_owned()),
            ("mid".to_owned(), "Mid".to_owned()),
        ]
    );
    let leaf = graph.tagged("Leaf").next().unwrap();
    assert_eq!(leaf.parts, [("v".to_owned(), "7".to_owned())]);
    assert_eq!(graph.edges, [(outer.id.clone(), leaf.id.clone())]);
    assert!(graph.dangling_edges().is_empty());
}
