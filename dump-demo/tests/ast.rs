use std::rc::{Rc, Weak};

use dump::{Backend, TikzRenderer, render};
use dump_demo::Full;
use dump_demo::ast::{Binding, Expr, Op, Program};
use dump_testhelpers::{TikzGraph, TikzNode, setup};
use indoc::indoc;

fn binding<'g>(graph: &'g TikzGraph, name: &str) -> &'g TikzNode {
    graph
        .tagged("Binding")
        .find(|node| node.parts.first() == Some(&("name".to_owned(), name.to_owned())))
        .unwrap_or_else(|| panic!("no node for binding {name}"))
}

#[test]
fn program_as_plaintext() {
    setup();
    let out = Backend::Plaintext.render_to_string(&Full, &Program::sample()).unwrap();
    assert_eq!(
        out,
        indoc! {"
            Program name 'demo'
            |- doc 'Computes the negated sum
            |       of x and y.'
            |- bindings Vec<Rc<Binding>> size '2'
            | |- item Binding name 'x'
            | | `- value '2'
            | `- item Binding name 'y'
            |   `- value Binary op *
            |     |- lhs Binding name 'x'
            |     | `- value '2'
            |     `- rhs '3'
            |- body Unary op -
            | `- operand Binary op +
            |   |- lhs Binding name 'x'
            |   | `- value '2'
            |   `- rhs Binding name 'y'
            |     `- value Binary op *
            |       |- lhs Binding name 'x'
            |       | `- value '2'
            |       `- rhs '3'
            |- entry Binding name 'y'
            | `- value Binary op *
            |   |- lhs Binding name 'x'
            |   | `- value '2'
            |   `- rhs '3'
            `- annotations BTreeMap<String, String> size '2'
              |- item Item
              | |- key 'author'
              | `- value 'someone'
              `- item Item
                |- key 'version'
                `- value '1'
        "}
    );
}

#[test]
fn shared_bindings_are_drawn_once() {
    setup();
    let out = Backend::Tikz.render_to_string(&Full, &Program::sample()).unwrap();
    let graph = TikzGraph::parse(&out);

    assert_eq!(graph.nodes.len(), 10);
    assert_eq!(graph.tagged("Binding").count(), 2);
    assert_eq!(graph.tagged("Binary").count(), 2);
    assert_eq!(graph.edges.len(), 13);
    assert!(graph.dangling_edges().is_empty());

    let x = binding(&graph, "x");
    let y = binding(&graph, "y");
    assert_eq!(graph.parents(&x.id).len(), 3);
    assert_eq!(graph.parents(&y.id).len(), 3);
    assert_eq!(
        x.parts,
        [
            ("name".to_owned(), "x".to_owned()),
            ("value".to_owned(), "2".to_owned()),
        ]
    );
    assert_eq!(y.parts, [("name".to_owned(), "y".to_owned())]);
}

#[test]
fn every_edge_is_unique_and_nodes_precede_edges() {
    setup();
    let out = Backend::Tikz.render_to_string(&Full, &Program::sample()).unwrap();
    let graph = TikzGraph::parse(&out);

    let mut seen = std::collections::BTreeSet::new();
    for edge in &graph.edges {
        assert!(seen.insert(edge), "duplicate edge {edge:?}");
    }
    let last_node = out.rfind("\\node\n").unwrap();
    let first_edge = out.find("\\draw (").unwrap();
    assert!(last_node < first_edge);
}

#[test]
fn root_node_comes_first_with_its_leaves_as_parts() {
    setup();
    let out = Backend::Tikz.render_to_string(&Full, &Program::sample()).unwrap();
    let graph = TikzGraph::parse(&out);

    let root = &graph.nodes[0];
    assert_eq!(root.tag, "Program");
    assert_eq!(
        root.parts,
        [
            ("name".to_owned(), "demo".to_owned()),
            ("doc".to_owned(), r"Computes the negated sum \\ of x and y.".to_owned()),
        ]
    );
    assert!(graph.parents(&root.id).is_empty());
}

#[test]
fn map_entries_become_item_nodes() {
    setup();
    let out = Backend::Tikz.render_to_string(&Full, &Program::sample()).unwrap();
    let graph = TikzGraph::parse(&out);

    let tag = dump::tikz::escape("BTreeMap<String, String>");
    let map = graph.tagged(&tag).next().unwrap();
    assert_eq!(map.parts, [("size".to_owned(), "2".to_owned())]);
    let items: Vec<_> = graph.tagged("Item").collect();
    assert_eq!(items.len(), 2);
    assert_eq!(
        items[0].parts,
        [
            ("key".to_owned(), "author".to_owned()),
            ("value".to_owned(), "someone".to_owned()),
        ]
    );
    for item in items {
        assert_eq!(
            graph.parents(&item.id).into_iter().collect::<Vec<_>>(),
            [map.id.as_str()]
        );
    }
}

#[test]
fn dangling_weak_entry_is_undefined() {
    setup();
    let mut program = Program::sample();
    program.entry = Weak::new();

    let out = Backend::Plaintext.render_to_string(&Full, &program).unwrap();
    assert!(out.contains("\n|- entry undefined\n"), "{out}");

    let out = Backend::Tikz.render_to_string(&Full, &program).unwrap();
    let graph = TikzGraph::parse(&out);
    assert!(
        graph.nodes[0]
            .parts
            .contains(&("entry".to_owned(), "undefined".to_owned()))
    );
    assert_eq!(graph.parents(&binding(&graph, "y").id).len(), 2);
}

#[test]
fn parameters_without_value_are_undefined() {
    setup();
    let parameter = Binding {
        name: "n".to_owned(),
        value: None,
    };
    let out = Backend::Plaintext.render_to_string(&Full, &parameter).unwrap();
    assert_eq!(out, "Binding name 'n'\n`- value undefined\n");
}

#[test]
fn escapes_operators_in_diagrams() {
    setup();
    let expr = Expr::binary(Op::Div, Expr::Number(1.0), Expr::Number(4.0));
    let out = Backend::Forest.render_to_string(&Full, &expr).unwrap();
    assert!(out.contains(r"\textcolor{orange}{/}"));

    let mut renderer = TikzRenderer::new(String::new());
    render(&mut renderer, &Full, &expr).unwrap();
    let graph = TikzGraph::parse(&renderer.into_inner());
    assert_eq!(graph.nodes.len(), 1);
    assert_eq!(
        graph.nodes[0].parts,
        [
            ("op".to_owned(), "/".to_owned()),
            ("lhs".to_owned(), "1".to_owned()),
            ("rhs".to_owned(), "4".to_owned()),
        ]
    );
}

#[test]
fn node_hints_extend_the_node_style() {
    setup();
    let program = Program::sample();
    let x = Rc::clone(&program.bindings[0]);
    let hint = dump::Identity::of(&*x);

    let mut renderer = TikzRenderer::new(String::new()).with_hint(hint, "fill=red!20");
    render(&mut renderer, &Full, &program).unwrap();
    assert!(renderer.is_visited(&hint));
    let out = renderer.into_inner();
    assert_eq!(out.matches(", fill=red!20]").count(), 1);
    let graph = TikzGraph::parse(&out);
    assert_eq!(graph.nodes.len(), 10);
}
