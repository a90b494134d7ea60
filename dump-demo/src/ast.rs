//! A tiny expression language whose bindings are shared between the
//! binding list and every expression that names them.

use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use dump::{Dump, DumpError, Dumper, Renderer};

use crate::Full;

/// An operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// `+`
    Add,
    /// `-`, binary or unary.
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

impl Op {
    /// The operator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
        }
    }
}

/// An expression.
#[derive(Debug)]
pub enum Expr {
    /// A literal.
    Number(f64),
    /// A reference to a binding.
    Name(Rc<Binding>),
    /// A unary operation.
    Unary(Box<Unary>),
    /// A binary operation.
    Binary(Box<Binary>),
}

/// `op operand`
#[derive(Debug)]
pub struct Unary {
    /// The operator.
    pub op: Op,
    /// The operand.
    pub operand: Expr,
}

/// `lhs op rhs`
#[derive(Debug)]
pub struct Binary {
    /// The operator.
    pub op: Op,
    /// Left operand.
    pub lhs: Expr,
    /// Right operand.
    pub rhs: Expr,
}

/// `let name = value`; a binding without a value is a parameter.
#[derive(Debug)]
pub struct Binding {
    /// Bound name.
    pub name: String,
    /// Bound value.
    pub value: Option<Expr>,
}

/// A named program.
#[derive(Debug)]
pub struct Program {
    /// Program name.
    pub name: String,
    /// Free-form documentation, possibly spanning several lines.
    pub doc: String,
    /// Bindings in definition order.
    pub bindings: Vec<Rc<Binding>>,
    /// The expression the program evaluates.
    pub body: Expr,
    /// The binding to evaluate first, if it is still around.
    pub entry: Weak<Binding>,
    /// Free-form key/value metadata.
    pub annotations: BTreeMap<String, String>,
}

impl Expr {
    /// `lhs op rhs`
    pub fn binary(op: Op, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary(Box::new(Binary { op, lhs, rhs }))
    }

    /// `op operand`
    pub fn unary(op: Op, operand: Expr) -> Self {
        Expr::Unary(Box::new(Unary { op, operand }))
    }
}

impl Program {
    /// `let x = 2; let y = x * 3; -(x + y)`, with `y` as entry.
    pub fn sample() -> Self {
        let x = Rc::new(Binding {
            name: "x".to_owned(),
            value: Some(Expr::Number(2.0)),
        });
        let y = Rc::new(Binding {
            name: "y".to_owned(),
            value: Some(Expr::binary(
                Op::Mul,
                Expr::Name(Rc::clone(&x)),
                Expr::Number(3.0),
            )),
        });
        let body = Expr::unary(
            Op::Sub,
            Expr::binary(Op::Add, Expr::Name(Rc::clone(&x)), Expr::Name(Rc::clone(&y))),
        );
        let entry = Rc::downgrade(&y);
        Program {
            name: "demo".to_owned(),
            doc: "Computes the negated sum\nof x and y.".to_owned(),
            bindings: vec![x, y],
            body,
            entry,
            annotations: BTreeMap::from([
                ("author".to_owned(), "someone".to_owned()),
                ("version".to_owned(), "1".to_owned()),
            ]),
        }
    }
}

impl<A: ?Sized> Dump<A> for Op {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError> {
        d.enum_tag(self.symbol())
    }
}

impl Dump<Full> for Expr {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, Full, R>) -> Result<(), DumpError> {
        match self {
            Expr::Number(value) => d.tagged(self, value),
            Expr::Name(binding) => d.tagged(self, binding),
            Expr::Unary(unary) => d.tagged(self, unary),
            Expr::Binary(binary) => d.tagged(self, binary),
        }
    }
}

impl Dump<Full> for Unary {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, Full, R>) -> Result<(), DumpError> {
        d.node(self, "Unary")?;
        d.attr(self, "op", &self.op, false, true)?;
        d.attr(self, "operand", &self.operand, true, false)
    }
}

impl Dump<Full> for Binary {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, Full, R>) -> Result<(), DumpError> {
        d.node(self, "Binary")?;
        d.attr(self, "op", &self.op, false, true)?;
        d.attr(self, "lhs", &self.lhs, false, false)?;
        d.attr(self, "rhs", &self.rhs, true, false)
    }
}

impl Dump<Full> for Binding {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, Full, R>) -> Result<(), DumpError> {
        d.node(self, "Binding")?;
        d.attr(self, "name", &self.name, false, true)?;
        d.attr(self, "value", &self.value, true, false)
    }
}

impl Dump<Full> for Program {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, Full, R>) -> Result<(), DumpError> {
        d.node(self, "Program")?;
        d.attr(self, "name", &self.name, false, true)?;
        d.attr(self, "doc", &self.doc, false, false)?;
        d.attr(self, "bindings", &self.bindings, false, false)?;
        d.attr(self, "body", &self.body, false, false)?;
        d.attr(self, "entry", &self.entry, false, false)?;
        d.attr(self, "annotations", &self.annotations, true, false)
    }
}
