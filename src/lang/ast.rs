/*!
Syntax tree for PostC.

Postfix source lowers to a statement list where operators have already
folded the operands parsed before them. An operand slot holds `None`
when the value is produced at run time (for example a bare `+` inside a
function body that operates on the caller's arguments).
*/

use super::token::Literal;
use super::Position;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Literal(Position, Literal),
    ArrayLiteral(Position, Vec<Node>),
    DictLiteral(Position, Vec<(Node, Node)>),
    Identifier(Position, Rc<str>),
    BinaryOp(Position, BinOp, Option<Box<Node>>, Option<Box<Node>>),
    StackOp(Position, StackOpKind),
    LetBinding(Position, Rc<str>, Vec<Node>),
    VarBinding(Position, Rc<str>, Vec<Node>),
    Assignment(Position, Rc<str>, Box<Node>),
    FunctionDef(Position, Rc<str>, usize, Vec<Node>),
    Call(Position, Rc<str>),
    If(Position, Option<Box<Node>>, Vec<Node>, Option<Vec<Node>>),
    While(Position, Box<Node>, Vec<Node>),
    ForCountdown(Position, Option<Box<Node>>, Vec<Node>),
    Sequence(Vec<Node>),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StackOpKind {
    Dup,
    Drop,
    Swap,
    Over,
    Rot,
}

impl Node {
    pub fn position(&self) -> Position {
        use Node::*;
        match self {
            Literal(pos, ..)
            | ArrayLiteral(pos, ..)
            | DictLiteral(pos, ..)
            | Identifier(pos, ..)
            | BinaryOp(pos, ..)
            | StackOp(pos, ..)
            | LetBinding(pos, ..)
            | VarBinding(pos, ..)
            | Assignment(pos, ..)
            | FunctionDef(pos, ..)
            | Call(pos, ..)
            | If(pos, ..)
            | While(pos, ..)
            | ForCountdown(pos, ..) => *pos,
            Sequence(nodes) => nodes.first().map(Node::position).unwrap_or((0, 0)),
        }
    }

    /// Whether this node can leave a value for a following operator or
    /// control word to fold as its operand.
    pub fn produces_operand(&self) -> bool {
        use Node::*;
        match self {
            Literal(..) | ArrayLiteral(..) | DictLiteral(..) | Identifier(..)
            | BinaryOp(..) | StackOp(..) | Call(..) | If(..) => true,
            LetBinding(..) | VarBinding(..) | Assignment(..) | FunctionDef(..)
            | While(..) | ForCountdown(..) | Sequence(..) => false,
        }
    }
}
