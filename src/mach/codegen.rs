use super::{Const, Function, FunctionEntry, Link, Opcode, Program};
use crate::error;
use crate::lang::ast::{BinOp, Node, StackOpKind};
use crate::lang::token::Literal;
use crate::lang::{Error, Position};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

const MAX_PARAMS: usize = 255;

/// Lower one syntax tree into a Program.
///
/// Function definitions are registered before any body is compiled so
/// forward and mutually recursive calls resolve at generation time.
/// Layout is main code, HALT, then the function bodies in source order.
pub fn generate(ast: &Node) -> Result<Program> {
    Generator::default().generate(ast)
}

#[derive(Default)]
struct Generator {
    constants: Vec<Const>,
    functions: BTreeMap<String, FunctionEntry>,
    globals: HashMap<Rc<str>, bool>,
    locals: Option<HashMap<Rc<str>, bool>>,
    for_loops: usize,
}

impl Generator {
    fn generate(mut self, ast: &Node) -> Result<Program> {
        let nodes = match ast {
            Node::Sequence(nodes) => nodes.as_slice(),
            node => std::slice::from_ref(node),
        };
        for node in nodes {
            if let Node::FunctionDef(pos, name, param_count, _) = node {
                if *param_count > MAX_PARAMS {
                    return Err(error!(ArityMismatch, *pos; "TOO MANY PARAMETERS"));
                }
                if self.functions.contains_key(name.as_ref()) {
                    return Err(error!(DuplicateFunction, *pos));
                }
                self.functions.insert(
                    name.to_string(),
                    FunctionEntry {
                        entry: 0,
                        param_count: *param_count,
                    },
                );
            }
        }
        let mut link = Link::new();
        for node in nodes {
            if let Node::FunctionDef(..) = node {
                continue;
            }
            self.emit(&mut link, node)?;
        }
        link.push(Opcode::Halt);
        let mut instructions = link.link(0)?;
        for node in nodes {
            if let Node::FunctionDef(_, name, param_count, body) = node {
                let entry = instructions.len();
                let mut link = Link::new();
                // Restore the CALL-bound positional parameters onto the
                // operand stack in declaration order.
                for i in 0..*param_count {
                    let idx = self.intern(Const::String(format!("#p{}", i)));
                    link.push(Opcode::LoadVar(idx));
                }
                self.locals = Some(HashMap::new());
                for node in body {
                    self.emit(&mut link, node)?;
                }
                self.locals = None;
                link.push(Opcode::Return);
                instructions.extend(link.link(entry)?);
                if let Some(function) = self.functions.get_mut(name.as_ref()) {
                    function.entry = entry;
                }
            }
        }
        Ok(Program {
            constants: self.constants,
            functions: self.functions,
            instructions,
        })
    }

    fn emit(&mut self, link: &mut Link, node: &Node) -> Result<()> {
        match node {
            Node::Literal(_, literal) => match literal {
                Literal::Boolean(true) => link.push(Opcode::LoadTrue),
                Literal::Boolean(false) => link.push(Opcode::LoadFalse),
                Literal::Integer(n) => {
                    let idx = self.intern(Const::Integer(*n));
                    link.push(Opcode::LoadConst(idx));
                }
                Literal::Float(n) => {
                    let idx = self.intern(Const::Float(*n));
                    link.push(Opcode::LoadConst(idx));
                }
                Literal::String(s) => {
                    let idx = self.intern(Const::String(s.to_string()));
                    link.push(Opcode::LoadConst(idx));
                }
            },
            Node::Identifier(pos, name) => self.name(link, *pos, name, true)?,
            Node::Call(pos, name) => self.name(link, *pos, name, false)?,
            Node::BinaryOp(_, op, left, right) => {
                if let Some(left) = left {
                    self.emit(link, left)?;
                }
                if let Some(right) = right {
                    self.emit(link, right)?;
                }
                link.push(match op {
                    BinOp::Add => Opcode::Add,
                    BinOp::Sub => Opcode::Sub,
                    BinOp::Mul => Opcode::Mul,
                    BinOp::Div => Opcode::Div,
                    BinOp::Eq => Opcode::Eq,
                    BinOp::Ne => Opcode::Ne,
                    BinOp::Lt => Opcode::Lt,
                    BinOp::Le => Opcode::Le,
                    BinOp::Gt => Opcode::Gt,
                    BinOp::Ge => Opcode::Ge,
                });
            }
            Node::StackOp(_, kind) => link.push(match kind {
                StackOpKind::Dup => Opcode::Dup,
                StackOpKind::Drop => Opcode::Drop,
                StackOpKind::Swap => Opcode::Swap,
                StackOpKind::Over => Opcode::Over,
                StackOpKind::Rot => Opcode::Rot,
            }),
            Node::ArrayLiteral(_, elements) => {
                let idx = self.intern(Const::Integer(elements.len() as i64));
                link.push(Opcode::LoadConst(idx));
                link.push(Opcode::ArrayNew);
                for (i, element) in elements.iter().enumerate() {
                    self.emit(link, element)?;
                    let idx = self.intern(Const::Integer(i as i64));
                    link.push(Opcode::LoadConst(idx));
                    link.push(Opcode::ArrayStore);
                }
            }
            Node::DictLiteral(_, pairs) => {
                link.push(Opcode::DictNew);
                for (key, value) in pairs {
                    self.emit(link, key)?;
                    self.emit(link, value)?;
                    link.push(Opcode::DictStore);
                }
            }
            Node::LetBinding(pos, name, init) => {
                for node in init {
                    self.emit(link, node)?;
                }
                let idx = self.declare(*pos, name, false)?;
                link.push(Opcode::StoreVar(idx, false));
            }
            Node::VarBinding(pos, name, init) => {
                for node in init {
                    self.emit(link, node)?;
                }
                let idx = self.declare(*pos, name, true)?;
                link.push(Opcode::StoreVar(idx, true));
            }
            Node::Assignment(pos, name, value) => {
                self.emit(link, value)?;
                let idx = self.assign(*pos, name)?;
                link.push(Opcode::StoreVar(idx, true));
            }
            Node::If(pos, cond, then_branch, else_branch) => {
                if let Some(cond) = cond {
                    self.emit(link, cond)?;
                }
                match else_branch {
                    Some(else_branch) => {
                        let else_sym = link.next_symbol();
                        let end_sym = link.next_symbol();
                        link.push_jump_if_false(*pos, else_sym);
                        for node in then_branch {
                            self.emit(link, node)?;
                        }
                        link.push_jump(*pos, end_sym);
                        link.push_symbol(else_sym);
                        for node in else_branch {
                            self.emit(link, node)?;
                        }
                        link.push_symbol(end_sym);
                    }
                    None => {
                        let end_sym = link.next_symbol();
                        link.push_jump_if_false(*pos, end_sym);
                        for node in then_branch {
                            self.emit(link, node)?;
                        }
                        link.push_symbol(end_sym);
                    }
                }
            }
            Node::While(pos, cond, body) => {
                let start_sym = link.next_symbol();
                let end_sym = link.next_symbol();
                link.push_symbol(start_sym);
                self.emit(link, cond)?;
                link.push_jump_if_false(*pos, end_sym);
                for node in body {
                    self.emit(link, node)?;
                }
                link.push_jump(*pos, start_sym);
                link.push_symbol(end_sym);
            }
            Node::ForCountdown(pos, count, body) => {
                // The counter is hidden behind a name the lexer can
                // never produce, so the body cannot observe it.
                let counter = self.intern(Const::String(format!("#for{}", self.for_loops)));
                self.for_loops += 1;
                if let Some(count) = count {
                    self.emit(link, count)?;
                }
                link.push(Opcode::StoreVar(counter, true));
                let start_sym = link.next_symbol();
                let end_sym = link.next_symbol();
                link.push_symbol(start_sym);
                link.push(Opcode::LoadVar(counter));
                let zero = self.intern(Const::Integer(0));
                link.push(Opcode::LoadConst(zero));
                link.push(Opcode::Gt);
                link.push_jump_if_false(*pos, end_sym);
                for node in body {
                    self.emit(link, node)?;
                }
                link.push(Opcode::LoadVar(counter));
                let one = self.intern(Const::Integer(1));
                link.push(Opcode::LoadConst(one));
                link.push(Opcode::Sub);
                link.push(Opcode::StoreVar(counter, true));
                link.push_jump(*pos, start_sym);
                link.push_symbol(end_sym);
            }
            Node::FunctionDef(pos, ..) => {
                return Err(error!(InternalError, *pos; "NESTED FUNCTION"));
            }
            Node::Sequence(nodes) => {
                for node in nodes {
                    self.emit(link, node)?;
                }
            }
        }
        Ok(())
    }

    /// Resolve a name: registered functions win over built-in opcode
    /// words, which win over variables. `variable` is false for a name
    /// the parser already knows is a call.
    fn name(&mut self, link: &mut Link, pos: Position, name: &Rc<str>, variable: bool) -> Result<()> {
        if self.functions.contains_key(name.as_ref()) {
            let idx = self.intern(Const::String(name.to_string()));
            link.push(Opcode::Call(idx));
            return Ok(());
        }
        if let Some(op) = Function::opcode(name) {
            link.push(op);
            return Ok(());
        }
        if variable && self.lookup(name).is_some() {
            let idx = self.intern(Const::String(name.to_string()));
            link.push(Opcode::LoadVar(idx));
            return Ok(());
        }
        Err(error!(UndefinedReference, pos))
    }

    fn lookup(&self, name: &Rc<str>) -> Option<bool> {
        if let Some(locals) = &self.locals {
            if let Some(mutable) = locals.get(name) {
                return Some(*mutable);
            }
        }
        self.globals.get(name).copied()
    }

    /// Record a `let`/`var` binding. Inside a function body a name that
    /// is already bound globally targets the global, because the store
    /// resolves there at run time; a fresh name becomes a frame local.
    fn declare(&mut self, pos: Position, name: &Rc<str>, mutable: bool) -> Result<usize> {
        match self.locals.as_mut() {
            Some(locals) => {
                if let Some(false) = locals.get(name) {
                    return Err(error!(ImmutableAssignment, pos));
                }
                if locals.contains_key(name) || !self.globals.contains_key(name) {
                    locals.insert(name.clone(), mutable);
                } else if let Some(false) = self.globals.get(name) {
                    return Err(error!(ImmutableAssignment, pos));
                }
            }
            None => {
                if let Some(false) = self.globals.get(name) {
                    return Err(error!(ImmutableAssignment, pos));
                }
                self.globals.insert(name.clone(), mutable);
            }
        }
        Ok(self.intern(Const::String(name.to_string())))
    }

    fn assign(&mut self, pos: Position, name: &Rc<str>) -> Result<usize> {
        match self.lookup(name) {
            Some(false) => Err(error!(ImmutableAssignment, pos)),
            Some(true) => Ok(self.intern(Const::String(name.to_string()))),
            None => self.declare(pos, name, true),
        }
    }

    fn intern(&mut self, constant: Const) -> usize {
        match self.constants.iter().position(|c| *c == constant) {
            Some(idx) => idx,
            None => {
                self.constants.push(constant);
                self.constants.len() - 1
            }
        }
    }
}
