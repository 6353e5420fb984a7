use super::ast::{BinOp, Node, StackOpKind};
use super::token::{Literal, Operator, Token, TokenKind, Word};
use super::{Error, Position};
use std::collections::HashSet;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Parse one token sequence into a tree rooted at a Sequence node.
///
/// The grammar is postfix so parsing is a single left-to-right pass:
/// operators fold the most recently parsed operand nodes, control words
/// consume one pending operand as their condition or count, and blocks
/// run to the next `;` (or `else`).
pub fn parse(tokens: &[Token]) -> Result<Node> {
    Parser {
        tokens,
        pos: 0,
        functions: HashSet::new(),
    }
    .program()
}

#[derive(Clone, Copy, PartialEq)]
enum Term {
    Semicolon,
    Else,
    Comma,
    RBracket,
    RBrace,
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    functions: HashSet<Rc<str>>,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn program(&mut self) -> Result<Node> {
        let mut nodes = vec![];
        loop {
            match &self.peek().kind {
                TokenKind::Eof => break,
                TokenKind::Colon => {
                    let def = self.function_def()?;
                    nodes.push(def);
                }
                TokenKind::Semicolon => {
                    self.bump();
                }
                _ => self.block(&mut nodes, &[Term::Semicolon])?,
            }
        }
        Ok(Node::Sequence(nodes))
    }

    /// Parse statements into `nodes` until a terminator in `stops`.
    /// The terminator is left for the caller. A `:` always terminates
    /// since definitions never nest inside a block.
    fn block(&mut self, nodes: &mut Vec<Node>, stops: &[Term]) -> Result<()> {
        loop {
            let token = self.peek().clone();
            let stop = match &token.kind {
                TokenKind::Eof | TokenKind::Colon => return Ok(()),
                TokenKind::Semicolon => Some(Term::Semicolon),
                TokenKind::Word(Word::Else) => Some(Term::Else),
                TokenKind::Comma => Some(Term::Comma),
                TokenKind::RBracket => Some(Term::RBracket),
                TokenKind::RBrace => Some(Term::RBrace),
                _ => None,
            };
            if let Some(term) = stop {
                if stops.contains(&term) {
                    return Ok(());
                }
                return Err(error!(UnexpectedToken, token.position()));
            }
            let pos = token.position();
            match token.kind {
                TokenKind::Literal(literal) => {
                    self.bump();
                    nodes.push(Node::Literal(pos, literal));
                }
                TokenKind::Ident(name) => {
                    self.bump();
                    if self.functions.contains(&name) {
                        nodes.push(Node::Call(pos, name));
                    } else {
                        nodes.push(Node::Identifier(pos, name));
                    }
                }
                TokenKind::Word(word) => self.word(nodes, word, pos)?,
                TokenKind::Operator(op) => self.operator(nodes, op, pos)?,
                TokenKind::LBracket => self.array_literal(nodes)?,
                TokenKind::LBrace => self.dict_literal(nodes)?,
                _ => return Err(error!(UnexpectedToken, pos)),
            }
        }
    }

    fn word(&mut self, nodes: &mut Vec<Node>, word: Word, pos: Position) -> Result<()> {
        self.bump();
        match word {
            Word::Print => nodes.push(Node::Call(pos, "print".into())),
            Word::Dup => nodes.push(Node::StackOp(pos, StackOpKind::Dup)),
            Word::Drop => nodes.push(Node::StackOp(pos, StackOpKind::Drop)),
            Word::Swap => nodes.push(Node::StackOp(pos, StackOpKind::Swap)),
            Word::Over => nodes.push(Node::StackOp(pos, StackOpKind::Over)),
            Word::Rot => nodes.push(Node::StackOp(pos, StackOpKind::Rot)),
            Word::Let | Word::Var => {
                let (_, name) = self.expect_ident()?;
                let mut init = vec![];
                self.block(&mut init, &[Term::Semicolon])?;
                self.expect_semicolon()?;
                if word == Word::Let {
                    nodes.push(Node::LetBinding(pos, name, init));
                } else {
                    nodes.push(Node::VarBinding(pos, name, init));
                }
            }
            Word::If => {
                let cond = Self::pop_operand(nodes).map(Box::new);
                let mut then_branch = vec![];
                self.block(&mut then_branch, &[Term::Semicolon, Term::Else])?;
                let else_branch = if self.peek().kind == TokenKind::Word(Word::Else) {
                    self.bump();
                    let mut nodes = vec![];
                    self.block(&mut nodes, &[Term::Semicolon])?;
                    Some(nodes)
                } else {
                    None
                };
                self.expect_semicolon()?;
                nodes.push(Node::If(pos, cond, then_branch, else_branch));
            }
            Word::While => {
                let cond = match Self::pop_operand(nodes) {
                    Some(cond) => Box::new(cond),
                    None => {
                        return Err(error!(UnexpectedToken, pos; "EXPECTED CONDITION"));
                    }
                };
                let mut body = vec![];
                self.block(&mut body, &[Term::Semicolon])?;
                self.expect_semicolon()?;
                nodes.push(Node::While(pos, cond, body));
            }
            Word::For => {
                let count = Self::pop_operand(nodes).map(Box::new);
                let mut body = vec![];
                self.block(&mut body, &[Term::Semicolon])?;
                self.expect_semicolon()?;
                nodes.push(Node::ForCountdown(pos, count, body));
            }
            Word::Param => {
                return Err(error!(UnexpectedToken, pos; "PARAM OUTSIDE FUNCTION"));
            }
            Word::Else => {
                return Err(error!(UnexpectedToken, pos));
            }
        }
        Ok(())
    }

    fn operator(&mut self, nodes: &mut Vec<Node>, op: Operator, pos: Position) -> Result<()> {
        self.bump();
        let binop = match op {
            Operator::Plus => BinOp::Add,
            Operator::Minus => BinOp::Sub,
            Operator::Multiply => BinOp::Mul,
            Operator::Divide => BinOp::Div,
            Operator::Equal => BinOp::Eq,
            Operator::NotEqual => BinOp::Ne,
            Operator::Less => BinOp::Lt,
            Operator::LessEqual => BinOp::Le,
            Operator::Greater => BinOp::Gt,
            Operator::GreaterEqual => BinOp::Ge,
            Operator::Assign => {
                let name = match Self::pop_operand(nodes) {
                    Some(Node::Identifier(_, name)) => name,
                    _ => return Err(error!(UnexpectedToken, pos; "EXPECTED VARIABLE")),
                };
                let value = match Self::pop_operand(nodes) {
                    Some(value) => Box::new(value),
                    None => return Err(error!(UnexpectedToken, pos; "EXPECTED VALUE")),
                };
                nodes.push(Node::Assignment(pos, name, value));
                return Ok(());
            }
        };
        let right = Self::pop_operand(nodes).map(Box::new);
        let left = Self::pop_operand(nodes).map(Box::new);
        nodes.push(Node::BinaryOp(pos, binop, left, right));
        Ok(())
    }

    fn array_literal(&mut self, nodes: &mut Vec<Node>) -> Result<()> {
        let bracket = self.bump();
        let mut elements = vec![];
        loop {
            if self.peek().kind == TokenKind::RBracket {
                self.bump();
                break;
            }
            elements.push(self.sub_expression(&[Term::Comma, Term::RBracket])?);
            match &self.peek().kind {
                TokenKind::Comma => {
                    self.bump();
                }
                TokenKind::RBracket => {
                    self.bump();
                    break;
                }
                TokenKind::Eof => return Err(error!(UnexpectedEof, self.peek().position())),
                _ => {
                    return Err(
                        error!(UnexpectedToken, self.peek().position(); "EXPECTED ] OR ,"),
                    )
                }
            }
        }
        nodes.push(Node::ArrayLiteral(bracket.position(), elements));
        Ok(())
    }

    fn dict_literal(&mut self, nodes: &mut Vec<Node>) -> Result<()> {
        let brace = self.bump();
        let mut pairs = vec![];
        loop {
            if self.peek().kind == TokenKind::RBrace {
                self.bump();
                break;
            }
            let key = self.sub_expression(&[])?;
            match &self.peek().kind {
                TokenKind::Colon => {
                    self.bump();
                }
                TokenKind::Eof => return Err(error!(UnexpectedEof, self.peek().position())),
                _ => {
                    return Err(error!(UnexpectedToken, self.peek().position(); "EXPECTED :"))
                }
            }
            let value = self.sub_expression(&[Term::Comma, Term::RBrace])?;
            pairs.push((key, value));
            match &self.peek().kind {
                TokenKind::Comma => {
                    self.bump();
                }
                TokenKind::RBrace => {
                    self.bump();
                    break;
                }
                TokenKind::Eof => return Err(error!(UnexpectedEof, self.peek().position())),
                _ => {
                    return Err(
                        error!(UnexpectedToken, self.peek().position(); "EXPECTED } OR ,"),
                    )
                }
            }
        }
        nodes.push(Node::DictLiteral(brace.position(), pairs));
        Ok(())
    }

    /// One element of an array or dictionary literal: a full RPN
    /// sub-expression run to its terminator.
    fn sub_expression(&mut self, stops: &[Term]) -> Result<Node> {
        let start = self.peek().position();
        let mut nodes = vec![];
        self.block(&mut nodes, stops)?;
        match nodes.len() {
            0 => Err(error!(UnexpectedToken, start; "EXPECTED EXPRESSION")),
            1 => Ok(nodes.remove(0)),
            _ => Ok(Node::Sequence(nodes)),
        }
    }

    fn function_def(&mut self) -> Result<Node> {
        let colon = self.bump();
        let (_, name) = self.expect_ident()?;
        let param_count = match &self.peek().kind {
            TokenKind::Literal(Literal::Integer(n)) if *n >= 0 => {
                let n = *n as usize;
                self.bump();
                n
            }
            TokenKind::Eof => return Err(error!(UnexpectedEof, self.peek().position())),
            _ => {
                return Err(
                    error!(UnexpectedToken, self.peek().position(); "EXPECTED PARAMETER COUNT"),
                )
            }
        };
        match &self.peek().kind {
            TokenKind::Word(Word::Param) => {
                self.bump();
            }
            TokenKind::Eof => return Err(error!(UnexpectedEof, self.peek().position())),
            _ => return Err(error!(UnexpectedToken, self.peek().position(); "EXPECTED PARAM")),
        }
        self.functions.insert(name.clone());
        let mut body = vec![];
        self.block(&mut body, &[Term::Semicolon])?;
        self.expect_semicolon()?;
        Ok(Node::FunctionDef(colon.position(), name, param_count, body))
    }

    fn pop_operand(nodes: &mut Vec<Node>) -> Option<Node> {
        if nodes.last().map(Node::produces_operand) == Some(true) {
            nodes.pop()
        } else {
            None
        }
    }

    fn expect_ident(&mut self) -> Result<(Position, Rc<str>)> {
        let token = self.peek().clone();
        let pos = token.position();
        match token.kind {
            TokenKind::Ident(name) => {
                self.bump();
                Ok((pos, name))
            }
            TokenKind::Eof => Err(error!(UnexpectedEof, pos)),
            _ => Err(error!(UnexpectedToken, pos; "EXPECTED NAME")),
        }
    }

    fn expect_semicolon(&mut self) -> Result<()> {
        match &self.peek().kind {
            TokenKind::Semicolon => {
                self.bump();
                Ok(())
            }
            TokenKind::Eof => Err(error!(UnexpectedEof, self.peek().position())),
            _ => Err(error!(UnexpectedToken, self.peek().position(); "EXPECTED ;")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::lex;
    use crate::lang::ErrorCode;

    fn parse_str(s: &str) -> Result<Node> {
        parse(&lex(s)?)
    }

    #[test]
    fn test_binary_fold() {
        use Node::*;
        let ast = parse_str("3 4 +").unwrap();
        assert_eq!(
            ast,
            Sequence(vec![BinaryOp(
                (1, 5),
                BinOp::Add,
                Some(Box::new(Literal((1, 1), super::Literal::Integer(3)))),
                Some(Box::new(Literal((1, 3), super::Literal::Integer(4)))),
            )])
        );
    }

    #[test]
    fn test_bare_operator_has_empty_slots() {
        let ast = parse_str(": add2 2 param + ;").unwrap();
        match ast {
            Node::Sequence(nodes) => match &nodes[0] {
                Node::FunctionDef(_, name, 2, body) => {
                    assert_eq!(name.as_ref(), "add2");
                    assert_eq!(body, &vec![Node::BinaryOp((1, 16), BinOp::Add, None, None)]);
                }
                other => panic!("unexpected node {:?}", other),
            },
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_known_function_becomes_call() {
        let ast = parse_str(": twice 1 param dup + ; 5 twice").unwrap();
        match ast {
            Node::Sequence(nodes) => {
                assert!(matches!(&nodes[2], Node::Call(_, name) if name.as_ref() == "twice"));
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_let_binding() {
        let ast = parse_str("let x 5 ; x print").unwrap();
        match ast {
            Node::Sequence(nodes) => {
                assert!(
                    matches!(&nodes[0], Node::LetBinding(_, name, init)
                        if name.as_ref() == "x" && init.len() == 1)
                );
                assert!(matches!(&nodes[1], Node::Identifier(_, name) if name.as_ref() == "x"));
                assert!(matches!(&nodes[2], Node::Call(_, name) if name.as_ref() == "print"));
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_if_else_consumes_condition() {
        let ast = parse_str("true if 1 else 2 ; print").unwrap();
        match ast {
            Node::Sequence(nodes) => match &nodes[0] {
                Node::If(_, cond, then_branch, else_branch) => {
                    assert!(cond.is_some());
                    assert_eq!(then_branch.len(), 1);
                    assert_eq!(else_branch.as_ref().map(Vec::len), Some(1));
                }
                other => panic!("unexpected node {:?}", other),
            },
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_collection_literals() {
        let ast = parse_str("[1, 2 3 +] { \"a\": 1, \"b\": 2 }").unwrap();
        match ast {
            Node::Sequence(nodes) => {
                assert!(matches!(&nodes[0], Node::ArrayLiteral(_, elems) if elems.len() == 2));
                assert!(matches!(&nodes[1], Node::DictLiteral(_, pairs) if pairs.len() == 2));
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_assignment() {
        let ast = parse_str("var x 0 ; 5 x =").unwrap();
        match ast {
            Node::Sequence(nodes) => {
                assert!(matches!(&nodes[1], Node::Assignment(_, name, _) if name.as_ref() == "x"));
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_while_requires_condition() {
        let error = parse_str("while 1 ;").unwrap_err();
        assert!(error == ErrorCode::UnexpectedToken);
    }

    #[test]
    fn test_unterminated_block() {
        assert!(parse_str("let x 5").unwrap_err() == ErrorCode::UnexpectedEof);
        assert!(parse_str(": f 1 param").unwrap_err() == ErrorCode::UnexpectedEof);
    }

    #[test]
    fn test_stray_else() {
        assert!(parse_str("1 else").unwrap_err() == ErrorCode::UnexpectedToken);
    }
}
