use super::{codegen, Function, Program};
use crate::lang::ast::Node;
use crate::lang::{lex, parse, Error};

type Result<T> = std::result::Result<T, Error>;

/// Compile a source unit into a Program, prelude included. The prelude
/// is ordinary PostC compiled ahead of the user's code, so its functions
/// resolve like any other definition.
pub fn compile(source: &str) -> Result<Program> {
    let mut nodes = into_nodes(parse(&lex(Function::PRELUDE)?)?);
    nodes.extend(into_nodes(parse(&lex(source)?)?));
    codegen::generate(&Node::Sequence(nodes))
}

fn into_nodes(ast: Node) -> Vec<Node> {
    match ast {
        Node::Sequence(nodes) => nodes,
        node => vec![node],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    #[test]
    fn test_prelude_functions_available() {
        let program = compile("5 square print").unwrap();
        assert!(program.functions.contains_key("square"));
        assert!(program.functions.contains_key("min"));
    }

    #[test]
    fn test_user_cannot_redefine_prelude_name() {
        let error = compile(": square 1 param dup * ;").unwrap_err();
        assert!(error == ErrorCode::DuplicateFunction);
    }

    #[test]
    fn test_compile_reports_lex_and_parse_errors() {
        assert!(compile("\"open").unwrap_err() == ErrorCode::UnterminatedString);
        assert!(compile("if 1").unwrap_err() == ErrorCode::UnexpectedEof);
    }
}
