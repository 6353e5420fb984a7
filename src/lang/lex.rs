use super::token::{Literal, Operator, Token, TokenKind, Word};
use super::{Error, Position};

type Result<T> = std::result::Result<T, Error>;

/// Tokenize one source unit. Whitespace separates tokens, `#` comments
/// run to end of line, and the result always ends with an Eof token.
pub fn lex(s: &str) -> Result<Vec<Token>> {
    Lexer {
        chars: s.chars().peekable(),
        line: 1,
        column: 1,
        tokens: vec![],
    }
    .run()
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn run(mut self) -> Result<Vec<Token>> {
        loop {
            let ch = match self.chars.peek() {
                Some(ch) => *ch,
                None => break,
            };
            if ch.is_whitespace() {
                self.bump();
                continue;
            }
            if ch == '#' {
                while let Some(ch) = self.chars.peek() {
                    if *ch == '\n' {
                        break;
                    }
                    self.bump();
                }
                continue;
            }
            self.token(ch)?;
        }
        let position = self.position();
        self.push(TokenKind::Eof, String::new(), position);
        Ok(self.tokens)
    }

    fn position(&self) -> Position {
        (self.line, self.column)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn push(&mut self, kind: TokenKind, lexeme: String, position: Position) {
        self.tokens.push(Token {
            kind,
            lexeme,
            line: position.0,
            column: position.1,
        });
    }

    fn token(&mut self, ch: char) -> Result<()> {
        let start = self.position();
        if ch.is_ascii_digit() {
            return self.number(start, false);
        }
        if is_ident_start(ch) {
            return self.ident(start);
        }
        if ch == '"' {
            return self.string(start);
        }
        self.bump();
        use super::token::Operator::*;
        use TokenKind::*;
        let (kind, lexeme) = match ch {
            // A minus gets folded into the literal only when digits
            // follow immediately; otherwise it is subtraction.
            '-' => match self.chars.peek() {
                Some(pk) if pk.is_ascii_digit() => return self.number(start, true),
                _ => (Operator(Minus), "-".to_string()),
            },
            '+' => (Operator(Plus), "+".to_string()),
            '*' => (Operator(Multiply), "*".to_string()),
            '/' => (Operator(Divide), "/".to_string()),
            '=' => match self.chars.peek() {
                Some('=') => {
                    self.bump();
                    (Operator(Equal), "==".to_string())
                }
                _ => (Operator(Assign), "=".to_string()),
            },
            '!' => match self.chars.peek() {
                Some('=') => {
                    self.bump();
                    (Operator(NotEqual), "!=".to_string())
                }
                _ => return Err(error!(UnexpectedChar, start)),
            },
            '<' => match self.chars.peek() {
                Some('=') => {
                    self.bump();
                    (Operator(LessEqual), "<=".to_string())
                }
                _ => (Operator(Less), "<".to_string()),
            },
            '>' => match self.chars.peek() {
                Some('=') => {
                    self.bump();
                    (Operator(GreaterEqual), ">=".to_string())
                }
                _ => (Operator(Greater), ">".to_string()),
            },
            ':' => (Colon, ":".to_string()),
            ';' => (Semicolon, ";".to_string()),
            '[' => (LBracket, "[".to_string()),
            ']' => (RBracket, "]".to_string()),
            '{' => (LBrace, "{".to_string()),
            '}' => (RBrace, "}".to_string()),
            ',' => (Comma, ",".to_string()),
            _ => return Err(error!(UnexpectedChar, start)),
        };
        self.push(kind, lexeme, start);
        Ok(())
    }

    fn number(&mut self, start: Position, negative: bool) -> Result<()> {
        let mut s = String::new();
        if negative {
            s.push('-');
        }
        let mut float = false;
        while let Some(pk) = self.chars.peek() {
            if pk.is_ascii_digit() {
                s.push(*pk);
                self.bump();
                continue;
            }
            if *pk == '.' && !float {
                self.bump();
                match self.chars.peek() {
                    Some(pk) if pk.is_ascii_digit() => {
                        float = true;
                        s.push('.');
                        continue;
                    }
                    _ => return Err(error!(UnexpectedChar, self.position())),
                }
            }
            if float && (*pk == 'e' || *pk == 'E') {
                self.bump();
                s.push('e');
                if let Some(sign) = self.chars.peek() {
                    if *sign == '+' || *sign == '-' {
                        s.push(*sign);
                        self.bump();
                    }
                }
                match self.chars.peek() {
                    Some(pk) if pk.is_ascii_digit() => continue,
                    _ => return Err(error!(UnexpectedChar, self.position())),
                }
            }
            break;
        }
        let literal = if float {
            match s.parse::<f64>() {
                Ok(n) => Literal::Float(n),
                Err(_) => return Err(error!(Overflow, start; "FLOAT LITERAL")),
            }
        } else {
            match s.parse::<i64>() {
                Ok(n) => Literal::Integer(n),
                Err(_) => return Err(error!(Overflow, start; "INTEGER LITERAL")),
            }
        };
        self.push(TokenKind::Literal(literal), s, start);
        Ok(())
    }

    fn string(&mut self, start: Position) -> Result<()> {
        let mut lexeme = String::new();
        let mut s = String::new();
        lexeme.push('"');
        self.bump();
        loop {
            let ch = match self.bump() {
                Some(ch) => ch,
                None => return Err(error!(UnterminatedString, start)),
            };
            lexeme.push(ch);
            if ch == '"' {
                break;
            }
            if ch == '\\' {
                let esc = match self.bump() {
                    Some(esc) => esc,
                    None => return Err(error!(UnterminatedString, start)),
                };
                lexeme.push(esc);
                match esc {
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    _ => s.push(esc),
                }
                continue;
            }
            s.push(ch);
        }
        self.push(
            TokenKind::Literal(Literal::String(s.into())),
            lexeme,
            start,
        );
        Ok(())
    }

    fn ident(&mut self, start: Position) -> Result<()> {
        let mut s = String::new();
        while let Some(pk) = self.chars.peek() {
            if !is_ident_continue(*pk) {
                break;
            }
            s.push(*pk);
            self.bump();
        }
        let kind = match s.as_str() {
            "true" => TokenKind::Literal(Literal::Boolean(true)),
            "false" => TokenKind::Literal(Literal::Boolean(false)),
            _ => match Word::from_ident(&s) {
                Some(word) => TokenKind::Word(word),
                None => TokenKind::Ident(s.as_str().into()),
            },
        };
        self.push(kind, s, start);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    fn kinds(s: &str) -> Vec<TokenKind> {
        lex(s).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_arithmetic() {
        use crate::lang::token::Literal::*;
        use TokenKind::*;
        assert_eq!(
            kinds("3 4 + 2 *"),
            vec![
                Literal(Integer(3)),
                Literal(Integer(4)),
                Operator(super::Operator::Plus),
                Literal(Integer(2)),
                Operator(super::Operator::Multiply),
                Eof,
            ]
        );
    }

    #[test]
    fn test_negative_literal() {
        use crate::lang::token::Literal::*;
        use TokenKind::*;
        assert_eq!(
            kinds("-3 4 - -2.5"),
            vec![
                Literal(Integer(-3)),
                Literal(Integer(4)),
                Operator(super::Operator::Minus),
                Literal(Float(-2.5)),
                Eof,
            ]
        );
    }

    #[test]
    fn test_floats() {
        use crate::lang::token::Literal::*;
        use TokenKind::*;
        assert_eq!(
            kinds("2.5 1.0e3 1.5e-2"),
            vec![
                Literal(Float(2.5)),
                Literal(Float(1000.0)),
                Literal(Float(0.015)),
                Eof,
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        let tokens = lex(r#""a\nb\"c\\d""#).unwrap();
        match &tokens[0].kind {
            TokenKind::Literal(Literal::String(s)) => {
                assert_eq!(s.as_ref(), "a\nb\"c\\d")
            }
            other => panic!("unexpected token {:?}", other),
        }
    }

    #[test]
    fn test_words_and_idents() {
        use TokenKind::*;
        assert_eq!(
            kinds("let total if fib true"),
            vec![
                Word(super::Word::Let),
                Ident("total".into()),
                Word(super::Word::If),
                Ident("fib".into()),
                Literal(super::Literal::Boolean(true)),
                Eof,
            ]
        );
    }

    #[test]
    fn test_comment_and_positions() {
        let tokens = lex("1 # ignored\n  2").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].position(), (1, 1));
        assert_eq!(tokens[1].position(), (2, 3));
        assert_eq!(tokens[1].lexeme, "2");
    }

    #[test]
    fn test_unterminated_string() {
        let error = lex("1 \"oops").unwrap_err();
        assert!(error == ErrorCode::UnterminatedString);
        assert_eq!(error.position(), Some((1, 3)));
    }

    #[test]
    fn test_unexpected_char() {
        assert!(lex("3 4 %").unwrap_err() == ErrorCode::UnexpectedChar);
        assert!(lex("3 !").unwrap_err() == ErrorCode::UnexpectedChar);
    }
}
