use std::fmt;

use crate::formula::Formula;
use crate::term::Term;
use crate::token::{lex, Token, TokenKind};

/// A formula or term failed to parse: malformed input is rejected with the
/// byte offset it failed at and a human-readable description of what was expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub position: usize,
    pub expected: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error at position {}: expected {}", self.position, self.expected)
    }
}

impl std::error::Error for ParseError {}

/// Parses a formula string per the grammar in the specification:
/// `<->` (lowest) < `->` (right-assoc) < `|` (left) < `&` (left) < `!` < quantifiers < atoms/parens.
pub fn parse(input: &str) -> Result<Formula, ParseError> {
    let tokens = lex(input).map_err(|(position, expected)| ParseError { position, expected })?;
    let mut parser = Parser { tokens, pos: 0 };
    let formula = parser.parse_iff()?;
    parser.expect_end()?;
    Ok(formula)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let t = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn expect_end(&mut self) -> Result<(), ParseError> {
        if self.peek().kind == TokenKind::End {
            Ok(())
        } else {
            Err(ParseError {
                position: self.peek().position,
                expected: "end of input".to_string(),
            })
        }
    }

    fn expect_ident(&mut self) -> Result<(String, usize), ParseError> {
        let tok = self.advance();
        match tok.kind {
            TokenKind::Ident(name) => Ok((name, tok.position)),
            other => Err(ParseError {
                position: tok.position,
                expected: format!("identifier, found {}", other),
            }),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        let tok = self.advance();
        if tok.kind == kind {
            Ok(())
        } else {
            Err(ParseError {
                position: tok.position,
                expected: format!("{}, found {}", kind, tok.kind),
            })
        }
    }

    fn parse_iff(&mut self) -> Result<Formula, ParseError> {
        let mut lhs = self.parse_imp()?;
        while self.peek().kind == TokenKind::DoubleArrow {
            self.advance();
            let rhs = self.parse_imp()?;
            lhs = Formula::iff(lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_imp(&mut self) -> Result<Formula, ParseError> {
        let lhs = self.parse_or()?;
        if self.peek().kind == TokenKind::Arrow {
            self.advance();
            // Right-associative: recurse back into the same precedence level.
            let rhs = self.parse_imp()?;
            Ok(Formula::imp(lhs, rhs))
        } else {
            Ok(lhs)
        }
    }

    fn parse_or(&mut self) -> Result<Formula, ParseError> {
        let mut lhs = self.parse_and()?;
        while self.peek().kind == TokenKind::Or {
            self.advance();
            let rhs = self.parse_and()?;
            lhs = Formula::or(lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Formula, ParseError> {
        let mut lhs = self.parse_unary()?;
        while self.peek().kind == TokenKind::And {
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = Formula::and(lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Formula, ParseError> {
        match self.peek().kind.clone() {
            TokenKind::Not => {
                self.advance();
                Ok(Formula::not(self.parse_unary()?))
            }
            TokenKind::ForAll => {
                self.advance();
                let (var, _) = self.expect_ident()?;
                Ok(Formula::forall(var, self.parse_unary()?))
            }
            TokenKind::Exists => {
                self.advance();
                let (var, _) = self.expect_ident()?;
                Ok(Formula::exists(var, self.parse_unary()?))
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Formula, ParseError> {
        if self.peek().kind == TokenKind::LParen {
            self.advance();
            let inner = self.parse_iff()?;
            self.expect(TokenKind::RParen)?;
            return Ok(inner);
        }
        let (name, _) = self.expect_ident()?;
        let args = self.parse_optional_arg_list()?;
        Ok(Formula::Atom(name, args))
    }

    fn parse_optional_arg_list(&mut self) -> Result<Vec<Term>, ParseError> {
        if self.peek().kind != TokenKind::LParen {
            return Ok(vec![]);
        }
        self.advance();
        let mut args = vec![self.parse_term()?];
        while self.peek().kind == TokenKind::Comma {
            self.advance();
            args.push(self.parse_term()?);
        }
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }

    fn parse_term(&mut self) -> Result<Term, ParseError> {
        if self.peek().kind == TokenKind::LParen {
            self.advance();
            let inner = self.parse_term()?;
            self.expect(TokenKind::RParen)?;
            return Ok(inner);
        }
        let (name, _) = self.expect_ident()?;
        if self.peek().kind == TokenKind::LParen {
            self.advance();
            let mut args = vec![self.parse_term()?];
            while self.peek().kind == TokenKind::Comma {
                self.advance();
                args.push(self.parse_term()?);
            }
            self.expect(TokenKind::RParen)?;
            Ok(Term::Func(name, args))
        } else if is_lowercase_led(&name) {
            Ok(Term::Var(name))
        } else {
            Ok(Term::Const(name))
        }
    }
}

fn is_lowercase_led(name: &str) -> bool {
    name.chars().next().map(|c| c.is_lowercase()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_modus_ponens_axiom() {
        let f = parse("forall x (P(x) -> Q(x))").unwrap();
        assert_eq!(
            f,
            Formula::forall(
                "x",
                Formula::imp(
                    Formula::Atom("P".to_string(), vec![Term::Var("x".to_string())]),
                    Formula::Atom("Q".to_string(), vec![Term::Var("x".to_string())]),
                ),
            )
        );
    }

    #[test]
    fn arrow_is_right_associative() {
        let f = parse("P -> Q -> R").unwrap();
        assert_eq!(
            f,
            Formula::imp(
                Formula::Atom("P".to_string(), vec![]),
                Formula::imp(Formula::Atom("Q".to_string(), vec![]), Formula::Atom("R".to_string(), vec![])),
            )
        );
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let f = parse("P | Q & R").unwrap();
        assert_eq!(
            f,
            Formula::or(
                Formula::Atom("P".to_string(), vec![]),
                Formula::and(Formula::Atom("Q".to_string(), vec![]), Formula::Atom("R".to_string(), vec![])),
            )
        );
    }

    #[test]
    fn quantifier_binds_tighter_than_and() {
        let f = parse("forall x P(x) & Q").unwrap();
        assert_eq!(
            f,
            Formula::and(
                Formula::forall("x", Formula::Atom("P".to_string(), vec![Term::Var("x".to_string())])),
                Formula::Atom("Q".to_string(), vec![]),
            )
        );
    }

    #[test]
    fn classifies_terms_by_case_and_arity() {
        let f = parse("P(x, A, f(x), 0)").unwrap();
        match f {
            Formula::Atom(_, args) => {
                assert_eq!(args[0], Term::Var("x".to_string()));
                assert_eq!(args[1], Term::Const("A".to_string()));
                assert_eq!(args[2], Term::Func("f".to_string(), vec![Term::Var("x".to_string())]));
                assert_eq!(args[3], Term::Const("0".to_string()));
            }
            _ => panic!("expected atom"),
        }
    }

    #[test]
    fn reports_position_on_malformed_input() {
        let err = parse("P(x) & ").unwrap_err();
        assert_eq!(err.position, 7);
    }

    #[test]
    fn round_trip_through_pretty_printer() {
        let original = parse("forall x (exists y (P(x, y) <-> !Q(y)))").unwrap();
        let printed = original.to_string();
        let reparsed = parse(&printed).unwrap();
        assert_eq!(original, reparsed);
    }
}
