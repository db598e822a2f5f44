// src/parse_expr/primary.rs

use crate::ast::*;
use crate::errors::ParserError;
use crate::parser::{Expected, Parser};
use crate::token::TokenType;

impl<'d> Parser<'d> {
    /// Literals, variables, parenthesized expressions and `new`.
    pub(super) fn primary(&mut self) -> Expected<Expr> {
        let loc = self.loc();

        let node = match self.current().ty {
            TokenType::IntLiteral | TokenType::HexLiteral => {
                let value = self.integer_literal()?;
                self.advance();
                ExprNode::NumberLit(NumericValue::from_integer(value))
            }
            TokenType::FloatLiteral => {
                let Ok(value) = self.current().lexeme.parse::<f64>() else {
                    let literal = self.current().lexeme.clone();
                    return Err(self.fail(ParserError::InvalidNumber {
                        literal,
                        span: self.current().span.into(),
                    }));
                };
                self.advance();
                ExprNode::NumberLit(NumericValue::F64(value))
            }
            TokenType::KwTrue | TokenType::KwFalse => {
                let value = self.check(TokenType::KwTrue);
                self.advance();
                ExprNode::BoolLit(value)
            }
            TokenType::Identifier => {
                let name = self.consume_identifier()?;
                ExprNode::Var(name)
            }
            TokenType::LParen => {
                self.advance();
                let inner = self.expression(0)?;
                self.consume(TokenType::RParen, ")")?;
                return Ok(inner);
            }
            TokenType::KwNew => {
                self.advance();
                let ty = self.parse_type()?;
                let args = if self.check(TokenType::LParen) {
                    self.call_args()?
                } else {
                    Vec::new()
                };
                ExprNode::New(Box::new(NewExpr { ty, args }))
            }
            TokenType::StringLiteral | TokenType::CharLiteral | TokenType::KwNull => {
                let construct = match self.current().ty {
                    TokenType::StringLiteral => "string literals in expressions",
                    TokenType::CharLiteral => "character literals in expressions",
                    _ => "null literals",
                };
                return Err(self.fail(ParserError::Unsupported {
                    construct,
                    span: self.current().span.into(),
                }));
            }
            _ => {
                let found = self.current_text();
                return Err(self.fail(ParserError::ExpectedExpression {
                    found,
                    span: self.current().span.into(),
                }));
            }
        };

        Ok(Expr::new(node, loc))
    }

    /// Value of the current int or hex literal token. Does not advance.
    pub(crate) fn integer_literal(&mut self) -> Expected<u64> {
        let token = self.current();
        let parsed = match token.ty {
            TokenType::HexLiteral => {
                let digits = &token.lexeme[2..];
                if digits.is_empty() {
                    None
                } else {
                    Some(u64::from_str_radix(digits, 16))
                }
            }
            _ => Some(token.lexeme.parse::<u64>()),
        };

        match parsed {
            Some(Ok(value)) => Ok(value),
            Some(Err(_)) => {
                let literal = token.lexeme.clone();
                Err(self.fail(ParserError::IntegerOutOfRange {
                    literal,
                    span: self.current().span.into(),
                }))
            }
            None => {
                let literal = token.lexeme.clone();
                Err(self.fail(ParserError::InvalidNumber {
                    literal,
                    span: self.current().span.into(),
                }))
            }
        }
    }

    /// Function-call argument list: `( expr, ... )`
    pub(crate) fn call_args(&mut self) -> Expected<Vec<Expr>> {
        self.consume(TokenType::LParen, "(")?;
        let mut args = Vec::new();
        if !self.check(TokenType::RParen) {
            loop {
                args.push(self.expression(0)?);
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenType::RParen, ")")?;
        Ok(args)
    }
}
