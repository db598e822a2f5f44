// src/parse_type.rs
//
// Type reference parsing.

use crate::ast::{TypeExpr, TypeExprKind, TypeRef};
use crate::errors::ParserError;
use crate::parser::{Expected, Parser};
use crate::token::TokenType;

impl<'d> Parser<'d> {
    /// Parse a type: a `.`/`::` qualified name, optionally followed by
    /// `[sizes]` for arrays or `*` for pointers.
    pub(crate) fn parse_type(&mut self) -> Expected<TypeExpr> {
        let loc = self.loc();
        if !self.check(TokenType::Identifier) {
            let found = self.current_text();
            return Err(self.fail(ParserError::ExpectedType {
                found,
                span: self.current().span.into(),
            }));
        }

        let mut name = self.current().lexeme.clone();
        self.advance();

        let mut qualifier = Vec::new();
        while matches!(self.current().ty, TokenType::Dot | TokenType::ColonColon) {
            self.advance();
            let next = self.consume_identifier()?;
            qualifier.push(std::mem::replace(&mut name, next));
        }

        let ty = TypeRef {
            module: qualifier.join("."),
            name,
        };

        let kind = if self.match_token(TokenType::LBracket) {
            let sizes = self.array_sizes()?;
            TypeExprKind::Array { element: ty, sizes }
        } else if self.match_token(TokenType::Star) {
            TypeExprKind::Pointer(ty)
        } else {
            TypeExprKind::Named(ty)
        };

        Ok(TypeExpr { kind, loc })
    }

    /// Comma separated integer sizes after `[`, through the closing `]`.
    /// No sizes at all means an open-ended array.
    fn array_sizes(&mut self) -> Expected<Vec<u64>> {
        let mut sizes = Vec::new();
        if !self.check(TokenType::RBracket) {
            loop {
                if !matches!(
                    self.current().ty,
                    TokenType::IntLiteral | TokenType::HexLiteral
                ) {
                    let found = self.current_text();
                    return Err(self.fail(ParserError::ExpectedToken {
                        expected: "array size".to_string(),
                        found,
                        span: self.current().span.into(),
                    }));
                }
                sizes.push(self.integer_literal()?);
                self.advance();

                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenType::RBracket, "]")?;
        Ok(sizes)
    }
}
