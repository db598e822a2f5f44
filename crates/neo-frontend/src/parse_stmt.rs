// src/parse_stmt.rs
//
// Statement parsing for function bodies.

use crate::ast::*;
use crate::parser::{Expected, Parser};
use crate::token::TokenType;

impl<'d> Parser<'d> {
    /// Parse a block: `{ statements }`
    pub(crate) fn block_stmts(&mut self) -> Expected<Vec<Stmt>> {
        self.consume(TokenType::LBrace, "{")?;
        let mut stmts = Vec::new();
        while !self.check(TokenType::RBrace) && !self.cursor.is_at_end() {
            stmts.push(self.statement()?);
        }
        self.consume(TokenType::RBrace, "}")?;
        Ok(stmts)
    }

    /// Parse a statement
    pub(crate) fn statement(&mut self) -> Expected<Stmt> {
        self.nested(Self::statement_kind)
    }

    fn statement_kind(&mut self) -> Expected<Stmt> {
        match self.current().ty {
            TokenType::KwVar | TokenType::KwVal => {
                let var = self.var_decl()?;
                Ok(Stmt::Decl(Box::new(Decl::Var(var))))
            }
            TokenType::LBrace => {
                let loc = self.loc();
                let stmts = self.block_stmts()?;
                Ok(Stmt::Compound(CompoundStmt { stmts, loc }))
            }
            TokenType::KwIf => self.if_stmt(),
            TokenType::KwWhile => self.while_stmt(),
            TokenType::KwFor => self.for_stmt(),
            TokenType::KwReturn => self.return_stmt(),
            TokenType::KwBreak => {
                let loc = self.loc();
                self.advance();
                self.consume(TokenType::Semicolon, ";")?;
                Ok(Stmt::Break(loc))
            }
            TokenType::KwContinue => {
                let loc = self.loc();
                self.advance();
                self.consume(TokenType::Semicolon, ";")?;
                Ok(Stmt::Continue(loc))
            }
            _ => self.expr_stmt(),
        }
    }

    /// `expr ;`
    fn expr_stmt(&mut self) -> Expected<Stmt> {
        let loc = self.loc();
        let expr = self.expression(0)?;
        self.consume(TokenType::Semicolon, ";")?;
        Ok(Stmt::Expr(ExprStmt { expr, loc }))
    }

    /// Parenthesized condition for `if` and `while`.
    fn condition(&mut self) -> Expected<Expr> {
        self.consume(TokenType::LParen, "(")?;
        let cond = self.expression(0)?;
        self.consume(TokenType::RParen, ")")?;
        Ok(cond)
    }

    fn if_stmt(&mut self) -> Expected<Stmt> {
        let loc = self.loc();
        self.advance(); // consume 'if'
        let cond = self.condition()?;
        let then_branch = self.statement()?;
        let else_branch = if self.match_token(TokenType::KwElse) {
            Some(self.statement()?)
        } else {
            None
        };
        Ok(Stmt::If(Box::new(IfStmt {
            cond,
            then_branch,
            else_branch,
            loc,
        })))
    }

    fn while_stmt(&mut self) -> Expected<Stmt> {
        let loc = self.loc();
        self.advance(); // consume 'while'
        let cond = self.condition()?;
        let body = self.statement()?;
        Ok(Stmt::While(Box::new(WhileStmt { cond, body, loc })))
    }

    /// `for (init; cond; step) body`, every clause optional.
    fn for_stmt(&mut self) -> Expected<Stmt> {
        let loc = self.loc();
        self.advance(); // consume 'for'
        self.consume(TokenType::LParen, "(")?;

        let init = match self.current().ty {
            TokenType::Semicolon => {
                self.advance();
                None
            }
            // var_decl consumes its own ';'
            TokenType::KwVar | TokenType::KwVal => {
                let var = self.var_decl()?;
                Some(Stmt::Decl(Box::new(Decl::Var(var))))
            }
            _ => Some(self.expr_stmt()?),
        };

        let cond = if self.check(TokenType::Semicolon) {
            None
        } else {
            Some(self.expression(0)?)
        };
        self.consume(TokenType::Semicolon, ";")?;

        let step = if self.check(TokenType::RParen) {
            None
        } else {
            Some(self.expression(0)?)
        };
        self.consume(TokenType::RParen, ")")?;

        let body = self.statement()?;
        Ok(Stmt::For(Box::new(ForStmt {
            init,
            cond,
            step,
            body,
            loc,
        })))
    }

    fn return_stmt(&mut self) -> Expected<Stmt> {
        let loc = self.loc();
        self.advance(); // consume 'return'
        let value = if self.check(TokenType::Semicolon) {
            None
        } else {
            Some(self.expression(0)?)
        };
        self.consume(TokenType::Semicolon, ";")?;
        Ok(Stmt::Return(ReturnStmt { value, loc }))
    }
}
