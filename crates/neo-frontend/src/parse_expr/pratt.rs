// src/parse_expr/pratt.rs

use crate::ast::*;
use crate::errors::ParserError;
use crate::parser::{Expected, Parser};
use crate::token::TokenType;

fn binary_op(ty: TokenType) -> Option<BinaryOp> {
    let op = match ty {
        TokenType::Plus => BinaryOp::Add,
        TokenType::Minus => BinaryOp::Sub,
        TokenType::Star => BinaryOp::Mul,
        TokenType::Slash => BinaryOp::Div,
        TokenType::Percent => BinaryOp::Mod,
        TokenType::EqEq => BinaryOp::Eq,
        TokenType::BangEq => BinaryOp::Ne,
        TokenType::Lt => BinaryOp::Lt,
        TokenType::Gt => BinaryOp::Gt,
        TokenType::LtEq => BinaryOp::Le,
        TokenType::GtEq => BinaryOp::Ge,
        TokenType::AmpAmp => BinaryOp::And,
        TokenType::PipePipe => BinaryOp::Or,
        TokenType::Ampersand => BinaryOp::BitAnd,
        TokenType::Pipe => BinaryOp::BitOr,
        TokenType::Caret => BinaryOp::BitXor,
        TokenType::LessLess => BinaryOp::Shl,
        TokenType::GreaterGreater => BinaryOp::Shr,
        TokenType::Eq => BinaryOp::Assign,
        TokenType::PlusEq => BinaryOp::AddAssign,
        TokenType::MinusEq => BinaryOp::SubAssign,
        TokenType::StarEq => BinaryOp::MulAssign,
        TokenType::SlashEq => BinaryOp::DivAssign,
        TokenType::PercentEq => BinaryOp::ModAssign,
        TokenType::AmpEq => BinaryOp::BitAndAssign,
        TokenType::PipeEq => BinaryOp::BitOrAssign,
        TokenType::CaretEq => BinaryOp::BitXorAssign,
        TokenType::LessLessEq => BinaryOp::ShlAssign,
        TokenType::GreaterGreaterEq => BinaryOp::ShrAssign,
        _ => return None,
    };
    Some(op)
}

fn prefix_op(ty: TokenType) -> Option<UnaryOp> {
    match ty {
        TokenType::Plus => Some(UnaryOp::Plus),
        TokenType::Minus => Some(UnaryOp::Neg),
        TokenType::Bang => Some(UnaryOp::Not),
        TokenType::Tilde => Some(UnaryOp::BitNot),
        TokenType::PlusPlus => Some(UnaryOp::PreInc),
        TokenType::MinusMinus => Some(UnaryOp::PreDec),
        _ => None,
    }
}

impl<'d> Parser<'d> {
    /// Parse an expression whose binary operators all bind tighter than
    /// `min_prec`. Assignments are right associative, everything else left.
    pub(crate) fn expression(&mut self, min_prec: u8) -> Expected<Expr> {
        self.nested(|parser| parser.binary(min_prec))
    }

    /// Every operator folded into `left` nests the tree one level deeper.
    fn binary(&mut self, min_prec: u8) -> Expected<Expr> {
        let mut left = self.unary()?;

        while self.current().ty.precedence() > min_prec {
            let prec = self.current().ty.precedence();
            let Some(op) = binary_op(self.current().ty) else {
                break;
            };
            self.enter_nested()?;

            if op.is_assignment()
                && !matches!(left.node, ExprNode::Var(_) | ExprNode::MemberAccess(_))
            {
                return Err(self.fail(ParserError::InvalidAssignmentTarget {
                    span: self.current().span.into(),
                }));
            }
            self.advance();

            let right = if op.is_assignment() {
                self.expression(prec - 1)?
            } else {
                self.expression(prec)?
            };
            let loc = left.loc.clone();
            left = Expr::new(
                ExprNode::Binary(Box::new(BinaryExpr { op, left, right })),
                loc,
            );
        }

        Ok(left)
    }

    /// Prefix operators, then postfix.
    fn unary(&mut self) -> Expected<Expr> {
        self.nested(Self::prefix)
    }

    fn prefix(&mut self) -> Expected<Expr> {
        if let Some(op) = prefix_op(self.current().ty) {
            let loc = self.loc();
            self.advance();
            let operand = self.unary()?;
            return Ok(Expr::new(
                ExprNode::Unary(Box::new(UnaryExpr { op, operand })),
                loc,
            ));
        }
        self.postfix()
    }

    /// Calls, member access (`.` and `->`) and postfix `++`/`--`.
    fn postfix(&mut self) -> Expected<Expr> {
        let mut expr = self.primary()?;

        loop {
            if matches!(
                self.current().ty,
                TokenType::LParen
                    | TokenType::Dot
                    | TokenType::Arrow
                    | TokenType::PlusPlus
                    | TokenType::MinusMinus
            ) {
                self.enter_nested()?;
            }
            let loc = expr.loc.clone();
            expr = match self.current().ty {
                TokenType::LParen => {
                    let args = self.call_args()?;
                    Expr::new(ExprNode::Call(Box::new(CallExpr { callee: expr, args })), loc)
                }
                TokenType::Dot | TokenType::Arrow => {
                    let unsafe_access = self.check(TokenType::Arrow);
                    self.advance();
                    let member = self.consume_identifier()?;
                    Expr::new(
                        ExprNode::MemberAccess(Box::new(MemberAccessExpr {
                            object: expr,
                            member,
                            unsafe_access,
                        })),
                        loc,
                    )
                }
                TokenType::PlusPlus | TokenType::MinusMinus => {
                    let op = if self.check(TokenType::PlusPlus) {
                        UnaryOp::PostInc
                    } else {
                        UnaryOp::PostDec
                    };
                    self.advance();
                    Expr::new(
                        ExprNode::Unary(Box::new(UnaryExpr { op, operand: expr })),
                        loc,
                    )
                }
                _ => break,
            };
        }

        Ok(expr)
    }
}
