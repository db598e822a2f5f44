// src/codec.rs
//! Binary persistence of parse results.
//!
//! Layout, all integers little-endian:
//! - strings are a `u32` byte length followed by UTF-8
//! - sequences are a `u32` count followed by the elements
//! - options are a `u8` presence flag followed by the value
//! - a location is `line: u32`, `column: u32`, `file: string` (empty for none)
//!
//! Every statement, declaration and type node starts with its category tag
//! and location, then its kind tag, then its fields. Expressions start with
//! their location and kind tag. A whole file starts with [`MAGIC`] and
//! [`FORMAT_VERSION`].

use std::path::Path;
use std::sync::Arc;

use crate::ast::*;
use crate::errors::CodecError;
use crate::source::SourceLoc;

pub const MAGIC: &[u8; 4] = b"NEOA";
pub const FORMAT_VERSION: u32 = 1;

/// Deepest node nesting a [`Decoder`] accepts. Anything the parser builds
/// stays well below it.
pub const MAX_DECODE_DEPTH: usize = 512;

type CodecResult<T> = Result<T, CodecError>;

/// Append-only byte sink.
#[derive(Debug, Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(value as u8);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f64(&mut self, value: f64) {
        self.write_u64(value.to_bits());
    }

    /// Lengths and counts are stored as `u32`.
    fn write_len(&mut self, len: usize) {
        debug_assert!(u32::try_from(len).is_ok(), "length {len} overflows u32");
        self.write_u32(len as u32);
    }

    pub fn write_str(&mut self, value: &str) {
        self.write_len(value.len());
        self.buf.extend_from_slice(value.as_bytes());
    }

    pub fn write_loc(&mut self, loc: &SourceLoc) {
        self.write_u32(loc.line);
        self.write_u32(loc.column);
        self.write_str(loc.file.as_deref().unwrap_or(""));
    }

    pub fn write_seq<T: Persist>(&mut self, items: &[T]) {
        self.write_len(items.len());
        for item in items {
            item.write(self);
        }
    }

    pub fn write_opt<T: Persist>(&mut self, item: Option<&T>) {
        match item {
            Some(item) => {
                self.write_u8(1);
                item.write(self);
            }
            None => self.write_u8(0),
        }
    }

    fn write_opt_str(&mut self, value: Option<&str>) {
        match value {
            Some(value) => {
                self.write_u8(1);
                self.write_str(value);
            }
            None => self.write_u8(0),
        }
    }

    fn write_header(&mut self, category: NodeCategory, loc: &SourceLoc) {
        self.write_u8(category as u8);
        self.write_loc(loc);
    }
}

/// Cursor over an encoded buffer.
pub struct Decoder<'a> {
    bytes: &'a [u8],
    pos: usize,
    /// Most recently decoded file name, so locations from one file share it.
    last_file: Option<Arc<str>>,
    depth: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            last_file: None,
            depth: 0,
        }
    }

    /// Run `read` one node deeper, failing past [`MAX_DECODE_DEPTH`].
    fn nested<T>(&mut self, read: impl FnOnce(&mut Self) -> CodecResult<T>) -> CodecResult<T> {
        if self.depth >= MAX_DECODE_DEPTH {
            return Err(CodecError::NestingTooDeep {
                offset: self.pos,
                limit: MAX_DECODE_DEPTH,
            });
        }
        self.depth += 1;
        let result = read(self);
        self.depth -= 1;
        result
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, needed: usize) -> CodecResult<&'a [u8]> {
        if self.remaining() < needed {
            return Err(CodecError::UnexpectedEof {
                offset: self.pos,
                needed,
            });
        }
        let slice = &self.bytes[self.pos..self.pos + needed];
        self.pos += needed;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> CodecResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_bool(&mut self) -> CodecResult<bool> {
        let offset = self.pos;
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            tag => Err(CodecError::InvalidTag {
                what: "bool",
                tag,
                offset,
            }),
        }
    }

    pub fn read_u32(&mut self) -> CodecResult<u32> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    pub fn read_u64(&mut self) -> CodecResult<u64> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    pub fn read_i64(&mut self) -> CodecResult<i64> {
        Ok(i64::from_le_bytes(self.take_array()?))
    }

    pub fn read_f64(&mut self) -> CodecResult<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    pub fn read_str(&mut self) -> CodecResult<&'a str> {
        let len = self.read_u32()? as usize;
        let offset = self.pos;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8 { offset })
    }

    pub fn read_string(&mut self) -> CodecResult<String> {
        Ok(self.read_str()?.to_string())
    }

    pub fn read_loc(&mut self) -> CodecResult<SourceLoc> {
        let line = self.read_u32()?;
        let column = self.read_u32()?;
        let name = self.read_str()?;
        let file = if name.is_empty() {
            None
        } else {
            match &self.last_file {
                Some(last) if last.as_ref() == name => Some(last.clone()),
                _ => {
                    let file: Arc<str> = Arc::from(name);
                    self.last_file = Some(file.clone());
                    Some(file)
                }
            }
        };
        Ok(SourceLoc::new(line, column, file))
    }

    pub fn read_seq<T: Persist>(&mut self) -> CodecResult<Vec<T>> {
        let count = self.read_u32()? as usize;
        // Every element takes at least one byte.
        if count > self.remaining() {
            return Err(CodecError::UnexpectedEof {
                offset: self.pos,
                needed: count,
            });
        }
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(T::read(self)?);
        }
        Ok(items)
    }

    pub fn read_opt<T: Persist>(&mut self) -> CodecResult<Option<T>> {
        if self.read_bool()? {
            Ok(Some(T::read(self)?))
        } else {
            Ok(None)
        }
    }

    fn read_opt_string(&mut self) -> CodecResult<Option<String>> {
        if self.read_bool()? {
            Ok(Some(self.read_string()?))
        } else {
            Ok(None)
        }
    }

    /// Read a tag byte and map it through `decode`.
    fn read_tag<T>(&mut self, what: &'static str, decode: impl Fn(u8) -> Option<T>) -> CodecResult<T> {
        let offset = self.pos;
        let tag = self.read_u8()?;
        decode(tag).ok_or(CodecError::InvalidTag { what, tag, offset })
    }

    fn read_header(&mut self) -> CodecResult<(NodeCategory, SourceLoc)> {
        let category = self.read_tag("node category", category_from_tag)?;
        let loc = self.read_loc()?;
        Ok((category, loc))
    }

    fn expect_header(&mut self, expected: NodeCategory) -> CodecResult<SourceLoc> {
        let offset = self.pos;
        let (category, loc) = self.read_header()?;
        if category != expected {
            return Err(CodecError::InvalidTag {
                what: "node category",
                tag: category as u8,
                offset,
            });
        }
        Ok(loc)
    }

    /// Declaration header whose kind must be `expected`.
    fn expect_decl(&mut self, expected: DeclKind) -> CodecResult<SourceLoc> {
        let loc = self.expect_header(NodeCategory::Declaration)?;
        let offset = self.pos;
        let kind = self.read_tag("declaration kind", decl_kind_from_tag)?;
        if kind != expected {
            return Err(CodecError::InvalidTag {
                what: "declaration kind",
                tag: kind as u8,
                offset,
            });
        }
        Ok(loc)
    }
}

/// A value that can be written to and read back from the binary format.
pub trait Persist: Sized {
    fn write(&self, enc: &mut Encoder);
    fn read(dec: &mut Decoder<'_>) -> CodecResult<Self>;
}

// ---------------------------------------------------------------------------
// Tags

fn category_from_tag(tag: u8) -> Option<NodeCategory> {
    Some(match tag {
        0 => NodeCategory::Statement,
        1 => NodeCategory::Declaration,
        2 => NodeCategory::Type,
        _ => return None,
    })
}

fn stmt_kind_from_tag(tag: u8) -> Option<StmtKind> {
    Some(match tag {
        0 => StmtKind::Expression,
        1 => StmtKind::Compound,
        2 => StmtKind::If,
        3 => StmtKind::While,
        4 => StmtKind::For,
        5 => StmtKind::Foreach,
        6 => StmtKind::Return,
        7 => StmtKind::Break,
        8 => StmtKind::Continue,
        9 => StmtKind::Import,
        10 => StmtKind::Decl,
        _ => return None,
    })
}

fn decl_kind_from_tag(tag: u8) -> Option<DeclKind> {
    Some(match tag {
        0 => DeclKind::Var,
        1 => DeclKind::Func,
        2 => DeclKind::Class,
        3 => DeclKind::Field,
        4 => DeclKind::Struct,
        5 => DeclKind::Module,
        6 => DeclKind::Interface,
        7 => DeclKind::Enum,
        8 => DeclKind::TopLevelDecls,
        _ => return None,
    })
}

fn expr_kind_from_tag(tag: u8) -> Option<ExprKind> {
    Some(match tag {
        0 => ExprKind::NumberLit,
        1 => ExprKind::BoolLit,
        2 => ExprKind::Binary,
        3 => ExprKind::Unary,
        4 => ExprKind::FuncCall,
        5 => ExprKind::MemberAccess,
        6 => ExprKind::Var,
        7 => ExprKind::Cast,
        8 => ExprKind::New,
        _ => return None,
    })
}

fn func_kind_from_tag(tag: u8) -> Option<FuncKind> {
    Some(match tag {
        0 => FuncKind::Function,
        1 => FuncKind::Ctor,
        2 => FuncKind::Dtor,
        _ => return None,
    })
}

fn binary_op_from_tag(tag: u8) -> Option<BinaryOp> {
    BinaryOp::ALL.get(tag as usize).copied()
}

fn unary_op_from_tag(tag: u8) -> Option<UnaryOp> {
    UnaryOp::ALL.get(tag as usize).copied()
}

// ---------------------------------------------------------------------------
// Files

impl ParsedFile {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut enc = Encoder::new();
        enc.buf.extend_from_slice(MAGIC);
        enc.write_u32(FORMAT_VERSION);
        enc.write_str(self.file.as_deref().unwrap_or(""));
        enc.write_seq(&self.nodes);
        enc.finish()
    }

    pub fn from_bytes(bytes: &[u8]) -> CodecResult<Self> {
        let mut dec = Decoder::new(bytes);
        if dec.take(MAGIC.len()).map_err(|_| CodecError::BadMagic)? != MAGIC {
            return Err(CodecError::BadMagic);
        }
        let version = dec.read_u32()?;
        if version != FORMAT_VERSION {
            return Err(CodecError::UnsupportedVersion {
                found: version,
                expected: FORMAT_VERSION,
            });
        }
        let name = dec.read_str()?;
        let file = (!name.is_empty()).then(|| Arc::<str>::from(name));
        dec.last_file = file.clone();
        let nodes = dec.read_seq()?;
        if dec.remaining() != 0 {
            return Err(CodecError::TrailingBytes {
                count: dec.remaining(),
            });
        }
        Ok(ParsedFile { file, nodes })
    }

    pub fn save(&self, path: &Path) -> CodecResult<()> {
        std::fs::write(path, self.to_bytes())?;
        tracing::debug!(path = %path.display(), nodes = self.nodes.len(), "saved ast");
        Ok(())
    }

    pub fn load(path: &Path) -> CodecResult<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

impl Persist for Node {
    fn write(&self, enc: &mut Encoder) {
        match self {
            Node::Stmt(stmt) => stmt.write(enc),
            Node::Decl(decl) => decl.write(enc),
            Node::Type(ty) => ty.write(enc),
        }
    }

    fn read(dec: &mut Decoder<'_>) -> CodecResult<Self> {
        let (category, loc) = dec.read_header()?;
        Ok(match category {
            NodeCategory::Statement => Node::Stmt(read_stmt_body(dec, loc)?),
            NodeCategory::Declaration => Node::Decl(read_decl_body(dec, loc)?),
            NodeCategory::Type => Node::Type(read_type_body(dec, loc)?),
        })
    }
}

// ---------------------------------------------------------------------------
// Types

impl Persist for TypeRef {
    fn write(&self, enc: &mut Encoder) {
        enc.write_str(&self.module);
        enc.write_str(&self.name);
    }

    fn read(dec: &mut Decoder<'_>) -> CodecResult<Self> {
        Ok(TypeRef {
            module: dec.read_string()?,
            name: dec.read_string()?,
        })
    }
}

impl Persist for TypeExpr {
    fn write(&self, enc: &mut Encoder) {
        enc.write_header(NodeCategory::Type, &self.loc);
        match &self.kind {
            TypeExprKind::Named(ty) => {
                enc.write_u8(0);
                ty.write(enc);
            }
            TypeExprKind::Array { element, sizes } => {
                enc.write_u8(1);
                element.write(enc);
                enc.write_len(sizes.len());
                for size in sizes {
                    enc.write_u64(*size);
                }
            }
            TypeExprKind::Pointer(ty) => {
                enc.write_u8(2);
                ty.write(enc);
            }
        }
    }

    fn read(dec: &mut Decoder<'_>) -> CodecResult<Self> {
        let loc = dec.expect_header(NodeCategory::Type)?;
        read_type_body(dec, loc)
    }
}

fn read_type_body(dec: &mut Decoder<'_>, loc: SourceLoc) -> CodecResult<TypeExpr> {
    let offset = dec.position();
    let kind = match dec.read_u8()? {
        0 => TypeExprKind::Named(TypeRef::read(dec)?),
        1 => {
            let element = TypeRef::read(dec)?;
            let count = dec.read_u32()?;
            let mut sizes = Vec::new();
            for _ in 0..count {
                sizes.push(dec.read_u64()?);
            }
            TypeExprKind::Array { element, sizes }
        }
        2 => TypeExprKind::Pointer(TypeRef::read(dec)?),
        tag => {
            return Err(CodecError::InvalidTag {
                what: "type kind",
                tag,
                offset,
            });
        }
    };
    Ok(TypeExpr { kind, loc })
}

// ---------------------------------------------------------------------------
// Expressions

impl Persist for NumericValue {
    fn write(&self, enc: &mut Encoder) {
        match *self {
            NumericValue::I8(v) => {
                enc.write_u8(0);
                enc.write_i64(v.into());
            }
            NumericValue::I16(v) => {
                enc.write_u8(1);
                enc.write_i64(v.into());
            }
            NumericValue::I32(v) => {
                enc.write_u8(2);
                enc.write_i64(v.into());
            }
            NumericValue::I64(v) => {
                enc.write_u8(3);
                enc.write_i64(v);
            }
            NumericValue::U8(v) => {
                enc.write_u8(4);
                enc.write_u64(v.into());
            }
            NumericValue::U16(v) => {
                enc.write_u8(5);
                enc.write_u64(v.into());
            }
            NumericValue::U32(v) => {
                enc.write_u8(6);
                enc.write_u64(v.into());
            }
            NumericValue::U64(v) => {
                enc.write_u8(7);
                enc.write_u64(v);
            }
            NumericValue::F32(v) => {
                enc.write_u8(8);
                enc.write_u32(v.to_bits());
            }
            NumericValue::F64(v) => {
                enc.write_u8(9);
                enc.write_f64(v);
            }
        }
    }

    fn read(dec: &mut Decoder<'_>) -> CodecResult<Self> {
        let offset = dec.position();
        let tag = dec.read_u8()?;
        let out_of_range = CodecError::InvalidTag {
            what: "numeric value",
            tag,
            offset,
        };
        Ok(match tag {
            0 => NumericValue::I8(i8::try_from(dec.read_i64()?).map_err(|_| out_of_range)?),
            1 => NumericValue::I16(i16::try_from(dec.read_i64()?).map_err(|_| out_of_range)?),
            2 => NumericValue::I32(i32::try_from(dec.read_i64()?).map_err(|_| out_of_range)?),
            3 => NumericValue::I64(dec.read_i64()?),
            4 => NumericValue::U8(u8::try_from(dec.read_u64()?).map_err(|_| out_of_range)?),
            5 => NumericValue::U16(u16::try_from(dec.read_u64()?).map_err(|_| out_of_range)?),
            6 => NumericValue::U32(u32::try_from(dec.read_u64()?).map_err(|_| out_of_range)?),
            7 => NumericValue::U64(dec.read_u64()?),
            8 => NumericValue::F32(f32::from_bits(dec.read_u32()?)),
            9 => NumericValue::F64(dec.read_f64()?),
            _ => return Err(out_of_range),
        })
    }
}

impl Persist for Expr {
    fn write(&self, enc: &mut Encoder) {
        enc.write_loc(&self.loc);
        enc.write_u8(self.kind() as u8);
        match &self.node {
            ExprNode::NumberLit(value) => value.write(enc),
            ExprNode::BoolLit(value) => enc.write_bool(*value),
            ExprNode::Var(name) => enc.write_str(name),
            ExprNode::Binary(bin) => {
                enc.write_u8(bin.op as u8);
                bin.left.write(enc);
                bin.right.write(enc);
            }
            ExprNode::Unary(un) => {
                enc.write_u8(un.op as u8);
                un.operand.write(enc);
            }
            ExprNode::Call(call) => {
                call.callee.write(enc);
                enc.write_seq(&call.args);
            }
            ExprNode::MemberAccess(access) => {
                access.object.write(enc);
                enc.write_str(&access.member);
                enc.write_bool(access.unsafe_access);
            }
            ExprNode::Cast(cast) => {
                cast.expr.write(enc);
                cast.target.write(enc);
            }
            ExprNode::New(new) => {
                new.ty.write(enc);
                enc.write_seq(&new.args);
            }
        }
    }

    fn read(dec: &mut Decoder<'_>) -> CodecResult<Self> {
        dec.nested(read_expr)
    }
}

fn read_expr(dec: &mut Decoder<'_>) -> CodecResult<Expr> {
    let loc = dec.read_loc()?;
    let kind = dec.read_tag("expression kind", expr_kind_from_tag)?;
    let node = match kind {
        ExprKind::NumberLit => ExprNode::NumberLit(NumericValue::read(dec)?),
        ExprKind::BoolLit => ExprNode::BoolLit(dec.read_bool()?),
        ExprKind::Var => ExprNode::Var(dec.read_string()?),
        ExprKind::Binary => {
            let op = dec.read_tag("binary operator", binary_op_from_tag)?;
            let left = Expr::read(dec)?;
            let right = Expr::read(dec)?;
            ExprNode::Binary(Box::new(BinaryExpr { op, left, right }))
        }
        ExprKind::Unary => {
            let op = dec.read_tag("unary operator", unary_op_from_tag)?;
            let operand = Expr::read(dec)?;
            ExprNode::Unary(Box::new(UnaryExpr { op, operand }))
        }
        ExprKind::FuncCall => {
            let callee = Expr::read(dec)?;
            let args = dec.read_seq()?;
            ExprNode::Call(Box::new(CallExpr { callee, args }))
        }
        ExprKind::MemberAccess => {
            let object = Expr::read(dec)?;
            let member = dec.read_string()?;
            let unsafe_access = dec.read_bool()?;
            ExprNode::MemberAccess(Box::new(MemberAccessExpr {
                object,
                member,
                unsafe_access,
            }))
        }
        ExprKind::Cast => {
            let expr = Expr::read(dec)?;
            let target = TypeExpr::read(dec)?;
            ExprNode::Cast(Box::new(CastExpr { expr, target }))
        }
        ExprKind::New => {
            let ty = TypeExpr::read(dec)?;
            let args = dec.read_seq()?;
            ExprNode::New(Box::new(NewExpr { ty, args }))
        }
    };
    Ok(Expr { node, loc })
}

// ---------------------------------------------------------------------------
// Statements

impl Persist for Stmt {
    fn write(&self, enc: &mut Encoder) {
        enc.write_header(NodeCategory::Statement, self.loc());
        enc.write_u8(self.kind() as u8);
        match self {
            Stmt::Expr(s) => s.expr.write(enc),
            Stmt::Compound(s) => enc.write_seq(&s.stmts),
            Stmt::If(s) => {
                s.cond.write(enc);
                s.then_branch.write(enc);
                enc.write_opt(s.else_branch.as_ref());
            }
            Stmt::While(s) => {
                s.cond.write(enc);
                s.body.write(enc);
            }
            Stmt::For(s) => {
                enc.write_opt(s.init.as_ref());
                enc.write_opt(s.cond.as_ref());
                enc.write_opt(s.step.as_ref());
                s.body.write(enc);
            }
            Stmt::Foreach(s) => {
                s.var.write(enc);
                s.iterable.write(enc);
                s.body.write(enc);
            }
            Stmt::Return(s) => enc.write_opt(s.value.as_ref()),
            Stmt::Break(_) | Stmt::Continue(_) => {}
            Stmt::Import(s) => enc.write_str(&s.module),
            // The declaration carries its own header.
            Stmt::Decl(decl) => decl.write(enc),
        }
    }

    fn read(dec: &mut Decoder<'_>) -> CodecResult<Self> {
        let loc = dec.expect_header(NodeCategory::Statement)?;
        read_stmt_body(dec, loc)
    }
}

fn read_stmt_body(dec: &mut Decoder<'_>, loc: SourceLoc) -> CodecResult<Stmt> {
    dec.nested(|dec| read_stmt_kind(dec, loc))
}

fn read_stmt_kind(dec: &mut Decoder<'_>, loc: SourceLoc) -> CodecResult<Stmt> {
    let kind = dec.read_tag("statement kind", stmt_kind_from_tag)?;
    Ok(match kind {
        StmtKind::Expression => Stmt::Expr(ExprStmt {
            expr: Expr::read(dec)?,
            loc,
        }),
        StmtKind::Compound => Stmt::Compound(CompoundStmt {
            stmts: dec.read_seq()?,
            loc,
        }),
        StmtKind::If => {
            let cond = Expr::read(dec)?;
            let then_branch = Stmt::read(dec)?;
            let else_branch = dec.read_opt()?;
            Stmt::If(Box::new(IfStmt {
                cond,
                then_branch,
                else_branch,
                loc,
            }))
        }
        StmtKind::While => {
            let cond = Expr::read(dec)?;
            let body = Stmt::read(dec)?;
            Stmt::While(Box::new(WhileStmt { cond, body, loc }))
        }
        StmtKind::For => {
            let init = dec.read_opt()?;
            let cond = dec.read_opt()?;
            let step = dec.read_opt()?;
            let body = Stmt::read(dec)?;
            Stmt::For(Box::new(ForStmt {
                init,
                cond,
                step,
                body,
                loc,
            }))
        }
        StmtKind::Foreach => {
            let var = VarDecl::read(dec)?;
            let iterable = Expr::read(dec)?;
            let body = Stmt::read(dec)?;
            Stmt::Foreach(Box::new(ForeachStmt {
                var,
                iterable,
                body,
                loc,
            }))
        }
        StmtKind::Return => Stmt::Return(ReturnStmt {
            value: dec.read_opt()?,
            loc,
        }),
        StmtKind::Break => Stmt::Break(loc),
        StmtKind::Continue => Stmt::Continue(loc),
        StmtKind::Import => Stmt::Import(ImportStmt {
            module: dec.read_string()?,
            loc,
        }),
        StmtKind::Decl => Stmt::Decl(Box::new(Decl::read(dec)?)),
    })
}

// ---------------------------------------------------------------------------
// Declarations

impl Persist for Attribute {
    fn write(&self, enc: &mut Encoder) {
        enc.write_loc(&self.loc);
        enc.write_str(&self.name);
        enc.write_seq(&self.args);
    }

    fn read(dec: &mut Decoder<'_>) -> CodecResult<Self> {
        let loc = dec.read_loc()?;
        let name = dec.read_string()?;
        let args = dec.read_seq()?;
        Ok(Attribute { name, args, loc })
    }
}

impl Persist for DeclMeta {
    fn write(&self, enc: &mut Encoder) {
        enc.write_u8(self.modifiers.bits());
        enc.write_seq(&self.attributes);
    }

    fn read(dec: &mut Decoder<'_>) -> CodecResult<Self> {
        Ok(DeclMeta {
            modifiers: Modifiers::from_bits(dec.read_u8()?),
            attributes: dec.read_seq()?,
        })
    }
}

impl Persist for Decl {
    fn write(&self, enc: &mut Encoder) {
        match self {
            Decl::Var(d) => d.write(enc),
            Decl::Func(d) => d.write(enc),
            Decl::Class(d) => d.write(enc),
            Decl::Field(d) => d.write(enc),
            Decl::Struct(d) => d.write(enc),
            Decl::Module(d) => d.write(enc),
            Decl::Interface(d) => d.write(enc),
            Decl::Enum(d) => d.write(enc),
            Decl::TopLevel(d) => d.write(enc),
        }
    }

    fn read(dec: &mut Decoder<'_>) -> CodecResult<Self> {
        let loc = dec.expect_header(NodeCategory::Declaration)?;
        read_decl_body(dec, loc)
    }
}

fn read_decl_body(dec: &mut Decoder<'_>, loc: SourceLoc) -> CodecResult<Decl> {
    dec.nested(|dec| read_decl_kind(dec, loc))
}

fn read_decl_kind(dec: &mut Decoder<'_>, loc: SourceLoc) -> CodecResult<Decl> {
    let kind = dec.read_tag("declaration kind", decl_kind_from_tag)?;
    Ok(match kind {
        DeclKind::Var => Decl::Var(VarDecl::read_fields(dec, loc)?),
        DeclKind::Func => Decl::Func(FuncDecl::read_fields(dec, loc)?),
        DeclKind::Class => Decl::Class(ClassDecl::read_fields(dec, loc)?),
        DeclKind::Field => Decl::Field(FieldDecl::read_fields(dec, loc)?),
        DeclKind::Struct => Decl::Struct(StructDecl::read_fields(dec, loc)?),
        DeclKind::Module => Decl::Module(ModuleDecl::read_fields(dec, loc)?),
        DeclKind::Interface => Decl::Interface(InterfaceDecl::read_fields(dec, loc)?),
        DeclKind::Enum => Decl::Enum(EnumDecl::read_fields(dec, loc)?),
        DeclKind::TopLevelDecls => Decl::TopLevel(TopLevelDecls::read_fields(dec, loc)?),
    })
}

/// Implements [`Persist`] for a declaration struct in terms of its
/// `write_fields`/`read_fields`, framing it with the declaration header.
macro_rules! persist_decl {
    ($ty:ty, $kind:expr) => {
        impl Persist for $ty {
            fn write(&self, enc: &mut Encoder) {
                enc.write_header(NodeCategory::Declaration, &self.loc);
                enc.write_u8($kind as u8);
                self.write_fields(enc);
            }

            fn read(dec: &mut Decoder<'_>) -> CodecResult<Self> {
                let loc = dec.expect_decl($kind)?;
                Self::read_fields(dec, loc)
            }
        }
    };
}

persist_decl!(VarDecl, DeclKind::Var);
persist_decl!(FuncDecl, DeclKind::Func);
persist_decl!(ClassDecl, DeclKind::Class);
persist_decl!(FieldDecl, DeclKind::Field);
persist_decl!(StructDecl, DeclKind::Struct);
persist_decl!(ModuleDecl, DeclKind::Module);
persist_decl!(InterfaceDecl, DeclKind::Interface);
persist_decl!(EnumDecl, DeclKind::Enum);
persist_decl!(TopLevelDecls, DeclKind::TopLevelDecls);

impl VarDecl {
    fn write_fields(&self, enc: &mut Encoder) {
        enc.write_str(&self.name);
        self.meta.write(enc);
        enc.write_bool(self.mutable);
        enc.write_opt(self.ty.as_ref());
        enc.write_opt(self.init.as_ref());
    }

    fn read_fields(dec: &mut Decoder<'_>, loc: SourceLoc) -> CodecResult<Self> {
        Ok(VarDecl {
            name: dec.read_string()?,
            meta: DeclMeta::read(dec)?,
            mutable: dec.read_bool()?,
            ty: dec.read_opt()?,
            init: dec.read_opt()?,
            loc,
        })
    }
}

impl FuncDecl {
    fn write_fields(&self, enc: &mut Encoder) {
        enc.write_str(&self.name);
        self.meta.write(enc);
        enc.write_u8(self.kind as u8);
        enc.write_seq(&self.args);
        enc.write_opt(self.return_type.as_ref());
        match &self.body {
            Some(body) => {
                enc.write_u8(1);
                enc.write_seq(body);
            }
            None => enc.write_u8(0),
        }
    }

    fn read_fields(dec: &mut Decoder<'_>, loc: SourceLoc) -> CodecResult<Self> {
        let name = dec.read_string()?;
        let meta = DeclMeta::read(dec)?;
        let kind = dec.read_tag("function kind", func_kind_from_tag)?;
        let args = dec.read_seq()?;
        let return_type = dec.read_opt()?;
        let body = if dec.read_bool()? {
            Some(dec.read_seq()?)
        } else {
            None
        };
        Ok(FuncDecl {
            name,
            kind,
            args,
            return_type,
            body,
            meta,
            loc,
        })
    }
}

impl FieldDecl {
    fn write_fields(&self, enc: &mut Encoder) {
        enc.write_str(&self.name);
        self.meta.write(enc);
        enc.write_opt(self.ty.as_ref());
        enc.write_opt(self.init.as_ref());
        enc.write_opt_str(self.getter.as_deref());
        enc.write_opt_str(self.setter.as_deref());
    }

    fn read_fields(dec: &mut Decoder<'_>, loc: SourceLoc) -> CodecResult<Self> {
        Ok(FieldDecl {
            name: dec.read_string()?,
            meta: DeclMeta::read(dec)?,
            ty: dec.read_opt()?,
            init: dec.read_opt()?,
            getter: dec.read_opt_string()?,
            setter: dec.read_opt_string()?,
            loc,
        })
    }
}

impl ClassDecl {
    fn write_fields(&self, enc: &mut Encoder) {
        enc.write_str(&self.name);
        self.meta.write(enc);
        enc.write_bool(self.forward);
        enc.write_seq(&self.bases);
        enc.write_seq(&self.sub_types);
        enc.write_seq(&self.fields);
        enc.write_seq(&self.variables);
        enc.write_seq(&self.functions);
        enc.write_seq(&self.ctors);
        enc.write_opt(self.dtor.as_ref());
    }

    fn read_fields(dec: &mut Decoder<'_>, loc: SourceLoc) -> CodecResult<Self> {
        Ok(ClassDecl {
            name: dec.read_string()?,
            meta: DeclMeta::read(dec)?,
            forward: dec.read_bool()?,
            bases: dec.read_seq()?,
            sub_types: dec.read_seq()?,
            fields: dec.read_seq()?,
            variables: dec.read_seq()?,
            functions: dec.read_seq()?,
            ctors: dec.read_seq()?,
            dtor: dec.read_opt()?,
            loc,
        })
    }
}

impl StructDecl {
    fn write_fields(&self, enc: &mut Encoder) {
        enc.write_str(&self.name);
        self.meta.write(enc);
        enc.write_seq(&self.variables);
        enc.write_seq(&self.fields);
    }

    fn read_fields(dec: &mut Decoder<'_>, loc: SourceLoc) -> CodecResult<Self> {
        Ok(StructDecl {
            name: dec.read_string()?,
            meta: DeclMeta::read(dec)?,
            variables: dec.read_seq()?,
            fields: dec.read_seq()?,
            loc,
        })
    }
}

impl ModuleDecl {
    fn write_fields(&self, enc: &mut Encoder) {
        enc.write_str(&self.name);
        self.meta.write(enc);
        enc.write_bool(self.scoped);
        self.body.write(enc);
    }

    fn read_fields(dec: &mut Decoder<'_>, loc: SourceLoc) -> CodecResult<Self> {
        Ok(ModuleDecl {
            name: dec.read_string()?,
            meta: DeclMeta::read(dec)?,
            scoped: dec.read_bool()?,
            body: TopLevelDecls::read(dec)?,
            loc,
        })
    }
}

impl InterfaceDecl {
    fn write_fields(&self, enc: &mut Encoder) {
        enc.write_str(&self.name);
        self.meta.write(enc);
        enc.write_seq(&self.functions);
    }

    fn read_fields(dec: &mut Decoder<'_>, loc: SourceLoc) -> CodecResult<Self> {
        Ok(InterfaceDecl {
            name: dec.read_string()?,
            meta: DeclMeta::read(dec)?,
            functions: dec.read_seq()?,
            loc,
        })
    }
}

impl EnumDecl {
    fn write_fields(&self, enc: &mut Encoder) {
        enc.write_str(&self.name);
        self.meta.write(enc);
        enc.write_opt(self.base.as_ref());
        enc.write_seq(&self.entries);
    }

    fn read_fields(dec: &mut Decoder<'_>, loc: SourceLoc) -> CodecResult<Self> {
        Ok(EnumDecl {
            name: dec.read_string()?,
            meta: DeclMeta::read(dec)?,
            base: dec.read_opt()?,
            entries: dec.read_seq()?,
            loc,
        })
    }
}

impl TopLevelDecls {
    fn write_fields(&self, enc: &mut Encoder) {
        enc.write_seq(&self.decls);
    }

    fn read_fields(dec: &mut Decoder<'_>, loc: SourceLoc) -> CodecResult<Self> {
        Ok(TopLevelDecls {
            decls: dec.read_seq()?,
            loc,
        })
    }
}
