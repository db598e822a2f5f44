// src/ast.rs

use std::fmt;
use std::sync::Arc;

use crate::source::SourceLoc;

/// Top-level classification every node carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NodeCategory {
    Statement = 0,
    Declaration = 1,
    Type = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StmtKind {
    Expression = 0,
    Compound = 1,
    If = 2,
    While = 3,
    For = 4,
    Foreach = 5,
    Return = 6,
    Break = 7,
    Continue = 8,
    Import = 9,
    Decl = 10,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DeclKind {
    Var = 0,
    Func = 1,
    Class = 2,
    Field = 3,
    Struct = 4,
    Module = 5,
    Interface = 6,
    Enum = 7,
    TopLevelDecls = 8,
}

impl DeclKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclKind::Var => "variable",
            DeclKind::Func => "function",
            DeclKind::Class => "class",
            DeclKind::Field => "field",
            DeclKind::Struct => "struct",
            DeclKind::Module => "module",
            DeclKind::Interface => "interface",
            DeclKind::Enum => "enum",
            DeclKind::TopLevelDecls => "top-level",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExprKind {
    NumberLit = 0,
    BoolLit = 1,
    Binary = 2,
    Unary = 3,
    FuncCall = 4,
    MemberAccess = 5,
    Var = 6,
    Cast = 7,
    New = 8,
}

// ---------------------------------------------------------------------------
// Parse result

/// Everything parsed from one source file, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFile {
    pub file: Option<Arc<str>>,
    pub nodes: Vec<Node>,
}

impl ParsedFile {
    pub fn imports(&self) -> impl Iterator<Item = &ImportStmt> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Stmt(Stmt::Import(import)) => Some(import),
            _ => None,
        })
    }

    pub fn decls(&self) -> impl Iterator<Item = &Decl> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Decl(decl) => Some(decl),
            _ => None,
        })
    }
}

/// Any node that can stand on its own in a parse result.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Stmt(Stmt),
    Decl(Decl),
    Type(TypeExpr),
}

impl Node {
    pub fn category(&self) -> NodeCategory {
        match self {
            Node::Stmt(_) => NodeCategory::Statement,
            Node::Decl(_) => NodeCategory::Declaration,
            Node::Type(_) => NodeCategory::Type,
        }
    }

    pub fn loc(&self) -> &SourceLoc {
        match self {
            Node::Stmt(stmt) => stmt.loc(),
            Node::Decl(decl) => decl.loc(),
            Node::Type(ty) => &ty.loc,
        }
    }
}

// ---------------------------------------------------------------------------
// Modifiers and attributes

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Static,
    Final,
    Const,
    Private,
    Protected,
    Internal,
    Inline,
    Export,
}

impl Modifier {
    pub const ALL: [Modifier; 8] = [
        Modifier::Static,
        Modifier::Final,
        Modifier::Const,
        Modifier::Private,
        Modifier::Protected,
        Modifier::Internal,
        Modifier::Inline,
        Modifier::Export,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Const => "const",
            Modifier::Private => "private",
            Modifier::Protected => "protected",
            Modifier::Internal => "internal",
            Modifier::Inline => "inline",
            Modifier::Export => "export",
        }
    }
}

/// Independent declaration flags; no combination is exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub fn contains(self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    /// Set a flag, returning false if it was already set.
    pub fn insert(&mut self, modifier: Modifier) -> bool {
        let fresh = !self.contains(modifier);
        self.0 |= modifier.bit();
        fresh
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn iter(self) -> impl Iterator<Item = Modifier> {
        Modifier::ALL.into_iter().filter(move |m| self.contains(*m))
    }

    pub fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, modifier) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(modifier.as_str())?;
        }
        Ok(())
    }
}

/// `[name(args)]` annotation on a declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub args: Vec<Expr>,
    pub loc: SourceLoc,
}

/// Modifiers and attributes collected before a declaration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclMeta {
    pub modifiers: Modifiers,
    pub attributes: Vec<Attribute>,
}

impl DeclMeta {
    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty() && self.attributes.is_empty()
    }

    /// Merge `outer` (collected earlier) into this meta, outer attributes first.
    pub fn absorb(&mut self, outer: DeclMeta) {
        self.modifiers = self.modifiers.union(outer.modifiers);
        let inner = std::mem::replace(&mut self.attributes, outer.attributes);
        self.attributes.extend(inner);
    }
}

// ---------------------------------------------------------------------------
// Types

/// A possibly module-qualified type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// Dotted qualifier, empty for unqualified names.
    pub module: String,
    pub name: String,
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.module.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.module, self.name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExprKind {
    Named(TypeRef),
    /// `T[]` (open-ended) or `T[2, 3]`.
    Array { element: TypeRef, sizes: Vec<u64> },
    Pointer(TypeRef),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub loc: SourceLoc,
}

impl TypeExpr {
    pub fn type_ref(&self) -> &TypeRef {
        match &self.kind {
            TypeExprKind::Named(ty) | TypeExprKind::Pointer(ty) => ty,
            TypeExprKind::Array { element, .. } => element,
        }
    }

    /// True for arrays written without any dimension sizes.
    pub fn is_open_ended(&self) -> bool {
        matches!(&self.kind, TypeExprKind::Array { sizes, .. } if sizes.is_empty())
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeExprKind::Named(ty) => write!(f, "{}", ty),
            TypeExprKind::Pointer(ty) => write!(f, "{}*", ty),
            TypeExprKind::Array { element, sizes } => {
                write!(f, "{}[", element)?;
                for (i, size) in sizes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", size)?;
                }
                f.write_str("]")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Expressions

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub node: ExprNode,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprNode {
    NumberLit(NumericValue),
    BoolLit(bool),
    Binary(Box<BinaryExpr>),
    Unary(Box<UnaryExpr>),
    Call(Box<CallExpr>),
    MemberAccess(Box<MemberAccessExpr>),
    Var(String),
    Cast(Box<CastExpr>),
    New(Box<NewExpr>),
}

impl Expr {
    pub fn new(node: ExprNode, loc: SourceLoc) -> Self {
        Self { node, loc }
    }

    pub fn kind(&self) -> ExprKind {
        match &self.node {
            ExprNode::NumberLit(_) => ExprKind::NumberLit,
            ExprNode::BoolLit(_) => ExprKind::BoolLit,
            ExprNode::Binary(_) => ExprKind::Binary,
            ExprNode::Unary(_) => ExprKind::Unary,
            ExprNode::Call(_) => ExprKind::FuncCall,
            ExprNode::MemberAccess(_) => ExprKind::MemberAccess,
            ExprNode::Var(_) => ExprKind::Var,
            ExprNode::Cast(_) => ExprKind::Cast,
            ExprNode::New(_) => ExprKind::New,
        }
    }
}

/// Value of a numeric literal, tagged with its literal type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl NumericValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            NumericValue::I8(_) => "i8",
            NumericValue::I16(_) => "i16",
            NumericValue::I32(_) => "i32",
            NumericValue::I64(_) => "i64",
            NumericValue::U8(_) => "u8",
            NumericValue::U16(_) => "u16",
            NumericValue::U32(_) => "u32",
            NumericValue::U64(_) => "u64",
            NumericValue::F32(_) => "f32",
            NumericValue::F64(_) => "f64",
        }
    }

    /// Narrowest of i32, i64 and u64 that holds `value`.
    pub fn from_integer(value: u64) -> Self {
        if let Ok(v) = i32::try_from(value) {
            NumericValue::I32(v)
        } else if let Ok(v) = i64::try_from(value) {
            NumericValue::I64(v)
        } else {
            NumericValue::U64(value)
        }
    }

    /// The value widened to i128, for integer kinds only.
    pub fn as_integer(&self) -> Option<i128> {
        match *self {
            NumericValue::I8(v) => Some(v.into()),
            NumericValue::I16(v) => Some(v.into()),
            NumericValue::I32(v) => Some(v.into()),
            NumericValue::I64(v) => Some(v.into()),
            NumericValue::U8(v) => Some(v.into()),
            NumericValue::U16(v) => Some(v.into()),
            NumericValue::U32(v) => Some(v.into()),
            NumericValue::U64(v) => Some(v.into()),
            NumericValue::F32(_) | NumericValue::F64(_) => None,
        }
    }
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericValue::I8(v) => write!(f, "{v}"),
            NumericValue::I16(v) => write!(f, "{v}"),
            NumericValue::I32(v) => write!(f, "{v}"),
            NumericValue::I64(v) => write!(f, "{v}"),
            NumericValue::U8(v) => write!(f, "{v}"),
            NumericValue::U16(v) => write!(f, "{v}"),
            NumericValue::U32(v) => write!(f, "{v}"),
            NumericValue::U64(v) => write!(f, "{v}"),
            NumericValue::F32(v) => write!(f, "{v:?}"),
            NumericValue::F64(v) => write!(f, "{v:?}"),
        }
    }
}

/// The discriminant is the persisted tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    ShlAssign,
    ShrAssign,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 29] = [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Mod,
        BinaryOp::Eq,
        BinaryOp::Ne,
        BinaryOp::Lt,
        BinaryOp::Gt,
        BinaryOp::Le,
        BinaryOp::Ge,
        BinaryOp::And,
        BinaryOp::Or,
        BinaryOp::BitAnd,
        BinaryOp::BitOr,
        BinaryOp::BitXor,
        BinaryOp::Shl,
        BinaryOp::Shr,
        BinaryOp::Assign,
        BinaryOp::AddAssign,
        BinaryOp::SubAssign,
        BinaryOp::MulAssign,
        BinaryOp::DivAssign,
        BinaryOp::ModAssign,
        BinaryOp::BitAndAssign,
        BinaryOp::BitOrAssign,
        BinaryOp::BitXorAssign,
        BinaryOp::ShlAssign,
        BinaryOp::ShrAssign,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Assign => "=",
            BinaryOp::AddAssign => "+=",
            BinaryOp::SubAssign => "-=",
            BinaryOp::MulAssign => "*=",
            BinaryOp::DivAssign => "/=",
            BinaryOp::ModAssign => "%=",
            BinaryOp::BitAndAssign => "&=",
            BinaryOp::BitOrAssign => "|=",
            BinaryOp::BitXorAssign => "^=",
            BinaryOp::ShlAssign => "<<=",
            BinaryOp::ShrAssign => ">>=",
        }
    }

    pub fn is_assignment(&self) -> bool {
        matches!(
            self,
            BinaryOp::Assign
                | BinaryOp::AddAssign
                | BinaryOp::SubAssign
                | BinaryOp::MulAssign
                | BinaryOp::DivAssign
                | BinaryOp::ModAssign
                | BinaryOp::BitAndAssign
                | BinaryOp::BitOrAssign
                | BinaryOp::BitXorAssign
                | BinaryOp::ShlAssign
                | BinaryOp::ShrAssign
        )
    }
}

/// The discriminant is the persisted tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum UnaryOp {
    Plus,
    Neg,
    Not,
    BitNot,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

impl UnaryOp {
    pub const ALL: [UnaryOp; 8] = [
        UnaryOp::Plus,
        UnaryOp::Neg,
        UnaryOp::Not,
        UnaryOp::BitNot,
        UnaryOp::PreInc,
        UnaryOp::PreDec,
        UnaryOp::PostInc,
        UnaryOp::PostDec,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::PreInc => "++ (prefix)",
            UnaryOp::PreDec => "-- (prefix)",
            UnaryOp::PostInc => "++ (postfix)",
            UnaryOp::PostDec => "-- (postfix)",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Expr,
    pub right: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Expr,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberAccessExpr {
    pub object: Expr,
    pub member: String,
    /// Accessed with `->` rather than `.`.
    pub unsafe_access: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CastExpr {
    pub expr: Expr,
    pub target: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExpr {
    pub ty: TypeExpr,
    pub args: Vec<Expr>,
}

// ---------------------------------------------------------------------------
// Statements

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(ExprStmt),
    Compound(CompoundStmt),
    If(Box<IfStmt>),
    While(Box<WhileStmt>),
    For(Box<ForStmt>),
    Foreach(Box<ForeachStmt>),
    Return(ReturnStmt),
    Break(SourceLoc),
    Continue(SourceLoc),
    Import(ImportStmt),
    Decl(Box<Decl>),
}

impl Stmt {
    pub fn kind(&self) -> StmtKind {
        match self {
            Stmt::Expr(_) => StmtKind::Expression,
            Stmt::Compound(_) => StmtKind::Compound,
            Stmt::If(_) => StmtKind::If,
            Stmt::While(_) => StmtKind::While,
            Stmt::For(_) => StmtKind::For,
            Stmt::Foreach(_) => StmtKind::Foreach,
            Stmt::Return(_) => StmtKind::Return,
            Stmt::Break(_) => StmtKind::Break,
            Stmt::Continue(_) => StmtKind::Continue,
            Stmt::Import(_) => StmtKind::Import,
            Stmt::Decl(_) => StmtKind::Decl,
        }
    }

    pub fn loc(&self) -> &SourceLoc {
        match self {
            Stmt::Expr(s) => &s.loc,
            Stmt::Compound(s) => &s.loc,
            Stmt::If(s) => &s.loc,
            Stmt::While(s) => &s.loc,
            Stmt::For(s) => &s.loc,
            Stmt::Foreach(s) => &s.loc,
            Stmt::Return(s) => &s.loc,
            Stmt::Break(loc) | Stmt::Continue(loc) => loc,
            Stmt::Import(s) => &s.loc,
            Stmt::Decl(decl) => decl.loc(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompoundStmt {
    pub stmts: Vec<Stmt>,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_branch: Stmt,
    pub else_branch: Option<Stmt>,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Stmt,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<Stmt>,
    pub cond: Option<Expr>,
    pub step: Option<Expr>,
    pub body: Stmt,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeachStmt {
    pub var: VarDecl,
    pub iterable: Expr,
    pub body: Stmt,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportStmt {
    /// Dotted module path, e.g. `std.io`.
    pub module: String,
    pub loc: SourceLoc,
}

// ---------------------------------------------------------------------------
// Declarations

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Var(VarDecl),
    Func(FuncDecl),
    Class(ClassDecl),
    Field(FieldDecl),
    Struct(StructDecl),
    Module(ModuleDecl),
    Interface(InterfaceDecl),
    Enum(EnumDecl),
    TopLevel(TopLevelDecls),
}

impl Decl {
    pub fn kind(&self) -> DeclKind {
        match self {
            Decl::Var(_) => DeclKind::Var,
            Decl::Func(_) => DeclKind::Func,
            Decl::Class(_) => DeclKind::Class,
            Decl::Field(_) => DeclKind::Field,
            Decl::Struct(_) => DeclKind::Struct,
            Decl::Module(_) => DeclKind::Module,
            Decl::Interface(_) => DeclKind::Interface,
            Decl::Enum(_) => DeclKind::Enum,
            Decl::TopLevel(_) => DeclKind::TopLevelDecls,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Decl::Var(d) => Some(&d.name),
            Decl::Func(d) => Some(&d.name),
            Decl::Class(d) => Some(&d.name),
            Decl::Field(d) => Some(&d.name),
            Decl::Struct(d) => Some(&d.name),
            Decl::Module(d) => Some(&d.name),
            Decl::Interface(d) => Some(&d.name),
            Decl::Enum(d) => Some(&d.name),
            Decl::TopLevel(_) => None,
        }
    }

    pub fn loc(&self) -> &SourceLoc {
        match self {
            Decl::Var(d) => &d.loc,
            Decl::Func(d) => &d.loc,
            Decl::Class(d) => &d.loc,
            Decl::Field(d) => &d.loc,
            Decl::Struct(d) => &d.loc,
            Decl::Module(d) => &d.loc,
            Decl::Interface(d) => &d.loc,
            Decl::Enum(d) => &d.loc,
            Decl::TopLevel(d) => &d.loc,
        }
    }

    /// Modifiers and attributes; `TopLevelDecls` has none.
    pub fn meta(&self) -> Option<&DeclMeta> {
        match self {
            Decl::Var(d) => Some(&d.meta),
            Decl::Func(d) => Some(&d.meta),
            Decl::Class(d) => Some(&d.meta),
            Decl::Field(d) => Some(&d.meta),
            Decl::Struct(d) => Some(&d.meta),
            Decl::Module(d) => Some(&d.meta),
            Decl::Interface(d) => Some(&d.meta),
            Decl::Enum(d) => Some(&d.meta),
            Decl::TopLevel(_) => None,
        }
    }

    pub fn meta_mut(&mut self) -> Option<&mut DeclMeta> {
        match self {
            Decl::Var(d) => Some(&mut d.meta),
            Decl::Func(d) => Some(&mut d.meta),
            Decl::Class(d) => Some(&mut d.meta),
            Decl::Field(d) => Some(&mut d.meta),
            Decl::Struct(d) => Some(&mut d.meta),
            Decl::Module(d) => Some(&mut d.meta),
            Decl::Interface(d) => Some(&mut d.meta),
            Decl::Enum(d) => Some(&mut d.meta),
            Decl::TopLevel(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: String,
    pub ty: Option<TypeExpr>,
    pub init: Option<Expr>,
    /// `var` is mutable, `val` is not.
    pub mutable: bool,
    pub meta: DeclMeta,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FuncKind {
    Function = 0,
    Ctor = 1,
    Dtor = 2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    pub kind: FuncKind,
    pub args: Vec<VarDecl>,
    pub return_type: Option<TypeExpr>,
    /// `None` for a declaration without a body.
    pub body: Option<Vec<Stmt>>,
    pub meta: DeclMeta,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: Option<TypeExpr>,
    pub init: Option<Expr>,
    pub getter: Option<String>,
    pub setter: Option<String>,
    pub meta: DeclMeta,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub bases: Vec<TypeExpr>,
    /// Nested classes, structs, interfaces and enums.
    pub sub_types: Vec<Decl>,
    pub fields: Vec<FieldDecl>,
    pub variables: Vec<VarDecl>,
    pub functions: Vec<FuncDecl>,
    pub ctors: Vec<FuncDecl>,
    pub dtor: Option<FuncDecl>,
    /// `class Name;` with no body.
    pub forward: bool,
    pub meta: DeclMeta,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub name: String,
    pub variables: Vec<VarDecl>,
    pub fields: Vec<FieldDecl>,
    pub meta: DeclMeta,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub name: String,
    pub functions: Vec<FuncDecl>,
    pub meta: DeclMeta,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub base: Option<TypeExpr>,
    /// Enumerators; `init` is the explicit value, if any.
    pub entries: Vec<VarDecl>,
    pub meta: DeclMeta,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDecl {
    pub name: String,
    /// `module a { ... }` rather than `module a;`.
    pub scoped: bool,
    pub body: TopLevelDecls,
    pub meta: DeclMeta,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopLevelDecls {
    pub decls: Vec<Decl>,
    pub loc: SourceLoc,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> TypeRef {
        TypeRef {
            module: String::new(),
            name: name.to_string(),
        }
    }

    #[test]
    fn modifiers_are_independent_flags() {
        let mut mods = Modifiers::default();
        assert!(mods.insert(Modifier::Static));
        assert!(mods.insert(Modifier::Private));
        assert!(!mods.insert(Modifier::Static));
        assert!(mods.contains(Modifier::Private));
        assert!(!mods.contains(Modifier::Const));
        assert_eq!(mods.to_string(), "static private");
    }

    #[test]
    fn numeric_literals_pick_narrowest_integer_type() {
        assert_eq!(NumericValue::from_integer(1), NumericValue::I32(1));
        assert_eq!(
            NumericValue::from_integer(1 << 40),
            NumericValue::I64(1 << 40)
        );
        assert_eq!(
            NumericValue::from_integer(u64::MAX),
            NumericValue::U64(u64::MAX)
        );
    }

    #[test]
    fn open_ended_arrays_have_no_sizes() {
        let loc = SourceLoc::default();
        let open = TypeExpr {
            kind: TypeExprKind::Array {
                element: named("int"),
                sizes: vec![],
            },
            loc: loc.clone(),
        };
        let sized = TypeExpr {
            kind: TypeExprKind::Array {
                element: named("int"),
                sizes: vec![2, 3],
            },
            loc,
        };
        assert!(open.is_open_ended());
        assert!(!sized.is_open_ended());
        assert_eq!(open.to_string(), "int[]");
        assert_eq!(sized.to_string(), "int[2, 3]");
    }

    #[test]
    fn meta_absorb_puts_outer_attributes_first() {
        let loc = SourceLoc::default();
        let attr = |name: &str| Attribute {
            name: name.to_string(),
            args: vec![],
            loc: loc.clone(),
        };
        let mut inner = DeclMeta {
            modifiers: Modifiers::default(),
            attributes: vec![attr("inner")],
        };
        let mut outer_mods = Modifiers::default();
        outer_mods.insert(Modifier::Static);
        inner.absorb(DeclMeta {
            modifiers: outer_mods,
            attributes: vec![attr("outer")],
        });

        assert!(inner.modifiers.contains(Modifier::Static));
        let names: Vec<_> = inner.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["outer", "inner"]);
    }
}
