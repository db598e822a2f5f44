// src/ast_display.rs
//! Indented debug dump of AST nodes.
//!
//! Every node prints as a head line `Kind: field = value`, followed by its
//! remaining fields as `field = value` lines and its children two spaces
//! deeper.

use std::fmt::{self, Write};

use crate::ast::*;
use crate::source::SourceLoc;

/// Pretty-printer for AST nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AstPrinter {
    indent: usize,
    locations: bool,
}

impl AstPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append ` @ line:col` to every node's head line.
    pub fn with_locations(mut self, locations: bool) -> Self {
        self.locations = locations;
        self
    }

    /// Print a whole parse result to a String.
    pub fn print_file(&self, file: &ParsedFile) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = self.write_file(&mut out, file);
        out
    }

    pub fn print_node(&self, node: &Node) -> String {
        let mut out = String::new();
        let _ = self.write_node(&mut out, node);
        out
    }

    pub fn print_decl(&self, decl: &Decl) -> String {
        let mut out = String::new();
        let _ = self.write_decl(&mut out, decl);
        out
    }

    pub fn print_stmt(&self, stmt: &Stmt) -> String {
        let mut out = String::new();
        let _ = self.write_stmt(&mut out, stmt);
        out
    }

    pub fn print_expr(&self, expr: &Expr) -> String {
        let mut out = String::new();
        let _ = self.write_expr(&mut out, expr);
        out
    }

    fn write_indent(&self, out: &mut String) {
        for _ in 0..self.indent {
            out.push_str("  ");
        }
    }

    fn indented(&self) -> Self {
        Self {
            indent: self.indent + 1,
            locations: self.locations,
        }
    }

    /// Head line of a node.
    fn head(&self, out: &mut String, text: fmt::Arguments<'_>, loc: &SourceLoc) -> fmt::Result {
        self.write_indent(out);
        out.write_fmt(text)?;
        if self.locations {
            write!(out, " @ {}:{}", loc.line, loc.column)?;
        }
        out.push('\n');
        Ok(())
    }

    /// A `name = value` line.
    fn field(&self, out: &mut String, name: &str, value: impl fmt::Display) -> fmt::Result {
        self.write_indent(out);
        writeln!(out, "{} = {}", name, value)
    }

    /// A `name:` line introducing nested children.
    fn label(&self, out: &mut String, name: &str) -> fmt::Result {
        self.write_indent(out);
        writeln!(out, "{}:", name)
    }

    fn write_file(&self, out: &mut String, file: &ParsedFile) -> fmt::Result {
        self.write_indent(out);
        match &file.file {
            Some(path) => writeln!(out, "ParsedFile \"{}\"", path)?,
            None => out.push_str("ParsedFile\n"),
        }
        let inner = self.indented();
        for node in &file.nodes {
            inner.write_node(out, node)?;
        }
        Ok(())
    }

    fn write_node(&self, out: &mut String, node: &Node) -> fmt::Result {
        match node {
            Node::Stmt(stmt) => self.write_stmt(out, stmt),
            Node::Decl(decl) => self.write_decl(out, decl),
            Node::Type(ty) => self.head(out, format_args!("Type: {}", ty), &ty.loc),
        }
    }

    fn write_meta(&self, out: &mut String, meta: &DeclMeta) -> fmt::Result {
        if !meta.modifiers.is_empty() {
            self.field(out, "modifiers", meta.modifiers)?;
        }
        for attr in &meta.attributes {
            self.head(out, format_args!("Attribute: name = {}", attr.name), &attr.loc)?;
            let inner = self.indented();
            for arg in &attr.args {
                inner.write_expr(out, arg)?;
            }
        }
        Ok(())
    }

    fn write_decl(&self, out: &mut String, decl: &Decl) -> fmt::Result {
        match decl {
            Decl::Var(var) => self.write_var(out, var),
            Decl::Func(func) => self.write_func(out, func),
            Decl::Class(class) => self.write_class(out, class),
            Decl::Field(field) => self.write_field(out, field),
            Decl::Struct(s) => {
                self.head(out, format_args!("StructDecl: name = {}", s.name), &s.loc)?;
                let inner = self.indented();
                inner.write_meta(out, &s.meta)?;
                for field in &s.fields {
                    inner.write_field(out, field)?;
                }
                for var in &s.variables {
                    inner.write_var(out, var)?;
                }
                Ok(())
            }
            Decl::Interface(i) => {
                self.head(out, format_args!("InterfaceDecl: name = {}", i.name), &i.loc)?;
                let inner = self.indented();
                inner.write_meta(out, &i.meta)?;
                for func in &i.functions {
                    inner.write_func(out, func)?;
                }
                Ok(())
            }
            Decl::Enum(e) => {
                self.head(out, format_args!("EnumDecl: name = {}", e.name), &e.loc)?;
                let inner = self.indented();
                inner.write_meta(out, &e.meta)?;
                if let Some(base) = &e.base {
                    inner.field(out, "base", base)?;
                }
                for entry in &e.entries {
                    inner.head(out, format_args!("Enumerator: name = {}", entry.name), &entry.loc)?;
                    if let Some(init) = &entry.init {
                        inner.indented().write_expr(out, init)?;
                    }
                }
                Ok(())
            }
            Decl::Module(m) => {
                self.head(out, format_args!("ModuleDecl: name = {}", m.name), &m.loc)?;
                let inner = self.indented();
                inner.write_meta(out, &m.meta)?;
                inner.field(out, "scoped", m.scoped)?;
                inner.write_top_level(out, &m.body)
            }
            Decl::TopLevel(top) => self.write_top_level(out, top),
        }
    }

    fn write_top_level(&self, out: &mut String, top: &TopLevelDecls) -> fmt::Result {
        self.head(out, format_args!("TopLevelDecls"), &top.loc)?;
        let inner = self.indented();
        for decl in &top.decls {
            inner.write_decl(out, decl)?;
        }
        Ok(())
    }

    fn write_var(&self, out: &mut String, var: &VarDecl) -> fmt::Result {
        self.head(out, format_args!("VarDecl: name = {}", var.name), &var.loc)?;
        let inner = self.indented();
        inner.write_meta(out, &var.meta)?;
        inner.field(out, "mutable", var.mutable)?;
        if let Some(ty) = &var.ty {
            inner.field(out, "type", ty)?;
        }
        if let Some(init) = &var.init {
            inner.label(out, "init")?;
            inner.indented().write_expr(out, init)?;
        }
        Ok(())
    }

    fn write_func(&self, out: &mut String, func: &FuncDecl) -> fmt::Result {
        let kind = match func.kind {
            FuncKind::Function => "FuncDecl",
            FuncKind::Ctor => "CtorDecl",
            FuncKind::Dtor => "DtorDecl",
        };
        self.head(out, format_args!("{}: name = {}", kind, func.name), &func.loc)?;
        let inner = self.indented();
        inner.write_meta(out, &func.meta)?;
        if !func.args.is_empty() {
            inner.label(out, "args")?;
            let args = inner.indented();
            for arg in &func.args {
                args.write_var(out, arg)?;
            }
        }
        if let Some(ret) = &func.return_type {
            inner.field(out, "return_type", ret)?;
        }
        match &func.body {
            Some(body) => {
                inner.label(out, "body")?;
                let stmts = inner.indented();
                for stmt in body {
                    stmts.write_stmt(out, stmt)?;
                }
            }
            None => inner.field(out, "body", "none")?,
        }
        Ok(())
    }

    fn write_field(&self, out: &mut String, field: &FieldDecl) -> fmt::Result {
        self.head(out, format_args!("FieldDecl: name = {}", field.name), &field.loc)?;
        let inner = self.indented();
        inner.write_meta(out, &field.meta)?;
        if let Some(ty) = &field.ty {
            inner.field(out, "type", ty)?;
        }
        if let Some(getter) = &field.getter {
            inner.field(out, "getter", getter)?;
        }
        if let Some(setter) = &field.setter {
            inner.field(out, "setter", setter)?;
        }
        if let Some(init) = &field.init {
            inner.label(out, "init")?;
            inner.indented().write_expr(out, init)?;
        }
        Ok(())
    }

    fn write_class(&self, out: &mut String, class: &ClassDecl) -> fmt::Result {
        self.head(out, format_args!("ClassDecl: name = {}", class.name), &class.loc)?;
        let inner = self.indented();
        inner.write_meta(out, &class.meta)?;
        if class.forward {
            inner.field(out, "forward", true)?;
        }
        for base in &class.bases {
            inner.field(out, "base", base)?;
        }
        for sub in &class.sub_types {
            inner.write_decl(out, sub)?;
        }
        for field in &class.fields {
            inner.write_field(out, field)?;
        }
        for var in &class.variables {
            inner.write_var(out, var)?;
        }
        for ctor in &class.ctors {
            inner.write_func(out, ctor)?;
        }
        if let Some(dtor) = &class.dtor {
            inner.write_func(out, dtor)?;
        }
        for func in &class.functions {
            inner.write_func(out, func)?;
        }
        Ok(())
    }

    fn write_stmt(&self, out: &mut String, stmt: &Stmt) -> fmt::Result {
        match stmt {
            Stmt::Expr(s) => {
                self.head(out, format_args!("ExprStmt"), &s.loc)?;
                self.indented().write_expr(out, &s.expr)
            }
            Stmt::Compound(s) => {
                self.head(out, format_args!("CompoundStmt"), &s.loc)?;
                let inner = self.indented();
                for stmt in &s.stmts {
                    inner.write_stmt(out, stmt)?;
                }
                Ok(())
            }
            Stmt::If(s) => {
                self.head(out, format_args!("IfStmt"), &s.loc)?;
                let inner = self.indented();
                inner.label(out, "cond")?;
                inner.indented().write_expr(out, &s.cond)?;
                inner.label(out, "then")?;
                inner.indented().write_stmt(out, &s.then_branch)?;
                if let Some(else_branch) = &s.else_branch {
                    inner.label(out, "else")?;
                    inner.indented().write_stmt(out, else_branch)?;
                }
                Ok(())
            }
            Stmt::While(s) => {
                self.head(out, format_args!("WhileStmt"), &s.loc)?;
                let inner = self.indented();
                inner.label(out, "cond")?;
                inner.indented().write_expr(out, &s.cond)?;
                inner.label(out, "body")?;
                inner.indented().write_stmt(out, &s.body)
            }
            Stmt::For(s) => {
                self.head(out, format_args!("ForStmt"), &s.loc)?;
                let inner = self.indented();
                if let Some(init) = &s.init {
                    inner.label(out, "init")?;
                    inner.indented().write_stmt(out, init)?;
                }
                if let Some(cond) = &s.cond {
                    inner.label(out, "cond")?;
                    inner.indented().write_expr(out, cond)?;
                }
                if let Some(step) = &s.step {
                    inner.label(out, "step")?;
                    inner.indented().write_expr(out, step)?;
                }
                inner.label(out, "body")?;
                inner.indented().write_stmt(out, &s.body)
            }
            Stmt::Foreach(s) => {
                self.head(out, format_args!("ForeachStmt"), &s.loc)?;
                let inner = self.indented();
                inner.write_var(out, &s.var)?;
                inner.label(out, "iterable")?;
                inner.indented().write_expr(out, &s.iterable)?;
                inner.label(out, "body")?;
                inner.indented().write_stmt(out, &s.body)
            }
            Stmt::Return(s) => {
                self.head(out, format_args!("ReturnStmt"), &s.loc)?;
                if let Some(value) = &s.value {
                    self.indented().write_expr(out, value)?;
                }
                Ok(())
            }
            Stmt::Break(loc) => self.head(out, format_args!("BreakStmt"), loc),
            Stmt::Continue(loc) => self.head(out, format_args!("ContinueStmt"), loc),
            Stmt::Import(s) => self.head(out, format_args!("Import: module = {}", s.module), &s.loc),
            Stmt::Decl(decl) => {
                self.head(out, format_args!("DeclStmt"), decl.loc())?;
                self.indented().write_decl(out, decl)
            }
        }
    }

    fn write_expr(&self, out: &mut String, expr: &Expr) -> fmt::Result {
        let loc = &expr.loc;
        match &expr.node {
            ExprNode::NumberLit(value) => self.head(
                out,
                format_args!("NumberLit: {} = {}", value.type_name(), value),
                loc,
            ),
            ExprNode::BoolLit(value) => self.head(out, format_args!("BoolLit: value = {}", value), loc),
            ExprNode::Var(name) => self.head(out, format_args!("Var: name = {}", name), loc),
            ExprNode::Binary(bin) => {
                self.head(out, format_args!("Binary: op = {}", bin.op.as_str()), loc)?;
                let inner = self.indented();
                inner.write_expr(out, &bin.left)?;
                inner.write_expr(out, &bin.right)
            }
            ExprNode::Unary(un) => {
                self.head(out, format_args!("Unary: op = {}", un.op.as_str()), loc)?;
                self.indented().write_expr(out, &un.operand)
            }
            ExprNode::Call(call) => {
                self.head(out, format_args!("FuncCall"), loc)?;
                let inner = self.indented();
                inner.label(out, "callee")?;
                inner.indented().write_expr(out, &call.callee)?;
                if !call.args.is_empty() {
                    inner.label(out, "args")?;
                    let args = inner.indented();
                    for arg in &call.args {
                        args.write_expr(out, arg)?;
                    }
                }
                Ok(())
            }
            ExprNode::MemberAccess(access) => {
                self.head(
                    out,
                    format_args!("MemberAccess: member = {}", access.member),
                    loc,
                )?;
                let inner = self.indented();
                if access.unsafe_access {
                    inner.field(out, "unsafe", true)?;
                }
                inner.write_expr(out, &access.object)
            }
            ExprNode::Cast(cast) => {
                self.head(out, format_args!("Cast: type = {}", cast.target), loc)?;
                self.indented().write_expr(out, &cast.expr)
            }
            ExprNode::New(new) => {
                self.head(out, format_args!("New: type = {}", new.ty), loc)?;
                let inner = self.indented();
                for arg in &new.args {
                    inner.write_expr(out, arg)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticCollector;
    use crate::parser::parse_source;

    fn dump(source: &str) -> String {
        let mut diag = DiagnosticCollector::new();
        let file = parse_source(source, None, &mut diag).expect("parse should succeed");
        AstPrinter::new().print_file(&file)
    }

    #[test]
    fn print_module_with_variable() {
        let out = dump("module demo; var x : int = 1;");
        let expected = "\
ParsedFile
  ModuleDecl: name = demo
    scoped = false
    TopLevelDecls
      VarDecl: name = x
        mutable = true
        type = int
        init:
          NumberLit: i32 = 1
";
        assert_eq!(out, expected);
    }

    #[test]
    fn print_function_body() {
        let out = dump("fun add(a : int, b : int) int { return a + b; }");
        assert!(out.contains("FuncDecl: name = add"));
        assert!(out.contains("return_type = int"));
        assert!(out.contains("ReturnStmt"));
        assert!(out.contains("Binary: op = +"));
        assert!(out.contains("Var: name = b"));
    }

    #[test]
    fn print_with_locations() {
        let mut diag = DiagnosticCollector::new();
        let file = parse_source("import a.b;", None, &mut diag).expect("parse");
        let out = AstPrinter::new().with_locations(true).print_file(&file);
        assert!(out.contains("Import: module = a.b @ 1:1"), "{out}");
    }

    #[test]
    fn print_class_members() {
        let out = dump("class A : B { field f : int {get, set} = 0; [hot] static fun g() ; }");
        assert!(out.contains("ClassDecl: name = A"));
        assert!(out.contains("base = B"));
        assert!(out.contains("getter = get"));
        assert!(out.contains("modifiers = static"));
        assert!(out.contains("Attribute: name = hot"));
        assert!(out.contains("body = none"));
    }
}
