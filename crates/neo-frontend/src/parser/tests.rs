use super::*;
use crate::diagnostics::Level;

fn parse_ok(source: &str) -> ParsedFile {
    let mut diag = DiagnosticCollector::new();
    let file = parse_source(source, None, &mut diag);
    assert!(diag.is_empty(), "unexpected diagnostics: {:?}", diag.render_lines());
    file.expect("parse should succeed")
}

fn parse_err(source: &str) -> DiagnosticCollector {
    let mut diag = DiagnosticCollector::new();
    let file = parse_source(source, None, &mut diag);
    assert!(file.is_none(), "expected parse failure for {source:?}");
    assert!(diag.has_error());
    diag
}

fn parse_expr(source: &str) -> Expr {
    let mut diag = DiagnosticCollector::new();
    let mut lexer = Lexer::new(source);
    assert!(lexer.lex(&mut diag));
    let mut parser = Parser::from_lexer(lexer, &mut diag);
    parser.expression(0).unwrap()
}

fn first_decl(file: &ParsedFile) -> &Decl {
    file.decls().next().expect("expected a declaration")
}

fn int_value(expr: &Expr) -> i128 {
    match &expr.node {
        ExprNode::NumberLit(value) => value.as_integer().expect("expected integer"),
        _ => panic!("expected number literal"),
    }
}

#[test]
fn parse_import() {
    let file = parse_ok("import a.b.c;");
    assert_eq!(file.nodes.len(), 1);
    match &file.nodes[0] {
        Node::Stmt(Stmt::Import(import)) => assert_eq!(import.module, "a.b.c"),
        _ => panic!("expected import"),
    }
}

#[test]
fn parse_flat_module_with_variable() {
    let file = parse_ok("module demo; var x : int = 1;");
    match first_decl(&file) {
        Decl::Module(module) => {
            assert_eq!(module.name, "demo");
            assert!(!module.scoped);
            assert_eq!(module.body.decls.len(), 1);
            match &module.body.decls[0] {
                Decl::Var(var) => {
                    assert_eq!(var.name, "x");
                    assert!(var.mutable);
                    assert_eq!(var.ty.as_ref().map(|t| t.to_string()).as_deref(), Some("int"));
                    match &var.init {
                        Some(Expr {
                            node: ExprNode::NumberLit(NumericValue::I32(1)),
                            ..
                        }) => {}
                        _ => panic!("expected i32 initializer"),
                    }
                }
                _ => panic!("expected variable"),
            }
        }
        _ => panic!("expected module"),
    }
}

#[test]
fn parse_nested_scoped_modules() {
    let file = parse_ok("module outer { module inner.part { val x = 1; } var y : int; }");
    match first_decl(&file) {
        Decl::Module(outer) => {
            assert!(outer.scoped);
            assert_eq!(outer.body.decls.len(), 2);
            match &outer.body.decls[0] {
                Decl::Module(inner) => {
                    assert_eq!(inner.name, "inner.part");
                    assert!(inner.scoped);
                    match &inner.body.decls[0] {
                        Decl::Var(var) => assert!(!var.mutable),
                        _ => panic!("expected val"),
                    }
                }
                _ => panic!("expected inner module"),
            }
        }
        _ => panic!("expected module"),
    }
}

#[test]
fn parse_class_with_field() {
    let file = parse_ok("class A : B { field f : int {get, set} = 0; }");
    match first_decl(&file) {
        Decl::Class(class) => {
            assert_eq!(class.name, "A");
            assert!(!class.forward);
            assert_eq!(class.bases.len(), 1);
            assert_eq!(class.bases[0].to_string(), "B");
            assert_eq!(class.fields.len(), 1);
            let field = &class.fields[0];
            assert_eq!(field.name, "f");
            assert_eq!(field.getter.as_deref(), Some("get"));
            assert_eq!(field.setter.as_deref(), Some("set"));
            assert_eq!(int_value(field.init.as_ref().unwrap()), 0);
        }
        _ => panic!("expected class"),
    }
}

#[test]
fn class_members_go_to_their_buckets() {
    let source = "class C : x.Base, Other {
        ctor() { }
        ctor named(x : int) { }
        dtor() { }
        fun m();
        var v : int;
        class Inner;
        enum E;
        [a] field f {,};
    }";
    let file = parse_ok(source);
    match first_decl(&file) {
        Decl::Class(class) => {
            assert_eq!(class.bases[0].type_ref().module, "x");
            assert_eq!(class.bases[1].to_string(), "Other");
            let ctor_names: Vec<_> = class.ctors.iter().map(|c| c.name.as_str()).collect();
            assert_eq!(ctor_names, vec!["ctor", "named"]);
            assert_eq!(class.dtor.as_ref().map(|d| d.kind), Some(FuncKind::Dtor));
            assert_eq!(class.functions.len(), 1);
            assert!(class.functions[0].body.is_none());
            assert_eq!(class.variables.len(), 1);
            assert_eq!(class.sub_types.len(), 2);
            assert_eq!(class.sub_types[0].kind(), DeclKind::Class);
            assert_eq!(class.sub_types[1].kind(), DeclKind::Enum);
            assert_eq!(class.fields.len(), 1);
            assert_eq!(class.fields[0].meta.attributes[0].name, "a");
            assert!(class.fields[0].getter.is_none());
        }
        _ => panic!("expected class"),
    }
}

#[test]
fn forward_class_declaration() {
    let file = parse_ok("class Later;");
    match first_decl(&file) {
        Decl::Class(class) => assert!(class.forward),
        _ => panic!("expected class"),
    }
}

#[test]
fn second_destructor_is_rejected() {
    let diag = parse_err("class A { dtor() {} dtor() {} }");
    assert_eq!(
        diag.render_lines(),
        vec!["Unknown Source:1:21 | redefined destructor in class 'A'".to_string()]
    );
}

#[test]
fn module_inside_class_is_rejected() {
    let diag = parse_err("class A { module m; }");
    assert!(diag.render_lines()[0].ends_with("module declaration is not allowed here"));
}

#[test]
fn untyped_variable_is_rejected() {
    let diag = parse_err("var x;");
    assert_eq!(
        diag.render_lines(),
        vec![
            "Unknown Source:1:6 | variable 'x' is declared without a type hint or an initializer"
                .to_string()
        ]
    );
}

#[test]
fn modifiers_and_attributes_attach_to_declaration() {
    let file = parse_ok("static private [hot] [align(16)] fun f();");
    match first_decl(&file) {
        Decl::Func(func) => {
            assert!(func.meta.modifiers.contains(Modifier::Static));
            assert!(func.meta.modifiers.contains(Modifier::Private));
            assert!(!func.meta.modifiers.contains(Modifier::Export));
            let names: Vec<_> = func.meta.attributes.iter().map(|a| a.name.as_str()).collect();
            assert_eq!(names, vec!["hot", "align"]);
            assert_eq!(func.meta.attributes[1].args.len(), 1);
            assert!(func.body.is_none());
        }
        _ => panic!("expected function"),
    }
}

#[test]
fn duplicate_modifier_is_a_warning() {
    let mut diag = DiagnosticCollector::new();
    let file = parse_source("static static var x = 1;", None, &mut diag);
    assert!(file.is_some());
    assert!(!diag.has_error());
    assert_eq!(diag.len(), 1);
    let warning = &diag.diagnostics()[0];
    assert_eq!(warning.level, Level::Warning);
    assert_eq!(warning.render_line(), "Unknown Source:1:8 | duplicate modifier 'static'");
}

#[test]
fn parse_enum() {
    let file = parse_ok("enum E : u8 { A, B = 4, C }");
    match first_decl(&file) {
        Decl::Enum(e) => {
            assert_eq!(e.base.as_ref().map(|b| b.to_string()).as_deref(), Some("u8"));
            let names: Vec<_> = e.entries.iter().map(|v| v.name.as_str()).collect();
            assert_eq!(names, vec!["A", "B", "C"]);
            assert!(e.entries[0].init.is_none());
            assert_eq!(int_value(e.entries[1].init.as_ref().unwrap()), 4);
        }
        _ => panic!("expected enum"),
    }
}

#[test]
fn parse_function_body_statements() {
    let source = "fun f(a : int) int {
        var b = a * 2;
        if (b > 3) return b; else { b += 1; }
        while (b < 10) b++;
        for (;;) break;
        for (var i = 0; i < 3; ++i) continue;
        return b;
    }";
    let file = parse_ok(source);
    match first_decl(&file) {
        Decl::Func(func) => {
            assert_eq!(func.kind, FuncKind::Function);
            assert_eq!(func.args.len(), 1);
            assert_eq!(func.args[0].name, "a");
            assert_eq!(
                func.return_type.as_ref().map(|t| t.to_string()).as_deref(),
                Some("int")
            );
            let body = func.body.as_ref().unwrap();
            let kinds: Vec<_> = body.iter().map(Stmt::kind).collect();
            assert_eq!(
                kinds,
                vec![
                    StmtKind::Decl,
                    StmtKind::If,
                    StmtKind::While,
                    StmtKind::For,
                    StmtKind::For,
                    StmtKind::Return
                ]
            );
            match &body[3] {
                Stmt::For(for_stmt) => {
                    assert!(for_stmt.init.is_none());
                    assert!(for_stmt.cond.is_none());
                    assert!(for_stmt.step.is_none());
                    assert_eq!(for_stmt.body.kind(), StmtKind::Break);
                }
                _ => panic!("expected for"),
            }
            match &body[4] {
                Stmt::For(for_stmt) => {
                    assert_eq!(for_stmt.init.as_ref().map(Stmt::kind), Some(StmtKind::Decl));
                    assert!(for_stmt.cond.is_some());
                }
                _ => panic!("expected for"),
            }
        }
        _ => panic!("expected function"),
    }
}

#[test]
fn function_head_needs_semicolon_or_body() {
    let mut diag = DiagnosticCollector::new();
    let mut lexer = Lexer::new("fun f() int int");
    assert!(lexer.lex(&mut diag));
    let err = Parser::from_lexer(lexer, &mut diag).parse().unwrap_err();
    assert_eq!(
        err.messages(),
        vec![
            "unexpected token 'int'".to_string(),
            "a function head is followed by ';' or a body".to_string()
        ]
    );
    assert_eq!(diag.len(), 2);
    assert_eq!(diag.diagnostics()[1].level, Level::Note);
}

#[test]
fn struct_and_interface_heads() {
    let file = parse_ok("struct S; interface I;");
    let kinds: Vec<_> = file.decls().map(Decl::kind).collect();
    assert_eq!(kinds, vec![DeclKind::Struct, DeclKind::Interface]);
}

#[test]
fn struct_body_is_unsupported() {
    let diag = parse_err("struct S { var x : int; }");
    assert!(diag.render_lines()[0].ends_with("struct bodies are not supported yet"));
}

#[test]
fn string_literal_in_expression_is_unsupported() {
    let diag = parse_err("var s = \"text\";");
    assert!(
        diag.render_lines()[0]
            .ends_with("string literals in expressions are not supported yet")
    );
}

#[test]
fn empty_module_name_is_rejected() {
    let diag = parse_err("module ;");
    assert_eq!(
        diag.render_lines(),
        vec!["Unknown Source:1:8 | unexpected token ';' in module name".to_string()]
    );
}

#[test]
fn unexpected_character_stops_before_parsing() {
    let mut diag = DiagnosticCollector::new();
    assert!(parse_source("var x = 1 @ 2;", None, &mut diag).is_none());
    assert_eq!(diag.error_count(), 1);
}

#[test]
fn parse_types() {
    let file = parse_ok("var a : std.io.File*; var b : int[]; var c : m::T[2, 0x3];");
    let types: Vec<_> = file
        .decls()
        .map(|d| match d {
            Decl::Var(var) => var.ty.clone().unwrap(),
            _ => panic!("expected variable"),
        })
        .collect();

    match &types[0].kind {
        TypeExprKind::Pointer(ty) => {
            assert_eq!(ty.module, "std.io");
            assert_eq!(ty.name, "File");
        }
        _ => panic!("expected pointer"),
    }
    assert!(types[1].is_open_ended());
    match &types[2].kind {
        TypeExprKind::Array { element, sizes } => {
            assert_eq!(element.module, "m");
            assert_eq!(sizes.as_slice(), &[2u64, 3]);
        }
        _ => panic!("expected array"),
    }
}

#[test]
fn declarations_carry_locations() {
    let file = parse_ok("import x;\n\n  var y = 1;");
    assert_eq!(file.nodes[0].loc().line, 1);
    let loc = first_decl(&file).loc();
    assert_eq!((loc.line, loc.column), (3, 3));
    assert_eq!(loc.file_name(), "Unknown Source");
}

#[test]
fn parse_precedence() {
    // 1 + 2 * 3 should be 1 + (2 * 3)
    let expr = parse_expr("1 + 2 * 3");
    match expr.node {
        ExprNode::Binary(bin) => {
            assert_eq!(bin.op, BinaryOp::Add);
            match bin.right.node {
                ExprNode::Binary(inner) => assert_eq!(inner.op, BinaryOp::Mul),
                _ => panic!("expected binary on right"),
            }
        }
        _ => panic!("expected binary"),
    }
}

#[test]
fn binary_operators_are_left_associative() {
    let expr = parse_expr("1 - 2 - 3");
    match expr.node {
        ExprNode::Binary(bin) => {
            assert_eq!(bin.op, BinaryOp::Sub);
            assert_eq!(int_value(&bin.right), 3);
            match bin.left.node {
                ExprNode::Binary(inner) => assert_eq!(inner.op, BinaryOp::Sub),
                _ => panic!("expected binary on left"),
            }
        }
        _ => panic!("expected binary"),
    }
}

#[test]
fn assignment_is_right_associative() {
    let expr = parse_expr("a = b += 1");
    match expr.node {
        ExprNode::Binary(bin) => {
            assert_eq!(bin.op, BinaryOp::Assign);
            match bin.right.node {
                ExprNode::Binary(inner) => assert_eq!(inner.op, BinaryOp::AddAssign),
                _ => panic!("expected assignment on right"),
            }
        }
        _ => panic!("expected assignment"),
    }
}

#[test]
fn assignment_to_expression_is_rejected() {
    let diag = parse_err("fun f() { a + b = 1; }");
    assert!(diag.render_lines()[0].ends_with("invalid assignment target"));
}

#[test]
fn parse_unary_and_postfix() {
    let expr = parse_expr("-p->next.value(1)++");
    match expr.node {
        ExprNode::Unary(neg) => {
            assert_eq!(neg.op, UnaryOp::Neg);
            match neg.operand.node {
                ExprNode::Unary(post) => {
                    assert_eq!(post.op, UnaryOp::PostInc);
                    match post.operand.node {
                        ExprNode::Call(call) => {
                            assert_eq!(call.args.len(), 1);
                            match call.callee.node {
                                ExprNode::MemberAccess(value) => {
                                    assert_eq!(value.member, "value");
                                    assert!(!value.unsafe_access);
                                    match value.object.node {
                                        ExprNode::MemberAccess(next) => {
                                            assert_eq!(next.member, "next");
                                            assert!(next.unsafe_access);
                                        }
                                        _ => panic!("expected -> access"),
                                    }
                                }
                                _ => panic!("expected member access"),
                            }
                        }
                        _ => panic!("expected call"),
                    }
                }
                _ => panic!("expected postfix increment"),
            }
        }
        _ => panic!("expected negation"),
    }
}

#[test]
fn parse_number_literals() {
    assert_eq!(
        parse_expr("0xFFFFFFFFFFFFFFFF").node,
        ExprNode::NumberLit(NumericValue::U64(u64::MAX))
    );
    assert_eq!(
        parse_expr("5000000000").node,
        ExprNode::NumberLit(NumericValue::I64(5_000_000_000))
    );
    assert_eq!(
        parse_expr("2.5").node,
        ExprNode::NumberLit(NumericValue::F64(2.5))
    );
    assert_eq!(parse_expr("true").node, ExprNode::BoolLit(true));
}

#[test]
fn oversized_integer_is_rejected() {
    let diag = parse_err("var big = 99999999999999999999;");
    assert!(diag.render_lines()[0].contains("out of range"));
}

fn assert_too_deep(source: &str) {
    let diag = parse_err(source);
    let lines = diag.render_lines();
    assert!(
        lines[0].ends_with(&format!("nesting is deeper than {MAX_NESTING_DEPTH} levels")),
        "{lines:?}"
    );
}

#[test]
fn deeply_nested_parentheses_are_rejected() {
    let depth = 10_000;
    assert_too_deep(&format!("var x = {}1{};", "(".repeat(depth), ")".repeat(depth)));
}

#[test]
fn deeply_nested_blocks_are_rejected() {
    let depth = 10_000;
    assert_too_deep(&format!("fun f() {{{}{}}}", "{".repeat(depth), "}".repeat(depth)));
}

#[test]
fn long_prefix_chains_are_rejected() {
    assert_too_deep(&format!("var x = {}done;", "!".repeat(10_000)));
}

#[test]
fn moderate_nesting_parses() {
    parse_ok(&format!("var x = {}1{};", "(".repeat(50), ")".repeat(50)));
    parse_ok(&format!("fun f() {{{}{}}}", "{".repeat(50), "}".repeat(50)));
}

#[test]
fn parse_new_expression() {
    let expr = parse_expr("new pkg.Foo(1, x)");
    match expr.node {
        ExprNode::New(new) => {
            assert_eq!(new.ty.to_string(), "pkg.Foo");
            assert_eq!(new.args.len(), 2);
        }
        _ => panic!("expected new"),
    }
}
