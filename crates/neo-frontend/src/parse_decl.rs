// src/parse_decl.rs
//
// Declaration parsing: modifiers, attributes, functions, classes, fields,
// enums, variables and the struct/interface heads.

use crate::ast::*;
use crate::errors::ParserError;
use crate::parser::{Expected, Parser};
use crate::token::TokenType;

fn modifier_for(ty: TokenType) -> Option<Modifier> {
    match ty {
        TokenType::KwInline => Some(Modifier::Inline),
        TokenType::KwStatic => Some(Modifier::Static),
        TokenType::KwConst => Some(Modifier::Const),
        TokenType::KwExport => Some(Modifier::Export),
        TokenType::KwInternal => Some(Modifier::Internal),
        TokenType::KwProtected => Some(Modifier::Protected),
        TokenType::KwPrivate => Some(Modifier::Private),
        TokenType::KwFinal => Some(Modifier::Final),
        _ => None,
    }
}

impl<'d> Parser<'d> {
    /// Parse a declaration: modifiers, then attributes, then the declaration
    /// itself, which receives both.
    pub(crate) fn declaration(&mut self) -> Expected<Decl> {
        let mut meta = DeclMeta::default();
        self.modifiers(&mut meta.modifiers);
        meta.attributes = self.attributes()?;
        self.declaration_with(meta)
    }

    /// Dispatch on the declaration keyword, attaching `meta` to the result.
    pub(crate) fn declaration_with(&mut self, meta: DeclMeta) -> Expected<Decl> {
        self.nested(|parser| parser.declaration_kind(meta))
    }

    fn declaration_kind(&mut self, meta: DeclMeta) -> Expected<Decl> {
        let mut decl = match self.current().ty {
            TokenType::KwModule => Decl::Module(self.module_decl()?),
            TokenType::KwFun => Decl::Func(self.function(FuncKind::Function)?),
            TokenType::KwClass => Decl::Class(self.class_decl()?),
            TokenType::KwStruct => Decl::Struct(self.struct_decl()?),
            TokenType::KwInterface => Decl::Interface(self.interface_decl()?),
            TokenType::KwEnum => Decl::Enum(self.enum_decl()?),
            TokenType::KwVar | TokenType::KwVal => Decl::Var(self.var_decl()?),
            _ => {
                let found = self.current_text();
                return Err(self.fail(ParserError::ExpectedDeclaration {
                    found,
                    span: self.current().span.into(),
                }));
            }
        };
        if let Some(slot) = decl.meta_mut() {
            slot.absorb(meta);
        }
        Ok(decl)
    }

    /// Greedily consume modifier keywords into `modifiers`.
    /// Repeating a modifier is allowed but warned about.
    pub(crate) fn modifiers(&mut self, modifiers: &mut Modifiers) {
        while let Some(modifier) = modifier_for(self.current().ty) {
            if !modifiers.insert(modifier) {
                self.warn(ParserError::DuplicateModifier {
                    modifier: modifier.as_str().to_string(),
                    span: self.current().span.into(),
                });
            }
            self.advance();
        }
    }

    /// Parse zero or more `[name]` / `[name(args)]` attributes.
    pub(crate) fn attributes(&mut self) -> Expected<Vec<Attribute>> {
        let mut attributes = Vec::new();
        while self.check(TokenType::LBracket) {
            let loc = self.loc();
            self.advance(); // consume '['
            let name = self.consume_identifier()?;
            let args = if self.check(TokenType::LParen) {
                self.call_args()?
            } else {
                Vec::new()
            };
            self.consume(TokenType::RBracket, "]")?;
            attributes.push(Attribute { name, args, loc });
        }
        Ok(attributes)
    }

    /// Modifier and attribute runs in any order, as allowed inside class
    /// bodies and before function arguments.
    fn member_meta(&mut self) -> Expected<DeclMeta> {
        let mut meta = DeclMeta::default();
        loop {
            if self.current().ty.is_modifier() {
                self.modifiers(&mut meta.modifiers);
            } else if self.check(TokenType::LBracket) {
                let attributes = self.attributes()?;
                meta.attributes.extend(attributes);
            } else {
                return Ok(meta);
            }
        }
    }

    /// `fun name(args) [ret] ;|{...}`, or the same after `ctor`/`dtor`
    /// with an optional name.
    pub(crate) fn function(&mut self, kind: FuncKind) -> Expected<FuncDecl> {
        let loc = self.loc();
        let keyword = self.current().lexeme.clone();
        self.advance(); // consume 'fun' / 'ctor' / 'dtor'

        let name = match kind {
            FuncKind::Function => self.consume_identifier()?,
            FuncKind::Ctor | FuncKind::Dtor => {
                if self.check(TokenType::Identifier) {
                    self.consume_identifier()?
                } else {
                    keyword
                }
            }
        };

        let args = self.func_args()?;

        let return_type = if self.check(TokenType::Identifier) {
            Some(self.parse_type()?)
        } else {
            None
        };

        let body = if self.match_token(TokenType::Semicolon) {
            None
        } else if self.check(TokenType::LBrace) {
            Some(self.block_stmts()?)
        } else {
            let token = self.current_text();
            return Err(self.fail_with_note(
                ParserError::UnexpectedToken {
                    token,
                    span: self.current().span.into(),
                },
                "a function head is followed by ';' or a body",
            ));
        };

        Ok(FuncDecl {
            name,
            kind,
            args,
            return_type,
            body,
            meta: DeclMeta::default(),
            loc,
        })
    }

    /// `( [meta] name : type [= default], ... )`
    fn func_args(&mut self) -> Expected<Vec<VarDecl>> {
        self.consume(TokenType::LParen, "(")?;
        let mut args = Vec::new();
        if !self.check(TokenType::RParen) {
            loop {
                let meta = self.member_meta()?;
                let loc = self.loc();
                let name = self.consume_identifier()?;
                self.consume(TokenType::Colon, ":")?;
                let ty = self.parse_type()?;
                let init = if self.match_token(TokenType::Eq) {
                    Some(self.expression(0)?)
                } else {
                    None
                };
                args.push(VarDecl {
                    name,
                    ty: Some(ty),
                    init,
                    mutable: false,
                    meta,
                    loc,
                });

                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenType::RParen, ")")?;
        Ok(args)
    }

    /// `class Name [: Base, ...] ;` or `class Name [: Base, ...] { members }`
    pub(crate) fn class_decl(&mut self) -> Expected<ClassDecl> {
        let loc = self.loc();
        self.advance(); // consume 'class'
        let name = self.consume_identifier()?;

        let mut bases = Vec::new();
        if self.match_token(TokenType::Colon) {
            loop {
                bases.push(self.parse_type()?);
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
        }

        let mut class = ClassDecl {
            name,
            bases,
            sub_types: Vec::new(),
            fields: Vec::new(),
            variables: Vec::new(),
            functions: Vec::new(),
            ctors: Vec::new(),
            dtor: None,
            forward: false,
            meta: DeclMeta::default(),
            loc,
        };

        if self.match_token(TokenType::Semicolon) {
            class.forward = true;
            return Ok(class);
        }

        self.consume(TokenType::LBrace, "{")?;
        while !self.check(TokenType::RBrace) && !self.cursor.is_at_end() {
            self.class_member(&mut class)?;
        }
        self.consume(TokenType::RBrace, "}")?;

        Ok(class)
    }

    /// Parse one member and put it in the matching bucket of `class`.
    fn class_member(&mut self, class: &mut ClassDecl) -> Expected<()> {
        let meta = self.member_meta()?;

        match self.current().ty {
            TokenType::KwCtor => {
                let mut ctor = self.function(FuncKind::Ctor)?;
                ctor.meta.absorb(meta);
                class.ctors.push(ctor);
            }
            TokenType::KwDtor => {
                if class.dtor.is_some() {
                    return Err(self.fail(ParserError::RedefinedDestructor {
                        class: class.name.clone(),
                        span: self.current().span.into(),
                    }));
                }
                let mut dtor = self.function(FuncKind::Dtor)?;
                dtor.meta.absorb(meta);
                class.dtor = Some(dtor);
            }
            TokenType::KwFun => {
                let mut func = self.function(FuncKind::Function)?;
                func.meta.absorb(meta);
                class.functions.push(func);
            }
            TokenType::KwField => {
                let mut field = self.field_decl()?;
                field.meta.absorb(meta);
                class.fields.push(field);
            }
            TokenType::KwModule => {
                return Err(self.fail(ParserError::MisplacedDeclaration {
                    kind: DeclKind::Module.as_str(),
                    span: self.current().span.into(),
                }));
            }
            _ => match self.declaration_with(meta)? {
                Decl::Var(var) => class.variables.push(var),
                Decl::Field(field) => class.fields.push(field),
                Decl::Func(func) => class.functions.push(func),
                decl @ (Decl::Class(_) | Decl::Struct(_) | Decl::Interface(_) | Decl::Enum(_)) => {
                    class.sub_types.push(decl)
                }
                decl @ (Decl::Module(_) | Decl::TopLevel(_)) => {
                    return Err(self.fail(ParserError::MisplacedDeclaration {
                        kind: decl.kind().as_str(),
                        span: self.current().span.into(),
                    }));
                }
            },
        }
        Ok(())
    }

    /// `field name [: type] { [getter] , [setter] } [= init] ;`
    pub(crate) fn field_decl(&mut self) -> Expected<FieldDecl> {
        let loc = self.loc();
        self.advance(); // consume 'field'
        let name = self.consume_identifier()?;

        let ty = if self.match_token(TokenType::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };

        self.consume(TokenType::LBrace, "{")?;
        let getter = self.optional_identifier();
        self.consume(TokenType::Comma, ",")?;
        let setter = self.optional_identifier();
        self.consume(TokenType::RBrace, "}")?;

        let init = if self.match_token(TokenType::Eq) {
            Some(self.expression(0)?)
        } else {
            None
        };
        self.consume(TokenType::Semicolon, ";")?;

        Ok(FieldDecl {
            name,
            ty,
            init,
            getter,
            setter,
            meta: DeclMeta::default(),
            loc,
        })
    }

    fn optional_identifier(&mut self) -> Option<String> {
        if self.check(TokenType::Identifier) {
            let name = self.current().lexeme.clone();
            self.advance();
            Some(name)
        } else {
            None
        }
    }

    /// `struct Name;` only; struct bodies are not parsed yet.
    pub(crate) fn struct_decl(&mut self) -> Expected<StructDecl> {
        let loc = self.loc();
        self.advance(); // consume 'struct'
        let name = self.consume_identifier()?;
        self.reject_body("struct bodies")?;
        Ok(StructDecl {
            name,
            variables: Vec::new(),
            fields: Vec::new(),
            meta: DeclMeta::default(),
            loc,
        })
    }

    /// `interface Name;` only; interface bodies are not parsed yet.
    pub(crate) fn interface_decl(&mut self) -> Expected<InterfaceDecl> {
        let loc = self.loc();
        self.advance(); // consume 'interface'
        let name = self.consume_identifier()?;
        self.reject_body("interface bodies")?;
        Ok(InterfaceDecl {
            name,
            functions: Vec::new(),
            meta: DeclMeta::default(),
            loc,
        })
    }

    /// Accept the `;` of a head-only declaration, failing hard on a body.
    fn reject_body(&mut self, construct: &'static str) -> Expected<()> {
        if self.check(TokenType::LBrace) {
            return Err(self.fail(ParserError::Unsupported {
                construct,
                span: self.current().span.into(),
            }));
        }
        self.consume(TokenType::Semicolon, ";")?;
        Ok(())
    }

    /// `enum Name [: base] ;` or `enum Name [: base] { A, B = expr, ... }`
    pub(crate) fn enum_decl(&mut self) -> Expected<EnumDecl> {
        let loc = self.loc();
        self.advance(); // consume 'enum'
        let name = self.consume_identifier()?;

        let base = if self.match_token(TokenType::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };

        let mut entries = Vec::new();
        if !self.match_token(TokenType::Semicolon) {
            self.consume(TokenType::LBrace, "{")?;
            while !self.check(TokenType::RBrace) {
                let entry_loc = self.loc();
                let entry = self.consume_identifier()?;
                let init = if self.match_token(TokenType::Eq) {
                    Some(self.expression(0)?)
                } else {
                    None
                };
                entries.push(VarDecl {
                    name: entry,
                    ty: None,
                    init,
                    mutable: false,
                    meta: DeclMeta::default(),
                    loc: entry_loc,
                });

                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
            self.consume(TokenType::RBrace, "}")?;
        }

        Ok(EnumDecl {
            name,
            base,
            entries,
            meta: DeclMeta::default(),
            loc,
        })
    }

    /// `var|val name [: type] [= init] ;` with at least one of type or init.
    pub(crate) fn var_decl(&mut self) -> Expected<VarDecl> {
        let loc = self.loc();
        let mutable = self.check(TokenType::KwVar);
        self.advance(); // consume 'var' / 'val'
        let name = self.consume_identifier()?;

        let ty = if self.match_token(TokenType::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let init = if self.match_token(TokenType::Eq) {
            Some(self.expression(0)?)
        } else {
            None
        };

        if ty.is_none() && init.is_none() {
            return Err(self.fail(ParserError::UntypedVariable {
                name,
                span: self.current().span.into(),
            }));
        }
        self.consume(TokenType::Semicolon, ";")?;

        Ok(VarDecl {
            name,
            ty,
            init,
            mutable,
            meta: DeclMeta::default(),
            loc,
        })
    }
}
