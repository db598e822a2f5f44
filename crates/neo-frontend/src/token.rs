// src/token.rs

/// Single source of truth for keyword-to-token mapping.
///
/// Each entry `"text" => Variant` generates:
/// - A match arm in `TokenType::keyword_type`: `"text" => Some(TokenType::Variant)`
/// - A match arm in `TokenType::as_str`:       `Self::Variant => "text"`
macro_rules! define_keywords {
    ( $( $text:literal => $variant:ident ),+ $(,)? ) => {
        impl TokenType {
            /// Check if a string is a keyword and return its token type.
            pub fn keyword_type(text: &str) -> Option<TokenType> {
                match text {
                    $( $text => Some(TokenType::$variant), )+
                    _ => None,
                }
            }

            /// String representation for keyword tokens (used by `as_str`).
            fn keyword_as_str(&self) -> Option<&'static str> {
                match self {
                    $( Self::$variant => Some($text), )+
                    _ => None,
                }
            }
        }
    };
}

define_keywords! {
    // Declarations
    "var"       => KwVar,
    "val"       => KwVal,
    "fun"       => KwFun,
    "class"     => KwClass,
    "struct"    => KwStruct,
    "interface" => KwInterface,
    "enum"      => KwEnum,
    "module"    => KwModule,
    "import"    => KwImport,
    "ctor"      => KwCtor,
    "dtor"      => KwDtor,
    "field"     => KwField,
    "impl"      => KwImpl,
    "extern"    => KwExtern,
    // Modifiers
    "export"    => KwExport,
    "const"     => KwConst,
    "private"   => KwPrivate,
    "protected" => KwProtected,
    "internal"  => KwInternal,
    "inline"    => KwInline,
    "static"    => KwStatic,
    "final"     => KwFinal,
    "virtual"   => KwVirtual,
    "override"  => KwOverride,
    // Control flow
    "if"        => KwIf,
    "else"      => KwElse,
    "while"     => KwWhile,
    "for"       => KwFor,
    "return"    => KwReturn,
    "break"     => KwBreak,
    "continue"  => KwContinue,
    "try"       => KwTry,
    "catch"     => KwCatch,
    "finally"   => KwFinally,
    "throw"     => KwThrow,
    // Values
    "true"      => KwTrue,
    "false"     => KwFalse,
    "null"      => KwNull,
    "new"       => KwNew,
}

/// All token types in the Neo language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Literals
    IntLiteral,
    HexLiteral,
    FloatLiteral,
    StringLiteral,
    CharLiteral,
    Identifier,

    // Keywords
    KwVar,
    KwVal,
    KwFun,
    KwClass,
    KwStruct,
    KwInterface,
    KwEnum,
    KwModule,
    KwImport,
    KwCtor,
    KwDtor,
    KwField,
    KwImpl,
    KwExtern,
    KwExport,
    KwConst,
    KwPrivate,
    KwProtected,
    KwInternal,
    KwInline,
    KwStatic,
    KwFinal,
    KwVirtual,
    KwOverride,
    KwIf,
    KwElse,
    KwWhile,
    KwFor,
    KwReturn,
    KwBreak,
    KwContinue,
    KwTry,
    KwCatch,
    KwFinally,
    KwThrow,
    KwTrue,
    KwFalse,
    KwNull,
    KwNew,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    PlusPlus,   // ++
    MinusMinus, // --
    PlusEq,     // +=
    MinusEq,    // -=
    StarEq,     // *=
    SlashEq,    // /=
    PercentEq,  // %=
    EqEq,
    BangEq,
    Bang,     // !
    AmpAmp,   // &&
    PipePipe, // ||
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,

    // Bitwise operators
    Ampersand,        // &
    Pipe,             // |
    Caret,            // ^
    Tilde,            // ~
    LessLess,         // <<
    GreaterGreater,   // >>
    AmpEq,            // &=
    PipeEq,           // |=
    CaretEq,          // ^=
    LessLessEq,       // <<=
    GreaterGreaterEq, // >>=
    Question,         // ?

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket, // [
    RBracket, // ]
    Comma,
    Semicolon,
    Colon,
    ColonColon, // ::
    Dot,
    Arrow, // ->

    // Special
    Eof,
    /// Sentinel returned by the cursor outside the token buffer.
    Unknown,
}

impl TokenType {
    /// Get string representation for error messages
    pub fn as_str(&self) -> &'static str {
        if let Some(s) = self.keyword_as_str() {
            return s;
        }
        match self {
            Self::IntLiteral => "integer",
            Self::HexLiteral => "hex integer",
            Self::FloatLiteral => "float",
            Self::StringLiteral => "string",
            Self::CharLiteral => "char",
            Self::Identifier => "identifier",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::PlusPlus => "++",
            Self::MinusMinus => "--",
            Self::PlusEq => "+=",
            Self::MinusEq => "-=",
            Self::StarEq => "*=",
            Self::SlashEq => "/=",
            Self::PercentEq => "%=",
            Self::EqEq => "==",
            Self::BangEq => "!=",
            Self::Bang => "!",
            Self::AmpAmp => "&&",
            Self::PipePipe => "||",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::Eq => "=",
            Self::Ampersand => "&",
            Self::Pipe => "|",
            Self::Caret => "^",
            Self::Tilde => "~",
            Self::LessLess => "<<",
            Self::GreaterGreater => ">>",
            Self::AmpEq => "&=",
            Self::PipeEq => "|=",
            Self::CaretEq => "^=",
            Self::LessLessEq => "<<=",
            Self::GreaterGreaterEq => ">>=",
            Self::Question => "?",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Colon => ":",
            Self::ColonColon => "::",
            Self::Dot => ".",
            Self::Arrow => "->",
            Self::Eof => "end of file",
            Self::Unknown => "unknown",
            // All keyword variants are handled by `keyword_as_str()` above.
            _ => unreachable!("keyword variant not covered by define_keywords! macro"),
        }
    }

    /// Tokens that may appear in a declaration's modifier run.
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            Self::KwInline
                | Self::KwStatic
                | Self::KwConst
                | Self::KwExport
                | Self::KwInternal
                | Self::KwProtected
                | Self::KwPrivate
                | Self::KwFinal
        )
    }

    /// Get precedence for binary operators (precedence climbing)
    pub fn precedence(&self) -> u8 {
        match self {
            Self::Eq
            | Self::PlusEq
            | Self::MinusEq
            | Self::StarEq
            | Self::SlashEq
            | Self::PercentEq
            | Self::AmpEq
            | Self::PipeEq
            | Self::CaretEq
            | Self::LessLessEq
            | Self::GreaterGreaterEq => 1, // assignment (lowest)
            Self::PipePipe => 2,
            Self::AmpAmp => 3,
            Self::Pipe => 4,
            Self::Caret => 5,
            Self::Ampersand => 6,
            Self::EqEq | Self::BangEq => 7,
            Self::Lt | Self::Gt | Self::LtEq | Self::GtEq => 8,
            Self::LessLess | Self::GreaterGreater => 9,
            Self::Plus | Self::Minus => 10,
            Self::Star | Self::Slash | Self::Percent => 11,
            _ => 0,
        }
    }
}

/// Byte range of a token plus the line/column of its first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Span covering both `self` and `other`, positioned at the earlier one.
    pub fn merge(self, other: Span) -> Span {
        let first = if self.start <= other.start {
            self
        } else {
            other
        };
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line: first.line,
            column: first.column,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.len()).into()
    }
}

/// A token with its location in source code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub ty: TokenType,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(ty: TokenType, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            ty,
            lexeme: lexeme.into(),
            span,
        }
    }

    /// The sentinel token handed out past either end of a token buffer.
    pub fn invalid() -> Self {
        Self::new(TokenType::Unknown, "", Span::default())
    }

    pub fn line(&self) -> u32 {
        self.span.line
    }

    pub fn column(&self) -> u32 {
        self.span.column
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ {:?} : {} }}", self.ty, self.lexeme)
    }
}
