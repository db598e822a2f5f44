// Property tests for the lexer and parser over generated input.
//
// Whatever the input, lexing must terminate without panicking, leave exactly
// one EOF token at the end of the buffer, and keep token spans in bounds and
// in order.

use neo_frontend::{DiagnosticCollector, Lexer, TokenType, parse_source};
use proptest::prelude::*;

/// Fragments of plausible Neo source, glued together by the generators below.
const FRAGMENTS: &[&str] = &[
    "var", "val", "fun", "class", "module", "import", "x", "y1", "_z", "42", "0x1F", "3.5", "(",
    ")", "{", "}", "[", "]", ";", ",", ":", "::", ".", "->", "+", "++", "+=", "-", "--", "<<",
    "<<=", ">>=", "==", "!=", "&&", "||", "\"str\"", "'c'", "'", "\"", "/* c */", "// c\n", "\n",
    " ", "@", "$", "é",
];

fn fragment_source() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..48).prop_map(|parts| parts.join(" "))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn lexing_ends_with_exactly_one_eof(s in ".*") {
        let mut diag = DiagnosticCollector::new();
        let mut lexer = Lexer::new(&s);
        let completed = lexer.lex(&mut diag);
        let tokens = lexer.tokens();

        prop_assert!(!tokens.is_empty());
        prop_assert_eq!(tokens.last().map(|t| t.ty), Some(TokenType::Eof));
        let eofs = tokens.iter().filter(|t| t.ty == TokenType::Eof).count();
        prop_assert_eq!(eofs, 1, "input={:?}", s);

        // Only an unexpected character stops the scan early, and it is an error.
        if !completed {
            prop_assert!(diag.has_error());
        }
    }

    #[test]
    fn token_spans_are_in_bounds_and_ordered(s in fragment_source()) {
        let mut diag = DiagnosticCollector::new();
        let mut lexer = Lexer::new(&s);
        lexer.lex(&mut diag);

        let mut last_end = 0usize;
        for token in lexer.tokens() {
            prop_assert!(token.span.start <= token.span.end, "token={} input={:?}", token, s);
            prop_assert!(token.span.end <= s.len(), "token={} input={:?}", token, s);
            prop_assert!(token.span.start >= last_end, "token={} input={:?}", token, s);
            prop_assert!(token.span.line >= 1 && token.span.column >= 1);
            last_end = token.span.end;
        }
    }

    #[test]
    fn lexing_is_deterministic(s in fragment_source()) {
        let mut first = Lexer::new(&s);
        let mut second = Lexer::new(&s);
        let mut diag_a = DiagnosticCollector::new();
        let mut diag_b = DiagnosticCollector::new();
        prop_assert_eq!(first.lex(&mut diag_a), second.lex(&mut diag_b));
        prop_assert_eq!(first.tokens(), second.tokens());
        prop_assert_eq!(diag_a.render_lines(), diag_b.render_lines());
    }

    #[test]
    fn parser_never_panics(s in fragment_source()) {
        let mut diag = DiagnosticCollector::new();
        let parsed = parse_source(&s, None, &mut diag);
        // A failed parse always leaves at least one error behind.
        if parsed.is_none() {
            prop_assert!(diag.has_error(), "input={:?}", s);
        }
    }
}

#[test]
fn compound_operators_use_maximal_munch() {
    let mut diag = DiagnosticCollector::new();
    let mut lexer = Lexer::new("a<<=b>>=c+=d++ - --e->f::g");
    assert!(lexer.lex(&mut diag));
    let kinds: Vec<_> = lexer.tokens().iter().map(|t| t.ty).collect();
    assert_eq!(
        kinds,
        vec![
            TokenType::Identifier,
            TokenType::LessLessEq,
            TokenType::Identifier,
            TokenType::GreaterGreaterEq,
            TokenType::Identifier,
            TokenType::PlusEq,
            TokenType::Identifier,
            TokenType::PlusPlus,
            TokenType::Minus,
            TokenType::MinusMinus,
            TokenType::Identifier,
            TokenType::Arrow,
            TokenType::Identifier,
            TokenType::ColonColon,
            TokenType::Identifier,
            TokenType::Eof,
        ]
    );
    assert!(diag.is_empty());
}
