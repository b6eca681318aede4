//! Integration tests for the lexer + parser pipeline

use classad_ast::{BinaryOp, ClassAdError, Expr, Scope};
use classad_lexer::{Lexer, Token};
use classad_parser::Parser;

#[test]
fn test_lexer_tokens_feed_parser() {
    let input = "TARGET.Memory >= 1024 /* MB */ && Owner =?= \"alice\"";
    let tokens: Vec<Token> = Lexer::new(input)
        .tokenize()
        .into_iter()
        .map(|token| token.token)
        .collect();
    assert_eq!(
        tokens,
        vec![
            Token::Target,
            Token::Dot,
            Token::Identifier,
            Token::GreaterEqual,
            Token::Integer,
            Token::AndAnd,
            Token::Identifier,
            Token::MetaEqual,
            Token::String,
            Token::Eof,
        ]
    );

    let parser = Parser::new(input).unwrap();
    assert_eq!(parser.tokens().len(), tokens.len());
    let expr = parser.parse().unwrap();
    match expr {
        Expr::Binary {
            op: BinaryOp::And,
            left,
            right,
        } => {
            assert_eq!(
                *left,
                Expr::binary(
                    BinaryOp::GreaterEqual,
                    Expr::select(Expr::Scope(Scope::Target), "Memory"),
                    Expr::integer(1024),
                )
            );
            assert_eq!(
                *right,
                Expr::binary(BinaryOp::Is, Expr::attribute("Owner"), Expr::string("alice"))
            );
        }
        other => panic!("Expected conjunction, got {other:?}"),
    }
}

#[test]
fn test_old_and_new_style_ads_agree() {
    let old_style = "
        // a machine
        Name = \"slot1@node\"
        Cpus = 8
        Requirements = TARGET.RequestCpus <= Cpus
    ";
    let new_style = "[ Name = \"slot1@node\"; Cpus = 8; Requirements = TARGET.RequestCpus <= Cpus ]";

    assert_eq!(
        classad_parser::parse_classad(old_style).unwrap(),
        classad_parser::parse_classad(new_style).unwrap()
    );
}

#[test]
fn test_canonical_text_is_stable() {
    let inputs = [
        "a + b * c - d",
        "(a + b) * c",
        "x ? y : z ?: w",
        "!(a && b) || c",
        "{ 1, \"two\", 3.5, [ k = v ] }",
        "f(a)[0].name",
        "MY.x + TARGET.y + PARENT.z + .w",
        "'odd name' + 1",
        "-5 - -a",
    ];
    for input in inputs {
        let once = classad_parser::parse(input).unwrap().to_string();
        let twice = classad_parser::parse(&once).unwrap().to_string();
        assert_eq!(once, twice, "unstable canonical form for {input}");
    }
}

#[test]
fn test_error_positions_span_lines() {
    let error = Parser::new_with_filename("a = 1\nb = )\n", "slot.ad")
        .unwrap()
        .parse_classad()
        .unwrap_err();
    match error {
        ClassAdError::Syntax {
            filename,
            line,
            column,
            ..
        } => {
            assert_eq!(filename, "slot.ad");
            assert_eq!(line, 2);
            assert_eq!(column, 5);
        }
        other => panic!("Expected syntax error, got {other:?}"),
    }
}

#[test]
fn test_expression_is_not_an_ad() {
    let error = classad_parser::parse_classad("1 + 2").unwrap_err();
    assert!(error.to_string().contains("expected a ClassAd"));
}

#[test]
fn test_facade_reexports_pipeline() {
    let expr = classad::parse("strcat(\"a\", \"b\")").unwrap();
    assert_eq!(expr, Expr::call("strcat", vec![Expr::string("a"), Expr::string("b")]));
    assert!(classad::parse_classad("[ a = 1 ]").is_ok());
}
