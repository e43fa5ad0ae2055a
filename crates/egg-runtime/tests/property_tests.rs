//! Property-based tests for the parser and evaluator

mod common;

use egg_runtime::{parse_program, Literal, Node, Span, Value};
use proptest::prelude::*;

/// Random well-formed syntax trees with spans left as dummies
fn arb_node() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        (0u32..100_000).prop_map(|n| Node::number(f64::from(n), Span::dummy())),
        "[a-z ,()]{0,12}".prop_map(|s| Node::string(s, Span::dummy())),
        // No leading digit, or the word would scan as a number
        "[a-z_+*<>=?!-][a-z0-9_+*<>=?!-]{0,6}".prop_map(|w| Node::word(w, Span::dummy())),
    ];

    leaf.prop_recursive(4, 32, 4, |inner| {
        (inner.clone(), prop::collection::vec(inner, 0..4))
            .prop_map(|(operator, args)| Node::apply(operator, args, Span::dummy()))
    })
}

proptest! {
    #[test]
    fn number_literals_evaluate_to_themselves(n in 0u64..10_000_000_000) {
        let value = common::runtime().eval(&n.to_string()).unwrap();
        prop_assert_eq!(value, Value::Number(n as f64));
    }

    #[test]
    fn string_literals_evaluate_to_themselves(s in "[^\"]{0,40}") {
        let value = common::runtime().eval(&format!("\"{}\"", s)).unwrap();
        prop_assert_eq!(value, Value::string(&s));
    }

    #[test]
    fn rendered_trees_reparse_to_the_same_shape(node in arb_node()) {
        let rendered = node.to_string();
        let reparsed = parse_program(&rendered).unwrap();
        prop_assert!(reparsed.same_shape(&node), "{} reparsed as {}", rendered, reparsed);
    }

    #[test]
    fn parser_never_panics(source in "\\PC{0,60}") {
        let _ = parse_program(&source);
    }

    #[test]
    fn spans_stay_inside_source(source in "[a-z0-9(), \"]{0,40}") {
        match parse_program(&source) {
            Ok(node) => prop_assert!(node.span().end <= source.len()),
            Err(err) => prop_assert!(err.span().end <= source.len()),
        }
    }
}

#[test]
fn test_string_literal_payload_is_verbatim() {
    match parse_program("\"  padded  \"").unwrap() {
        Node::Value {
            raw: Literal::String(s),
            ..
        } => assert_eq!(s, "  padded  "),
        other => panic!("expected string literal, got {:?}", other),
    }
}
