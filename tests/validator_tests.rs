// tests/validator_tests.rs

use hornlint::{parse, verify, Diagnostic, Verdict};
use serde_json::json;

#[test]
fn diagnostics_display_in_sink_format() {
    let diagnostic = Diagnostic::new(7, "a <query> was required to end the program");
    assert_eq!(
        diagnostic.to_string(),
        "Line 7: a <query> was required to end the program"
    );
}

#[test]
fn verify_folds_diagnostics_into_a_verdict() {
    assert!(verify("?- foo.").is_valid());
    match verify("foo.") {
        Verdict::Invalid { diagnostics } => assert_eq!(diagnostics.len(), 1),
        Verdict::Valid => panic!("clause without a query should not be valid"),
    }
}

#[test]
fn empty_diagnostics_define_validity() {
    let diagnostics = parse("?- p(f(x), Y, 0).");
    assert!(diagnostics.is_empty());
    assert_eq!(Verdict::from_diagnostics(diagnostics), Verdict::Valid);
}

#[test]
fn valid_verdict_serializes_with_a_status_tag() {
    let value = serde_json::to_value(Verdict::Valid).unwrap();
    assert_eq!(value, json!({ "status": "valid" }));
}

#[test]
fn invalid_verdict_serializes_its_diagnostics() {
    let verdict = verify("foo ?- foo.");
    let value = serde_json::to_value(&verdict).unwrap();
    assert_eq!(value["status"], "invalid");
    assert_eq!(value["diagnostics"][0]["line"], 1);
    assert!(value["diagnostics"][0]["message"]
        .as_str()
        .unwrap()
        .contains("'.'"));
}

#[test]
fn verdict_round_trips_through_json() {
    let verdict = verify("foo ?- foo.");
    let encoded = serde_json::to_string(&verdict).unwrap();
    let decoded: Verdict = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, verdict);
}

#[test]
fn diagnostics_arrive_in_detection_order() {
    // The broken clause is found before the query is even attempted.
    let diagnostics = parse("a\nb ?- a.");
    assert!(diagnostics.len() >= 2);
    assert!(diagnostics[0].line <= diagnostics[1].line);
}

#[test]
fn fatal_outcome_suppresses_earlier_findings() {
    // The unrecognized character would normally be reported, but the
    // unterminated quote aborts the unit with a single diagnostic.
    let diagnostics = parse("@ 'abc");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.contains("end of input"));
}

#[test]
fn empty_quoted_atom_is_rejected() {
    let diagnostics = parse("?- ''.");
    assert!(!diagnostics.is_empty());
}

#[test]
fn query_without_dash_is_not_a_query() {
    let diagnostics = parse("?x foo.");
    assert!(!diagnostics.is_empty());
}
