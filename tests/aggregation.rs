mod common;
use common::{documents, order};
use varflow::analysis::{flatten, parse_order, simulate};
use varflow::{analyze, Document, DocumentSet, Occurrence, UnresolvedVariable};

fn occ(id: &str, enabled: bool) -> Occurrence {
    Occurrence {
        document_id: id.to_string(),
        enabled,
    }
}

#[test]
fn test_unresolved_variable() {
    let docs = documents(&[("A", "{{getvar::y}}")]);
    let report = analyze(&docs, &order(&["A"]));
    assert_eq!(
        report.unresolved,
        vec![UnresolvedVariable {
            var_name: "y".to_string()
        }]
    );
    let record = report.variable("y").unwrap();
    assert!(record.defined_in.is_empty());
    assert_eq!(record.referenced_in, vec![occ("A", true)]);
}

#[test]
fn test_definitions_and_references_carry_enabled_flag() {
    let docs: DocumentSet = vec![
        Document::new("A", "{{setvar::x::1}}").disabled(),
        Document::new("B", "{{setvar::x::2}}{{getvar::x}}"),
        Document::new("C", "{{getvar::x}}").disabled(),
    ]
    .into_iter()
    .collect();
    let report = analyze(&docs, &order(&["A", "B", "C"]));
    let record = report.variable("x").unwrap();
    assert_eq!(record.defined_in, vec![occ("A", false), occ("B", true)]);
    assert_eq!(record.referenced_in, vec![occ("B", true), occ("C", false)]);
    assert!(report.unresolved.is_empty());
}

#[test]
fn test_disabled_only_definition_still_resolves() {
    // Resolution is about where a variable is written, not whether it ran
    let docs: DocumentSet = vec![
        Document::new("A", "{{setvar::x::1}}").disabled(),
        Document::new("B", "{{getvar::x}}"),
    ]
    .into_iter()
    .collect();
    let report = analyze(&docs, &order(&["A", "B"]));
    assert!(!report.is_unresolved("x"));
}

#[test]
fn test_entries_deduplicated_per_document() {
    let docs = documents(&[
        ("A", "{{setvar::x::1}}{{setvar::x::2}}{{getvar::x}}{{getvar::x}}"),
        ("B", "{{getvar::x}}"),
    ]);
    let report = analyze(&docs, &order(&["A", "B"]));
    let record = report.variable("x").unwrap();
    assert_eq!(record.defined_in, vec![occ("A", true)]);
    assert_eq!(record.referenced_in, vec![occ("A", true), occ("B", true)]);
}

#[test]
fn test_document_outside_order_contributes_nothing() {
    let docs = documents(&[
        ("A", "{{getvar::x}}"),
        ("hidden", "{{setvar::x::1}}{{getvar::z}}"),
    ]);
    let report = analyze(&docs, &order(&["A"]));

    assert!(report.is_unresolved("x"));
    assert!(report.variable("z").is_none());
    assert!(report.macros_for("hidden").is_empty());
    assert!(report
        .snapshots
        .keys()
        .all(|id| id.document_id != "hidden"));
}

#[test]
fn test_unknown_ids_in_order_are_skipped() {
    let docs = documents(&[("A", "{{setvar::x::1}}")]);
    let report = analyze(&docs, &order(&["ghost", "A"]));
    assert_eq!(report.variable_names(), vec!["x"]);
}

#[test]
fn test_comments_contribute_nothing() {
    for enabled in [true, false] {
        let mut doc = Document::new("A", "{{// note}}{{//setvar::x::1}}");
        doc.enabled = enabled;
        let docs: DocumentSet = std::iter::once(doc).collect();
        let report = analyze(&docs, &order(&["A"]));

        let macros = report.macros_for("A");
        assert_eq!(macros.len(), 2);
        assert!(macros.iter().all(|m| m.kind.tag() == "comment"));
        assert!(macros.iter().all(|m| m.var_name().is_none()));
        assert!(report.variables.is_empty());
        assert!(report.snapshots.is_empty());
    }
}

#[test]
fn test_stats_count_undefined_and_unreferenced() {
    let docs = documents(&[
        ("A", "{{setvar::used::1}}{{setvar::spare::2}}"),
        ("B", "{{getvar::used}}{{getvar::missing}}{{getvar::gone}}"),
    ]);
    let report = analyze(&docs, &order(&["A", "B"]));
    let stats = report.stats();
    assert_eq!(stats.undefined_count, 2);
    assert_eq!(stats.unreferenced_count, 1);
    assert_eq!(report.unreferenced(), vec!["spare"]);
    assert_eq!(
        report.variable_names(),
        vec!["gone", "missing", "spare", "used"]
    );
}

#[test]
fn test_missing_owner_is_skipped() {
    let before = documents(&[("A", "{{setvar::x::1}}"), ("B", "{{getvar::x}}")]);
    let ids = order(&["A", "B"]);
    let parsed = parse_order(&before, &ids);

    // A disappears between parsing and simulation
    let after = documents(&[("B", "{{getvar::x}}")]);
    let sim = simulate(&after, &flatten(&ids, &parsed));

    let record = &sim.variables["x"];
    assert!(record.defined_in.is_empty());
    assert_eq!(record.referenced_in, vec![occ("B", true)]);
    assert_eq!(sim.snapshots.values().next(), Some(&None));
}

#[test]
fn test_macro_metadata() {
    let docs = documents(&[("A", "x {{ random:: a :: b }} {{setvar::k::v}}")]);
    let report = analyze(&docs, &order(&["A"]));
    let macros = report.macros_for("A");

    assert_eq!(macros[0].kind.tag(), "random");
    assert_eq!(macros[0].params(), ["a".to_string(), "b".to_string()]);
    assert_eq!(macros[0].full, "{{ random:: a :: b }}");
    assert_eq!(macros[0].inner, "random:: a :: b");
    assert_eq!(macros[0].range, 2..23);

    assert!(macros[1].is_setvar());
    assert_eq!(macros[1].var_name(), Some("k"));
    assert_eq!(macros[1].value(), Some("v"));
    assert_eq!(macros[1].document_id(), "A");
}
