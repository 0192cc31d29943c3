use proptest::prelude::*;
use varflow::{analyze, Document, DocumentSet};

const NAMES: &[&str] = &["x", "y", "score", "mood"];

fn arb_macro() -> impl Strategy<Value = String> {
    let name = prop::sample::select(NAMES);
    prop_oneof![
        (name.clone(), "[a-z0-9]{0,4}").prop_map(|(n, v)| format!("{{{{setvar::{}::{}}}}}", n, v)),
        name.clone().prop_map(|n| format!("{{{{getvar::{}}}}}", n)),
        Just("{{// note}}".to_string()),
        Just("{{random::a::b}}".to_string()),
        "[a-z ]{0,6}",
    ]
}

fn arb_documents() -> impl Strategy<Value = Vec<Document>> {
    prop::collection::vec(
        (prop::collection::vec(arb_macro(), 0..6), any::<bool>()),
        1..6,
    )
    .prop_map(|docs| {
        docs.into_iter()
            .enumerate()
            .map(|(i, (parts, enabled))| {
                let mut doc = Document::new(format!("doc-{}", i), parts.concat());
                doc.enabled = enabled;
                doc
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn analysis_is_deterministic(docs in arb_documents(), mask in any::<u8>()) {
        let order: Vec<String> = docs
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, d)| d.id.clone())
            .collect();
        let set: DocumentSet = docs.into_iter().collect();

        let first = analyze(&set, &order);
        let second = analyze(&set, &order);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn excluded_documents_never_appear(docs in arb_documents()) {
        let order: Vec<String> = docs.iter().skip(1).map(|d| d.id.clone()).collect();
        let excluded = docs[0].id.clone();
        let set: DocumentSet = docs.into_iter().collect();

        let report = analyze(&set, &order);
        prop_assert!(report.snapshots.keys().all(|id| id.document_id != excluded));
        for record in report.variables.values() {
            prop_assert!(record.defined_in.iter().all(|o| o.document_id != excluded));
            prop_assert!(record.referenced_in.iter().all(|o| o.document_id != excluded));
        }
    }

    #[test]
    fn unresolved_matches_records(docs in arb_documents()) {
        let order: Vec<String> = docs.iter().map(|d| d.id.clone()).collect();
        let set: DocumentSet = docs.into_iter().collect();

        let report = analyze(&set, &order);
        for (name, record) in &report.variables {
            prop_assert_eq!(report.is_unresolved(name), record.is_unresolved());
        }
    }
}
