//! Execution-order flattening, state simulation and reference aggregation.
//!
//! Analysis is a pure function of the document set and the execution order.
//! The variable state lives only inside [`simulate`]'s fold.

use std::collections::{BTreeMap, HashMap};

use crate::document::DocumentProvider;
use crate::macros::{parse_document, Macro, MacroKind};
use crate::report::{AnalysisReport, Simulation, VariableRecord};

/// Parse the macros of every document listed in `order`.
///
/// Ids missing from the provider are skipped. Documents outside the order are never parsed.
pub fn parse_order<P>(provider: &P, order: &[String]) -> BTreeMap<String, Vec<Macro>>
where
    P: DocumentProvider + ?Sized,
{
    let mut parsed = BTreeMap::new();
    for id in order {
        if parsed.contains_key(id) {
            continue;
        }
        if let Some(doc) = provider.document(id) {
            parsed.insert(id.clone(), parse_document(id, &doc.content));
        }
    }
    parsed
}

/// Concatenate per-document macro lists in execution order.
pub fn flatten<'a>(order: &[String], parsed: &'a BTreeMap<String, Vec<Macro>>) -> Vec<&'a Macro> {
    order
        .iter()
        .filter_map(|id| parsed.get(id))
        .flat_map(|macros| macros.iter())
        .collect()
}

/// Walk the flattened macros once, simulating `setvar`/`getvar` and aggregating
/// definitions and references per variable.
///
/// A `setvar` only runs when its document is enabled. A `getvar` always records a
/// snapshot. Macros whose owning document cannot be found contribute nothing.
pub fn simulate<P>(provider: &P, flow: &[&Macro]) -> Simulation
where
    P: DocumentProvider + ?Sized,
{
    let mut state: HashMap<&str, Option<&str>> = HashMap::new();
    let mut snapshots = BTreeMap::new();
    let mut variables: BTreeMap<String, VariableRecord> = BTreeMap::new();

    for &m in flow {
        let Some(doc) = provider.document(m.document_id()) else {
            tracing::warn!(
                macro_id = %m.id,
                document_id = %m.document_id(),
                "owning document missing, skipping macro"
            );
            continue;
        };

        match &m.kind {
            MacroKind::SetVar { name, value } => {
                let Some(name) = name.as_deref() else {
                    continue;
                };
                variables
                    .entry(name.to_string())
                    .or_default()
                    .define(&doc.id, doc.enabled);
                if doc.enabled {
                    state.insert(name, value.as_deref());
                }
            }
            MacroKind::GetVar { name } => {
                let seen = state.get(name.as_str()).copied().flatten();
                snapshots.insert(m.id.clone(), seen.map(str::to_string));
                if !name.is_empty() {
                    variables
                        .entry(name.clone())
                        .or_default()
                        .reference(&doc.id, doc.enabled);
                }
            }
            MacroKind::Comment | MacroKind::Other { .. } => {}
        }
    }

    Simulation {
        snapshots,
        state: state
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect(),
        variables,
    }
}

/// Run the full pipeline: parse, flatten, simulate and aggregate.
pub fn analyze<P>(provider: &P, order: &[String]) -> AnalysisReport
where
    P: DocumentProvider + ?Sized,
{
    tracing::debug!(documents = order.len(), "starting macro analysis");

    let parsed = parse_order(provider, order);
    let simulation = {
        let flow = flatten(order, &parsed);
        tracing::trace!(macros = flow.len(), "flattened execution flow");
        simulate(provider, &flow)
    };
    let report = AnalysisReport::new(parsed, simulation);

    tracing::debug!(
        variables = report.variables.len(),
        unresolved = report.unresolved.len(),
        snapshots = report.snapshots.len(),
        "macro analysis complete"
    );
    report
}
