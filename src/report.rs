use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::macros::{Macro, MacroId};

/// One document that defines or references a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Occurrence {
    pub document_id: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct VariableRecord {
    pub defined_in: Vec<Occurrence>,
    pub referenced_in: Vec<Occurrence>,
}

impl VariableRecord {
    /// Read somewhere, written nowhere.
    pub fn is_unresolved(&self) -> bool {
        self.defined_in.is_empty() && !self.referenced_in.is_empty()
    }

    /// Written somewhere, read nowhere.
    pub fn is_unreferenced(&self) -> bool {
        !self.defined_in.is_empty() && self.referenced_in.is_empty()
    }

    pub(crate) fn define(&mut self, document_id: &str, enabled: bool) {
        push_unique(&mut self.defined_in, document_id, enabled);
    }

    pub(crate) fn reference(&mut self, document_id: &str, enabled: bool) {
        push_unique(&mut self.referenced_in, document_id, enabled);
    }
}

// First occurrence per document wins.
fn push_unique(list: &mut Vec<Occurrence>, document_id: &str, enabled: bool) {
    if list.iter().any(|o| o.document_id == document_id) {
        return;
    }
    list.push(Occurrence {
        document_id: document_id.to_string(),
        enabled,
    });
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct UnresolvedVariable {
    pub var_name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct VariableStats {
    /// Variables referenced but never defined
    pub undefined_count: usize,
    /// Variables defined but never referenced
    pub unreferenced_count: usize,
}

/// Result of the single left-to-right fold over the execution flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Simulation {
    /// Value visible at each `getvar`, `None` when unset at that point
    pub snapshots: BTreeMap<MacroId, Option<String>>,
    /// Variable state after the last macro ran
    pub state: BTreeMap<String, Option<String>>,
    pub variables: BTreeMap<String, VariableRecord>,
}

/// Everything one analysis pass publishes to the editor.
///
/// Rebuilt wholesale on every pass; nothing here is edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AnalysisReport {
    /// Parsed macros of every document in the execution order
    pub macros: BTreeMap<String, Vec<Macro>>,
    pub variables: BTreeMap<String, VariableRecord>,
    pub unresolved: Vec<UnresolvedVariable>,
    pub snapshots: BTreeMap<MacroId, Option<String>>,
    pub final_state: BTreeMap<String, Option<String>>,
}

impl AnalysisReport {
    pub(crate) fn new(macros: BTreeMap<String, Vec<Macro>>, simulation: Simulation) -> Self {
        let unresolved = simulation
            .variables
            .iter()
            .filter(|(_, record)| record.is_unresolved())
            .map(|(name, _)| UnresolvedVariable {
                var_name: name.clone(),
            })
            .collect();

        Self {
            macros,
            variables: simulation.variables,
            unresolved,
            snapshots: simulation.snapshots,
            final_state: simulation.state,
        }
    }

    pub fn variable(&self, name: &str) -> Option<&VariableRecord> {
        self.variables.get(name)
    }

    /// All variable names in sorted order.
    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.keys().map(String::as_str).collect()
    }

    pub fn is_unresolved(&self, name: &str) -> bool {
        self.unresolved.iter().any(|u| u.var_name == name)
    }

    pub fn unreferenced(&self) -> Vec<&str> {
        self.variables
            .iter()
            .filter(|(_, record)| record.is_unreferenced())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn stats(&self) -> VariableStats {
        VariableStats {
            undefined_count: self.unresolved.len(),
            unreferenced_count: self
                .variables
                .values()
                .filter(|record| record.is_unreferenced())
                .count(),
        }
    }

    /// Simulated value at a `getvar`. `None` when unset or not a recorded `getvar`.
    pub fn snapshot(&self, id: &MacroId) -> Option<&str> {
        self.snapshots.get(id).and_then(|v| v.as_deref())
    }

    pub fn has_snapshot(&self, id: &MacroId) -> bool {
        self.snapshots.contains_key(id)
    }

    pub fn macros_for(&self, document_id: &str) -> &[Macro] {
        self.macros
            .get(document_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
