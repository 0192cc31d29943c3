pub mod analysis;
mod config;
mod document;
mod error;
pub mod macros;
#[cfg(feature = "serde")]
mod preset;
mod rename;
mod report;
pub mod scanner;
mod scheduler;
mod workspace;

use std::collections::BTreeSet;

pub use analysis::analyze;
pub use config::Config;
pub use document::{Document, DocumentProvider, DocumentSet};
pub use error::Error;
pub use macros::{classify, parse_document, Macro, MacroId, MacroKind};
#[cfg(feature = "serde")]
pub use preset::{Preset, DEFAULT_CHARACTER_ID};
pub use rename::{rename_in_text, validate_new_name, RenameOutcome};
pub use report::{
    AnalysisReport, Occurrence, Simulation, UnresolvedVariable, VariableRecord, VariableStats,
};
pub use scheduler::Debounce;
pub use workspace::{AnalysisStatus, Workspace};

/// Names of every variable a single text writes or reads, sorted and de-duplicated.
pub fn find_variable_references(input: &str) -> Vec<String> {
    let mut variables = BTreeSet::new();

    for raw in scanner::Scanner::new(input) {
        if let Some(name) = classify(raw.inner).var_name() {
            variables.insert(name.to_string());
        }
    }

    variables.into_iter().collect()
}
