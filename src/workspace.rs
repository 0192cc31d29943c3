//! The editor-side store that owns documents and the execution order and
//! keeps the analysis report current.
//!
//! Structural actions re-analyze synchronously. Content edits are coalesced by a
//! trailing-edge debounce and analyzed when [`Workspace::poll`] sees the deadline pass.

use std::borrow::Cow;
use std::time::Instant;

use uuid::Uuid;

use crate::analysis::analyze;
use crate::config::Config;
use crate::document::{Document, DocumentSet};
use crate::error::Error;
use crate::macros::MacroId;
use crate::rename::{rename_in_text, validate_new_name, RenameOutcome};
use crate::report::AnalysisReport;
use crate::scheduler::Debounce;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStatus {
    /// The report reflects the current documents
    Idle,
    /// A content edit is waiting for its debounce deadline
    Pending,
}

#[derive(Debug, Clone)]
pub struct Workspace {
    config: Config,
    documents: DocumentSet,
    order: Vec<String>,
    report: AnalysisReport,
    debounce: Debounce,
    selected_document: Option<String>,
    selected_variable: Option<String>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::from_parts(config, DocumentSet::new(), Vec::new())
    }

    /// Build a workspace from an existing document set and order, analyzing once.
    ///
    /// Repeated ids in `order` keep their first position.
    pub fn from_parts(config: Config, documents: DocumentSet, order: Vec<String>) -> Self {
        let mut ws = Self {
            debounce: Debounce::new(config.debounce_delay()),
            config,
            documents,
            order: Vec::new(),
            report: AnalysisReport::default(),
            selected_document: None,
            selected_variable: None,
        };
        ws.order = dedup(order);
        ws.analyze();
        ws
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn documents(&self) -> &DocumentSet {
        &self.documents
    }

    pub fn document(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn is_in_order(&self, id: &str) -> bool {
        self.order.iter().any(|o| o == id)
    }

    /// Documents in execution order, skipping ids missing from the set.
    pub fn ordered_documents(&self) -> impl Iterator<Item = &Document> {
        self.order.iter().filter_map(|id| self.documents.get(id))
    }

    pub fn report(&self) -> &AnalysisReport {
        &self.report
    }

    pub fn status(&self) -> AnalysisStatus {
        if self.debounce.is_pending() {
            AnalysisStatus::Pending
        } else {
            AnalysisStatus::Idle
        }
    }

    /// Re-run the full analysis now and replace the report.
    pub fn analyze(&mut self) -> &AnalysisReport {
        self.report = analyze(&self.documents, &self.order);
        &self.report
    }

    pub fn document_for_macro(&self, id: &MacroId) -> Option<&Document> {
        self.documents.get(&id.document_id)
    }

    // --- Order ---

    pub fn set_order(&mut self, order: Vec<String>) {
        self.order = dedup(order);
        self.analyze();
    }

    pub fn move_to_top(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(i) if i > 0 => {
                let id = self.order.remove(i);
                self.order.insert(0, id);
                self.analyze();
                true
            }
            _ => false,
        }
    }

    pub fn move_to_bottom(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(i) if i + 1 < self.order.len() => {
                let id = self.order.remove(i);
                self.order.push(id);
                self.analyze();
                true
            }
            _ => false,
        }
    }

    /// Put a known document into the order right after the selected document,
    /// or at the front when nothing in the order is selected.
    pub fn add_to_order(&mut self, id: &str) -> Result<bool, Error> {
        if !self.documents.contains(id) {
            return Err(Error::UnknownDocument(id.to_string()));
        }
        if self.is_in_order(id) {
            return Ok(false);
        }
        let at = self.insertion_point();
        self.order.insert(at, id.to_string());
        self.analyze();
        Ok(true)
    }

    /// Drop a document from the order, keeping it in the set.
    pub fn hide(&mut self, id: &str) -> bool {
        let before = self.order.len();
        self.order.retain(|o| o != id);
        let changed = self.order.len() != before;
        if changed {
            self.analyze();
        }
        changed
    }

    // --- Documents ---

    /// Add a document (or replace one with the same id) and analyze.
    ///
    /// New documents enter the order after the selected document.
    pub fn insert_document(&mut self, doc: Document) {
        let id = doc.id.clone();
        if self.documents.insert(doc).is_none() && !self.is_in_order(&id) {
            let at = self.insertion_point();
            self.order.insert(at, id);
        }
        self.analyze();
    }

    /// Create an empty, enabled document with a fresh id and select it.
    pub fn create_document(&mut self) -> String {
        let id = Uuid::new_v4().to_string();
        let doc = Document::new(id.clone(), self.config.new_document_content())
            .with_name(self.config.new_document_name.clone());
        self.insert_document(doc);
        self.select_document(&id);
        id
    }

    /// Copy a document under a fresh id, right after the original in the order.
    ///
    /// The copy is never a marker or system document.
    pub fn duplicate_document(&mut self, id: &str) -> Result<String, Error> {
        let original = self
            .documents
            .get(id)
            .ok_or_else(|| Error::UnknownDocument(id.to_string()))?;

        let new_id = Uuid::new_v4().to_string();
        let copy = Document {
            id: new_id.clone(),
            name: self.config.copy_name(&original.name),
            marker: false,
            system_prompt: false,
            ..original.clone()
        };
        self.documents.insert(copy);

        match self.position(id) {
            Some(i) => self.order.insert(i + 1, new_id.clone()),
            None => self.order.push(new_id.clone()),
        }
        self.analyze();
        self.select_document(&new_id);
        Ok(new_id)
    }

    /// Delete a document from the set and the order.
    pub fn remove(&mut self, id: &str) -> Option<Document> {
        let removed = self.documents.remove(id)?;
        self.order.retain(|o| o != id);
        if self.selected_document.as_deref() == Some(id) {
            self.selected_document = None;
        }
        self.analyze();
        Some(removed)
    }

    /// Delete several documents with one analysis pass.
    ///
    /// Marker and system documents are kept when `protect_structural` is set.
    pub fn remove_many<S: AsRef<str>>(&mut self, ids: &[S]) -> Vec<String> {
        let mut removed = Vec::new();
        for id in ids {
            let id = id.as_ref();
            let Some(doc) = self.documents.get(id) else {
                continue;
            };
            if self.config.protect_structural && doc.is_structural() {
                tracing::debug!(document_id = %id, "skipping structural document in bulk removal");
                continue;
            }
            self.documents.remove(id);
            self.order.retain(|o| o != id);
            if self.selected_document.as_deref() == Some(id) {
                self.selected_document = None;
            }
            removed.push(id.to_string());
        }
        if !removed.is_empty() {
            self.analyze();
        }
        removed
    }

    /// Flip a document's enabled flag. Returns the new value.
    pub fn toggle_enabled(&mut self, id: &str) -> Result<bool, Error> {
        let doc = self.document_mut(id)?;
        doc.enabled = !doc.enabled;
        let enabled = doc.enabled;
        self.analyze();
        Ok(enabled)
    }

    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> Result<(), Error> {
        let doc = self.document_mut(id)?;
        if doc.enabled != enabled {
            doc.enabled = enabled;
            self.analyze();
        }
        Ok(())
    }

    pub fn set_name(&mut self, id: &str, name: impl Into<String>) -> Result<(), Error> {
        self.document_mut(id)?.name = name.into();
        Ok(())
    }

    pub fn set_role(&mut self, id: &str, role: impl Into<String>) -> Result<(), Error> {
        self.document_mut(id)?.role = role.into();
        Ok(())
    }

    // --- Content edits ---

    /// Replace a document's text and schedule a debounced analysis.
    pub fn edit_content(
        &mut self,
        id: &str,
        content: impl Into<String>,
        now: Instant,
    ) -> Result<(), Error> {
        self.document_mut(id)?.content = content.into();
        self.debounce.schedule(now);
        Ok(())
    }

    /// Run the pending analysis if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.debounce.fire(now) {
            self.analyze();
            true
        } else {
            false
        }
    }

    /// Run the pending analysis immediately, if any.
    pub fn flush(&mut self) -> bool {
        if self.debounce.take() {
            self.analyze();
            true
        } else {
            false
        }
    }

    /// Wait out the pending debounce deadline, then analyze.
    #[cfg(feature = "async")]
    pub async fn settle(&mut self) -> bool {
        let Some(deadline) = self.debounce.deadline() else {
            return false;
        };
        tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
        self.flush()
    }

    // --- Rename ---

    /// Rename a variable across every document in the set.
    ///
    /// Validation happens before any text changes; on failure nothing is touched.
    pub fn rename_variable(&mut self, old_name: &str, new_name: &str) -> Result<RenameOutcome, Error> {
        self.flush();
        let new_name = validate_new_name(old_name, new_name, &self.report.variables)?;

        let mut outcome = RenameOutcome {
            old_name: old_name.to_string(),
            new_name: new_name.clone(),
            rewritten: 0,
            documents: Vec::new(),
        };
        if new_name == old_name {
            return Ok(outcome);
        }

        for doc in self.documents.iter_mut() {
            let (text, count) = rename_in_text(&doc.content, old_name, &new_name);
            let rewritten = match text {
                Cow::Owned(s) => Some(s),
                Cow::Borrowed(_) => None,
            };
            if let Some(s) = rewritten {
                doc.content = s;
                outcome.rewritten += count;
                outcome.documents.push(doc.id.clone());
            }
        }

        self.analyze();
        if self.selected_variable.as_deref() == Some(old_name) {
            self.selected_variable = Some(new_name.clone());
        }

        tracing::info!(
            old = %old_name,
            new = %new_name,
            rewritten = outcome.rewritten,
            documents = outcome.documents.len(),
            "renamed variable"
        );
        Ok(outcome)
    }

    // --- Selection ---

    pub fn select_document(&mut self, id: &str) {
        self.selected_document = Some(id.to_string());
        self.selected_variable = None;
    }

    pub fn select_variable(&mut self, name: &str) {
        if name.is_empty() {
            return;
        }
        self.selected_variable = Some(name.to_string());
        self.selected_document = None;
    }

    pub fn clear_selection(&mut self) {
        self.selected_document = None;
        self.selected_variable = None;
    }

    pub fn selected_document(&self) -> Option<&str> {
        self.selected_document.as_deref()
    }

    pub fn selected_variable(&self) -> Option<&str> {
        self.selected_variable.as_deref()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.order.iter().position(|o| o == id)
    }

    fn insertion_point(&self) -> usize {
        self.selected_document
            .as_deref()
            .and_then(|sel| self.position(sel))
            .map_or(0, |i| i + 1)
    }

    fn document_mut(&mut self, id: &str) -> Result<&mut Document, Error> {
        self.documents
            .get_mut(id)
            .ok_or_else(|| Error::UnknownDocument(id.to_string()))
    }
}

fn dedup(order: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    order.into_iter().filter(|id| seen.insert(id.clone())).collect()
}
