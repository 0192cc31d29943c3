use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One prompt document participating in macro analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Document {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub content: String,
    #[cfg_attr(feature = "serde", serde(default = "default_enabled"))]
    pub enabled: bool,
    #[cfg_attr(feature = "serde", serde(default = "default_role"))]
    pub role: String,
    /// Structural placeholder with no editable text of its own
    #[cfg_attr(feature = "serde", serde(default))]
    pub marker: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub system_prompt: bool,
}

#[cfg(feature = "serde")]
fn default_enabled() -> bool {
    true
}

#[cfg(feature = "serde")]
fn default_role() -> String {
    "system".to_string()
}

impl Document {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            content: content.into(),
            enabled: true,
            role: "system".to_string(),
            marker: false,
            system_prompt: false,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Markers and system documents are exempt from bulk edits.
    pub fn is_structural(&self) -> bool {
        self.marker || self.system_prompt
    }
}

/// A trait for looking up documents during analysis.
pub trait DocumentProvider {
    /// Retrieve a document by id.
    fn document(&self, id: &str) -> Option<&Document>;
}

impl DocumentProvider for HashMap<String, Document> {
    fn document(&self, id: &str) -> Option<&Document> {
        self.get(id)
    }
}

impl DocumentProvider for [Document] {
    fn document(&self, id: &str) -> Option<&Document> {
        self.iter().find(|d| d.id == id)
    }
}

impl DocumentProvider for Vec<Document> {
    fn document(&self, id: &str) -> Option<&Document> {
        self.as_slice().document(id)
    }
}

/// Insertion-ordered document set keyed by id.
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    docs: Vec<Document>,
    index: HashMap<String, usize>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document. A replaced document keeps its position.
    pub fn insert(&mut self, doc: Document) -> Option<Document> {
        match self.index.get(&doc.id) {
            Some(&i) => Some(std::mem::replace(&mut self.docs[i], doc)),
            None => {
                self.index.insert(doc.id.clone(), self.docs.len());
                self.docs.push(doc);
                None
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Document> {
        let i = self.index.remove(id)?;
        let doc = self.docs.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        Some(doc)
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.index.get(id).map(|&i| &self.docs[i])
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Document> {
        match self.index.get(id) {
            Some(&i) => Some(&mut self.docs[i]),
            None => None,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.docs.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Document> {
        self.docs.iter_mut()
    }
}

impl DocumentProvider for DocumentSet {
    fn document(&self, id: &str) -> Option<&Document> {
        self.get(id)
    }
}

impl FromIterator<Document> for DocumentSet {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        let mut set = DocumentSet::new();
        for doc in iter {
            set.insert(doc);
        }
        set
    }
}

impl PartialEq for DocumentSet {
    fn eq(&self, other: &Self) -> bool {
        self.docs == other.docs
    }
}

impl Eq for DocumentSet {}
