//! Preset JSON import and export.
//!
//! A preset holds a `prompts` array and a `prompt_order` array of per-character
//! orderings. Only the ordering for [`DEFAULT_CHARACTER_ID`] (or the first one
//! present) drives the execution order. Fields this crate does not model are
//! carried through export untouched.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::{json, Map, Value};

use crate::config::Config;
use crate::document::{Document, DocumentSet};
use crate::error::Error;
use crate::workspace::Workspace;

pub const DEFAULT_CHARACTER_ID: u64 = 100001;

#[derive(Debug, Clone, Default)]
pub struct Preset {
    raw: Value,
}

impl Preset {
    /// Parse preset JSON into a document set and an execution order.
    pub fn parse(json: &str) -> Result<(Self, DocumentSet, Vec<String>), Error> {
        let raw: Value = serde_json::from_str(json)?;
        if !raw.is_object() {
            return Err(Error::Preset("top-level value is not an object".to_string()));
        }

        let prompts: &[Value] = raw
            .get("prompts")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let mut documents = DocumentSet::new();
        let mut injection: HashMap<String, i64> = HashMap::new();
        for prompt in prompts {
            let Some(doc) = document_from_value(prompt) else {
                tracing::warn!("skipping preset prompt without identifier or name");
                continue;
            };
            injection.insert(doc.id.clone(), injection_order(prompt));
            documents.insert(doc);
        }

        let order = match chosen_order(&raw).and_then(|entry| entry.get("order")?.as_array()) {
            Some(entries) => ordered_from_entries(entries, &mut documents, &injection),
            None => default_order(prompts),
        };

        tracing::debug!(
            prompts = documents.len(),
            ordered = order.len(),
            "parsed preset"
        );
        Ok((Self { raw }, documents, order))
    }

    /// Parse preset JSON straight into an analyzed workspace.
    pub fn load(json: &str, config: Config) -> Result<(Self, Workspace), Error> {
        let (preset, documents, order) = Self::parse(json)?;
        Ok((preset, Workspace::from_parts(config, documents, order)))
    }

    /// Serialize the preset with the workspace's documents and execution order.
    pub fn to_json(&self, documents: &DocumentSet, order: &[String]) -> Result<String, Error> {
        let mut preset = match &self.raw {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };

        let originals: HashMap<String, &Map<String, Value>> = preset
            .get("prompts")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|p| {
                let obj = p.as_object()?;
                Some((prompt_id(p)?.to_string(), obj))
            })
            .collect();

        let prompts: Vec<Value> = documents
            .iter()
            .map(|doc| {
                let mut obj = originals.get(&doc.id).map(|o| (*o).clone()).unwrap_or_default();
                obj.insert("identifier".to_string(), json!(doc.id));
                obj.insert("name".to_string(), json!(doc.name));
                obj.insert("content".to_string(), json!(doc.content));
                obj.insert("role".to_string(), json!(doc.role));
                obj.insert("enabled".to_string(), json!(doc.enabled));
                obj.insert("system_prompt".to_string(), json!(doc.system_prompt));
                obj.insert("marker".to_string(), json!(doc.marker));
                Value::Object(obj)
            })
            .collect();

        let order_entries: Vec<Value> = order
            .iter()
            .filter_map(|id| documents.get(id))
            .map(|doc| json!({ "identifier": doc.id, "enabled": doc.enabled }))
            .collect();

        preset.insert("prompts".to_string(), Value::Array(prompts));
        write_order(&mut preset, order_entries);

        Ok(serde_json::to_string_pretty(&Value::Object(preset))?)
    }
}

fn prompt_id(prompt: &Value) -> Option<&str> {
    ["identifier", "name"]
        .iter()
        .filter_map(|key| prompt.get(*key)?.as_str())
        .find(|s| !s.is_empty())
}

fn injection_order(prompt: &Value) -> i64 {
    prompt.get("injection_order").and_then(Value::as_i64).unwrap_or(0)
}

fn flag(prompt: &Value, key: &str) -> bool {
    prompt.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn document_from_value(prompt: &Value) -> Option<Document> {
    let id = prompt_id(prompt)?.to_string();
    let text = |key: &str| prompt.get(key).and_then(Value::as_str).map(str::to_string);

    Some(Document {
        name: text("name").unwrap_or_else(|| id.clone()),
        content: text("content").unwrap_or_default(),
        enabled: prompt.get("enabled").and_then(Value::as_bool).unwrap_or(true),
        role: text("role").unwrap_or_else(|| "system".to_string()),
        marker: flag(prompt, "marker"),
        system_prompt: flag(prompt, "system_prompt"),
        id,
    })
}

/// The ordering entry for the default character, else the first one.
fn chosen_order(raw: &Value) -> Option<&Value> {
    let entries = raw.get("prompt_order")?.as_array()?;
    entries
        .iter()
        .find(|e| e.get("character_id").and_then(Value::as_u64) == Some(DEFAULT_CHARACTER_ID))
        .or_else(|| entries.first())
}

fn ordered_from_entries(
    entries: &[Value],
    documents: &mut DocumentSet,
    injection: &HashMap<String, i64>,
) -> Vec<String> {
    let mut order = Vec::new();
    for entry in entries {
        let Some(id) = entry.get("identifier").and_then(Value::as_str) else {
            continue;
        };
        let Some(doc) = documents.get_mut(id) else {
            continue;
        };
        doc.enabled = entry.get("enabled").and_then(Value::as_bool).unwrap_or(true);
        if !order.iter().any(|o| o == id) {
            order.push(id.to_string());
        }
    }

    let mut rest: Vec<&Document> = documents
        .iter()
        .filter(|d| !order.contains(&d.id))
        .collect();
    rest.sort_by(|a, b| {
        let ia = injection.get(&a.id).copied().unwrap_or(0);
        let ib = injection.get(&b.id).copied().unwrap_or(0);
        ia.cmp(&ib)
            .then_with(|| match (a.system_prompt, b.system_prompt) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => Ordering::Equal,
            })
            .then_with(|| a.name.cmp(&b.name))
    });
    order.extend(rest.into_iter().map(|d| d.id.clone()));
    order
}

/// All prompts not explicitly disabled, stably sorted by injection order.
fn default_order(prompts: &[Value]) -> Vec<String> {
    let mut enabled: Vec<&Value> = prompts
        .iter()
        .filter(|p| p.get("enabled").and_then(Value::as_bool) != Some(false))
        .collect();
    enabled.sort_by_key(|p| injection_order(p));

    let mut order: Vec<String> = Vec::new();
    for id in enabled.into_iter().filter_map(prompt_id) {
        if !order.iter().any(|o| o == id) {
            order.push(id.to_string());
        }
    }
    order
}

fn write_order(preset: &mut Map<String, Value>, entries: Vec<Value>) {
    let Some(Value::Array(orders)) = preset.get_mut("prompt_order") else {
        preset.insert(
            "prompt_order".to_string(),
            json!([{ "character_id": DEFAULT_CHARACTER_ID, "order": entries }]),
        );
        return;
    };

    let index = orders
        .iter()
        .position(|e| e.get("character_id").and_then(Value::as_u64) == Some(DEFAULT_CHARACTER_ID))
        .or(if orders.is_empty() { None } else { Some(0) });

    match index.and_then(|i| orders[i].as_object_mut()) {
        Some(entry) => {
            entry.insert("order".to_string(), Value::Array(entries));
        }
        None => orders.push(json!({ "character_id": DEFAULT_CHARACTER_ID, "order": entries })),
    }
}
