use varflow::{Config, Document, DocumentSet, Workspace};

#[allow(dead_code)]
pub fn documents(entries: &[(&str, &str)]) -> DocumentSet {
    entries
        .iter()
        .map(|(id, content)| Document::new(*id, *content))
        .collect()
}

#[allow(dead_code)]
pub fn order(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

/// Workspace with every document enabled and in the order given.
#[allow(dead_code)]
pub fn create_workspace(entries: &[(&str, &str)]) -> Workspace {
    let ids: Vec<&str> = entries.iter().map(|(id, _)| *id).collect();
    Workspace::from_parts(Config::default(), documents(entries), order(&ids))
}

#[allow(dead_code)]
pub fn create_workspace_with_config(config: Config, entries: &[(&str, &str)]) -> Workspace {
    let ids: Vec<&str> = entries.iter().map(|(id, _)| *id).collect();
    Workspace::from_parts(config, documents(entries), order(&ids))
}
