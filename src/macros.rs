//! Macro classification.
//!
//! A macro body is classified by a first-match priority grammar:
//! `//` comments, then `setvar::`, then `getvar::`, then a generic
//! `tag::param::param` form. The `::` separator cannot be escaped.

use std::fmt;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Serialize, Serializer};

use crate::scanner::Scanner;

const SEPARATOR: &str = "::";
const COMMENT_PREFIX: &str = "//";
const SETVAR_PREFIX: &str = "setvar::";
const GETVAR_PREFIX: &str = "getvar::";
const UNKNOWN_TAG: &str = "unknown";

/// Identity of one macro occurrence: owning document plus byte offset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MacroId {
    pub document_id: String,
    pub offset: usize,
}

impl MacroId {
    pub fn new(document_id: impl Into<String>, offset: usize) -> Self {
        Self {
            document_id: document_id.into(),
            offset,
        }
    }
}

impl fmt::Display for MacroId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.document_id, self.offset)
    }
}

#[cfg(feature = "serde")]
impl Serialize for MacroId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum MacroKind {
    Comment,
    SetVar {
        name: Option<String>,
        value: Option<String>,
    },
    /// `name` is empty, never absent, when nothing follows `getvar::`
    GetVar { name: String },
    /// Any other macro; `tag` is `unknown` when the first segment is empty
    Other { tag: String, params: Vec<String> },
}

impl MacroKind {
    /// The macro's type tag as the editor displays it.
    pub fn tag(&self) -> &str {
        match self {
            MacroKind::Comment => "comment",
            MacroKind::SetVar { .. } => "setvar",
            MacroKind::GetVar { .. } => "getvar",
            MacroKind::Other { tag, .. } => tag,
        }
    }

    /// Name of the variable written or read. An empty `getvar` name is not a variable.
    pub fn var_name(&self) -> Option<&str> {
        match self {
            MacroKind::SetVar { name, .. } => name.as_deref(),
            MacroKind::GetVar { name } if !name.is_empty() => Some(name),
            _ => None,
        }
    }
}

/// A classified macro occurrence inside one document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Macro {
    pub id: MacroId,
    pub full: String,
    pub inner: String,
    /// Byte range of `full` in the owning document's content
    pub range: Range<usize>,
    pub kind: MacroKind,
}

impl Macro {
    pub fn document_id(&self) -> &str {
        &self.id.document_id
    }

    pub fn var_name(&self) -> Option<&str> {
        self.kind.var_name()
    }

    pub fn value(&self) -> Option<&str> {
        match &self.kind {
            MacroKind::SetVar { value, .. } => value.as_deref(),
            _ => None,
        }
    }

    pub fn params(&self) -> &[String] {
        match &self.kind {
            MacroKind::Other { params, .. } => params,
            _ => &[],
        }
    }

    pub fn is_setvar(&self) -> bool {
        matches!(self.kind, MacroKind::SetVar { .. })
    }

    pub fn is_getvar(&self) -> bool {
        matches!(self.kind, MacroKind::GetVar { .. })
    }
}

/// Classify a trimmed macro body.
pub fn classify(inner: &str) -> MacroKind {
    if inner.starts_with(COMMENT_PREFIX) {
        return MacroKind::Comment;
    }

    if let Some(rest) = inner.strip_prefix(SETVAR_PREFIX) {
        let mut parts = rest.split(SEPARATOR);
        let name = parts.next().and_then(non_empty);
        let value = parts.next().and_then(non_empty);
        return MacroKind::SetVar { name, value };
    }

    if let Some(rest) = inner.strip_prefix(GETVAR_PREFIX) {
        return MacroKind::GetVar {
            name: rest.trim().to_string(),
        };
    }

    let mut parts = inner.split(SEPARATOR).map(str::trim);
    let tag = match parts.next() {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => UNKNOWN_TAG.to_string(),
    };
    MacroKind::Other {
        tag,
        params: parts.map(str::to_string).collect(),
    }
}

fn non_empty(segment: &str) -> Option<String> {
    let trimmed = segment.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Tokenize and classify every macro in one document's content.
pub fn parse_document(document_id: &str, content: &str) -> Vec<Macro> {
    let mut scanner = Scanner::new(content);
    let mut macros = Vec::new();

    while let Some((raw, range)) = scanner.scan_next() {
        macros.push(Macro {
            id: MacroId::new(document_id, raw.offset),
            full: raw.full.to_string(),
            inner: raw.inner.to_string(),
            range,
            kind: classify(raw.inner),
        });
    }

    macros
}

/// Byte range of the variable name inside a `setvar`/`getvar` macro's `full` text.
///
/// Returns `None` for other kinds and for nameless macros.
pub(crate) fn name_span(full: &str, kind: &MacroKind) -> Option<Range<usize>> {
    let prefix = match kind {
        MacroKind::SetVar { name: Some(_), .. } => SETVAR_PREFIX,
        MacroKind::GetVar { name } if !name.is_empty() => GETVAR_PREFIX,
        _ => return None,
    };

    let body = full.get(2..full.len().checked_sub(2)?)?;
    let inner_start = 2 + body.len() - body.trim_start().len();
    let rest = body.trim().strip_prefix(prefix)?;
    let segment = match kind {
        MacroKind::SetVar { .. } => rest.split(SEPARATOR).next()?,
        _ => rest,
    };
    let start = inner_start + prefix.len() + segment.len() - segment.trim_start().len();
    Some(start..start + segment.trim().len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_wins_over_everything() {
        assert_eq!(classify("// setvar::x::1"), MacroKind::Comment);
    }

    #[test]
    fn setvar_extra_segments_ignored() {
        assert_eq!(
            classify("setvar:: x :: 1 :: 2"),
            MacroKind::SetVar {
                name: Some("x".to_string()),
                value: Some("1".to_string()),
            }
        );
    }

    #[test]
    fn setvar_empty_segments_are_none() {
        assert_eq!(
            classify("setvar::"),
            MacroKind::SetVar { name: None, value: None }
        );
        assert_eq!(
            classify("setvar::x::  "),
            MacroKind::SetVar {
                name: Some("x".to_string()),
                value: None,
            }
        );
    }

    #[test]
    fn getvar_name_may_be_empty() {
        assert_eq!(
            classify("getvar::"),
            MacroKind::GetVar { name: String::new() }
        );
    }

    #[test]
    fn generic_macro_splits_params() {
        assert_eq!(
            classify("random:: a ::b"),
            MacroKind::Other {
                tag: "random".to_string(),
                params: vec!["a".to_string(), "b".to_string()],
            }
        );
        assert_eq!(
            classify(""),
            MacroKind::Other {
                tag: "unknown".to_string(),
                params: vec![],
            }
        );
    }

    #[test]
    fn prefix_match_is_case_sensitive() {
        assert_eq!(classify("SETVAR::x::1").tag(), "SETVAR");
        let spaced = classify("setvar ::x::1");
        assert_eq!(spaced.tag(), "setvar");
        assert!(matches!(spaced, MacroKind::Other { .. }));
    }

    #[test]
    fn name_span_points_at_the_name() {
        for content in ["{{  setvar::  score ::10 }}", "{{getvar::score}}", "{{getvar:: score\n}}"] {
            let parsed = parse_document("d", content);
            let m = &parsed[0];
            let span = name_span(&m.full, &m.kind).unwrap();
            assert_eq!(&m.full[span], "score");
        }
    }

    #[test]
    fn name_span_skips_nameless_macros() {
        let parsed = parse_document("d", "{{setvar::::1}}{{getvar::}}{{// x}}");
        assert!(parsed.iter().all(|m| name_span(&m.full, &m.kind).is_none()));
    }
}
