use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::error::Error;
use crate::macros::{classify, name_span, MacroKind};
use crate::report::VariableRecord;
use crate::scanner::Scanner;

/// Summary of a completed variable rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOutcome {
    pub old_name: String,
    pub new_name: String,
    /// Number of macro occurrences rewritten
    pub rewritten: usize,
    /// Ids of documents whose content changed
    pub documents: Vec<String>,
}

/// Characters that would change how a rewritten macro is split or delimited.
const RESERVED: [char; 3] = [':', '{', '}'];

/// Check a rename target against the currently known variables.
///
/// Returns the trimmed new name. Renaming a variable to itself is accepted.
pub fn validate_new_name(
    old_name: &str,
    new_name: &str,
    variables: &BTreeMap<String, VariableRecord>,
) -> Result<String, Error> {
    if !variables.contains_key(old_name) {
        return Err(Error::UnknownVariable(old_name.to_string()));
    }

    let trimmed = new_name.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyName);
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(Error::InvalidName(trimmed.to_string()));
    }
    if trimmed.contains(RESERVED) {
        return Err(Error::ReservedCharacter(trimmed.to_string()));
    }
    if trimmed != old_name && variables.contains_key(trimmed) {
        return Err(Error::NameTaken(trimmed.to_string()));
    }

    Ok(trimmed.to_string())
}

/// Rewrite the name segment of every `setvar`/`getvar` macro naming `old_name`.
///
/// Everything outside the name segment is kept byte for byte. Returns
/// `Cow::Borrowed` with a count of zero when nothing matched.
pub fn rename_in_text<'b>(text: &'b str, old_name: &str, new_name: &str) -> (Cow<'b, str>, usize) {
    let mut scanner = Scanner::new(text);
    let mut result: Option<String> = None;
    let mut last_pos = 0;
    let mut count = 0;

    while let Some((raw, range)) = scanner.scan_next() {
        let kind = classify(raw.inner);
        let targets_old = match &kind {
            MacroKind::SetVar { name: Some(n), .. } => n == old_name,
            MacroKind::GetVar { name } => name == old_name,
            _ => false,
        };
        if !targets_old {
            continue;
        }
        let Some(span) = name_span(raw.full, &kind) else {
            continue;
        };

        let res = result.get_or_insert_with(|| String::with_capacity(text.len() + 16));
        let name_start = range.start + span.start;
        let name_end = range.start + span.end;
        res.push_str(&text[last_pos..name_start]);
        res.push_str(new_name);
        last_pos = name_end;
        count += 1;
    }

    match result {
        Some(mut res) => {
            res.push_str(&text[last_pos..]);
            (Cow::Owned(res), count)
        }
        None => (Cow::Borrowed(text), 0),
    }
}
