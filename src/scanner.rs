use crate::rules::RuleTable;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanResult {
    pub classes: Vec<String>,
    pub counts: HashMap<String, usize>,
    pub files_scanned: usize,
}

// Returns the distinct atomic class names found in `text`, in first-seen
// order. Tokens whose alias prefix the rule table cannot resolve are not
// atomic classes and are ignored.
pub fn parse(text: &str, table: &RuleTable) -> Vec<String> {
    let mut counts = HashMap::new();
    parse_with_counts(text, table, &mut counts)
}

// Same as `parse`, but also counts every occurrence (duplicates included)
// into the caller's map.
pub fn parse_with_counts(
    text: &str,
    table: &RuleTable,
    counts: &mut HashMap<String, usize>,
) -> Vec<String> {
    let mut classes = Vec::new();
    for chunk in candidate_chunks(text) {
        let Some(token) = normalize_candidate(chunk) else {
            continue;
        };
        if !is_atomic_class(&token, table) {
            continue;
        }
        let count = counts.entry(token.clone()).or_insert(0);
        if *count == 0 {
            classes.push(token);
        }
        *count += 1;
    }
    classes
}

fn candidate_chunks(text: &str) -> impl Iterator<Item = &str> {
    text.split(|ch: char| ch.is_whitespace() || matches!(ch, '"' | '\'' | '<' | '>' | '='))
        .filter(|chunk| !chunk.is_empty())
}

// A chunk may carry selector context around the class name: a leading `.`
// or `#` and CSS escape backslashes (`.M-100\%`). Strip the lead-in up to
// the first letter and drop the escapes so attribute and selector forms
// normalize to the same token.
fn normalize_candidate(chunk: &str) -> Option<String> {
    let start = chunk.find(|ch: char| ch.is_ascii_alphabetic())?;
    let token: String = chunk[start..].chars().filter(|ch| *ch != '\\').collect();
    if token.is_empty() { None } else { Some(token) }
}

fn is_atomic_class(token: &str, table: &RuleTable) -> bool {
    let Some((alias, rest)) = token.split_once('-') else {
        return false;
    };
    if alias.is_empty() || !alias.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return false;
    }
    // A `--breakpoint` tail is not part of the suffix.
    let suffix = rest.split("--").next().unwrap_or(rest);
    if suffix.is_empty() {
        return false;
    }
    let Some(rule) = table.lookup_alias(alias) else {
        return false;
    };
    rule.variant_value(suffix).is_some() || rule.allow_custom
}

pub fn scan_paths(
    patterns: &[String],
    ignore_patterns: &[String],
    base_path: &Path,
    table: &RuleTable,
) -> Result<ScanResult, ScanError> {
    if patterns.is_empty() {
        return Err(ScanError {
            message: "scan requires at least one pattern".to_string(),
        });
    }

    let globset = build_globset(patterns)?;
    let ignore_set = build_globset(ignore_patterns)?;
    let mut result = ScanResult::default();

    let walker = WalkBuilder::new(base_path).hidden(false).build();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => continue,
        };
        if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(base_path).unwrap_or(path);
        if !globset.is_match(relative) && !globset.is_match(path) {
            continue;
        }
        if ignore_set.is_match(relative) || ignore_set.is_match(path) {
            continue;
        }
        scan_file(path, table, &mut result);
    }

    Ok(result)
}

fn scan_file(path: &Path, table: &RuleTable, result: &mut ScanResult) {
    let Ok(text) = std::fs::read_to_string(path) else {
        return;
    };
    result.files_scanned += 1;
    for class in parse_with_counts(&text, table, &mut result.counts) {
        result.classes.push(class);
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, ScanError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|err| ScanError {
            message: format!("invalid glob pattern '{}': {}", pattern, err),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|err| ScanError {
        message: format!("failed to build glob set: {}", err),
    })
}
