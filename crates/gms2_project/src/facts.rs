//! Lexical facts scanned from source text with regular expressions.
//!
//! Nothing here parses GML: declarations are picked out by pattern so the
//! viewer can colour project-defined names. Order of appearance is kept and
//! duplicates are not removed.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static ENUM_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\benum\s+([a-zA-Z_][a-zA-Z0-9_]*)").unwrap());
// `#macro` must not directly follow a word character
static MACRO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\W)#macro\s+([a-zA-Z_][a-zA-Z0-9_]*)").unwrap());
static GLOBALVAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bglobalvar\s+([a-zA-Z_][a-zA-Z0-9_]*)").unwrap());
static ENUM_BODY: Lazy<Regex> = Lazy::new(|| Regex::new(r"enum\s+\w+\s*\{([^}]*)\}").unwrap());
static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"//.*").unwrap());
static ASSIGNMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"=.*").unwrap());

/// Declarations found in a single file
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ContentFacts {
    pub enum_names: Vec<String>,
    pub enum_entries: Vec<String>,
    pub macros: Vec<String>,
    pub globalvars: Vec<String>,
}

impl ContentFacts {
    pub fn scan(content: &str) -> Self {
        Self {
            enum_names: captures(&ENUM_NAME, content),
            enum_entries: enum_entries(content),
            macros: captures(&MACRO, content),
            globalvars: captures(&GLOBALVAR, content),
        }
    }
}

fn captures(re: &Regex, content: &str) -> Vec<String> {
    re.captures_iter(content)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Entry names of every `enum Name { ... }` body, values and comments removed
fn enum_entries(content: &str) -> Vec<String> {
    let mut entries = Vec::new();
    for cap in ENUM_BODY.captures_iter(content) {
        let Some(body) = cap.get(1) else { continue };
        for raw in body.as_str().split(',') {
            let entry = LINE_COMMENT.replace_all(raw, "");
            let entry = ASSIGNMENT.replace_all(&entry, "");
            let entry = entry.trim();
            if !entry.is_empty() {
                entries.push(entry.to_string());
            }
        }
    }
    entries
}

/// Everything the highlighter needs to know about a project
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectFacts {
    pub resources: Vec<String>,
    pub scripts: Vec<String>,
    pub enum_names: Vec<String>,
    pub enum_entries: Vec<String>,
    pub macros: Vec<String>,
    pub globalvars: Vec<String>,
}

impl ProjectFacts {
    /// Append the declarations of one file
    pub fn extend(&mut self, facts: ContentFacts) {
        self.enum_names.extend(facts.enum_names);
        self.enum_entries.extend(facts.enum_entries);
        self.macros.extend(facts.macros);
        self.globalvars.extend(facts.globalvars);
    }
}
