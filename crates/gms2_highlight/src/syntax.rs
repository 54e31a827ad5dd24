use crate::highlight::TokenClass;
use gms2_project::ProjectFacts;
use std::path::Path;

pub const BUILTINS_FILE: &str = "builtins.txt";
pub const FUNCTIONS_FILE: &str = "functions.txt";

const BUNDLED_BUILTINS: &str = include_str!("../assets/builtins.txt");
const BUNDLED_FUNCTIONS: &str = include_str!("../assets/functions.txt");

/// Engine-provided names, one per line in the resource files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordLists {
    pub functions: Vec<String>,
    pub builtins: Vec<String>,
}

impl WordLists {
    /// The lists shipped with the crate
    pub fn bundled() -> Self {
        Self {
            functions: parse_lines(BUNDLED_FUNCTIONS),
            builtins: parse_lines(BUNDLED_BUILTINS),
        }
    }

    /// Read `functions.txt` and `builtins.txt` from `dir`, falling back to the
    /// bundled copy of any file that is not there.
    pub fn load(dir: Option<&Path>) -> anyhow::Result<Self> {
        Ok(Self {
            functions: read_list(dir, FUNCTIONS_FILE, BUNDLED_FUNCTIONS)?,
            builtins: read_list(dir, BUILTINS_FILE, BUNDLED_BUILTINS)?,
        })
    }
}

fn read_list(dir: Option<&Path>, name: &str, bundled: &str) -> anyhow::Result<Vec<String>> {
    let Some(path) = dir.map(|d| d.join(name)).filter(|p| p.is_file()) else {
        log::debug!("using bundled {}", name);
        return Ok(parse_lines(bundled));
    };
    let content = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
    log::debug!("loaded {}", path.display());
    Ok(parse_lines(&content))
}

fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Every word list the highlighter colours, engine and project alike
#[derive(Debug, Clone, Default)]
pub struct SyntaxInfo {
    pub functions: Vec<String>,
    pub builtins: Vec<String>,
    pub resources: Vec<String>,
    pub scripts: Vec<String>,
    pub enum_names: Vec<String>,
    pub enum_entries: Vec<String>,
    pub macros: Vec<String>,
    pub globalvars: Vec<String>,
}

impl SyntaxInfo {
    pub fn new(words: WordLists, facts: &ProjectFacts) -> Self {
        Self {
            functions: words.functions,
            builtins: words.builtins,
            resources: facts.resources.clone(),
            scripts: facts.scripts.clone(),
            enum_names: facts.enum_names.clone(),
            enum_entries: facts.enum_entries.clone(),
            macros: facts.macros.clone(),
            globalvars: facts.globalvars.clone(),
        }
    }

    /// Word list for a class; empty for classes matched by pattern
    pub fn words(&self, class: TokenClass) -> &[String] {
        match class {
            TokenClass::Function => &self.functions,
            TokenClass::Builtin => &self.builtins,
            TokenClass::Resource => &self.resources,
            TokenClass::Script => &self.scripts,
            TokenClass::EnumName => &self.enum_names,
            TokenClass::EnumEntry => &self.enum_entries,
            TokenClass::Macro => &self.macros,
            TokenClass::Globalvar => &self.globalvars,
            TokenClass::Keyword | TokenClass::Value | TokenClass::String | TokenClass::Comment => &[],
        }
    }
}
