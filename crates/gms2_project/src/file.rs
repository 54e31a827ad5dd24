use serde::Serialize;

/// Tab stop used when normalizing source text
pub const TAB_WIDTH: usize = 4;

/// A source file as shown in the viewer: normalized text plus its line count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GmFile {
    #[serde(skip)]
    content: String,
    line_count: usize,
}

impl GmFile {
    /// Normalize raw file text: drop a leading BOM, unify line endings, expand tabs.
    pub fn from_source(raw: &str) -> Self {
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
        let content = raw
            .replace("\r\n", "\n")
            .replace('\r', "\n")
            .replace('\t', &" ".repeat(TAB_WIDTH));
        let line_count = content.lines().count();

        Self { content, line_count }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }
}
