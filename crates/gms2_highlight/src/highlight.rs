use crate::keywords;
use crate::syntax::SyntaxInfo;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::ops::Range;

// Word lists can hold thousands of alternatives
const WORD_LIST_SIZE_LIMIT: usize = 64 << 20;

static KEYWORD: Lazy<Regex> = Lazy::new(|| {
    let words: Vec<&str> = keywords::keywords().collect();
    word_regex(&words).unwrap()
});
static BRACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[{}]").unwrap());
static MACRO_KEYWORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"#macro\b").unwrap());
static VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(0x[0-9a-fA-F]+|\$[0-9a-fA-F]+|#[0-9a-fA-F]+|b[01]+|\d+\.?\d*|\.\d+)\b").unwrap()
});
static STRING: Lazy<Regex> = Lazy::new(|| Regex::new(r#""(\\.|[^"\\])*""#).unwrap());
static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"//.*").unwrap());

/// What a piece of source text is coloured as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenClass {
    Function,
    Builtin,
    Resource,
    Script,
    EnumName,
    EnumEntry,
    Macro,
    Globalvar,
    Keyword,
    Value,
    String,
    Comment,
}

impl TokenClass {
    /// Classes coloured from word lists, in pass order
    pub const WORD_CLASSES: [TokenClass; 8] = [
        TokenClass::Function,
        TokenClass::Builtin,
        TokenClass::Resource,
        TokenClass::Script,
        TokenClass::EnumName,
        TokenClass::EnumEntry,
        TokenClass::Macro,
        TokenClass::Globalvar,
    ];

    pub const ALL: [TokenClass; 12] = [
        TokenClass::Function,
        TokenClass::Builtin,
        TokenClass::Resource,
        TokenClass::Script,
        TokenClass::EnumName,
        TokenClass::EnumEntry,
        TokenClass::Macro,
        TokenClass::Globalvar,
        TokenClass::Keyword,
        TokenClass::Value,
        TokenClass::String,
        TokenClass::Comment,
    ];

    /// Name used as the key in `styles.json`
    pub fn as_str(self) -> &'static str {
        match self {
            TokenClass::Function => "function",
            TokenClass::Builtin => "builtin",
            TokenClass::Resource => "resource",
            TokenClass::Script => "script",
            TokenClass::EnumName => "enum_name",
            TokenClass::EnumEntry => "enum_entry",
            TokenClass::Macro => "macro",
            TokenClass::Globalvar => "globalvar",
            TokenClass::Keyword => "keyword",
            TokenClass::Value => "value",
            TokenClass::String => "string",
            TokenClass::Comment => "comment",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.as_str() == name)
    }
}

/// A run of text with a single colour. `None` is plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub range: Range<usize>,
    pub class: Option<TokenClass>,
}

/// `\b(w1|w2|...)\b` over escaped words; `None` for an empty list
fn word_regex<S: AsRef<str>>(words: &[S]) -> Option<Regex> {
    if words.is_empty() {
        return None;
    }
    let alternatives: Vec<String> = words.iter().map(|w| regex::escape(w.as_ref())).collect();
    let pattern = format!(r"\b({})\b", alternatives.join("|"));
    match RegexBuilder::new(&pattern).size_limit(WORD_LIST_SIZE_LIMIT).build() {
        Ok(re) => Some(re),
        Err(e) => {
            log::warn!("word list of {} entries not highlighted: {}", words.len(), e);
            None
        }
    }
}

/// Matches of `re` not directly preceded by a character rejected by `preceded_by`
fn matches_not_after(
    re: &Regex,
    text: &str,
    preceded_by: impl Fn(char) -> bool,
) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    while start <= text.len() {
        let Some(m) = re.find_at(text, start) else { break };
        let step = text[m.start()..].chars().next().map_or(1, char::len_utf8);

        if text[..m.start()].chars().next_back().is_some_and(&preceded_by) {
            start = m.start() + step;
            continue;
        }
        ranges.push(m.range());
        start = if m.end() > m.start() { m.end() } else { m.end() + step };
    }
    ranges
}

/// Compiled highlighting passes for one project
pub struct Highlighter {
    word_passes: Vec<(TokenClass, Regex)>,
}

impl Highlighter {
    pub fn new(syntax: &SyntaxInfo) -> Self {
        let word_passes = TokenClass::WORD_CLASSES
            .into_iter()
            .filter_map(|class| word_regex(syntax.words(class)).map(|re| (class, re)))
            .collect();
        Self { word_passes }
    }

    /// Split `text` into coloured segments covering all of it
    pub fn highlight(&self, text: &str) -> Vec<Segment> {
        let mut classes: Vec<Option<TokenClass>> = vec![None; text.len()];
        let mut paint = |range: Range<usize>, class: TokenClass| {
            classes[range].fill(Some(class));
        };

        for (class, re) in &self.word_passes {
            for m in re.find_iter(text) {
                paint(m.range(), *class);
            }
        }

        for re in [&*KEYWORD, &*BRACE, &*MACRO_KEYWORD] {
            for m in re.find_iter(text) {
                paint(m.range(), TokenClass::Keyword);
            }
        }

        for range in matches_not_after(&VALUE, text, |c| c.is_ascii_alphabetic() || c == '_') {
            paint(range, TokenClass::Value);
        }

        for m in STRING.find_iter(text) {
            paint(m.range(), TokenClass::String);
        }

        for m in COMMENT.find_iter(text) {
            paint(m.range(), TokenClass::Comment);
        }

        collapse(&classes)
    }
}

/// Merge per-byte classes into runs
fn collapse(classes: &[Option<TokenClass>]) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    for (i, class) in classes.iter().enumerate() {
        match segments.last_mut() {
            Some(last) if last.class == *class => last.range.end = i + 1,
            _ => segments.push(Segment {
                range: i..i + 1,
                class: *class,
            }),
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::WordLists;
    use gms2_project::ProjectFacts;

    fn highlighter() -> Highlighter {
        let words = WordLists {
            functions: vec!["draw_text".into(), "draw".into()],
            builtins: vec!["x".into(), "room_speed".into()],
        };
        let facts = ProjectFacts {
            resources: vec!["obj_player".into()],
            scripts: vec!["scr_move".into()],
            enum_names: vec!["Dir".into()],
            enum_entries: vec!["Up".into()],
            macros: vec!["SPEED".into()],
            globalvars: vec!["score_total".into()],
        };
        Highlighter::new(&SyntaxInfo::new(words, &facts))
    }

    /// (text, class) for every coloured segment
    fn tokens(text: &str) -> Vec<(&str, TokenClass)> {
        highlighter()
            .highlight(text)
            .into_iter()
            .filter_map(|s| s.class.map(|c| (&text[s.range], c)))
            .collect()
    }

    #[test]
    fn test_segments_cover_text() {
        let text = "var a = \"héllo\"; // ünïcode\nx = 1;";
        let segments = highlighter().highlight(text);
        assert_eq!(segments.first().unwrap().range.start, 0);
        assert_eq!(segments.last().unwrap().range.end, text.len());
        for pair in segments.windows(2) {
            assert_eq!(pair[0].range.end, pair[1].range.start);
            assert_ne!(pair[0].class, pair[1].class);
        }
        // Every boundary is a char boundary
        for s in &segments {
            assert!(text.is_char_boundary(s.range.start));
        }
    }

    #[test]
    fn test_word_lists() {
        assert_eq!(
            tokens("draw_text(x, room_speed);"),
            vec![
                ("draw_text", TokenClass::Function),
                ("x", TokenClass::Builtin),
                ("room_speed", TokenClass::Builtin),
            ]
        );
        assert_eq!(
            tokens("scr_move(obj_player, Dir.Up, SPEED, score_total)"),
            vec![
                ("scr_move", TokenClass::Script),
                ("obj_player", TokenClass::Resource),
                ("Dir", TokenClass::EnumName),
                ("Up", TokenClass::EnumEntry),
                ("SPEED", TokenClass::Macro),
                ("score_total", TokenClass::Globalvar),
            ]
        );
    }

    #[test]
    fn test_word_boundaries() {
        assert!(tokens("xx draw_texts").is_empty());
    }

    #[test]
    fn test_keywords_and_braces() {
        assert_eq!(
            tokens("if (a) { return; }"),
            vec![
                ("if", TokenClass::Keyword),
                ("{", TokenClass::Keyword),
                ("return", TokenClass::Keyword),
                ("}", TokenClass::Keyword),
            ]
        );
        assert_eq!(
            tokens("#macro LIMIT"),
            vec![("#macro", TokenClass::Keyword)]
        );
    }

    #[test]
    fn test_values() {
        assert_eq!(
            tokens("a = 0xFF + $1f + 3.5 + .25 + 10;"),
            vec![
                ("0xFF", TokenClass::Value),
                ("$1f", TokenClass::Value),
                ("3.5", TokenClass::Value),
                (".25", TokenClass::Value),
                ("10", TokenClass::Value),
            ]
        );
        assert_eq!(tokens("c = #FF00FF;"), vec![("#FF00FF", TokenClass::Value)]);
    }

    #[test]
    fn test_values_not_after_letters() {
        // The digits of an identifier are not values on their own
        assert!(tokens("vec = foo_2;").is_empty());
        assert_eq!(tokens("vec = ab12;"), vec![("2", TokenClass::Value)]);
    }

    #[test]
    fn test_strings_override_words() {
        assert_eq!(
            tokens("s = \"if x \\\" 2\";"),
            vec![("\"if x \\\" 2\"", TokenClass::String)]
        );
    }

    #[test]
    fn test_comments_override_everything() {
        assert_eq!(
            tokens("x = 1; // if \"x\" 2\ny"),
            vec![
                ("x", TokenClass::Builtin),
                ("1", TokenClass::Value),
                ("// if \"x\" 2", TokenClass::Comment),
            ]
        );
    }

    #[test]
    fn test_empty_lists_skipped() {
        let plain = Highlighter::new(&SyntaxInfo::new(WordLists::default(), &ProjectFacts::default()));
        assert!(plain.word_passes.is_empty());
        let segments = plain.highlight("obj_player");
        assert_eq!(segments, vec![Segment { range: 0..10, class: None }]);
        assert!(plain.highlight("").is_empty());
    }

    #[test]
    fn test_class_names_round_trip() {
        for class in TokenClass::ALL {
            assert_eq!(TokenClass::from_name(class.as_str()), Some(class));
        }
        assert_eq!(TokenClass::from_name("operator"), None);
    }
}
