//! Viewer colours, read from `styles.json`

use crate::highlight::TokenClass;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

pub const STYLES_FILE: &str = "styles.json";

const BUNDLED_STYLES: &str = include_str!("../assets/styles.json");

/// An sRGB colour written as `#rrggbb` (or `#rgb`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::str::FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("invalid colour \"{}\", expected #rrggbb", s);
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize, width: usize| {
            u8::from_str_radix(&hex[i * width..(i + 1) * width], 16).map_err(|_| invalid())
        };
        match hex.len() {
            6 => Ok(Rgb(channel(0, 2)?, channel(1, 2)?, channel(2, 2)?)),
            3 => {
                let (r, g, b) = (channel(0, 1)?, channel(1, 1)?, channel(2, 1)?);
                Ok(Rgb(r * 17, g * 17, b * 17))
            }
            _ => Err(invalid()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StyleFile {
    background: Rgb,
    default_text: Rgb,
    cursor: Rgb,
    #[serde(default)]
    syntax: IndexMap<String, Rgb>,
}

/// Code view colours
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub background: Rgb,
    pub default_text: Rgb,
    pub cursor: Rgb,
    syntax: IndexMap<TokenClass, Rgb>,
}

impl Style {
    pub fn parse(json: &str) -> anyhow::Result<Self> {
        let file: StyleFile = serde_json::from_str(json)?;
        let mut syntax = IndexMap::new();
        for (name, color) in file.syntax {
            match TokenClass::from_name(&name) {
                Some(class) => {
                    syntax.insert(class, color);
                }
                None => log::debug!("ignoring style for unknown tag \"{}\"", name),
            }
        }

        Ok(Self {
            background: file.background,
            default_text: file.default_text,
            cursor: file.cursor,
            syntax,
        })
    }

    /// The colours shipped with the crate
    pub fn bundled() -> Self {
        Self::parse(BUNDLED_STYLES).expect("bundled styles.json is valid")
    }

    /// Read `styles.json` from `dir`, or use the bundled one if it is not there
    pub fn load(dir: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = dir.map(|d| d.join(STYLES_FILE)).filter(|p| p.is_file()) else {
            return Ok(Self::bundled());
        };
        let json = std::fs::read_to_string(&path)?;
        Self::parse(&json).map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
    }

    /// Colour of a segment; plain text and unstyled classes use the default
    pub fn color(&self, class: Option<TokenClass>) -> Rgb {
        class
            .and_then(|c| self.syntax.get(&c).copied())
            .unwrap_or(self.default_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_colours() {
        assert_eq!("#ff8000".parse::<Rgb>(), Ok(Rgb(255, 128, 0)));
        assert_eq!("#FFF".parse::<Rgb>(), Ok(Rgb(255, 255, 255)));
        assert!("ff8000".parse::<Rgb>().is_err());
        assert!("#ff80".parse::<Rgb>().is_err());
        assert!("#gg0000".parse::<Rgb>().is_err());
        assert!("#é0000".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_bundled_styles_cover_every_class() {
        let style = Style::bundled();
        for class in TokenClass::ALL {
            assert!(style.syntax.contains_key(&class), "no colour for {:?}", class);
        }
    }

    #[test]
    fn test_unknown_tags_ignored_and_default_used() {
        let style = Style::parse(
            r##"{"background": "#000000", "default_text": "#010203", "cursor": "#ffffff",
                "syntax": {"comment": "#00ff00", "operator": "#ff0000"}}"##,
        )
        .unwrap();
        assert_eq!(style.color(Some(TokenClass::Comment)), Rgb(0, 255, 0));
        assert_eq!(style.color(Some(TokenClass::Keyword)), Rgb(1, 2, 3));
        assert_eq!(style.color(None), Rgb(1, 2, 3));
    }

    #[test]
    fn test_bad_colour_rejected() {
        let err = Style::parse(r##"{"background": "black", "default_text": "#fff", "cursor": "#fff"}"##);
        assert!(err.is_err());
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        assert_eq!(Style::load(Some(dir.path())).unwrap(), Style::bundled());

        std::fs::write(
            dir.path().join(STYLES_FILE),
            r##"{"background": "#101010", "default_text": "#eeeeee", "cursor": "#ffffff"}"##,
        )
        .unwrap();
        let style = Style::load(Some(dir.path())).unwrap();
        assert_eq!(style.background, Rgb(16, 16, 16));
        assert_eq!(style.color(Some(TokenClass::String)), Rgb(238, 238, 238));
    }
}
