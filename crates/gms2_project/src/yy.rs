use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::Path;

static TRAILING_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",(\s*[}\]])").unwrap());

/// GMS2 .yy/.yyp files often contain trailing commas which standard JSON doesn't support.
/// Strip them: `,` followed by whitespace and `}` or `]`.
pub fn strip_trailing_commas(content: &str) -> Cow<'_, str> {
    TRAILING_COMMA.replace_all(content, "$1")
}

/// Read and parse a GameMaker JSON metadata file
pub fn read_yy<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
    let content = strip_trailing_commas(&content);
    let parsed = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("failed to parse {}: {}", path.display(), e))?;
    Ok(parsed)
}

/// The part of an asset's `.yy` that says where it sits in the IDE's folder view
#[derive(Debug, Deserialize, Serialize)]
pub struct AssetMeta {
    pub parent: ParentRef,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ParentRef {
    pub path: String,
}

impl AssetMeta {
    /// Folder segments below the top-level IDE group.
    ///
    /// `folders/Scripts/Player/Input.yy` becomes `["Player", "Input"]`. An
    /// asset parented directly to the project (`Game.yyp`) has no segments.
    pub fn folder_path(&self) -> Vec<String> {
        let path = &self.parent.path;
        let trimmed = path
            .char_indices()
            .rev()
            .nth(2)
            .map_or("", |(i, _)| &path[..i]);

        trimmed
            .split('/')
            .skip(2)
            .map(str::to_string)
            .collect()
    }
}

/// Room metadata: the instances placed in the room
#[derive(Debug, Deserialize, Serialize)]
pub struct RoomMeta {
    #[serde(rename = "instanceCreationOrder", default)]
    pub instance_creation_order: Vec<InstanceRef>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct InstanceRef {
    pub name: String,
}

impl RoomMeta {
    pub fn instance_names(&self) -> impl Iterator<Item = &str> {
        self.instance_creation_order.iter().map(|i| i.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(path: &str) -> AssetMeta {
        AssetMeta {
            parent: ParentRef { path: path.to_string() },
        }
    }

    #[test]
    fn test_strip_trailing_commas() {
        let src = "{\"a\": [1, 2,], \"b\": {\"c\": 3,\n},}";
        let stripped = strip_trailing_commas(src);
        let value: serde_json::Value = serde_json::from_str(&stripped).unwrap();
        assert_eq!(value["a"][1], 2);
        assert_eq!(value["b"]["c"], 3);
    }

    #[test]
    fn test_commas_inside_values_survive() {
        assert_eq!(strip_trailing_commas("[\"a,b\", 1]"), "[\"a,b\", 1]");
    }

    #[test]
    fn test_folder_path() {
        assert_eq!(asset("folders/Scripts/Player/Input.yy").folder_path(), vec!["Player", "Input"]);
        assert_eq!(asset("folders/Scripts.yy").folder_path(), Vec::<String>::new());
        assert!(asset("MyGame.yyp").folder_path().is_empty());
        assert!(asset("").folder_path().is_empty());
    }

    #[test]
    fn test_room_meta_without_instances() {
        let room: RoomMeta = serde_json::from_str("{\"name\": \"rm_empty\"}").unwrap();
        assert_eq!(room.instance_names().count(), 0);
    }

    #[test]
    fn test_read_yy_with_trailing_commas() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("obj.yy");
        std::fs::write(
            &path,
            "{\n  \"parent\": {\n    \"name\": \"Enemies\",\n    \"path\": \"folders/Objects/Enemies.yy\",\n  },\n}",
        )
        .unwrap();

        let meta: AssetMeta = read_yy(&path).unwrap();
        assert_eq!(meta.folder_path(), vec!["Enemies"]);
    }
}
