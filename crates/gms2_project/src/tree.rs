//! Project tree - nested, ordered folders with file records as leaves

use crate::file::GmFile;
use indexmap::IndexMap;
use serde::Serialize;

pub const SCRIPTS: &str = "Scripts";
pub const OBJECTS: &str = "Objects";
pub const CREATION_CODE: &str = "Creation Code";
pub const SHADERS: &str = "Shaders";

/// Top-level categories, in display order
pub const CATEGORIES: [&str; 4] = [SCRIPTS, OBJECTS, CREATION_CODE, SHADERS];

/// A folder or a file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Folder(IndexMap<String, Node>),
    File(GmFile),
}

impl Node {
    pub fn is_folder(&self) -> bool {
        matches!(self, Node::Folder(_))
    }

    pub fn as_file(&self) -> Option<&GmFile> {
        match self {
            Node::File(file) => Some(file),
            Node::Folder(_) => None,
        }
    }

    pub fn children(&self) -> Option<&IndexMap<String, Node>> {
        match self {
            Node::Folder(children) => Some(children),
            Node::File(_) => None,
        }
    }

    /// Total lines below this node
    pub fn line_total(&self) -> usize {
        match self {
            Node::File(file) => file.line_count(),
            Node::Folder(children) => children.values().map(Node::line_total).sum(),
        }
    }

    /// Number of files below this node
    pub fn file_count(&self) -> usize {
        match self {
            Node::File(_) => 1,
            Node::Folder(children) => children.values().map(Node::file_count).sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("cannot insert \"{path}\": \"{segment}\" is already a {existing}")]
    Conflict {
        path: String,
        segment: String,
        existing: &'static str,
    },
    #[error("cannot insert a file at an empty path")]
    EmptyPath,
}

/// The whole project as the viewer sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProjectTree {
    root: Node,
}

impl Default for ProjectTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectTree {
    /// A tree holding the four empty categories
    pub fn new() -> Self {
        let root = CATEGORIES
            .iter()
            .map(|name| (name.to_string(), Node::Folder(IndexMap::new())))
            .collect();
        Self {
            root: Node::Folder(root),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Insert a file, creating intermediate folders.
    ///
    /// A file already stored under the final key is replaced. Passing through
    /// a file, or replacing a folder with a file, is rejected and leaves the
    /// tree untouched.
    pub fn insert(&mut self, path: &[String], file: GmFile) -> Result<(), TreeError> {
        let Some((leaf, folders)) = path.split_last() else {
            return Err(TreeError::EmptyPath);
        };
        let conflict = |segment: &str, existing: &'static str| TreeError::Conflict {
            path: path.join("/"),
            segment: segment.to_string(),
            existing,
        };

        // Validate first so a rejected insert creates no folders
        let mut probe = Some(&self.root);
        for segment in folders {
            probe = match probe.and_then(Node::children) {
                Some(children) => match children.get(segment) {
                    Some(node @ Node::Folder(_)) => Some(node),
                    Some(Node::File(_)) => return Err(conflict(segment, "file")),
                    None => None,
                },
                None => None,
            };
        }
        if let Some(Node::Folder(_)) = probe.and_then(Node::children).and_then(|c| c.get(leaf)) {
            return Err(conflict(leaf, "folder"));
        }

        let mut current = &mut self.root;
        for segment in folders {
            let Node::Folder(children) = current else {
                return Err(conflict(segment, "file"));
            };
            current = children
                .entry(segment.clone())
                .or_insert_with(|| Node::Folder(IndexMap::new()));
        }
        match current {
            Node::Folder(children) => {
                children.insert(leaf.clone(), Node::File(file));
                Ok(())
            }
            Node::File(_) => Err(conflict(leaf, "file")),
        }
    }

    /// Look up a node by its segments. An empty path is the root.
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&Node> {
        path.iter().try_fold(&self.root, |node, segment| {
            node.children()?.get(segment.as_ref())
        })
    }

    /// Look up a node by a `/`-separated path
    pub fn resolve(&self, path: &str) -> Option<&Node> {
        if path.is_empty() {
            return Some(&self.root);
        }
        let segments: Vec<&str> = path.split('/').collect();
        self.get(&segments)
    }

    /// Per-child line totals of a folder
    pub fn breakdown<S: AsRef<str>>(&self, path: &[S]) -> Option<Breakdown> {
        let children = self.get(path)?.children()?;
        let slices: Vec<Slice> = children
            .iter()
            .map(|(label, node)| Slice {
                label: label.clone(),
                lines: node.line_total(),
            })
            .collect();
        let total = slices.iter().map(|s| s.lines).sum();

        Some(Breakdown {
            path: path.iter().map(|s| s.as_ref().to_string()).collect(),
            slices,
            total,
        })
    }

    pub fn line_total(&self) -> usize {
        self.root.line_total()
    }

    pub fn file_count(&self) -> usize {
        self.root.file_count()
    }
}

/// Line totals of a folder's direct children
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub path: Vec<String>,
    pub slices: Vec<Slice>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slice {
    pub label: String,
    pub lines: usize,
}

impl Slice {
    /// Share of `total` in percent; 0 when the total is 0
    pub fn percent(&self, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            self.lines as f64 * 100.0 / total as f64
        }
    }
}

impl Breakdown {
    /// Chart title: `Project/sub/path` and the total line count
    pub fn title(&self, project_name: &str) -> String {
        let mut title = project_name.to_string();
        for segment in &self.path {
            title.push('/');
            title.push_str(segment);
        }
        format!("{}\nTotal lines: {}", title, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(p: &str) -> Vec<String> {
        p.split('/').map(str::to_string).collect()
    }

    fn file(lines: usize) -> GmFile {
        GmFile::from_source(&"x\n".repeat(lines))
    }

    #[test]
    fn test_new_tree_has_categories_in_order() {
        let tree = ProjectTree::new();
        let keys: Vec<&str> = tree.root().children().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, CATEGORIES);
        assert_eq!(tree.line_total(), 0);
    }

    #[test]
    fn test_insert_creates_folders_and_sums_lines() {
        let mut tree = ProjectTree::new();
        tree.insert(&path("Scripts/Player/scr_move"), file(10)).unwrap();
        tree.insert(&path("Scripts/Player/scr_jump"), file(5)).unwrap();
        tree.insert(&path("Objects/obj_player/Create"), file(3)).unwrap();

        assert_eq!(tree.resolve("Scripts/Player").unwrap().line_total(), 15);
        assert_eq!(tree.line_total(), 18);
        assert_eq!(tree.file_count(), 3);
        assert_eq!(tree.resolve("Scripts/Player/scr_jump").unwrap().as_file().unwrap().line_count(), 5);
    }

    #[test]
    fn test_insert_replaces_existing_file() {
        let mut tree = ProjectTree::new();
        tree.insert(&path("Scripts/a"), file(1)).unwrap();
        tree.insert(&path("Scripts/a"), file(7)).unwrap();
        assert_eq!(tree.resolve("Scripts/a").unwrap().line_total(), 7);
    }

    #[test]
    fn test_insert_conflicts_leave_tree_untouched() {
        let mut tree = ProjectTree::new();
        tree.insert(&path("Scripts/a"), file(1)).unwrap();
        let before = tree.clone();

        let err = tree.insert(&path("Scripts/a/b/c"), file(1)).unwrap_err();
        assert!(matches!(err, TreeError::Conflict { existing: "file", .. }));

        let err = tree.insert(&path("Scripts"), file(1)).unwrap_err();
        assert!(matches!(err, TreeError::Conflict { existing: "folder", .. }));

        assert_eq!(tree, before);
        assert_eq!(tree.insert(&[], file(1)), Err(TreeError::EmptyPath));
    }

    #[test]
    fn test_resolve_missing() {
        let tree = ProjectTree::new();
        assert!(tree.resolve("").is_some());
        assert!(tree.resolve("Scripts/nope").is_none());
        assert!(tree.resolve("Nope").is_none());
    }

    #[test]
    fn test_breakdown() {
        let mut tree = ProjectTree::new();
        tree.insert(&path("Scripts/a"), file(30)).unwrap();
        tree.insert(&path("Shaders/sh/Vertex"), file(10)).unwrap();

        let root = tree.breakdown::<&str>(&[]).unwrap();
        assert_eq!(root.total, 40);
        let labels: Vec<&str> = root.slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, CATEGORIES);
        assert_eq!(root.slices[0].percent(root.total), 75.0);
        assert_eq!(root.title("Game"), "Game\nTotal lines: 40");

        let shaders = tree.breakdown(&["Shaders", "sh"]).unwrap();
        assert_eq!(shaders.title("Game"), "Game/Shaders/sh\nTotal lines: 10");

        assert!(tree.breakdown(&["Scripts", "a"]).is_none());
    }

    #[test]
    fn test_serializes_line_counts() {
        let mut tree = ProjectTree::new();
        tree.insert(&path("Scripts/a"), file(2)).unwrap();
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["Scripts"]["a"]["line_count"], 2);
        assert!(json["Objects"].as_object().unwrap().is_empty());
    }
}
