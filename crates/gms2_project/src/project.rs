use crate::error::LoadError;
use crate::facts::{ContentFacts, ProjectFacts};
use crate::file::GmFile;
use crate::tree::{ProjectTree, CREATION_CODE, OBJECTS, SCRIPTS, SHADERS};
use crate::yy::{read_yy, AssetMeta, RoomMeta};
use anyhow::Context;
use jwalk::WalkDir;
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::{Component, Path, PathBuf};

/// Extensions of files that carry code
pub const CODE_EXTENSIONS: &[&str] = &["gml", "vsh", "fsh"];

/// Asset directories whose entries are resource names
pub const RESOURCE_DIRS: &[&str] = &[
    "sprites", "sounds", "objects", "tilesets", "fonts", "rooms", "shaders", "particles",
];

/// Object event file stems with a display name of their own
const EVENT_NAMES: &[(&str, &str)] = &[
    ("Create_0", "Create"),
    ("Destroy_0", "Destroy"),
    ("CleanUp_0", "Clean Up"),
    ("Step_0", "Step"),
    ("Step_1", "Begin Step"),
    ("Step_2", "End Step"),
    ("Draw_0", "Draw"),
    ("Draw_64", "Draw GUI"),
    ("Draw_65", "Window Resize"),
    ("Draw_72", "Draw Begin"),
    ("Draw_73", "Draw End"),
    ("Draw_74", "Draw GUI Begin"),
    ("Draw_75", "Draw GUI End"),
    ("Draw_76", "Pre-Draw"),
    ("Draw_77", "Post-Draw"),
    ("Other_0", "Outside Room"),
    ("Other_1", "Intersect Boundary"),
    ("Other_2", "Game Start"),
    ("Other_3", "Game End"),
    ("Other_4", "Room Start"),
    ("Other_5", "Room End"),
    ("Other_7", "Animation End"),
    ("Other_8", "Path Ended"),
    ("Other_60", "Async - Image Loaded"),
    ("Other_62", "Async - HTTP"),
    ("Other_63", "Async - Dialog"),
    ("Other_68", "Async - Networking"),
    ("Other_70", "Async - Social"),
    ("Other_72", "Async - Save/Load"),
    ("Other_75", "Async - System"),
];

/// Display name of an object event file stem (`Step_1` -> `Begin Step`)
pub fn event_name(stem: &str) -> String {
    if let Some((_, name)) = EVENT_NAMES.iter().find(|(s, _)| *s == stem) {
        return name.to_string();
    }
    if let Some(n) = stem.strip_prefix("Other_").and_then(|n| n.parse::<u32>().ok()) {
        if (10..=25).contains(&n) {
            return format!("User Event {}", n - 10);
        }
    }
    if let Some(target) = stem.strip_prefix("Collision_") {
        return format!("Collision {}", target);
    }
    stem.replace('_', " ")
}

/// Name shown for a room creation code file: the stem after its first `_`
fn creation_code_name(stem: &str) -> &str {
    stem.split_once('_').map_or(stem, |(_, rest)| rest)
}

/// The kind of asset a code file belongs to, decided by its top-level directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Script,
    Object,
    CreationCode,
    Shader,
}

impl ResourceKind {
    pub fn from_dir(name: &str) -> Option<Self> {
        match name {
            "scripts" => Some(Self::Script),
            "objects" => Some(Self::Object),
            "rooms" => Some(Self::CreationCode),
            "shaders" => Some(Self::Shader),
            _ => None,
        }
    }

    /// Top-level tree category this kind is filed under
    pub fn category(self) -> &'static str {
        match self {
            Self::Script => SCRIPTS,
            Self::Object => OBJECTS,
            Self::CreationCode => CREATION_CODE,
            Self::Shader => SHADERS,
        }
    }

    fn uses_asset_folders(self) -> bool {
        !matches!(self, Self::CreationCode)
    }
}

/// A fully loaded project
#[derive(Debug, Clone)]
pub struct LoadedProject {
    /// Project name (the `.yyp` file stem)
    pub name: String,
    /// Directory holding the `.yyp`
    pub root: PathBuf,
    pub tree: ProjectTree,
    pub facts: ProjectFacts,
}

/// Open a `.yyp` and load the whole project
pub fn load_file(path: impl AsRef<Path>) -> Result<LoadedProject, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    if !path.extension().is_some_and(|ext| ext == "yyp") {
        return Err(LoadError::NotAProject(path.to_path_buf()));
    }

    Project::new(path.to_path_buf())
        .and_then(|project| project.load())
        .map_err(|e| {
            log::error!("failed to load {}: {:#}", path.display(), e);
            LoadError::invalid(e)
        })
}

/// Find the `.yyp` manifest inside a project directory
pub fn find_yyp(dir: &Path) -> anyhow::Result<PathBuf> {
    let mut manifests: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "yyp"))
        .collect();
    manifests.sort();
    manifests
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("No .yyp file found in {:?}", dir))
}

/// A project on disk, not yet loaded
pub struct Project {
    pub root: PathBuf,
    pub yyp_path: PathBuf,
}

struct SourceFile {
    path: PathBuf,
    file: GmFile,
    facts: ContentFacts,
}

impl Project {
    pub fn new(yyp_path: PathBuf) -> anyhow::Result<Self> {
        let yyp_path = yyp_path
            .canonicalize()
            .with_context(|| format!("cannot resolve {}", yyp_path.display()))?;
        let root = yyp_path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| anyhow::anyhow!("{} has no parent directory", yyp_path.display()))?;

        Ok(Self { root, yyp_path })
    }

    pub fn name(&self) -> String {
        self.yyp_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn load(&self) -> anyhow::Result<LoadedProject> {
        let mut facts = ProjectFacts {
            resources: self.resource_names()?,
            scripts: self.script_names()?,
            ..ProjectFacts::default()
        };

        let paths = self.code_files();
        log::debug!("{} code file(s) under {}", paths.len(), self.root.display());

        let sources = paths
            .par_iter()
            .map(|path| {
                let raw = read_source(path)?;
                let file = GmFile::from_source(&raw);
                let facts = ContentFacts::scan(file.content());
                Ok(SourceFile {
                    path: path.clone(),
                    file,
                    facts,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let mut tree = ProjectTree::new();
        let mut folders: FxHashMap<PathBuf, Vec<String>> = FxHashMap::default();

        for source in sources {
            facts.extend(source.facts);

            let Some(tree_path) = self.tree_path(&source.path, &mut folders)? else {
                log::debug!("{} is not a script, object, room or shader", source.path.display());
                continue;
            };
            if let Err(e) = tree.insert(&tree_path, source.file) {
                log::warn!("skipping {}: {}", source.path.display(), e);
            }
        }

        Ok(LoadedProject {
            name: self.name(),
            root: self.root.clone(),
            tree,
            facts,
        })
    }

    /// Entries of every resource directory plus all room instance names
    fn resource_names(&self) -> anyhow::Result<Vec<String>> {
        let mut names = FxHashSet::default();

        for dir in RESOURCE_DIRS {
            let path = self.root.join(dir);
            if path.exists() {
                names.extend(list_dir(&path)?);
            }
        }

        let rooms = self.root.join("rooms");
        if rooms.is_dir() {
            for room in list_dir(&rooms)? {
                let room_dir = rooms.join(&room);
                if !room_dir.is_dir() {
                    continue;
                }
                let meta: RoomMeta = read_yy(&room_dir.join(format!("{}.yy", room)))?;
                names.extend(meta.instance_names().map(str::to_string));
            }
        }

        let mut names: Vec<String> = names.into_iter().collect();
        names.sort();
        Ok(names)
    }

    fn script_names(&self) -> anyhow::Result<Vec<String>> {
        let dir = self.root.join("scripts");
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = list_dir(&dir)?;
        names.sort();
        Ok(names)
    }

    fn code_files(&self) -> Vec<PathBuf> {
        WalkDir::new(&self.root)
            .sort(true)
            .into_iter()
            .flatten()
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| CODE_EXTENSIONS.contains(&ext))
            })
            .collect()
    }

    /// Where a code file goes in the tree, or `None` if it is not filed anywhere
    fn tree_path(
        &self,
        path: &Path,
        folders: &mut FxHashMap<PathBuf, Vec<String>>,
    ) -> anyhow::Result<Option<Vec<String>>> {
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return Ok(None);
        };
        let components = path_components(relative);

        // <kind dir>/<asset>/<file>
        if components.len() < 3 {
            return Ok(None);
        }
        let Some(kind) = ResourceKind::from_dir(&components[0]) else {
            return Ok(None);
        };
        let (Some(dir), Some(stem)) = (path.parent(), path.file_stem().and_then(|s| s.to_str())) else {
            return Ok(None);
        };
        let owner = components[components.len() - 2].clone();

        let mut tree_path = vec![kind.category().to_string()];
        if kind.uses_asset_folders() {
            if !folders.contains_key(dir) {
                let asset_folders = asset_folder_path(dir)?;
                folders.insert(dir.to_path_buf(), asset_folders);
            }
            tree_path.extend(folders[dir].iter().cloned());
        }

        match kind {
            ResourceKind::Script => tree_path.push(stem.to_string()),
            ResourceKind::Object => {
                tree_path.push(owner);
                tree_path.push(event_name(stem));
            }
            ResourceKind::CreationCode => {
                tree_path.push(owner);
                tree_path.push(creation_code_name(stem).to_string());
            }
            ResourceKind::Shader => {
                tree_path.push(owner);
                let stage = if path.extension().is_some_and(|ext| ext == "vsh") {
                    "Vertex"
                } else {
                    "Fragment"
                };
                tree_path.push(stage.to_string());
            }
        }

        Ok(Some(tree_path))
    }
}

/// Every normal component, lossily decoded so positions match the path
fn path_components(relative: &Path) -> Vec<String> {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// IDE folder path of the asset stored in `dir`, read from its `.yy`
fn asset_folder_path(dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut metas: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("cannot list {}", dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "yy"))
        .collect();
    metas.sort();

    let own_name = dir.file_name().map(|n| {
        let mut name = n.to_os_string();
        name.push(".yy");
        name
    });
    let preferred = metas
        .iter()
        .position(|p| p.file_name() == own_name.as_deref())
        .unwrap_or(metas.len().saturating_sub(1));

    let meta_path = metas
        .get(preferred)
        .ok_or_else(|| anyhow::anyhow!("no .yy metadata in {}", dir.display()))?;
    let meta: AssetMeta = read_yy(meta_path)?;
    Ok(meta.folder_path())
}

fn list_dir(dir: &Path) -> anyhow::Result<Vec<String>> {
    let entries = std::fs::read_dir(dir).with_context(|| format!("cannot list {}", dir.display()))?;
    Ok(entries
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect())
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
