//! GMS2 Project - Loader for GameMaker Studio 2 projects
//!
//! Walks a project directory next to its `.yyp`, sorts every script, object
//! event, room creation code and shader into a synthetic folder tree, and
//! collects the lexical facts (enums, macros, globalvars, resource names)
//! the viewer uses for highlighting.

pub mod error;
pub mod facts;
pub mod file;
pub mod project;
pub mod tree;
pub mod yy;

pub use error::LoadError;
pub use facts::{ContentFacts, ProjectFacts};
pub use file::GmFile;
pub use project::{event_name, find_yyp, load_file, LoadedProject, Project, ResourceKind};
pub use tree::{Breakdown, Node, ProjectTree, Slice, TreeError};
pub use yy::{AssetMeta, RoomMeta};
