//! gms2-stats - line counts and a code viewer for GameMaker Studio 2 projects
//!
//! Usage: gms2-stats [OPTIONS] [COMMAND]

mod app;
mod chart;
mod report;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use gms2_highlight::{Highlighter, Style, SyntaxInfo, WordLists};
use gms2_project::{LoadedProject, Node};
use std::path::{Path, PathBuf};

/// Line-count statistics and code viewer for GameMaker Studio 2 projects
#[derive(Parser, Debug)]
#[command(name = "gms2-stats")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory holding builtins.txt, functions.txt and styles.json
    /// (defaults to the executable's directory)
    #[arg(long, global = true, env = "GMS2_STATS_RESOURCES")]
    resources: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Open the desktop viewer (default)
    Gui {
        /// Project to open on start (.yyp or its directory)
        project: Option<PathBuf>,
    },
    /// Print the project tree with line counts
    Tree {
        /// Project .yyp file or directory
        project: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the line-count breakdown of a folder
    Stats {
        /// Project .yyp file or directory
        project: PathBuf,
        /// Folder inside the tree, e.g. "Objects/Enemies" (default: the root)
        #[arg(long, default_value = "")]
        path: String,
    },
    /// Print a file with syntax highlighting
    Show {
        /// Project .yyp file or directory
        project: PathBuf,
        /// File inside the tree, e.g. "Scripts/scr_move"
        path: String,
    },
    /// Print the enums, macros, globalvars, resources and scripts found
    Facts {
        /// Project .yyp file or directory
        project: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let resources = resource_dir(cli.resources);

    match cli.command {
        None => app::run(resources, None),
        Some(Commands::Gui { project }) => app::run(resources, project),
        Some(Commands::Tree { project, format }) => run_tree(&project, format),
        Some(Commands::Stats { project, path }) => run_stats(&project, &path),
        Some(Commands::Show { project, path }) => run_show(&project, &path, resources.as_deref()),
        Some(Commands::Facts { project, format }) => run_facts(&project, format),
    }
}

/// Where the word lists and colours live: the flag, or next to the executable
fn resource_dir(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
    })
}

/// Accept either the `.yyp` itself or the directory that holds it
fn manifest_path(path: &Path) -> Result<PathBuf> {
    if path.is_dir() {
        gms2_project::find_yyp(path)
    } else {
        Ok(path.to_path_buf())
    }
}

/// Load a project from a `.yyp` or its directory; the error is the user-facing message
fn load_project(path: &Path) -> std::result::Result<LoadedProject, String> {
    let manifest = manifest_path(path).map_err(|e| e.to_string())?;
    gms2_project::load_file(&manifest).map_err(|e| e.to_string())
}

/// Load a project or exit with the load error
fn open_project(path: &Path) -> Result<LoadedProject> {
    match load_project(path) {
        Ok(project) => Ok(project),
        Err(message) => {
            eprintln!("{} {}", "error".red().bold(), message.red());
            std::process::exit(1);
        }
    }
}

fn resolve_or_exit<'a>(project: &'a LoadedProject, path: &str) -> &'a Node {
    match project.tree.resolve(path) {
        Some(node) => node,
        None => {
            eprintln!("{} Path \"{}\" does not exist.", "error".red().bold(), path);
            std::process::exit(1);
        }
    }
}

fn run_tree(path: &Path, format: OutputFormat) -> Result<()> {
    let project = open_project(path)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&project.tree)?),
        OutputFormat::Text => print!("{}", report::tree(&project)),
    }
    Ok(())
}

fn run_stats(path: &Path, folder: &str) -> Result<()> {
    let project = open_project(path)?;
    let node = resolve_or_exit(&project, folder);
    if !node.is_folder() {
        eprintln!("{} \"{}\" is a file, not a folder", "error".red().bold(), folder);
        std::process::exit(1);
    }
    let segments: Vec<&str> = if folder.is_empty() { Vec::new() } else { folder.split('/').collect() };
    if let Some(breakdown) = project.tree.breakdown(&segments) {
        print!("{}", report::breakdown(&project.name, &breakdown));
    }
    Ok(())
}

fn run_show(path: &Path, file_path: &str, resources: Option<&Path>) -> Result<()> {
    let project = open_project(path)?;
    let Some(file) = resolve_or_exit(&project, file_path).as_file() else {
        eprintln!("{} \"{}\" is a folder, not a file", "error".red().bold(), file_path);
        std::process::exit(1);
    };

    let words = WordLists::load(resources)?;
    let style = Style::load(resources)?;
    let highlighter = Highlighter::new(&SyntaxInfo::new(words, &project.facts));

    let segments = highlighter.highlight(file.content());
    print!("{}", report::code(file.content(), &segments, &style));
    Ok(())
}

fn run_facts(path: &Path, format: OutputFormat) -> Result<()> {
    let project = open_project(path)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&project.facts)?),
        OutputFormat::Text => print!("{}", report::facts(&project.facts)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_command_opens_gui() {
        let cli = Cli::try_parse_from(["gms2-stats"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_stats() {
        let cli = Cli::try_parse_from(["gms2-stats", "stats", "Game.yyp", "--path", "Objects/Enemies"]).unwrap();
        match cli.command {
            Some(Commands::Stats { project, path }) => {
                assert_eq!(project, PathBuf::from("Game.yyp"));
                assert_eq!(path, "Objects/Enemies");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_format_and_resources() {
        let cli = Cli::try_parse_from(["gms2-stats", "facts", "Game.yyp", "--format", "json", "--resources", "res"]).unwrap();
        assert_eq!(cli.resources, Some(PathBuf::from("res")));
        assert!(matches!(cli.command, Some(Commands::Facts { format: OutputFormat::Json, .. })));
    }

    #[test]
    fn test_manifest_path_from_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let yyp = dir.path().join("Game.yyp");
        std::fs::write(&yyp, "{}").unwrap();
        assert_eq!(manifest_path(dir.path()).unwrap(), yyp);
        assert_eq!(manifest_path(&yyp).unwrap(), yyp);
    }

    #[test]
    fn test_load_project_reports_missing_manifest() {
        let dir = tempfile::TempDir::new().unwrap();
        let message = load_project(dir.path()).err().unwrap();
        assert!(message.starts_with("No .yyp file found in"), "{}", message);
    }

    #[test]
    fn test_load_project_reports_load_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("Game.txt");
        std::fs::write(&path, "{}").unwrap();
        assert_eq!(
            load_project(&path).err().unwrap(),
            "Not a GameMaker Studio 2 Project file (.yyp)"
        );
    }
}
