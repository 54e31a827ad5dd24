//! Desktop viewer: project tree on the left, chart or code on the right

use crate::chart;
use eframe::egui;
use egui::text::{LayoutJob, TextFormat};
use gms2_highlight::{Highlighter, Rgb, Segment, Style, SyntaxInfo, WordLists};
use gms2_project::{Breakdown, LoadedProject, Node};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

const WINDOW_TITLE: &str = "gms2_stats";
const WINDOW_SIZE: [f32; 2] = [960.0, 540.0];
const CODE_FONT_SIZE: f32 = 13.0;
const NO_PROJECT: &str = "No project";
const EMPTY_MESSAGE: &str = "No GameMaker Studio 2 Project loaded yet!";

/// Open the viewer window, optionally with a project already loaded
pub fn run(resources: Option<PathBuf>, project: Option<PathBuf>) -> anyhow::Result<()> {
    let words = WordLists::load(resources.as_deref()).unwrap_or_else(|e| {
        log::warn!("{}, using bundled word lists", e);
        WordLists::bundled()
    });
    let style = Style::load(resources.as_deref()).unwrap_or_else(|e| {
        log::warn!("{}, using bundled styles", e);
        Style::bundled()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(WINDOW_SIZE),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |cc| Ok(Box::new(StatsApp::new(cc, words, style, project)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start viewer: {}", e))
}

/// A loaded project and the highlighter built from its facts
struct ProjectView {
    project: LoadedProject,
    highlighter: Highlighter,
}

/// What the right-hand panel shows
enum View {
    Empty,
    Chart(Breakdown),
    Code(LayoutJob),
}

struct StatsApp {
    words: WordLists,
    style: Style,
    project: Option<ProjectView>,
    selection: Vec<String>,
    view: View,
    error: Option<String>,
    dialog_dir: Option<PathBuf>,
}

impl StatsApp {
    fn new(cc: &eframe::CreationContext<'_>, words: WordLists, style: Style, project: Option<PathBuf>) -> Self {
        let cursor = color32(style.cursor);
        cc.egui_ctx.style_mut(|s| s.visuals.text_cursor.stroke.color = cursor);

        let mut app = Self {
            words,
            style,
            project: None,
            selection: Vec::new(),
            view: View::Empty,
            error: None,
            dialog_dir: None,
        };
        if let Some(path) = project {
            app.load(&path);
        }
        app
    }

    fn open_dialog(&mut self) {
        let mut dialog = rfd::FileDialog::new()
            .set_title("Choose GameMaker Studio 2 Project")
            .add_filter("GameMaker Studio 2 Project File", &["yyp"]);
        if let Some(dir) = &self.dialog_dir {
            dialog = dialog.set_directory(dir);
        }
        if let Some(path) = dialog.pick_file() {
            self.load(&path);
        }
    }

    /// Replace the current project; on failure the old one stays and an error is shown
    fn load(&mut self, path: &Path) {
        let manifest = if path.is_dir() {
            match gms2_project::find_yyp(path) {
                Ok(manifest) => manifest,
                Err(e) => {
                    self.error = Some(e.to_string());
                    return;
                }
            }
        } else {
            path.to_path_buf()
        };

        match gms2_project::load_file(&manifest) {
            Ok(project) => {
                log::info!(
                    "loaded {} ({} files, {} lines)",
                    project.name,
                    project.tree.file_count(),
                    project.tree.line_total()
                );
                self.dialog_dir = manifest.parent().map(Path::to_path_buf);
                let syntax = SyntaxInfo::new(self.words.clone(), &project.facts);
                let highlighter = Highlighter::new(&syntax);
                self.project = Some(ProjectView { project, highlighter });
                self.show(Vec::new());
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// Select a tree path; unknown paths are logged and leave the view alone
    fn show(&mut self, path: Vec<String>) {
        let Some(view) = &self.project else {
            return;
        };
        match view_for(view, &path, &self.style) {
            Some(next) => {
                self.view = next;
                self.selection = path;
            }
            None => log::error!("Path \"{}\" does not exist. Can't show plot.", path.join("/")),
        }
    }

    fn menu_ui(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open…").clicked() {
                    ui.close();
                    self.open_dialog();
                }
                ui.separator();
                if ui.button("Exit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });
        });
    }

    fn error_ui(&mut self, ctx: &egui::Context) {
        let Some(message) = &self.error else {
            return;
        };
        let mut dismissed = false;
        let response = egui::Modal::new(egui::Id::new("load_error")).show(ctx, |ui| {
            ui.heading("Error");
            ui.add_space(4.0);
            ui.label(message.as_str());
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });
        if dismissed || response.should_close() {
            self.error = None;
        }
    }

    fn tree_panel_ui(&mut self, ui: &mut egui::Ui) {
        let mut clicked = None;
        match &self.project {
            None => {
                ui.heading(NO_PROJECT);
            }
            Some(view) => {
                let root_selected = self.selection.is_empty() && matches!(self.view, View::Chart(_));
                if ui
                    .add(egui::Button::selectable(
                        root_selected,
                        egui::RichText::new(&view.project.name).heading(),
                    ))
                    .clicked()
                {
                    clicked = Some(Vec::new());
                }
                ui.separator();
                egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                    if let Some(children) = view.project.tree.root().children() {
                        let mut path = Vec::new();
                        tree_ui(ui, children, &mut path, &self.selection, &mut clicked);
                    }
                });
            }
        }
        if let Some(path) = clicked {
            self.show(path);
        }
    }

    fn content_ui(&self, ui: &mut egui::Ui) {
        match &self.view {
            View::Empty => {
                ui.centered_and_justified(|ui| {
                    ui.label(EMPTY_MESSAGE);
                });
            }
            View::Chart(breakdown) => {
                let name = self.project.as_ref().map(|v| v.project.name.as_str()).unwrap_or_default();
                chart::pie(ui, breakdown, &breakdown.title(name));
            }
            View::Code(job) => {
                egui::Frame::new()
                    .fill(color32(self.style.background))
                    .inner_margin(egui::Margin::same(6))
                    .show(ui, |ui| {
                        egui::ScrollArea::both().auto_shrink([false, false]).show(ui, |ui| {
                            ui.add(egui::Label::new(job.clone()).selectable(true).extend());
                        });
                    });
            }
        }
    }
}

impl eframe::App for StatsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("menu").show(ctx, |ui| self.menu_ui(ctx, ui));

        egui::SidePanel::left("tree")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| self.tree_panel_ui(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.content_ui(ui));

        self.error_ui(ctx);
    }
}

/// One level of the tree; folders collapse, files are plain entries
fn tree_ui(
    ui: &mut egui::Ui,
    children: &IndexMap<String, Node>,
    path: &mut Vec<String>,
    selection: &[String],
    clicked: &mut Option<Vec<String>>,
) {
    for (name, node) in children {
        path.push(name.clone());
        let selected = path.as_slice() == selection;
        match node {
            Node::Folder(grandchildren) => {
                let id = ui.make_persistent_id(path.join("/"));
                let (_, header, _) = egui::collapsing_header::CollapsingState::load_with_default_open(ui.ctx(), id, false)
                    .show_header(ui, |ui| ui.selectable_label(selected, name.as_str()))
                    .body(|ui| tree_ui(ui, grandchildren, path, selection, clicked));
                if header.inner.clicked() {
                    *clicked = Some(path.clone());
                }
            }
            Node::File(_) => {
                if ui.selectable_label(selected, name.as_str()).clicked() {
                    *clicked = Some(path.clone());
                }
            }
        }
        path.pop();
    }
}

/// Chart for a folder, highlighted code for a file, `None` if nothing is there
fn view_for(view: &ProjectView, path: &[String], style: &Style) -> Option<View> {
    match view.project.tree.get(path)? {
        Node::Folder(_) => view.project.tree.breakdown(path).map(View::Chart),
        Node::File(file) => {
            let segments = view.highlighter.highlight(file.content());
            Some(View::Code(code_job(file.content(), &segments, style)))
        }
    }
}

/// Monospace text with one section per highlighted segment
fn code_job(text: &str, segments: &[Segment], style: &Style) -> LayoutJob {
    let font_id = egui::FontId::monospace(CODE_FONT_SIZE);
    let mut job = LayoutJob::default();
    for segment in segments {
        job.append(
            &text[segment.range.clone()],
            0.0,
            TextFormat {
                font_id: font_id.clone(),
                color: color32(style.color(segment.class)),
                ..Default::default()
            },
        );
    }
    job
}

fn color32(rgb: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}
