//! Terminal rendering of trees, breakdowns, facts and highlighted code

use crate::chart;
use colored::Colorize;
use gms2_highlight::{Segment, Style};
use gms2_project::{Breakdown, LoadedProject, Node, ProjectFacts};
use indexmap::IndexMap;
use std::fmt::Write;

const BAR_WIDTH: usize = 30;

/// The project tree, one entry per line, with line totals
pub fn tree(project: &LoadedProject) -> String {
    let mut out = String::new();
    let root = project.tree.root();
    let _ = writeln!(
        out,
        "{} {}",
        project.name.cyan().bold(),
        format!("({} lines, {} files)", root.line_total(), root.file_count()).dimmed()
    );
    if let Some(children) = root.children() {
        tree_level(&mut out, children, 1);
    }
    out
}

fn tree_level(out: &mut String, children: &IndexMap<String, Node>, depth: usize) {
    let indent = "  ".repeat(depth);
    for (name, node) in children {
        match node {
            Node::Folder(grandchildren) => {
                let _ = writeln!(out, "{}{} {}", indent, name.bold(), node.line_total().to_string().dimmed());
                tree_level(out, grandchildren, depth + 1);
            }
            Node::File(file) => {
                let _ = writeln!(out, "{}{} {}", indent, name, file.line_count().to_string().dimmed());
            }
        }
    }
}

/// A folder's slices as a table with proportional bars
pub fn breakdown(project_name: &str, breakdown: &Breakdown) -> String {
    let mut out = String::new();
    let title = breakdown.title(project_name);
    for line in title.lines() {
        let _ = writeln!(out, "{}", line.cyan().bold());
    }
    out.push('\n');

    let width = breakdown
        .slices
        .iter()
        .map(|s| s.label.chars().count())
        .max()
        .unwrap_or(0);

    for (i, slice) in breakdown.slices.iter().enumerate() {
        let percent = slice.percent(breakdown.total);
        let filled = (percent / 100.0 * BAR_WIDTH as f64).round() as usize;
        let (r, g, b) = chart::PALETTE[i % chart::PALETTE.len()];
        let _ = writeln!(
            out,
            "{:<width$}  {:>7}  {:>6.1}%  {}",
            slice.label,
            slice.lines,
            percent,
            "█".repeat(filled).truecolor(r, g, b),
            width = width
        );
    }
    out
}

/// Every lexical fact list under a heading
pub fn facts(facts: &ProjectFacts) -> String {
    let mut out = String::new();
    let sections: [(&str, &[String]); 6] = [
        ("Resources", &facts.resources),
        ("Scripts", &facts.scripts),
        ("Enums", &facts.enum_names),
        ("Enum entries", &facts.enum_entries),
        ("Macros", &facts.macros),
        ("Globalvars", &facts.globalvars),
    ];
    for (heading, names) in sections {
        let _ = writeln!(out, "{} {}", heading.cyan().bold(), format!("({})", names.len()).dimmed());
        for name in names {
            let _ = writeln!(out, "  {}", name);
        }
    }
    out
}

/// Source text coloured per segment, reset at every line end
pub fn code(text: &str, segments: &[Segment], style: &Style) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for segment in segments {
        let colour = style.color(segment.class);
        let piece = &text[segment.range.clone()];
        for (i, line) in piece.split('\n').enumerate() {
            if i > 0 {
                out.push('\n');
            }
            if !line.is_empty() {
                let _ = write!(out, "{}", line.truecolor(colour.0, colour.1, colour.2));
            }
        }
    }
    if !text.is_empty() && !text.ends_with('\n') {
        out.push('\n');
    }
    out
}
