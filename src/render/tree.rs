//! Tree renderer: turns the group tree into one nested-box text frame.
//!
//! Traversal is an iterative depth-first walk over explicit stacks, so
//! render depth is bounded by memory rather than call-stack depth. Children
//! are rendered bottom-up and spliced into the parent as body sections,
//! preserving creation order.

use std::collections::VecDeque;

use crate::core::group::{Group, GroupId, GroupStatus, GroupTree};
use crate::render::boxes::{draw_box, BorderStyle};
use crate::text::ansi::{green, red, yellow};
use crate::text::truncate::clip_to_width;

/// Options for one rendered frame.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub border: BorderStyle,
    /// Truncate bodies to the last `max_lines` lines, clipped to `max_width`.
    pub truncate: bool,
    pub max_lines: usize,
    pub max_width: usize,
    /// Spinner glyph shown for running groups in this frame.
    pub spinner: &'static str,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            border: BorderStyle::Unicode,
            truncate: true,
            max_lines: 5,
            max_width: 80,
            spinner: "⠋",
        }
    }
}

struct PendingBox {
    title: String,
    sections: Vec<Vec<String>>,
}

/// Render the whole tree into a single frame.
///
/// Roots are concatenated in creation order, separated by one blank line. An
/// empty tree renders as an empty frame.
pub fn render_tree(tree: &GroupTree, options: &RenderOptions) -> String {
    let mut rendered_roots: Vec<String> = Vec::new();
    let mut box_stack: Vec<PendingBox> = Vec::new();
    let mut ids_stack: Vec<VecDeque<GroupId>> =
        vec![tree.roots().iter().copied().collect()];

    while let Some(frontier) = ids_stack.last_mut() {
        match frontier.pop_front() {
            Some(id) => {
                let Some(group) = tree.group(id) else {
                    continue;
                };
                box_stack.push(pending_box(group, options));
                ids_stack.push(group.children().iter().copied().collect());
            }
            None => {
                ids_stack.pop();
                let Some(finished) = box_stack.pop() else {
                    continue;
                };
                let lines = draw_box(&finished.title, &finished.sections, options.border);
                match box_stack.last_mut() {
                    Some(parent) => parent.sections.push(lines),
                    None => rendered_roots.push(lines.join("\n")),
                }
            }
        }
    }

    rendered_roots.join("\n\n")
}

fn pending_box(group: &Group, options: &RenderOptions) -> PendingBox {
    // A failed group shows only its captured error detail, never truncated.
    if let Some(error_text) = group.error_text() {
        return PendingBox {
            title: format!("{} {}", group.name(), red("✖")),
            sections: vec![error_text.lines().map(yellow).collect()],
        };
    }

    let glyph = match group.status() {
        GroupStatus::Done => green("✔"),
        GroupStatus::Failed | GroupStatus::ChildFailed => red("✖"),
        GroupStatus::Running => options.spinner.to_string(),
    };

    let source = if options.truncate
        && group.status() == GroupStatus::Done
        && !group.finished_lines().is_empty()
    {
        group.finished_lines()
    } else {
        group.lines()
    };

    let body = if options.truncate {
        let hidden = source.len().saturating_sub(options.max_lines);
        let mut body = Vec::with_capacity(source.len().min(options.max_lines) + 1);
        if hidden > 0 {
            body.push(yellow(&format!("{hidden} lines truncated...")));
        }
        body.extend(
            source[hidden..]
                .iter()
                .map(|line| clip_to_width(line, options.max_width)),
        );
        body
    } else {
        source.to_vec()
    };

    PendingBox {
        title: format!("{} {}", group.name(), glyph),
        sections: vec![body],
    }
}
