//! Frame production: box drawing, tree layout, and incremental painting.

pub mod boxes;
pub mod diff;
pub mod tree;

pub use boxes::{draw_box, BorderStyle};
pub use diff::DiffRenderer;
pub use tree::{render_tree, RenderOptions};
