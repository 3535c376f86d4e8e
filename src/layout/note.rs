use super::frame::{Chrome, FrameStyle, layout_frame};
use super::*;
use crate::ir::ShapeKind;

pub(super) fn can_handle(node: &Node) -> bool {
    node.shape == ShapeKind::Note
}

// The folded corner eats into the right and bottom edges.
pub(super) fn compute(pass: &mut LayoutPass<'_>, args: &HandlerArgs<'_>) {
    let corner = pass.config.note_corner;
    let mut style = FrameStyle::new(Chrome {
        right: corner,
        bottom: corner,
        ..Chrome::default()
    });
    style.children_in_content = false;
    layout_frame(pass, args, &style);
}
