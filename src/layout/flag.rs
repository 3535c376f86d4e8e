use super::frame::{Chrome, FrameStyle, layout_frame};
use super::*;
use crate::ir::ShapeKind;

pub(super) fn can_handle_inner(node: &Node) -> bool {
    node.shape == ShapeKind::InnerFlag
}

pub(super) fn can_handle_outer(node: &Node) -> bool {
    node.shape == ShapeKind::OuterFlag
}

/// Label and children start after the notch.
pub(super) fn compute_inner(pass: &mut LayoutPass<'_>, args: &HandlerArgs<'_>) {
    let style = FrameStyle::new(Chrome {
        left: pass.config.flag_gap,
        ..Chrome::default()
    });
    layout_frame(pass, args, &style);
}

/// The notch is drawn outside the bounds.
pub(super) fn compute_outer(pass: &mut LayoutPass<'_>, args: &HandlerArgs<'_>) {
    layout_frame(pass, args, &FrameStyle::new(Chrome::default()));
}
