use super::frame::{Chrome, FrameStyle, LabelPlacement, RatioRule, layout_frame};
use super::*;
use crate::ir::ShapeKind;

pub(super) fn can_handle(node: &Node) -> bool {
    node.shape == ShapeKind::RectangleExternalLabel
}

/// The label is drawn beside the rectangle, so it only widens it. Ratio
/// locking would fight the label width and is never applied.
pub(super) fn compute(pass: &mut LayoutPass<'_>, args: &HandlerArgs<'_>) {
    let mut style = FrameStyle::new(Chrome::default());
    style.label = LabelPlacement::Outside;
    style.ratio = RatioRule::Disabled;
    layout_frame(pass, args, &style);
}
