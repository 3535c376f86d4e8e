use super::frame::{Chrome, FrameStyle, LabelPlacement, RatioRule, layout_frame};
use super::*;
use crate::ir::ShapeKind;

pub(super) fn can_handle(node: &Node) -> bool {
    node.shape == ShapeKind::CustomImage
}

pub(super) fn compute(pass: &mut LayoutPass<'_>, args: &HandlerArgs<'_>) {
    let mut style = FrameStyle::new(Chrome::default());
    style.label = LabelPlacement::None;
    style.ratio = RatioRule::Intrinsic;
    style.use_default_height = false;
    style.min_height = pass.config.image_min_height;
    layout_frame(pass, args, &style);
}
