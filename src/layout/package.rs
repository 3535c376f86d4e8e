use super::frame::{Chrome, FrameStyle, layout_frame};
use super::label::label_chars;
use super::*;
use crate::ir::ShapeKind;

pub(super) fn can_handle(node: &Node) -> bool {
    node.shape == ShapeKind::Package
}

pub(super) fn compute(pass: &mut LayoutPass<'_>, args: &HandlerArgs<'_>) {
    let mut style = FrameStyle::new(Chrome::default());
    style.body_matches_band = args.content_children().is_empty();
    let outcome = layout_frame(pass, args, &style);

    let config = pass.config;
    let tab = header_tab_width(label_chars(args.node), outcome.size.width, config);
    pass.node_layout_mut(&args.node.id).header = Some(Size::new(tab, outcome.bands.header));
}

fn header_tab_width(chars: usize, width: f32, config: &LayoutConfig) -> f32 {
    let wanted =
        chars as f32 * config.package_header_char_width + config.package_header_extra_width;
    wanted.min(config.package_header_max_ratio * width)
}
