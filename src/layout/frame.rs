use super::label::{LabelBands, label_bands, label_footprint};
use super::resize::{locked_ratio, reconcile_node};
use super::*;

/// Shape-specific padding around the interior.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(super) struct Chrome {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Chrome {
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LabelPlacement {
    /// Header or footer band inside the node.
    Inside,
    /// Beside the node: only its width counts.
    Outside,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RatioRule {
    /// Lock when the node asks for it.
    NodeFlag,
    /// Always keep `defaultWidth / defaultHeight`.
    Intrinsic,
    Disabled,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct FrameStyle {
    pub chrome: Chrome,
    pub label: LabelPlacement,
    pub ratio: RatioRule,
    pub children_in_content: bool,
    pub use_default_height: bool,
    pub min_height: f32,
    /// Leaf packages: the body is as tall as the header band.
    pub body_matches_band: bool,
}

impl FrameStyle {
    pub fn new(chrome: Chrome) -> Self {
        Self {
            chrome,
            label: LabelPlacement::Inside,
            ratio: RatioRule::NodeFlag,
            children_in_content: true,
            use_default_height: true,
            min_height: 0.0,
            body_matches_band: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(super) struct ContentBounds {
    pub right: f32,
    pub bottom: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct FrameOutcome {
    pub size: Size,
    pub bands: LabelBands,
}

pub(super) fn layout_frame(
    pass: &mut LayoutPass<'_>,
    args: &HandlerArgs<'_>,
    style: &FrameStyle,
) -> FrameOutcome {
    let node = args.node;
    let config = pass.config;
    let measurement = pass.measurement(&node.id);
    let stroke = measurement.border_stroke_width;
    let chrome = style.chrome;

    let (footprint, bands) = match style.label {
        LabelPlacement::Inside => {
            let footprint = label_footprint(node, &measurement, config);
            (footprint, label_bands(node, footprint, stroke))
        }
        LabelPlacement::Outside => {
            let footprint = label_footprint(node, &measurement, config);
            (Size::new(footprint.width, 0.0), LabelBands::default())
        }
        LabelPlacement::None => (Size::ZERO, LabelBands::default()),
    };

    let origin = Position::new(
        chrome.left + stroke + config.content_padding,
        chrome.top + stroke + bands.header + config.content_padding,
    );
    let content_children = args.content_children();
    let content = place_free_children(pass, args, &content_children, origin);

    let border = args.border_children();
    let footprints = pass.border_footprints(&border);

    let body = if style.body_matches_band {
        bands.header
    } else {
        0.0
    };
    let mut width = footprint.width + chrome.horizontal();
    let mut height = chrome.vertical() + bands.total() + 2.0 * stroke + body;
    if let Some(content) = content.filter(|_| style.children_in_content) {
        width = width.max(content.right + config.content_padding + stroke + chrome.right);
        height = height.max(
            content.bottom + config.content_padding + bands.footer + stroke + chrome.bottom,
        );
    }
    width = width
        .max(footprints.north)
        .max(footprints.south)
        .max(node.default_width);
    height = height.max(footprints.east).max(footprints.west).max(style.min_height);
    if style.use_default_height {
        height = height.max(node.default_height);
    }
    pass.enter(&node.id, LayoutPhase::SizeComputed);

    let previous = pass.previous_node(&node.id);
    let size = reconcile_node(node, Size::new(width, height), previous);
    pass.enter(&node.id, LayoutPhase::ReconciledWithPrevious);

    let ratio = ratio_for(node, style.ratio, previous);
    let size = finish_size(size, args.forced, ratio);
    pass.set_size(&node.id, size);

    let size = pass.size_of(&node.id);
    tracing::trace!(node = %node.id, width = size.width, height = size.height, "sized node");
    pass.place_border_nodes(&border, size);
    pass.enter(&node.id, LayoutPhase::PositionsAssigned);

    FrameOutcome { size, bands }
}

pub(super) fn ratio_for(
    node: &Node,
    rule: RatioRule,
    previous: Option<&NodeLayout>,
) -> Option<f32> {
    match rule {
        RatioRule::NodeFlag if node.keep_aspect_ratio => locked_ratio(node, previous),
        RatioRule::NodeFlag | RatioRule::Disabled => None,
        RatioRule::Intrinsic if node.default_width > 0.0 && node.default_height > 0.0 => {
            Some(node.default_width / node.default_height)
        }
        RatioRule::Intrinsic => None,
    }
}

/// Apply forced dimensions, then the locked ratio on whatever axis is free.
pub(super) fn finish_size(size: Size, forced: ForcedDimensions, ratio: Option<f32>) -> Size {
    let size = forced.apply(size);
    let Some(ratio) = ratio.filter(|ratio| ratio.is_finite() && *ratio > 0.0) else {
        return size;
    };
    match (forced.width, forced.height) {
        (Some(_), Some(_)) => size,
        (Some(_), None) => Size::new(size.width, size.width / ratio),
        (None, Some(_)) => Size::new(size.height * ratio, size.height),
        (None, None) => apply_aspect_ratio(size, ratio),
    }
}

/// Position `children` inside the parent and return their bounding box.
///
/// Children keep a previous position (pushed out of the header if needed).
/// The newly added child lands on the reference position when it targets
/// this parent; the rest are stacked under the lowest placed child.
pub(super) fn place_free_children(
    pass: &mut LayoutPass<'_>,
    args: &HandlerArgs<'_>,
    children: &[&Node],
    origin: Position,
) -> Option<ContentBounds> {
    if children.is_empty() {
        return None;
    }
    let reference = pass.reference_for(Some(&args.node.id));
    let clamp = |position: Position| {
        Position::new(position.x.max(origin.x), position.y.max(origin.y))
    };

    let mut bottom: Option<f32> = None;
    let mut pending = Vec::new();
    for &child in children {
        let known = match pass.previous_node(&child.id) {
            Some(prev) => Some(prev.position()),
            None if args.newly_added.is_some_and(|added| added.id == child.id) => reference,
            None => None,
        };
        match known {
            Some(position) => {
                let position = clamp(position);
                pass.set_position(&child.id, position);
                let edge = position.y + pass.size_of(&child.id).height;
                bottom = Some(bottom.map_or(edge, |b| b.max(edge)));
            }
            None => pending.push(child),
        }
    }
    for child in pending {
        let y = bottom.map_or(origin.y, |b| b + pass.config.child_gap);
        pass.set_position(&child.id, Position::new(origin.x, y));
        bottom = Some(y + pass.size_of(&child.id).height);
    }

    let outputs = pass.outputs();
    let bounds = children
        .iter()
        .filter_map(|child| outputs.get(&child.id))
        .fold(ContentBounds::default(), |acc, output| ContentBounds {
            right: acc.right.max(output.x + output.width),
            bottom: acc.bottom.max(output.y + output.height),
        });
    Some(bounds)
}
