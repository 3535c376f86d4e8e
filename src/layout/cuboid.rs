use super::frame::{Chrome, FrameStyle, RatioRule, finish_size, layout_frame, ratio_for};
use super::label::{label_bands, label_footprint};
use super::resize::reconcile_node;
use super::types::non_negative;
use super::*;
use crate::ir::ShapeKind;

pub(super) fn can_handle_leaf(node: &Node) -> bool {
    node.shape == ShapeKind::CuboidLeaf
}

pub(super) fn can_handle_list(node: &Node) -> bool {
    node.shape == ShapeKind::CuboidList
}

pub(super) fn compute_leaf(pass: &mut LayoutPass<'_>, args: &HandlerArgs<'_>) {
    let border = pass.config.cuboid_border;
    let style = FrameStyle::new(Chrome {
        top: border,
        right: border,
        ..Chrome::default()
    });
    layout_frame(pass, args, &style);
}

/// Rows are stacked on the front face, as wide as the face, with spare
/// height handed to growable rows.
pub(super) fn compute_list(pass: &mut LayoutPass<'_>, args: &HandlerArgs<'_>) {
    let node = args.node;
    let config = pass.config;
    let measurement = pass.measurement(&node.id);
    let stroke = measurement.border_stroke_width;
    let footprint = label_footprint(node, &measurement, config);
    let bands = label_bands(node, footprint, stroke);
    let chrome = Chrome {
        left: stroke,
        right: config.cuboid_border + stroke,
        top: config.cuboid_border + stroke + bands.header + non_negative(node.top_gap),
        bottom: non_negative(node.bottom_gap) + bands.footer + stroke,
    };

    let rows = args.content_children();
    let naturals: Vec<Size> = rows.iter().map(|row| pass.natural_size(&row.id)).collect();
    let border = args.border_children();
    let footprints = pass.border_footprints(&border);

    let widest = naturals.iter().map(|size| size.width).fold(0.0, f32::max);
    let stacked: f32 = naturals.iter().map(|size| size.height).sum();
    let width = (footprint.width + config.cuboid_border)
        .max(widest + chrome.horizontal())
        .max(footprints.min_width())
        .max(node.default_width);
    let height = (chrome.vertical() + stacked)
        .max(footprints.min_height())
        .max(node.default_height);
    pass.enter(&node.id, LayoutPhase::SizeComputed);

    let previous = pass.previous_node(&node.id);
    let size = reconcile_node(node, Size::new(width, height), previous);
    pass.enter(&node.id, LayoutPhase::ReconciledWithPrevious);

    let ratio = ratio_for(node, RatioRule::NodeFlag, previous);
    let mut size = finish_size(size, args.forced, ratio).clamped();

    let clamped = node.resized_by_user || args.forced.height.is_some();
    let available = (size.height - chrome.vertical()).max(0.0);
    let growable: Vec<bool> = rows
        .iter()
        .map(|row| node.growable_node_ids.contains(row.growable_key()))
        .collect();
    let heights: Vec<f32> = naturals.iter().map(|size| size.height).collect();
    let heights = distribute_list_heights(&heights, &growable, available, clamped);

    // Unclamped rows may overflow; the list grows and a locked ratio widens it.
    if !clamped {
        let needed = chrome.vertical() + heights.iter().sum::<f32>();
        if needed > size.height {
            size.height = needed;
            if let Some(ratio) = ratio.filter(|_| args.forced.width.is_none()) {
                size = apply_aspect_ratio(size, ratio);
            }
        }
    }

    let inner_width = (size.width - chrome.horizontal()).max(0.0);
    let mut y = chrome.top;
    for (row, height) in rows.iter().zip(heights) {
        pass.force_dimensions(&row.id, ForcedDimensions::new(inner_width, height));
        pass.set_position(&row.id, Position::new(chrome.left, y));
        y += pass.size_of(&row.id).height;
    }
    pass.set_size(&node.id, size);

    pass.place_border_nodes(&border, size);
    pass.enter(&node.id, LayoutPhase::PositionsAssigned);
    tracing::trace!(node = %node.id, rows = rows.len(), clamped, "stacked list rows");
}

/// Heights of list rows sharing `available` content height.
///
/// Fixed rows keep their natural height. Growable rows split what is left
/// and never shrink below their natural height, unless `clamped` forbids
/// overflowing `available`, in which case they are compressed to fit.
pub fn distribute_list_heights(
    naturals: &[f32],
    growable: &[bool],
    available: f32,
    clamped: bool,
) -> Vec<f32> {
    let is_growable = |idx: usize| growable.get(idx).copied().unwrap_or(false);
    let mut heights: Vec<f32> = naturals.iter().map(|h| h.max(0.0)).collect();
    let growing: Vec<usize> = (0..heights.len()).filter(|&idx| is_growable(idx)).collect();
    if growing.is_empty() {
        return heights;
    }

    let fixed: f32 = (0..heights.len())
        .filter(|&idx| !is_growable(idx))
        .map(|idx| heights[idx])
        .sum();
    let budget = (available - fixed).max(0.0);
    let share = budget / growing.len() as f32;
    for &idx in &growing {
        heights[idx] = heights[idx].max(share);
    }

    let total: f32 = growing.iter().map(|&idx| heights[idx]).sum();
    if clamped && total > budget {
        tracing::debug!(total, budget, "compressing growable list rows");
        let natural: Vec<f32> = growing.iter().map(|&idx| naturals[idx].max(0.0)).collect();
        for (&idx, height) in growing.iter().zip(compress(&natural, budget)) {
            heights[idx] = height;
        }
    }
    heights
}

fn compress(naturals: &[f32], budget: f32) -> Vec<f32> {
    let total: f32 = naturals.iter().sum();
    if total <= budget {
        let level = water_level(naturals, budget);
        return naturals.iter().map(|h| h.max(level)).collect();
    }
    if total <= 0.0 {
        return vec![0.0; naturals.len()];
    }
    let scale = budget / total;
    naturals.iter().map(|h| h * scale).collect()
}

// Level L with sum(max(h, L)) == budget, assuming sum(h) <= budget.
fn water_level(naturals: &[f32], budget: f32) -> f32 {
    let mut sorted = naturals.to_vec();
    sorted.sort_by(f32::total_cmp);
    let n = sorted.len();
    for k in 1..=n {
        let rest: f32 = sorted[k..].iter().sum();
        let level = (budget - rest) / k as f32;
        if k == n || level <= sorted[k] {
            return level.max(0.0);
        }
    }
    0.0
}
