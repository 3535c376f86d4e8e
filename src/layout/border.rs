use std::collections::BTreeMap;

use crate::config::LayoutConfig;
use crate::ir::{BorderSide, Node};

use super::types::{Extent, Layout, NodeLayout, Position, Size};

fn on_side<'n>(border_nodes: &[&'n Node], side: BorderSide) -> Vec<&'n Node> {
    border_nodes
        .iter()
        .copied()
        .filter(|node| node.border_side == side)
        .collect()
}

fn length_along(side: BorderSide, size: Size) -> f32 {
    if side.is_horizontal() {
        size.width
    } else {
        size.height
    }
}

fn offset_along(side: BorderSide, position: Position) -> f32 {
    if side.is_horizontal() {
        position.x
    } else {
        position.y
    }
}

fn size_in(outputs: &BTreeMap<String, NodeLayout>, id: &str) -> Size {
    outputs.get(id).map(NodeLayout::size).unwrap_or(Size::ZERO)
}

/// Length of parent edge `side` needed to host its border nodes.
///
/// Either the nodes packed with `gap` around each of them, or the furthest
/// previous placement plus a trailing gap, whichever is longer.
pub fn border_footprint(
    side: BorderSide,
    border_nodes: &[&Node],
    outputs: &BTreeMap<String, NodeLayout>,
    previous: Option<&Layout>,
    gap: f32,
) -> f32 {
    let nodes = on_side(border_nodes, side);
    if nodes.is_empty() {
        return 0.0;
    }
    let packed = nodes
        .iter()
        .map(|node| length_along(side, size_in(outputs, &node.id)))
        .sum::<f32>()
        + gap * (nodes.len() as f32 + 1.0);
    let placed = nodes
        .iter()
        .filter_map(|node| {
            let prev = previous?.node(&node.id)?;
            let length = length_along(side, size_in(outputs, &node.id));
            Some(offset_along(side, prev.position()).max(0.0) + length + gap)
        })
        .fold(0.0, f32::max);
    packed.max(placed)
}

pub fn north_footprint(
    border_nodes: &[&Node],
    outputs: &BTreeMap<String, NodeLayout>,
    previous: Option<&Layout>,
    gap: f32,
) -> f32 {
    border_footprint(BorderSide::North, border_nodes, outputs, previous, gap)
}

pub fn south_footprint(
    border_nodes: &[&Node],
    outputs: &BTreeMap<String, NodeLayout>,
    previous: Option<&Layout>,
    gap: f32,
) -> f32 {
    border_footprint(BorderSide::South, border_nodes, outputs, previous, gap)
}

pub fn east_footprint(
    border_nodes: &[&Node],
    outputs: &BTreeMap<String, NodeLayout>,
    previous: Option<&Layout>,
    gap: f32,
) -> f32 {
    border_footprint(BorderSide::East, border_nodes, outputs, previous, gap)
}

pub fn west_footprint(
    border_nodes: &[&Node],
    outputs: &BTreeMap<String, NodeLayout>,
    previous: Option<&Layout>,
    gap: f32,
) -> f32 {
    border_footprint(BorderSide::West, border_nodes, outputs, previous, gap)
}

/// Footprints of all four sides of one parent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BorderFootprints {
    pub north: f32,
    pub south: f32,
    pub east: f32,
    pub west: f32,
}

impl BorderFootprints {
    pub fn compute(
        border_nodes: &[&Node],
        outputs: &BTreeMap<String, NodeLayout>,
        previous: Option<&Layout>,
        gap: f32,
    ) -> Self {
        Self {
            north: north_footprint(border_nodes, outputs, previous, gap),
            south: south_footprint(border_nodes, outputs, previous, gap),
            east: east_footprint(border_nodes, outputs, previous, gap),
            west: west_footprint(border_nodes, outputs, previous, gap),
        }
    }

    pub fn min_width(&self) -> f32 {
        self.north.max(self.south)
    }

    pub fn min_height(&self) -> f32 {
        self.east.max(self.west)
    }
}

/// Region a border node of size `node` may move in, relative to `parent`.
pub fn border_node_extent(parent: Size, node: Size, offset: f32) -> Extent {
    Extent {
        min: Position::new(-node.width + offset, -node.height + offset),
        max: Position::new(
            parent.width + node.width - offset,
            parent.height + node.height - offset,
        ),
    }
}

fn across_edge(side: BorderSide, parent: Size, node: Size, offset: f32) -> f32 {
    match side {
        BorderSide::North => -node.height + offset,
        BorderSide::South => parent.height - offset,
        BorderSide::East => parent.width - offset,
        BorderSide::West => -node.width + offset,
    }
}

/// Offsets along an edge of `edge` length spacing `lengths` evenly.
pub(super) fn distribute_evenly(lengths: &[f32], edge: f32) -> Vec<f32> {
    let total: f32 = lengths.iter().sum();
    let spacing = ((edge - total) / (lengths.len() as f32 + 1.0)).max(0.0);
    let mut cursor = spacing;
    lengths
        .iter()
        .map(|length| {
            let offset = cursor;
            cursor += length + spacing;
            offset
        })
        .collect()
}

/// Place border nodes straddling their parent's edges and record their extent.
pub fn set_border_nodes_position(
    border_nodes: &[&Node],
    parent: Size,
    outputs: &mut BTreeMap<String, NodeLayout>,
    previous: Option<&Layout>,
    config: &LayoutConfig,
) {
    let offset = config.border_node_offset;
    for side in BorderSide::ALL {
        let nodes = on_side(border_nodes, side);
        if nodes.is_empty() {
            continue;
        }
        let edge = length_along(side, parent);
        let sizes: Vec<Size> = nodes.iter().map(|node| size_in(outputs, &node.id)).collect();
        let prior: Vec<Option<f32>> = nodes
            .iter()
            .map(|node| {
                previous
                    .and_then(|layout| layout.node(&node.id))
                    .map(|prev| offset_along(side, prev.position()))
            })
            .collect();

        let along: Vec<f32> = if prior.iter().all(Option::is_none) {
            let lengths: Vec<f32> = sizes.iter().map(|size| length_along(side, *size)).collect();
            distribute_evenly(&lengths, edge)
        } else {
            let mut along = vec![0.0; nodes.len()];
            let mut furthest = 0.0f32;
            for (idx, size) in sizes.iter().enumerate() {
                if let Some(prev) = prior[idx] {
                    let length = length_along(side, *size);
                    along[idx] = prev.clamp(0.0, (edge - length).max(0.0));
                    furthest = furthest.max(along[idx] + length);
                }
            }
            for (idx, size) in sizes.iter().enumerate() {
                if prior[idx].is_none() {
                    let length = length_along(side, *size);
                    along[idx] = (furthest + config.border_node_gap).min((edge - length).max(0.0));
                    furthest = along[idx] + length;
                }
            }
            along
        };

        for ((node, size), along) in nodes.iter().zip(&sizes).zip(along) {
            let across = across_edge(side, parent, *size, offset);
            let position = if side.is_horizontal() {
                Position::new(along, across)
            } else {
                Position::new(across, along)
            };
            let output = outputs
                .entry(node.id.clone())
                .or_insert_with(|| NodeLayout::new(node.id.clone()));
            output.set_position(position);
            output.extent = Some(border_node_extent(parent, *size, offset));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ShapeKind;

    fn port(id: &str, side: BorderSide) -> Node {
        let mut node = Node::new(id, ShapeKind::RectangleExternalLabel);
        node.is_border_node = true;
        node.border_side = side;
        node
    }

    fn sized(id: &str, width: f32, height: f32) -> (String, NodeLayout) {
        let mut output = NodeLayout::new(id);
        output.set_size(Size::new(width, height));
        (id.to_string(), output)
    }

    #[test]
    fn single_east_node_needs_its_height() {
        let node = port("p", BorderSide::East);
        let outputs: BTreeMap<_, _> = [sized("p", 10.0, 30.0)].into_iter().collect();
        let footprint = east_footprint(&[&node], &outputs, None, 8.0);
        assert!(footprint >= 30.0);
        assert_eq!(footprint, 46.0);
        assert_eq!(north_footprint(&[&node], &outputs, None, 8.0), 0.0);
    }

    #[test]
    fn footprint_respects_previous_offsets() {
        let node = port("p", BorderSide::South);
        let outputs: BTreeMap<_, _> = [sized("p", 20.0, 10.0)].into_iter().collect();
        let mut previous = Layout::default();
        let (_, mut prev) = sized("p", 20.0, 10.0);
        prev.x = 100.0;
        previous.nodes.insert("p".into(), prev);
        assert_eq!(
            south_footprint(&[&node], &outputs, Some(&previous), 8.0),
            128.0
        );
    }

    #[test]
    fn footprints_split_by_side() {
        let a = port("a", BorderSide::North);
        let b = port("b", BorderSide::North);
        let c = port("c", BorderSide::West);
        let outputs: BTreeMap<_, _> = [
            sized("a", 10.0, 10.0),
            sized("b", 20.0, 10.0),
            sized("c", 10.0, 12.0),
        ]
        .into_iter()
        .collect();
        let footprints = BorderFootprints::compute(&[&a, &b, &c], &outputs, None, 5.0);
        assert_eq!(footprints.north, 45.0);
        assert_eq!(footprints.west, 22.0);
        assert_eq!(footprints.min_width(), 45.0);
        assert_eq!(footprints.min_height(), 22.0);
    }

    #[test]
    fn extent_lets_node_straddle_the_edge() {
        let extent = border_node_extent(Size::new(100.0, 60.0), Size::new(10.0, 20.0), 5.0);
        assert_eq!(extent.min, Position::new(-5.0, -15.0));
        assert_eq!(extent.max, Position::new(105.0, 75.0));
    }

    #[test]
    fn even_distribution_leaves_equal_spacing() {
        assert_eq!(distribute_evenly(&[10.0, 10.0], 50.0), vec![10.0, 30.0]);
        assert_eq!(distribute_evenly(&[40.0, 40.0], 50.0), vec![0.0, 40.0]);
    }

    #[test]
    fn new_nodes_follow_the_furthest_placed_one() {
        let old = port("old", BorderSide::East);
        let new = port("new", BorderSide::East);
        let mut outputs: BTreeMap<_, _> = [sized("old", 10.0, 10.0), sized("new", 10.0, 10.0)]
            .into_iter()
            .collect();
        let mut previous = Layout::default();
        let (_, mut prev) = sized("old", 10.0, 10.0);
        prev.y = 20.0;
        previous.nodes.insert("old".into(), prev);

        let config = LayoutConfig::default();
        set_border_nodes_position(
            &[&old, &new],
            Size::new(80.0, 100.0),
            &mut outputs,
            Some(&previous),
            &config,
        );
        let old = &outputs["old"];
        let new = &outputs["new"];
        assert_eq!((old.x, old.y), (75.0, 20.0));
        assert_eq!((new.x, new.y), (75.0, 38.0));
        assert!(new.extent.is_some());
    }

    #[test]
    fn previous_offsets_are_clamped_to_the_edge() {
        let node = port("n", BorderSide::North);
        let mut outputs: BTreeMap<_, _> = [sized("n", 10.0, 10.0)].into_iter().collect();
        let mut previous = Layout::default();
        let (_, mut prev) = sized("n", 10.0, 10.0);
        prev.x = 500.0;
        previous.nodes.insert("n".into(), prev);
        set_border_nodes_position(
            &[&node],
            Size::new(60.0, 40.0),
            &mut outputs,
            Some(&previous),
            &LayoutConfig::default(),
        );
        assert_eq!((outputs["n"].x, outputs["n"].y), (50.0, -5.0));
    }
}
