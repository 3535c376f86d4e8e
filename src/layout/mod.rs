mod border;
mod cuboid;
mod external_label;
mod flag;
mod frame;
mod image;
mod label;
mod note;
mod package;
mod resize;
pub(crate) mod types;
pub use border::{
    BorderFootprints, border_footprint, border_node_extent, east_footprint, north_footprint,
    set_border_nodes_position, south_footprint, west_footprint,
};
pub use cuboid::distribute_list_heights;
pub use resize::{apply_aspect_ratio, locked_ratio, reconcile};
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::{Node, NodeTree};
use crate::measure::{Measurement, MeasurementProvider};
use std::collections::{BTreeMap, HashMap};

/// Lay out every node of `tree`.
///
/// `previous` is the prior generation of the same diagram (ids missing from
/// it are treated as newly added) and `reference` the position at which the
/// user created a node in this generation, if any.
pub fn compute_layout(
    tree: &NodeTree,
    previous: Option<&Layout>,
    reference: Option<&ReferencePosition>,
    measurements: &dyn MeasurementProvider,
    config: &LayoutConfig,
) -> Layout {
    let mut pass = LayoutPass::new(tree, previous, reference, measurements, config);
    pass.execute();
    pass.into_layout()
}

/// Inputs of one handler invocation.
pub(crate) struct HandlerArgs<'a> {
    pub node: &'a Node,
    pub siblings: Vec<&'a Node>,
    pub children: Vec<&'a Node>,
    pub newly_added: Option<&'a Node>,
    pub forced: ForcedDimensions,
}

impl<'a> HandlerArgs<'a> {
    pub fn border_children(&self) -> Vec<&'a Node> {
        self.children
            .iter()
            .copied()
            .filter(|child| child.is_border_node)
            .collect()
    }

    pub fn content_children(&self) -> Vec<&'a Node> {
        self.children
            .iter()
            .copied()
            .filter(|child| !child.is_border_node)
            .collect()
    }

    pub fn sibling_index(&self) -> Option<usize> {
        self.siblings
            .iter()
            .position(|sibling| sibling.id == self.node.id)
    }
}

struct ShapeHandler {
    name: &'static str,
    can_handle: fn(&Node) -> bool,
    compute: fn(&mut LayoutPass<'_>, &HandlerArgs<'_>),
}

// First match wins.
static HANDLERS: [ShapeHandler; 8] = [
    ShapeHandler {
        name: "package",
        can_handle: package::can_handle,
        compute: package::compute,
    },
    ShapeHandler {
        name: "cuboid-list",
        can_handle: cuboid::can_handle_list,
        compute: cuboid::compute_list,
    },
    ShapeHandler {
        name: "cuboid-leaf",
        can_handle: cuboid::can_handle_leaf,
        compute: cuboid::compute_leaf,
    },
    ShapeHandler {
        name: "note",
        can_handle: note::can_handle,
        compute: note::compute,
    },
    ShapeHandler {
        name: "inner-flag",
        can_handle: flag::can_handle_inner,
        compute: flag::compute_inner,
    },
    ShapeHandler {
        name: "outer-flag",
        can_handle: flag::can_handle_outer,
        compute: flag::compute_outer,
    },
    ShapeHandler {
        name: "rectangle-external-label",
        can_handle: external_label::can_handle,
        compute: external_label::compute,
    },
    ShapeHandler {
        name: "custom-image",
        can_handle: image::can_handle,
        compute: image::compute,
    },
];

/// Per-node lifecycle bookkeeping. Phases only move forward.
#[derive(Debug, Default)]
pub(crate) struct PhaseTracker {
    phases: HashMap<String, LayoutPhase>,
}

impl PhaseTracker {
    pub fn phase(&self, id: &str) -> LayoutPhase {
        self.phases
            .get(id)
            .copied()
            .unwrap_or(LayoutPhase::Unmeasured)
    }

    pub fn advance(&mut self, id: &str, phase: LayoutPhase) {
        let current = self.phase(id);
        debug_assert!(
            phase > current,
            "node `{id}` cannot move from {current:?} to {phase:?}"
        );
        if phase > current {
            self.phases.insert(id.to_string(), phase);
        }
    }
}

/// State of one layout pass. Owns the output side-table while the immutable
/// tree is only read.
pub(crate) struct LayoutPass<'a> {
    tree: &'a NodeTree,
    previous: Option<&'a Layout>,
    reference: Option<&'a ReferencePosition>,
    measurements: &'a dyn MeasurementProvider,
    pub(crate) config: &'a LayoutConfig,
    nodes: BTreeMap<String, NodeLayout>,
    measured: HashMap<String, Measurement>,
    natural: HashMap<String, Size>,
    phases: PhaseTracker,
    diagnostics: Vec<Diagnostic>,
    forcing: usize,
}

impl<'a> LayoutPass<'a> {
    pub(crate) fn new(
        tree: &'a NodeTree,
        previous: Option<&'a Layout>,
        reference: Option<&'a ReferencePosition>,
        measurements: &'a dyn MeasurementProvider,
        config: &'a LayoutConfig,
    ) -> Self {
        let nodes = tree
            .nodes()
            .map(|node| {
                let mut output = NodeLayout::new(node.id.clone());
                if let Some(prev) = previous.and_then(|layout| layout.node(&node.id)) {
                    output.set_position(prev.position());
                    output.set_size(prev.size());
                }
                (node.id.clone(), output)
            })
            .collect();
        Self {
            tree,
            previous,
            reference,
            measurements,
            config,
            nodes,
            measured: HashMap::new(),
            natural: HashMap::new(),
            phases: PhaseTracker::default(),
            diagnostics: Vec::new(),
            forcing: 0,
        }
    }

    pub(crate) fn execute(&mut self) {
        let span = tracing::debug_span!("layout_pass", nodes = self.tree.len());
        let _guard = span.enter();
        let tree = self.tree;
        for root in tree.roots() {
            self.layout_subtree(root);
        }
        self.place_roots();
    }

    pub(crate) fn into_layout(self) -> Layout {
        let (mut width, mut height) = (0.0f32, 0.0f32);
        for root in self.tree.roots().filter(|root| !root.hidden) {
            if let Some(output) = self.nodes.get(&root.id) {
                width = width.max(output.x + output.width);
                height = height.max(output.y + output.height);
            }
        }
        tracing::debug!(
            width,
            height,
            diagnostics = self.diagnostics.len(),
            "layout pass finished"
        );
        Layout {
            nodes: self.nodes,
            width,
            height,
            diagnostics: self.diagnostics,
        }
    }

    fn layout_subtree(&mut self, node: &'a Node) {
        self.phases.advance(&node.id, LayoutPhase::MeasuringLabel);
        let measurement = self
            .measurements
            .measure(&node.id, node.label_id())
            .sanitized();
        self.measured.insert(node.id.clone(), measurement);

        let tree = self.tree;
        let children = tree.children(node);
        for &child in &children {
            self.layout_subtree(child);
        }
        debug_assert!(
            children
                .iter()
                .all(|child| self.phases.phase(&child.id) == LayoutPhase::Done)
        );
        self.phases.advance(&node.id, LayoutPhase::ChildrenLaidOut);

        let args = self.handler_args(node, ForcedDimensions::NONE);
        if !self.dispatch(&args) {
            tracing::warn!(
                node = %node.id,
                shape = node.shape.as_str(),
                "no layout handler for shape, keeping previous geometry"
            );
            self.diagnostics.push(Diagnostic {
                node_id: node.id.clone(),
                kind: DiagnosticKind::UnsupportedShape,
            });
        }
        let size = self.size_of(&node.id);
        self.natural.insert(node.id.clone(), size);
        self.phases.advance(&node.id, LayoutPhase::Done);
    }

    fn handler_args(&self, node: &'a Node, forced: ForcedDimensions) -> HandlerArgs<'a> {
        let tree = self.tree;
        let children = tree.visible_children(node);
        let newly_added = self.previous.and_then(|previous| {
            children
                .iter()
                .copied()
                .find(|child| previous.node(&child.id).is_none())
        });
        HandlerArgs {
            node,
            siblings: tree.visible_siblings(node),
            children,
            newly_added,
            forced,
        }
    }

    fn dispatch(&mut self, args: &HandlerArgs<'_>) -> bool {
        let Some(handler) = HANDLERS.iter().find(|handler| (handler.can_handle)(args.node)) else {
            return false;
        };
        tracing::trace!(
            node = %args.node.id,
            handler = handler.name,
            sibling = ?args.sibling_index(),
            forced = !args.forced.is_none(),
            "dispatch"
        );
        (handler.compute)(self, args);
        true
    }

    /// Re-run a laid out node's handler with dimensions imposed by its parent.
    pub(crate) fn force_dimensions(&mut self, id: &str, forced: ForcedDimensions) {
        let tree = self.tree;
        let Some(node) = tree.get(id) else {
            return;
        };
        let args = self.handler_args(node, forced);
        self.forcing += 1;
        let handled = self.dispatch(&args);
        self.forcing -= 1;
        if !handled {
            tracing::debug!(node = %id, "forced dimensions ignored for unsupported shape");
            return;
        }
        let natural = self.natural_size(id);
        self.node_layout_mut(id).natural = Some(natural);
    }

    fn place_roots(&mut self) {
        let tree = self.tree;
        let roots: Vec<&Node> = tree.roots().filter(|root| !root.hidden).collect();
        let newly_added = self.previous.and_then(|previous| {
            roots
                .iter()
                .copied()
                .find(|root| previous.node(&root.id).is_none())
        });
        let reference = self.reference_for(None);
        let gap = self.config.root_gap;

        let mut right: Option<f32> = None;
        let mut pending = Vec::new();
        for &root in &roots {
            let known = match self.previous_node(&root.id) {
                Some(prev) => Some(prev.position()),
                None if newly_added.is_some_and(|n| n.id == root.id) => reference,
                None => None,
            };
            match known {
                Some(position) => {
                    let output = self.node_layout_mut(&root.id);
                    output.set_position(position);
                    let edge = output.x + output.width;
                    right = Some(right.map_or(edge, |r| r.max(edge)));
                }
                None => pending.push(root),
            }
        }
        for root in pending {
            let x = right.map_or(gap, |r| r + gap);
            let output = self.node_layout_mut(&root.id);
            output.set_position(Position::new(x, gap));
            right = Some(x + output.width);
        }
    }

    pub(crate) fn measurement(&self, id: &str) -> Measurement {
        self.measured
            .get(id)
            .copied()
            .unwrap_or(Measurement::ZERO)
    }

    pub(crate) fn previous_node(&self, id: &str) -> Option<&'a NodeLayout> {
        self.previous.and_then(|layout| layout.node(id))
    }

    /// Reference position targeting children of `parent_id` (roots for `None`).
    pub(crate) fn reference_for(&self, parent_id: Option<&str>) -> Option<Position> {
        self.reference
            .filter(|reference| reference.parent_id.as_deref() == parent_id)
            .map(|reference| reference.position)
    }

    pub(crate) fn outputs(&self) -> &BTreeMap<String, NodeLayout> {
        &self.nodes
    }

    pub(crate) fn node_layout_mut(&mut self, id: &str) -> &mut NodeLayout {
        self.nodes
            .entry(id.to_string())
            .or_insert_with(|| NodeLayout::new(id))
    }

    pub(crate) fn size_of(&self, id: &str) -> Size {
        self.nodes.get(id).map(NodeLayout::size).unwrap_or(Size::ZERO)
    }

    /// Size from the node's own unforced pass.
    pub(crate) fn natural_size(&self, id: &str) -> Size {
        self.natural
            .get(id)
            .copied()
            .unwrap_or_else(|| self.size_of(id))
    }

    pub(crate) fn set_size(&mut self, id: &str, size: Size) {
        self.node_layout_mut(id).set_size(size);
    }

    pub(crate) fn set_position(&mut self, id: &str, position: Position) {
        self.node_layout_mut(id).set_position(position);
    }

    pub(crate) fn border_footprints(&self, border_nodes: &[&Node]) -> BorderFootprints {
        BorderFootprints::compute(
            border_nodes,
            &self.nodes,
            self.previous,
            self.config.border_node_gap,
        )
    }

    pub(crate) fn place_border_nodes(&mut self, border_nodes: &[&Node], parent: Size) {
        set_border_nodes_position(
            border_nodes,
            parent,
            &mut self.nodes,
            self.previous,
            self.config,
        );
    }

    /// Record a lifecycle step. Forced re-layouts run on finished nodes and
    /// leave the tracker alone.
    pub(crate) fn enter(&mut self, id: &str, phase: LayoutPhase) {
        if self.forcing == 0 {
            self.phases.advance(id, phase);
        }
    }

    #[cfg(test)]
    pub(crate) fn phase(&self, id: &str) -> LayoutPhase {
        self.phases.phase(id)
    }
}
