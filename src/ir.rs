use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::error::TreeError;
use crate::layout::ReferencePosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    Package,
    CuboidLeaf,
    CuboidList,
    Note,
    InnerFlag,
    OuterFlag,
    RectangleExternalLabel,
    CustomImage,
    #[serde(other)]
    Unknown,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::CuboidLeaf => "cuboidLeaf",
            Self::CuboidList => "cuboidList",
            Self::Note => "note",
            Self::InnerFlag => "innerFlag",
            Self::OuterFlag => "outerFlag",
            Self::RectangleExternalLabel => "rectangleExternalLabel",
            Self::CustomImage => "customImage",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderSide {
    North,
    South,
    #[default]
    East,
    West,
}

impl BorderSide {
    pub const ALL: [BorderSide; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// North and south border nodes line up along the horizontal edges.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::North | Self::South)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserResizable {
    None,
    #[default]
    Both,
    Horizontal,
    Vertical,
}

impl UserResizable {
    pub fn horizontal(self) -> bool {
        matches!(self, Self::Both | Self::Horizontal)
    }

    pub fn vertical(self) -> bool {
        matches!(self, Self::Both | Self::Vertical)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPosition {
    #[default]
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Label {
    pub id: Option<String>,
    pub text: String,
    pub position: LabelPosition,
    pub header_separator: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub shape: ShapeKind,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default)]
    pub description_id: Option<String>,
    #[serde(default)]
    pub is_border_node: bool,
    #[serde(default)]
    pub border_side: BorderSide,
    #[serde(default)]
    pub label: Option<Label>,
    #[serde(default)]
    pub default_width: f32,
    #[serde(default)]
    pub default_height: f32,
    #[serde(default)]
    pub user_resizable: UserResizable,
    #[serde(default)]
    pub keep_aspect_ratio: bool,
    #[serde(default)]
    pub resized_by_user: bool,
    #[serde(default)]
    pub growable_node_ids: BTreeSet<String>,
    #[serde(default)]
    pub top_gap: f32,
    #[serde(default)]
    pub bottom_gap: f32,
    #[serde(default)]
    pub hidden: bool,
}

impl Node {
    pub fn new(id: impl Into<String>, shape: ShapeKind) -> Self {
        Self {
            id: id.into(),
            shape,
            parent_id: None,
            children: Vec::new(),
            description_id: None,
            is_border_node: false,
            border_side: BorderSide::default(),
            label: None,
            default_width: 0.0,
            default_height: 0.0,
            user_resizable: UserResizable::default(),
            keep_aspect_ratio: false,
            resized_by_user: false,
            growable_node_ids: BTreeSet::new(),
            top_gap: 0.0,
            bottom_gap: 0.0,
            hidden: false,
        }
    }

    pub fn with_label(mut self, text: impl Into<String>) -> Self {
        self.label = Some(Label {
            text: text.into(),
            ..Label::default()
        });
        self
    }

    pub fn with_default_size(mut self, width: f32, height: f32) -> Self {
        self.default_width = width;
        self.default_height = height;
        self
    }

    pub fn label_id(&self) -> Option<&str> {
        self.label.as_ref().and_then(|label| label.id.as_deref())
    }

    /// Key matched against a list parent's `growable_node_ids`.
    pub fn growable_key(&self) -> &str {
        self.description_id.as_deref().unwrap_or(&self.id)
    }
}

/// Wire shape of a tree handed over by the conversion step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeDocument {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub reference_position: Option<ReferencePosition>,
}

/// Validated, immutable node hierarchy.
#[derive(Debug, Clone, Default)]
pub struct NodeTree {
    nodes: Vec<Node>,
    index: BTreeMap<String, usize>,
    roots: Vec<usize>,
}

impl NodeTree {
    pub fn from_nodes(nodes: Vec<Node>) -> Result<Self, TreeError> {
        let mut index = BTreeMap::new();
        for (idx, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), idx).is_some() {
                return Err(TreeError::DuplicateId(node.id.clone()));
            }
        }

        for node in &nodes {
            if let Some(parent_id) = node.parent_id.as_deref() {
                let Some(&parent_idx) = index.get(parent_id) else {
                    return Err(TreeError::UnknownParent {
                        node: node.id.clone(),
                        parent: parent_id.to_string(),
                    });
                };
                if !nodes[parent_idx].children.iter().any(|c| c == &node.id) {
                    return Err(TreeError::ParentMismatch {
                        node: node.id.clone(),
                        parent: parent_id.to_string(),
                    });
                }
            }
            for child_id in &node.children {
                let Some(&child_idx) = index.get(child_id) else {
                    return Err(TreeError::UnknownChild {
                        node: node.id.clone(),
                        child: child_id.clone(),
                    });
                };
                if nodes[child_idx].parent_id.as_deref() != Some(node.id.as_str()) {
                    return Err(TreeError::ParentMismatch {
                        node: child_id.clone(),
                        parent: node.id.clone(),
                    });
                }
            }
        }

        let roots: Vec<usize> = nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.parent_id.is_none())
            .map(|(idx, _)| idx)
            .collect();

        let tree = Self {
            nodes,
            index,
            roots,
        };
        tree.check_acyclic()?;
        Ok(tree)
    }

    pub fn from_document(
        document: TreeDocument,
    ) -> Result<(Self, Option<ReferencePosition>), TreeError> {
        let tree = Self::from_nodes(document.nodes)?;
        Ok((tree, document.reference_position))
    }

    pub fn from_json(json: &str) -> Result<(Self, Option<ReferencePosition>), TreeError> {
        let document: TreeDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    // Every node must be reachable from a root exactly once; anything left
    // over sits on a parent/child loop.
    fn check_acyclic(&self) -> Result<(), TreeError> {
        let mut seen: HashSet<usize> = HashSet::new();
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            if !seen.insert(idx) {
                return Err(TreeError::Cycle(self.nodes[idx].id.clone()));
            }
            for child_id in self.nodes[idx].children.iter().rev() {
                stack.push(self.index[child_id]);
            }
        }
        if let Some(node) = self
            .nodes
            .iter()
            .enumerate()
            .find(|(idx, _)| !seen.contains(idx))
            .map(|(_, node)| node)
        {
            return Err(TreeError::Cycle(node.id.clone()));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.roots.iter().map(|&idx| &self.nodes[idx])
    }

    pub fn parent(&self, node: &Node) -> Option<&Node> {
        node.parent_id.as_deref().and_then(|id| self.get(id))
    }

    /// Direct children in declaration order, hidden ones included.
    pub fn children(&self, node: &Node) -> Vec<&Node> {
        node.children
            .iter()
            .filter_map(|id| self.get(id))
            .collect()
    }

    pub fn visible_children(&self, node: &Node) -> Vec<&Node> {
        self.children(node)
            .into_iter()
            .filter(|child| !child.hidden)
            .collect()
    }

    /// Visible nodes sharing `node`'s parent (roots for a root), `node` included.
    pub fn visible_siblings(&self, node: &Node) -> Vec<&Node> {
        match self.parent(node) {
            Some(parent) => self.visible_children(parent),
            None => self.roots().filter(|root| !root.hidden).collect(),
        }
    }
}
