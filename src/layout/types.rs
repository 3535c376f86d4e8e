use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn max(self, other: Size) -> Size {
        Size::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Negative or non-finite components collapse to zero.
    pub fn clamped(self) -> Size {
        Size::new(non_negative(self.width), non_negative(self.height))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Region a border node rectangle may occupy, relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min: Position,
    pub max: Position,
}

/// Where the user dropped a node created in this generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferencePosition {
    #[serde(default)]
    pub parent_id: Option<String>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeLayout {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent: Option<Extent>,
    /// Header tab of package shapes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Size>,
    /// Size the node asked for before its parent imposed `width`/`height`.
    /// Editors resizing such a node clear it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural: Option<Size>,
}

impl NodeLayout {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            extent: None,
            header: None,
            natural: None,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Size the node itself settled on, ignoring dimensions its parent forced.
    pub fn own_size(&self) -> Size {
        self.natural.unwrap_or_else(|| self.size())
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn set_size(&mut self, size: Size) {
        let size = size.clamped();
        self.width = size.width;
        self.height = size.height;
    }

    pub fn set_position(&mut self, position: Position) {
        self.x = position.x;
        self.y = position.y;
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Layout {
    pub nodes: BTreeMap<String, NodeLayout>,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&NodeLayout> {
        self.nodes.get(id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub node_id: String,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// No handler accepted the node; it kept its previous geometry.
    UnsupportedShape,
}

/// Dimensions an ancestor imposes on a node, regardless of its own minimum.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ForcedDimensions {
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl ForcedDimensions {
    pub const NONE: ForcedDimensions = ForcedDimensions {
        width: None,
        height: None,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    pub fn is_none(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }

    pub fn apply(&self, size: Size) -> Size {
        Size::new(
            self.width.map(non_negative).unwrap_or(size.width),
            self.height.map(non_negative).unwrap_or(size.height),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayoutPhase {
    Unmeasured,
    MeasuringLabel,
    ChildrenLaidOut,
    SizeComputed,
    ReconciledWithPrevious,
    PositionsAssigned,
    Done,
}

pub(crate) fn non_negative(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
