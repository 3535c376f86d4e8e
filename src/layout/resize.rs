use crate::ir::{Node, UserResizable};

use super::types::{NodeLayout, Size};

/// Combine a freshly computed minimum with the size the user left the node at.
pub fn reconcile(computed_minimum: Size, previous: Option<Size>, resized_by_user: bool) -> Size {
    match previous {
        Some(previous) if resized_by_user => previous.max(computed_minimum),
        _ => computed_minimum,
    }
}

impl UserResizable {
    /// Previous size with the axes the user cannot resize replaced by `computed`.
    pub fn mask(self, previous: Size, computed: Size) -> Size {
        Size::new(
            if self.horizontal() {
                previous.width
            } else {
                computed.width
            },
            if self.vertical() {
                previous.height
            } else {
                computed.height
            },
        )
    }
}

/// Reconcile `computed` against the node's previous generation.
pub(super) fn reconcile_node(node: &Node, computed: Size, previous: Option<&NodeLayout>) -> Size {
    let previous = previous.map(|prev| node.user_resizable.mask(prev.own_size(), computed));
    reconcile(computed, previous, node.resized_by_user)
}

/// Ratio a node is locked to: its default size, else its previous size.
pub fn locked_ratio(node: &Node, previous: Option<&NodeLayout>) -> Option<f32> {
    if node.default_width > 0.0 && node.default_height > 0.0 {
        return Some(node.default_width / node.default_height);
    }
    previous
        .filter(|prev| prev.width > 0.0 && prev.height > 0.0)
        .map(|prev| prev.width / prev.height)
}

/// Grow one side of `size` until `width / height == ratio`.
///
/// A shape wider than the ratio gets taller; a taller one gets wider. The
/// result is never smaller than the input on either axis.
pub fn apply_aspect_ratio(size: Size, ratio: f32) -> Size {
    if !ratio.is_finite() || ratio <= 0.0 {
        return size;
    }
    if size.height <= 0.0 {
        return Size::new(size.width, size.width / ratio);
    }
    let current = size.width / size.height;
    if current > ratio {
        Size::new(size.width, size.width / ratio)
    } else if current < ratio {
        Size::new(size.height * ratio, size.height)
    } else {
        size
    }
}
