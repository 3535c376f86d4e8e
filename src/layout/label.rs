use crate::config::LayoutConfig;
use crate::ir::{LabelPosition, Node};
use crate::measure::Measurement;

use super::types::Size;

/// Space the label needs inside the node, zero without a label.
pub(super) fn label_footprint(
    node: &Node,
    measurement: &Measurement,
    config: &LayoutConfig,
) -> Size {
    if node.label.is_none() {
        return Size::ZERO;
    }
    Size::new(
        measurement.label_width + 2.0 * measurement.border_stroke_width + config.label_padding,
        measurement.label_height + config.header_padding,
    )
}

/// Header and footer band heights occupied by the label.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(super) struct LabelBands {
    pub header: f32,
    pub footer: f32,
}

impl LabelBands {
    pub fn total(&self) -> f32 {
        self.header + self.footer
    }
}

pub(super) fn label_bands(node: &Node, footprint: Size, stroke: f32) -> LabelBands {
    let Some(label) = node.label.as_ref() else {
        return LabelBands::default();
    };
    let mut band = footprint.height;
    if label.header_separator {
        band += stroke.max(1.0);
    }
    match label.position {
        LabelPosition::Top => LabelBands {
            header: band,
            footer: 0.0,
        },
        LabelPosition::Bottom => LabelBands {
            header: 0.0,
            footer: band,
        },
    }
}

/// Number of characters shown in a package header tab.
pub(super) fn label_chars(node: &Node) -> usize {
    node.label
        .as_ref()
        .map(|label| {
            label
                .text
                .lines()
                .map(|line| line.trim().chars().count())
                .max()
                .unwrap_or(0)
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Label, ShapeKind};

    fn measured() -> Measurement {
        Measurement {
            label_width: 40.0,
            label_height: 14.0,
            border_stroke_width: 2.0,
        }
    }

    #[test]
    fn footprint_includes_padding_and_stroke() {
        let config = LayoutConfig::default();
        let node = Node::new("n", ShapeKind::Note).with_label("Note");
        assert_eq!(
            label_footprint(&node, &measured(), &config),
            Size::new(40.0 + 4.0 + 16.0, 14.0 + 8.0)
        );
        let bare = Node::new("n", ShapeKind::Note);
        assert_eq!(label_footprint(&bare, &measured(), &config), Size::ZERO);
    }

    #[test]
    fn separator_and_position_shape_the_bands() {
        let mut node = Node::new("n", ShapeKind::Package);
        node.label = Some(Label {
            text: "Pkg".into(),
            header_separator: true,
            ..Label::default()
        });
        let bands = label_bands(&node, Size::new(50.0, 22.0), 0.0);
        assert_eq!(bands, LabelBands { header: 23.0, footer: 0.0 });

        node.label.as_mut().unwrap().position = LabelPosition::Bottom;
        let bands = label_bands(&node, Size::new(50.0, 22.0), 3.0);
        assert_eq!(bands, LabelBands { header: 0.0, footer: 25.0 });
        assert_eq!(bands.total(), 25.0);
    }

    #[test]
    fn counts_widest_line() {
        let node = Node::new("n", ShapeKind::Package).with_label("ab\n  abcd ");
        assert_eq!(label_chars(&node), 4);
        assert_eq!(label_chars(&Node::new("n", ShapeKind::Package)), 0);
    }
}
