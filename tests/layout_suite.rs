use std::path::Path;

use node_layout_rs::ir::{BorderSide, LabelPosition, ShapeKind};
use node_layout_rs::layout::{DiagnosticKind, Layout};
use node_layout_rs::{
    EstimatedMeasurements, LayoutConfig, MeasurementProvider, NodeTree, TextConfig,
    compute_layout, layout_document,
};

const FIXTURES: [&str; 4] = [
    "package_mixed.json",
    "cuboid_list.json",
    "roots_unknown.json",
    "resized.json",
];

fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).expect("fixture read failed")
}

fn layout_fixture(name: &str) -> (NodeTree, EstimatedMeasurements, Layout) {
    let input = load_fixture(name);
    let (tree, reference) = NodeTree::from_json(&input).expect("tree parse failed");
    let measurements = EstimatedMeasurements::from_tree(&tree, &TextConfig::default());
    let layout = compute_layout(
        &tree,
        None,
        reference.as_ref(),
        &measurements,
        &LayoutConfig::default(),
    );
    (tree, measurements, layout)
}

fn assert_close(a: &Layout, b: &Layout, fixture: &str) {
    assert_eq!(a.nodes.len(), b.nodes.len(), "{fixture}: node count");
    for (id, node) in &a.nodes {
        let other = b.node(id).unwrap_or_else(|| panic!("{fixture}: {id} missing"));
        for (lhs, rhs, what) in [
            (node.x, other.x, "x"),
            (node.y, other.y, "y"),
            (node.width, other.width, "width"),
            (node.height, other.height, "height"),
        ] {
            assert!((lhs - rhs).abs() < 1e-3, "{fixture}: {id}.{what} {lhs} != {rhs}");
        }
    }
}

#[test]
fn every_node_has_finite_geometry() {
    for fixture in FIXTURES {
        let (tree, _, layout) = layout_fixture(fixture);
        for node in tree.nodes() {
            let output = layout
                .node(&node.id)
                .unwrap_or_else(|| panic!("{fixture}: {} has no layout", node.id));
            assert!(output.x.is_finite() && output.y.is_finite(), "{fixture}: {}", node.id);
            assert!(output.width >= 0.0 && output.height >= 0.0, "{fixture}: {}", node.id);
        }
    }
}

#[test]
fn labelled_nodes_fit_their_label() {
    let config = LayoutConfig::default();
    for fixture in FIXTURES {
        let (tree, measurements, layout) = layout_fixture(fixture);
        for node in tree.nodes() {
            let interior_label = matches!(
                node.shape,
                ShapeKind::Package
                    | ShapeKind::CuboidLeaf
                    | ShapeKind::CuboidList
                    | ShapeKind::Note
                    | ShapeKind::InnerFlag
                    | ShapeKind::OuterFlag
            );
            if !interior_label || node.label.is_none() {
                continue;
            }
            let m = measurements.measure(&node.id, node.label_id());
            let output = layout.node(&node.id).unwrap();
            assert!(
                output.width >= m.label_width + config.label_padding,
                "{fixture}: {} width {} < label {}",
                node.id,
                output.width,
                m.label_width
            );
            assert!(
                output.height >= m.label_height + config.header_padding,
                "{fixture}: {} height {} < label {}",
                node.id,
                output.height,
                m.label_height
            );
        }
    }
}

#[test]
fn children_sit_below_the_header() {
    let config = LayoutConfig::default();
    for fixture in FIXTURES {
        let (tree, measurements, layout) = layout_fixture(fixture);
        for parent in tree.nodes() {
            let top_label = parent
                .label
                .as_ref()
                .is_some_and(|label| label.position == LabelPosition::Top);
            let interior = !matches!(
                parent.shape,
                ShapeKind::RectangleExternalLabel | ShapeKind::CustomImage | ShapeKind::Unknown
            );
            if !top_label || !interior {
                continue;
            }
            let header = measurements.measure(&parent.id, parent.label_id()).label_height
                + config.header_padding;
            for child in tree.visible_children(parent) {
                if child.is_border_node {
                    continue;
                }
                let output = layout.node(&child.id).unwrap();
                assert!(
                    output.y >= header,
                    "{fixture}: {} at y {} overlaps header {header} of {}",
                    child.id,
                    output.y,
                    parent.id
                );
                assert!(output.x >= 0.0, "{fixture}: {}", child.id);
            }
        }
    }
}

#[test]
fn border_nodes_fit_along_their_edge() {
    for fixture in FIXTURES {
        let (tree, _, layout) = layout_fixture(fixture);
        for parent in tree.nodes() {
            let size = layout.node(&parent.id).unwrap().size();
            for side in BorderSide::ALL {
                let nodes: Vec<_> = tree
                    .visible_children(parent)
                    .into_iter()
                    .filter(|child| child.is_border_node && child.border_side == side)
                    .collect();
                let total: f32 = nodes
                    .iter()
                    .map(|node| {
                        let output = layout.node(&node.id).unwrap();
                        assert!(output.extent.is_some(), "{fixture}: {} extent", node.id);
                        if side.is_horizontal() {
                            output.width
                        } else {
                            output.height
                        }
                    })
                    .sum();
                let edge = if side.is_horizontal() {
                    size.width
                } else {
                    size.height
                };
                assert!(
                    total <= edge,
                    "{fixture}: {side:?} border nodes of {} need {total}, edge is {edge}",
                    parent.id
                );
            }
        }
    }
}

#[test]
fn locked_nodes_keep_their_default_ratio() {
    let mut checked = 0;
    for fixture in FIXTURES {
        let (tree, _, layout) = layout_fixture(fixture);
        for node in tree.nodes() {
            if !node.keep_aspect_ratio || node.default_width <= 0.0 || node.default_height <= 0.0 {
                continue;
            }
            let output = layout.node(&node.id).unwrap();
            let expected = node.default_width / node.default_height;
            let actual = output.width / output.height;
            assert!(
                (actual - expected).abs() < 1e-3,
                "{fixture}: {} ratio {actual} != {expected}",
                node.id
            );
            checked += 1;
        }
    }
    assert!(checked >= 2);
}

#[test]
fn layout_is_deterministic_and_a_fixpoint() {
    let config = LayoutConfig::default();
    for fixture in FIXTURES {
        let (tree, measurements, first) = layout_fixture(fixture);
        let (_, _, again) = layout_fixture(fixture);
        assert_eq!(first, again, "{fixture}: not deterministic");

        let second = compute_layout(&tree, Some(&first), None, &measurements, &config);
        assert_close(&first, &second, fixture);
    }
}

#[test]
fn manual_resizes_survive_relayout() {
    let config = LayoutConfig::default();
    let (tree, measurements, first) = layout_fixture("resized.json");

    let mut previous = first.clone();
    let board = previous.nodes.get_mut("board").unwrap();
    board.width += 50.0;
    board.height += 40.0;
    let enlarged = board.size();
    let lines = previous.nodes.get_mut("lines").unwrap();
    lines.height += 30.0;
    lines.natural = None;
    let lines_height = lines.height;

    let second = compute_layout(&tree, Some(&previous), None, &measurements, &config);
    let board = second.node("board").unwrap();
    assert!(board.width >= enlarged.width && board.height >= enlarged.height);
    assert!(second.node("lines").unwrap().height >= lines_height);
    let orders = second.node("orders").unwrap();
    assert!((orders.width / orders.height - 2.0).abs() < 1e-3);

    let third = compute_layout(&tree, Some(&second), None, &measurements, &config);
    let fourth = compute_layout(&tree, Some(&third), None, &measurements, &config);
    assert_close(&second, &third, "resized.json");
    assert_close(&third, &fourth, "resized.json");
}

#[test]
fn unsupported_shapes_are_reported_not_fatal() {
    let (_, _, layout) = layout_fixture("roots_unknown.json");
    let mut flagged: Vec<&str> = layout
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::UnsupportedShape)
        .map(|d| d.node_id.as_str())
        .collect();
    flagged.sort_unstable();
    assert_eq!(flagged, vec!["b", "c1"]);
    let c2 = layout.node("c2").unwrap();
    assert!(c2.width > 0.0 && c2.height > 0.0);
}

#[test]
fn newly_added_child_lands_on_reference() {
    let input = load_fixture("roots_unknown.json");
    let config = LayoutConfig::default();
    let (tree, reference) = NodeTree::from_json(&input).unwrap();
    let measurements = EstimatedMeasurements::from_tree(&tree, &TextConfig::default());
    let mut previous = compute_layout(&tree, None, None, &measurements, &config);
    previous.nodes.remove("c2");

    let layout = compute_layout(&tree, Some(&previous), reference.as_ref(), &measurements, &config);
    let c2 = layout.node("c2").unwrap();
    assert_eq!((c2.x, c2.y), (40.0, 80.0));
    let c = layout.node("c").unwrap();
    assert!(c.width >= c2.x + c2.width);
    assert!(c.height >= c2.y + c2.height);
}

#[test]
fn list_rows_fill_the_front_face() {
    let (tree, _, layout) = layout_fixture("cuboid_list.json");
    let config = LayoutConfig::default();
    let entity = layout.node("entity").unwrap();
    let rows = ["header", "attributes", "operations"];
    let widths: Vec<f32> = rows.iter().map(|id| layout.node(id).unwrap().width).collect();
    assert!(widths.windows(2).all(|pair| pair[0] == pair[1]));
    assert!(widths[0] <= entity.width - config.cuboid_border);

    let mut bottom = 0.0f32;
    for id in rows {
        let row = layout.node(id).unwrap();
        assert!(row.y >= bottom, "{id} overlaps the previous row");
        bottom = row.y + row.height;
    }
    assert!(bottom <= entity.height);
    assert!(tree.get("port").unwrap().is_border_node);
    assert!(layout.node("port").unwrap().y < 0.0);
}

#[test]
fn layout_document_parses_and_lays_out() {
    let input = load_fixture("package_mixed.json");
    let measurements = node_layout_rs::NullMeasurements;
    let (tree, layout) =
        layout_document(&input, &measurements, &LayoutConfig::default()).expect("valid document");
    assert_eq!(tree.len(), layout.nodes.len());
    assert!(layout.width > 0.0);
    let invalid = r#"{ "nodes": [ { "id": 1 } ] }"#;
    assert!(layout_document(invalid, &measurements, &LayoutConfig::default()).is_err());
}
