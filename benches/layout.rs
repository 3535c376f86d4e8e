use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use node_layout_rs::config::{LayoutConfig, TextConfig};
use node_layout_rs::ir::{BorderSide, Node, NodeTree, ShapeKind};
use node_layout_rs::layout::compute_layout;
use node_layout_rs::measure::EstimatedMeasurements;
use std::hint::black_box;

fn child(id: String, parent: &mut Node, shape: ShapeKind) -> Node {
    parent.children.push(id.clone());
    let mut node = Node::new(id.clone(), shape).with_label(format!("Node {id}"));
    node.parent_id = Some(parent.id.clone());
    node
}

/// One package holding `count` notes plus a ring of border ports.
fn wide_tree(count: usize) -> NodeTree {
    let mut root = Node::new("root", ShapeKind::Package).with_label("Wide");
    let mut nodes = Vec::with_capacity(count + 1);
    for i in 0..count {
        let shape = if i % 5 == 0 {
            ShapeKind::RectangleExternalLabel
        } else {
            ShapeKind::Note
        };
        let mut node = child(format!("n{i}"), &mut root, shape);
        if shape == ShapeKind::RectangleExternalLabel {
            node.is_border_node = true;
            node.border_side = BorderSide::ALL[i / 5 % 4];
            node.default_width = 12.0;
            node.default_height = 12.0;
        }
        nodes.push(node);
    }
    nodes.insert(0, root);
    NodeTree::from_nodes(nodes).expect("valid wide tree")
}

/// Packages nested `depth` levels deep.
fn deep_tree(depth: usize) -> NodeTree {
    let mut nodes = vec![Node::new("d0", ShapeKind::Package).with_label("Level 0")];
    for level in 1..depth {
        let parent = nodes.last_mut().expect("non-empty");
        let shape = if level % 2 == 0 {
            ShapeKind::Package
        } else {
            ShapeKind::InnerFlag
        };
        let node = child(format!("d{level}"), parent, shape);
        nodes.push(node);
    }
    NodeTree::from_nodes(nodes).expect("valid deep tree")
}

/// A cuboid list with `rows` rows, every other one growable.
fn list_tree(rows: usize) -> NodeTree {
    let mut list = Node::new("list", ShapeKind::CuboidList).with_label("List");
    list.top_gap = 4.0;
    list.bottom_gap = 4.0;
    let mut nodes = Vec::with_capacity(rows + 1);
    for i in 0..rows {
        let row = child(format!("r{i}"), &mut list, ShapeKind::CuboidLeaf);
        if i % 2 == 0 {
            list.growable_node_ids.insert(row.id.clone());
        }
        nodes.push(row);
    }
    list.resized_by_user = true;
    nodes.insert(0, list);
    NodeTree::from_nodes(nodes).expect("valid list tree")
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let config = LayoutConfig::default();
    let text = TextConfig::default();
    let cases = [
        ("wide_50", wide_tree(50)),
        ("wide_500", wide_tree(500)),
        ("deep_64", deep_tree(64)),
        ("list_200", list_tree(200)),
    ];
    for (name, tree) in &cases {
        let measurements = EstimatedMeasurements::from_tree(tree, &text);
        group.bench_with_input(BenchmarkId::from_parameter(name), tree, |b, tree| {
            b.iter(|| {
                let layout = compute_layout(black_box(tree), None, None, &measurements, &config);
                black_box(layout.nodes.len());
            });
        });
    }
    group.finish();
}

fn bench_relayout(c: &mut Criterion) {
    let mut group = c.benchmark_group("relayout");
    let config = LayoutConfig::default();
    let text = TextConfig::default();
    for (name, tree) in [("wide_500", wide_tree(500)), ("list_200", list_tree(200))] {
        let measurements = EstimatedMeasurements::from_tree(&tree, &text);
        let previous = compute_layout(&tree, None, None, &measurements, &config);
        group.bench_with_input(BenchmarkId::from_parameter(name), &tree, |b, tree| {
            b.iter(|| {
                let layout =
                    compute_layout(black_box(tree), Some(&previous), None, &measurements, &config);
                black_box(layout.width);
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_layout, bench_relayout
);
criterion_main!(benches);
