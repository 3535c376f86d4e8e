use crate::ir::{Node, NodeTree};
use crate::layout::{Diagnostic, Extent, Layout, Size};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<NodeDump>,
    pub diagnostics: Vec<Diagnostic>,
    /// The raw layout, fed back as the previous generation of the next pass.
    pub layout: Layout,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: String,
    pub shape: String,
    pub parent: Option<String>,
    pub x: f32,
    pub y: f32,
    pub absolute_x: f32,
    pub absolute_y: f32,
    pub width: f32,
    pub height: f32,
    pub border_node: bool,
    pub hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extent: Option<Extent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<Size>,
}

impl LayoutDump {
    /// Nodes are listed in tree order (parents before children).
    pub fn from_layout(layout: &Layout, tree: &NodeTree) -> Self {
        let mut nodes = Vec::with_capacity(tree.len());
        let mut stack: Vec<(&Node, f32, f32)> =
            tree.roots().map(|root| (root, 0.0, 0.0)).collect();
        stack.reverse();
        while let Some((node, origin_x, origin_y)) = stack.pop() {
            let Some(output) = layout.node(&node.id) else {
                continue;
            };
            let absolute_x = origin_x + output.x;
            let absolute_y = origin_y + output.y;
            nodes.push(NodeDump {
                id: node.id.clone(),
                shape: node.shape.as_str().to_string(),
                parent: node.parent_id.clone(),
                x: output.x,
                y: output.y,
                absolute_x,
                absolute_y,
                width: output.width,
                height: output.height,
                border_node: node.is_border_node,
                hidden: node.hidden,
                extent: output.extent,
                header: output.header,
            });
            for child in tree.children(node).into_iter().rev() {
                stack.push((child, absolute_x, absolute_y));
            }
        }

        LayoutDump {
            width: layout.width,
            height: layout.height,
            nodes,
            diagnostics: layout.diagnostics.clone(),
            layout: layout.clone(),
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout, tree: &NodeTree) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, tree);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

pub fn dump_to_string(layout: &Layout, tree: &NodeTree, pretty: bool) -> anyhow::Result<String> {
    let dump = LayoutDump::from_layout(layout, tree);
    let json = if pretty {
        serde_json::to_string_pretty(&dump)?
    } else {
        serde_json::to_string(&dump)?
    };
    Ok(json)
}

pub fn write_dump_to<W: Write>(
    writer: W,
    layout: &Layout,
    tree: &NodeTree,
    pretty: bool,
) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout, tree);
    if pretty {
        serde_json::to_writer_pretty(writer, &dump)?;
    } else {
        serde_json::to_writer(writer, &dump)?;
    }
    Ok(())
}
