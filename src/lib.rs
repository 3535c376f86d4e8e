#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod measure;
pub mod session;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, TextConfig, load_config, parse_config};
pub use error::TreeError;
pub use ir::{Node, NodeTree, ShapeKind, TreeDocument};
pub use layout::{Layout, NodeLayout, ReferencePosition, compute_layout};
pub use layout_dump::{LayoutDump, dump_to_string};
pub use measure::{
    EstimatedMeasurements, FixtureMeasurements, Measurement, MeasurementProvider, NullMeasurements,
};
pub use session::LayoutSession;

/// Parse a tree document and lay it out as a first generation.
pub fn layout_document(
    json: &str,
    measurements: &dyn MeasurementProvider,
    config: &LayoutConfig,
) -> Result<(NodeTree, Layout), TreeError> {
    let (tree, reference) = NodeTree::from_json(json)?;
    let layout = compute_layout(&tree, None, reference.as_ref(), measurements, config);
    Ok((tree, layout))
}
