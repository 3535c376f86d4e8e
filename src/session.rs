use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::config::LayoutConfig;
use crate::ir::NodeTree;
use crate::layout::{Layout, ReferencePosition, compute_layout};
use crate::measure::MeasurementProvider;

static GLOBAL: Lazy<LayoutSession> = Lazy::new(LayoutSession::new);

type Slot = Arc<Mutex<Option<Layout>>>;

/// Remembers the last layout of each diagram so the next pass can reconcile
/// against it. Passes on one diagram run one at a time.
#[derive(Debug, Default)]
pub struct LayoutSession {
    diagrams: Mutex<HashMap<String, Slot>>,
}

impl LayoutSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> &'static LayoutSession {
        &GLOBAL
    }

    fn slot(&self, diagram_id: &str) -> Slot {
        let mut diagrams = self
            .diagrams
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        diagrams
            .entry(diagram_id.to_string())
            .or_default()
            .clone()
    }

    pub fn relayout(
        &self,
        diagram_id: &str,
        tree: &NodeTree,
        reference: Option<&ReferencePosition>,
        measurements: &dyn MeasurementProvider,
        config: &LayoutConfig,
    ) -> Layout {
        let slot = self.slot(diagram_id);
        let mut last = slot.lock().unwrap_or_else(PoisonError::into_inner);
        let layout = compute_layout(tree, last.as_ref(), reference, measurements, config);
        *last = Some(layout.clone());
        layout
    }

    pub fn previous(&self, diagram_id: &str) -> Option<Layout> {
        let diagrams = self
            .diagrams
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let slot = diagrams.get(diagram_id)?.clone();
        drop(diagrams);
        let last = slot.lock().unwrap_or_else(PoisonError::into_inner);
        last.clone()
    }

    pub fn forget(&self, diagram_id: &str) -> bool {
        self.diagrams
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(diagram_id)
            .is_some()
    }
}
