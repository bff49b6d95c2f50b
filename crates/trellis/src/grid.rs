//! A row model and a column model sharing one event loop.

use std::sync::Arc;

use trellis_core::EventLoop;
use trellis_core::logging::targets;

use crate::model::{Axis, CellClassRegistry, GridEvent, RowColConfig, RowColModel};

/// The two axis models of one grid.
///
/// Both models publish on the same [`EventLoop`] and register visual tokens
/// with the same [`CellClassRegistry`]. Call [`process_tasks`](Self::process_tasks)
/// once per tick to deliver debounced selection notifications.
#[derive(Debug, Clone)]
pub struct GridModels {
    rows: RowColModel,
    cols: RowColModel,
    event_loop: Arc<EventLoop<GridEvent>>,
    cell_classes: Arc<CellClassRegistry>,
}

impl Default for GridModels {
    fn default() -> Self {
        Self::new()
    }
}

impl GridModels {
    /// Create row and column models with the axis defaults.
    pub fn new() -> Self {
        Self::with_configs(RowColConfig::for_axis(Axis::Row), RowColConfig::for_axis(Axis::Col))
    }

    /// Create row and column models with custom configurations.
    pub fn with_configs(rows: RowColConfig, cols: RowColConfig) -> Self {
        let event_loop = Arc::new(EventLoop::new());
        let cell_classes = Arc::new(CellClassRegistry::new());
        Self {
            rows: RowColModel::with_config(Axis::Row, rows, event_loop.clone(), cell_classes.clone()),
            cols: RowColModel::with_config(Axis::Col, cols, event_loop.clone(), cell_classes.clone()),
            event_loop,
            cell_classes,
        }
    }

    /// The row model.
    pub fn rows(&self) -> &RowColModel {
        &self.rows
    }

    /// The column model.
    pub fn cols(&self) -> &RowColModel {
        &self.cols
    }

    /// The model for an axis.
    pub fn model(&self, axis: Axis) -> &RowColModel {
        match axis {
            Axis::Row => &self.rows,
            Axis::Col => &self.cols,
        }
    }

    /// The shared event loop.
    pub fn event_loop(&self) -> &Arc<EventLoop<GridEvent>> {
        &self.event_loop
    }

    /// The shared cell-class registry.
    pub fn cell_classes(&self) -> &Arc<CellClassRegistry> {
        &self.cell_classes
    }

    /// Run the tasks queued so far. Returns how many ran.
    pub fn process_tasks(&self) -> usize {
        let ran = self.event_loop.process_tasks();
        if ran > 0 {
            tracing::trace!(target: targets::MODEL, ran, "grid tick processed");
        }
        ran
    }

    /// Returns `true` if either axis needs a layout pass.
    pub fn is_dirty(&self) -> bool {
        self.rows.is_dirty() || self.cols.is_dirty()
    }

    /// Returns `true` if either axis needs its cell content rebuilt.
    pub fn are_builders_dirty(&self) -> bool {
        self.rows.are_builders_dirty() || self.cols.are_builders_dirty()
    }

    /// Acknowledge every dirty flag on both axes.
    pub fn set_clean(&self) {
        for model in [&self.rows, &self.cols] {
            model.set_clean();
            model.set_builders_clean();
        }
    }
}
