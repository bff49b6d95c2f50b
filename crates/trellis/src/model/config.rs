//! Model configuration.

use std::sync::Arc;

use trellis_core::EventLoop;

use super::axis::Axis;
use super::cell_class::CellClasses;
use super::event::GridEvent;
use super::row_col::RowColModel;

/// Class name registered while a descriptor is selected.
pub const DRAG_READY_CLASS: &str = "grid-col-drag-ready";

/// Class name registered while a descriptor is expanded.
pub const EXPANDED_CLASS: &str = "grid-expanded";

/// Configuration for creating a [`RowColModel`].
#[derive(Debug, Clone, PartialEq)]
pub struct RowColConfig {
    /// Size of descriptors without an explicit size.
    pub default_size: f32,
    /// Cell class registered for selected descriptors.
    pub drag_ready_class: String,
    /// Cell class registered for expanded descriptors.
    pub expanded_class: String,
}

impl Default for RowColConfig {
    fn default() -> Self {
        Self::for_axis(Axis::Row)
    }
}

impl RowColConfig {
    /// Default configuration for an axis.
    pub fn for_axis(axis: Axis) -> Self {
        Self {
            default_size: axis.default_size(),
            drag_ready_class: DRAG_READY_CLASS.to_string(),
            expanded_class: EXPANDED_CLASS.to_string(),
        }
    }

    /// Create a configuration with the given default size.
    pub fn with_default_size(axis: Axis, default_size: f32) -> Self {
        Self {
            default_size,
            ..Self::for_axis(axis)
        }
    }
}

/// Builder for creating row/column models with custom configuration.
#[derive(Debug, Clone)]
pub struct RowColModelBuilder {
    axis: Axis,
    config: RowColConfig,
}

impl RowColModelBuilder {
    /// Create a builder with the axis defaults.
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            config: RowColConfig::for_axis(axis),
        }
    }

    /// Set the default descriptor size.
    pub fn default_size(mut self, size: f32) -> Self {
        self.config.default_size = size;
        self
    }

    /// Set the drag-ready class name.
    pub fn drag_ready_class(mut self, class_name: impl Into<String>) -> Self {
        self.config.drag_ready_class = class_name.into();
        self
    }

    /// Set the expansion marker class name.
    pub fn expanded_class(mut self, class_name: impl Into<String>) -> Self {
        self.config.expanded_class = class_name.into();
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: RowColConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the model.
    pub fn build(
        self,
        event_loop: Arc<EventLoop<GridEvent>>,
        cell_classes: Arc<dyn CellClasses>,
    ) -> RowColModel {
        RowColModel::with_config(self.axis, self.config, event_loop, cell_classes)
    }
}
