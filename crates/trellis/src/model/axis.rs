//! Grid axes.

use std::fmt;

/// The axis a [`RowColModel`](super::RowColModel) manages.
///
/// Rows and columns share one model design; the axis only changes names,
/// default sizes, and how visual markers span the opposite axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal grid lines, sized by height.
    Row,
    /// Vertical grid lines, sized by width.
    Col,
}

impl Axis {
    /// Short name used in event types (`"row"` or `"col"`).
    pub fn name(self) -> &'static str {
        match self {
            Self::Row => "row",
            Self::Col => "col",
        }
    }

    /// Name of the size dimension (`"height"` or `"width"`).
    pub fn size_name(self) -> &'static str {
        match self {
            Self::Row => "height",
            Self::Col => "width",
        }
    }

    /// Default descriptor size for a freshly configured model.
    pub fn default_size(self) -> f32 {
        match self {
            Self::Row => 30.0,
            Self::Col => 100.0,
        }
    }

    /// The other axis.
    pub fn opposite(self) -> Self {
        match self {
            Self::Row => Self::Col,
            Self::Col => Self::Row,
        }
    }

    /// Event type for structural, size and visibility changes.
    pub fn change_event_type(self) -> &'static str {
        match self {
            Self::Row => "grid-row-change",
            Self::Col => "grid-col-change",
        }
    }

    /// Event type for selection changes.
    pub fn selection_event_type(self) -> &'static str {
        match self {
            Self::Row => "grid-row-selection-change",
            Self::Col => "grid-col-selection-change",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
