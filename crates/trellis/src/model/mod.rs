//! Row and column models for data grids.
//!
//! A grid keeps one [`RowColModel`] per axis. Each model owns an ordered
//! sequence of [`Descriptor`]s and keeps it laid out as a header prefix, a
//! fixed block and the normal tail. Renderers poll the dirty flags each
//! frame and re-query the model; interested parties subscribe to the
//! [`GridEvent`]s published on the shared event loop.
//!
//! # Core Types
//!
//! - `Axis`: Which dimension a model manages
//! - `Descriptor`: Shared handle to one row or column record
//! - `RowColModel`: The descriptor sequence with selection and expansion
//! - `GridEvent`: Structural and selection notifications
//! - `CellClasses`: The collaborator that owns visual highlight regions
//!
//! # Architecture Overview
//!
//! ```text
//! ┌──────────────┐  fire   ┌─────────────┐  connect  ┌──────────┐
//! │ RowColModel  │────────>│  EventLoop  │<──────────│   Host   │
//! │              │  post   │             │  process  │          │
//! └──────────────┘────────>└─────────────┘<──────────└──────────┘
//!        │                                                │
//!        │ create/add/remove  ┌─────────────┐  render     │
//!        └───────────────────>│ CellClasses │<────────────┘
//!                             └─────────────┘
//! ```

mod axis;
mod builder;
mod cell_class;
mod config;
mod descriptor;
mod event;
mod expansion;
mod row_col;
mod selection;

pub use axis::Axis;
pub use builder::{BuiltElement, Builder, RenderFn, UpdateFn};
pub use cell_class::{
    CellClassId, CellClassRegistry, CellClassSpec, CellClasses, CoordinateSpace, Extent,
};
pub use config::{DRAG_READY_CLASS, EXPANDED_CLASS, RowColConfig, RowColModelBuilder};
pub use descriptor::Descriptor;
pub use event::{Action, GridEvent, RowColEvent, StructuralChange};
pub use row_col::RowColModel;
