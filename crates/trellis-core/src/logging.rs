//! Logging facilities for Trellis.
//!
//! Trellis uses the `tracing` crate for instrumentation. To see logs, install
//! a tracing subscriber in the host application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("trellis=debug,trellis_core=trace")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "trellis_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "trellis_core::signal";
    /// Deferred task queue target.
    pub const TASK: &str = "trellis_core::task";
    /// Debounced notification target.
    pub const DEBOUNCE: &str = "trellis_core::debounce";
    /// Event loop target.
    pub const EVENT_LOOP: &str = "trellis_core::event_loop";
    /// Row/column model target.
    pub const MODEL: &str = "trellis::model";
    /// Cell class registry target.
    pub const CELL_CLASSES: &str = "trellis::cell_classes";
}
