//! Logging facilities for Horizon Select.
//!
//! Horizon Select uses the `tracing` crate for instrumentation and never
//! installs a subscriber itself. To see logs, install one in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_select=debug")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Call sites name their target inline; these constants exist for building
/// filter directives such as `EnvFilter::new(format!("{}=debug", targets::PANEL))`.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "horizon_select_core";
    /// Timer queue target.
    pub const TIMER: &str = "horizon_select_core::timer";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_select_core::signal";
    /// Widget crate target.
    pub const SELECT: &str = "horizon_select";
    /// Interaction controller target (open/close, toggles, lifecycle).
    pub const CONTROLLER: &str = "horizon_select::controller";
    /// Option model target (grouping, dropped options).
    pub const MODEL: &str = "horizon_select::model";
    /// Dropdown panel target (build, highlight).
    pub const PANEL: &str = "horizon_select::panel";
    /// Search filter target.
    pub const SEARCH: &str = "horizon_select::search";
    /// Options loading and validation target.
    pub const CONFIG: &str = "horizon_select::config";
}
