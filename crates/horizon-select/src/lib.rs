//! Horizon Select - a styleable single/multi-choice dropdown.
//!
//! The widget wraps a backing [`SelectSource`] with a compact trigger and a
//! floating panel offering search, option groups, images, removable chips
//! and a selection limit. It is headless: the [`SelectController`] keeps the
//! whole model and the host renders the views it exposes
//! ([`TriggerView`], [`WrapperView`], [`Panel`]) and reports input back.
//!
//! # Example
//!
//! ```
//! use horizon_select::prelude::*;
//!
//! let source = SelectSource::new("tags[]")
//!     .with_multiple(true)
//!     .with_option(SourceOption::new("rust", "Rust"))
//!     .with_option(SourceOption::new("go", "Go"))
//!     .with_option(SourceOption::new("zig", "Zig"));
//!
//! let options = SelectOptions::default().with_max_selectable(Some(2));
//! let mut controller = SelectController::new(RecordingHost::new());
//! let id = controller.wrap([source], options).unwrap()[0];
//!
//! controller.changed.connect(|event| {
//!     println!("{:?} now selects {:?}", event.control, event.values);
//! });
//!
//! controller.on_click(HitTarget::Trigger(id));
//! controller.on_click(HitTarget::PanelOption("rust".into()));
//! controller.on_click(HitTarget::PanelOption("zig".into()));
//!
//! let trigger = controller.trigger(id).unwrap();
//! assert_eq!(trigger.display_text(), "Rust, Zig");
//! assert!(trigger.is_limit_reached());
//! ```

pub mod config;
pub mod controller;
mod error;
pub mod host;
pub mod model;
pub mod panel;
pub mod position;
pub mod search;
pub mod source;
pub mod style;
pub mod trigger;

pub use config::{Labels, OnChange, SelectOptions, WrapWidth};
pub use controller::{ChangeEvent, ControlId, SelectController};
pub use error::{Result, SelectError};
pub use host::{FocusKind, HitTarget, Key, RecordingHost, SelectHost};
pub use model::{Group, OptionItem, OptionModel};
pub use panel::{Panel, PanelRow};
pub use position::{PanelPlacement, TriggerMetrics};
pub use search::SearchFilter;
pub use source::{SelectSource, SourceEntry, SourceGroup, SourceOption};
pub use trigger::{Chip, TriggerContent, TriggerView, WrapperView};

pub use horizon_select_core::{ConnectionId, Rect, Signal};

/// Common imports for hosts driving the widget.
pub mod prelude {
    pub use crate::{
        ChangeEvent, ControlId, FocusKind, HitTarget, Key, RecordingHost, SelectController,
        SelectHost, SelectOptions, SelectSource, SourceGroup, SourceOption, TriggerMetrics,
    };
    pub use horizon_select_core::Rect;
}
