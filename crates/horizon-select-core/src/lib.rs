//! Core systems for Horizon Select.
//!
//! This crate provides the framework-neutral plumbing the dropdown widget is
//! built on:
//!
//! - **Signal/Slot System**: Type-safe change notification
//! - **Timers**: One-shot deferred work with cancel-and-replace support
//! - **Geometry**: Rectangles in CSS pixels
//! - **Logging**: `tracing` targets for filtering subsystem output
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_select_core::Signal;
//!
//! let values_changed = Signal::<Vec<String>>::new();
//!
//! let conn_id = values_changed.connect(|values| {
//!     println!("Selection is now: {:?}", values);
//! });
//!
//! values_changed.emit(vec!["B".to_string()]);
//! values_changed.disconnect(conn_id);
//! ```
//!
//! # Timer Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use horizon_select_core::TimerQueue;
//!
//! let mut timers = TimerQueue::new();
//! let start = Instant::now();
//!
//! timers.start_one_shot(start, Duration::from_millis(500), "search");
//! assert!(timers.take_expired(start).is_empty());
//!
//! let fired = timers.take_expired(start + Duration::from_millis(500));
//! assert_eq!(fired.len(), 1);
//! assert_eq!(fired[0].1, "search");
//! ```

mod error;
pub mod geometry;
pub mod logging;
pub mod signal;
pub mod timer;

pub use error::{Result, TimerError};
pub use geometry::Rect;
pub use signal::{ConnectionId, Signal};
pub use timer::{TimerId, TimerQueue};
