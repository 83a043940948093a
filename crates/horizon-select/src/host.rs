//! The seam between the controller and the rendering environment.
//!
//! The controller keeps all widget state itself and treats the host as a
//! source of measurements and a sink for effects. Input reaches the
//! controller as typed values: the host resolves what a click landed on into
//! a [`HitTarget`] using the views it rendered, and reports keys and focus as
//! [`Key`] and [`FocusKind`].

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::controller::ControlId;
use crate::position::TriggerMetrics;
use crate::source::SelectSource;

/// Services the controller needs from the rendering environment.
pub trait SelectHost {
    /// Current time, used to schedule and fire deferred work.
    fn now(&self) -> Instant {
        Instant::now()
    }

    /// Measure the trigger of `control`. `None` when it is not rendered.
    fn trigger_metrics(&self, control: ControlId) -> Option<TriggerMetrics>;

    /// Vertical document scroll.
    fn page_y_offset(&self) -> f32 {
        0.0
    }

    /// Viewport width, used to skip search autofocus on narrow screens.
    fn viewport_width(&self) -> f32;

    /// Rendered width of a backing control before wrapping.
    fn native_width(&self, source: &SelectSource) -> f32 {
        let _ = source;
        0.0
    }

    /// Current page scroll offset.
    fn scroll_offset(&self) -> f32 {
        0.0
    }

    /// Force the page scroll offset.
    fn set_scroll_offset(&mut self, offset: f32) {
        let _ = offset;
    }

    /// Install the shared stylesheet.
    fn inject_stylesheet(&mut self, css: &str);

    /// Fire the backing control's native change notification.
    fn dispatch_change(&mut self, control: ControlId, values: &[String]) {
        let _ = (control, values);
    }

    /// Move keyboard focus into the open panel's search input.
    fn focus_search_input(&mut self) {}
}

/// What a click landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    /// A trigger surface (outside its chips).
    Trigger(ControlId),
    /// The "+" add affordance of a trigger.
    AddAffordance(ControlId),
    /// A chip's deselect affordance.
    Chip { control: ControlId, value: String },
    /// An option row of the open panel.
    PanelOption(String),
    /// The open panel's search input.
    PanelSearch,
    /// Anywhere else inside the open panel.
    Panel,
    /// Anywhere else in the document.
    Outside,
}

/// Keys the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
    Tab,
    Other,
}

/// Kind of element holding keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusKind {
    /// Nothing focused.
    #[default]
    None,
    /// A text-entry element, such as the panel's search input.
    TextEntry,
    /// The widget's internal focus-trap element.
    FocusTrap,
    /// Any other element.
    Other,
}

/// A host that records effects and runs on a manual clock.
///
/// Useful for headless use and tests: time only moves through
/// [`advance`](Self::advance), and trigger geometry is whatever was set with
/// [`set_trigger_metrics`](Self::set_trigger_metrics).
#[derive(Debug, Clone)]
pub struct RecordingHost {
    now: Instant,
    metrics: HashMap<ControlId, TriggerMetrics>,
    /// Reported vertical document scroll.
    pub page_y_offset: f32,
    /// Reported viewport width.
    pub viewport_width: f32,
    /// Reported native control width.
    pub native_width: f32,
    /// Current page scroll offset.
    pub scroll_offset: f32,
    /// Every stylesheet injected.
    pub stylesheets: Vec<String>,
    /// Every native change dispatched.
    pub changes: Vec<(ControlId, Vec<String>)>,
    /// Number of search focus requests.
    pub focus_requests: usize,
}

impl RecordingHost {
    /// Create a desktop-sized host at the current instant.
    pub fn new() -> Self {
        Self {
            now: Instant::now(),
            metrics: HashMap::new(),
            page_y_offset: 0.0,
            viewport_width: 1280.0,
            native_width: 0.0,
            scroll_offset: 0.0,
            stylesheets: Vec::new(),
            changes: Vec::new(),
            focus_requests: 0,
        }
    }

    /// Move the clock forward.
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Set the geometry reported for a trigger.
    pub fn set_trigger_metrics(&mut self, control: ControlId, metrics: TriggerMetrics) {
        self.metrics.insert(control, metrics);
    }

    /// Forget a trigger's geometry, as if it had been removed.
    pub fn remove_trigger(&mut self, control: ControlId) {
        self.metrics.remove(&control);
    }

    /// The most recent native change.
    pub fn last_change(&self) -> Option<&(ControlId, Vec<String>)> {
        self.changes.last()
    }
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectHost for RecordingHost {
    fn now(&self) -> Instant {
        self.now
    }

    fn trigger_metrics(&self, control: ControlId) -> Option<TriggerMetrics> {
        self.metrics.get(&control).copied()
    }

    fn page_y_offset(&self) -> f32 {
        self.page_y_offset
    }

    fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    fn native_width(&self, _source: &SelectSource) -> f32 {
        self.native_width
    }

    fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    fn set_scroll_offset(&mut self, offset: f32) {
        self.scroll_offset = offset;
    }

    fn inject_stylesheet(&mut self, css: &str) {
        self.stylesheets.push(css.to_string());
    }

    fn dispatch_change(&mut self, control: ControlId, values: &[String]) {
        self.changes.push((control, values.to_vec()));
    }

    fn focus_search_input(&mut self) {
        self.focus_requests += 1;
    }
}
