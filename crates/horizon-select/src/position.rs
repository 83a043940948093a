//! Panel placement relative to its trigger.
//!
//! The panel always opens below the trigger, left-aligned with it and as wide
//! as it. Near the bottom of the viewport it can therefore extend off-screen.
//!
//! Opening a panel can make a horizontal scrollbar appear, which shifts the
//! trigger. The controller re-measures once, [`RECHECK_DELAY`] after
//! opening, and places the panel again if the trigger moved.

use std::time::Duration;

use horizon_select_core::Rect;

/// Delay of the one-shot placement re-check after opening.
pub const RECHECK_DELAY: Duration = Duration::from_millis(10);

/// Measurements of a trigger, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TriggerMetrics {
    /// Border box relative to the viewport.
    pub bounds: Rect,
    /// Inner height without borders.
    pub client_height: f32,
    /// Top border width.
    pub border_top: f32,
    /// Bottom border width.
    pub border_bottom: f32,
}

impl TriggerMetrics {
    /// Metrics of a borderless trigger.
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            client_height: bounds.height(),
            border_top: 0.0,
            border_bottom: 0.0,
        }
    }

    /// Set the vertical borders using builder pattern. The client height
    /// becomes the bounds height minus both borders.
    pub fn with_borders(mut self, top: f32, bottom: f32) -> Self {
        self.border_top = top;
        self.border_bottom = bottom;
        self.client_height = (self.bounds.height() - top - bottom).max(0.0);
        self
    }

    /// Height including the vertical borders.
    pub fn bordered_height(&self) -> f32 {
        self.client_height + self.border_top + self.border_bottom
    }
}

/// Where the panel goes, in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanelPlacement {
    pub left: f32,
    pub top: f32,
    pub width: f32,
}

impl PanelPlacement {
    /// Place a panel directly below `trigger`.
    ///
    /// `page_y_offset` is the document's vertical scroll, turning the
    /// viewport-relative trigger position into a document position.
    pub fn below(trigger: &TriggerMetrics, page_y_offset: f32) -> Self {
        Self {
            left: trigger.bounds.left().max(0.0),
            top: trigger.bounds.top() + page_y_offset + trigger.bordered_height(),
            width: trigger.bounds.width(),
        }
    }

    /// Whether the trigger no longer lines up with this placement.
    pub fn needs_recheck(&self, trigger: &TriggerMetrics) -> bool {
        (trigger.bounds.left() - self.left).abs() > f32::EPSILON
    }
}
