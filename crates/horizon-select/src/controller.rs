//! The interaction controller.
//!
//! A [`SelectController`] owns every wrapped control, the single open panel
//! and the deferred work (search debounce, placement re-check, search
//! autofocus). Only the controller mutates this state, and at most one panel
//! is open at any time across all of its controls.
//!
//! The controller is driven by the host: input arrives through [`on_click`],
//! [`on_key`], [`on_resize`], [`on_scroll`] and [`on_search_input`], and the
//! host loop calls [`process_timers`] once [`next_deadline`] has passed.
//!
//! [`on_click`]: SelectController::on_click
//! [`on_key`]: SelectController::on_key
//! [`on_resize`]: SelectController::on_resize
//! [`on_scroll`]: SelectController::on_scroll
//! [`on_search_input`]: SelectController::on_search_input
//! [`process_timers`]: SelectController::process_timers
//! [`next_deadline`]: SelectController::next_deadline
//!
//! # Example
//!
//! ```
//! use horizon_select::prelude::*;
//!
//! let source = SelectSource::new("letter")
//!     .with_placeholder("Pick")
//!     .with_option(SourceOption::new("a", "A"))
//!     .with_option(SourceOption::new("b", "B"))
//!     .with_option(SourceOption::new("c", "C"));
//!
//! let mut controller = SelectController::new(RecordingHost::new());
//! let ids = controller.wrap([source], SelectOptions::default()).unwrap();
//! let id = ids[0];
//!
//! assert_eq!(controller.trigger(id).unwrap().display_text(), "Pick");
//!
//! controller.on_click(HitTarget::Trigger(id));
//! assert!(controller.is_open(id));
//!
//! controller.on_click(HitTarget::PanelOption("b".into()));
//! assert_eq!(controller.trigger(id).unwrap().display_text(), "B");
//! assert!(!controller.is_open(id));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use horizon_select_core::{Signal, TimerId, TimerQueue};
use slotmap::{SlotMap, new_key_type};

use crate::config::SelectOptions;
use crate::error::{Result, SelectError};
use crate::host::{FocusKind, HitTarget, Key, SelectHost};
use crate::model::OptionModel;
use crate::panel::Panel;
use crate::position::{PanelPlacement, RECHECK_DELAY};
use crate::search::{SEARCH_DEBOUNCE, SearchFilter};
use crate::source::SelectSource;
use crate::style;
use crate::trigger::{TriggerView, WrapperView};

new_key_type! {
    /// Identifies a wrapped control.
    pub struct ControlId;
}

/// Delay between opening a panel and focusing its search input.
pub const AUTOFOCUS_DELAY: Duration = Duration::from_millis(50);

/// Viewports this wide or narrower skip search autofocus, so on-screen
/// keyboards do not pop up on open.
pub const AUTOFOCUS_MIN_VIEWPORT: f32 = 1024.0;

const SEARCH_TIMER: &str = "search";

/// Payload of the `changed` signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub control: ControlId,
    /// Selected values after the change, in document order.
    pub values: Vec<String>,
}

/// One wrapped control.
struct Control {
    source: SelectSource,
    options: Arc<SelectOptions>,
    model: OptionModel,
    trigger: TriggerView,
    wrapper: WrapperView,
}

impl Control {
    fn rerender_trigger(&mut self) {
        let open = self.trigger.is_open();
        self.trigger = TriggerView::render(&self.source, &self.options);
        self.trigger.set_open(open);
    }
}

type Deferred<H> = Box<dyn FnOnce(&mut SelectController<H>)>;

/// Owner of all wrapped controls and the single open panel.
pub struct SelectController<H: SelectHost> {
    host: H,
    controls: SlotMap<ControlId, Control>,
    panel: Option<Panel>,
    panel_serial: u64,
    timers: TimerQueue<Deferred<H>>,
    debounced: HashMap<&'static str, TimerId>,
    style_injected: bool,
    list_hovered: bool,
    captured_scroll: f32,

    // Signals
    /// Emitted after every selection change on any control.
    pub changed: Signal<ChangeEvent>,
    /// Emitted when a panel opens.
    pub panel_opened: Signal<ControlId>,
    /// Emitted when a panel closes.
    pub panel_closed: Signal<ControlId>,
}

impl<H: SelectHost + 'static> SelectController<H> {
    /// Create a controller with no controls.
    pub fn new(host: H) -> Self {
        Self {
            host,
            controls: SlotMap::with_key(),
            panel: None,
            panel_serial: 0,
            timers: TimerQueue::new(),
            debounced: HashMap::new(),
            style_injected: false,
            list_hovered: false,
            captured_scroll: 0.0,
            changed: Signal::new(),
            panel_opened: Signal::new(),
            panel_closed: Signal::new(),
        }
    }

    /// The host this controller drives.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Wrap backing sources into controls sharing `options`.
    ///
    /// Usage errors abort the call before any control is created; controls
    /// from earlier calls are unaffected.
    pub fn wrap(
        &mut self,
        sources: impl IntoIterator<Item = SelectSource>,
        options: SelectOptions,
    ) -> Result<Vec<ControlId>> {
        let sources: Vec<SelectSource> = sources.into_iter().collect();
        if sources.is_empty() {
            let err = SelectError::MissingTarget;
            tracing::warn!(target: "horizon_select::controller", %err, "wrap rejected");
            return Err(err);
        }
        if let Err(err) = options.validate() {
            tracing::warn!(target: "horizon_select::controller", %err, "wrap rejected");
            return Err(err);
        }

        if !self.style_injected {
            self.host.inject_stylesheet(&style::stylesheet());
            self.style_injected = true;
        }

        let options = Arc::new(options);
        let mut ids = Vec::with_capacity(sources.len());
        for mut source in sources {
            if options.placeholder_as_first_option
                && !source.is_multiple()
                && !source.has_preselected()
                && let Some(text) = source.placeholder().map(str::to_string)
            {
                source.insert_placeholder_option(&text);
            }

            let native_width = self.host.native_width(&source);
            let control = Control {
                model: OptionModel::build(&source),
                trigger: TriggerView::render(&source, &options),
                wrapper: WrapperView::new(&options, native_width),
                options: Arc::clone(&options),
                source,
            };
            let name = control.source.name().to_string();
            let id = self.controls.insert(control);
            tracing::debug!(target: "horizon_select::controller", ?id, %name, "control wrapped");
            ids.push(id);
        }
        Ok(ids)
    }

    /// Re-read a control's source after external edits.
    ///
    /// Closes the control's panel if open, rebuilds the option model and
    /// re-renders the trigger. Returns `false` for unknown controls.
    pub fn refresh(&mut self, id: ControlId) -> bool {
        if !self.controls.contains_key(id) {
            return false;
        }
        if self.active_control() == Some(id) {
            self.close();
        }
        let Some(control) = self.controls.get_mut(id) else {
            return false;
        };
        control.model = OptionModel::build(&control.source);
        control.rerender_trigger();
        tracing::debug!(target: "horizon_select::controller", ?id, "control refreshed");
        true
    }

    /// Unwrap a control, handing back its source without any injected
    /// placeholder option.
    pub fn destroy(&mut self, id: ControlId) -> Option<SelectSource> {
        if self.active_control() == Some(id) {
            self.close();
        }
        let mut control = self.controls.remove(id)?;
        control.source.remove_placeholder_option();
        tracing::debug!(target: "horizon_select::controller", ?id, "control destroyed");
        Some(control.source)
    }

    /// Close any panel, cancel pending work, disconnect all signal slots and
    /// unwrap every control.
    pub fn teardown(mut self) -> Vec<SelectSource> {
        self.close();
        self.timers.clear();
        self.debounced.clear();
        self.changed.disconnect_all();
        self.panel_opened.disconnect_all();
        self.panel_closed.disconnect_all();

        let ids: Vec<ControlId> = self.controls.keys().collect();
        let sources: Vec<SelectSource> = ids.into_iter().filter_map(|id| self.destroy(id)).collect();
        tracing::debug!(target: "horizon_select::controller", controls = sources.len(), "controller torn down");
        sources
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Ids of all wrapped controls.
    pub fn control_ids(&self) -> Vec<ControlId> {
        self.controls.keys().collect()
    }

    /// Whether `id` names a wrapped control.
    pub fn contains(&self, id: ControlId) -> bool {
        self.controls.contains_key(id)
    }

    /// The backing source of a control.
    pub fn source(&self, id: ControlId) -> Option<&SelectSource> {
        self.controls.get(id).map(|control| &control.source)
    }

    /// Mutable access to a source for external edits. Call
    /// [`refresh`](Self::refresh) afterwards.
    pub fn source_mut(&mut self, id: ControlId) -> Option<&mut SelectSource> {
        self.controls.get_mut(id).map(|control| &mut control.source)
    }

    /// Options the control was wrapped with.
    pub fn options(&self, id: ControlId) -> Option<&SelectOptions> {
        self.controls.get(id).map(|control| control.options.as_ref())
    }

    /// Grouped option model of a control.
    pub fn model(&self, id: ControlId) -> Option<&OptionModel> {
        self.controls.get(id).map(|control| &control.model)
    }

    /// Current trigger view of a control.
    pub fn trigger(&self, id: ControlId) -> Option<&TriggerView> {
        self.controls.get(id).map(|control| &control.trigger)
    }

    /// Wrapper element view of a control.
    pub fn wrapper(&self, id: ControlId) -> Option<&WrapperView> {
        self.controls.get(id).map(|control| &control.wrapper)
    }

    /// Selected values of a control in document order.
    pub fn selected_values(&self, id: ControlId) -> Option<Vec<String>> {
        self.source(id).map(SelectSource::selected_values)
    }

    /// The open panel, if any.
    pub fn panel(&self) -> Option<&Panel> {
        self.panel.as_ref()
    }

    /// The control whose panel is open.
    pub fn active_control(&self) -> Option<ControlId> {
        self.panel.as_ref().map(Panel::control)
    }

    /// Whether the panel of `id` is open.
    pub fn is_open(&self, id: ControlId) -> bool {
        self.active_control() == Some(id)
    }

    // =========================================================================
    // Open / close
    // =========================================================================

    /// Toggle the panel of `id`.
    ///
    /// The active control closes. Any other control opens, closing the
    /// current panel first, unless it is disabled or at its selection limit.
    pub fn toggle(&mut self, id: ControlId) -> bool {
        let Some(control) = self.controls.get(id) else {
            return false;
        };
        if self.active_control() == Some(id) {
            return self.close();
        }
        if !control.trigger.accepts_open() {
            tracing::debug!(target: "horizon_select::controller", ?id, "open refused");
            return false;
        }
        self.close();
        self.open(id);
        true
    }

    fn open(&mut self, id: ControlId) {
        let Some(control) = self.controls.get_mut(id) else {
            return;
        };
        self.panel_serial += 1;
        let serial = self.panel_serial;

        control.trigger.set_open(true);
        let mut panel = Panel::build(id, serial, &control.model, &control.options);
        let autofocus = panel.search().is_some()
            && control.options.auto_focus_search
            && self.host.viewport_width() > AUTOFOCUS_MIN_VIEWPORT;

        if let Some(metrics) = self.host.trigger_metrics(id) {
            panel.set_placement(PanelPlacement::below(&metrics, self.host.page_y_offset()));
        }
        self.panel = Some(panel);
        self.list_hovered = false;

        self.defer(RECHECK_DELAY, move |this| this.recheck_placement(serial));
        if autofocus {
            self.defer(AUTOFOCUS_DELAY, move |this| this.focus_search(serial));
        }

        tracing::debug!(target: "horizon_select::controller", ?id, serial, "panel opened");
        self.panel_opened.emit(id);
    }

    /// Close the open panel. Returns `false` if none was open.
    pub fn close(&mut self) -> bool {
        let Some(panel) = self.panel.take() else {
            return false;
        };
        let id = panel.control();
        if let Some(control) = self.controls.get_mut(id) {
            control.trigger.set_open(false);
        }
        if let Some(timer) = self.debounced.remove(SEARCH_TIMER) {
            let _ = self.timers.stop(timer);
        }
        self.list_hovered = false;

        tracing::debug!(target: "horizon_select::controller", ?id, "panel closed");
        self.panel_closed.emit(id);
        true
    }

    /// Place the open panel below its trigger again.
    fn reposition(&mut self) {
        let Some(panel) = self.panel.as_mut() else {
            return;
        };
        match self.host.trigger_metrics(panel.control()) {
            Some(metrics) => {
                panel.set_placement(PanelPlacement::below(&metrics, self.host.page_y_offset()))
            }
            None => {
                tracing::trace!(target: "horizon_select::controller", "trigger not measurable, placement kept")
            }
        }
    }

    fn recheck_placement(&mut self, serial: u64) {
        let Some(panel) = self.panel.as_mut() else {
            return;
        };
        if panel.serial() != serial {
            return;
        }
        let Some(metrics) = self.host.trigger_metrics(panel.control()) else {
            tracing::debug!(target: "horizon_select::controller", "trigger gone before placement re-check");
            return;
        };
        if panel
            .placement()
            .is_none_or(|placement| placement.needs_recheck(&metrics))
        {
            panel.set_placement(PanelPlacement::below(&metrics, self.host.page_y_offset()));
            tracing::debug!(target: "horizon_select::controller", "panel re-placed after trigger shift");
        }
    }

    fn focus_search(&mut self, serial: u64) {
        let Some(panel) = self.panel.as_mut() else {
            return;
        };
        if panel.serial() != serial || panel.search().is_none() {
            return;
        }
        panel.set_search_focused(true);
        self.host.focus_search_input();
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Click an option of the open panel.
    ///
    /// Ignored for disabled options, for the current value of a
    /// single-select control, and for unselected options once the selection
    /// limit is reached. Returns whether the selection changed.
    pub fn click_option(&mut self, value: &str) -> bool {
        let Some(panel) = self.panel.as_ref() else {
            return false;
        };
        let id = panel.control();
        let (Some(row), Some(control)) = (panel.option_row(value), self.controls.get(id)) else {
            return false;
        };

        let multiple = control.source.is_multiple();
        let was_selected = row.selected;
        if row.disabled
            || (!multiple && was_selected)
            || (!was_selected && control.trigger.is_limit_reached())
        {
            tracing::trace!(target: "horizon_select::controller", %value, "option click ignored");
            return false;
        }

        let (Some(panel), Some(control)) = (self.panel.as_mut(), self.controls.get_mut(id)) else {
            return false;
        };
        if !multiple {
            panel.clear_selected_except(value);
            control.source.deselect_all_except(value);
            control.model.deselect_all_except(value);
        }
        let selected = !was_selected;
        panel.set_row_selected(value, selected);
        control.source.set_selected(value, selected);
        control.model.set_selected(value, selected);
        control.rerender_trigger();

        tracing::debug!(target: "horizon_select::controller", ?id, %value, selected, "option toggled");
        self.emit_change(id);

        if multiple {
            self.reposition();
        } else {
            self.close();
        }
        true
    }

    /// Deselect the option behind a chip without opening the panel.
    pub fn remove_chip(&mut self, id: ControlId, value: &str) -> bool {
        let Some(control) = self.controls.get_mut(id) else {
            return false;
        };
        if control.trigger.is_disabled() || !control.trigger.has_chip(value) {
            return false;
        }
        control.source.set_selected(value, false);
        control.model.set_selected(value, false);
        control.rerender_trigger();
        if let Some(panel) = self.panel.as_mut()
            && panel.control() == id
        {
            panel.set_row_selected(value, false);
        }

        tracing::debug!(target: "horizon_select::controller", ?id, %value, "chip removed");
        self.emit_change(id);
        self.reposition();
        true
    }

    fn emit_change(&mut self, id: ControlId) {
        let Some(control) = self.controls.get(id) else {
            return;
        };
        let values = control.source.selected_values();
        self.host.dispatch_change(id, &values);
        if let Some(callback) = &control.options.on_change {
            callback(&values, &control.source);
        }
        self.changed.emit(ChangeEvent {
            control: id,
            values,
        });
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Handle a click. Returns whether anything changed.
    pub fn on_click(&mut self, target: HitTarget) -> bool {
        match target {
            HitTarget::Trigger(id) | HitTarget::AddAffordance(id) => self.toggle(id),
            HitTarget::Chip { control, value } => self.remove_chip(control, &value),
            HitTarget::PanelOption(value) => self.click_option(&value),
            HitTarget::PanelSearch | HitTarget::Panel => false,
            HitTarget::Outside => self.close(),
        }
    }

    /// Handle a key press. `focus` is where keyboard focus is (for Tab,
    /// where it lands).
    pub fn on_key(&mut self, key: Key, focus: FocusKind) -> bool {
        let Some(panel) = self.panel.as_mut() else {
            return false;
        };
        match key {
            Key::ArrowDown => panel.move_highlight(true).is_some(),
            Key::ArrowUp => panel.move_highlight(false).is_some(),
            Key::Enter => {
                let value = panel.highlighted_value().map(str::to_string);
                value.is_some_and(|value| self.click_option(&value))
            }
            Key::Escape => self.close(),
            Key::Tab if focus == FocusKind::FocusTrap => false,
            Key::Tab => self.close(),
            Key::Other => false,
        }
    }

    /// Handle a viewport resize. Tolerated while a text entry has focus,
    /// since on-screen keyboards resize the viewport.
    pub fn on_resize(&mut self, focus: FocusKind) -> bool {
        if focus == FocusKind::TextEntry {
            return false;
        }
        self.close()
    }

    /// Record the search query typed into the open panel. Filtering runs
    /// [`SEARCH_DEBOUNCE`] after the last call.
    pub fn on_search_input(&mut self, query: &str) {
        let Some(panel) = self.panel.as_mut() else {
            return;
        };
        if panel.search().is_none() {
            return;
        }
        panel.set_query(query);
        let serial = panel.serial();
        self.debounce(SEARCH_TIMER, SEARCH_DEBOUNCE, move |this| this.run_search(serial));
    }

    fn run_search(&mut self, serial: u64) {
        let Some(panel) = self.panel.as_mut() else {
            return;
        };
        if panel.serial() != serial {
            return;
        }
        let query = panel.search().map(|search| search.query.clone()).unwrap_or_default();
        let filter = SearchFilter::parse(&query);
        panel.apply_filter(filter.as_ref());
    }

    /// The pointer entered or left the open panel's option list.
    pub fn on_list_hover(&mut self, hovered: bool) {
        self.list_hovered = hovered && self.panel.is_some();
        if self.list_hovered {
            self.captured_scroll = self.host.scroll_offset();
        }
    }

    /// Handle a page scroll to `offset`.
    ///
    /// While the option list is hovered, the page is held at the offset
    /// captured on hover. Returns `true` when the scroll was reverted.
    pub fn on_scroll(&mut self, offset: f32) -> bool {
        if self.list_hovered && self.panel.is_some() {
            self.host.set_scroll_offset(self.captured_scroll);
            return true;
        }
        self.captured_scroll = offset;
        false
    }

    // =========================================================================
    // Timers
    // =========================================================================

    fn defer<F>(&mut self, delay: Duration, task: F) -> TimerId
    where
        F: FnOnce(&mut Self) + 'static,
    {
        let task: Deferred<H> = Box::new(task);
        self.timers.start_one_shot(self.host.now(), delay, task)
    }

    /// Schedule `task`, replacing the pending task under the same key.
    fn debounce<F>(&mut self, key: &'static str, delay: Duration, task: F)
    where
        F: FnOnce(&mut Self) + 'static,
    {
        if let Some(previous) = self.debounced.remove(key) {
            let _ = self.timers.stop(previous);
        }
        let id = self.defer(delay, task);
        self.debounced.insert(key, id);
    }

    /// Run every deferred task that is due. Returns how many ran.
    pub fn process_timers(&mut self) -> usize {
        let expired = self.timers.take_expired(self.host.now());
        let count = expired.len();
        for (id, task) in expired {
            self.debounced.retain(|_, pending| *pending != id);
            task(self);
        }
        count
    }

    /// When the next deferred task is due.
    pub fn next_deadline(&mut self) -> Option<Instant> {
        let now = self.host.now();
        self.timers.time_until_next(now).map(|delay| now + delay)
    }
}

impl<H: SelectHost + fmt::Debug + 'static> fmt::Debug for SelectController<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectController")
            .field("host", &self.host)
            .field("controls", &self.controls.len())
            .field("active_control", &self.active_control())
            .field("timers", &self.timers)
            .finish()
    }
}
