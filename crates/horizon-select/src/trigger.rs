//! The trigger: the compact, always-visible summary of a control's selection.
//!
//! A [`TriggerView`] is a projection of the backing source, recomputed by
//! [`TriggerView::render`] after every mutation. Counts are taken from the
//! source itself, so options left out of a grouped model still count towards
//! the totals.
//!
//! Content depends on the control's mode:
//!
//! - nothing selected: the placeholder text;
//! - single-select: the selected option's label (flagged as placeholder when
//!   the injected placeholder option is the selection);
//! - multi-select: one removable [`Chip`] per selected option, followed by
//!   the "+" add affordance while more options can be added.

use crate::config::{SelectOptions, WrapWidth};
use crate::source::{SelectSource, SourceOption};
use crate::style::{self, classes};

/// A removable token for one selected option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    pub value: String,
    /// Display text, also used as the chip's tooltip.
    pub label: String,
    pub image: Option<String>,
}

impl Chip {
    fn from_option(option: &SourceOption) -> Self {
        Self {
            value: option.value.clone(),
            label: option.label.clone(),
            image: option.image.clone(),
        }
    }
}

/// The "+" affordance shown after the chips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddAffordance {
    pub tooltip: String,
}

/// What the trigger displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerContent {
    /// Nothing is selected.
    Placeholder { text: String },
    /// The current value of a single-select control.
    Single {
        label: String,
        image: Option<String>,
        /// The injected placeholder option is the current value.
        is_placeholder: bool,
    },
    /// The selected options of a multi-select control.
    Chips {
        chips: Vec<Chip>,
        add_affordance: Option<AddAffordance>,
    },
}

/// Rendered state of one trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerView {
    field_class: String,
    multiple: bool,
    disabled: bool,
    limit_reached: bool,
    open: bool,
    placeholder: String,
    content: TriggerContent,
    selected_count: usize,
    total_count: usize,
}

impl TriggerView {
    /// Render the trigger of `source`.
    ///
    /// Never fails: an empty source renders its placeholder.
    pub fn render(source: &SelectSource, options: &SelectOptions) -> Self {
        let multiple = source.is_multiple();
        let disabled = source.is_disabled();
        let selected_count = source.selected_count();
        let total_count = source.option_count();
        let limit_reached =
            multiple && options.max_selectable.is_some_and(|max| selected_count >= max);
        let placeholder = placeholder_text(source, options);

        let selected: Vec<&SourceOption> = source.options().filter(|o| o.selected).collect();
        let content = if selected.is_empty() {
            TriggerContent::Placeholder {
                text: placeholder.clone(),
            }
        } else if multiple {
            let can_add = !disabled && !limit_reached && total_count > selected_count;
            TriggerContent::Chips {
                chips: selected.iter().map(|option| Chip::from_option(option)).collect(),
                add_affordance: can_add.then(|| AddAffordance {
                    tooltip: options.labels.add_tooltip.clone(),
                }),
            }
        } else {
            // A single-select source edited externally may carry several
            // selected flags; the last one wins, as in a native control.
            let option = selected[selected.len() - 1];
            TriggerContent::Single {
                label: option.label.clone(),
                image: option.image.clone(),
                is_placeholder: option.is_synthetic_placeholder(),
            }
        };

        Self {
            field_class: style::field_class(&source.field_name()),
            multiple,
            disabled,
            limit_reached,
            open: false,
            placeholder,
            content,
            selected_count,
            total_count,
        }
    }

    /// Classes of the trigger element.
    pub fn classes(&self) -> Vec<String> {
        let mut list = vec![classes::TRIGGER.to_string(), self.field_class.clone()];
        if self.multiple {
            list.push(classes::MULTIPLE.to_string());
        }
        if self.disabled {
            list.push(classes::DISABLED.to_string());
        }
        if self.limit_reached {
            list.push(classes::LIMIT_REACHED.to_string());
        }
        if self.open {
            list.push(classes::OPEN.to_string());
        }
        list
    }

    pub fn content(&self) -> &TriggerContent {
        &self.content
    }

    /// Chips of a multi-select trigger; empty otherwise.
    pub fn chips(&self) -> &[Chip] {
        match &self.content {
            TriggerContent::Chips { chips, .. } => chips,
            _ => &[],
        }
    }

    /// Whether the chip for `value` is shown.
    pub fn has_chip(&self, value: &str) -> bool {
        self.chips().iter().any(|chip| chip.value == value)
    }

    pub fn has_add_affordance(&self) -> bool {
        matches!(
            self.content,
            TriggerContent::Chips {
                add_affordance: Some(_),
                ..
            }
        )
    }

    /// Plain-text summary: the placeholder, the single label, or the chip
    /// labels joined by `", "`.
    pub fn display_text(&self) -> String {
        match &self.content {
            TriggerContent::Placeholder { text } => text.clone(),
            TriggerContent::Single { label, .. } => label.clone(),
            TriggerContent::Chips { chips, .. } => chips
                .iter()
                .map(|chip| chip.label.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// The placeholder text this trigger falls back to.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Whether a click may open the panel.
    pub fn accepts_open(&self) -> bool {
        !self.disabled && !self.limit_reached
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub(crate) fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_limit_reached(&self) -> bool {
        self.limit_reached
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    pub fn selected_count(&self) -> usize {
        self.selected_count
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }
}

/// The placeholder of a control: its own, or the multi-select default label.
pub fn placeholder_text(source: &SelectSource, options: &SelectOptions) -> String {
    match source.placeholder() {
        Some(text) => text.to_string(),
        None if source.is_multiple() => options.labels.multi_placeholder.clone(),
        None => String::new(),
    }
}

/// The element wrapping a trigger and its backing control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperView {
    pub classes: Vec<String>,
    /// Explicit CSS width, if any.
    pub width: Option<String>,
}

impl WrapperView {
    /// Build the wrapper. `native_width` is the backing control's measured
    /// width, used by [`WrapWidth::Inherit`].
    pub fn new(options: &SelectOptions, native_width: f32) -> Self {
        let mut list = vec![classes::WRAP.to_string()];
        list.extend(options.extra_classes.iter().cloned());

        let width = match &options.wrap_width {
            WrapWidth::Auto => None,
            WrapWidth::Inherit => Some(format!("{}px", native_width.round())),
            WrapWidth::Fixed(size) => Some(size.clone()),
        };

        Self {
            classes: list,
            width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceGroup;

    fn abc() -> SelectSource {
        SelectSource::new("letters")
            .with_option(SourceOption::new("a", "A"))
            .with_option(SourceOption::new("b", "B"))
            .with_option(SourceOption::new("c", "C"))
    }

    #[test]
    fn test_placeholder_when_nothing_selected() {
        let source = abc().with_placeholder("Pick");
        let view = TriggerView::render(&source, &SelectOptions::default());

        assert_eq!(
            view.content(),
            &TriggerContent::Placeholder {
                text: "Pick".into()
            }
        );
        assert_eq!(view.display_text(), "Pick");
        assert_eq!(view.total_count(), 3);
        assert!(view.accepts_open());
    }

    #[test]
    fn test_empty_source_renders_placeholder() {
        let source = SelectSource::new("tags[]").with_multiple(true);
        let view = TriggerView::render(&source, &SelectOptions::default());
        assert_eq!(view.display_text(), "Select options ..");
        assert!(!view.has_add_affordance());
    }

    #[test]
    fn test_single_shows_selected_label() {
        let mut source = abc();
        source.set_selected("b", true);
        let view = TriggerView::render(&source, &SelectOptions::default());

        assert_eq!(view.display_text(), "B");
        assert!(view.chips().is_empty());
        assert!(!view.classes().contains(&classes::MULTIPLE.to_string()));
    }

    #[test]
    fn test_single_placeholder_option_is_flagged() {
        let mut source = abc().with_placeholder("Pick");
        source.insert_placeholder_option("Pick");
        let view = TriggerView::render(&source, &SelectOptions::default());

        assert!(matches!(
            view.content(),
            TriggerContent::Single {
                is_placeholder: true,
                ..
            }
        ));
    }

    #[test]
    fn test_multi_chips_and_add_affordance() {
        let mut source = abc().with_multiple(true);
        source.set_selected("a", true);
        source.set_selected("c", true);
        let view = TriggerView::render(&source, &SelectOptions::default());

        let values: Vec<_> = view.chips().iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["a", "c"]);
        assert!(view.has_add_affordance());
        assert_eq!(view.display_text(), "A, C");
        assert!(view.classes().contains(&classes::MULTIPLE.to_string()));
    }

    #[test]
    fn test_no_add_affordance_when_everything_selected() {
        let mut source = abc().with_multiple(true);
        for value in ["a", "b", "c"] {
            source.set_selected(value, true);
        }
        let view = TriggerView::render(&source, &SelectOptions::default());
        assert!(!view.has_add_affordance());
    }

    #[test]
    fn test_limit_reached() {
        let mut source = abc().with_multiple(true);
        source.set_selected("a", true);
        source.set_selected("b", true);
        let options = SelectOptions::default().with_max_selectable(Some(2));
        let view = TriggerView::render(&source, &options);

        assert!(view.is_limit_reached());
        assert!(!view.accepts_open());
        assert!(!view.has_add_affordance());
        assert!(view.classes().contains(&classes::LIMIT_REACHED.to_string()));
    }

    #[test]
    fn test_limit_ignored_for_single_select() {
        let mut source = abc();
        source.set_selected("a", true);
        let options = SelectOptions::default().with_max_selectable(Some(1));
        let view = TriggerView::render(&source, &options);
        assert!(!view.is_limit_reached());
    }

    #[test]
    fn test_disabled_trigger() {
        let mut source = abc().with_multiple(true).with_disabled(true);
        source.set_selected("a", true);
        let view = TriggerView::render(&source, &SelectOptions::default());

        assert!(view.is_disabled());
        assert!(!view.accepts_open());
        assert!(!view.has_add_affordance());
        assert!(view.classes().contains(&classes::DISABLED.to_string()));
    }

    #[test]
    fn test_counts_include_ungrouped_options() {
        let source = SelectSource::new("s")
            .with_multiple(true)
            .with_option(SourceOption::new("loose", "Loose").with_selected(true))
            .with_group(SourceGroup::new("G").with_option(SourceOption::new("a", "A")));
        let view = TriggerView::render(&source, &SelectOptions::default());

        assert_eq!(view.total_count(), 2);
        assert_eq!(view.selected_count(), 1);
        assert!(view.has_chip("loose"));
    }

    #[test]
    fn test_field_class() {
        let view = TriggerView::render(&SelectSource::new("tags[]"), &SelectOptions::default());
        assert!(view.classes().contains(&"hs-select-f-tags".to_string()));
    }

    #[test]
    fn test_wrapper_width_policies() {
        let options = SelectOptions::default().with_extra_class("compact");
        let wrapper = WrapperView::new(&options, 180.0);
        assert_eq!(wrapper.classes, vec!["hs-select-wrap", "compact"]);
        assert_eq!(wrapper.width, None);

        let wrapper = WrapperView::new(&options.clone().with_wrap_width("inherit"), 179.6);
        assert_eq!(wrapper.width.as_deref(), Some("180px"));

        let wrapper = WrapperView::new(&options.with_wrap_width("50%"), 179.6);
        assert_eq!(wrapper.width.as_deref(), Some("50%"));
    }
}
