//! Normalized option model.
//!
//! [`OptionModel::build`] reads a [`SelectSource`] into groups of options,
//! applying the wrap-time policies:
//!
//! - a control without groups gets one implicit, header-less group holding
//!   every option;
//! - a control with groups keeps only grouped options, so options outside any
//!   group are dropped from the model (they still count towards the
//!   trigger's totals);
//! - groups sharing a label are merged, and a group is disabled if any of
//!   the merged groups is.
//!
//! Building is a pure read. The model is rebuilt wholesale on every refresh;
//! in between, the controller keeps it in step with the source through
//! [`OptionModel::set_selected`].

use crate::source::{SelectSource, SourceEntry, SourceOption};

/// A group of options in the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Group identity (its label). Empty for the implicit group.
    pub id: String,
    /// Optional header image.
    pub image: Option<String>,
    /// Disabled groups disable all their options.
    pub disabled: bool,
    /// Whether this is the header-less group of an ungrouped control.
    pub implicit: bool,
    /// Options in source order.
    pub options: Vec<OptionItem>,
}

/// One option in the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionItem {
    pub value: String,
    pub label: String,
    pub image: Option<String>,
    pub selected: bool,
    /// The option's own flag; see [`OptionModel::is_effectively_disabled`].
    pub disabled: bool,
    /// `None` for options of the implicit group.
    pub group_id: Option<String>,
    /// Whether this is the injected placeholder option.
    pub placeholder: bool,
}

impl OptionItem {
    fn from_source(option: &SourceOption, group_id: Option<&str>) -> Self {
        Self {
            value: option.value.clone(),
            label: option.label.clone(),
            image: option.image.clone(),
            selected: option.selected,
            disabled: option.disabled,
            group_id: group_id.map(str::to_string),
            placeholder: option.is_synthetic_placeholder(),
        }
    }
}

/// Grouped view of one control's options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionModel {
    groups: Vec<Group>,
    multiple: bool,
    dropped: usize,
    source_options: usize,
}

impl OptionModel {
    /// Build the model from a backing source.
    pub fn build(source: &SelectSource) -> Self {
        let mut model = Self {
            groups: Vec::new(),
            multiple: source.is_multiple(),
            dropped: 0,
            source_options: source.option_count(),
        };

        if !source.has_groups() {
            model.groups.push(Group {
                id: String::new(),
                image: None,
                disabled: false,
                implicit: true,
                options: Vec::new(),
            });
            for option in source.options() {
                model.push_option(0, option);
            }
            return model;
        }

        for entry in source.entries() {
            match entry {
                SourceEntry::Option(_) => model.dropped += 1,
                SourceEntry::Group(group) => {
                    let index = match model.groups.iter().position(|g| g.id == group.label) {
                        Some(index) => {
                            let existing = &mut model.groups[index];
                            existing.disabled |= group.disabled;
                            if existing.image.is_none() {
                                existing.image = group.image.clone();
                            }
                            index
                        }
                        None => {
                            model.groups.push(Group {
                                id: group.label.clone(),
                                image: group.image.clone(),
                                disabled: group.disabled,
                                implicit: false,
                                options: Vec::new(),
                            });
                            model.groups.len() - 1
                        }
                    };
                    for option in &group.options {
                        model.push_option(index, option);
                    }
                }
            }
        }

        if model.dropped > 0 {
            tracing::debug!(
                target: "horizon_select::model",
                dropped = model.dropped,
                "ungrouped options excluded from a grouped control"
            );
        }
        model
    }

    fn push_option(&mut self, group_index: usize, option: &SourceOption) {
        if self.option(&option.value).is_some() {
            tracing::debug!(target: "horizon_select::model", value = %option.value, "duplicate option value skipped");
            self.dropped += 1;
            return;
        }
        let group = &mut self.groups[group_index];
        let group_id = (!group.implicit).then_some(group.id.as_str());
        let item = OptionItem::from_source(option, group_id);
        group.options.push(item);
    }

    /// Groups in source order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Whether the control had no groups.
    pub fn has_implicit_group(&self) -> bool {
        self.groups.first().is_some_and(|group| group.implicit)
    }

    /// Whether the control allows multiple selection.
    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// All options in model order.
    pub fn options(&self) -> impl Iterator<Item = &OptionItem> {
        self.groups.iter().flat_map(|group| group.options.iter())
    }

    /// Number of options in the model.
    pub fn len(&self) -> usize {
        self.options().count()
    }

    /// Whether the model holds no options.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of source options left out of the model.
    pub fn dropped_count(&self) -> usize {
        self.dropped
    }

    /// Number of options in the backing source, including dropped ones and
    /// the synthetic placeholder.
    pub fn source_option_count(&self) -> usize {
        self.source_options
    }

    /// Find an option by value.
    pub fn option(&self, value: &str) -> Option<&OptionItem> {
        self.options().find(|option| option.value == value)
    }

    /// Find a group by id.
    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|group| !group.implicit && group.id == id)
    }

    /// Whether an option is disabled by its own flag or its group's.
    pub fn is_effectively_disabled(&self, option: &OptionItem) -> bool {
        option.disabled
            || option
                .group_id
                .as_deref()
                .and_then(|id| self.group(id))
                .is_some_and(|group| group.disabled)
    }

    /// Values of selected options in model order.
    pub fn selected_values(&self) -> Vec<String> {
        self.options()
            .filter(|option| option.selected)
            .map(|option| option.value.clone())
            .collect()
    }

    /// Set an option's selected flag. Returns `false` if it is not in the model.
    pub fn set_selected(&mut self, value: &str, selected: bool) -> bool {
        let found = self
            .groups
            .iter_mut()
            .flat_map(|group| group.options.iter_mut())
            .find(|option| option.value == value);
        match found {
            Some(option) => {
                option.selected = selected;
                true
            }
            None => false,
        }
    }

    /// Clear every selected flag except the one of `value`.
    pub fn deselect_all_except(&mut self, value: &str) {
        for option in self.groups.iter_mut().flat_map(|group| group.options.iter_mut()) {
            if option.value != value {
                option.selected = false;
            }
        }
    }
}
