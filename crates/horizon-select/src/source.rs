//! The backing control a dropdown is wrapped around.
//!
//! A [`SelectSource`] is the structured equivalent of a native multi-option
//! form control: a name, single/multiple mode, a disabled flag, an optional
//! placeholder and an ordered list of options, optionally grouped. The
//! per-option `selected` flags stored here are the authoritative selection;
//! the controller writes every toggle back into them.
//!
//! # Example
//!
//! ```
//! use horizon_select::source::{SelectSource, SourceGroup, SourceOption};
//!
//! let source = SelectSource::new("fruits[]")
//!     .with_multiple(true)
//!     .with_placeholder("Pick fruits")
//!     .with_group(
//!         SourceGroup::new("Citrus")
//!             .with_option(SourceOption::new("lemon", "Lemon"))
//!             .with_option(SourceOption::new("lime", "Lime").with_selected(true)),
//!     );
//!
//! assert_eq!(source.option_count(), 2);
//! assert_eq!(source.selected_values(), vec!["lime".to_string()]);
//! ```

/// One selectable item of a backing control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOption {
    /// Submitted value, unique within its control.
    pub value: String,
    /// Display text.
    pub label: String,
    /// Optional image URL shown next to the label.
    pub image: Option<String>,
    /// Whether the option is currently selected.
    pub selected: bool,
    /// Whether the option can be toggled.
    pub disabled: bool,
    /// Marks the placeholder option injected at wrap time.
    pub(crate) synthetic: bool,
}

impl SourceOption {
    /// Create an unselected, enabled option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            image: None,
            selected: false,
            disabled: false,
            synthetic: false,
        }
    }

    /// Set the image URL using builder pattern. Blank URLs are ignored.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        let url = url.trim();
        self.image = (!url.is_empty()).then(|| url.to_string());
        self
    }

    /// Set the selected flag using builder pattern.
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Set the disabled flag using builder pattern.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Whether this is the placeholder option injected when wrapping.
    pub fn is_synthetic_placeholder(&self) -> bool {
        self.synthetic
    }

    fn placeholder(text: &str) -> Self {
        Self {
            value: String::new(),
            label: text.to_string(),
            image: None,
            selected: true,
            disabled: false,
            synthetic: true,
        }
    }
}

/// A labelled group of options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceGroup {
    /// Group label; also the group's identity.
    pub label: String,
    /// Optional image URL shown in the group header.
    pub image: Option<String>,
    /// Disabling a group disables all of its options.
    pub disabled: bool,
    /// Options in document order.
    pub options: Vec<SourceOption>,
}

impl SourceGroup {
    /// Create an empty, enabled group.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            image: None,
            disabled: false,
            options: Vec::new(),
        }
    }

    /// Set the header image using builder pattern. Blank URLs are ignored.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        let url = url.trim();
        self.image = (!url.is_empty()).then(|| url.to_string());
        self
    }

    /// Set the disabled flag using builder pattern.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Append an option using builder pattern.
    pub fn with_option(mut self, option: SourceOption) -> Self {
        self.options.push(option);
        self
    }
}

/// A top-level child of a backing control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEntry {
    /// An option outside any group.
    Option(SourceOption),
    /// A group of options.
    Group(SourceGroup),
}

/// A backing single- or multi-choice control.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectSource {
    name: String,
    multiple: bool,
    disabled: bool,
    placeholder: Option<String>,
    entries: Vec<SourceEntry>,
}

impl SelectSource {
    /// Create an empty single-choice control.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// The control's field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field name without array brackets (`tags[]` → `tags`).
    pub fn field_name(&self) -> String {
        self.name.replace("[]", "")
    }

    /// Whether more than one option may be selected.
    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// Set multiple mode.
    pub fn set_multiple(&mut self, multiple: bool) {
        self.multiple = multiple;
    }

    /// Set multiple mode using builder pattern.
    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Whether the whole control is disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Set the disabled flag. Call `refresh` on the controller afterwards.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Set the disabled flag using builder pattern.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// The configured placeholder, trimmed. `None` when absent or blank.
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// Set the placeholder text.
    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = Some(placeholder.into());
    }

    /// Set the placeholder using builder pattern.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    // =========================================================================
    // Entries
    // =========================================================================

    /// Top-level entries in document order.
    pub fn entries(&self) -> &[SourceEntry] {
        &self.entries
    }

    /// Mutable access to the entries for external edits.
    ///
    /// Call `refresh` on the controller afterwards so the trigger and option
    /// model pick the edits up.
    pub fn entries_mut(&mut self) -> &mut Vec<SourceEntry> {
        &mut self.entries
    }

    /// Append an ungrouped option.
    pub fn add_option(&mut self, option: SourceOption) {
        self.entries.push(SourceEntry::Option(option));
    }

    /// Append an ungrouped option using builder pattern.
    pub fn with_option(mut self, option: SourceOption) -> Self {
        self.add_option(option);
        self
    }

    /// Append a group.
    pub fn add_group(&mut self, group: SourceGroup) {
        self.entries.push(SourceEntry::Group(group));
    }

    /// Append a group using builder pattern.
    pub fn with_group(mut self, group: SourceGroup) -> Self {
        self.add_group(group);
        self
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Whether the control has at least one group.
    pub fn has_groups(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| matches!(entry, SourceEntry::Group(_)))
    }

    // =========================================================================
    // Options
    // =========================================================================

    /// All options in document order, grouped or not.
    pub fn options(&self) -> impl Iterator<Item = &SourceOption> {
        self.entries.iter().flat_map(|entry| match entry {
            SourceEntry::Option(option) => std::slice::from_ref(option).iter(),
            SourceEntry::Group(group) => group.options.iter(),
        })
    }

    fn options_mut(&mut self) -> impl Iterator<Item = &mut SourceOption> {
        self.entries.iter_mut().flat_map(|entry| match entry {
            SourceEntry::Option(option) => std::slice::from_mut(option).iter_mut(),
            SourceEntry::Group(group) => group.options.iter_mut(),
        })
    }

    /// Find an option by value.
    pub fn option(&self, value: &str) -> Option<&SourceOption> {
        self.options().find(|option| option.value == value)
    }

    /// Total number of options, including any injected placeholder.
    pub fn option_count(&self) -> usize {
        self.options().count()
    }

    /// Number of selected options.
    pub fn selected_count(&self) -> usize {
        self.options().filter(|option| option.selected).count()
    }

    /// Values of the selected options in document order.
    pub fn selected_values(&self) -> Vec<String> {
        self.options()
            .filter(|option| option.selected)
            .map(|option| option.value.clone())
            .collect()
    }

    /// Whether any real option was marked selected (the injected placeholder
    /// does not count).
    pub fn has_preselected(&self) -> bool {
        self.options()
            .any(|option| option.selected && !option.synthetic)
    }

    /// Set the selected flag of the option with `value`.
    ///
    /// Returns `false` if no such option exists.
    pub fn set_selected(&mut self, value: &str, selected: bool) -> bool {
        match self.options_mut().find(|option| option.value == value) {
            Some(option) => {
                option.selected = selected;
                true
            }
            None => false,
        }
    }

    /// Clear the selected flag of every option except `value`.
    pub fn deselect_all_except(&mut self, value: &str) {
        for option in self.options_mut() {
            if option.value != value {
                option.selected = false;
            }
        }
    }

    // =========================================================================
    // Injected placeholder
    // =========================================================================

    /// Insert a selected placeholder option as the first entry.
    pub(crate) fn insert_placeholder_option(&mut self, text: &str) {
        self.entries
            .insert(0, SourceEntry::Option(SourceOption::placeholder(text)));
    }

    /// Remove the injected placeholder option, wherever it ended up.
    ///
    /// Returns `true` if one was removed.
    pub(crate) fn remove_placeholder_option(&mut self) -> bool {
        let before = self.option_count();
        self.entries.retain(|entry| {
            !matches!(entry, SourceEntry::Option(option) if option.synthetic)
        });
        for entry in &mut self.entries {
            if let SourceEntry::Group(group) = entry {
                group.options.retain(|option| !option.synthetic);
            }
        }
        self.option_count() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grouped() -> SelectSource {
        SelectSource::new("tags[]")
            .with_multiple(true)
            .with_option(SourceOption::new("loose", "Loose"))
            .with_group(
                SourceGroup::new("First")
                    .with_option(SourceOption::new("a", "A"))
                    .with_option(SourceOption::new("b", "B").with_selected(true)),
            )
            .with_group(SourceGroup::new("Second").with_option(SourceOption::new("c", "C")))
    }

    #[test]
    fn test_options_flatten_in_document_order() {
        let source = grouped();
        let values: Vec<_> = source.options().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["loose", "a", "b", "c"]);
        assert_eq!(source.option_count(), 4);
        assert!(source.has_groups());
    }

    #[test]
    fn test_field_name_strips_brackets() {
        assert_eq!(grouped().field_name(), "tags");
        assert_eq!(SelectSource::new("plain").field_name(), "plain");
    }

    #[test]
    fn test_placeholder_is_trimmed() {
        let source = SelectSource::new("x").with_placeholder("  Pick one  ");
        assert_eq!(source.placeholder(), Some("Pick one"));

        let blank = SelectSource::new("x").with_placeholder("   ");
        assert_eq!(blank.placeholder(), None);
    }

    #[test]
    fn test_set_selected_and_deselect_others() {
        let mut source = grouped();
        assert!(source.set_selected("c", true));
        assert!(!source.set_selected("missing", true));
        assert_eq!(source.selected_values(), vec!["b", "c"]);

        source.deselect_all_except("c");
        assert_eq!(source.selected_values(), vec!["c"]);
        assert_eq!(source.selected_count(), 1);
    }

    #[test]
    fn test_placeholder_option_roundtrip() {
        let mut source = SelectSource::new("single")
            .with_option(SourceOption::new("a", "A"))
            .with_option(SourceOption::new("b", "B"));
        assert!(!source.has_preselected());

        source.insert_placeholder_option("Pick");
        assert_eq!(source.option_count(), 3);
        assert_eq!(source.selected_values(), vec![String::new()]);
        assert!(!source.has_preselected());
        assert!(source.options().next().is_some_and(|o| o.is_synthetic_placeholder()));

        assert!(source.remove_placeholder_option());
        assert!(!source.remove_placeholder_option());
        assert_eq!(source.option_count(), 2);
    }

    #[test]
    fn test_blank_image_is_ignored() {
        let option = SourceOption::new("a", "A").with_image("  ");
        assert_eq!(option.image, None);
        let option = SourceOption::new("a", "A").with_image(" /img/a.png ");
        assert_eq!(option.image.as_deref(), Some("/img/a.png"));
    }
}
