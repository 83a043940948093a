//! The dropdown panel.
//!
//! A [`Panel`] is built from scratch from the option model every time a
//! control opens; nothing is retained across opens. Rows follow model order:
//! each explicit group contributes a header row followed by its options.
//! Options of an ungrouped control get no header.
//!
//! The panel also carries the transient interaction state of one open
//! session: the search query, the keyboard highlight and the placement.

use crate::config::SelectOptions;
use crate::controller::ControlId;
use crate::model::OptionModel;
use crate::position::PanelPlacement;
use crate::search::SearchFilter;
use crate::style::classes;

/// Header row of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRow {
    pub label: String,
    pub image: Option<String>,
    pub disabled: bool,
    pub hidden: bool,
}

/// One selectable row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRow {
    pub value: String,
    pub label: String,
    pub image: Option<String>,
    pub selected: bool,
    /// Own flag or inherited from the group.
    pub disabled: bool,
    pub hidden: bool,
    pub group_id: Option<String>,
}

/// A row of the panel's list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelRow {
    Group(GroupRow),
    Option(OptionRow),
    /// Shown while a search matches nothing.
    NoResults(String),
}

impl PanelRow {
    fn as_option(&self) -> Option<&OptionRow> {
        match self {
            PanelRow::Option(row) => Some(row),
            _ => None,
        }
    }

    fn as_option_mut(&mut self) -> Option<&mut OptionRow> {
        match self {
            PanelRow::Option(row) => Some(row),
            _ => None,
        }
    }
}

/// The inline search input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBox {
    pub placeholder: String,
    pub query: String,
    pub focused: bool,
}

/// The open dropdown of one control.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    control: ControlId,
    serial: u64,
    multiple: bool,
    extra_classes: Vec<String>,
    rows: Vec<PanelRow>,
    search: Option<SearchBox>,
    searching: bool,
    highlighted: Option<usize>,
    placement: Option<PanelPlacement>,
    no_results_text: String,
}

impl Panel {
    /// Build the panel of `control` from its model.
    ///
    /// `serial` identifies this open session; deferred work scheduled while
    /// it is open compares serials to detect that the panel was replaced.
    pub fn build(
        control: ControlId,
        serial: u64,
        model: &OptionModel,
        options: &SelectOptions,
    ) -> Self {
        let multiple = model.is_multiple();
        let mut rows = Vec::new();

        for group in model.groups() {
            if !group.implicit {
                rows.push(PanelRow::Group(GroupRow {
                    label: group.id.clone(),
                    image: group.image.clone(),
                    disabled: group.disabled,
                    hidden: false,
                }));
            }
            for option in &group.options {
                if option.placeholder && !multiple {
                    continue;
                }
                rows.push(PanelRow::Option(OptionRow {
                    value: option.value.clone(),
                    label: option.label.clone(),
                    image: option.image.clone(),
                    selected: option.selected,
                    disabled: model.is_effectively_disabled(option),
                    hidden: false,
                    group_id: option.group_id.clone(),
                }));
            }
        }

        let option_count = model.source_option_count();
        let search = (options.enable_search && option_count >= options.search_threshold).then(|| {
            SearchBox {
                placeholder: options.labels.search_placeholder.clone(),
                query: String::new(),
                focused: false,
            }
        });

        let highlighted = rows.iter().position(|row| {
            row.as_option()
                .is_some_and(|option| option.selected && !option.disabled)
        });

        tracing::debug!(
            target: "horizon_select::panel",
            ?control,
            rows = rows.len(),
            search = search.is_some(),
            "panel built"
        );

        Self {
            control,
            serial,
            multiple,
            extra_classes: options.extra_classes.clone(),
            rows,
            search,
            searching: false,
            highlighted,
            placement: None,
            no_results_text: options.labels.no_results.clone(),
        }
    }

    /// The control this panel belongs to.
    pub fn control(&self) -> ControlId {
        self.control
    }

    pub(crate) fn serial(&self) -> u64 {
        self.serial
    }

    /// Classes of the panel element.
    pub fn classes(&self) -> Vec<String> {
        let mut list = vec![classes::PANEL.to_string(), classes::PANEL_SHOWN.to_string()];
        if self.multiple {
            list.push(classes::PANEL_MULTIPLE.to_string());
        }
        if self.searching {
            list.push(classes::SEARCHING.to_string());
        }
        list.extend(self.extra_classes.iter().cloned());
        list
    }

    pub fn rows(&self) -> &[PanelRow] {
        &self.rows
    }

    /// Classes of the row at `index`.
    pub fn row_classes(&self, index: usize) -> Vec<&'static str> {
        let mut list = Vec::new();
        match self.rows.get(index) {
            Some(PanelRow::Group(group)) => {
                list.push(classes::GROUP);
                if group.disabled {
                    list.push(classes::DISABLED);
                }
                if group.hidden {
                    list.push(classes::HIDDEN);
                }
            }
            Some(PanelRow::Option(option)) => {
                list.push(classes::OPTION);
                if option.selected {
                    list.push(classes::SELECTED);
                }
                if option.disabled {
                    list.push(classes::DISABLED);
                }
                if option.hidden {
                    list.push(classes::HIDDEN);
                }
                if self.highlighted == Some(index) {
                    list.push(classes::HIGHLIGHTED);
                }
            }
            Some(PanelRow::NoResults(_)) => list.push(classes::NO_RESULTS),
            None => {}
        }
        list
    }

    /// Option rows in list order.
    pub fn option_rows(&self) -> impl Iterator<Item = &OptionRow> {
        self.rows.iter().filter_map(PanelRow::as_option)
    }

    /// Find the row of an option.
    pub fn option_row(&self, value: &str) -> Option<&OptionRow> {
        self.option_rows().find(|row| row.value == value)
    }

    /// Values of the option rows not hidden by the search filter.
    pub fn visible_values(&self) -> Vec<&str> {
        self.option_rows()
            .filter(|row| !row.hidden)
            .map(|row| row.value.as_str())
            .collect()
    }

    /// Whether the "no results" row is shown.
    pub fn has_no_results(&self) -> bool {
        self.rows
            .iter()
            .any(|row| matches!(row, PanelRow::NoResults(_)))
    }

    pub fn search(&self) -> Option<&SearchBox> {
        self.search.as_ref()
    }

    /// Whether a search filter is active.
    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn placement(&self) -> Option<PanelPlacement> {
        self.placement
    }

    pub(crate) fn set_placement(&mut self, placement: PanelPlacement) {
        self.placement = Some(placement);
    }

    pub(crate) fn set_query(&mut self, query: &str) {
        if let Some(search) = &mut self.search {
            search.query = query.to_string();
        }
    }

    pub(crate) fn set_search_focused(&mut self, focused: bool) {
        if let Some(search) = &mut self.search {
            search.focused = focused;
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Set the selected flag of a row. Returns `false` if no such row exists.
    pub(crate) fn set_row_selected(&mut self, value: &str, selected: bool) -> bool {
        match self
            .rows
            .iter_mut()
            .filter_map(PanelRow::as_option_mut)
            .find(|row| row.value == value)
        {
            Some(row) => {
                row.selected = selected;
                true
            }
            None => false,
        }
    }

    /// Clear every row's selected flag except the one of `value`.
    pub(crate) fn clear_selected_except(&mut self, value: &str) {
        for row in self.rows.iter_mut().filter_map(PanelRow::as_option_mut) {
            if row.value != value {
                row.selected = false;
            }
        }
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Apply a search filter, or clear filtering with `None`.
    ///
    /// Returns the number of visible options.
    pub(crate) fn apply_filter(&mut self, filter: Option<&SearchFilter>) -> usize {
        self.rows.retain(|row| !matches!(row, PanelRow::NoResults(_)));

        let Some(filter) = filter else {
            for row in &mut self.rows {
                match row {
                    PanelRow::Group(group) => group.hidden = false,
                    PanelRow::Option(option) => option.hidden = false,
                    PanelRow::NoResults(_) => {}
                }
            }
            self.searching = false;
            return self.option_rows().count();
        };

        let mut visible = 0;
        for row in &mut self.rows {
            match row {
                PanelRow::Group(group) => group.hidden = true,
                PanelRow::Option(option) => {
                    option.hidden = !filter.matches(&option.label);
                    if !option.hidden {
                        visible += 1;
                    }
                }
                PanelRow::NoResults(_) => {}
            }
        }
        if visible == 0 {
            self.rows
                .push(PanelRow::NoResults(self.no_results_text.clone()));
        }
        self.searching = true;

        if let Some(index) = self.highlighted
            && self.rows[index].as_option().is_none_or(|row| row.hidden)
        {
            self.highlighted = None;
        }

        tracing::debug!(target: "horizon_select::search", terms = ?filter.terms(), visible, "search applied");
        visible
    }

    // =========================================================================
    // Keyboard highlight
    // =========================================================================

    /// Index of the highlighted row.
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Value of the highlighted option.
    pub fn highlighted_value(&self) -> Option<&str> {
        self.highlighted
            .and_then(|index| self.rows.get(index))
            .and_then(PanelRow::as_option)
            .map(|row| row.value.as_str())
    }

    /// Move the highlight to the next (or previous) enabled, visible option,
    /// wrapping around. Without a highlight, forward starts at the first
    /// option and backward at the last.
    pub(crate) fn move_highlight(&mut self, forward: bool) -> Option<&str> {
        let candidates: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                row.as_option()
                    .is_some_and(|option| !option.disabled && !option.hidden)
            })
            .map(|(index, _)| index)
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let next = match self.highlighted {
            None if forward => candidates[0],
            None => candidates[candidates.len() - 1],
            Some(current) if forward => candidates
                .iter()
                .copied()
                .find(|&index| index > current)
                .unwrap_or(candidates[0]),
            Some(current) => candidates
                .iter()
                .rev()
                .copied()
                .find(|&index| index < current)
                .unwrap_or(candidates[candidates.len() - 1]),
        };
        self.highlighted = Some(next);

        tracing::trace!(target: "horizon_select::panel", index = next, "highlight moved");
        self.highlighted_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{SelectSource, SourceGroup, SourceOption};
    use slotmap::SlotMap;

    fn control_id() -> ControlId {
        let mut map: SlotMap<ControlId, ()> = SlotMap::with_key();
        map.insert(())
    }

    fn fruits() -> OptionModel {
        let source = SelectSource::new("fruit")
            .with_group(
                SourceGroup::new("Citrus")
                    .with_option(SourceOption::new("lemon", "Lemon"))
                    .with_option(SourceOption::new("lime", "Lime").with_selected(true)),
            )
            .with_group(
                SourceGroup::new("Berries")
                    .with_disabled(true)
                    .with_option(SourceOption::new("straw", "Strawberry")),
            )
            .with_group(
                SourceGroup::new("Other")
                    .with_option(SourceOption::new("apple", "Apple"))
                    .with_option(SourceOption::new("kiwi", "Kiwi").with_disabled(true)),
            );
        OptionModel::build(&source)
    }

    fn build(model: &OptionModel) -> Panel {
        Panel::build(control_id(), 1, model, &SelectOptions::default())
    }

    #[test]
    fn test_rows_follow_group_order() {
        let panel = build(&fruits());
        let shape: Vec<_> = panel
            .rows()
            .iter()
            .map(|row| match row {
                PanelRow::Group(group) => format!("#{}", group.label),
                PanelRow::Option(option) => option.value.clone(),
                PanelRow::NoResults(_) => "-".into(),
            })
            .collect();
        assert_eq!(
            shape,
            vec!["#Citrus", "lemon", "lime", "#Berries", "straw", "#Other", "apple", "kiwi"]
        );
    }

    #[test]
    fn test_disabled_is_inherited_from_group() {
        let panel = build(&fruits());
        assert!(panel.option_row("straw").is_some_and(|row| row.disabled));
        assert!(panel.option_row("kiwi").is_some_and(|row| row.disabled));
        assert!(panel.option_row("apple").is_some_and(|row| !row.disabled));
        assert!(panel.row_classes(3).contains(&classes::DISABLED));
    }

    #[test]
    fn test_first_selected_enabled_option_is_highlighted() {
        let panel = build(&fruits());
        assert_eq!(panel.highlighted_value(), Some("lime"));
        assert!(panel.row_classes(2).contains(&classes::HIGHLIGHTED));
    }

    #[test]
    fn test_ungrouped_control_has_no_headers() {
        let source = SelectSource::new("s")
            .with_option(SourceOption::new("a", "A"))
            .with_option(SourceOption::new("b", "B"));
        let panel = build(&OptionModel::build(&source));
        assert!(panel.rows().iter().all(|row| matches!(row, PanelRow::Option(_))));
        assert_eq!(panel.highlighted(), None);
    }

    #[test]
    fn test_placeholder_option_hidden_for_single_select() {
        let mut source = SelectSource::new("s").with_option(SourceOption::new("a", "A"));
        source.insert_placeholder_option("Pick");
        let panel = build(&OptionModel::build(&source));
        assert_eq!(panel.visible_values(), vec!["a"]);
    }

    #[test]
    fn test_search_box_threshold() {
        let model = fruits();
        let options = SelectOptions::default().with_search_threshold(5);
        let panel = Panel::build(control_id(), 1, &model, &options);
        assert_eq!(
            panel.search().map(|s| s.placeholder.as_str()),
            Some("search options")
        );

        let options = options.with_search_threshold(6);
        assert!(Panel::build(control_id(), 1, &model, &options).search().is_none());

        let options = SelectOptions::default()
            .with_search_threshold(1)
            .with_enable_search(false);
        assert!(Panel::build(control_id(), 1, &model, &options).search().is_none());
    }

    #[test]
    fn test_search_threshold_counts_placeholder_option() {
        let mut source = (1..=6).fold(SelectSource::new("s"), |source, n| {
            source.with_option(SourceOption::new(format!("v{n}"), format!("Option {n}")))
        });
        source.insert_placeholder_option("Pick");
        assert_eq!(source.option_count(), 7);

        let panel = build(&OptionModel::build(&source));
        assert_eq!(panel.option_rows().count(), 6);
        assert!(panel.search().is_some());
    }

    #[test]
    fn test_search_threshold_counts_dropped_ungrouped_options() {
        let source = SelectSource::new("s")
            .with_option(SourceOption::new("loose1", "Loose 1"))
            .with_option(SourceOption::new("loose2", "Loose 2"))
            .with_group(
                SourceGroup::new("G")
                    .with_option(SourceOption::new("a", "A"))
                    .with_option(SourceOption::new("b", "B"))
                    .with_option(SourceOption::new("c", "C")),
            );
        let model = OptionModel::build(&source);
        assert_eq!(model.dropped_count(), 2);

        let options = SelectOptions::default().with_search_threshold(5);
        let panel = Panel::build(control_id(), 1, &model, &options);
        assert_eq!(panel.visible_values(), vec!["a", "b", "c"]);
        assert!(panel.search().is_some());

        let options = options.with_search_threshold(6);
        assert!(Panel::build(control_id(), 1, &model, &options).search().is_none());
    }

    #[test]
    fn test_filter_hides_headers_and_non_matches() {
        let mut panel = build(&fruits());
        let filter = SearchFilter::parse("LI berry").unwrap();

        assert_eq!(panel.apply_filter(Some(&filter)), 2);
        assert_eq!(panel.visible_values(), vec!["lime", "straw"]);
        assert!(panel.rows().iter().all(|row| match row {
            PanelRow::Group(group) => group.hidden,
            _ => true,
        }));
        assert!(panel.is_searching());
        assert!(panel.classes().contains(&classes::SEARCHING.to_string()));
        assert!(!panel.has_no_results());
    }

    #[test]
    fn test_no_results_row_comes_and_goes() {
        let mut panel = build(&fruits());
        let filter = SearchFilter::parse("zzz").unwrap();

        assert_eq!(panel.apply_filter(Some(&filter)), 0);
        assert!(panel.has_no_results());
        assert!(matches!(
            panel.rows().last(),
            Some(PanelRow::NoResults(text)) if text == ".. no matching options .."
        ));
        assert_eq!(panel.highlighted(), None);

        // Repeated misses keep a single row.
        panel.apply_filter(Some(&filter));
        assert_eq!(
            panel
                .rows()
                .iter()
                .filter(|row| matches!(row, PanelRow::NoResults(_)))
                .count(),
            1
        );

        panel.apply_filter(None);
        assert!(!panel.has_no_results());
        assert_eq!(panel.visible_values().len(), 5);
        assert!(!panel.is_searching());
    }

    #[test]
    fn test_highlight_skips_disabled_and_wraps() {
        let mut panel = build(&fruits());
        assert_eq!(panel.move_highlight(true), Some("apple"));
        assert_eq!(panel.move_highlight(true), Some("lemon"));
        assert_eq!(panel.move_highlight(false), Some("apple"));
        assert_eq!(panel.move_highlight(false), Some("lime"));
    }

    #[test]
    fn test_highlight_skips_hidden_rows() {
        let mut panel = build(&fruits());
        let filter = SearchFilter::parse("ap le").unwrap();
        panel.apply_filter(Some(&filter));
        // "le" matches Lemon and Apple; Lime was highlighted and is hidden.
        assert_eq!(panel.highlighted(), None);
        assert_eq!(panel.move_highlight(false), Some("apple"));
        assert_eq!(panel.move_highlight(false), Some("lemon"));
    }

    #[test]
    fn test_highlight_without_candidates() {
        let source = SelectSource::new("s")
            .with_option(SourceOption::new("a", "A").with_disabled(true));
        let mut panel = build(&OptionModel::build(&source));
        assert_eq!(panel.move_highlight(true), None);
    }

    #[test]
    fn test_selection_edits() {
        let mut panel = build(&fruits());
        assert!(panel.set_row_selected("apple", true));
        assert!(!panel.set_row_selected("nope", true));
        panel.clear_selected_except("apple");

        let selected: Vec<_> = panel
            .option_rows()
            .filter(|row| row.selected)
            .map(|row| row.value.as_str())
            .collect();
        assert_eq!(selected, vec!["apple"]);
    }

    #[test]
    fn test_panel_classes() {
        let source = SelectSource::new("s").with_multiple(true);
        let options = SelectOptions::default().with_extra_class("wide");
        let panel = Panel::build(control_id(), 1, &OptionModel::build(&source), &options);
        assert_eq!(
            panel.classes(),
            vec!["hs-select-dd", "hs-select-shown", "hs-select-multiple-dd", "wide"]
        );
    }
}
