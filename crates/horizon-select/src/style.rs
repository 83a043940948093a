//! Class names and the shared stylesheet.
//!
//! Every rendered element is tagged with classes from [`classes`]; hosts that
//! render the views into a document use them verbatim. [`stylesheet`] returns
//! the one stylesheet all controls share. The controller hands it to the host
//! once per controller lifetime, however many controls get wrapped.

use std::fmt::Write as _;

/// Class names used by the rendered views.
pub mod classes {
    /// Wrapper around a trigger and its backing control.
    pub const WRAP: &str = "hs-select-wrap";
    /// The trigger surface.
    pub const TRIGGER: &str = "hs-select";
    /// Prefix of the per-field trigger class (`hs-select-f-<field>`).
    pub const FIELD_PREFIX: &str = "hs-select-f-";
    /// Trigger of a multi-select control.
    pub const MULTIPLE: &str = "hs-select-multiple";
    /// Disabled trigger, group or option.
    pub const DISABLED: &str = "hs-select-disabled";
    /// Trigger whose control reached its selection limit.
    pub const LIMIT_REACHED: &str = "hs-select-max-opts";
    /// Trigger whose panel is open.
    pub const OPEN: &str = "hs-select-open";
    /// Removable chip for one selected option.
    pub const CHIP: &str = "hs-select-chip";
    /// The "+" add affordance.
    pub const ADD: &str = "hs-select-add";
    /// Placeholder text.
    pub const PLACEHOLDER: &str = "hs-select-placeholder";
    /// Option or group image glyph.
    pub const IMAGE: &str = "hs-select-img";
    /// The dropdown panel.
    pub const PANEL: &str = "hs-select-dd";
    /// Visible panel.
    pub const PANEL_SHOWN: &str = "hs-select-shown";
    /// Panel of a multi-select control.
    pub const PANEL_MULTIPLE: &str = "hs-select-multiple-dd";
    /// Panel with an active search filter.
    pub const SEARCHING: &str = "hs-select-is-searching";
    /// Search input row.
    pub const SEARCH: &str = "hs-select-search";
    /// Scrollable option list.
    pub const SCROLL: &str = "hs-select-dd-scroll";
    /// Group header row.
    pub const GROUP: &str = "hs-select-group";
    /// Option row.
    pub const OPTION: &str = "hs-select-opt";
    /// Selected option row.
    pub const SELECTED: &str = "hs-select-selected";
    /// Keyboard-highlighted option row.
    pub const HIGHLIGHTED: &str = "hs-select-highlighted";
    /// Row hidden by the search filter.
    pub const HIDDEN: &str = "hs-select-hidden";
    /// "No results" row.
    pub const NO_RESULTS: &str = "hs-select-no-results";
}

use classes::*;

/// Style rules as `(selector, declarations)`.
const RULES: &[(&str, &[&str])] = &[
    (
        ".hs-select-wrap",
        &["position: relative", "display: inline-block"],
    ),
    (
        ".hs-select",
        &[
            "display: flex",
            "flex-wrap: wrap",
            "align-items: center",
            "width: 100%",
            "min-height: 15px",
            "padding: 5px 30px 5px 5px",
            "position: relative",
            "overflow: hidden",
        ],
    ),
    (
        ".hs-select:not(.hs-select-disabled):not(.hs-select-max-opts)",
        &["cursor: pointer"],
    ),
    (
        ".hs-select:not(.hs-select-multiple)::after",
        &[
            "content: \"\"",
            "position: absolute",
            "right: 6px",
            "border-left: 5px solid transparent",
            "border-right: 5px solid transparent",
            "border-top: 6px solid currentColor",
            "transition: transform .3s ease",
        ],
    ),
    (
        ".hs-select.hs-select-open::after",
        &["transform: rotate(180deg)"],
    ),
    (
        ".hs-select-multiple",
        &["padding: 5px 5px 0 5px", "height: auto"],
    ),
    (
        ".hs-select-chip",
        &[
            "display: flex",
            "align-items: center",
            "max-width: 100%",
            "overflow: hidden",
            "white-space: nowrap",
            "text-overflow: ellipsis",
        ],
    ),
    (
        ".hs-select:not(.hs-select-disabled) .hs-select-chip",
        &["cursor: pointer"],
    ),
    (".hs-select-chip::before", &["content: \"\\00d7\""]),
    (".hs-select-add", &["display: inline-block"]),
    (".hs-select-placeholder", &["padding-bottom: 5px"]),
    (
        ".hs-select-wrap, .hs-select-wrap *, .hs-select-dd, .hs-select-dd *",
        &["box-sizing: border-box"],
    ),
    (
        ".hs-select-dd",
        &[
            "visibility: hidden",
            "position: absolute",
            "top: -9999px",
            "z-index: 999",
            "overflow: hidden",
        ],
    ),
    (
        ".hs-select-dd.hs-select-shown",
        &["visibility: visible", "z-index: 99999999"],
    ),
    (
        ".hs-select-dd-scroll",
        &["max-height: 200px", "overflow: auto"],
    ),
    (".hs-select-search input", &["width: 100%", "border: none", "outline: none"]),
    (
        ".hs-select-opt:not(.hs-select-disabled):not(.hs-select-selected), .hs-select-multiple-dd .hs-select-opt:not(.hs-select-disabled)",
        &["cursor: pointer"],
    ),
    (".hs-select-hidden", &["display: none"]),
    (
        ".hs-select-img",
        &[
            "background-position: center center",
            "background-repeat: no-repeat",
            "background-size: contain",
        ],
    ),
];

/// Generate the shared stylesheet.
pub fn stylesheet() -> String {
    let mut css = String::new();
    for (selector, declarations) in RULES {
        let _ = writeln!(css, "{selector} {{");
        for declaration in *declarations {
            let _ = writeln!(css, "    {declaration};");
        }
        let _ = writeln!(css, "}}");
    }
    css
}

/// The per-field trigger class for a field name.
pub fn field_class(field_name: &str) -> String {
    format!("{FIELD_PREFIX}{field_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stylesheet_covers_rendered_classes() {
        let css = stylesheet();
        for class in [
            WRAP,
            TRIGGER,
            MULTIPLE,
            DISABLED,
            LIMIT_REACHED,
            OPEN,
            CHIP,
            ADD,
            PLACEHOLDER,
            IMAGE,
            PANEL,
            PANEL_SHOWN,
            PANEL_MULTIPLE,
            SEARCH,
            SCROLL,
            OPTION,
            SELECTED,
            HIDDEN,
        ] {
            assert!(css.contains(&format!(".{class}")), "missing rule for {class}");
        }
    }

    #[test]
    fn test_stylesheet_is_balanced_and_stable() {
        let css = stylesheet();
        assert_eq!(css.matches('{').count(), css.matches('}').count());
        assert_eq!(css, stylesheet());
    }

    #[test]
    fn test_field_class() {
        assert_eq!(field_class("tags"), "hs-select-f-tags");
    }
}
