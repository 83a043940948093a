//! Construction options.
//!
//! [`SelectOptions`] configures every control wrapped by one
//! [`SelectController::wrap`](crate::SelectController::wrap) call. Options
//! can be built in code with the `with_*` methods or loaded from JSON/TOML
//! using the camelCase key names:
//!
//! ```
//! use horizon_select::SelectOptions;
//!
//! let options = SelectOptions::from_json(r#"{
//!     "searchThreshold": 3,
//!     "maxSelectable": 2,
//!     "extraClasses": ["compact"]
//! }"#).unwrap();
//!
//! assert_eq!(options.search_threshold, 3);
//! assert_eq!(options.max_selectable, Some(2));
//!
//! let options = SelectOptions::new()
//!     .with_max_selectable(None)
//!     .with_on_change(|values, _source| println!("now: {values:?}"));
//! assert!(options.on_change.is_some());
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SelectError};
use crate::source::SelectSource;

/// Callback fired after every selection change with the selected values and
/// the backing source.
pub type OnChange = Arc<dyn Fn(&[String], &SelectSource) + Send + Sync>;

/// Texts shown by the widget.
///
/// Serialized as a four-element array:
/// `[search placeholder, add tooltip, multi placeholder, no results]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[String; 4]", into = "[String; 4]")]
pub struct Labels {
    /// Placeholder of the panel's search input.
    pub search_placeholder: String,
    /// Tooltip of the "+" add affordance.
    pub add_tooltip: String,
    /// Placeholder for multi-select controls that configure none.
    pub multi_placeholder: String,
    /// Text of the row shown when a search matches nothing.
    pub no_results: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            search_placeholder: "search options".into(),
            add_tooltip: "add options".into(),
            multi_placeholder: "Select options ..".into(),
            no_results: ".. no matching options ..".into(),
        }
    }
}

impl From<[String; 4]> for Labels {
    fn from([search_placeholder, add_tooltip, multi_placeholder, no_results]: [String; 4]) -> Self {
        Self {
            search_placeholder,
            add_tooltip,
            multi_placeholder,
            no_results,
        }
    }
}

impl From<Labels> for [String; 4] {
    fn from(labels: Labels) -> Self {
        [
            labels.search_placeholder,
            labels.add_tooltip,
            labels.multi_placeholder,
            labels.no_results,
        ]
    }
}

/// Width policy of the wrapper around each trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WrapWidth {
    /// Leave the width to the stylesheet.
    #[default]
    Auto,
    /// Copy the backing control's measured width.
    Inherit,
    /// Any CSS size, used verbatim.
    Fixed(String),
}

impl From<String> for WrapWidth {
    fn from(value: String) -> Self {
        match value.trim() {
            "" | "auto" => Self::Auto,
            "inherit" => Self::Inherit,
            other => Self::Fixed(other.to_string()),
        }
    }
}

impl From<&str> for WrapWidth {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<WrapWidth> for String {
    fn from(width: WrapWidth) -> Self {
        match width {
            WrapWidth::Auto => "auto".into(),
            WrapWidth::Inherit => "inherit".into(),
            WrapWidth::Fixed(size) => size,
        }
    }
}

/// Options applied to the controls of one wrap call.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectOptions {
    /// Whether panels may show a search input.
    pub enable_search: bool,
    /// Minimum option count for the search input to appear.
    pub search_threshold: usize,
    /// Focus the search input shortly after opening, on wide viewports.
    pub auto_focus_search: bool,
    /// Wrapper width policy.
    pub wrap_width: WrapWidth,
    /// Extra classes for wrappers and panels.
    pub extra_classes: Vec<String>,
    /// Inject a selected placeholder option into single-select controls that
    /// have a placeholder and no preselected option.
    pub placeholder_as_first_option: bool,
    /// Selection limit for multi-select controls. `false` in JSON/TOML means
    /// unbounded.
    #[serde(with = "max_selectable_serde")]
    pub max_selectable: Option<usize>,
    /// Widget texts.
    pub labels: Labels,
    /// Change callback; code only, never (de)serialized.
    #[serde(skip)]
    pub on_change: Option<OnChange>,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            enable_search: true,
            search_threshold: 7,
            auto_focus_search: true,
            wrap_width: WrapWidth::Auto,
            extra_classes: Vec::new(),
            placeholder_as_first_option: false,
            max_selectable: None,
            labels: Labels::default(),
            on_change: None,
        }
    }
}

impl fmt::Debug for SelectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectOptions")
            .field("enable_search", &self.enable_search)
            .field("search_threshold", &self.search_threshold)
            .field("auto_focus_search", &self.auto_focus_search)
            .field("wrap_width", &self.wrap_width)
            .field("extra_classes", &self.extra_classes)
            .field("placeholder_as_first_option", &self.placeholder_as_first_option)
            .field("max_selectable", &self.max_selectable)
            .field("labels", &self.labels)
            .field("on_change", &self.on_change.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl SelectOptions {
    /// Create options with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Load options from a JSON value, which must be an object.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(SelectError::OptionsNotObject {
                found: json_kind(&value),
            });
        }
        let options: Self = serde_json::from_value(value)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a JSON document.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Load options from a TOML document.
    pub fn from_toml(text: &str) -> Result<Self> {
        let options: Self = toml::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    /// Check the options for usage errors.
    pub fn validate(&self) -> Result<()> {
        if self.max_selectable == Some(0) {
            return Err(SelectError::invalid_option(
                "maxSelectable",
                "must be a positive number or false",
            ));
        }
        if let Some(class) = self
            .extra_classes
            .iter()
            .find(|class| class.is_empty() || class.chars().any(char::is_whitespace))
        {
            return Err(SelectError::invalid_option(
                "extraClasses",
                format!("'{class}' is not a single class name"),
            ));
        }
        if let WrapWidth::Fixed(size) = &self.wrap_width
            && size.contains([';', '{', '}'])
        {
            return Err(SelectError::invalid_option(
                "wrapWidth",
                format!("'{size}' is not a CSS size"),
            ));
        }
        Ok(())
    }

    // =========================================================================
    // Builder
    // =========================================================================

    /// Enable or disable the panel search input.
    pub fn with_enable_search(mut self, enable: bool) -> Self {
        self.enable_search = enable;
        self
    }

    /// Set the minimum option count for the search input.
    pub fn with_search_threshold(mut self, threshold: usize) -> Self {
        self.search_threshold = threshold;
        self
    }

    /// Enable or disable search input autofocus.
    pub fn with_auto_focus_search(mut self, auto_focus: bool) -> Self {
        self.auto_focus_search = auto_focus;
        self
    }

    /// Set the wrapper width policy.
    pub fn with_wrap_width(mut self, width: impl Into<WrapWidth>) -> Self {
        self.wrap_width = width.into();
        self
    }

    /// Add an extra class for wrappers and panels.
    pub fn with_extra_class(mut self, class: impl Into<String>) -> Self {
        self.extra_classes.push(class.into());
        self
    }

    /// Inject a placeholder option into unselected single-select controls.
    pub fn with_placeholder_as_first_option(mut self, enable: bool) -> Self {
        self.placeholder_as_first_option = enable;
        self
    }

    /// Set the multi-select limit (`None` for unbounded).
    pub fn with_max_selectable(mut self, max: Option<usize>) -> Self {
        self.max_selectable = max;
        self
    }

    /// Replace the widget texts.
    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// Set the change callback.
    pub fn with_on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&[String], &SelectSource) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(callback));
        self
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// `maxSelectable` is either a positive count or `false`.
mod max_selectable_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Count(i64),
        Flag(bool),
    }

    pub fn serialize<S: Serializer>(value: &Option<usize>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(count) => Repr::Count(*count as i64),
            None => Repr::Flag(false),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<usize>, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Flag(false) => Ok(None),
            Repr::Flag(true) => Err(de::Error::custom(
                "maxSelectable must be a positive number or false",
            )),
            Repr::Count(count) if count >= 1 => Ok(Some(count as usize)),
            Repr::Count(count) => Err(de::Error::custom(format!(
                "maxSelectable must be a positive number or false, got {count}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SelectOptions::default();
        assert!(options.enable_search);
        assert_eq!(options.search_threshold, 7);
        assert!(options.auto_focus_search);
        assert_eq!(options.wrap_width, WrapWidth::Auto);
        assert!(!options.placeholder_as_first_option);
        assert_eq!(options.max_selectable, None);
        assert_eq!(options.labels.multi_placeholder, "Select options ..");
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_from_json_camel_case() {
        let options = SelectOptions::from_json(
            r#"{
                "enableSearch": false,
                "searchThreshold": 2,
                "autoFocusSearch": false,
                "wrapWidth": "inherit",
                "extraClasses": ["a", "b"],
                "placeholderAsFirstOption": true,
                "maxSelectable": 3,
                "labels": ["find", "more", "choose", "nothing"]
            }"#,
        )
        .unwrap();

        assert!(!options.enable_search);
        assert_eq!(options.search_threshold, 2);
        assert!(!options.auto_focus_search);
        assert_eq!(options.wrap_width, WrapWidth::Inherit);
        assert_eq!(options.extra_classes, vec!["a", "b"]);
        assert!(options.placeholder_as_first_option);
        assert_eq!(options.max_selectable, Some(3));
        assert_eq!(options.labels.no_results, "nothing");
    }

    #[test]
    fn test_max_selectable_false_is_unbounded() {
        let options = SelectOptions::from_json(r#"{"maxSelectable": false}"#).unwrap();
        assert_eq!(options.max_selectable, None);
    }

    #[test]
    fn test_max_selectable_rejects_bad_values() {
        for bad in ["true", "0", "-2"] {
            let text = format!(r#"{{"maxSelectable": {bad}}}"#);
            assert!(
                matches!(SelectOptions::from_json(&text), Err(SelectError::Json(_))),
                "{bad} should be rejected"
            );
        }

        let options = SelectOptions::new().with_max_selectable(Some(0));
        assert!(matches!(
            options.validate(),
            Err(SelectError::InvalidOption { .. })
        ));
    }

    #[test]
    fn test_options_must_be_object() {
        let err = SelectOptions::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, SelectError::OptionsNotObject { found: "an array" }));
        assert_eq!(err.to_string(), "Options must be an object, got an array");
    }

    #[test]
    fn test_labels_need_four_entries() {
        assert!(SelectOptions::from_json(r#"{"labels": ["only", "three", "here"]}"#).is_err());
    }

    #[test]
    fn test_from_toml() {
        let options = SelectOptions::from_toml(
            r#"
            searchThreshold = 10
            wrapWidth = "240px"
            maxSelectable = false
            "#,
        )
        .unwrap();

        assert_eq!(options.search_threshold, 10);
        assert_eq!(options.wrap_width, WrapWidth::Fixed("240px".into()));
        assert_eq!(options.max_selectable, None);
    }

    #[test]
    fn test_extra_class_validation() {
        let options = SelectOptions::new().with_extra_class("two words");
        assert!(options.validate().is_err());
        let options = SelectOptions::new().with_extra_class("fine");
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_serialize_roundtrip_keeps_shape() {
        let options = SelectOptions::new()
            .with_max_selectable(Some(4))
            .with_wrap_width("auto");
        let value = serde_json::to_value(&options).unwrap();

        assert_eq!(value["maxSelectable"], 4);
        assert_eq!(value["wrapWidth"], "auto");
        assert_eq!(value["labels"].as_array().map(Vec::len), Some(4));
        assert!(value.get("onChange").is_none());
    }

    #[test]
    fn test_on_change_builder() {
        let options = SelectOptions::new().with_on_change(|_, _| {});
        assert!(options.on_change.is_some());
        assert!(format!("{options:?}").contains("<callback>"));
    }
}
