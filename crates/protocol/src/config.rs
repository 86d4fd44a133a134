use serde::{Deserialize, Serialize};

/// How the search input is presented when the widget attaches.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayMode {
    /// Input hidden behind a clickable icon until activated.
    Icon,
    #[default]
    Expanded,
}

impl DisplayMode {
    /// `"Icon"` selects [`DisplayMode::Icon`]; anything else, including a
    /// missing attribute, is [`DisplayMode::Expanded`].
    pub fn from_attribute(raw: Option<&str>) -> Self {
        match raw {
            Some("Icon") => Self::Icon,
            _ => Self::Expanded,
        }
    }
}

/// Raw attribute values of the page's configuration element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigAttributes {
    /// `data-search-bar`
    pub search_bar: Option<String>,
    /// `data-selected-collections`
    pub selected_collections: Option<String>,
    /// `data-selected-fields-search`
    pub selected_fields_search: Option<String>,
}

/// Search configuration read once per page load.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfiguration {
    pub display_mode: DisplayMode,
    pub selected_collections: Vec<String>,
    pub selected_fields: Vec<String>,
}

impl SearchConfiguration {
    /// Parse the configuration element's attributes.
    ///
    /// Missing attributes fall back to Expanded mode and empty selections.
    /// An array attribute that is not a JSON array of strings is logged and
    /// treated as empty; it never prevents the widget from attaching.
    pub fn from_attributes(attrs: &ConfigAttributes) -> Self {
        Self {
            display_mode: DisplayMode::from_attribute(attrs.search_bar.as_deref()),
            selected_collections: parse_string_array(
                "data-selected-collections",
                attrs.selected_collections.as_deref(),
            ),
            selected_fields: parse_string_array(
                "data-selected-fields-search",
                attrs.selected_fields_search.as_deref(),
            ),
        }
    }
}

fn parse_string_array(attribute: &str, raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(values) => values,
        Err(err) => {
            log::warn!("Ignoring malformed {attribute} attribute {raw:?}: {err}");
            Vec::new()
        }
    }
}
