use std::time::Duration;

/// Fixed presentation settings of a widget instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetSettings {
    pub placeholder: String,
    pub view_all_label: String,
    /// How long the invalid-input treatment stays on after an empty commit.
    pub invalid_highlight: Duration,
    /// Id under which the panel stylesheet is registered.
    pub style_id: String,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            placeholder: "Search here".to_string(),
            view_all_label: "View All".to_string(),
            invalid_highlight: Duration::from_secs(2),
            style_id: "search-assist-styles".to_string(),
        }
    }
}
