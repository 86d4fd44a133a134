use serde::Serialize;

/// The host page as seen by the widget. Implementations own the actual
/// elements; the widget only decides what they should show.
///
/// All calls happen from the page's event loop. Methods take `&self` so one
/// host can be shared between the widget and the revert timer.
pub trait HostPage: Send + Sync {
    /// Path of the current page, e.g. `/products`.
    fn current_path(&self) -> String;

    /// Marks the search input as owned by a widget. Returns `false` when a
    /// widget already claimed it.
    fn claim_input(&self) -> bool;

    /// Current value of the search input.
    fn input_value(&self) -> String;

    fn prepare_input(&self, placeholder: &str);
    fn set_input_visible(&self, visible: bool);
    fn focus_input(&self);

    /// Toggles the invalid-input treatment (border, shadow, background).
    fn set_invalid_input(&self, invalid: bool);

    /// Whether the page has the collapsed-search icon container.
    fn has_icon(&self) -> bool;
    fn set_icon_visible(&self, visible: bool);

    fn has_styles(&self, id: &str) -> bool;
    fn install_styles(&self, id: &str, css: &str);

    /// Replaces the panel contents and shows it below the input.
    fn render_panel(&self, view: &PanelView);
    /// Hides the panel and drops its contents.
    fn hide_panel(&self);

    /// Moves keyboard focus to a row and scrolls it into view.
    fn focus_row(&self, index: usize);
    /// Marks exactly `selected` as the active row, or none. Applied as one
    /// update so two rows are never marked at once.
    fn set_selected_row(&self, selected: Option<usize>);

    fn navigate(&self, url: &str);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub display: String,
    pub target: String,
    pub selected: bool,
}

/// Rendered panel: one row per suggestion followed by the "View All" entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelView {
    pub rows: Vec<RowView>,
    pub view_all_label: String,
}

pub const PANEL_STYLES: &str = r#"
.searchsuggestionbox {
    position: absolute;
    top: 100%;
    left: 0;
    width: 100%;
    max-height: 200px;
    overflow-y: auto;
    background: white;
    border: 1px solid #ccc;
    box-shadow: 0 4px 8px rgba(0, 0, 0, 0.1);
    z-index: 1000;
    display: none;
}
.searchsuggestionbox .suggestion-item {
    padding: 8px;
    cursor: pointer;
    font-size: 12px;
    line-height: 1.4;
    border: 1px solid transparent;
}
.searchsuggestionbox .suggestion-item:hover {
    background-color: #f3f8ff;
}
.searchsuggestionbox .suggestion-item[aria-selected="true"] {
    outline: none;
    background-color: #eaf2ff;
    border-color: #bcd6ff;
    box-shadow: 0 0 0 2px rgba(13, 110, 253, 0.15);
}
.searchsuggestionbox .view-all-link {
    padding: 10px;
    text-align: center;
    font-weight: bold;
    color: #0073e6;
    cursor: pointer;
    border-top: 1px solid #eee;
    background: #fafafa;
}
"#;
