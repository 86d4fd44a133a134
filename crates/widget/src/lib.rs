//! # Assist Widget
//!
//! The interactive part of the search assist widget: a suggestion panel with
//! roving keyboard focus, the navigation controller that commits queries to
//! the results page, and the widget instance tying them to a host page.
//!
//! ## Flow
//!
//! ```text
//! input event ──> SuggestionFetcher ──> SuggestionPanel ──> HostPage::render_panel
//!                      (ticketed)           │
//! key / click ─────────────────────────────┴──> NavigationController ──> HostPage::navigate
//! ```
//!
//! The page itself is behind [`HostPage`]; [`HeadlessHost`] implements it in
//! memory.

mod error;
mod headless;
mod host;
mod navigation;
mod panel;
mod settings;
mod widget;

pub use error::{Result, WidgetError};
pub use headless::{Focus, HeadlessHost, HeadlessSnapshot, HostEvent};
pub use host::{HostPage, PanelView, RowView, PANEL_STYLES};
pub use navigation::{
    apply_display_mode, reveal_input, CommitOutcome, InputPresentation, NavigationController,
};
pub use panel::{Key, PanelState, SuggestionPanel};
pub use settings::WidgetSettings;
pub use widget::{AttachOptions, KeyOutcome, SearchWidget, Target};
