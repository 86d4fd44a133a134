use crate::host::{PanelView, RowView};
use assist_suggest::SuggestionItem;

/// Keys the widget reacts to; everything else is left to the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Tab,
    Enter,
    Space,
    Escape,
    Other,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_dom(name: &str) -> Self {
        match name {
            "ArrowDown" | "Down" => Self::ArrowDown,
            "ArrowUp" | "Up" => Self::ArrowUp,
            "Tab" => Self::Tab,
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            "Escape" | "Esc" => Self::Escape,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PanelState {
    #[default]
    Hidden,
    Showing {
        items: Vec<SuggestionItem>,
        /// Row holding keyboard focus. A single index, so at most one row is
        /// ever marked selected.
        focused: Option<usize>,
    },
}

/// Suggestion list model. Rebuilt from scratch on every response; rows are
/// addressed by index so nothing survives a rebuild.
#[derive(Debug, Default)]
pub struct SuggestionPanel {
    state: PanelState,
}

impl SuggestionPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn len(&self) -> usize {
        match &self.state {
            PanelState::Showing { items, .. } => items.len(),
            PanelState::Hidden => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn focused(&self) -> Option<usize> {
        match &self.state {
            PanelState::Showing { focused, .. } => *focused,
            PanelState::Hidden => None,
        }
    }

    pub fn item(&self, index: usize) -> Option<&SuggestionItem> {
        match &self.state {
            PanelState::Showing { items, .. } => items.get(index),
            PanelState::Hidden => None,
        }
    }

    /// Replaces the contents. An empty list hides the panel.
    pub fn show(&mut self, items: Vec<SuggestionItem>) {
        self.state = if items.is_empty() {
            PanelState::Hidden
        } else {
            PanelState::Showing {
                items,
                focused: None,
            }
        };
    }

    pub fn hide(&mut self) {
        self.state = PanelState::Hidden;
    }

    /// Focuses `index` if it names a row. Returns the focused row.
    pub fn focus(&mut self, index: usize) -> Option<usize> {
        match &mut self.state {
            PanelState::Showing { items, focused } if index < items.len() => {
                *focused = Some(index);
                *focused
            }
            _ => None,
        }
    }

    pub fn focus_first(&mut self) -> Option<usize> {
        self.focus(0)
    }

    /// Next row, wrapping from the last to the first.
    pub fn focus_next(&mut self) -> Option<usize> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        let next = match self.focused() {
            Some(current) => (current + 1) % len,
            None => 0,
        };
        self.focus(next)
    }

    /// Previous row, wrapping from the first to the last.
    pub fn focus_previous(&mut self) -> Option<usize> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        let previous = match self.focused() {
            Some(0) | None => len - 1,
            Some(current) => current - 1,
        };
        self.focus(previous)
    }

    /// Focus left `index`. Clears the mark unless focus already moved on.
    /// Returns true when the mark changed.
    pub fn blur(&mut self, index: usize) -> bool {
        match &mut self.state {
            PanelState::Showing { focused, .. } if *focused == Some(index) => {
                *focused = None;
                true
            }
            _ => false,
        }
    }

    pub fn view(&self, view_all_label: &str) -> Option<PanelView> {
        let PanelState::Showing { items, focused } = &self.state else {
            return None;
        };
        let rows = items
            .iter()
            .enumerate()
            .map(|(idx, item)| RowView {
                display: item.display.clone(),
                target: item.target.clone(),
                selected: *focused == Some(idx),
            })
            .collect();
        Some(PanelView {
            rows,
            view_all_label: view_all_label.to_string(),
        })
    }
}
