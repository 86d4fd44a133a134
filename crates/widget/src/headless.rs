use crate::host::{HostPage, PanelView};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Something the widget asked the page to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    PrepareInput { placeholder: String },
    InputVisible { visible: bool },
    IconVisible { visible: bool },
    FocusInput,
    InvalidInput { invalid: bool },
    InstallStyles { id: String },
    RenderPanel { rows: Vec<String> },
    HidePanel,
    FocusRow { index: usize },
    SelectRow { index: Option<usize> },
    Navigate { url: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Focus {
    #[default]
    Nowhere,
    Input,
    Row(usize),
}

/// Page state as the widget left it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeadlessSnapshot {
    pub input_value: String,
    pub input_visible: bool,
    pub icon_visible: bool,
    pub invalid_input: bool,
    pub focus: Focus,
    pub panel: Option<PanelView>,
    pub selected_row: Option<usize>,
    pub navigated_to: Option<String>,
    pub events: Vec<HostEvent>,
}

#[derive(Debug, Default)]
struct HeadlessState {
    claimed: bool,
    styles: BTreeSet<String>,
    snapshot: HeadlessSnapshot,
}

/// In-memory page with no DOM behind it. Records every request the widget
/// makes; used to drive the widget from the command line and in tests.
#[derive(Debug)]
pub struct HeadlessHost {
    path: String,
    has_icon: bool,
    state: Mutex<HeadlessState>,
}

impl HeadlessHost {
    pub fn new(path: impl Into<String>, has_icon: bool) -> Self {
        Self {
            path: path.into(),
            has_icon,
            state: Mutex::new(HeadlessState {
                snapshot: HeadlessSnapshot {
                    input_visible: true,
                    icon_visible: has_icon,
                    ..HeadlessSnapshot::default()
                },
                ..HeadlessState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HeadlessState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, event: HostEvent) {
        self.lock().snapshot.events.push(event);
    }

    /// Simulates typing: replaces the input value.
    pub fn set_input_value(&self, value: &str) {
        self.lock().snapshot.input_value = value.to_string();
    }

    pub fn snapshot(&self) -> HeadlessSnapshot {
        self.lock().snapshot.clone()
    }

    pub fn take_events(&self) -> Vec<HostEvent> {
        std::mem::take(&mut self.lock().snapshot.events)
    }
}

impl HostPage for HeadlessHost {
    fn current_path(&self) -> String {
        self.path.clone()
    }

    fn claim_input(&self) -> bool {
        let mut state = self.lock();
        !std::mem::replace(&mut state.claimed, true)
    }

    fn input_value(&self) -> String {
        self.lock().snapshot.input_value.clone()
    }

    fn prepare_input(&self, placeholder: &str) {
        self.record(HostEvent::PrepareInput {
            placeholder: placeholder.to_string(),
        });
    }

    fn set_input_visible(&self, visible: bool) {
        self.lock().snapshot.input_visible = visible;
        self.record(HostEvent::InputVisible { visible });
    }

    fn focus_input(&self) {
        self.lock().snapshot.focus = Focus::Input;
        self.record(HostEvent::FocusInput);
    }

    fn set_invalid_input(&self, invalid: bool) {
        self.lock().snapshot.invalid_input = invalid;
        self.record(HostEvent::InvalidInput { invalid });
    }

    fn has_icon(&self) -> bool {
        self.has_icon
    }

    fn set_icon_visible(&self, visible: bool) {
        self.lock().snapshot.icon_visible = visible;
        self.record(HostEvent::IconVisible { visible });
    }

    fn has_styles(&self, id: &str) -> bool {
        self.lock().styles.contains(id)
    }

    fn install_styles(&self, id: &str, _css: &str) {
        self.lock().styles.insert(id.to_string());
        self.record(HostEvent::InstallStyles { id: id.to_string() });
    }

    fn render_panel(&self, view: &PanelView) {
        let mut state = self.lock();
        state.snapshot.panel = Some(view.clone());
        state.snapshot.selected_row = view.rows.iter().position(|r| r.selected);
        state.snapshot.events.push(HostEvent::RenderPanel {
            rows: view.rows.iter().map(|r| r.display.clone()).collect(),
        });
    }

    fn hide_panel(&self) {
        let mut state = self.lock();
        state.snapshot.panel = None;
        state.snapshot.selected_row = None;
        if let Focus::Row(_) = state.snapshot.focus {
            state.snapshot.focus = Focus::Nowhere;
        }
        state.snapshot.events.push(HostEvent::HidePanel);
    }

    fn focus_row(&self, index: usize) {
        self.lock().snapshot.focus = Focus::Row(index);
        self.record(HostEvent::FocusRow { index });
    }

    fn set_selected_row(&self, selected: Option<usize>) {
        let mut state = self.lock();
        state.snapshot.selected_row = selected;
        if let Some(panel) = state.snapshot.panel.as_mut() {
            for (idx, row) in panel.rows.iter_mut().enumerate() {
                row.selected = selected == Some(idx);
            }
        }
        state.snapshot.events.push(HostEvent::SelectRow { index: selected });
    }

    fn navigate(&self, url: &str) {
        self.lock().snapshot.navigated_to = Some(url.to_string());
        self.record(HostEvent::Navigate {
            url: url.to_string(),
        });
    }
}
