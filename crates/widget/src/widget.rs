use crate::host::{HostPage, PANEL_STYLES};
use crate::navigation::{
    apply_display_mode, reveal_input, CommitOutcome, InputPresentation, NavigationController,
};
use crate::panel::{Key, SuggestionPanel};
use crate::{Result, WidgetError, WidgetSettings};
use assist_protocol::{ConfigAttributes, SearchConfiguration, RESULTS_PATH};
use assist_session::SessionTokenManager;
use assist_suggest::{RequestSequencer, RequestTicket, SuggestionFetcher, SuggestionItem};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Element an event originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Input,
    Row(usize),
    ViewAll,
    /// Collapsed-search icon container.
    Icon,
    /// `#result-page` element.
    ResultPage,
    /// `#search-input` button and legacy search icon classes.
    SearchTrigger,
}

/// Whether the widget consumed a key; `Handled` means prevent the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    Ignored,
}

#[derive(Default)]
pub struct AttachOptions {
    pub settings: WidgetSettings,
    /// When set, a visitor session is established in the background on
    /// attach. Suggestion requests only carry it if the fetcher was built
    /// with credentials.
    pub session: Option<SessionTokenManager>,
}

/// One widget per page, owning the panel and every handler's state.
pub struct SearchWidget {
    host: Arc<dyn HostPage>,
    config: SearchConfiguration,
    settings: WidgetSettings,
    fetcher: SuggestionFetcher,
    sequencer: RequestSequencer,
    navigation: NavigationController,
    panel: Mutex<SuggestionPanel>,
    presentation: Mutex<InputPresentation>,
}

impl SearchWidget {
    /// Attaches to the page's search input.
    ///
    /// Declines on the results page itself and when the input already has a
    /// widget. Styles are installed at most once per page. Must run inside a
    /// Tokio runtime, which also drives the widget's timers.
    pub fn attach(
        host: Arc<dyn HostPage>,
        attributes: &ConfigAttributes,
        fetcher: SuggestionFetcher,
        options: AttachOptions,
    ) -> Result<Arc<Self>> {
        if host.current_path() == RESULTS_PATH {
            return Err(WidgetError::ResultsPage);
        }
        if !host.claim_input() {
            return Err(WidgetError::AlreadyAttached);
        }

        let config = SearchConfiguration::from_attributes(attributes);
        let settings = options.settings;

        host.prepare_input(&settings.placeholder);
        let presentation = apply_display_mode(host.as_ref(), config.display_mode);
        if !host.has_styles(&settings.style_id) {
            host.install_styles(&settings.style_id, PANEL_STYLES);
        }

        if let Some(session) = options.session {
            tokio::spawn(async move {
                if session.get_session_token().await.is_none() {
                    log::warn!("Continuing without a visitor session");
                }
            });
        }

        log::debug!(
            "Search widget attached (mode={:?}, collections={}, fields={})",
            config.display_mode,
            config.selected_collections.len(),
            config.selected_fields.len()
        );

        Ok(Arc::new(Self {
            navigation: NavigationController::new(host.clone(), settings.invalid_highlight),
            host,
            config,
            settings,
            fetcher,
            sequencer: RequestSequencer::new(),
            panel: Mutex::new(SuggestionPanel::new()),
            presentation: Mutex::new(presentation),
        }))
    }

    pub fn presentation(&self) -> InputPresentation {
        *lock(&self.presentation)
    }

    /// Index of the row currently marked selected.
    pub fn focused_row(&self) -> Option<usize> {
        lock(&self.panel).focused()
    }

    pub fn visible_rows(&self) -> usize {
        lock(&self.panel).len()
    }

    /// Input changed. Only the most recent call's response reaches the panel.
    pub async fn on_input(&self, value: &str) {
        let ticket = self.sequencer.issue();
        let query = value.trim();
        if query.is_empty() {
            self.apply_items(ticket, Vec::new());
            return;
        }

        let items = self.fetcher.fetch_suggestions(query, &self.config).await;
        if !self.apply_items(ticket, items) {
            log::debug!("Dropping superseded suggestions for {query:?}");
        }
    }

    /// Rebuilds the panel from `items` unless a newer request was issued.
    /// The ticket is checked under the panel lock.
    fn apply_items(&self, ticket: RequestTicket, items: Vec<SuggestionItem>) -> bool {
        let mut panel = lock(&self.panel);
        if !self.sequencer.is_latest(ticket) {
            return false;
        }
        panel.show(items);
        match panel.view(&self.settings.view_all_label) {
            Some(view) => self.host.render_panel(&view),
            None => self.host.hide_panel(),
        }
        true
    }

    pub fn on_key(&self, target: Target, key: Key) -> KeyOutcome {
        match target {
            Target::Input => self.on_input_key(key),
            Target::Row(index) => self.on_row_key(index, key),
            _ => KeyOutcome::Ignored,
        }
    }

    fn on_input_key(&self, key: Key) -> KeyOutcome {
        if !matches!(key, Key::ArrowDown | Key::Tab) {
            return KeyOutcome::Ignored;
        }
        let first = lock(&self.panel).focus_first();
        match first {
            Some(index) => {
                self.move_focus(index);
                KeyOutcome::Handled
            }
            None => KeyOutcome::Ignored,
        }
    }

    fn on_row_key(&self, index: usize, key: Key) -> KeyOutcome {
        let mut panel = lock(&self.panel);
        let Some(item) = panel.item(index).cloned() else {
            return KeyOutcome::Ignored;
        };
        match key {
            Key::Enter | Key::Space => {
                drop(panel);
                self.navigate_to(&item);
                KeyOutcome::Handled
            }
            Key::ArrowDown | Key::ArrowUp => {
                // Keys are only delivered to the row holding focus.
                panel.focus(index);
                let next = if key == Key::ArrowDown {
                    panel.focus_next()
                } else {
                    panel.focus_previous()
                };
                drop(panel);
                if let Some(next) = next {
                    self.move_focus(next);
                }
                KeyOutcome::Handled
            }
            Key::Escape => {
                panel.hide();
                drop(panel);
                self.host.hide_panel();
                self.host.focus_input();
                KeyOutcome::Handled
            }
            Key::Tab | Key::Other => KeyOutcome::Ignored,
        }
    }

    /// Marks `index` selected, then hands it keyboard focus.
    fn move_focus(&self, index: usize) {
        self.host.set_selected_row(Some(index));
        self.host.focus_row(index);
    }

    /// A row received focus by any means (keyboard or pointer).
    pub fn on_row_focus(&self, index: usize) {
        let mut panel = lock(&self.panel);
        if panel.focused() == Some(index) {
            return;
        }
        if panel.focus(index).is_some() {
            drop(panel);
            self.host.set_selected_row(Some(index));
        }
    }

    /// A row lost focus. The mark is cleared unless focus moved to another row.
    pub fn on_row_blur(&self, index: usize) {
        if lock(&self.panel).blur(index) {
            self.host.set_selected_row(None);
        }
    }

    pub fn on_click(&self, target: Target) -> Option<CommitOutcome> {
        match target {
            Target::Row(index) => {
                let item = lock(&self.panel).item(index).cloned()?;
                self.navigate_to(&item);
                Some(CommitOutcome::Navigated(item.target))
            }
            Target::Icon if self.presentation() == InputPresentation::Collapsed => {
                *lock(&self.presentation) = reveal_input(self.host.as_ref());
                None
            }
            Target::ViewAll | Target::ResultPage | Target::SearchTrigger | Target::Icon => {
                Some(self.commit_current())
            }
            Target::Input => None,
        }
    }

    /// Commits whatever the input currently holds.
    pub fn commit_current(&self) -> CommitOutcome {
        self.commit(&self.host.input_value())
    }

    pub fn commit(&self, query: &str) -> CommitOutcome {
        self.navigation.commit(query)
    }

    fn navigate_to(&self, item: &SuggestionItem) {
        log::debug!("Navigating to suggestion {:?}", item.text);
        self.host.navigate(&item.target);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
