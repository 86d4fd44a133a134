use crate::host::HostPage;
use assist_protocol::{results_url, DisplayMode};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Browser sent to the results page at this URL.
    Navigated(String),
    /// Empty query; the input was flagged instead.
    Rejected,
}

/// Validates committed queries and redirects to the results page.
pub struct NavigationController {
    host: Arc<dyn HostPage>,
    highlight: Duration,
    pending_revert: Mutex<Option<JoinHandle<()>>>,
}

impl NavigationController {
    pub fn new(host: Arc<dyn HostPage>, highlight: Duration) -> Self {
        Self {
            host,
            highlight,
            pending_revert: Mutex::new(None),
        }
    }

    /// Navigates to the results page for the trimmed `query`. An empty query
    /// flags the input for the highlight window and re-focuses it instead.
    ///
    /// Must be called from within a Tokio runtime; the revert runs as a task.
    pub fn commit(&self, query: &str) -> CommitOutcome {
        let query = query.trim();
        if query.is_empty() {
            self.flag_invalid_input();
            return CommitOutcome::Rejected;
        }

        let url = results_url(query);
        log::debug!("Navigating to {url}");
        self.host.navigate(&url);
        CommitOutcome::Navigated(url)
    }

    fn flag_invalid_input(&self) {
        self.host.set_invalid_input(true);
        self.host.focus_input();

        let host = Arc::clone(&self.host);
        let window = self.highlight;
        let revert = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            host.set_invalid_input(false);
        });

        // A new rejection restarts the window.
        let mut slot = self
            .pending_revert
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.replace(revert) {
            previous.abort();
        }
    }
}

/// Presentation of the input after attach, and whether the icon still has to
/// be activated before the input is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPresentation {
    Collapsed,
    Revealed,
}

/// Applies the configured display mode. Falls back to an expanded input
/// when Icon mode is requested but the page has no icon container.
pub fn apply_display_mode(host: &dyn HostPage, mode: DisplayMode) -> InputPresentation {
    match mode {
        DisplayMode::Icon if host.has_icon() => {
            host.set_input_visible(false);
            host.set_icon_visible(true);
            InputPresentation::Collapsed
        }
        DisplayMode::Icon => {
            log::error!("Search icon container not found; showing the input instead");
            host.set_input_visible(true);
            InputPresentation::Revealed
        }
        DisplayMode::Expanded => {
            host.set_input_visible(true);
            if host.has_icon() {
                host.set_icon_visible(false);
            }
            InputPresentation::Revealed
        }
    }
}

/// Icon activation: shows and focuses the input and hides the icon. There is
/// no way back to the collapsed state.
pub fn reveal_input(host: &dyn HostPage) -> InputPresentation {
    host.set_input_visible(true);
    host.set_icon_visible(false);
    host.focus_input();
    InputPresentation::Revealed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{Focus, HeadlessHost, HostEvent};
    use pretty_assertions::assert_eq;

    fn controller() -> (Arc<HeadlessHost>, NavigationController) {
        let host = Arc::new(HeadlessHost::new("/", true));
        let nav = NavigationController::new(host.clone(), Duration::from_secs(2));
        (host, nav)
    }

    #[tokio::test]
    async fn commits_trimmed_query() {
        let (host, nav) = controller();
        let outcome = nav.commit("  hello world ");
        assert_eq!(
            outcome,
            CommitOutcome::Navigated("/search-app-results?q=hello%20world".to_string())
        );
        assert_eq!(
            host.snapshot().navigated_to.as_deref(),
            Some("/search-app-results?q=hello%20world")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn empty_commit_flags_input_for_two_seconds() {
        let (host, nav) = controller();
        assert_eq!(nav.commit("   "), CommitOutcome::Rejected);

        let snap = host.snapshot();
        assert_eq!(snap.navigated_to, None);
        assert!(snap.invalid_input);
        assert_eq!(snap.focus, Focus::Input);

        tokio::time::sleep(Duration::from_millis(1_999)).await;
        assert!(host.snapshot().invalid_input);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(!host.snapshot().invalid_input);
        assert_eq!(host.snapshot().navigated_to, None);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_rejection_restarts_window() {
        let (host, nav) = controller();
        nav.commit("");
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        nav.commit("");

        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert!(host.snapshot().invalid_input);

        tokio::time::sleep(Duration::from_millis(1_001)).await;
        let reverts = host
            .take_events()
            .into_iter()
            .filter(|e| *e == HostEvent::InvalidInput { invalid: false })
            .count();
        assert_eq!(reverts, 1);
        assert!(!host.snapshot().invalid_input);
    }

    #[test]
    fn icon_mode_collapses_input() {
        let host = HeadlessHost::new("/", true);
        assert_eq!(
            apply_display_mode(&host, DisplayMode::Icon),
            InputPresentation::Collapsed
        );
        let snap = host.snapshot();
        assert!(!snap.input_visible);
        assert!(snap.icon_visible);

        assert_eq!(reveal_input(&host), InputPresentation::Revealed);
        let snap = host.snapshot();
        assert!(snap.input_visible);
        assert!(!snap.icon_visible);
        assert_eq!(snap.focus, Focus::Input);
    }

    #[test]
    fn icon_mode_without_icon_falls_back_to_expanded() {
        let host = HeadlessHost::new("/", false);
        assert_eq!(
            apply_display_mode(&host, DisplayMode::Icon),
            InputPresentation::Revealed
        );
        assert!(host.snapshot().input_visible);
    }

    #[test]
    fn expanded_mode_hides_icon() {
        let host = HeadlessHost::new("/", true);
        assert_eq!(
            apply_display_mode(&host, DisplayMode::Expanded),
            InputPresentation::Revealed
        );
        let snap = host.snapshot();
        assert!(snap.input_visible);
        assert!(!snap.icon_visible);
    }
}
