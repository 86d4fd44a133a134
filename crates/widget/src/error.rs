use thiserror::Error;

pub type Result<T> = std::result::Result<T, WidgetError>;

/// Reasons the widget declines to attach. Neither is fatal to the page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    #[error("Current page is the results page")]
    ResultsPage,

    #[error("Search input already has a widget attached")]
    AlreadyAttached,
}
