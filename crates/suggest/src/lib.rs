mod error;
mod fetcher;
mod sanitize;
mod sequence;

pub use error::{Result, SuggestError};
pub use fetcher::{CredentialSource, SuggestionClient, SuggestionFetcher, SuggestionItem};
pub use sanitize::{sanitize_text, to_title_case};
pub use sequence::{RequestSequencer, RequestTicket};
