mod client;
mod response;

pub use client::DictionaryApiClient;
pub use response::parse_entries;

use tokio_util::sync::CancellationToken;
use wordpeek_core::{LookupResult, LookupToken};

/// Definition lookup interface
#[async_trait::async_trait]
pub trait DefinitionClient: Send + Sync {
    /// Look up `token`.
    ///
    /// Returns [`LookupResult::Cancelled`] once `cancel` fires, even if a
    /// response was already on its way.
    async fn lookup(&self, token: &LookupToken, cancel: CancellationToken) -> LookupResult;
}
