//! Port definitions for the completion relay
//!
//! The HTTP layer depends on this trait rather than on the concrete relay,
//! so handler tests can substitute a mock upstream.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::{error::RelayError, request::CompletionRequest};

/// Ordered stream of text fragments from one live session
///
/// Ends after yielding at most one `Err`; dropping it releases the upstream
/// connection.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<String, RelayError>> + Send>>;

/// Port for completion relay implementations
#[async_trait]
pub trait CompletionPort: Send + Sync {
    /// Run one buffered session, returning the aggregated answer
    async fn collect(&self, request: CompletionRequest) -> Result<String, RelayError>;

    /// Run one live session, returning fragments in decode order
    async fn stream(&self, request: CompletionRequest) -> Result<DeltaStream, RelayError>;
}
