use crate::error::ResolveError;
use crate::model::RecipeRecord;
use crate::resolver::Resolver;
use log::debug;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Runs resolutions for one display, where a new submission supersedes the
/// one in flight.
pub struct ResolutionSession {
    resolver: Resolver,
    current: Mutex<Option<CancellationToken>>,
}

impl ResolutionSession {
    pub fn new(resolver: Resolver) -> Self {
        ResolutionSession {
            resolver,
            current: Mutex::new(None),
        }
    }

    /// Resolve a dish, cancelling whatever resolution was still running.
    ///
    /// Returns `ResolveError::Superseded` if another `submit` or `cancel`
    /// arrives before this one finishes.
    pub async fn submit(&self, dish: &str) -> Result<RecipeRecord, ResolveError> {
        let token = CancellationToken::new();
        let previous = self
            .current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replace(token.clone());

        if let Some(previous) = previous {
            debug!("Superseding in-flight resolution");
            previous.cancel();
        }

        tokio::select! {
            biased;
            _ = token.cancelled() => Err(ResolveError::Superseded),
            record = self.resolver.resolve(dish) => Ok(record),
        }
    }

    /// Cancel the in-flight resolution, if any.
    pub fn cancel(&self) {
        if let Some(token) = self
            .current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeDatabase, FakeProvider};
    use std::sync::Arc;

    fn session(provider: FakeProvider) -> ResolutionSession {
        ResolutionSession::new(Resolver::new(
            Arc::new(provider),
            Arc::new(FakeDatabase::new()),
        ))
    }

    #[tokio::test]
    async fn test_submit_resolves() {
        let session = session(FakeProvider::new().then_respond("INVALID"));
        let record = session.submit("Keyboard").await.unwrap();
        assert!(record.is_error());
    }

    #[tokio::test]
    async fn test_second_submit_supersedes_first() {
        let provider = FakeProvider::new()
            .then_hang()
            .then_respond("INVALID");
        let session = session(provider);

        let (first, second) = tokio::join!(session.submit("Paella"), async {
            tokio::task::yield_now().await;
            session.submit("Keyboard").await
        });

        assert!(matches!(first, Err(ResolveError::Superseded)));
        assert_eq!(second.unwrap().dish_name, "Keyboard");
    }

    #[tokio::test]
    async fn test_cancel() {
        let session = session(FakeProvider::new().then_hang());

        let (result, _) = tokio::join!(session.submit("Paella"), async {
            tokio::task::yield_now().await;
            session.cancel();
        });

        assert!(matches!(result, Err(ResolveError::Superseded)));
    }
}
