//! Fetch client abstraction over the market-data REST API

use crate::error::ProviderError;
use async_trait::async_trait;
use serde_json::Value;

/// Trait for market-data fetch clients
///
/// A fetch client issues one GET for an endpoint path (e.g.
/// `/coins/markets?vs_currency=usd`), attaches whatever credentials the
/// backend needs and returns the decoded JSON body. It does not retry; see
/// [`crate::retry`] for that.
#[async_trait]
pub trait FetchClient: Send + Sync {
    /// Performs a single GET request for `endpoint`
    ///
    /// # Arguments
    /// * `endpoint` - Path relative to the API base, optionally with a query
    ///
    /// # Returns
    /// The JSON body, or a typed error carrying the HTTP status on failure
    async fn get_json(&self, endpoint: &str) -> Result<Value, ProviderError>;

    /// Returns the name of this client's backend
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::time::Duration;

    type Scripted = Result<Value, ProviderError>;

    /// Mock fetch client for testing
    ///
    /// Responses are scripted per endpoint and consumed in order; the last
    /// scripted response for an endpoint is repeated once the queue drains.
    #[derive(Default)]
    pub struct MockClient {
        responses: Mutex<HashMap<String, VecDeque<Scripted>>>,
        calls: Mutex<Vec<String>>,
        delays: Mutex<HashMap<String, Duration>>,
    }

    impl MockClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_ok(&self, endpoint: &str, body: Value) {
            self.push(endpoint, Ok(body));
        }

        pub fn push_err(&self, endpoint: &str, error: ProviderError) {
            self.push(endpoint, Err(error));
        }

        /// Makes every call to `endpoint` wait before answering
        pub fn set_delay(&self, endpoint: &str, delay: Duration) {
            self.delays
                .lock()
                .unwrap()
                .insert(endpoint.to_string(), delay);
        }

        fn push(&self, endpoint: &str, response: Scripted) {
            self.responses
                .lock()
                .unwrap()
                .entry(endpoint.to_string())
                .or_default()
                .push_back(response);
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn next_response(&self, endpoint: &str) -> Scripted {
            let mut responses = self.responses.lock().unwrap();
            let Some(queue) = responses.get_mut(endpoint) else {
                return Err(ProviderError::from_status(404, endpoint));
            };
            let response = if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().map(clone_scripted)
            };
            response.unwrap_or_else(|| Err(ProviderError::from_status(404, endpoint)))
        }
    }

    // reqwest::Error cannot be cloned, so transport errors degrade to Timeout
    fn clone_scripted(response: &Scripted) -> Scripted {
        match response {
            Ok(v) => Ok(v.clone()),
            Err(ProviderError::Network(_)) | Err(ProviderError::Timeout) => {
                Err(ProviderError::Timeout)
            }
            Err(ProviderError::BadRequest { body }) => {
                Err(ProviderError::BadRequest { body: body.clone() })
            }
            Err(ProviderError::NotFound { body }) => {
                Err(ProviderError::NotFound { body: body.clone() })
            }
            Err(ProviderError::RateLimited) => Err(ProviderError::RateLimited),
            Err(ProviderError::Http { status, body }) => Err(ProviderError::Http {
                status: *status,
                body: body.clone(),
            }),
            Err(ProviderError::InvalidResponse(s)) => Err(ProviderError::InvalidResponse(s.clone())),
        }
    }

    #[async_trait]
    impl FetchClient for MockClient {
        async fn get_json(&self, endpoint: &str) -> Result<Value, ProviderError> {
            self.calls.lock().unwrap().push(endpoint.to_string());
            let delay = self.delays.lock().unwrap().get(endpoint).copied();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            self.next_response(endpoint)
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }
}
