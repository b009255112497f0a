// SPDX-License-Identifier: GPL-3.0-only

//! Keyword search against `/api/search`

use super::response::SearchPayload;
use super::transport::{RequestBody, Transport};
use crate::config::Config;
use crate::constants::endpoints;
use crate::errors::{ClientError, TransportError, ValidationError};
use std::sync::Arc;
use tracing::{debug, info};

pub struct SearchClient {
    transport: Arc<dyn Transport>,
    url: String,
}

impl SearchClient {
    pub fn new(transport: Arc<dyn Transport>, config: &Config) -> Self {
        Self {
            transport,
            url: config.endpoint(endpoints::SEARCH),
        }
    }

    /// Prepare a search; the query is trimmed and must not be empty
    pub fn begin(&self, query: &str) -> Result<PendingSearch, ValidationError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        Ok(PendingSearch {
            transport: Arc::clone(&self.transport),
            url: self.url.clone(),
            query: query.to_string(),
        })
    }
}

pub struct PendingSearch {
    transport: Arc<dyn Transport>,
    url: String,
    query: String,
}

impl PendingSearch {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub async fn send(self) -> Result<SearchPayload, ClientError> {
        info!(query = %self.query, "Searching");
        let body = RequestBody::Json(serde_json::json!({ "query": self.query }));
        let reply = self.transport.post(self.url, body).await?;
        if !reply.is_success() {
            return Err(TransportError::Status(reply.status).into());
        }
        let payload: SearchPayload = serde_json::from_slice(&reply.body)
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        debug!(results = payload.results.len(), count = ?payload.count, "Search response parsed");
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ScriptedTransport;
    use serde_json::json;

    #[test]
    fn test_blank_query_rejected_locally() {
        let transport = ScriptedTransport::new();
        let client = SearchClient::new(Arc::new(transport.clone()), &Config::default());
        assert!(matches!(client.begin("   "), Err(ValidationError::EmptyQuery)));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_query_is_trimmed() {
        let transport = ScriptedTransport::new();
        transport.reply_json(200, json!({"success": true, "count": 0, "results": []}));
        let client = SearchClient::new(Arc::new(transport.clone()), &Config::default());

        let payload = client.begin("  mawar ").unwrap().send().await.unwrap();
        assert!(payload.results.is_empty());
        assert_eq!(
            transport.requests()[0].body,
            RequestBody::Json(json!({"query": "mawar"}))
        );
    }
}
