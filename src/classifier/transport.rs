// SPDX-License-Identifier: GPL-3.0-only

//! HTTP seam of the classifier client
//!
//! [`Transport`] is the only place that touches the network. The client and
//! the search client build a [`RequestBody`] and interpret the [`HttpReply`];
//! tests swap in a scripted implementation.

use crate::errors::TransportError;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::sync::Arc;
use tracing::{debug, warn};

/// Body of a POST request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// `multipart/form-data` with a single file part
    Multipart {
        field: &'static str,
        file_name: String,
        media_type: String,
        bytes: Arc<[u8]>,
    },
    /// `application/json`
    Json(serde_json::Value),
}

/// Raw response: status code and body bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs POST requests
///
/// No timeout is imposed on the call; the caller decides whether a late
/// result is still wanted.
pub trait Transport: Send + Sync {
    fn post(
        &self,
        url: String,
        body: RequestBody,
    ) -> BoxFuture<'static, Result<HttpReply, TransportError>>;
}

/// Transport backed by a shared `reqwest::Client`
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post(
        &self,
        url: String,
        body: RequestBody,
    ) -> BoxFuture<'static, Result<HttpReply, TransportError>> {
        let client = self.client.clone();
        async move {
            let request = client.post(&url);
            let request = match body {
                RequestBody::Multipart {
                    field,
                    file_name,
                    media_type,
                    bytes,
                } => {
                    let part = reqwest::multipart::Part::bytes(bytes.to_vec())
                        .file_name(file_name)
                        .mime_str(&media_type)
                        .map_err(|e| TransportError::Network(e.to_string()))?;
                    request.multipart(reqwest::multipart::Form::new().part(field, part))
                }
                RequestBody::Json(value) => request.json(&value),
            };

            debug!(url = %url, "POST");
            let response = request.send().await.map_err(|e| {
                warn!(url = %url, error = %e, "Request failed");
                TransportError::Network(e.to_string())
            })?;

            let status = response.status().as_u16();
            let body = response
                .bytes()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?
                .to_vec();
            debug!(url = %url, status, size = body.len(), "Response received");
            Ok(HttpReply { status, body })
        }
        .boxed()
    }
}

/// In-memory transport for unit tests
#[cfg(test)]
pub(crate) mod scripted {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// A request observed by [`ScriptedTransport`]
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedRequest {
        pub url: String,
        pub body: RequestBody,
    }

    #[derive(Default)]
    struct Script {
        replies: VecDeque<Result<HttpReply, TransportError>>,
        requests: Vec<RecordedRequest>,
    }

    /// In-memory transport that answers from a queue of canned replies
    ///
    /// Every request is recorded. When the queue runs dry the request fails with
    /// a network error.
    #[derive(Clone, Default)]
    pub struct ScriptedTransport {
        script: Arc<Mutex<Script>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a reply with the given status and JSON body
        pub fn reply_json(&self, status: u16, body: serde_json::Value) -> &Self {
            self.push(Ok(HttpReply {
                status,
                body: body.to_string().into_bytes(),
            }))
        }

        /// Queue a raw reply or failure
        pub fn push(&self, reply: Result<HttpReply, TransportError>) -> &Self {
            if let Ok(mut script) = self.script.lock() {
                script.replies.push_back(reply);
            }
            self
        }

        /// Requests seen so far
        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.script
                .lock()
                .map(|script| script.requests.clone())
                .unwrap_or_default()
        }

        pub fn call_count(&self) -> usize {
            self.script
                .lock()
                .map(|script| script.requests.len())
                .unwrap_or_default()
        }
    }

    impl Transport for ScriptedTransport {
        fn post(
            &self,
            url: String,
            body: RequestBody,
        ) -> BoxFuture<'static, Result<HttpReply, TransportError>> {
            let reply = match self.script.lock() {
                Ok(mut script) => {
                    script.requests.push(RecordedRequest { url, body });
                    script.replies.pop_front()
                }
                Err(_) => None,
            };
            let reply = reply
                .unwrap_or_else(|| Err(TransportError::Network("no scripted reply".to_string())));
            futures::future::ready(reply).boxed()
        }
    }
}
