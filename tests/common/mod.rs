// SPDX-License-Identifier: GPL-3.0-only

//! Shared fixtures for the integration tests

#![allow(dead_code)]

use petal::app::notice::{MemoryNoticeStore, NoticeStore};
use petal::app::workflow::{Region, RegionBounds};
use petal::backends::camera::virtual_camera::VirtualCameraBackend;
use futures::FutureExt;
use futures::future::BoxFuture;
use petal::classifier::{HttpReply, RequestBody, Transport};
use petal::errors::TransportError;
use petal::{AppModel, Config, Message, Page};
use std::path::{Path, PathBuf};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A request seen by [`ScriptedTransport`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub body: RequestBody,
}

#[derive(Default)]
struct Script {
    replies: VecDeque<Result<HttpReply, TransportError>>,
    requests: Vec<RecordedRequest>,
}

/// Answers from a queue of canned replies and records every request
///
/// An empty queue fails the request with a network error.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_json(&self, status: u16, body: serde_json::Value) -> &Self {
        self.push(Ok(HttpReply {
            status,
            body: body.to_string().into_bytes(),
        }))
    }

    pub fn push(&self, reply: Result<HttpReply, TransportError>) -> &Self {
        self.script.lock().unwrap().replies.push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.script.lock().unwrap().requests.clone()
    }

    pub fn call_count(&self) -> usize {
        self.script.lock().unwrap().requests.len()
    }
}

impl Transport for ScriptedTransport {
    fn post(
        &self,
        url: String,
        body: RequestBody,
    ) -> BoxFuture<'static, Result<HttpReply, TransportError>> {
        let mut script = self.script.lock().unwrap();
        script.requests.push(RecordedRequest { url, body });
        let reply = script
            .replies
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted reply".to_string())));
        futures::future::ready(reply).boxed()
    }
}

pub struct Harness {
    pub app: AppModel,
    pub transport: ScriptedTransport,
    pub camera: VirtualCameraBackend,
}

impl Harness {
    pub fn new(page: Page) -> Self {
        Self::with_notices(page, Box::new(MemoryNoticeStore::new()))
    }

    pub fn with_notices(page: Page, notices: Box<dyn NoticeStore>) -> Self {
        let config = Config {
            switch_settle_ms: 1,
            ..Config::default()
        };
        let transport = ScriptedTransport::new();
        let camera = VirtualCameraBackend::solid(32, 24, [40, 160, 60]);
        let (app, _) = AppModel::new(
            config,
            Arc::new(camera.clone()),
            Arc::new(transport.clone()),
            notices,
            page,
        );
        Self {
            app,
            transport,
            camera,
        }
    }

    /// Apply a message and run everything it leads to
    pub async fn send(&mut self, message: Message) {
        let task = self.app.update(message);
        self.app.run_until_idle(task).await;
    }

    /// Home page geometry: hero, then classify, then search
    pub fn lay_out_home(&mut self, content_height: u16, viewport_height: u16) {
        self.app.set_layout(
            RegionBounds {
                classify: Some(Region { top: 20, height: 40 }),
                search: Some(Region { top: 60, height: 30 }),
                margin: 0,
            },
            content_height,
            viewport_height,
        );
    }

    pub fn toast_messages(&self) -> Vec<String> {
        self.app
            .toasts
            .history()
            .iter()
            .map(|(message, _)| message.clone())
            .collect()
    }
}

/// Write `size` bytes to `dir/name`
pub fn write_file(dir: &Path, name: &str, size: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, vec![0x42u8; size]).unwrap();
    path
}
