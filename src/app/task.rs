// SPDX-License-Identifier: GPL-3.0-only

//! Deferred work returned from `update`
//!
//! A task is a set of futures that each resolve to one message. The front
//! end polls them on its single-threaded runtime and feeds the resulting
//! messages back into `update`.

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use std::future::Future;

#[must_use = "tasks do nothing unless they are run"]
pub struct Task<M> {
    futures: Vec<LocalBoxFuture<'static, M>>,
}

impl<M: 'static> Task<M> {
    pub fn none() -> Self {
        Self {
            futures: Vec::new(),
        }
    }

    /// A task that immediately yields `message`
    pub fn done(message: M) -> Self {
        Self::perform(async move { message }, |m| m)
    }

    /// Run `future` and map its output to a message
    pub fn perform<T, F>(future: F, map: impl FnOnce(T) -> M + 'static) -> Self
    where
        F: Future<Output = T> + 'static,
    {
        Self {
            futures: vec![future.map(map).boxed_local()],
        }
    }

    /// Send `message` after `delay`
    pub fn delayed(delay: std::time::Duration, message: M) -> Self {
        Self::perform(tokio::time::sleep(delay), move |_| message)
    }

    pub fn batch(tasks: impl IntoIterator<Item = Self>) -> Self {
        Self {
            futures: tasks.into_iter().flat_map(|t| t.futures).collect(),
        }
    }

    pub fn is_none(&self) -> bool {
        self.futures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.futures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.futures.is_empty()
    }

    pub fn into_futures(self) -> Vec<LocalBoxFuture<'static, M>> {
        self.futures
    }
}

impl<M: 'static> Default for Task<M> {
    fn default() -> Self {
        Self::none()
    }
}
