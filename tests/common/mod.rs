#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use honeygain_http_client::{ClientError, Reply, Result, Transport};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub url: String,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

/// Scripted replies per (method, url). The last reply queued for a route is
/// repeated once the queue is down to it.
#[derive(Debug, Default)]
pub struct FakeTransport {
    replies: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, method: Method, url: &str, body: Value) -> Self {
        self.reply_raw(method, url, 200, &body.to_string())
    }

    pub fn reply_raw(self, method: Method, url: &str, status: u16, body: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry((method, url.to_string()))
            .or_default()
            .push_back(Reply {
                status,
                body: body.to_string(),
            });
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, url: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.method == method && c.url == url)
            .count()
    }

    fn respond(
        &self,
        method: Method,
        url: &str,
        bearer: Option<&str>,
        body: Option<&Value>,
    ) -> Result<Reply> {
        self.calls.lock().unwrap().push(Call {
            method,
            url: url.to_string(),
            bearer: bearer.map(str::to_string),
            body: body.cloned(),
        });

        let mut replies = self.replies.lock().unwrap();
        let queue = replies
            .get_mut(&(method, url.to_string()))
            .ok_or_else(|| ClientError::Http(format!("no reply scripted for {method:?} {url}")))?;
        let reply = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        reply.ok_or_else(|| ClientError::Http(format!("no reply left for {method:?} {url}")))
    }
}

impl Transport for FakeTransport {
    async fn get(&self, url: &str, bearer: Option<&str>) -> Result<Reply> {
        self.respond(Method::Get, url, bearer, None)
    }

    async fn post(&self, url: &str, bearer: Option<&str>, body: Option<&Value>) -> Result<Reply> {
        self.respond(Method::Post, url, bearer, body)
    }
}
