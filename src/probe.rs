use std::{
    io::Write,
    time::{Duration, Instant},
};

use reqwest::StatusCode;
use serde::Serialize;
use tracing::debug;

use crate::{
    error::{Error, Result},
    report::{truncate, ERROR_EXCERPT},
};

/// Legacy analysis endpoints first, the chat endpoint last.
pub const CANDIDATE_PATHS: [&str; 6] = [
    "/insight/emotion",
    "/emotion",
    "/api/emotion",
    "/insight/affect",
    "/insight/affect/analyze",
    "/chat",
];

pub const PAYLOAD_SHAPES: [PayloadShape; 2] = [PayloadShape::Text, PayloadShape::Message];

pub const PROMPT: &str = "Please summarize my mood: calm but a little worried about deadlines.";

/// The key the prompt is wrapped in. Older builds read `text`, the chat
/// flow reads `message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    Text,
    Message,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum Payload<'a> {
    Text(&'a str),
    Message(&'a str),
}

impl PayloadShape {
    pub fn key(self) -> &'static str {
        match self {
            PayloadShape::Text => "text",
            PayloadShape::Message => "message",
        }
    }

    fn wrap(self, prompt: &str) -> Payload<'_> {
        match self {
            PayloadShape::Text => Payload::Text(prompt),
            PayloadShape::Message => Payload::Message(prompt),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: StatusCode,
    pub body: String,
}

impl HttpReply {
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }
}

/// Result of a single request. Transport failures live in `reply` as an
/// error instead of escaping the probe.
#[derive(Debug)]
pub struct ProbeOutcome {
    pub path: String,
    pub reply: Result<HttpReply>,
}

impl ProbeOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(&self.reply, Ok(reply) if reply.is_ok())
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.reply.as_ref().ok().map(|reply| reply.status)
    }
}

#[derive(Debug)]
pub struct Attempt {
    pub path: &'static str,
    pub shape: PayloadShape,
    pub status: Option<StatusCode>,
}

#[derive(Debug)]
pub struct Match {
    pub path: &'static str,
    pub shape: PayloadShape,
    pub reply: HttpReply,
}

#[derive(Debug, Default)]
pub struct SearchOutcome {
    pub attempts: Vec<Attempt>,
    pub matched: Option<Match>,
}

pub struct Prober {
    client: reqwest::Client,
    base_url: String,
}

impl Prober {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Client)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET <base><path>`, reporting `<path>: <status>` (plus a body excerpt
    /// when it is not 200) or `<path>: ERROR <e>`.
    pub async fn probe<W: Write>(&self, path: &str, out: &mut W) -> Result<ProbeOutcome> {
        let url = format!("{}{}", self.base_url, path);
        let started = Instant::now();
        let reply = read_reply(self.client.get(&url).send().await).await;
        debug!(%url, elapsed_ms = started.elapsed().as_millis() as u64, ok = reply.is_ok(), "GET");

        match &reply {
            Ok(reply) => {
                writeln!(out, "{path}: {}", reply.status.as_u16())?;
                if !reply.is_ok() {
                    writeln!(out, "{}", truncate(&reply.body, ERROR_EXCERPT))?;
                }
            }
            Err(e) => {
                debug!(%url, error = ?e, "GET failed");
                writeln!(out, "{path}: ERROR {}", truncate(&e.to_string(), ERROR_EXCERPT))?;
            }
        }

        Ok(ProbeOutcome {
            path: path.to_string(),
            reply,
        })
    }

    /// Try every (path, payload shape) pair in order and stop at the first
    /// 200. Each attempt is reported on its own line.
    pub async fn search<W: Write>(
        &self,
        paths: &[&'static str],
        shapes: &[PayloadShape],
        out: &mut W,
    ) -> Result<SearchOutcome> {
        let mut outcome = SearchOutcome::default();

        for &path in paths {
            for &shape in shapes {
                let url = format!("{}{}", self.base_url, path);
                let started = Instant::now();
                let sent = self
                    .client
                    .post(&url)
                    .json(&shape.wrap(PROMPT))
                    .send()
                    .await;
                let reply = read_reply(sent).await;
                debug!(%url, key = shape.key(), elapsed_ms = started.elapsed().as_millis() as u64, "POST");

                match reply {
                    Ok(reply) => {
                        writeln!(
                            out,
                            "Trying {path} with {} -> {}",
                            shape.key(),
                            reply.status.as_u16()
                        )?;
                        outcome.attempts.push(Attempt {
                            path,
                            shape,
                            status: Some(reply.status),
                        });
                        if reply.is_ok() {
                            outcome.matched = Some(Match { path, shape, reply });
                            return Ok(outcome);
                        }
                    }
                    Err(e) => {
                        debug!(%url, error = ?e, "POST failed");
                        writeln!(
                            out,
                            "Trying {path} with {}: ERROR {}",
                            shape.key(),
                            truncate(&e.to_string(), ERROR_EXCERPT)
                        )?;
                        outcome.attempts.push(Attempt {
                            path,
                            shape,
                            status: None,
                        });
                    }
                }
            }
        }

        Ok(outcome)
    }
}

async fn read_reply(sent: reqwest::Result<reqwest::Response>) -> Result<HttpReply> {
    let response = sent?;
    let status = response.status();
    let body = response.text().await?;
    Ok(HttpReply { status, body })
}
