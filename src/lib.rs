use std::io::Write;

use tracing::{debug, info, warn};

pub mod cli;
pub mod emotion;
pub mod error;
pub mod logging;
pub mod probe;
pub mod report;

pub use cli::Args;
pub use error::{Error, Result};
pub use report::Verdict;

use probe::{Prober, CANDIDATE_PATHS, PAYLOAD_SHAPES};
use report::{pretty_json, truncate, BODY_EXCERPT};

const NO_ENDPOINT_HINT: &str =
    "No emotion/chat endpoint matched. This build may not expose analysis; use /chat for interaction.";

/// Runs the whole self-test against `args.base_url()`, writing the report to
/// `out`. Requests go out one at a time; each runs to completion before the
/// next is sent.
pub async fn run<W: Write>(args: &Args, out: &mut W) -> Result<Verdict> {
    let prober = Prober::new(args.base_url(), args.request_timeout())?;
    info!(base_url = prober.base_url(), timeout_secs = args.timeout.as_secs_f64(), "starting self-test");

    writeln!(out, "=== HEALTH ===")?;
    let health = prober.probe("/health", out).await?;

    writeln!(out, "=== DEMO ===")?;
    let demo = prober.probe("/demo", out).await?;

    writeln!(out, "=== EMOTION / CHAT ===")?;
    let search = prober.search(&CANDIDATE_PATHS, &PAYLOAD_SHAPES, out).await?;
    for outcome in [&health, &demo] {
        debug!(path = %outcome.path, status = ?outcome.status(), ok = outcome.succeeded(), "probe finished");
    }
    for attempt in &search.attempts {
        debug!(path = attempt.path, key = attempt.shape.key(), status = ?attempt.status, "attempt finished");
    }
    debug!(
        attempts = search.attempts.len(),
        matched = search.matched.as_ref().map(|m| m.path),
        "payload search finished"
    );

    let verdict = Verdict::classify(
        health.succeeded(),
        demo.succeeded(),
        search.matched.as_ref().map(|m| m.reply.is_ok()),
    );

    match &search.matched {
        None => writeln!(out, "{NO_ENDPOINT_HINT}")?,
        Some(matched) => {
            let body = &matched.reply.body;
            writeln!(out, "Matched {} with {}", matched.path, matched.shape.key())?;
            if args.verbose {
                writeln!(out, "Body (pretty):")?;
                writeln!(out, "{}", pretty_json(body))?;
            } else {
                writeln!(
                    out,
                    "Body (first {BODY_EXCERPT} chars): {}",
                    truncate(body, BODY_EXCERPT)
                )?;
            }
            writeln!(out, "Top emotions: {}", emotion::summarize(body))?;
        }
    }

    writeln!(out, "=== RESULT ===")?;
    writeln!(out, "{verdict}")?;
    info!(%verdict, "self-test finished");

    Ok(verdict)
}

/// Returns a future which will resolve when Ctrl-C is received.
///
/// If the handler cannot be installed the future never resolves, so the run
/// is left to finish on its own.
#[cfg(windows)]
pub async fn exit_signal() {
    park_on_error(tokio::signal::ctrl_c().await).await;
}

/// Returns a future which will resolve when SIGINT/SIGTERM are sent to the process.
///
/// If a handler cannot be installed the future never resolves, so the run
/// is left to finish on its own.
#[cfg(unix)]
pub async fn exit_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = park_on_error(signal(SignalKind::terminate())).await;
    let mut ctrl_c = park_on_error(signal(SignalKind::interrupt())).await;

    tokio::select! {
        _ = term.recv() => {},
        _ = ctrl_c.recv() => {},
    }
}

async fn park_on_error<T>(registered: std::io::Result<T>) -> T {
    match registered {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "cannot listen for termination signals");
            std::future::pending().await
        }
    }
}
