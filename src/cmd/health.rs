//! `ghost health`: check the health of a running instance.
//!
//! Sends a `GET /_ghost/health` request to the specified URL and displays
//! the response as formatted text or raw JSON.

use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::StatusCode;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;

use crate::cli::HealthArgs;
use crate::error::GhostError;
use crate::health::HealthResponse;
use crate::server::HEALTH_PATH;

const TIMEOUT: Duration = Duration::from_secs(10);

pub async fn execute(args: HealthArgs) -> Result<(), GhostError> {
    let (status, body) = fetch(&args.url).await?;
    if !status.is_success() {
        return Err(GhostError::HealthCheckFailed(status));
    }

    if args.json {
        println!("{}", String::from_utf8_lossy(&body));
    } else {
        match serde_json::from_slice::<HealthResponse>(&body) {
            Ok(health) => print_report(&args.url, &health),
            Err(e) => {
                eprintln!("Failed to parse health response: {e}");
                println!("{}", String::from_utf8_lossy(&body));
            }
        }
    }
    Ok(())
}

/// `GET {base}/_ghost/health` with a fixed timeout; returns status and body.
async fn fetch(base: &str) -> Result<(StatusCode, Bytes), GhostError> {
    fn http_err(e: impl std::error::Error + Send + Sync + 'static) -> GhostError {
        GhostError::HttpRequest {
            source: Box::new(e),
        }
    }

    let uri: hyper::Uri = format!("{}{HEALTH_PATH}", base.trim_end_matches('/'))
        .parse()
        .map_err(|e: hyper::http::uri::InvalidUri| GhostError::UriParse {
            source: Box::new(e),
        })?;
    let request = hyper::Request::get(uri)
        .body(Empty::<Bytes>::new())
        .map_err(http_err)?;

    let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
    let Ok(sent) = tokio::time::timeout(TIMEOUT, client.request(request)).await else {
        return Err(GhostError::HttpRequest {
            source: format!("no answer from {base} within {}s", TIMEOUT.as_secs()).into(),
        });
    };
    let (parts, body) = sent.map_err(http_err)?.into_parts();
    let body = body.collect().await.map_err(http_err)?.to_bytes();
    Ok((parts.status, body))
}

fn print_report(url: &str, health: &HealthResponse) {
    let stats = &health.stats;
    println!("\u{2713} ghost is healthy ({url})");
    println!("  version:  {}", health.version);
    println!("  uptime:   {}", format_uptime(health.uptime_seconds));
    println!("  mocks:    {} registered", health.mocks);
    println!(
        "  requests: {} matched, {} rejected, {} mocks loaded at runtime",
        stats.requests_matched, stats.requests_rejected, stats.mocks_loaded
    );
}

fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}
