use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Result, ScrapeError};

pub const REPORT_TITLE: &str = "*Daily Challonge leaderboard*";
pub const NO_TABLE_MESSAGE: &str = "No standings table found.";

/// Slack incoming-webhook payload.
#[derive(Debug, Serialize)]
struct SlackPayload<'a> {
    text: &'a str,
}

/// Assembles the outgoing message: title, rendered block and source when a
/// block exists, otherwise the fallback line and source.
pub fn build_message(block: Option<&str>, source: &str) -> String {
    match block {
        Some(block) => format!("{}\n{}\n{}", REPORT_TITLE, block, source),
        None => format!("{}\n{}", NO_TABLE_MESSAGE, source),
    }
}

/// Posts the message text to a Slack incoming webhook. Any non-success
/// status is an error carrying the response body.
pub async fn post_to_slack(webhook_url: &str, text: &str) -> Result<()> {
    debug!("Posting {} byte(s) to Slack", text.len());
    let client = reqwest::Client::new();
    let response = client
        .post(webhook_url)
        .json(&SlackPayload { text })
        .send()
        .await?;

    let status = response.status();
    if status.is_success() {
        info!("Posted leaderboard message to Slack");
        Ok(())
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ScrapeError::Webhook {
            message: format!("status {}: {}", status, body),
        })
    }
}
