//! The GraphQL endpoint: inbox payload fetch and thread interactions.
//!
//! Both operations post the same triple-nested envelope the web client
//! sends: form fields carrying a JSON `variables` string, which itself
//! carries a JSON `requestPayload` string.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde_json::json;

use crate::error::ClientError;
use crate::scrape::ChatPage;
use crate::session::Session;

pub const GRAPHQL_URL: &str = "https://www.messenger.com/api/graphql/";

/// Fetches the script payload that carries the inbox sync log.
pub async fn fetch_inbox_script(
    session: &mut Session,
    chat: &ChatPage,
    query_id: &str,
) -> Result<String, ClientError> {
    let request_payload = serde_json::to_string(&json!({
        "database": 1,
        "version": chat.schema_version,
        "sync_params": "{}",
    }))?;
    let variables = serde_json::to_string(&json!({
        "deviceId": chat.device_id,
        "requestId": 0,
        "requestPayload": request_payload,
        "requestType": 1,
    }))?;
    let resp = session
        .post_form(
            GRAPHQL_URL,
            &[
                ("doc_id", query_id),
                ("fb_dtsg", chat.dtsg.as_str()),
                ("variables", variables.as_str()),
            ],
        )
        .await?;
    let body: serde_json::Value = resp.json().await?;
    body["data"]["viewer"]["lightspeed_web_request"]["payload"]
        .as_str()
        .map(str::to_string)
        .ok_or(ClientError::MissingPayload)
}

/// Posts one mutation batch against a thread. The batch always marks the
/// thread read; with `message` set it prepends a send task.
pub async fn interact_with_thread(
    session: &mut Session,
    chat: &ChatPage,
    query_id: &str,
    thread_id: u64,
    message: Option<&str>,
) -> Result<(), ClientError> {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64);
    let otid_offset = rand::thread_rng().gen_range(0..(1u64 << 22));
    let request_payload = task_envelope(chat, thread_id, message, now_ms, otid_offset)?;
    let variables = serde_json::to_string(&json!({
        "deviceId": chat.device_id,
        "requestId": 0,
        "requestPayload": request_payload,
        "requestType": 3,
    }))?;
    session
        .post_form(
            GRAPHQL_URL,
            &[
                ("doc_id", query_id),
                ("fb_dtsg", chat.dtsg.as_str()),
                ("variables", variables.as_str()),
            ],
        )
        .await?;
    Ok(())
}

/// Builds the `requestPayload` JSON for a thread interaction. `now_ms` is
/// wall-clock milliseconds; `otid_offset` is a random 22-bit disambiguator
/// mixed into the message's one-time id. The epoch id is the timestamp
/// shifted left 22 bits, leaving room for that disambiguator.
fn task_envelope(
    chat: &ChatPage,
    thread_id: u64,
    message: Option<&str>,
    now_ms: u64,
    otid_offset: u64,
) -> Result<String, ClientError> {
    let epoch = now_ms << 22;
    let mut tasks = Vec::new();
    if let Some(text) = message {
        let otid = epoch + otid_offset;
        tasks.push(json!({
            "label": "46",
            "payload": serde_json::to_string(&json!({
                "thread_id": thread_id,
                "otid": otid.to_string(),
                "source": 0,
                "send_type": 1,
                "text": text,
                "initiating_source": 1,
            }))?,
            "queue_name": thread_id.to_string(),
            "task_id": 0,
        }));
    }
    tasks.push(json!({
        "label": "21",
        "payload": serde_json::to_string(&json!({
            "thread_id": thread_id,
            "last_read_watermark_ts": now_ms,
            "sync_group": 1,
        }))?,
        "queue_name": thread_id.to_string(),
        "task_id": 1,
    }));
    Ok(serde_json::to_string(&json!({
        "version_id": chat.schema_version,
        "epoch_id": epoch,
        "tasks": tasks,
    }))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat() -> ChatPage {
        ChatPage {
            device_id: "dev".into(),
            schema_version: "17".into(),
            dtsg: "tok".into(),
            scripts: vec![],
        }
    }

    #[test]
    fn read_only_envelope_has_one_task() {
        let raw = task_envelope(&chat(), 42, None, 1_000, 7).unwrap();
        let env: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(env["version_id"], "17");
        assert_eq!(env["epoch_id"].as_u64(), Some(1_000 << 22));
        let tasks = env["tasks"].as_array().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0]["label"], "21");
        assert_eq!(tasks[0]["queue_name"], "42");
        assert_eq!(tasks[0]["task_id"], 1);
        let payload: serde_json::Value =
            serde_json::from_str(tasks[0]["payload"].as_str().unwrap()).unwrap();
        assert_eq!(payload["thread_id"].as_u64(), Some(42));
        assert_eq!(payload["last_read_watermark_ts"].as_u64(), Some(1_000));
        assert_eq!(payload["sync_group"], 1);
    }

    #[test]
    fn send_envelope_prepends_the_send_task() {
        let raw = task_envelope(&chat(), 42, Some("hi there"), 1_000, 7).unwrap();
        let env: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let tasks = env["tasks"].as_array().unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0]["label"], "46");
        assert_eq!(tasks[0]["task_id"], 0);
        assert_eq!(tasks[1]["label"], "21");
        let payload: serde_json::Value =
            serde_json::from_str(tasks[0]["payload"].as_str().unwrap()).unwrap();
        assert_eq!(payload["text"], "hi there");
        // The one-time id folds the offset into the shifted timestamp and
        // travels as a decimal string.
        assert_eq!(payload["otid"], ((1_000u64 << 22) + 7).to_string());
    }
}
