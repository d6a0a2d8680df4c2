//! Query-id discovery across the chat page's candidate scripts.

use futures::stream::{self, StreamExt};
use tracing::debug;

use crate::error::ClientError;
use crate::scrape;
use crate::session::{check_status, Session};

/// How many candidate scripts are in flight at once.
const FETCH_CONCURRENCY: usize = 5;

/// Downloads the candidate scripts a few at a time and returns the query id
/// from the first body that exposes it. Script URLs are public CDN assets,
/// so the fetches carry no session cookies.
pub async fn find_query_id(session: &Session, scripts: &[String]) -> Result<String, ClientError> {
    let http = session.http();
    let mut bodies = stream::iter(scripts.iter().cloned())
        .map(|url| {
            let http = http.clone();
            async move {
                debug!(%url, "GET");
                let resp = http.get(&url).send().await?;
                check_status(&url, &resp)?;
                Ok::<String, ClientError>(resp.text().await?)
            }
        })
        .buffer_unordered(FETCH_CONCURRENCY);
    while let Some(body) = bodies.next().await {
        if let Some(id) = scrape::query_id(&body?) {
            return Ok(id);
        }
    }
    Err(ClientError::QueryIdNotFound)
}
