//! HTTP session with an explicit, enumerable cookie store.
//!
//! Redirects are never followed automatically: the login choreography reads
//! redirect statuses as signals. Cookies live in a plain name to value map
//! so the whole store can be persisted and restored between runs.

use std::collections::BTreeMap;

use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{redirect, Client, Response};
use tracing::debug;

use crate::error::ClientError;

pub struct Session {
    http: Client,
    cookies: BTreeMap<String, String>,
}

impl Session {
    pub fn new() -> Result<Self, ClientError> {
        let http = Client::builder()
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Self {
            http,
            cookies: BTreeMap::new(),
        })
    }

    pub fn cookies(&self) -> &BTreeMap<String, String> {
        &self.cookies
    }

    pub fn set_cookies(&mut self, cookies: BTreeMap<String, String>) {
        self.cookies = cookies;
    }

    pub fn insert_cookie(&mut self, name: &str, value: &str) {
        self.cookies.insert(name.to_string(), value.to_string());
    }

    pub fn clear_cookies(&mut self) {
        self.cookies.clear();
    }

    /// A bare client sharing this session's connection pool, for requests
    /// that must not carry the session cookies.
    pub fn http(&self) -> Client {
        self.http.clone()
    }

    pub async fn get(&mut self, url: &str) -> Result<Response, ClientError> {
        debug!(%url, "GET");
        let mut req = self.http.get(url);
        if !self.cookies.is_empty() {
            req = req.header(COOKIE, self.cookie_header());
        }
        let resp = req.send().await?;
        self.absorb(&resp);
        check_status(url, &resp)?;
        Ok(resp)
    }

    pub async fn post_form(
        &mut self,
        url: &str,
        fields: &[(&str, &str)],
    ) -> Result<Response, ClientError> {
        debug!(%url, "POST");
        let mut req = self.http.post(url).form(fields);
        if !self.cookies.is_empty() {
            req = req.header(COOKIE, self.cookie_header());
        }
        let resp = req.send().await?;
        self.absorb(&resp);
        check_status(url, &resp)?;
        Ok(resp)
    }

    fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Folds every `Set-Cookie` header of `resp` into the store. Attributes
    /// after the first `;` are dropped; the server of interest never sends
    /// cookie deletions this client cares about.
    fn absorb(&mut self, resp: &Response) {
        for header in resp.headers().get_all(SET_COOKIE) {
            let Ok(text) = header.to_str() else { continue };
            let Some(pair) = text.split(';').next() else { continue };
            let Some((name, value)) = pair.split_once('=') else { continue };
            self.cookies
                .insert(name.trim().to_string(), value.trim().to_string());
        }
    }
}

/// Redirects are expected in places, so only 4xx/5xx are failures.
pub(crate) fn check_status(url: &str, resp: &Response) -> Result<(), ClientError> {
    let status = resp.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(ClientError::Status {
            url: url.to_string(),
            status,
        });
    }
    Ok(())
}
