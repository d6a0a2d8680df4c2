//! Login choreography.
//!
//! A session is considered authenticated when a plain GET of the base URL
//! answers with a redirect to the chat page. Restoring cached cookies is
//! tried first; a fresh login runs only when the probe fails.

use reqwest::header::LOCATION;
use reqwest::StatusCode;
use tracing::{debug, info};

use crate::cookies;
use crate::error::ClientError;
use crate::scrape::{self, ChatPage, LoginTokens};
use crate::session::Session;

pub const BASE_URL: &str = "https://www.messenger.com";
pub const LOGIN_URL: &str = "https://www.messenger.com/login/password/";

pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Restores the session from the cookie cache or logs in fresh, and returns
/// the scraped chat page either way.
pub async fn establish(session: &mut Session, creds: &Credentials) -> Result<ChatPage, ClientError> {
    if let Some(jar) = cookies::load(&creds.email)? {
        debug!(cookies = jar.len(), "restored cookie cache");
        session.set_cookies(jar);
        if let Some(page) = chat_page(session).await? {
            return Ok(page);
        }
        info!("cached cookies rejected, logging in fresh");
        cookies::clear(&creds.email)?;
        session.clear_cookies();
    }
    let tokens = login_tokens(session).await?;
    login(session, &tokens, creds).await?;
    cookies::save(&creds.email, session.cookies())?;
    chat_page(session).await?.ok_or(ClientError::AuthFailed)
}

/// Probes the base URL. Authenticated sessions get redirected to the chat
/// page; anything else means the session is not (or no longer) logged in.
pub async fn chat_page(session: &mut Session) -> Result<Option<ChatPage>, ClientError> {
    let resp = session.get(BASE_URL).await?;
    let location = resp
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok());
    let Some(location) = auth_redirect(resp.status(), location) else {
        return Ok(None);
    };
    let resp = session.get(&location).await?;
    if !landed_on_chat(resp.status()) {
        return Ok(None);
    }
    let page = resp.text().await?;
    scrape::chat_page(&page).map(Some)
}

/// The probe counts as authenticated only on a 301/302 that carries a
/// usable `Location`.
fn auth_redirect(status: StatusCode, location: Option<&str>) -> Option<String> {
    if !matches!(status.as_u16(), 301 | 302) {
        return None;
    }
    location.map(str::to_string)
}

/// A redirect from the followed `Location` is another login wall, not the
/// chat page; reported as unauthenticated rather than a failed scrape.
fn landed_on_chat(status: StatusCode) -> bool {
    !status.is_redirection()
}

async fn login_tokens(session: &mut Session) -> Result<LoginTokens, ClientError> {
    let page = session.get(BASE_URL).await?.text().await?;
    scrape::login_tokens(&page)
}

async fn login(
    session: &mut Session,
    tokens: &LoginTokens,
    creds: &Credentials,
) -> Result<(), ClientError> {
    // The login endpoint expects the datr token echoed back as a cookie.
    session.insert_cookie("datr", &tokens.datr);
    session
        .post_form(
            LOGIN_URL,
            &[
                ("lsd", tokens.lsd.as_str()),
                ("initial_request_id", tokens.initial_request_id.as_str()),
                ("email", creds.email.as_str()),
                ("pass", creds.password.as_str()),
                ("login", "1"),
                ("persistent", "1"),
            ],
        )
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_redirect_classification() {
        let loc = Some("https://www.messenger.com/t/123");
        assert_eq!(
            auth_redirect(StatusCode::FOUND, loc),
            Some("https://www.messenger.com/t/123".to_string())
        );
        assert_eq!(
            auth_redirect(StatusCode::MOVED_PERMANENTLY, loc),
            Some("https://www.messenger.com/t/123".to_string())
        );
        assert_eq!(auth_redirect(StatusCode::OK, loc), None);
        assert_eq!(auth_redirect(StatusCode::SEE_OTHER, loc), None);
        // A redirect without a target is useless.
        assert_eq!(auth_redirect(StatusCode::FOUND, None), None);
    }

    #[test]
    fn redirect_after_follow_reads_as_unauthenticated() {
        assert!(!landed_on_chat(StatusCode::FOUND));
        assert!(!landed_on_chat(StatusCode::MOVED_PERMANENTLY));
        assert!(landed_on_chat(StatusCode::OK));
    }
}
