//! Token scrapes over raw page and script text.
//!
//! The pages embed everything the client needs as quoted values inside
//! inline script blobs; narrowly scoped regexes are enough to pull them out
//! without parsing the surrounding markup.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ClientError;

static DATR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""_js_datr",\s*"([^"]+)""#).unwrap());
static LSD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"name="lsd"\s+value="([^"]+)""#).unwrap());
static INITIAL_REQUEST_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"name="initial_request_id"\s+value="([^"]+)""#).unwrap());
static DEVICE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""deviceId"\s*:\s*"([^"]+)""#).unwrap());
static SCHEMA_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""schemaVersion"\s*:\s*"([^"]+)""#).unwrap());
static DTSG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"DTSG.{0,20}"token":"([^"]+)""#).unwrap());
static SCRIPT_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+rsrc\.php/[^"]+\.js[^"]+)""#).unwrap());
static QUERY_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"id:\s*"([0-9]+)".{0,50}name:\s*"LSPlatformGraphQLLightspeedRequestQuery""#)
        .unwrap()
});

fn capture(re: &Regex, text: &str, token: &'static str) -> Result<String, ClientError> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(ClientError::TokenNotFound(token))
}

/// Tokens scraped from the logged-out landing page, consumed by the login
/// form post.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginTokens {
    pub datr: String,
    pub lsd: String,
    pub initial_request_id: String,
}

pub fn login_tokens(page: &str) -> Result<LoginTokens, ClientError> {
    Ok(LoginTokens {
        datr: capture(&DATR, page, "datr")?,
        lsd: capture(&LSD, page, "lsd")?,
        initial_request_id: capture(&INITIAL_REQUEST_ID, page, "initial_request_id")?,
    })
}

/// Tokens and candidate script URLs scraped from the authenticated chat
/// page. `scripts` is sorted and deduplicated so discovery order is stable.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPage {
    pub device_id: String,
    pub schema_version: String,
    pub dtsg: String,
    pub scripts: Vec<String>,
}

pub fn chat_page(page: &str) -> Result<ChatPage, ClientError> {
    let mut scripts: Vec<String> = SCRIPT_URL
        .captures_iter(page)
        .map(|caps| caps[1].to_string())
        .collect();
    scripts.sort_unstable();
    scripts.dedup();
    Ok(ChatPage {
        device_id: capture(&DEVICE_ID, page, "deviceId")?,
        schema_version: capture(&SCHEMA_VERSION, page, "schemaVersion")?,
        dtsg: capture(&DTSG, page, "dtsg")?,
        scripts,
    })
}

/// The numeric document id of the inbox request query, if this script
/// registers it.
pub fn query_id(script: &str) -> Option<String> {
    QUERY_ID
        .captures(script)
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrapes_login_tokens() {
        let page = r#"
            <script>["_js_datr",  "AbCd123"]</script>
            <input type="hidden" name="lsd" value="LsDtOk"/>
            <input type="hidden" name="initial_request_id" value="REQ99"/>
        "#;
        let tokens = login_tokens(page).unwrap();
        assert_eq!(tokens.datr, "AbCd123");
        assert_eq!(tokens.lsd, "LsDtOk");
        assert_eq!(tokens.initial_request_id, "REQ99");
    }

    #[test]
    fn missing_token_names_itself() {
        let err = login_tokens("<html></html>").unwrap_err();
        assert!(matches!(err, ClientError::TokenNotFound("datr")));
    }

    #[test]
    fn scrapes_chat_page() {
        let page = r#"
            {"deviceId" : "dev-1", "schemaVersion": "17"}
            ["DTSGInitialData",[],{"token":"tOkEn:1"},258]
            "https://s.example/y/rsrc.php/v3/yb/b.js?_nc_x=2"
            "https://s.example/x/rsrc.php/v3/ya/a.js?_nc_x=1"
            "https://s.example/x/rsrc.php/v3/ya/a.js?_nc_x=1"
            "https://s.example/not-a-script.css"
        "#;
        let chat = chat_page(page).unwrap();
        assert_eq!(chat.device_id, "dev-1");
        assert_eq!(chat.schema_version, "17");
        assert_eq!(chat.dtsg, "tOkEn:1");
        assert_eq!(
            chat.scripts,
            vec![
                "https://s.example/x/rsrc.php/v3/ya/a.js?_nc_x=1",
                "https://s.example/y/rsrc.php/v3/yb/b.js?_nc_x=2",
            ]
        );
    }

    #[test]
    fn finds_query_id_near_its_name() {
        let hit = r#"e.exports={kind:"query",id:"123456",metadata:{},name:"LSPlatformGraphQLLightspeedRequestQuery"}"#;
        assert_eq!(query_id(hit), Some("123456".to_string()));

        let miss = r#"e.exports={kind:"query",id:"123456",name:"SomethingElseQuery"}"#;
        assert_eq!(query_id(miss), None);

        // Too far apart to be the same registration.
        let far = format!(
            r#"id:"123456"{}name:"LSPlatformGraphQLLightspeedRequestQuery""#,
            " ".repeat(80)
        );
        assert_eq!(query_id(&far), None);
    }
}
