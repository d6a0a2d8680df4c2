use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http request failed")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("page did not contain the {0} token")]
    TokenNotFound(&'static str),

    #[error("no candidate script exposed the inbox query id")]
    QueryIdNotFound,

    #[error("graphql response carried no script payload")]
    MissingPayload,

    #[error("no cache directory available on this platform")]
    NoCacheDir,

    #[error("cookie cache i/o failed")]
    CookieCache(#[from] std::io::Error),

    #[error("json encoding failed")]
    Json(#[from] serde_json::Error),

    #[error("authentication failed")]
    AuthFailed,
}
