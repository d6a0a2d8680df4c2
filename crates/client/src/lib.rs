//! Web client plumbing for the inbox retriever: session and cookie
//! handling, login choreography, token scraping, query-id discovery and the
//! GraphQL endpoint. The script payload this crate fetches is consumed by
//! `msgr-script` (parsing) and `msgr-lightspeed` (interpretation).

pub mod auth;
pub mod cookies;
pub mod discover;
pub mod error;
pub mod graphql;
pub mod scrape;
pub mod session;

pub use self::auth::{establish, Credentials};
pub use self::discover::find_query_id;
pub use self::error::ClientError;
pub use self::graphql::{fetch_inbox_script, interact_with_thread};
pub use self::scrape::ChatPage;
pub use self::session::Session;
