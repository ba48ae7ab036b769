//! Process-wide HTTP client shared by every authenticator and lister.

use std::sync::LazyLock;

use reqwest::Client;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

static HTTP_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to build HTTP client")
});

/// A handle to the shared client. Clones share one connection pool.
pub fn shared_client() -> Client {
    HTTP_CLIENT.clone()
}
