use core_config::Environment;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

pub use tower_sessions::Session;

/// Inactivity window for sessions created with "remember me".
pub const REMEMBER_ME_TTL: Duration = Duration::days(7);

/// Cookie-backed session layer over an in-process store.
///
/// Sessions end with the browser session unless a handler extends them with
/// [`remember_me_expiry`]. Cookies are `Secure` only in production.
pub fn create_session_layer(environment: &Environment) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name("concierge.sid")
        .with_secure(environment.use_https())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnSessionEnd)
}

pub fn remember_me_expiry() -> Expiry {
    Expiry::OnInactivity(REMEMBER_ME_TTL)
}
