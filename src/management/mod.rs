mod clock;
mod cookies;
mod credential;

pub use clock::{Clock, ManualClock, SystemClock};
pub use cookies::CookieJar;
pub use credential::{
    CachedToken, CredentialConfig, CredentialManager, RENEWAL_MARGIN_SECS, decode_claims,
};
