//! Auth adapters: Argon2 password hashing and the signed session cookie.

mod cookie;
mod password;

pub use cookie::SignedCookieCodec;
pub use password::Argon2Hasher;
