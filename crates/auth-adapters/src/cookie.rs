//! HMAC-SHA256 signed session cookie codec.
//!
//! The cookie value is `<token>.<tag>`: an opaque random token plus a
//! base64url MAC under the site secret. Tampering with either half makes
//! `decode` return None, so a forged cookie never reaches the session store.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

use domains::SessionCodec;

type HmacSha256 = Hmac<Sha256>;

const TOKEN_BYTES: usize = 32;

pub struct SignedCookieCodec {
    secret: Vec<u8>,
}

impl SignedCookieCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
        }
    }

    fn mac(&self, token: &str) -> HmacSha256 {
        // HMAC accepts keys of any length.
        let mut mac = HmacSha256::new_from_slice(&self.secret).expect("hmac key");
        mac.update(token.as_bytes());
        mac
    }
}

impl SessionCodec for SignedCookieCodec {
    fn issue(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    fn encode(&self, token: &str) -> String {
        let tag = self.mac(token).finalize().into_bytes();
        format!("{token}.{}", URL_SAFE_NO_PAD.encode(tag))
    }

    fn decode(&self, value: &str) -> Option<String> {
        let (token, tag) = value.rsplit_once('.')?;
        let tag = URL_SAFE_NO_PAD.decode(tag).ok()?;
        // Constant-time comparison via Mac::verify_slice.
        self.mac(token).verify_slice(&tag).ok()?;
        Some(token.to_string())
    }
}
