//! Challenge-response credential derivation.
//!
//! The server never receives the plaintext password. It issues a salt, a PBKDF2
//! round count and a one-time random key; the client answers with a proof derived
//! from all three.

use md5::{Digest, Md5};
use pbkdf2::pbkdf2_hmac;
use serde::Deserialize;
use sha2::Sha256;

/// Length of the PBKDF2-HMAC-SHA256 output in bytes.
const PBKDF2_OUTPUT_LEN: usize = 32;

/// Login material for one server.
#[derive(Clone)]
pub struct Credentials {
    pub url: String,
    pub username: String,
    password: String,
}

impl Credentials {
    pub fn new(url: &str, username: &str, password: &str) -> Self {
        Self {
            url: url.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// An empty username selects anonymous login.
    pub fn is_anonymous(&self) -> bool {
        self.username.is_empty()
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Server-issued challenge for a single login attempt.
#[derive(Debug, Clone, Deserialize)]
pub struct Challenge {
    pub salt: String,
    #[serde(rename = "pbkdf2_rounds", default)]
    pub rounds: u32,
    /// Pre-authentication session token returned with the salt
    #[serde(rename = "ses")]
    pub session_seed: String,
    #[serde(rename = "rnd")]
    pub random_key: String,
}

/// Compute the one-time password proof for a challenge.
///
/// With `rounds > 0` the MD5 of `salt ++ password` is stretched with
/// PBKDF2-HMAC-SHA256 and hex-encoded before being appended to the random key.
/// With `rounds == 0` the raw MD5 digest bytes are appended instead. Both
/// branches must match the server's verification byte for byte.
pub fn derive_password_proof(password: &str, salt: &str, rounds: u32, random_key: &str) -> String {
    let stage1 = Md5::digest(format!("{}{}", salt, password).as_bytes());

    let mut hasher = Md5::new();
    hasher.update(random_key.as_bytes());

    if rounds > 0 {
        let mut stage2 = [0u8; PBKDF2_OUTPUT_LEN];
        pbkdf2_hmac::<Sha256>(&stage1, salt.as_bytes(), rounds, &mut stage2);
        hasher.update(to_hex(&stage2).as_bytes());
    } else {
        hasher.update(stage1);
    }

    to_hex(&hasher.finalize())
}

/// Proof for a parsed challenge.
pub fn answer_challenge(credentials: &Credentials, challenge: &Challenge) -> String {
    derive_password_proof(
        credentials.password(),
        &challenge.salt,
        challenge.rounds,
        &challenge.random_key,
    )
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
