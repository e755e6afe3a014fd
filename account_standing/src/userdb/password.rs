//! Password hashing with PBKDF2-HMAC-SHA256.
//!
//! Hashes are stored as `pbkdf2_sha256$<iterations>$<salt>$<hash>` where salt and hash
//! are URL-safe base64 without padding.

use std::num::NonZeroU32;
use std::sync::LazyLock;

use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};

use crate::userdb::errors::UserError;
use crate::utils::{base64url_decode, base64url_encode};

const ALGORITHM_TAG: &str = "pbkdf2_sha256";
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

static PASSWORD_HASH_ITERATIONS: LazyLock<u32> = LazyLock::new(|| {
    std::env::var("PASSWORD_HASH_ITERATIONS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|n| *n > 0)
        .unwrap_or(600_000)
});

pub(crate) fn hash_password(password: &str) -> Result<String, UserError> {
    hash_password_with_iterations(password, *PASSWORD_HASH_ITERATIONS)
}

fn hash_password_with_iterations(password: &str, iterations: u32) -> Result<String, UserError> {
    let rounds = NonZeroU32::new(iterations)
        .ok_or_else(|| UserError::Password("Iteration count must be positive".to_string()))?;

    let mut salt = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| UserError::Password("Failed to generate salt".to_string()))?;

    let mut hash = [0u8; HASH_LEN];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        rounds,
        &salt,
        password.as_bytes(),
        &mut hash,
    );

    Ok(format!(
        "{ALGORITHM_TAG}${iterations}${}${}",
        base64url_encode(salt.to_vec()),
        base64url_encode(hash.to_vec())
    ))
}

/// Returns `false` for any mismatch, including a malformed stored hash.
pub(crate) fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(tag), Some(iterations), Some(salt), Some(hash), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        tracing::warn!("Stored password hash has an unexpected layout");
        return false;
    };

    if tag != ALGORITHM_TAG {
        tracing::warn!("Unsupported password hash algorithm: {}", tag);
        return false;
    }

    let Some(rounds) = iterations.parse::<u32>().ok().and_then(NonZeroU32::new) else {
        return false;
    };
    let (Ok(salt), Ok(hash)) = (base64url_decode(salt), base64url_decode(hash)) else {
        return false;
    };

    pbkdf2::verify(
        pbkdf2::PBKDF2_HMAC_SHA256,
        rounds,
        &salt,
        password.as_bytes(),
        &hash,
    )
    .is_ok()
}
