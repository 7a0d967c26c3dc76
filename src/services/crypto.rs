use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

use crate::errors::StoreError;

type HmacSha256 = Hmac<Sha256>;

/// Length of generated one-time passwords for promoted guardian accounts.
pub const GENERATED_PASSWORD_LENGTH: usize = 12;

/// Hash a password with Argon2id and a fresh random salt (PHC string format).
pub fn hash_password(password: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| StoreError::crypto("hash password", e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash string.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, StoreError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| StoreError::crypto("parse password hash", e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Generate a random one-time password for a newly created account.
///
/// Drawn from uppercase, lowercase, digits and a small symbol set. The
/// value is surfaced exactly once, in the account-created email.
pub fn generate_password() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                             abcdefghijklmnopqrstuvwxyz\
                             0123456789\
                             !@#$%^&*";

    let mut rng = rand::rng();
    (0..GENERATED_PASSWORD_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Generate an opaque password-reset token: 32 random bytes, base64url.
pub fn generate_reset_token() -> String {
    let random_bytes: [u8; 32] = rand::rng().random();
    URL_SAFE_NO_PAD.encode(random_bytes)
}

/// Compute HMAC-SHA256 for reset tokens and return as hexadecimal string.
/// Keyed hashing means a leaked database copy cannot be used to mint
/// acceptable tokens.
pub fn hmac_sha256_token(key: &str, token: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(token.as_bytes());
    let result = mac.finalize();
    format!("{:x}", result.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("correct horse").expect("Failed to hash");
        assert!(hash.starts_with("$argon2"));
        assert_ne!(hash, "correct horse");

        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_salts() {
        let hash1 = hash_password("password123").unwrap();
        let hash2 = hash_password("password123").unwrap();
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_generate_password_length_and_charset() {
        let password = generate_password();
        assert_eq!(password.len(), GENERATED_PASSWORD_LENGTH);
        assert!(password
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "!@#$%^&*".contains(c)));
    }

    #[test]
    fn test_generate_password_uniqueness() {
        assert_ne!(generate_password(), generate_password());
    }

    #[test]
    fn test_generate_reset_token_is_unique_and_url_safe() {
        let token1 = generate_reset_token();
        let token2 = generate_reset_token();

        assert_ne!(token1, token2);
        // 32 bytes base64url without padding is 43 characters
        assert_eq!(token1.len(), 43);
        assert!(!token1.contains('+'));
        assert!(!token1.contains('/'));
        assert!(!token1.contains('='));
    }

    #[test]
    fn test_hmac_is_deterministic_and_keyed() {
        let hash1 = hmac_sha256_token("secret-a", "token");
        let hash2 = hmac_sha256_token("secret-a", "token");
        let hash3 = hmac_sha256_token("secret-b", "token");

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash3);
        assert_eq!(hash1.len(), 64);
        assert!(hash1.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
