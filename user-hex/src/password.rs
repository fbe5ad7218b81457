//! Credential hashing.
//!
//! Argon2id with the crate's default parameters. The cost is fixed and not
//! configurable. Hashing runs on the blocking pool because it is CPU-bound.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use tokio::task;

/// Hashes a plaintext password into a salted PHC string.
pub async fn hash_password(password: String) -> anyhow::Result<String> {
    task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))
    })
    .await
    .map_err(|e| anyhow::anyhow!("Password hashing task panicked: {e}"))?
}

#[cfg(test)]
mod tests {
    use argon2::{PasswordHash, PasswordVerifier};

    use super::*;

    #[tokio::test]
    async fn test_hash_is_not_plaintext_and_verifies() {
        let hash = hash_password("secret".into()).await.unwrap();

        assert_ne!(hash, "secret");
        assert!(hash.starts_with("$argon2id$"));

        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"secret", &parsed)
                .is_ok()
        );
        assert!(
            Argon2::default()
                .verify_password(b"wrong", &parsed)
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_hash_is_salted() {
        let a = hash_password("secret".into()).await.unwrap();
        let b = hash_password("secret".into()).await.unwrap();
        assert_ne!(a, b);
    }
}
