//! One-way salted password hashing.
//!
//! bcrypt is CPU-bound, so both operations run on the blocking pool.

use crate::error::AppError;

/// Hashes a password with a fresh random salt.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Checks a password against a stored hash.
///
/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || match bcrypt::verify(password, &hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!("Stored password hash is unreadable: {}", e);
            false
        }
    })
    .await
    .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps tests fast
    const TEST_COST: u32 = 4;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password("secret1", TEST_COST).await.unwrap();

        assert_ne!(hash, "secret1");
        assert!(verify_password("secret1", &hash).await.unwrap());
        assert!(!verify_password("secret2", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_hashes_are_salted() {
        let a = hash_password("secret1", TEST_COST).await.unwrap();
        let b = hash_password("secret1", TEST_COST).await.unwrap();

        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_malformed_hash_is_mismatch() {
        assert!(!verify_password("secret1", "not-a-hash").await.unwrap());
    }
}
