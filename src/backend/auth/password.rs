//! bcrypt password hashing

use crate::backend::error::BackendError;

pub fn hash_password(password: &str, cost: u32) -> Result<String, BackendError> {
    bcrypt::hash(password, cost).map_err(|e| {
        tracing::error!("Failed to hash password: {:?}", e);
        BackendError::internal("Failed to process password")
    })
}

/// Check `password` against a stored hash. A malformed hash is an error, not a mismatch.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, BackendError> {
    bcrypt::verify(password, hash).map_err(|e| {
        tracing::error!("Password verification error: {:?}", e);
        BackendError::internal("Failed to verify password")
    })
}
