//! Password verification against stored bcrypt hashes

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("stored password hash is malformed: {0}")]
    MalformedHash(#[from] bcrypt::BcryptError),
}

/// Check a candidate password against a stored bcrypt hash.
///
/// Returns `Ok(false)` for a wrong password; an error means the stored hash
/// itself could not be parsed.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
    Ok(bcrypt::verify(password, stored_hash)?)
}
