use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    match Argon2::default().hash_password(plain.as_bytes(), &salt) {
        Ok(hash) => Ok(hash.to_string()),
        Err(e) => {
            error!(error = %e, "password hashing failed");
            Err(anyhow::anyhow!(e.to_string()))
        }
    }
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "stored password hash is malformed");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "listrik-padam-lagi-2026";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn same_password_hashes_to_distinct_strings() {
        let first = hash_password("gardu-induk-07").expect("hashing should succeed");
        let second = hash_password("gardu-induk-07").expect("hashing should succeed");
        assert_ne!(first, second, "salts must differ between hashes");
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("MeterReading#4521").expect("hashing should succeed");
        assert!(!verify_password("MeterReading#4522", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("whatever", "$argon2id$garbage").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
