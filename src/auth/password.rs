use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// Hashes a plaintext password into a PHC string with a fresh salt.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "failed to hash password");
            anyhow::anyhow!(e.to_string())
        })?;
    Ok(hash.to_string())
}

/// Checks a plaintext password against a stored PHC string. A wrong
/// password is `Ok(false)`; only an unreadable hash is an error.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "stored password hash is not a valid PHC string");
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
    fn stored_hash_verifies_the_original_password() {
        let hash = hash_password("Demo1234").expect("hash");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Demo1234", &hash).expect("verify"));
    }

    #[test]
    fn wrong_password_is_ok_false_not_an_error() {
        let hash = hash_password("Demo1234").expect("hash");
        let outcome = verify_password("demo1234", &hash);
        assert_eq!(outcome.ok(), Some(false));
    }

    #[test]
    fn each_hash_gets_its_own_salt() {
        let first = hash_password("Demo1234").expect("hash");
        let second = hash_password("Demo1234").expect("hash");
        assert_ne!(first, second);
        assert!(verify_password("Demo1234", &second).expect("verify"));
    }

    #[test]
    fn unreadable_hash_is_an_error() {
        assert!(verify_password("Demo1234", "plainly-not-a-phc-string").is_err());
    }
}
