use anyhow::{Result, anyhow};
use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use collegejump_core::domain::NewPassword;
use uuid::Uuid;

pub fn hash_password(password: &NewPassword) -> Result<String> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| anyhow!("failed to encode password salt: {e}"))?;

    let hash = Argon2::default()
        .hash_password(password.expose().as_bytes(), &salt)
        .map_err(|e| anyhow!("failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// 密码错误或哈希无法解析时均返回 `false`。
pub fn verify_password(candidate: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let password = NewPassword::new("correct horse", "correct horse").expect("valid");
        let hash = hash_password(&password).expect("hashing succeeds");

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("correct h0rse", &hash));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let password = NewPassword::new("correct horse", "correct horse").expect("valid");

        let first = hash_password(&password).expect("hashing succeeds");
        let second = hash_password(&password).expect("hashing succeeds");

        assert_ne!(first, second);
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
