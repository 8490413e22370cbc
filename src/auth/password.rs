use bcrypt::{BcryptError, hash, verify};

/// Work factor pinned to match the hashes already in the database.
const HASH_COST: u32 = 10;

pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password, HASH_COST)
}

/// Constant-time comparison under the hood; an unparsable stored hash
/// reads as a mismatch rather than an error the caller could distinguish.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    verify(password, hashed).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hashed = hash_password("employee123").unwrap();
        assert!(verify_password("employee123", &hashed));
        assert!(!verify_password("employee124", &hashed));
    }

    #[test]
    fn hashes_use_cost_ten() {
        let hashed = hash_password("secret").unwrap();
        assert!(hashed.starts_with("$2b$10$"), "unexpected hash form: {hashed}");
    }

    #[test]
    fn verifies_legacy_seed_hash() {
        // The admin fixture hash shipped with the schema ("password").
        let seeded = "$2a$10$92IXUNpkjO0rOQ5byMi.Ye4oKoEa3Ro9llC/.og/at2.uheWG/igi";
        assert!(verify_password("password", seeded));
        assert!(!verify_password("Password", seeded));
    }

    #[test]
    fn garbage_stored_hash_reads_as_mismatch() {
        assert!(!verify_password("password", "not-a-bcrypt-hash"));
    }
}
