use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Share passwords are stored as a plain SHA-256 hex digest.
pub fn hash_share_password(plain: &str) -> String {
    sha256_hex(plain.as_bytes())
}

pub fn verify_share_password(plain: &str, stored_hash: &str) -> bool {
    if plain.is_empty() {
        return false;
    }
    let computed = hash_share_password(plain);
    computed
        .as_bytes()
        .ct_eq(stored_hash.to_ascii_lowercase().as_bytes())
        .into()
}

/// Signature that lets the headless browser load `/render/:id` without a user session.
pub fn sign_render_target(secret: &str, resume_id: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(resume_id.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

pub fn verify_render_signature(secret: &str, resume_id: &str, signature: &str) -> bool {
    let Ok(raw) = hex::decode(signature) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(resume_id.as_bytes());
    mac.verify_slice(&raw).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_matches_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn share_password_round_trip() {
        let stored = hash_share_password("hunter2");
        assert!(verify_share_password("hunter2", &stored));
        assert!(verify_share_password("hunter2", &stored.to_uppercase()));
        assert!(!verify_share_password("hunter3", &stored));
        assert!(!verify_share_password("", &stored));
    }

    #[test]
    fn empty_password_never_matches_even_its_own_digest() {
        let stored = hash_share_password("");
        assert!(!verify_share_password("", &stored));
    }

    #[test]
    fn render_signature_binds_secret_and_id() {
        let sig = sign_render_target("s3cret", "abc");
        assert!(verify_render_signature("s3cret", "abc", &sig));
        assert!(!verify_render_signature("s3cret", "abd", &sig));
        assert!(!verify_render_signature("other", "abc", &sig));
        assert!(!verify_render_signature("s3cret", "abc", "not-hex"));
    }
}
