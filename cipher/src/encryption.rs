use base64::{Engine as _, engine::general_purpose::STANDARD};
use chacha20poly1305::{
    ChaCha20Poly1305, Nonce,
    aead::{Aead, AeadCore, KeyInit, OsRng},
};
use snafu::{ResultExt, ensure};

use crate::Result;
use crate::error::{DecodeSnafu, DecryptSnafu, EncryptSnafu, InvalidKeySnafu, Utf8Snafu};

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// Generates a random key, base64 encoded
pub fn generate_key() -> String {
    let key = ChaCha20Poly1305::generate_key(&mut OsRng);
    STANDARD.encode(key)
}

pub fn valid_key(key: &str) -> bool {
    create_cipher(key).is_ok()
}

/// Encrypts with a fresh nonce. Output is base64 of nonce followed by ciphertext.
pub fn encrypt(key: &str, data: &str) -> Result<String> {
    let cipher = create_cipher(key)?;
    let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, data.as_bytes())
        .map_err(|_| EncryptSnafu.build())?;

    let mut payload: Vec<u8> = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    payload.extend_from_slice(nonce.as_slice());
    payload.extend_from_slice(&ciphertext);
    Ok(STANDARD.encode(payload))
}

pub fn decrypt(key: &str, data: &str) -> Result<String> {
    let cipher = create_cipher(key)?;
    let payload = STANDARD.decode(data).context(DecodeSnafu)?;
    ensure!(payload.len() > NONCE_LEN, DecryptSnafu);

    let (nonce, ciphertext) = payload.split_at(NONCE_LEN);
    let plain = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| DecryptSnafu.build())?;

    String::from_utf8(plain).context(Utf8Snafu)
}

fn create_cipher(key: &str) -> Result<ChaCha20Poly1305> {
    let bytes = STANDARD.decode(key).map_err(|e| {
        InvalidKeySnafu {
            msg: e.to_string(),
        }
        .build()
    })?;
    ensure!(
        bytes.len() == KEY_LEN,
        InvalidKeySnafu {
            msg: format!("expected {} bytes, got {}", KEY_LEN, bytes.len()),
        }
    );

    ChaCha20Poly1305::new_from_slice(&bytes).map_err(|_| {
        InvalidKeySnafu {
            msg: "unable to initialize cipher".to_string(),
        }
        .build()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    const TEST_KEY: &str = "AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8=";

    #[test]
    fn test_encrypt_decrypt() {
        let plain = "secret-password";

        let crypted = encrypt(TEST_KEY, plain).unwrap();
        assert_ne!(crypted, plain);

        let plain_back = decrypt(TEST_KEY, &crypted).unwrap();
        assert_eq!(plain, plain_back);
    }

    #[test]
    fn test_encrypt_uses_fresh_nonce() {
        let first = encrypt(TEST_KEY, "same").unwrap();
        let second = encrypt(TEST_KEY, "same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_empty_value() {
        let crypted = encrypt(TEST_KEY, "").unwrap();
        assert_eq!(decrypt(TEST_KEY, &crypted).unwrap(), "");
    }

    #[test]
    fn test_decrypt_wrong_key() {
        let other_key = generate_key();
        let crypted = encrypt(TEST_KEY, "secret-password").unwrap();
        let res = decrypt(&other_key, &crypted);
        assert!(matches!(res, Err(Error::Decrypt)));
    }

    #[test]
    fn test_decrypt_tampered() {
        let crypted = encrypt(TEST_KEY, "secret-password").unwrap();
        let mut bytes = STANDARD.decode(&crypted).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let tampered = STANDARD.encode(bytes);
        assert!(decrypt(TEST_KEY, &tampered).is_err());

        assert!(decrypt(TEST_KEY, "not base64!").is_err());
        assert!(decrypt(TEST_KEY, "AAAA").is_err());
    }

    #[test]
    fn test_keys() {
        assert!(valid_key(TEST_KEY));
        assert!(valid_key(&generate_key()));
        assert!(!valid_key("c2hvcnQ="));
        assert!(!valid_key("not base64!"));
        assert!(!valid_key(""));
    }
}
