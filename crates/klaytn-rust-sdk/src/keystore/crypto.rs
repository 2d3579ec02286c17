//! Per-key encryption: KDF, AES-128-CTR and the Keccak-256 MAC.

use crate::crypto::{keccak256_of, PrivateKey};
use crate::error::{KlaytnError, KlaytnResult};
use crate::keystore::options::{
    check_dklen, check_scrypt_params, EncryptOptions, Kdf, AES_128_CTR, HMAC_SHA256, IV_LENGTH,
    SALT_LENGTH,
};
use crate::keystore::{CipherParams, EncryptedKey, KdfParams};
use aes::cipher::{KeyIvInit, StreamCipher};
use rand::RngCore;
use tracing::warn;
use zeroize::Zeroizing;

type Aes128Ctr = ctr::Ctr128BE<aes::Aes128>;

const MAC_LENGTH: usize = 32;

fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    bytes
}

fn scrypt_derive(
    password: &[u8],
    salt: &[u8],
    n: u32,
    r: u32,
    p: u32,
    dklen: usize,
) -> KlaytnResult<Zeroizing<Vec<u8>>> {
    let log_n = u8::try_from(n.trailing_zeros())
        .map_err(|_| KlaytnError::KeyDerivation(format!("n is too large: {n}")))?;
    let params = scrypt::Params::new(log_n, r, p, scrypt::Params::RECOMMENDED_LEN)
        .map_err(|e| KlaytnError::KeyDerivation(e.to_string()))?;
    let mut derived = Zeroizing::new(vec![0u8; dklen]);
    scrypt::scrypt(password, salt, &params, &mut derived)
        .map_err(|e| KlaytnError::KeyDerivation(e.to_string()))?;
    Ok(derived)
}

fn pbkdf2_derive(password: &[u8], salt: &[u8], c: u32, dklen: usize) -> Zeroizing<Vec<u8>> {
    let mut derived = Zeroizing::new(vec![0u8; dklen]);
    pbkdf2::pbkdf2_hmac::<sha2::Sha256>(password, salt, c, &mut derived);
    derived
}

fn mac(derived: &[u8], ciphertext: &[u8]) -> [u8; MAC_LENGTH] {
    keccak256_of([&derived[16..32], ciphertext])
}

/// Encrypts one private key.
pub(crate) fn encrypt_key(
    key: &PrivateKey,
    password: &str,
    options: &EncryptOptions,
) -> KlaytnResult<EncryptedKey> {
    options.validate()?;

    let salt = match &options.salt {
        Some(salt) => salt.clone(),
        None => random_bytes::<SALT_LENGTH>().to_vec(),
    };
    let iv = options.iv.unwrap_or_else(random_bytes::<IV_LENGTH>);

    let (derived, kdfparams) = match options.kdf {
        Kdf::Scrypt => (
            scrypt_derive(
                password.as_bytes(),
                &salt,
                options.n,
                options.r,
                options.p,
                options.dklen,
            )?,
            KdfParams {
                dklen: options.dklen,
                salt: hex::encode(&salt),
                n: Some(options.n),
                r: Some(options.r),
                p: Some(options.p),
                c: None,
                prf: None,
            },
        ),
        Kdf::Pbkdf2 => (
            pbkdf2_derive(password.as_bytes(), &salt, options.c, options.dklen),
            KdfParams {
                dklen: options.dklen,
                salt: hex::encode(&salt),
                n: None,
                r: None,
                p: None,
                c: Some(options.c),
                prf: Some(HMAC_SHA256.to_string()),
            },
        ),
    };

    let mut ciphertext = key.to_bytes().to_vec();
    let mut cipher = Aes128Ctr::new(derived[..16].into(), iv.as_slice().into());
    cipher.apply_keystream(&mut ciphertext);

    Ok(EncryptedKey {
        ciphertext: hex::encode(&ciphertext),
        cipherparams: CipherParams {
            iv: hex::encode(iv),
        },
        cipher: AES_128_CTR.to_string(),
        kdf: options.kdf.as_str().to_string(),
        kdfparams,
        mac: hex::encode(mac(&derived, &ciphertext)),
    })
}

fn decode_field(name: &str, value: &str) -> KlaytnResult<Vec<u8>> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(digits).map_err(|e| KlaytnError::keystore(format!("invalid {name}: {e}")))
}

fn required(name: &str, value: Option<u32>) -> KlaytnResult<u32> {
    value.ok_or_else(|| KlaytnError::keystore(format!("missing kdfparams.{name}")))
}

/// Decrypts one keystore entry, verifying the MAC before decrypting.
pub(crate) fn decrypt_key(entry: &EncryptedKey, password: &str) -> KlaytnResult<PrivateKey> {
    if entry.cipher.to_ascii_lowercase() != AES_128_CTR {
        return Err(KlaytnError::UnsupportedCipher(entry.cipher.clone()));
    }
    let kdf: Kdf = entry.kdf.parse()?;

    let params = &entry.kdfparams;
    check_dklen(params.dklen).map_err(KlaytnError::keystore)?;
    let salt = decode_field("salt", &params.salt)?;
    let iv = decode_field("iv", &entry.cipherparams.iv)?;
    if iv.len() != IV_LENGTH {
        return Err(KlaytnError::keystore(format!(
            "iv must be {IV_LENGTH} bytes, got {}",
            iv.len()
        )));
    }
    let ciphertext = decode_field("ciphertext", &entry.ciphertext)?;
    let expected_mac = decode_field("mac", &entry.mac)?;
    if expected_mac.len() != MAC_LENGTH {
        return Err(KlaytnError::keystore(format!(
            "mac must be {MAC_LENGTH} bytes, got {}",
            expected_mac.len()
        )));
    }

    let derived = match kdf {
        Kdf::Scrypt => {
            let (n, r, p) = (
                required("n", params.n)?,
                required("r", params.r)?,
                required("p", params.p)?,
            );
            check_scrypt_params(n, r, p).map_err(KlaytnError::keystore)?;
            scrypt_derive(password.as_bytes(), &salt, n, r, p, params.dklen)?
        }
        Kdf::Pbkdf2 => {
            if let Some(prf) = params.prf.as_deref() {
                if prf.to_ascii_lowercase() != HMAC_SHA256 {
                    return Err(KlaytnError::UnsupportedKdf(format!("pbkdf2 with {prf}")));
                }
            }
            pbkdf2_derive(
                password.as_bytes(),
                &salt,
                required("c", params.c)?,
                params.dklen,
            )
        }
    };

    if mac(&derived, &ciphertext)[..] != expected_mac[..] {
        warn!(kdf = %kdf, "keystore MAC mismatch");
        return Err(KlaytnError::MacMismatch);
    }

    let mut plaintext = Zeroizing::new(ciphertext);
    let mut cipher = Aes128Ctr::new(derived[..16].into(), iv.as_slice().into());
    cipher.apply_keystream(&mut plaintext);
    PrivateKey::from_bytes(&plaintext)
}
