//! Keystore encryption options.

use crate::error::{KlaytnError, KlaytnResult};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The only supported cipher.
pub const AES_128_CTR: &str = "aes-128-ctr";

/// The pseudo-random function used by pbkdf2.
pub const HMAC_SHA256: &str = "hmac-sha256";

/// Minimum derived key length: 16 bytes of cipher key plus 16 bytes of MAC key.
pub const MIN_DKLEN: usize = 32;

/// Maximum derived key length accepted when encrypting or decrypting.
pub const MAX_DKLEN: usize = 64;

/// Maximum scrypt working memory (`128 * n * r` bytes).
pub const MAX_SCRYPT_MEMORY: u64 = 1 << 30;

/// Maximum scrypt parallelization parameter.
pub const MAX_SCRYPT_P: u32 = 16;

/// IV length for AES-128-CTR.
pub const IV_LENGTH: usize = 16;

/// Default salt length.
pub const SALT_LENGTH: usize = 32;

/// Checks the derived key length against [`MIN_DKLEN`] and [`MAX_DKLEN`].
pub(crate) fn check_dklen(dklen: usize) -> Result<(), String> {
    if !(MIN_DKLEN..=MAX_DKLEN).contains(&dklen) {
        return Err(format!(
            "dklen must be between {MIN_DKLEN} and {MAX_DKLEN}, got {dklen}"
        ));
    }
    Ok(())
}

/// Checks scrypt parameters: `n` a power of two, memory and `p` within bounds.
pub(crate) fn check_scrypt_params(n: u32, r: u32, p: u32) -> Result<(), String> {
    if n < 2 || !n.is_power_of_two() {
        return Err(format!("n must be a power of two, got {n}"));
    }
    if r == 0 || p == 0 {
        return Err(format!("r and p must be greater than 0, got r={r} p={p}"));
    }
    let memory = u64::from(n).saturating_mul(u64::from(r)).saturating_mul(128);
    if memory > MAX_SCRYPT_MEMORY {
        return Err(format!(
            "scrypt memory {memory} exceeds {MAX_SCRYPT_MEMORY} bytes (n={n}, r={r})"
        ));
    }
    if p > MAX_SCRYPT_P {
        return Err(format!("p must be at most {MAX_SCRYPT_P}, got {p}"));
    }
    Ok(())
}

/// Key derivation functions supported by the keystore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Kdf {
    /// scrypt with parameters `n`, `r`, `p`
    #[default]
    Scrypt,
    /// pbkdf2 with HMAC-SHA256 and `c` iterations
    Pbkdf2,
}

impl Kdf {
    /// Returns the keystore name of the function.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kdf::Scrypt => "scrypt",
            Kdf::Pbkdf2 => "pbkdf2",
        }
    }
}

impl fmt::Display for Kdf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kdf {
    type Err = KlaytnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scrypt" => Ok(Kdf::Scrypt),
            "pbkdf2" => Ok(Kdf::Pbkdf2),
            other => Err(KlaytnError::UnsupportedKdf(other.to_string())),
        }
    }
}

/// Options for encrypting keys into a keystore.
///
/// Salt, IV and id are generated per key when unset. Fixing all three makes
/// encryption deterministic.
///
/// # Example
///
/// ```rust
/// use klaytn_rust_sdk::keystore::{EncryptOptions, Kdf};
///
/// let options = EncryptOptions::builder()
///     .kdf(Kdf::Pbkdf2)
///     .c(4096)
///     .build();
/// assert_eq!(options.kdf, Kdf::Pbkdf2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptOptions {
    /// Key derivation function.
    /// Default: scrypt
    pub kdf: Kdf,
    /// Derived key length in bytes, at least 32.
    /// Default: 32
    pub dklen: usize,
    /// scrypt CPU/memory cost, a power of two.
    /// Default: 4096
    pub n: u32,
    /// scrypt block size.
    /// Default: 8
    pub r: u32,
    /// scrypt parallelization.
    /// Default: 1
    pub p: u32,
    /// pbkdf2 iteration count.
    /// Default: 262144
    pub c: u32,
    /// Cipher name; only `aes-128-ctr` is supported.
    pub cipher: String,
    /// KDF salt. Default: 32 random bytes per key
    pub salt: Option<Vec<u8>>,
    /// Cipher IV. Default: 16 random bytes per key
    pub iv: Option<[u8; IV_LENGTH]>,
    /// Keystore id. Default: a random v4 UUID
    pub uuid: Option<Uuid>,
}

impl Default for EncryptOptions {
    fn default() -> Self {
        Self {
            kdf: Kdf::Scrypt,
            dklen: MIN_DKLEN,
            n: 4096,
            r: 8,
            p: 1,
            c: 262_144,
            cipher: AES_128_CTR.to_string(),
            salt: None,
            iv: None,
            uuid: None,
        }
    }
}

impl EncryptOptions {
    /// Creates a new options builder.
    pub fn builder() -> EncryptOptionsBuilder {
        EncryptOptionsBuilder::default()
    }

    /// Creates options with the standard scrypt work factor.
    ///
    /// - n = 262144
    /// - r = 8, p = 1
    pub fn standard() -> Self {
        Self {
            n: 262_144,
            ..Self::default()
        }
    }

    /// Creates options with a light scrypt work factor for constrained
    /// environments.
    ///
    /// - n = 4096
    /// - r = 8, p = 6
    pub fn light() -> Self {
        Self {
            n: 4096,
            p: 6,
            ..Self::default()
        }
    }

    /// Checks the options before any key is derived.
    pub(crate) fn validate(&self) -> KlaytnResult<()> {
        if self.cipher.to_ascii_lowercase() != AES_128_CTR {
            return Err(KlaytnError::UnsupportedCipher(self.cipher.clone()));
        }
        check_dklen(self.dklen).map_err(KlaytnError::KeyDerivation)?;
        match self.kdf {
            Kdf::Scrypt => {
                check_scrypt_params(self.n, self.r, self.p).map_err(KlaytnError::KeyDerivation)
            }
            Kdf::Pbkdf2 if self.c == 0 => Err(KlaytnError::KeyDerivation(
                "c must be greater than 0".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Builder for [`EncryptOptions`].
#[derive(Debug, Clone, Default)]
pub struct EncryptOptionsBuilder {
    kdf: Option<Kdf>,
    dklen: Option<usize>,
    n: Option<u32>,
    r: Option<u32>,
    p: Option<u32>,
    c: Option<u32>,
    cipher: Option<String>,
    salt: Option<Vec<u8>>,
    iv: Option<[u8; IV_LENGTH]>,
    uuid: Option<Uuid>,
}

impl EncryptOptionsBuilder {
    /// Sets the key derivation function.
    pub fn kdf(mut self, kdf: Kdf) -> Self {
        self.kdf = Some(kdf);
        self
    }

    /// Sets the derived key length.
    pub fn dklen(mut self, dklen: usize) -> Self {
        self.dklen = Some(dklen);
        self
    }

    /// Sets the scrypt cost parameter.
    pub fn n(mut self, n: u32) -> Self {
        self.n = Some(n);
        self
    }

    /// Sets the scrypt block size.
    pub fn r(mut self, r: u32) -> Self {
        self.r = Some(r);
        self
    }

    /// Sets the scrypt parallelization.
    pub fn p(mut self, p: u32) -> Self {
        self.p = Some(p);
        self
    }

    /// Sets the pbkdf2 iteration count.
    pub fn c(mut self, c: u32) -> Self {
        self.c = Some(c);
        self
    }

    /// Sets the cipher name.
    pub fn cipher(mut self, cipher: impl Into<String>) -> Self {
        self.cipher = Some(cipher.into());
        self
    }

    /// Fixes the KDF salt.
    pub fn salt(mut self, salt: impl Into<Vec<u8>>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    /// Fixes the cipher IV.
    pub fn iv(mut self, iv: [u8; IV_LENGTH]) -> Self {
        self.iv = Some(iv);
        self
    }

    /// Fixes the keystore id.
    pub fn uuid(mut self, uuid: Uuid) -> Self {
        self.uuid = Some(uuid);
        self
    }

    /// Builds the options.
    pub fn build(self) -> EncryptOptions {
        let default = EncryptOptions::default();
        EncryptOptions {
            kdf: self.kdf.unwrap_or(default.kdf),
            dklen: self.dklen.unwrap_or(default.dklen),
            n: self.n.unwrap_or(default.n),
            r: self.r.unwrap_or(default.r),
            p: self.p.unwrap_or(default.p),
            c: self.c.unwrap_or(default.c),
            cipher: self.cipher.unwrap_or(default.cipher),
            salt: self.salt,
            iv: self.iv,
            uuid: self.uuid,
        }
    }
}
