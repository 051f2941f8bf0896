use crate::encryption::{aes_crypt, rc4};
use crate::error::{DecryptionError, Result};

/// Which cipher a crypt filter name (`/V2`, `/AESV2`, `/AESV3`, `/Identity`)
/// resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptFilterMethod {
    Identity,
    Rc4,
    Aes128,
    Aes256,
}

impl CryptFilterMethod {
    pub fn from_name(name: &[u8]) -> Result<Self> {
        match name {
            b"Identity" => Ok(CryptFilterMethod::Identity),
            b"V2" => Ok(CryptFilterMethod::Rc4),
            b"AESV2" => Ok(CryptFilterMethod::Aes128),
            b"AESV3" => Ok(CryptFilterMethod::Aes256),
            other => Err(DecryptionError::UnknownCryptFilter(String::from_utf8_lossy(other).into_owned()).into()),
        }
    }
}

pub fn decrypt(method: CryptFilterMethod, key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    match method {
        CryptFilterMethod::Identity => Ok(data.to_vec()),
        CryptFilterMethod::Rc4 => Ok(rc4::apply(key, data)),
        CryptFilterMethod::Aes128 | CryptFilterMethod::Aes256 => aes_crypt::cbc_decrypt(key, data),
    }
}

pub fn encrypt(method: CryptFilterMethod, key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    match method {
        CryptFilterMethod::Identity => Ok(data.to_vec()),
        CryptFilterMethod::Rc4 => Ok(rc4::apply(key, data)),
        CryptFilterMethod::Aes128 | CryptFilterMethod::Aes256 => aes_crypt::cbc_encrypt(key, data),
    }
}
