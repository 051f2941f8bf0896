use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit};
use aes::{Aes128, Aes256};
use cbc::{Decryptor, Encryptor};
use ecb::{Decryptor as EcbDecryptor, Encryptor as EcbEncryptor};
use rand::RngCore;

use crate::encryption::pkcs5::Pkcs5;
use crate::error::{DecryptionError, Result};

/// AES-CBC decrypt: the first 16 bytes of `data` are the IV, PKCS#5
/// padding (byte-for-byte compatible with PKCS#7 for 16-byte blocks)
/// covers the tail.
pub fn cbc_decrypt(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < 16 {
        return Err(DecryptionError::Padding.into());
    }
    let (iv, ciphertext) = data.split_at(16);
    let plaintext = match key.len() {
        16 => Decryptor::<Aes128>::new(key.into(), iv.into())
            .decrypt_padded_vec_mut::<Pkcs5>(ciphertext)
            .map_err(|_| DecryptionError::Padding)?,
        32 => Decryptor::<Aes256>::new(key.into(), iv.into())
            .decrypt_padded_vec_mut::<Pkcs5>(ciphertext)
            .map_err(|_| DecryptionError::Padding)?,
        n => return Err(DecryptionError::KeyLength { expected: 16, actual: n }.into()),
    };
    Ok(plaintext)
}

/// AES-CBC encrypt with a fresh random IV prepended to the ciphertext.
pub fn cbc_encrypt(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut iv = [0u8; 16];
    rand::rng().fill_bytes(&mut iv);

    let ciphertext = match key.len() {
        16 => Encryptor::<Aes128>::new(key.into(), (&iv).into()).encrypt_padded_vec_mut::<Pkcs7>(data),
        32 => Encryptor::<Aes256>::new(key.into(), (&iv).into()).encrypt_padded_vec_mut::<Pkcs7>(data),
        n => return Err(DecryptionError::KeyLength { expected: 16, actual: n }.into()),
    };

    let mut out = Vec::with_capacity(16 + ciphertext.len());
    out.extend_from_slice(&iv);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Single-block AES-ECB, no padding — used only for the R5/R6 `/Perms`
/// word, which is always exactly 16 bytes.
pub fn ecb_decrypt_block(key: &[u8; 32], block: &[u8; 16]) -> [u8; 16] {
    let mut buf = *block;
    EcbDecryptor::<Aes256>::new(key.into()).decrypt_block_mut((&mut buf).into());
    buf
}

pub fn ecb_encrypt_block(key: &[u8; 32], block: &[u8; 16]) -> [u8; 16] {
    let mut buf = *block;
    EcbEncryptor::<Aes256>::new(key.into()).encrypt_block_mut((&mut buf).into());
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    // FIPS 197 Appendix C.3: AES-256, known key/plaintext/ciphertext.
    #[test]
    fn fips197_c3_vector() {
        let key: [u8; 32] = [
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f, 0x10, 0x11,
            0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1a, 0x1b, 0x1c, 0x1d, 0x1e, 0x1f,
        ];
        let plaintext: [u8; 16] =
            [0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff];
        let expected: [u8; 16] =
            [0x8e, 0xa2, 0xb7, 0xca, 0x51, 0x67, 0x45, 0xbf, 0xea, 0xfc, 0x49, 0x90, 0x4b, 0x49, 0x60, 0x89];

        let cipher = ecb_encrypt_block(&key, &plaintext);
        assert_eq!(cipher, expected);
        let round_trip = ecb_decrypt_block(&key, &cipher);
        assert_eq!(round_trip, plaintext);
    }

    #[test]
    fn cbc_round_trip_128() {
        let key = [0x42u8; 16];
        let plaintext = b"a message that spans more than one AES block boundary";
        let cipher = cbc_encrypt(&key, plaintext).unwrap();
        let round_trip = cbc_decrypt(&key, &cipher).unwrap();
        assert_eq!(round_trip, plaintext);
    }
}
