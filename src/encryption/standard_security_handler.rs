//! The Standard Security Handler: password authentication and file/object
//! key derivation for encryption revisions R2 through R6.

use md5::{Digest as Md5Digest, Md5};
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::encryption::aes_crypt;
use crate::error::{DecryptionError, Result};

const PAD: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08, 0x2E, 0x2E, 0x00,
    0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];

/// Pad or truncate a password to exactly 32 bytes per Algorithm 2 step a).
fn pad_password(password: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let n = password.len().min(32);
    out[..n].copy_from_slice(&password[..n]);
    out[n..].copy_from_slice(&PAD[..32 - n]);
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameters {
    pub v: i64,
    pub r: i64,
    pub key_bits: usize,
    pub encrypt_metadata: bool,
}

/// R2-R4 (Algorithm 2): derive the file encryption key from the owner
/// password, permissions, first ID entry, and encrypt-metadata flag.
pub fn compute_file_key_legacy(password: &[u8], o: &[u8], p: i32, id0: &[u8], params: Parameters) -> Vec<u8> {
    let mut hasher = Md5::new();
    hasher.update(pad_password(password));
    hasher.update(&o[..32.min(o.len())]);
    hasher.update(p.to_le_bytes());
    hasher.update(id0);
    if params.r >= 4 && !params.encrypt_metadata {
        hasher.update([0xff, 0xff, 0xff, 0xff]);
    }
    let mut digest = hasher.finalize();

    let key_len = params.key_bits / 8;
    if params.r >= 3 {
        for _ in 0..50 {
            let mut h = Md5::new();
            h.update(&digest[..key_len]);
            digest = h.finalize();
        }
    }
    digest[..key_len].to_vec()
}

/// Algorithm 4/5: compute `/U` (or `/O`) for R2 (RC4 of the pad string)
/// or R3/R4 (19 extra RC4 rounds with XORed key bytes).
pub fn compute_u_legacy(file_key: &[u8], id0: &[u8], r: i64) -> Vec<u8> {
    if r == 2 {
        return crate::encryption::rc4::apply(file_key, &PAD);
    }

    let mut hasher = Md5::new();
    hasher.update(PAD);
    hasher.update(id0);
    let digest = hasher.finalize();

    let mut result = crate::encryption::rc4::apply(file_key, &digest);
    for i in 1u8..=19 {
        let round_key: Vec<u8> = file_key.iter().map(|&b| b ^ i).collect();
        result = crate::encryption::rc4::apply(&round_key, &result);
    }
    result.resize(32, 0);
    result
}

/// Algorithm 7 (owner password -> `/O`): RC4 the padded user password
/// through a key derived from the padded owner password, same rounds.
pub fn compute_o(owner_password: &[u8], user_password: &[u8], r: i64, key_bits: usize) -> Vec<u8> {
    let mut hasher = Md5::new();
    hasher.update(pad_password(owner_password));
    let mut digest = hasher.finalize();
    let key_len = key_bits / 8;
    if r >= 3 {
        for _ in 0..50 {
            let mut h = Md5::new();
            h.update(&digest[..key_len]);
            digest = h.finalize();
        }
    }
    let rc4_key = &digest[..key_len];

    let mut result = crate::encryption::rc4::apply(rc4_key, &pad_password(user_password));
    if r >= 3 {
        for i in 1u8..=19 {
            let round_key: Vec<u8> = rc4_key.iter().map(|&b| b ^ i).collect();
            result = crate::encryption::rc4::apply(&round_key, &result);
        }
    }
    result
}

/// Algorithm 7, run in reverse: recover the padded user password that was
/// RC4-encrypted under the owner-password-derived key to produce `/O`,
/// so an owner-password candidate can be validated via Algorithm 2.
pub fn recover_user_password_from_o(owner_password_candidate: &[u8], o: &[u8], r: i64, key_bits: usize) -> Vec<u8> {
    let mut hasher = Md5::new();
    hasher.update(pad_password(owner_password_candidate));
    let mut digest = hasher.finalize();
    let key_len = key_bits / 8;
    if r >= 3 {
        for _ in 0..50 {
            let mut h = Md5::new();
            h.update(&digest[..key_len]);
            digest = h.finalize();
        }
    }
    let rc4_key = &digest[..key_len];

    let mut result = o[..32.min(o.len())].to_vec();
    if r == 2 {
        crate::encryption::rc4::apply(rc4_key, &result)
    } else {
        for i in (1u8..=19).rev() {
            let round_key: Vec<u8> = rc4_key.iter().map(|&b| b ^ i).collect();
            result = crate::encryption::rc4::apply(&round_key, &result);
        }
        crate::encryption::rc4::apply(rc4_key, &result)
    }
}

/// Algorithm 2.B (ISO 32000-2, used by both draft R5 and final R6):
/// an iterated SHA-256/384/512 hash over `password || salt [|| udata]`.
fn hash_2b(password: &[u8], salt: &[u8], udata: &[u8], r: i64) -> [u8; 32] {
    let mut input = Vec::with_capacity(password.len() + salt.len() + udata.len());
    input.extend_from_slice(password);
    input.extend_from_slice(salt);
    input.extend_from_slice(udata);

    let mut k: Vec<u8> = Sha256::digest(&input).to_vec();

    if r < 6 {
        // The draft (R5) algorithm has no round loop.
        let mut out = [0u8; 32];
        out.copy_from_slice(&k);
        return out;
    }

    let mut round = 0usize;
    loop {
        let mut k1 = Vec::with_capacity(64 * (password.len() + k.len() + udata.len()));
        for _ in 0..64 {
            k1.extend_from_slice(password);
            k1.extend_from_slice(&k);
            k1.extend_from_slice(udata);
        }

        let key = &k[..16];
        let iv = &k[16..32];
        let e = aes_cbc_no_pad_encrypt(key, iv, &k1);

        let modulus: u32 = e[..16].iter().fold(0u32, |acc, &b| acc + b as u32) % 3;
        k = match modulus {
            0 => Sha256::digest(&e).to_vec(),
            1 => Sha384::digest(&e).to_vec(),
            _ => Sha512::digest(&e).to_vec(),
        };

        round += 1;
        if round >= 64 && (*e.last().unwrap() as usize) <= round - 32 {
            break;
        }
    }

    let mut out = [0u8; 32];
    out.copy_from_slice(&k[..32]);
    out
}

/// AES-128-CBC, no padding, used only inside Algorithm 2.B's round
/// function where the input is already a multiple of the block size.
fn aes_cbc_no_pad_encrypt(key: &[u8], iv: &[u8], data: &[u8]) -> Vec<u8> {
    use aes::cipher::{BlockEncryptMut, KeyIvInit};
    use cbc::Encryptor;

    let mut buf = data.to_vec();
    let mut encryptor = Encryptor::<aes::Aes128>::new(key.into(), iv.into());
    let blocks = buf.len() / 16;
    let (chunks, _) = buf.split_at_mut(blocks * 16);
    for block in chunks.chunks_mut(16) {
        encryptor.encrypt_block_mut(block.into());
    }
    buf
}

/// R5/R6 (Algorithm 8/9): verify `password` against `/U` or `/O`,
/// deriving the AES-256 file key from the matching key-salt on success.
pub fn authenticate_r5_r6(
    password: &[u8], u: &[u8], ue: &[u8], o: &[u8], oe: &[u8], r: i64,
) -> Result<Vec<u8>> {
    if u.len() < 48 || o.len() < 48 {
        return Err(DecryptionError::MissingKey("U/O").into());
    }

    let u_validation_salt = &u[32..40];
    let u_key_salt = &u[40..48];
    let o_validation_salt = &o[32..40];
    let o_key_salt = &o[40..48];

    // Try as owner password first (owner hash also mixes in U).
    let owner_hash = hash_2b(password, o_validation_salt, &u[..48], r);
    if owner_hash[..] == o[..32] {
        let intermediate = hash_2b(password, o_key_salt, &u[..48], r);
        return Ok(decrypt_file_key(&intermediate, oe));
    }

    let user_hash = hash_2b(password, u_validation_salt, &[], r);
    if user_hash[..] == u[..32] {
        let intermediate = hash_2b(password, u_key_salt, &[], r);
        return Ok(decrypt_file_key(&intermediate, ue));
    }

    Err(DecryptionError::IncorrectPassword.into())
}

fn decrypt_file_key(intermediate_key: &[u8], encrypted_key: &[u8]) -> Vec<u8> {
    use aes::cipher::{BlockDecryptMut, KeyIvInit};
    use cbc::Decryptor;

    let iv = [0u8; 16];
    let mut buf = encrypted_key[..32].to_vec();
    let mut decryptor = Decryptor::<aes::Aes256>::new(intermediate_key.into(), (&iv).into());
    for block in buf.chunks_mut(16) {
        decryptor.decrypt_block_mut(block.into());
    }
    buf
}

/// Decode a 16-byte `/Perms` block (R5/R6) and confirm the "adb" marker.
pub fn decode_perms(file_key: &[u8; 32], perms: &[u8; 16]) -> Result<[u8; 16]> {
    let decoded = aes_crypt::ecb_decrypt_block(file_key, perms);
    if &decoded[5..8] != b"adb" {
        return Err(DecryptionError::IncorrectPassword.into());
    }
    Ok(decoded)
}

/// Encode a fresh `/Perms` block for R5/R6, with random bytes 12-15.
pub fn encode_perms(file_key: &[u8; 32], permissions: i32, encrypt_metadata: bool, random: [u8; 4]) -> [u8; 16] {
    let mut block = [0u8; 16];
    block[..4].copy_from_slice(&permissions.to_le_bytes());
    block[4] = if encrypt_metadata { b'T' } else { b'F' };
    block[5] = b'a';
    block[6] = b'd';
    block[7] = b'b';
    block[8..12].copy_from_slice(&permissions.to_le_bytes());
    block[12..].copy_from_slice(&random);
    aes_crypt::ecb_encrypt_block(file_key, &block)
}

/// Algorithm 1 (per-object key, R2-R4): `MD5(fileKey || objNum_le3 ||
/// gen_le2 [|| "sAlT"])`, truncated to `min(keyBytes+5, 16)`.
pub fn object_key(file_key: &[u8], object_number: u32, generation: u16, is_aes: bool) -> Vec<u8> {
    let mut hasher = Md5::new();
    hasher.update(file_key);
    hasher.update(&object_number.to_le_bytes()[..3]);
    hasher.update(&generation.to_le_bytes()[..2]);
    if is_aes {
        hasher.update(b"sAlT");
    }
    let digest = hasher.finalize();
    let len = (file_key.len() + 5).min(16);
    digest[..len].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_7_reverses_cleanly_for_r4() {
        let owner_password = b"owner-secret";
        let user_password = pad_password(b"user-secret");
        let o = compute_o(owner_password, &user_password, 4, 128);
        let recovered = recover_user_password_from_o(owner_password, &o, 4, 128);
        assert_eq!(recovered, user_password.to_vec());
    }

    #[test]
    fn algorithm_7_reverses_cleanly_for_r2() {
        let owner_password = b"owner-secret";
        let user_password = pad_password(b"user-secret");
        let o = compute_o(owner_password, &user_password, 2, 40);
        let recovered = recover_user_password_from_o(owner_password, &o, 2, 40);
        assert_eq!(recovered, user_password.to_vec());
    }

    #[test]
    fn owner_password_authenticates_via_recovered_user_password() {
        let owner_password = b"owner-secret";
        let user_password = b"";
        let id0 = b"some-file-id";
        let params = Parameters { v: 2, r: 3, key_bits: 128, encrypt_metadata: true };

        let padded_user = pad_password(user_password);
        let o = compute_o(owner_password, &padded_user, params.r, params.key_bits);
        let file_key = compute_file_key_legacy(user_password, &o, -4, id0, params);
        let u = compute_u_legacy(&file_key, id0, params.r);

        let recovered_user_password = recover_user_password_from_o(owner_password, &o, params.r, params.key_bits);
        let owner_file_key = compute_file_key_legacy(&recovered_user_password, &o, -4, id0, params);
        let computed_u = compute_u_legacy(&owner_file_key, id0, params.r);

        assert_eq!(computed_u[..16], u[..16]);
    }

    #[test]
    fn perms_block_round_trips_through_aes_ecb() {
        let file_key = [0x11u8; 32];
        let encoded = encode_perms(&file_key, -4, true, [1, 2, 3, 4]);
        let decoded = decode_perms(&file_key, &encoded).unwrap();
        assert_eq!(&decoded[..4], &(-4i32).to_le_bytes());
        assert_eq!(decoded[4], b'T');
        assert_eq!(&decoded[5..8], b"adb");
    }

    #[test]
    fn object_key_differs_by_object_number_and_truncates_for_short_file_keys() {
        let file_key = [0xAAu8; 5];
        let k1 = object_key(&file_key, 1, 0, false);
        let k2 = object_key(&file_key, 2, 0, false);
        assert_ne!(k1, k2);
        assert_eq!(k1.len(), 10);
    }

    #[test]
    fn hash_2b_r6_differs_from_r5_for_same_inputs() {
        let r5 = hash_2b(b"password", b"salt----", b"", 5);
        let r6 = hash_2b(b"password", b"salt----", b"", 6);
        assert_ne!(r5, r6);
    }
}
