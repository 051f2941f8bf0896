//! Standard security handler glue: resolves `/Encrypt`, authenticates a
//! password, and exposes the derived state needed to decrypt (or, on the
//! writer side, encrypt) individual strings and streams.

mod aes_crypt;
mod crypt_filter;
pub(crate) mod pkcs5;
mod rc4;
mod standard_security_handler as ssh;

use stringprep::saslprep;

use crate::error::{DecryptionError, Error, Result};
use crate::{Dictionary, Document, Object, ObjectId};

pub use crypt_filter::CryptFilterMethod;

/// Everything derived from a successful password check: the file
/// encryption key and which crypt filter applies to strings vs. streams.
#[derive(Debug, Clone)]
pub struct EncryptionState {
    pub file_key: Vec<u8>,
    pub v: i64,
    pub r: i64,
    pub stream_method: CryptFilterMethod,
    pub string_method: CryptFilterMethod,
    pub encrypt_metadata: bool,
}

struct EncryptDict {
    v: i64,
    r: i64,
    o: Vec<u8>,
    u: Vec<u8>,
    oe: Vec<u8>,
    ue: Vec<u8>,
    p: i32,
    key_bits: usize,
    encrypt_metadata: bool,
    stream_method: CryptFilterMethod,
    string_method: CryptFilterMethod,
}

fn read_encrypt_dict(document: &Document) -> Result<EncryptDict> {
    let encrypt_ref = document.trailer.get(b"Encrypt").and_then(Object::as_reference)?;
    let encrypt_obj = document.objects.get(&encrypt_ref).ok_or(Error::from(DecryptionError::MissingKey("Encrypt")))?;
    let dict = encrypt_obj.as_dict()?;

    let v = dict.get(b"V").and_then(Object::as_i64).unwrap_or(0);
    let r = dict.get(b"R").and_then(Object::as_i64).unwrap_or(2);
    let o = dict.get(b"O").and_then(Object::as_str)?.to_vec();
    let u = dict.get(b"U").and_then(Object::as_str)?.to_vec();
    let oe = dict.get(b"OE").and_then(Object::as_str).map(<[u8]>::to_vec).unwrap_or_default();
    let ue = dict.get(b"UE").and_then(Object::as_str).map(<[u8]>::to_vec).unwrap_or_default();
    let p = dict.get(b"P").and_then(Object::as_i64).unwrap_or(0) as i32;
    let encrypt_metadata = dict.get(b"EncryptMetadata").and_then(Object::as_bool).unwrap_or(true);

    let key_bits = match dict.get(b"Length").and_then(Object::as_i64) {
        Ok(n) => n as usize,
        Err(_) if r >= 5 => 256,
        Err(_) => 40,
    };

    let (stream_method, string_method) = if v == 4 || v == 5 {
        let cf = dict.get(b"CF").and_then(Object::as_dict).ok();
        let stmf_name = dict.get(b"StmF").and_then(Object::as_name).unwrap_or(b"Identity");
        let strf_name = dict.get(b"StrF").and_then(Object::as_name).unwrap_or(b"Identity");
        (resolve_cf_method(cf, stmf_name)?, resolve_cf_method(cf, strf_name)?)
    } else {
        (CryptFilterMethod::Rc4, CryptFilterMethod::Rc4)
    };

    Ok(EncryptDict { v, r, o, u, oe, ue, p, key_bits, encrypt_metadata, stream_method, string_method })
}

fn resolve_cf_method(cf: Option<&Dictionary>, name: &[u8]) -> Result<CryptFilterMethod> {
    if name == b"Identity" {
        return Ok(CryptFilterMethod::Identity);
    }
    let cfm = cf
        .and_then(|cf| cf.get(name).ok())
        .and_then(|entry| entry.as_dict().ok())
        .and_then(|entry| entry.get(b"CFM").ok())
        .and_then(|m| m.as_name().ok())
        .unwrap_or(b"V2");
    CryptFilterMethod::from_name(cfm)
}

fn first_id(document: &Document) -> Vec<u8> {
    document
        .trailer
        .get(b"ID")
        .and_then(Object::as_array)
        .ok()
        .and_then(|arr| arr.first())
        .and_then(|id| id.as_str().ok())
        .map(<[u8]>::to_vec)
        .unwrap_or_default()
}

/// Try `password` against `/O` then `/U` (legacy) or Algorithm 8/9 (R5/R6),
/// returning the resulting file encryption key.
fn authenticate(document: &Document, password: &str) -> Result<(EncryptDict, Vec<u8>)> {
    let dict = read_encrypt_dict(document)?;
    let id0 = first_id(document);
    let normalized = if dict.r >= 5 { saslprep(password).map(|s| s.into_owned()).unwrap_or_else(|_| password.to_string()) } else { password.to_string() };
    let password_bytes = normalized.as_bytes();

    if dict.r >= 5 {
        let file_key = ssh::authenticate_r5_r6(password_bytes, &dict.u, &dict.ue, &dict.o, &dict.oe, dict.r)?;
        return Ok((dict, file_key));
    }

    let params = ssh::Parameters { v: dict.v, r: dict.r, key_bits: dict.key_bits, encrypt_metadata: dict.encrypt_metadata };

    // Owner password: recover the user password through Algorithm 7, then
    // validate that with Algorithm 2 as usual.
    let owner_user_password = ssh::recover_user_password_from_o(password_bytes, &dict.o, dict.r, dict.key_bits);
    for candidate in [password_bytes.to_vec(), owner_user_password] {
        let file_key = ssh::compute_file_key_legacy(&candidate, &dict.o, dict.p, &id0, params);
        let computed_u = ssh::compute_u_legacy(&file_key, &id0, dict.r);
        let matches = if dict.r == 2 { computed_u == dict.u } else { computed_u[..16] == dict.u[..16] };
        if matches {
            return Ok((dict, file_key));
        }
    }

    Err(DecryptionError::IncorrectPassword.into())
}

impl EncryptionState {
    pub fn decode(document: &Document, password: &str) -> Result<Self> {
        let (dict, file_key) = authenticate(document, password)?;
        Ok(EncryptionState {
            file_key,
            v: dict.v,
            r: dict.r,
            stream_method: dict.stream_method,
            string_method: dict.string_method,
            encrypt_metadata: dict.encrypt_metadata,
        })
    }

    fn object_key(&self, id: ObjectId, method: CryptFilterMethod) -> Vec<u8> {
        if self.r >= 5 {
            self.file_key.clone()
        } else {
            ssh::object_key(&self.file_key, id.0, id.1, matches!(method, CryptFilterMethod::Aes128))
        }
    }
}

/// Verify a password is correct without retaining derived key material.
pub fn check_password(document: &Document, password: &str) -> Result<()> {
    authenticate(document, password).map(|_| ())
}

/// Decrypt every string and stream payload inside `object` in place.
pub fn decrypt_object(state: &EncryptionState, id: ObjectId, object: &mut Object) -> Result<()> {
    walk_object(object, &mut |obj| match obj {
        Object::String(bytes, _) => {
            let key = state.object_key(id, state.string_method);
            *bytes = crypt_filter::decrypt(state.string_method, &key, bytes)?;
            Ok(())
        }
        Object::Stream(stream) => {
            if stream.dict.has_type(b"Metadata") && !state.encrypt_metadata {
                return Ok(());
            }
            let key = state.object_key(id, state.stream_method);
            stream.content = crypt_filter::decrypt(state.stream_method, &key, &stream.content)?;
            Ok(())
        }
        _ => Ok(()),
    })
}

/// Encrypt every string and stream payload inside `object` in place
/// (writer side, mirror of [`decrypt_object`]).
pub fn encrypt_object(state: &EncryptionState, id: ObjectId, object: &mut Object) -> Result<()> {
    walk_object(object, &mut |obj| match obj {
        Object::String(bytes, _) => {
            let key = state.object_key(id, state.string_method);
            *bytes = crypt_filter::encrypt(state.string_method, &key, bytes)?;
            Ok(())
        }
        Object::Stream(stream) => {
            if stream.dict.has_type(b"Metadata") && !state.encrypt_metadata {
                return Ok(());
            }
            let key = state.object_key(id, state.stream_method);
            let encrypted = crypt_filter::encrypt(state.stream_method, &key, &stream.content)?;
            stream.dict.set("Length", encrypted.len() as i64);
            stream.content = encrypted;
            Ok(())
        }
        _ => Ok(()),
    })
}

fn walk_object(object: &mut Object, f: &mut impl FnMut(&mut Object) -> Result<()>) -> Result<()> {
    match object {
        Object::Array(arr) => {
            for item in arr.iter_mut() {
                walk_object(item, f)?;
            }
            Ok(())
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter_mut() {
                walk_object(value, f)?;
            }
            Ok(())
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter_mut() {
                walk_object(value, f)?;
            }
            f(object)
        }
        Object::String(..) => f(object),
        _ => Ok(()),
    }
}
