//! RC4 keystream: Key Scheduling Algorithm + Pseudo-Random Generation
//! Algorithm, straight from the cipher's original public description.
//! Symmetric: encrypt and decrypt are the same XOR-with-keystream.

pub fn apply(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut s: [u8; 256] = std::array::from_fn(|i| i as u8);
    let mut j: u8 = 0;
    for i in 0..256 {
        j = j.wrapping_add(s[i]).wrapping_add(key[i % key.len()]);
        s.swap(i, j as usize);
    }

    let mut out = Vec::with_capacity(data.len());
    let (mut i, mut j) = (0u8, 0u8);
    for &byte in data {
        i = i.wrapping_add(1);
        j = j.wrapping_add(s[i as usize]);
        s.swap(i as usize, j as usize);
        let k = s[(s[i as usize].wrapping_add(s[j as usize])) as usize];
        out.push(byte ^ k);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 6229 section 2, first 16 keystream bytes, XORed against zero
    // plaintext so `apply` returns the keystream directly.
    #[test]
    fn rfc6229_40_bit_key() {
        let key = [0x01, 0x02, 0x03, 0x04, 0x05];
        let keystream = apply(&key, &[0u8; 16]);
        assert_eq!(keystream, [0xb2, 0x39, 0x63, 0x05, 0xf0, 0x3d, 0xc0, 0x27, 0xcc, 0xc3, 0x52, 0x4a, 0x0a, 0x11, 0x18, 0xa8]);
    }

    #[test]
    fn rfc6229_56_bit_key() {
        let key = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        let keystream = apply(&key, &[0u8; 16]);
        assert_eq!(keystream, [0x29, 0x3f, 0x02, 0xd4, 0x7f, 0x37, 0xc9, 0xb6, 0x33, 0xf2, 0xaf, 0x52, 0x85, 0xfe, 0xb4, 0x6b]);
    }

    #[test]
    fn rfc6229_64_bit_key() {
        let key = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        let keystream = apply(&key, &[0u8; 16]);
        assert_eq!(keystream, [0x97, 0xab, 0x8a, 0x1b, 0xf0, 0xaf, 0xb9, 0x61, 0x32, 0xf2, 0xf6, 0x72, 0x58, 0xda, 0x15, 0xa8]);
    }

    #[test]
    fn rfc6229_128_bit_key() {
        let key = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f, 0x10];
        let keystream = apply(&key, &[0u8; 16]);
        assert_eq!(keystream, [0x9a, 0xc7, 0xcc, 0x9a, 0x60, 0x9d, 0x1e, 0xf7, 0xb2, 0x93, 0x28, 0x99, 0xcd, 0xe4, 0x1b, 0x97]);
    }

    #[test]
    fn rc4_is_involutive() {
        let key = b"a pdf file key!!";
        let plaintext = b"the quick brown fox";
        let cipher = apply(key, plaintext);
        let round_trip = apply(key, &cipher);
        assert_eq!(round_trip, plaintext);
    }
}
