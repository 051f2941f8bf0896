use crate::error::{FilterError, Result};

pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    let mut nibbles = Vec::with_capacity(data.len());
    for &b in data {
        match b {
            b'>' => break,
            b' ' | b'\t' | b'\r' | b'\n' | 0x0C | 0x00 => continue,
            b'0'..=b'9' => nibbles.push(b - b'0'),
            b'a'..=b'f' => nibbles.push(b - b'a' + 10),
            b'A'..=b'F' => nibbles.push(b - b'A' + 10),
            _ => return Err(FilterError::AsciiHex.into()),
        }
    }
    if nibbles.len() % 2 == 1 {
        nibbles.push(0);
    }
    Ok(nibbles.chunks_exact(2).map(|pair| (pair[0] << 4) | pair[1]).collect())
}

pub fn encode(data: &[u8]) -> Vec<u8> {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = Vec::with_capacity(data.len() * 2 + 1);
    for &b in data {
        out.push(HEX[(b >> 4) as usize]);
        out.push(HEX[(b & 0x0F) as usize]);
    }
    out.push(b'>');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_arbitrary_bytes() {
        let data: Vec<u8> = (0..=255u8).collect();
        let encoded = encode(&data);
        assert_eq!(decode(&encoded).unwrap(), data);
    }

    #[test]
    fn decode_ignores_whitespace_between_digits() {
        assert_eq!(decode(b"48 65 6C 6C 6F>").unwrap(), b"Hello");
    }

    #[test]
    fn decode_pads_odd_nibble_count_with_zero() {
        assert_eq!(decode(b"4>").unwrap(), vec![0x40]);
    }
}
