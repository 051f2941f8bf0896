use crate::error::{FilterError, Result};

/// RunLengthDecode (ISO 32000-1 §7.4.5): a length byte `0..=127` copies
/// the next `len+1` literal bytes; `129..=255` repeats the following byte
/// `257-len` times; `128` (EOD) ends the stream.
pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < data.len() {
        let len = data[i];
        i += 1;
        match len {
            0..=127 => {
                let n = len as usize + 1;
                let end = i + n;
                if end > data.len() {
                    return Err(FilterError::RunLength.into());
                }
                out.extend_from_slice(&data[i..end]);
                i = end;
            }
            128 => break,
            _ => {
                let b = *data.get(i).ok_or(FilterError::RunLength)?;
                out.extend(std::iter::repeat(b).take(257 - len as usize));
                i += 1;
            }
        }
    }
    Ok(out)
}

pub fn encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < data.len() {
        let run_end = (i + 1..data.len()).find(|&j| data[j] != data[i]).unwrap_or(data.len());
        let run_len = run_end - i;
        if run_len >= 2 {
            let mut remaining = run_len;
            while remaining > 0 {
                let take = remaining.min(128);
                out.push((257 - take) as u8);
                out.push(data[i]);
                remaining -= take;
            }
            i = run_end;
        } else {
            let lit_end = (i + 1..data.len())
                .find(|&j| j + 1 < data.len() && data[j] == data[j + 1])
                .map(|j| j + 1)
                .unwrap_or(data.len());
            let lit_end = lit_end.min(i + 128);
            out.push((lit_end - i - 1) as u8);
            out.extend_from_slice(&data[i..lit_end]);
            i = lit_end;
        }
    }
    out.push(128);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_mixed_literal_and_repeat_runs() {
        let mut data = Vec::new();
        data.extend_from_slice(b"abcdef");
        data.extend(std::iter::repeat(b'x').take(200));
        data.extend_from_slice(b"ghi");
        let encoded = encode(&data);
        assert_eq!(decode(&encoded).unwrap(), data);
    }

    #[test]
    fn round_trips_empty_input() {
        assert_eq!(decode(&encode(&[])).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn decode_stops_at_eod_marker() {
        assert_eq!(decode(&[2, b'a', b'b', b'c', 128, 0, b'z']).unwrap(), b"abc");
    }
}
