use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::{FilterError, Result};

pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    ZlibDecoder::new(data).read_to_end(&mut out).map_err(|_| FilterError::Flate)?;
    Ok(out)
}

pub fn encode(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).map_err(|_| FilterError::Flate)?;
    encoder.finish().map_err(|_| FilterError::Flate.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_arbitrary_bytes() {
        let data: Vec<u8> = (0..=255u8).cycle().take(5000).collect();
        let encoded = encode(&data).unwrap();
        assert_eq!(decode(&encoded).unwrap(), data);
    }

    #[test]
    fn round_trips_empty_input() {
        let encoded = encode(&[]).unwrap();
        assert_eq!(decode(&encoded).unwrap(), Vec::<u8>::new());
    }
}
