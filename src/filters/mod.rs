//! Stream filter/codec pipeline.
//!
//! Each filter is a pure `&[u8] -> Result<Vec<u8>>` function; the writer
//! applies the encode half, the reader the decode half. `Stream::decompressed_content`
//! drives the chain when `/Filter` is an array.

mod ascii85;
mod asciihex;
mod flate;
mod lzw;
mod predictor;
mod runlength;

use crate::error::{FilterError, Result};
use crate::Dictionary;

/// Decode `data` through the named filter.
pub fn decode(name: &[u8], data: &[u8], parms: &Dictionary) -> Result<Vec<u8>> {
    let decoded = match name {
        b"FlateDecode" | b"Fl" => flate::decode(data)?,
        b"ASCII85Decode" | b"A85" => ascii85::decode(data)?,
        b"ASCIIHexDecode" | b"AHx" => asciihex::decode(data)?,
        b"LZWDecode" | b"LZW" => lzw::decode(data, parms)?,
        b"RunLengthDecode" | b"RL" => runlength::decode(data)?,
        // Opaque image codecs: never re-encoded, passed through untouched.
        b"DCTDecode" | b"DCT" | b"JPXDecode" | b"CCITTFaxDecode" | b"CCF" => data.to_vec(),
        other => return Err(FilterError::Unsupported(String::from_utf8_lossy(other).into_owned()).into()),
    };
    predictor::apply(&decoded, parms)
}

/// Encode `data` through the named filter (writer side). Predictors are
/// never applied on encode: the writer always emits predictor-free
/// streams, letting FlateDecode alone do the work.
pub fn encode(name: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    match name {
        b"FlateDecode" | b"Fl" => flate::encode(data),
        b"ASCII85Decode" | b"A85" => Ok(ascii85::encode(data)),
        b"ASCIIHexDecode" | b"AHx" => Ok(asciihex::encode(data)),
        b"RunLengthDecode" | b"RL" => Ok(runlength::encode(data)),
        other => Err(FilterError::Unsupported(String::from_utf8_lossy(other).into_owned()).into()),
    }
}
