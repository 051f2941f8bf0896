use weezl::decode::Decoder;
use weezl::BitOrder;

use crate::error::{FilterError, Result};
use crate::{Dictionary, Object};

pub fn decode(data: &[u8], parms: &Dictionary) -> Result<Vec<u8>> {
    let early_change = parms.get(b"EarlyChange").and_then(Object::as_i64).unwrap_or(1) != 0;
    let mut decoder =
        if early_change { Decoder::with_tiff_size_switch(BitOrder::Msb, 8) } else { Decoder::new(BitOrder::Msb, 8) };
    decoder.decode(data).map_err(|_| FilterError::Lzw.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use weezl::encode::Encoder;

    #[test]
    fn decodes_data_produced_by_the_matching_tiff_encoder() {
        let data = b"TOBEORNOTTOBEORTOBEORNOT".repeat(4);
        let encoded = Encoder::with_tiff_size_switch(BitOrder::Msb, 8).encode(&data).unwrap();
        assert_eq!(decode(&encoded, &Dictionary::new()).unwrap(), data);
    }

    #[test]
    fn honors_early_change_zero() {
        let data = b"some repeated repeated repeated data".to_vec();
        let encoded = Encoder::new(BitOrder::Msb, 8).encode(&data).unwrap();
        let mut parms = Dictionary::new();
        parms.set("EarlyChange", 0i64);
        assert_eq!(decode(&encoded, &parms).unwrap(), data);
    }
}
