use crate::error::{FilterError, Result};
use crate::{Dictionary, Object};

/// Undo a PNG (10-15) or TIFF (2) predictor applied before the filter
/// that `parms` describes, per ISO 32000-1 §7.4.4.4. Predictor 1 (none)
/// is a no-op.
pub fn apply(data: &[u8], parms: &Dictionary) -> Result<Vec<u8>> {
    let predictor = parms.get(b"Predictor").and_then(Object::as_i64).unwrap_or(1);
    if predictor <= 1 {
        return Ok(data.to_vec());
    }

    let colors = parms.get(b"Colors").and_then(Object::as_i64).unwrap_or(1).max(1) as usize;
    let bpc = parms.get(b"BitsPerComponent").and_then(Object::as_i64).unwrap_or(8).max(1) as usize;
    let columns = parms.get(b"Columns").and_then(Object::as_i64).unwrap_or(1).max(1) as usize;

    let bytes_per_pixel = (colors * bpc).div_ceil(8).max(1);
    let row_bytes = (colors * bpc * columns).div_ceil(8);
    if row_bytes == 0 {
        return Err(FilterError::Predictor.into());
    }

    if predictor == 2 {
        return Ok(undo_tiff(data, row_bytes, bytes_per_pixel));
    }

    undo_png(data, row_bytes, bytes_per_pixel)
}

fn undo_tiff(data: &[u8], row_bytes: usize, bpp: usize) -> Vec<u8> {
    let mut out = data.to_vec();
    for row in out.chunks_mut(row_bytes) {
        for i in bpp..row.len() {
            row[i] = row[i].wrapping_add(row[i - bpp]);
        }
    }
    out
}

fn undo_png(data: &[u8], row_bytes: usize, bpp: usize) -> Result<Vec<u8>> {
    let stride = row_bytes + 1;
    if data.len() % stride != 0 {
        return Err(FilterError::Predictor.into());
    }
    let rows = data.len() / stride;
    let mut out = vec![0u8; rows * row_bytes];
    let mut prior = vec![0u8; row_bytes];

    for r in 0..rows {
        let in_row = &data[r * stride..r * stride + stride];
        let filter_type = in_row[0];
        let raw = &in_row[1..];
        let out_row = &mut out[r * row_bytes..(r + 1) * row_bytes];

        for i in 0..row_bytes {
            let a = if i >= bpp { out_row[i - bpp] } else { 0 };
            let b = prior[i];
            let c = if i >= bpp { prior[i - bpp] } else { 0 };
            let recon = match filter_type {
                0 => raw[i],
                1 => raw[i].wrapping_add(a),
                2 => raw[i].wrapping_add(b),
                3 => raw[i].wrapping_add(((a as u16 + b as u16) / 2) as u8),
                4 => raw[i].wrapping_add(paeth(a, b, c)),
                _ => return Err(FilterError::Predictor.into()),
            };
            out_row[i] = recon;
        }
        prior.copy_from_slice(out_row);
    }

    Ok(out)
}

fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let (a, b, c) = (a as i32, b as i32, c as i32);
    let p = a + b - c;
    let pa = (p - a).abs();
    let pb = (p - b).abs();
    let pc = (p - c).abs();
    if pa <= pb && pa <= pc {
        a as u8
    } else if pb <= pc {
        b as u8
    } else {
        c as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predictor_one_is_identity() {
        let mut parms = Dictionary::new();
        parms.set("Predictor", 1i64);
        assert_eq!(apply(b"abc", &parms).unwrap(), b"abc");
    }

    #[test]
    fn tiff_predictor_undoes_horizontal_differencing() {
        // Two 3-byte rows, bpp 1: row deltas [10, 1, 1] and [5, 0, 0]
        // reconstruct to [10, 11, 12] and [5, 5, 5].
        let mut parms = Dictionary::new();
        parms.set("Predictor", 2i64);
        parms.set("Colors", 1i64);
        parms.set("BitsPerComponent", 8i64);
        parms.set("Columns", 3i64);
        let data = vec![10, 1, 1, 5, 0, 0];
        let out = apply(&data, &parms).unwrap();
        assert_eq!(out, vec![10, 11, 12, 5, 5, 5]);
    }

    #[test]
    fn png_predictor_none_passes_rows_through() {
        let mut parms = Dictionary::new();
        parms.set("Predictor", 15i64);
        parms.set("Colors", 1i64);
        parms.set("BitsPerComponent", 8i64);
        parms.set("Columns", 3i64);
        // filter byte 0 (None) for each row.
        let data = vec![0, 1, 2, 3, 0, 4, 5, 6];
        let out = apply(&data, &parms).unwrap();
        assert_eq!(out, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn invalid_stride_is_rejected() {
        let mut parms = Dictionary::new();
        parms.set("Predictor", 15i64);
        parms.set("Columns", 3i64);
        assert!(apply(&[0, 1, 2], &parms).is_err());
    }
}
