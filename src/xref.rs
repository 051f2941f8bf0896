use std::collections::BTreeMap;

use crate::error::{Error, ParseError, Result, XrefError};
use crate::{Dictionary, Object, Stream};

/// One cross-reference table/stream entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XrefEntry {
    /// Object is free; `generation` is the generation it will carry the
    /// next time its number is reused.
    Free { generation: u16 },
    /// Object lives at `offset` bytes from the start of the file, with
    /// the given generation.
    Normal { offset: u32, generation: u16 },
    /// Object is compressed inside object stream `container`, at
    /// `index` within that stream's object list. Always generation 0.
    Compressed { container: u32, index: u16 },
    /// A free-list head whose "next free" pointer doesn't resolve to a
    /// real object (e.g. a self-referencing head in a single-object
    /// document). Kept distinct from `Free` so writers don't try to
    /// chain through it.
    UnusableFree,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XrefType {
    CrossReferenceTable,
    CrossReferenceStream,
}

/// The cross-reference index: object number -> entry.
///
/// Kept in a `BTreeMap` rather than a `Vec` because xref sections from
/// incremental updates are sparse (only changed objects), and iteration
/// order must be deterministic (ascending object number) so xref table
/// emission is reproducible.
#[derive(Debug, Clone)]
pub struct Xref {
    pub entries: BTreeMap<u32, XrefEntry>,
    pub size: u32,
    pub xref_type: XrefType,
}

impl Xref {
    pub fn new(size: u32, xref_type: XrefType) -> Self {
        Xref {
            entries: BTreeMap::new(),
            size,
            xref_type,
        }
    }

    pub fn insert(&mut self, object_number: u32, entry: XrefEntry) {
        self.entries.insert(object_number, entry);
    }

    pub fn get(&self, object_number: u32) -> Option<&XrefEntry> {
        self.entries.get(&object_number)
    }

    pub fn max_id(&self) -> u32 {
        self.entries.keys().copied().max().unwrap_or(0)
    }

    /// Merge an older (further-`/Prev`) xref section into this one.
    /// Entries already present (from a section closer to EOF) win;
    /// PDF says the most recent xref section takes precedence.
    pub fn merge(&mut self, older: Xref) {
        for (id, entry) in older.entries {
            self.entries.entry(id).or_insert(entry);
        }
        if older.size > self.size {
            self.size = older.size;
        }
    }
}

/// Decode a `/Type /XRef` cross-reference stream (ISO 32000-1 §7.5.8).
///
/// The decompressed payload is a flat byte array of fixed-width records,
/// `/W [w1 w2 w3]` bytes wide, one record per object number named by
/// `/Index` (defaulting to `[0 Size]`).
pub fn decode_xref_stream(mut stream: Stream) -> Result<(Xref, Dictionary)> {
    let data = stream.decompressed_content()?;

    let widths: Vec<usize> = stream
        .dict
        .get(b"W")
        .and_then(Object::as_array)
        .map_err(|_| Error::Xref(XrefError::MissingStreamField))?
        .iter()
        .map(|o| o.as_i64().map(|w| w as usize))
        .collect::<Result<Vec<_>>>()?;

    if widths.len() != 3 {
        return Err(Error::Xref(XrefError::MissingStreamField));
    }
    let (w0, w1, w2) = (widths[0], widths[1], widths[2]);
    let record_len = w0 + w1 + w2;
    if record_len == 0 {
        return Err(Error::Xref(XrefError::MalformedWidths));
    }

    let size = stream.dict.get(b"Size").and_then(Object::as_i64).map_err(|_| Error::Xref(XrefError::MissingStreamField))? as u32;

    let index: Vec<(u32, u32)> = match stream.dict.get(b"Index") {
        Ok(Object::Array(arr)) => arr
            .chunks(2)
            .filter_map(|pair| match pair {
                [a, b] => Some((a.as_i64().ok()? as u32, b.as_i64().ok()? as u32)),
                _ => None,
            })
            .collect(),
        _ => vec![(0, size)],
    };

    if data.len() % record_len != 0 {
        return Err(Error::Xref(XrefError::MalformedWidths));
    }

    let mut xref = Xref::new(size, XrefType::CrossReferenceStream);
    let mut cursor = 0usize;
    for (start, count) in index {
        for i in 0..count {
            if cursor + record_len > data.len() {
                break;
            }
            let record = &data[cursor..cursor + record_len];
            cursor += record_len;

            let field = |offset: usize, width: usize, default: u64| -> u64 {
                if width == 0 {
                    return default;
                }
                record[offset..offset + width].iter().fold(0u64, |acc, &b| (acc << 8) | b as u64)
            };

            let obj_type = field(0, w0, 1);
            let f2 = field(w0, w1, 0);
            let f3 = field(w0 + w1, w2, 0);

            let entry = match obj_type {
                0 => XrefEntry::Free { generation: f3 as u16 },
                1 => XrefEntry::Normal { offset: f2 as u32, generation: f3 as u16 },
                2 => XrefEntry::Compressed { container: f2 as u32, index: f3 as u16 },
                _ => continue,
            };
            xref.insert(start + i, entry);
        }
    }

    let trailer = std::mem::take(&mut stream.dict);
    Ok((xref, trailer))
}
