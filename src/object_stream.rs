use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::parser::{self, ParserInput};
use crate::{Object, ObjectId, Stream};

/// An unpacked `/Type /ObjStm` object stream: the decoded payload begins
/// with `N` pairs of `(objNum, relativeOffset)` as ASCII integers,
/// followed by the concatenated object values, starting at byte `/First`.
pub struct ObjectStream {
    pub objects: BTreeMap<ObjectId, Object>,
}

impl ObjectStream {
    pub fn new(stream: &mut Stream) -> Result<Self> {
        let data = stream.decompressed_content()?;

        let n = stream.dict.get(b"N").and_then(Object::as_i64)? as usize;
        let first = stream.dict.get(b"First").and_then(Object::as_i64)? as usize;

        let header = std::str::from_utf8(data.get(..first).unwrap_or(&data[..]))
            .map_err(|_| Error::InvalidStream("object stream header is not ASCII".into()))?;

        let mut header_tokens = header.split_ascii_whitespace();
        let mut offsets = Vec::with_capacity(n);
        for _ in 0..n {
            let obj_num: u32 = header_tokens
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| Error::InvalidStream("malformed object stream header".into()))?;
            let rel_offset: usize = header_tokens
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| Error::InvalidStream("malformed object stream header".into()))?;
            offsets.push((obj_num, rel_offset));
        }

        let mut objects = BTreeMap::new();
        for (i, (obj_num, rel_offset)) in offsets.iter().enumerate() {
            let start = first + rel_offset;
            if start > data.len() {
                continue;
            }
            let end = offsets
                .get(i + 1)
                .map(|(_, next_rel)| first + next_rel)
                .unwrap_or(data.len())
                .min(data.len());
            let slice = &data[start..end];
            let span = ParserInput::new_extra(slice, "object_stream");
            if let Some(obj) = parser::direct_object(span) {
                objects.insert((*obj_num, 0), obj);
            }
        }

        Ok(ObjectStream { objects })
    }
}
