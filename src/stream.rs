use crate::error::{Error, FilterError, Result};
use crate::filters;
use crate::Dictionary;

/// A Dictionary plus a byte payload.
///
/// `content` always holds the *raw* (still-filtered) bytes currently on
/// record for this stream; decoded bytes are produced on demand via
/// [`Stream::decompressed_content`]. `/Length` is not trusted as a cache
/// key — it is recomputed from `content.len()` whenever the stream is
/// written.
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    pub dict: Dictionary,
    pub content: Vec<u8>,
    /// Byte offset, relative to the start of the indirect object, where
    /// the raw content begins. Set by the parser when `/Length` could not
    /// be resolved immediately (e.g. an indirect reference not yet
    /// parsed); the reader fills `content` in a second pass once it is
    /// known.
    pub start_position: Option<usize>,
    /// Whether this stream's raw bytes may be recompressed. `false` for
    /// DCTDecode/JPXDecode streams, which hold opaque image data that
    /// must never be re-encoded.
    pub allow_compression: bool,
}

impl Stream {
    pub fn new(mut dict: Dictionary, content: Vec<u8>) -> Self {
        dict.set("Length", content.len() as i64);
        let allow_compression = !matches!(
            dict.get(b"Filter").and_then(|f| f.as_name()),
            Ok(b"DCTDecode") | Ok(b"JPXDecode")
        );
        Stream {
            dict,
            content,
            start_position: None,
            allow_compression,
        }
    }

    pub fn with_position(dict: Dictionary, start_position: usize) -> Self {
        Stream {
            dict,
            content: Vec::new(),
            start_position: Some(start_position),
            allow_compression: true,
        }
    }

    pub fn set_content(&mut self, content: Vec<u8>) {
        self.dict.set("Length", content.len() as i64);
        self.content = content;
    }

    /// Filter names in decode order, as declared by `/Filter`.
    pub fn filter_names(&self) -> Result<Vec<Vec<u8>>> {
        match self.dict.get(b"Filter") {
            Ok(crate::Object::Name(n)) => Ok(vec![n.clone()]),
            Ok(crate::Object::Array(arr)) => arr.iter().map(|o| o.as_name().map(|n| n.to_vec())).collect(),
            Ok(_) => Err(Error::Filter(FilterError::Unsupported("/Filter must be a Name or Array".into()))),
            Err(_) => Ok(vec![]),
        }
    }

    /// Decode parameter dictionaries, one per filter (missing entries
    /// default to an empty dictionary).
    pub fn decode_parms(&self, count: usize) -> Result<Vec<Dictionary>> {
        match self.dict.get(b"DecodeParms") {
            Ok(crate::Object::Dictionary(d)) => Ok(vec![d.clone()]),
            Ok(crate::Object::Array(arr)) => Ok(arr
                .iter()
                .map(|o| o.as_dict().cloned().unwrap_or_default())
                .collect()),
            Ok(crate::Object::Null) | Err(_) => Ok(vec![Dictionary::new(); count]),
            Ok(_) => Err(Error::Filter(FilterError::Unsupported("/DecodeParms must be a Dictionary or Array".into()))),
        }
    }

    /// Apply the full decode filter chain and return the plaintext bytes.
    pub fn decompressed_content(&self) -> Result<Vec<u8>> {
        let filter_names = self.filter_names()?;
        if filter_names.is_empty() {
            return Ok(self.content.clone());
        }
        let parms = self.decode_parms(filter_names.len())?;
        let mut data = self.content.clone();
        for (name, parm) in filter_names.iter().zip(parms.iter()) {
            data = filters::decode(name, &data, parm)?;
        }
        Ok(data)
    }

    /// Replace the stream's content with `data`, clearing any filters
    /// (the caller is writing plaintext; compression is decided again at
    /// save time per the writer's compression policy).
    pub fn set_plain_content(&mut self, data: Vec<u8>) {
        self.dict.remove(b"Filter");
        self.dict.remove(b"DecodeParms");
        self.set_content(data);
    }
}
