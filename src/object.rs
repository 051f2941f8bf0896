use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};

use crate::error::{Error, Result};
use crate::{Dictionary, ObjectId, Stream};

/// How a string was (or should be) written on the wire.
///
/// The in-memory value is always raw bytes; this only selects the
/// preferred output form so that round-tripping an untouched document
/// reproduces the original bracket style where practical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    Literal,
    Hexadecimal,
}

/// A parsed PDF object. Closed tagged union per the data model: there is
/// no trait-object hierarchy, just this enum plus whatever metadata the
/// registry tracks alongside it.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    String(Vec<u8>, StringFormat),
    Array(Vec<Object>),
    Dictionary(Dictionary),
    Stream(Stream),
    Reference(ObjectId),
}

impl Object {
    pub fn string_literal<S: Into<Vec<u8>>>(s: S) -> Self {
        Object::String(s.into(), StringFormat::Literal)
    }

    pub fn enum_variant(&self) -> &'static str {
        match self {
            Object::Null => "Null",
            Object::Boolean(_) => "Boolean",
            Object::Integer(_) => "Integer",
            Object::Real(_) => "Real",
            Object::Name(_) => "Name",
            Object::String(..) => "String",
            Object::Array(_) => "Array",
            Object::Dictionary(_) => "Dictionary",
            Object::Stream(_) => "Stream",
            Object::Reference(_) => "Reference",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Object::Boolean(b) => Ok(*b),
            _ => Err(type_err("Boolean", self)),
        }
    }

    /// Any numeric object coerced to i64 (truncating reals).
    pub fn as_i64(&self) -> Result<i64> {
        match self {
            Object::Integer(i) => Ok(*i),
            Object::Real(f) => Ok(*f as i64),
            _ => Err(type_err("Number", self)),
        }
    }

    pub fn as_f32(&self) -> Result<f32> {
        match self {
            Object::Integer(i) => Ok(*i as f32),
            Object::Real(f) => Ok(*f),
            _ => Err(type_err("Number", self)),
        }
    }

    pub fn as_name(&self) -> Result<&[u8]> {
        match self {
            Object::Name(n) => Ok(n),
            _ => Err(type_err("Name", self)),
        }
    }

    pub fn as_name_str(&self) -> Result<&str> {
        self.as_name()
            .and_then(|n| std::str::from_utf8(n).map_err(|_| Error::Invariant("name is not valid UTF-8".into())))
    }

    pub fn as_str(&self) -> Result<&[u8]> {
        match self {
            Object::String(s, _) => Ok(s),
            _ => Err(type_err("String", self)),
        }
    }

    pub fn as_str_mut(&mut self) -> Result<&mut Vec<u8>> {
        match self {
            Object::String(s, _) => Ok(s),
            _ => Err(Error::ObjectType {
                expected: "String",
                found: "other",
            }),
        }
    }

    pub fn as_array(&self) -> Result<&Vec<Object>> {
        match self {
            Object::Array(a) => Ok(a),
            _ => Err(type_err("Array", self)),
        }
    }

    pub fn as_array_mut(&mut self) -> Result<&mut Vec<Object>> {
        match self {
            Object::Array(a) => Ok(a),
            _ => Err(Error::ObjectType {
                expected: "Array",
                found: "other",
            }),
        }
    }

    pub fn as_dict(&self) -> Result<&Dictionary> {
        match self {
            Object::Dictionary(d) => Ok(d),
            Object::Stream(s) => Ok(&s.dict),
            _ => Err(type_err("Dictionary", self)),
        }
    }

    pub fn as_dict_mut(&mut self) -> Result<&mut Dictionary> {
        match self {
            Object::Dictionary(d) => Ok(d),
            Object::Stream(s) => Ok(&mut s.dict),
            _ => Err(Error::ObjectType {
                expected: "Dictionary",
                found: "other",
            }),
        }
    }

    pub fn as_stream(&self) -> Result<&Stream> {
        match self {
            Object::Stream(s) => Ok(s),
            _ => Err(type_err("Stream", self)),
        }
    }

    pub fn as_stream_mut(&mut self) -> Result<&mut Stream> {
        match self {
            Object::Stream(s) => Ok(s),
            _ => Err(Error::ObjectType {
                expected: "Stream",
                found: "other",
            }),
        }
    }

    pub fn as_reference(&self) -> Result<ObjectId> {
        match self {
            Object::Reference(id) => Ok(*id),
            _ => Err(type_err("Reference", self)),
        }
    }

    /// Parse a PDF date string (`D:YYYYMMDDHHmmSSOHH'mm'`, with any
    /// suffix optional) into a local datetime.
    pub fn as_datetime(&self) -> Option<DateTime<Local>> {
        let bytes = match self {
            Object::String(s, _) => s.as_slice(),
            _ => return None,
        };
        crate::datetime::parse_pdf_date(bytes)
    }
}

fn type_err(expected: &'static str, found: &Object) -> Error {
    Error::ObjectType {
        expected,
        found: found.enum_variant(),
    }
}

impl From<bool> for Object {
    fn from(b: bool) -> Self {
        Object::Boolean(b)
    }
}

impl From<i64> for Object {
    fn from(i: i64) -> Self {
        Object::Integer(i)
    }
}

impl From<i32> for Object {
    fn from(i: i32) -> Self {
        Object::Integer(i as i64)
    }
}

impl From<u32> for Object {
    fn from(i: u32) -> Self {
        Object::Integer(i as i64)
    }
}

impl From<f32> for Object {
    fn from(f: f32) -> Self {
        Object::Real(f)
    }
}

impl From<ObjectId> for Object {
    fn from(id: ObjectId) -> Self {
        Object::Reference(id)
    }
}

impl From<Vec<Object>> for Object {
    fn from(a: Vec<Object>) -> Self {
        Object::Array(a)
    }
}

impl From<Dictionary> for Object {
    fn from(d: Dictionary) -> Self {
        Object::Dictionary(d)
    }
}

impl From<Stream> for Object {
    fn from(s: Stream) -> Self {
        Object::Stream(s)
    }
}

impl From<&str> for Object {
    fn from(s: &str) -> Self {
        Object::Name(s.as_bytes().to_vec())
    }
}

impl From<DateTime<Local>> for Object {
    fn from(time: DateTime<Local>) -> Self {
        let offset_minutes = time.offset().local_minus_utc() / 60;
        let sign = if offset_minutes < 0 { '-' } else { '+' };
        let text = format!(
            "D:{:04}{:02}{:02}{:02}{:02}{:02}{}{:02}'{:02}'",
            time.year(),
            time.month(),
            time.day(),
            time.hour(),
            time.minute(),
            time.second(),
            sign,
            offset_minutes.abs() / 60,
            offset_minutes.abs() % 60,
        );
        Object::string_literal(text)
    }
}
