use std::fmt;

use crate::ObjectId;

pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the engine.
///
/// Mirrors the subsystem split in the design: parsing, xref resolution,
/// filters and decryption each get their own nested enum so callers can
/// match on kind without parsing strings.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Xref(#[from] XrefError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Decryption(#[from] DecryptionError),

    #[error("incremental save blocked: {0}")]
    IncrementalBlocked(BlockerReason),

    #[error("internal invariant violated: {0}")]
    Invariant(String),

    #[error("object {0:?} not found")]
    ObjectNotFound(ObjectId),

    #[error("missing xref entry")]
    MissingXrefEntry,

    #[error("offset {0} is out of bounds")]
    InvalidOffset(usize),

    #[error("reference cycle detected while resolving {0:?}")]
    ReferenceCycle(ObjectId),

    #[error("object id mismatch: expected object header did not match xref entry")]
    ObjectIdMismatch,

    #[error("indirect object at offset {offset} could not be parsed")]
    IndirectObject { offset: usize },

    #[error("invalid stream: {0}")]
    InvalidStream(String),

    #[error("numeric cast failed: {0}")]
    NumericCast(String),

    #[error("type error: expected {expected}, found {found}")]
    ObjectType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("trailer is missing required /Root entry")]
    MissingRoot,

    #[error("catalog object is not a dictionary")]
    CatalogNotDictionary,

    #[error("document is encrypted and requires a password")]
    PasswordRequired,

    #[error("incorrect password")]
    InvalidPassword,

    #[error("feature not implemented: {0}")]
    Unimplemented(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Tokenizer/parser failures. Reported with byte position where available.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid file header: missing %PDF- marker")]
    InvalidFileHeader,

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("malformed hexadecimal data")]
    BadHex,

    #[error("malformed numeric literal")]
    BadNumber,

    #[error("malformed name token")]
    BadName,

    #[error("unexpected byte at current position")]
    UnexpectedByte,

    #[error("literal string nesting exceeds maximum bracket depth")]
    TooDeeplyNested,

    #[error("invalid trailer dictionary")]
    InvalidTrailer,

    #[error("invalid cross-reference section")]
    InvalidXref,

    #[error("unexpected end of input")]
    EndOfInput,
}

/// Cross-reference resolution failures (spec.md's StructuralError family,
/// restricted to xref-specific cases).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum XrefError {
    #[error("could not locate startxref / a valid cross-reference section")]
    Start,

    #[error("/Prev offset does not point at a valid xref section")]
    PrevStart,

    #[error("/XRefStm offset does not point at a valid xref stream")]
    StreamStart,

    #[error("xref stream is missing a required entry")]
    MissingStreamField,

    #[error("xref stream /W widths are inconsistent with the decoded payload length")]
    MalformedWidths,
}

/// Filter/codec failures.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("unsupported filter: {0}")]
    Unsupported(String),

    #[error("corrupt FlateDecode stream")]
    Flate,

    #[error("corrupt LZWDecode stream")]
    Lzw,

    #[error("corrupt ASCII85Decode stream")]
    Ascii85,

    #[error("corrupt ASCIIHexDecode stream")]
    AsciiHex,

    #[error("corrupt RunLengthDecode stream")]
    RunLength,

    #[error("invalid predictor parameters")]
    Predictor,
}

/// Security-handler and cipher failures.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecryptionError {
    #[error("incorrect password")]
    IncorrectPassword,

    #[error("unsupported encryption revision: V={v} R={r}")]
    UnsupportedRevision { v: i64, r: i64 },

    #[error("encryption dictionary is missing required key: {0}")]
    MissingKey(&'static str),

    #[error("key length mismatch: expected {expected} bytes, got {actual}")]
    KeyLength { expected: usize, actual: usize },

    #[error("AES block data is not a multiple of the block size, or padding is invalid")]
    Padding,

    #[error("unknown crypt filter: {0}")]
    UnknownCryptFilter(String),
}

/// Reason `Document::save_incremental` refused to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockerReason {
    Linearized,
    BruteForceRecovery,
    EncryptionAdded,
    EncryptionRemoved,
    EncryptionChanged,
}

impl fmt::Display for BlockerReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BlockerReason::Linearized => "document is linearized",
            BlockerReason::BruteForceRecovery => "document was loaded via brute-force xref recovery",
            BlockerReason::EncryptionAdded => "encryption was added since load",
            BlockerReason::EncryptionRemoved => "encryption was removed since load",
            BlockerReason::EncryptionChanged => "encryption parameters changed since load",
        };
        f.write_str(s)
    }
}
