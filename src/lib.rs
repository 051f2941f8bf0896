//! Byte-accurate PDF object-graph engine: tokenizer, cross-reference
//! resolver, typed object model with dirty tracking, filter/codec
//! pipeline, standard security handler, and a full/incremental writer.

mod change_collector;
mod datetime;
mod dictionary;
mod document;
mod encryption;
mod error;
mod filters;
mod object;
mod object_stream;
mod parser;
mod reader;
mod stream;
mod writer;
mod xref;

pub use change_collector::ChangeSet;
pub use datetime::parse_pdf_date;
pub use dictionary::Dictionary;
pub use document::Document;
pub use encryption::CryptFilterMethod;
pub use error::{BlockerReason, DecryptionError, Error, FilterError, ParseError, Result, XrefError};
pub use object::{Object, StringFormat};
pub use reader::PdfMetadata;
pub use stream::Stream;
pub use xref::{Xref, XrefEntry, XrefType};

/// Object number and generation number, the address of every indirect
/// object in the graph.
pub type ObjectId = (u32, u16);
