//! Serialization: a full rewrite (with garbage collection) or an
//! append-only incremental update that preserves every byte of the
//! original file and only appends new object definitions and a fresh
//! xref section chained through `/Prev`.

mod object_writer;
mod xref_writer;

use std::io::Write;

use crate::change_collector::ChangeSet;
use crate::encryption;
use crate::error::Result;
use crate::xref::{Xref, XrefEntry, XrefType};
use crate::{Document, Object, ObjectId};

/// Full save: walk from `/Root`/`/Info`/`/Encrypt`, dropping anything
/// unreachable, and write every surviving object fresh with a new xref.
pub fn write_full<W: Write>(document: &mut Document, mut target: W) -> Result<()> {
    let reachable = document.reachable_objects();
    document.objects.retain(|id, _| reachable.contains(id));

    let mut out = Vec::new();
    out.extend_from_slice(format!("%PDF-{}\n", document.version).as_bytes());
    out.push(b'%');
    out.extend_from_slice(&document.binary_mark);
    out.push(b'\n');

    let mut xref = Xref::new(0, XrefType::CrossReferenceTable);
    xref.insert(0, XrefEntry::Free { generation: 65535 });

    let encrypt_ref = document.trailer.get(b"Encrypt").ok().and_then(|o| o.as_reference().ok());

    let ids: Vec<ObjectId> = document.objects.keys().copied().collect();
    for id in ids {
        let offset = out.len() as u32;
        let mut object = document.objects.get(&id).unwrap().clone();
        if let Some(ref state) = document.encryption_state {
            if Some(id) != encrypt_ref {
                encryption::encrypt_object(state, id, &mut object)?;
            }
        }
        object_writer::write_indirect_object(&mut out, id, &object)?;
        xref.insert(id.0, XrefEntry::Normal { offset, generation: id.1 });
    }

    let xref_start = out.len();
    xref.size = document.objects.keys().map(|id| id.0).max().unwrap_or(0) + 1;

    let mut trailer = document.trailer.clone();
    trailer.set("Size", xref.size as i64);
    xref_writer::write_classic_xref(&mut out, &xref, &trailer)?;
    out.extend_from_slice(format!("startxref\n{xref_start}\n%%EOF").as_bytes());

    target.write_all(&out)?;
    document.xref_start = xref_start;
    Ok(())
}

/// Incremental save: append only dirty/new object definitions and free
/// markers for deleted ones, with a fresh xref section whose `/Prev`
/// chains back to `document.xref_start`.
pub fn write_incremental<W: Write>(document: &mut Document, original: &[u8], mut target: W) -> Result<()> {
    target.write_all(original)?;

    let mut appended = Vec::new();
    let base_offset = original.len();

    let mut xref = Xref::new(0, XrefType::CrossReferenceTable);

    let changes = ChangeSet::collect(document);
    let encrypt_ref = document.trailer.get(b"Encrypt").ok().and_then(|o| o.as_reference().ok());

    for id in changes.pending_writes() {
        let offset = (base_offset + appended.len()) as u32;
        let mut object = document.objects.get(&id).unwrap().clone();
        if let Some(ref state) = document.encryption_state {
            if Some(id) != encrypt_ref {
                encryption::encrypt_object(state, id, &mut object)?;
            }
        }
        object_writer::write_indirect_object(&mut appended, id, &object)?;
        xref.insert(id.0, XrefEntry::Normal { offset, generation: id.1 });
    }

    for id in changes.free.iter().copied() {
        xref.insert(id.0, XrefEntry::Free { generation: id.1.wrapping_add(1) });
    }

    if xref.entries.is_empty() {
        return Ok(());
    }

    let xref_start = base_offset + appended.len();
    xref.size = document.max_id + 1;

    let mut trailer = document.trailer.clone();
    trailer.set("Size", xref.size as i64);
    trailer.set("Prev", document.xref_start as i64);
    xref_writer::write_incremental_xref(&mut appended, &xref, &trailer)?;
    appended.extend_from_slice(format!("startxref\n{xref_start}\n%%EOF").as_bytes());

    target.write_all(&appended)?;
    document.xref_start = xref_start;
    for id in changes.pending_writes() {
        document.slot_state.insert(id, crate::document::SlotState::Original);
    }
    Ok(())
}

pub(crate) fn encode_object(out: &mut Vec<u8>, object: &Object) -> Result<()> {
    object_writer::write_object(out, object)
}
