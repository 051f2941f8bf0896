use crate::error::Result;
use crate::writer::object_writer;
use crate::xref::{Xref, XrefEntry};
use crate::Dictionary;

fn write_entry(out: &mut Vec<u8>, entry: Option<&XrefEntry>) {
    match entry {
        Some(XrefEntry::Normal { offset, generation }) => {
            out.extend_from_slice(format!("{offset:010} {generation:05} n \n").as_bytes());
        }
        Some(XrefEntry::Compressed { .. }) => {
            // Classic tables can't represent compressed entries; the
            // writer never emits object streams, so this only shows
            // up if a loaded document had one and it survived GC
            // unchanged. Treat it as free rather than lie about an
            // offset.
            out.extend_from_slice(b"0000000000 65535 f \n");
        }
        Some(XrefEntry::Free { generation }) => {
            out.extend_from_slice(format!("0000000000 {generation:05} f \n").as_bytes());
        }
        Some(XrefEntry::UnusableFree) | None => {
            out.extend_from_slice(b"0000000000 65535 f \n");
        }
    }
}

/// Emit a classic `xref` table plus `trailer` dictionary as a single `0
/// size` section covering every object number in range. Used for full
/// saves, where the table is the only cross-reference source and every
/// number in `0..size` must be accounted for, in use or free.
pub fn write_classic_xref(out: &mut Vec<u8>, xref: &Xref, trailer: &Dictionary) -> Result<()> {
    out.extend_from_slice(b"xref\n");
    out.extend_from_slice(format!("0 {}\n", xref.size).as_bytes());

    for obj_num in 0..xref.size {
        write_entry(out, xref.get(obj_num));
    }

    out.extend_from_slice(b"trailer\n");
    object_writer::write_object(out, &trailer.clone().into())?;
    out.push(b'\n');
    Ok(())
}

/// Emit a classic `xref` table plus `trailer` dictionary covering only
/// the object numbers present in `xref.entries`, grouped into the
/// contiguous subsections ISO 32000-1 §7.5.4 requires. Used for
/// incremental updates: an object number that wasn't touched must be
/// omitted entirely so its original `Normal` entry, reached by walking
/// `/Prev`, remains the only entry for it on reload. Emitting a
/// placeholder here would shadow that entry and make the object
/// unreachable.
pub fn write_incremental_xref(out: &mut Vec<u8>, xref: &Xref, trailer: &Dictionary) -> Result<()> {
    out.extend_from_slice(b"xref\n");

    let obj_nums: Vec<u32> = xref.entries.keys().copied().collect();
    let mut i = 0;
    while i < obj_nums.len() {
        let start = obj_nums[i];
        let mut count = 1usize;
        while i + count < obj_nums.len() && obj_nums[i + count] == start + count as u32 {
            count += 1;
        }

        out.extend_from_slice(format!("{start} {count}\n").as_bytes());
        for &obj_num in &obj_nums[i..i + count] {
            write_entry(out, xref.get(obj_num));
        }
        i += count;
    }

    out.extend_from_slice(b"trailer\n");
    object_writer::write_object(out, &trailer.clone().into())?;
    out.push(b'\n');
    Ok(())
}
