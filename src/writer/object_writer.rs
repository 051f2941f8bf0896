use crate::error::Result;
use crate::filters;
use crate::{Dictionary, Object, ObjectId, StringFormat};

pub fn write_indirect_object(out: &mut Vec<u8>, id: ObjectId, object: &Object) -> Result<()> {
    let mut num_buf = itoa::Buffer::new();
    out.extend_from_slice(num_buf.format(id.0).as_bytes());
    out.push(b' ');
    out.extend_from_slice(num_buf.format(id.1).as_bytes());
    out.extend_from_slice(b" obj\n");
    write_object(out, object)?;
    out.extend_from_slice(b"\nendobj\n");
    Ok(())
}

pub fn write_object(out: &mut Vec<u8>, object: &Object) -> Result<()> {
    match object {
        Object::Null => out.extend_from_slice(b"null"),
        Object::Boolean(b) => out.extend_from_slice(if *b { b"true" } else { b"false" }),
        Object::Integer(i) => {
            let mut buf = itoa::Buffer::new();
            out.extend_from_slice(buf.format(*i).as_bytes());
        }
        Object::Real(f) => write_real(out, *f),
        Object::Name(name) => write_name(out, name),
        Object::String(bytes, format) => write_string(out, bytes, *format),
        Object::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b' ');
                }
                write_object(out, item)?;
            }
            out.push(b']');
        }
        Object::Dictionary(dict) => write_dictionary(out, dict)?,
        Object::Stream(stream) => {
            let mut dict = stream.dict.clone();
            dict.set("Length", stream.content.len() as i64);
            write_dictionary(out, &dict)?;
            out.extend_from_slice(b"\nstream\n");
            out.extend_from_slice(&stream.content);
            out.extend_from_slice(b"\nendstream");
        }
        Object::Reference((num, gen)) => {
            let mut buf = itoa::Buffer::new();
            out.extend_from_slice(buf.format(*num).as_bytes());
            out.push(b' ');
            out.extend_from_slice(buf.format(*gen).as_bytes());
            out.extend_from_slice(b" R");
        }
    }
    Ok(())
}

fn write_dictionary(out: &mut Vec<u8>, dict: &Dictionary) -> Result<()> {
    out.extend_from_slice(b"<<");
    for (key, value) in dict.iter() {
        out.push(b'/');
        write_name_body(out, key);
        out.push(b' ');
        write_object(out, value)?;
    }
    out.extend_from_slice(b">>");
    Ok(())
}

fn write_name(out: &mut Vec<u8>, name: &[u8]) {
    out.push(b'/');
    write_name_body(out, name);
}

fn write_name_body(out: &mut Vec<u8>, name: &[u8]) {
    for &b in name {
        if b.is_ascii_graphic() && !matches!(b, b'#' | b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%') {
            out.push(b);
        } else {
            out.push(b'#');
            out.extend_from_slice(format!("{b:02X}").as_bytes());
        }
    }
}

fn write_real(out: &mut Vec<u8>, value: f32) {
    let mut s = format!("{value}");
    if !s.contains('.') && !s.contains('e') && !s.contains('E') {
        s.push_str(".0");
    }
    out.extend_from_slice(s.as_bytes());
}

fn write_string(out: &mut Vec<u8>, bytes: &[u8], format: StringFormat) {
    match format {
        StringFormat::Hexadecimal => {
            out.push(b'<');
            out.extend_from_slice(&filters::encode(b"ASCIIHexDecode", bytes).unwrap_or_default());
            // ASCIIHexDecode's encoder already appends the `>` terminator.
            if out.last() != Some(&b'>') {
                out.push(b'>');
            }
        }
        StringFormat::Literal => {
            out.push(b'(');
            for &b in bytes {
                match b {
                    b'(' | b')' | b'\\' => {
                        out.push(b'\\');
                        out.push(b);
                    }
                    b'\r' => out.extend_from_slice(b"\\r"),
                    b'\n' => out.extend_from_slice(b"\\n"),
                    _ => out.push(b),
                }
            }
            out.push(b')');
        }
    }
}
