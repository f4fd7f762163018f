use bytes::{BufMut, Bytes, BytesMut};

pub const CURRENT_MARKER: &str = "<<<<<<< HEAD";
pub const SEPARATOR: &str = "=======";
pub const GIVEN_MARKER: &str = ">>>>>>>";

/// Content recording both sides of a conflicting path
///
/// A missing side contributes nothing between its markers. Each side is
/// terminated by a newline so the markers stay on their own lines.
pub fn conflict_content(current: Option<&[u8]>, given: Option<&[u8]>) -> Bytes {
    let mut content = BytesMut::new();

    content.put_slice(CURRENT_MARKER.as_bytes());
    content.put_u8(b'\n');
    put_side(&mut content, current);
    content.put_slice(SEPARATOR.as_bytes());
    content.put_u8(b'\n');
    put_side(&mut content, given);
    content.put_slice(GIVEN_MARKER.as_bytes());
    content.put_u8(b'\n');

    content.freeze()
}

fn put_side(content: &mut BytesMut, side: Option<&[u8]>) {
    let Some(side) = side.filter(|side| !side.is_empty()) else {
        return;
    };

    content.put_slice(side);
    if !side.ends_with(b"\n") {
        content.put_u8(b'\n');
    }
}
