pub const OCTET_STREAM: &str = "application/octet-stream";

/// Guess the MIME type of a blob from its leading magic bytes
pub fn detect_content_type(data: &[u8]) -> &'static str {
    if data.len() < 4 {
        return OCTET_STREAM;
    }

    match data {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [b'G', b'I', b'F', ..] => "image/gif",
        [b'B', b'M', ..] => "image/bmp",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => OCTET_STREAM,
    }
}
