//! Content-type sniffing
//!
//! Pages are classified from their first bytes, never from the
//! `Content-Type` header. Only `text/html` is parsed for links and ids.

/// Number of leading body bytes considered when sniffing
pub const SNIFF_LEN: usize = 512;

/// Fallback for bodies that look binary
const OCTET_STREAM: &str = "application/octet-stream";

/// Tag openings that mark a body as HTML, matched case-insensitively
const HTML_SIGNATURES: &[&[u8]] = &[
    b"<!DOCTYPE HTML",
    b"<HTML",
    b"<HEAD",
    b"<SCRIPT",
    b"<IFRAME",
    b"<H1",
    b"<DIV",
    b"<FONT",
    b"<TABLE",
    b"<A",
    b"<STYLE",
    b"<TITLE",
    b"<B",
    b"<BODY",
    b"<BR",
    b"<P",
    b"<!--",
];

/// Exact byte prefixes, checked in order after the HTML signatures
const MAGIC: &[(&[u8], &str)] = &[
    (b"<?xml", "text/xml; charset=utf-8"),
    (b"%PDF-", "application/pdf"),
    (b"%!PS-Adobe-", "application/postscript"),
    (b"\x89PNG\x0D\x0A\x1A\x0A", "image/png"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"\xFF\xD8\xFF", "image/jpeg"),
    (b"PK\x03\x04", "application/zip"),
    (b"\x1F\x8B\x08", "application/x-gzip"),
];

/// Detects the content type of a body from at most its first [`SNIFF_LEN`] bytes
///
/// # Detection Order
///
/// 1. Byte order marks → `text/plain` (UTF-8/UTF-16 text)
/// 2. HTML tag signatures after leading whitespace → `text/html`
/// 3. Well-known magic numbers (XML, PDF, images, archives)
/// 4. No binary control bytes → `text/plain`, otherwise `application/octet-stream`
///
/// # Examples
///
/// ```
/// use linkcheck::crawler::sniff_content_type;
///
/// assert_eq!(sniff_content_type(b"  <!doctype html><p>hi"), "text/html; charset=utf-8");
/// assert_eq!(sniff_content_type(b"%PDF-1.7"), "application/pdf");
/// assert_eq!(sniff_content_type(b"plain words"), "text/plain; charset=utf-8");
/// ```
pub fn sniff_content_type(data: &[u8]) -> &'static str {
    let data = &data[..data.len().min(SNIFF_LEN)];

    if data.starts_with(b"\xFE\xFF") || data.starts_with(b"\xFF\xFE") {
        return "text/plain; charset=utf-16";
    }
    if data.starts_with(b"\xEF\xBB\xBF") {
        return "text/plain; charset=utf-8";
    }

    let trimmed = skip_whitespace(data);
    if HTML_SIGNATURES
        .iter()
        .any(|sig| matches_html_signature(trimmed, sig))
    {
        return "text/html; charset=utf-8";
    }

    for &(magic, content_type) in MAGIC {
        let candidate = if magic.starts_with(b"<") { trimmed } else { data };
        if candidate.starts_with(magic) {
            return content_type;
        }
    }

    if data.iter().any(|&b| is_binary_byte(b)) {
        OCTET_STREAM
    } else {
        "text/plain; charset=utf-8"
    }
}

/// Returns true if the sniffed type of `data` is HTML
pub fn is_html(data: &[u8]) -> bool {
    sniff_content_type(data).starts_with("text/html")
}

fn skip_whitespace(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|&b| !matches!(b, b'\t' | b'\n' | 0x0C | b'\r' | b' '))
        .unwrap_or(data.len());
    &data[start..]
}

/// The signature must be followed by a tag-terminating byte
fn matches_html_signature(data: &[u8], sig: &[u8]) -> bool {
    if data.len() < sig.len() + 1 {
        return false;
    }
    let head_matches = sig
        .iter()
        .zip(data)
        .all(|(&s, &d)| if s.is_ascii_uppercase() { d & 0xDF == s } else { d == s });

    head_matches && matches!(data[sig.len()], b' ' | b'>')
}

fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}
