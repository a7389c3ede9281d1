//! Charset negotiation for legacy recipe sites.
//!
//! The older sites serve Windows-1251 without a reliable header, so an
//! undeclared page is decoded by trying Windows-1251, UTF-8 and Latin-1 in
//! that order and keeping the first strict decode. Sites serving UTF-8 must
//! declare it, in the header or in a `<meta>` tag.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1251, WINDOWS_1252};

const META_SCAN_BYTES: usize = 1024;

/// Decode a page body. A charset declared in `content_type` or in an early
/// `<meta>` tag wins over the fallback order.
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> Option<String> {
    let declared = content_type
        .and_then(charset_from_content_type)
        .or_else(|| charset_from_html_meta(bytes));

    if let Some(encoding) = declared {
        log::debug!("Decoding with declared charset {}", encoding.name());
        if let Some(text) = decode_strict(encoding, bytes) {
            return Some(text);
        }
        log::warn!("Declared charset {} does not decode the body", encoding.name());
    }

    // WINDOWS_1252 is the WHATWG decoder behind the "latin1" label.
    [WINDOWS_1251, UTF_8, WINDOWS_1252]
        .into_iter()
        .find_map(|encoding| {
            let text = decode_strict(encoding, bytes)?;
            log::debug!("Decoded body as {}", encoding.name());
            Some(text)
        })
}

fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

/// e.g. "text/html; charset=windows-1251" -> Some(WINDOWS_1251)
fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    let lower = content_type.to_ascii_lowercase();
    let value = lower
        .split("charset=")
        .nth(1)?
        .trim_start_matches(['"', '\''])
        .split(['"', '\'', ';', ',', ' '])
        .next()?
        .trim();

    if value.is_empty() {
        return None;
    }
    Encoding::for_label(value.as_bytes())
}

fn charset_from_html_meta(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_SCAN_BYTES)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    let position = head.find("charset=")?;
    let tag_start = head[..position].rfind('<')?;
    if !head[tag_start..position].contains("meta") {
        return None;
    }

    let value = head[position + "charset=".len()..]
        .trim_start_matches(['"', '\''])
        .split(['"', '\'', '>', ';', ' ', '/'])
        .next()?
        .trim();
    if value.is_empty() {
        return None;
    }
    Encoding::for_label(value.as_bytes())
}
