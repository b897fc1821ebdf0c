use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use engine_logging::{engine_debug, engine_warn};

/// How many leading bytes are searched for a `<meta charset>` declaration.
const META_PRESCAN_BYTES: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHtml {
    pub html: String,
    pub encoding: &'static str,
    /// Malformed sequences were replaced with U+FFFD.
    pub had_replacements: bool,
}

/// Decodes a fetched document to UTF-8.
///
/// Encoding is taken from, in order: a byte order mark, the `Content-Type`
/// charset, a `<meta>` declaration near the top of the document, and
/// finally statistical detection.
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> DecodedHtml {
    let (encoding, source) = if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        (encoding, "bom")
    } else if let Some(encoding) = content_type.and_then(header_charset) {
        (encoding, "content-type")
    } else if let Some(encoding) = meta_charset(bytes) {
        (encoding, "meta")
    } else {
        let mut detector = EncodingDetector::new();
        detector.feed(bytes, true);
        (detector.guess(None, true), "detected")
    };
    engine_debug!("Decoding as {} ({source})", encoding.name());

    let (text, used, had_replacements) = encoding.decode(bytes);
    if had_replacements {
        engine_warn!("Malformed {} input; invalid sequences replaced", used.name());
    }
    DecodedHtml {
        html: text.into_owned(),
        encoding: used.name(),
        had_replacements,
    }
}

fn header_charset(content_type: &str) -> Option<&'static Encoding> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        Encoding::for_label(value.trim().trim_matches(['"', '\'']).as_bytes())
    })
}

fn meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_PRESCAN_BYTES)];
    let lowered = String::from_utf8_lossy(head).to_ascii_lowercase();

    let mut rest = lowered.as_str();
    while let Some(start) = rest.find("<meta") {
        rest = &rest[start + "<meta".len()..];
        let tag = &rest[..rest.find('>').unwrap_or(rest.len())];
        let Some(at) = tag.find("charset=") else {
            continue;
        };
        let label: String = tag[at + "charset=".len()..]
            .trim_start_matches(['"', '\'', ' '])
            .chars()
            .take_while(|c| !matches!(c, '"' | '\'' | ' ' | ';' | '/' | '>'))
            .collect();
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            // A meta declaration cannot describe a UTF-16 byte stream.
            return Some(if encoding == UTF_16LE || encoding == UTF_16BE {
                UTF_8
            } else {
                encoding
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_charset_is_case_insensitive_and_unquoted() {
        let enc = header_charset("text/html; Charset=\"ISO-8859-1\"").unwrap();
        assert_eq!(enc.name(), "windows-1252");
        assert!(header_charset("text/html").is_none());
    }

    #[test]
    fn meta_charset_handles_both_declaration_styles() {
        let short = br#"<html><head><meta charset="shift_jis"></head>"#;
        assert_eq!(meta_charset(short).unwrap().name(), "Shift_JIS");

        let http_equiv = br#"<meta http-equiv="Content-Type" content="text/html; charset=KOI8-R">"#;
        assert_eq!(meta_charset(http_equiv).unwrap().name(), "KOI8-R");
    }

    #[test]
    fn meta_utf16_declaration_means_utf8() {
        let html = br#"<meta charset="utf-16le"><p>x</p>"#;
        assert_eq!(meta_charset(html), Some(UTF_8));
    }
}
