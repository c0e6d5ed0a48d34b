use std::sync::OnceLock;

use regex::Regex;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
/// Window scanned for an `encoding="..."` declaration.
const DECLARATION_WINDOW: usize = 200;

/// Resolve the payload's text encoding and decode it.
///
/// A UTF-8 byte-order mark wins outright; otherwise the XML declaration in
/// the first bytes is honored when the label is recognized; UTF-8 is the
/// fallback for everything else. The declaration is rewritten to `utf-8`
/// afterwards so the XML parser cannot re-apply the original charset to the
/// already-decoded text.
pub(crate) fn decode_payload(bytes: &[u8]) -> String {
    if let Some(stripped) = bytes.strip_prefix(&UTF8_BOM) {
        return rewrite_declaration(String::from_utf8_lossy(stripped).into_owned());
    }

    if let Some(encoding) = declared_encoding(bytes) {
        let (text, _, _) = encoding.decode(bytes);
        return rewrite_declaration(text.into_owned());
    }

    rewrite_declaration(String::from_utf8_lossy(bytes).into_owned())
}

fn rewrite_declaration(text: String) -> String {
    declaration_regex()
        .replace(&text, r#"encoding="utf-8""#)
        .into_owned()
}

fn declared_encoding(bytes: &[u8]) -> Option<&'static encoding_rs::Encoding> {
    let window = &bytes[..bytes.len().min(DECLARATION_WINDOW)];
    let header = String::from_utf8_lossy(window);
    let captures = declaration_regex().captures(&header)?;
    encoding_rs::Encoding::for_label(captures[1].trim().as_bytes())
}

fn declaration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)encoding\s*=\s*["']([^"']+)["']"#).expect("static regex compiles")
    })
}
