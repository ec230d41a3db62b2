//! Default MIME-aware body extractor

use base64::{engine::general_purpose, Engine as _};
use regex::Regex;
use std::collections::{HashMap, HashSet};

use super::types::{BodyExtractor, MessageBody};

/// Tokens shorter than this are discarded.
const MIN_TOKEN_LEN: usize = 3;
/// Tokens longer than this are discarded.
const MAX_TOKEN_LEN: usize = 15;

/// Extracts a token set and word count from raw message text.
///
/// Handles header/body splitting, folded headers, multipart sections, base64
/// and quoted-printable transfer encodings, and HTML tag stripping. Messages
/// without a recognizable header block (plain text snippets) go through a
/// line salvage pass instead.
pub struct MimeBodyExtractor {
    html_tag: Option<Regex>,
}

impl MimeBodyExtractor {
    pub fn new() -> Self {
        Self {
            html_tag: Regex::new(r"<[^>]+>").ok(),
        }
    }

    fn strip_tags(&self, text: &str) -> String {
        match &self.html_tag {
            Some(re) => re.replace_all(text, " ").into_owned(),
            None => text.to_string(),
        }
    }

    /// Body text of a message whose header block parsed.
    fn body_text(&self, headers: &HashMap<String, String>, body: &str) -> String {
        if let Some(content_type) = headers.get("content-type") {
            if content_type.to_lowercase().contains("multipart/") {
                if let Some(boundary) = extract_parameter(content_type, "boundary") {
                    return self.multipart_text(&boundary, body);
                }
            }
        }

        decode_part(headers.get("content-transfer-encoding"), body)
    }

    /// Concatenate the decoded text/* sections of a multipart body.
    fn multipart_text(&self, boundary: &str, body: &str) -> String {
        let marker = format!("--{}", boundary);
        let mut text = String::new();

        for section in body.split(marker.as_str()) {
            let section = section.trim();

            // Skip empty sections and the end marker.
            if section.is_empty() || section.starts_with("--") {
                continue;
            }

            let (part_headers_str, part_body) = match split_headers_body(section) {
                Some(parts) => parts,
                None => (String::new(), section.to_string()),
            };
            let part_headers = parse_headers(&part_headers_str);

            let is_text = part_headers
                .get("content-type")
                .map(|ct| ct.to_lowercase().contains("text/"))
                .unwrap_or(true);

            if is_text {
                text.push(' ');
                text.push_str(&decode_part(
                    part_headers.get("content-transfer-encoding"),
                    &part_body,
                ));
            }
        }

        text
    }

    /// Salvage pass for text without a header block: drop lines that look
    /// like stray headers, signature separators or CSS/hex junk.
    fn salvage_lines(&self, raw: &str) -> String {
        let mut text = String::new();

        for line in raw.lines() {
            if looks_like_header(line)
                || !line.contains(' ')
                || line.starts_with("-----")
                || line.starts_with('.')
                || line.starts_with('#')
            {
                continue;
            }
            text.push_str(line);
            text.push('\n');
        }

        text
    }
}

impl Default for MimeBodyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyExtractor for MimeBodyExtractor {
    fn extract(&self, raw: &str) -> MessageBody {
        let word_count = raw.split_whitespace().count();

        let text = match split_headers_body(raw) {
            Some((headers_str, body_str)) => {
                let headers = parse_headers(&headers_str);
                let mut text = String::new();

                // Sender and subject words carry signal too.
                if let Some(from) = headers.get("from") {
                    text.push_str(from);
                    text.push(' ');
                }
                if let Some(subject) = headers.get("subject") {
                    text.push_str(subject);
                    text.push(' ');
                }

                text.push_str(&self.body_text(&headers, &body_str));
                text
            }
            None => self.salvage_lines(raw),
        };

        let tokens = tokenize(&self.strip_tags(&text));

        MessageBody { tokens, word_count }
    }
}

/// Split a message into its header block and body at the first blank line.
///
/// Returns `None` when there is no blank-line separator or the first line
/// does not look like a header, i.e. the text is not a MIME message at all.
fn split_headers_body(message: &str) -> Option<(String, String)> {
    let (pos, skip) = match message.find("\r\n\r\n") {
        Some(pos) => (pos, 4),
        None => match message.find("\n\n") {
            Some(pos) => (pos, 2),
            None => return None,
        },
    };

    let headers = &message[..pos];
    if !headers.lines().next().is_some_and(looks_like_header) {
        return None;
    }

    Some((headers.to_string(), message[pos + skip..].to_string()))
}

/// Parse a header block into lower-cased name/value pairs, unfolding
/// continuation lines.
fn parse_headers(headers_str: &str) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    let mut current: Option<(String, String)> = None;

    for line in headers_str.lines() {
        if line.starts_with(' ') || line.starts_with('\t') {
            // Continuation of the previous (folded) header
            if let Some((_, ref mut value)) = current {
                value.push(' ');
                value.push_str(line.trim());
            }
        } else if let Some(colon) = line.find(':') {
            if let Some((name, value)) = current.take() {
                headers.insert(name, value);
            }
            let name = line[..colon].trim().to_lowercase();
            let value = line[colon + 1..].trim().to_string();
            current = Some((name, value));
        }
    }

    if let Some((name, value)) = current {
        headers.insert(name, value);
    }

    headers
}

/// Extract a parameter value from a header (e.g. `boundary="----=_Part"`).
fn extract_parameter(header: &str, param: &str) -> Option<String> {
    let prefix = format!("{}=", param);
    for part in header.split(';') {
        let part = part.trim();
        if part.to_lowercase().starts_with(&prefix) {
            let value = part[prefix.len()..].trim_matches('"').trim_matches('\'');
            return Some(value.to_string());
        }
    }
    None
}

/// Decode a body section according to its Content-Transfer-Encoding.
fn decode_part(encoding: Option<&String>, body: &str) -> String {
    match encoding.map(|e| e.to_lowercase()) {
        Some(enc) if enc.contains("base64") => decode_base64(body),
        Some(enc) if enc.contains("quoted-printable") => decode_quoted_printable(body),
        // 7bit, 8bit, binary or unspecified
        _ => body.to_string(),
    }
}

fn decode_base64(content: &str) -> String {
    let cleaned: Vec<u8> = content
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    match general_purpose::STANDARD.decode(&cleaned) {
        Ok(decoded) => String::from_utf8_lossy(&decoded).into_owned(),
        // Undecodable content contributes nothing rather than failing the run
        Err(_) => String::new(),
    }
}

fn decode_quoted_printable(content: &str) -> String {
    let mut result = Vec::new();
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '=' {
            // Soft line break
            if chars.peek() == Some(&'\n') || chars.peek() == Some(&'\r') {
                chars.next();
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                continue;
            }

            // Hex-encoded byte
            let mut hex = String::new();
            if let Some(c1) = chars.next() {
                hex.push(c1);
            }
            if let Some(c2) = chars.next() {
                hex.push(c2);
            }

            if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                result.push(byte);
            } else {
                result.push(b'=');
                result.extend(hex.as_bytes());
            }
        } else {
            let mut buf = [0u8; 4];
            result.extend(ch.encode_utf8(&mut buf).as_bytes());
        }
    }

    String::from_utf8_lossy(&result).into_owned()
}

/// A line that opens with a letter and contains a colon reads as a header.
fn looks_like_header(line: &str) -> bool {
    line.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) && line.contains(':')
}

/// Reduce text to unique lower-case alphabetic tokens within the length
/// bounds. Digits and punctuation become separators.
fn tokenize(text: &str) -> HashSet<String> {
    let cleaned: String = text
        .chars()
        .map(|c| if c.is_alphabetic() { c } else { ' ' })
        .collect();

    cleaned
        .to_lowercase()
        .split_whitespace()
        .filter(|t| (MIN_TOKEN_LEN..=MAX_TOKEN_LEN).contains(&t.chars().count()))
        .map(|t| t.to_string())
        .collect()
}
