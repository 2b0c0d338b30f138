//! Output formatting for CLI tools.
//!
//! Supports human-readable, JSON, and raw output formats.

use crate::cli::args::OutputFormat;
use crate::{Content, Kind, Value};
use serde::Serialize;
use std::io::{self, Write};

/// One decoded TLV, ready for output.
#[derive(Debug, Serialize)]
pub struct Node {
    pub class: String,
    pub tag: Option<u32>,
    pub constructed: bool,
    #[serde(rename = "type")]
    pub value_type: String,
    /// Content length in octets; `None` for indefinite length.
    pub length: Option<usize>,
    pub value: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn from_value(value: &Value) -> Self {
        let children: Vec<Node> = value.iter().map(Node::from_value).collect();
        let (value_json, formatted) = format_content(value);

        Node {
            class: value
                .tag_class()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "?".into()),
            tag: value.tag(),
            constructed: value.is_constructed(),
            value_type: value.kind().to_string(),
            length: content_len(value),
            value: value_json,
            formatted,
            children,
        }
    }
}

/// Output context for formatting.
pub struct OutputContext {
    pub format: OutputFormat,
}

impl OutputContext {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Write decoded values to stdout.
    pub fn write_values(&self, values: &[Value]) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        self.write_to(&mut stdout, values)
    }

    pub fn write_to<W: Write>(&self, w: &mut W, values: &[Value]) -> io::Result<()> {
        match self.format {
            OutputFormat::Human => {
                for value in values {
                    write_human(w, &Node::from_value(value), 0)?;
                }
                Ok(())
            }
            OutputFormat::Json => {
                let nodes: Vec<Node> = values.iter().map(Node::from_value).collect();
                let json = serde_json::to_string_pretty(&nodes).map_err(io::Error::other)?;
                writeln!(w, "{}", json)
            }
            OutputFormat::Raw => {
                for value in values {
                    let bytes = value.encode().map_err(io::Error::other)?;
                    writeln!(w, "{}", format_hex_string(&bytes))?;
                }
                Ok(())
            }
        }
    }
}

fn write_human<W: Write>(w: &mut W, node: &Node, depth: usize) -> io::Result<()> {
    write!(w, "{:indent$}{} [{} ", "", node.value_type, node.class, indent = depth * 2)?;
    match node.tag {
        Some(tag) => write!(w, "{}]", tag)?,
        None => write!(w, "?]")?,
    }
    match node.length {
        Some(len) => write!(w, " len={}", len)?,
        None => write!(w, " len=indefinite")?,
    }
    if let Some(ref formatted) = node.formatted {
        write!(w, ": {}", formatted)?;
    }
    writeln!(w)?;

    for child in &node.children {
        write_human(w, child, depth + 1)?;
    }
    Ok(())
}

fn content_len(value: &Value) -> Option<usize> {
    if value.infinite_length() {
        return None;
    }
    match value.content() {
        Content::Bytes(bytes) => Some(bytes.len()),
        Content::Children(children) => children.iter().map(|c| c.encoded_len().ok()).sum(),
        Content::Unset => None,
    }
}

/// Format primitive content, returning (json value, display text).
fn format_content(value: &Value) -> (serde_json::Value, Option<String>) {
    let Some(bytes) = value.bytes() else {
        return (serde_json::Value::Null, None);
    };

    match value.kind() {
        Kind::Integer => match value.as_integer() {
            Some(v) => (serde_json::Value::from(v), Some(v.to_string())),
            None => hex_content(bytes),
        },
        Kind::Boolean => match value.as_bool() {
            Some(v) => (serde_json::Value::Bool(v), Some(v.to_string())),
            None => hex_content(bytes),
        },
        Kind::Null | Kind::EndOfContents => (serde_json::Value::Null, None),
        _ if is_printable(bytes) && !bytes.is_empty() => {
            let s = String::from_utf8_lossy(bytes).to_string();
            (serde_json::Value::String(s.clone()), Some(format!("\"{}\"", s)))
        }
        _ => hex_content(bytes),
    }
}

fn hex_content(bytes: &[u8]) -> (serde_json::Value, Option<String>) {
    let hex = format_hex_string(bytes);
    (serde_json::Value::String(hex.clone()), Some(hex))
}

/// Check if bytes are printable text.
fn is_printable(bytes: &[u8]) -> bool {
    match std::str::from_utf8(bytes) {
        Ok(s) => s
            .chars()
            .all(|c| c.is_ascii_graphic() || c == ' '),
        Err(_) => false,
    }
}

/// Format bytes as hex string (uppercase, space separated).
fn format_hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Write an error to stderr.
pub fn write_error(err: &crate::Error) {
    eprintln!("Error: {}", err);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode;

    fn render(format: OutputFormat, values: &[Value]) -> String {
        let mut out = Vec::new();
        OutputContext::new(format).write_to(&mut out, values).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_human_tree() {
        let value = decode(&b"\x31\x11\x04\x05hello\x02\x01\x2A\x04\x05world"[..]).unwrap();
        let text = render(OutputFormat::Human, &[value]);
        assert_eq!(
            text,
            "SET [UNIVERSAL 17] len=17\n\
             \x20 OCTET STRING [UNIVERSAL 4] len=5: \"hello\"\n\
             \x20 INTEGER [UNIVERSAL 2] len=1: 42\n\
             \x20 OCTET STRING [UNIVERSAL 4] len=5: \"world\"\n"
        );
    }

    #[test]
    fn test_human_indefinite() {
        let value = decode(&b"\x30\x80\x05\x00\x00\x00"[..]).unwrap();
        let text = render(OutputFormat::Human, &[value]);
        assert!(text.starts_with("SEQUENCE [UNIVERSAL 16] len=indefinite\n"));
        assert!(text.contains("  END OF CONTENTS [UNIVERSAL 0] len=0\n"));
    }

    #[test]
    fn test_json() {
        let value = Value::sequence([Value::integer(-5), Value::octet_string(vec![0x00, 0xFF])]);
        let text = render(OutputFormat::Json, &[value]);
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        let node = &json[0];
        assert_eq!(node["type"], "SEQUENCE");
        assert_eq!(node["length"], 7);
        assert_eq!(node["children"][0]["value"], -5);
        assert_eq!(node["children"][1]["value"], "00 FF");
    }

    #[test]
    fn test_raw() {
        let text = render(OutputFormat::Raw, &[Value::set([]), Value::null()]);
        assert_eq!(text, "31 00\n05 00\n");
    }

    #[test]
    fn test_format_hex_string() {
        assert_eq!(format_hex_string(&[0x31, 0x0A, 0xFF]), "31 0A FF");
        assert_eq!(format_hex_string(&[]), "");
    }
}
