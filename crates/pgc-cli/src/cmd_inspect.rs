/// Implementation of `pgc inspect`.
///
/// Parses a packet stream (eagerly decompressing every container) and
/// prints one line per packet, indenting the contents of compressed
/// containers.
///
/// # Output format
///
/// ```text
/// Packet 0: COMPRESSED (tag 8) algorithm=zip payload=38 bytes, 1 packet
///   Packet 0: LITERAL (tag 11) format=b filename="hi.txt" date=0 (24 bytes)
/// Packet 1: SIGNATURE (tag 2) (4 bytes)
/// ```
///
/// With `--json` the same tree is printed as a JSON array.
use std::fs;

use anyhow::{Context, Result};
use pgc_types::{DecodeLimits, Packet, PacketList};
use serde::Serialize;
use tracing::info;

use crate::InspectArgs;

/// JSON form of one packet.
#[derive(Serialize)]
struct PacketSummary {
    tag: u8,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    algorithm: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload_len: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body_len: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    packets: Vec<PacketSummary>,
}

/// Run the `pgc inspect` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or any packet, including
/// packets inside compressed containers, fails to decode.
pub fn run(args: &InspectArgs, limits: &DecodeLimits) -> Result<()> {
    let bytes =
        fs::read(&args.file).with_context(|| format!("cannot read {}", args.file.display()))?;

    let list = PacketList::read_with_limits(&bytes, limits)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;
    info!(packets = list.len(), bytes = bytes.len(), "parsed packet stream");

    if args.json {
        let summary: Vec<_> = list.iter().map(summarize).collect();
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", outline(&list));
    }
    Ok(())
}

/// Render the indented outline for a packet list.
pub fn outline(list: &PacketList) -> String {
    let mut out = String::new();
    write_outline(list, 0, &mut out);
    out
}

fn write_outline(list: &PacketList, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for (idx, packet) in list.iter().enumerate() {
        let tag = packet.tag();
        let head = format!("{indent}Packet {idx}: {} (tag {})", tag.label(), tag.wire_id());
        match packet {
            Packet::Literal(literal) => {
                out.push_str(&format!(
                    "{head} format={} filename={:?} date={} ({} bytes)\n",
                    char::from(literal.format.to_wire_byte()),
                    literal.filename_lossy(),
                    literal.date,
                    literal.data.len(),
                ));
            }
            Packet::Compressed(compressed) => {
                let inner = compressed.packets();
                out.push_str(&format!(
                    "{head} algorithm={} payload={} bytes, {} packet{}\n",
                    compressed.algorithm(),
                    compressed.raw_payload().map_or(0, <[u8]>::len),
                    inner.len(),
                    if inner.len() == 1 { "" } else { "s" },
                ));
                write_outline(inner, depth + 1, out);
            }
            Packet::Opaque { body, .. } => {
                out.push_str(&format!("{head} ({} bytes)\n", body.len()));
            }
        }
    }
}

fn summarize(packet: &Packet) -> PacketSummary {
    let tag = packet.tag();
    let mut summary = PacketSummary {
        tag: tag.wire_id(),
        kind: tag.label(),
        algorithm: None,
        payload_len: None,
        format: None,
        filename: None,
        date: None,
        body_len: None,
        packets: Vec::new(),
    };

    match packet {
        Packet::Literal(literal) => {
            summary.format = Some(char::from(literal.format.to_wire_byte()));
            summary.filename = Some(literal.filename_lossy());
            summary.date = Some(literal.date);
            summary.body_len = Some(literal.data.len());
        }
        Packet::Compressed(compressed) => {
            summary.algorithm = Some(compressed.algorithm().name());
            summary.payload_len = compressed.raw_payload().map(<[u8]>::len);
            summary.packets = compressed.packets().iter().map(summarize).collect();
        }
        Packet::Opaque { body, .. } => {
            summary.body_len = Some(body.len());
        }
    }
    summary
}
