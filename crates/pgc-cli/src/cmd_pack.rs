/// Implementation of `pgc pack`.
///
/// Reads a file and writes a one-packet stream: an uncompressed
/// COMPRESSED DATA container holding a single LITERAL packet.
///
/// ```text
/// ┌──────────────────────────────────────────────┐
/// │ 0xC8 len  0x00                               │  compressed, algorithm 0
/// │   ┌────────────────────────────────────────┐ │
/// │   │ 0xCB len  fmt name_len name date data  │ │  literal
/// │   └────────────────────────────────────────┘ │
/// └──────────────────────────────────────────────┘
/// ```
///
/// The literal date is the input file's modification time, or 0 when
/// it is unavailable or does not fit in 32 bits.
use std::fs;
use std::time::UNIX_EPOCH;

use anyhow::{Context, Result};
use pgc_types::{CompressedDataBuilder, CompressionAlgorithm, LiteralFormat};
use tracing::{debug, info};

use crate::PackArgs;

/// Run the `pgc pack` command.
///
/// # Errors
///
/// Returns an error if the input cannot be read, the filename is longer
/// than 255 bytes, or the output cannot be written.
pub fn run(args: &PackArgs) -> Result<()> {
    let data =
        fs::read(&args.input).with_context(|| format!("cannot read {}", args.input.display()))?;

    let filename = match &args.filename {
        Some(name) => name.clone(),
        None => args
            .input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    let format = if args.text {
        LiteralFormat::Text
    } else {
        LiteralFormat::Binary
    };
    let date = modification_time(&args.input);
    debug!(%filename, date, "literal header");

    let bytes = CompressedDataBuilder::new(CompressionAlgorithm::Uncompressed)
        .add_literal(format, &filename, date, &data)
        .encode()
        .context("failed to encode packet")?;

    fs::write(&args.output, &bytes)
        .with_context(|| format!("cannot write {}", args.output.display()))?;

    info!(
        input = data.len(),
        output = bytes.len(),
        path = %args.output.display(),
        "packed literal data"
    );
    Ok(())
}

fn modification_time(path: &std::path::Path) -> u32 {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .and_then(|since| u32::try_from(since.as_secs()).ok())
        .unwrap_or(0)
}
