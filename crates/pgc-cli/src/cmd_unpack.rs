/// Implementation of `pgc unpack`.
///
/// Parses a packet stream, finds the first literal packet (searching
/// compressed containers depth-first) and writes its data verbatim.
use std::fs;

use anyhow::{Context, Result, bail};
use pgc_types::{DecodeLimits, PacketList};
use tracing::info;

use crate::UnpackArgs;

/// Run the `pgc unpack` command.
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed, if it holds
/// no literal packet, or if the output cannot be written.
pub fn run(args: &UnpackArgs, limits: &DecodeLimits) -> Result<()> {
    let bytes =
        fs::read(&args.file).with_context(|| format!("cannot read {}", args.file.display()))?;

    let list = PacketList::read_with_limits(&bytes, limits)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;

    let Some(literal) = list.literal_data() else {
        bail!("{} contains no literal data packet", args.file.display());
    };

    fs::write(&args.output, &literal.data)
        .with_context(|| format!("cannot write {}", args.output.display()))?;

    info!(
        filename = %literal.filename_lossy(),
        bytes = literal.data.len(),
        output = %args.output.display(),
        "unpacked literal data"
    );
    Ok(())
}
