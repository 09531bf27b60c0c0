use crate::compression::codec_for;
use crate::enums::CompressionAlgorithm;
use crate::error::PacketError;

/// Default ceiling on the decompressed bytes of one read (256 MiB).
pub const DEFAULT_MAX_DECOMPRESSED_SIZE: usize = 256 * 1024 * 1024;

/// Default ceiling on how many compressed containers may enclose each other.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 32;

/// Resource limits applied while decoding packet streams.
///
/// ```text
/// ┌───────────────────────┬──────────────────────────────────────────┐
/// │ Field                 │ Purpose                                  │
/// ├───────────────────────┼──────────────────────────────────────────┤
/// │ max_decompressed_size │ Upper bound on all decoded output of one │
/// │                       │ read, summed over every nested container │
/// │ max_nesting_depth     │ How many containers may sit inside each  │
/// │                       │ other before decoding stops              │
/// └───────────────────────┴──────────────────────────────────────────┘
/// ```
///
/// A compressed packet may legally contain another compressed packet, so
/// without a depth bound a self-reproducing payload would recurse until
/// the stack overflows. Both limits turn such input into a typed error.
///
/// The size limit is shared by every container a read descends into. A
/// stream of nested containers, each re-emitting its payload, cannot
/// claim a fresh allowance per level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum decoded bytes produced by one read, across all levels.
    pub max_decompressed_size: usize,

    /// Maximum number of nested compressed containers. With a value of
    /// 1, a top-level container decodes but one inside it does not.
    pub max_nesting_depth: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_decompressed_size: DEFAULT_MAX_DECOMPRESSED_SIZE,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

/// Decoded bytes still available to one top-level read.
///
/// Created once per `read` and threaded through every nested container,
/// each of which charges its decoded output here.
#[derive(Debug)]
pub(crate) struct DecodeBudget {
    limits: DecodeLimits,
    remaining: usize,
}

impl DecodeBudget {
    pub(crate) fn new(limits: &DecodeLimits) -> Self {
        Self {
            limits: *limits,
            remaining: limits.max_decompressed_size,
        }
    }

    pub(crate) fn limits(&self) -> &DecodeLimits {
        &self.limits
    }

    /// Decode `payload` with the algorithm's back end, allowing at most
    /// the remaining budget, and charge the output against it.
    pub(crate) fn decode(
        &mut self,
        algorithm: CompressionAlgorithm,
        payload: &[u8],
    ) -> Result<Vec<u8>, PacketError> {
        let limit = self.limits.max_decompressed_size;
        let inner = codec_for(algorithm)
            .decode(payload, self.remaining)
            .map_err(|e| match e {
                PacketError::DecompressionBomb { .. } => PacketError::DecompressionBomb { limit },
                other => other,
            })?;
        self.remaining = self
            .remaining
            .checked_sub(inner.len())
            .ok_or(PacketError::DecompressionBomb { limit })?;
        Ok(inner)
    }
}
