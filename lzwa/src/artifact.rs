//! Text forms of the persisted alphabet table and the compressed artifact.

use crate::alphabet::Alphabet;
use crate::alphabet::CONTROL_MARKER;
use crate::bits::Bitstream;
use crate::error::Error;
use crate::error::Result;
use crate::stats::CompressionStats;
use itertools::Itertools;

/// Renders `%,<sym>,<sym>,...` terminated by `\r\n`.
pub fn render_alphabet_table(alphabet: &Alphabet) -> String {
  let mut out = alphabet.entries().join(",");
  out.push_str("\r\n");
  out
}

/// Parses a table written by [`render_alphabet_table`].
///
/// Every entry is one character, so entries sit at even positions and separators at odd ones.
/// That keeps `,` and `%` usable as symbols.
pub fn parse_alphabet_table(text: &str) -> Result<Alphabet> {
  let chars = text.chars().collect_vec();
  let body = [&['\r', '\n'][..], &['\n'][..], &[][..]]
    .iter()
    .filter_map(|term| chars.strip_suffix(*term))
    .find(|body| body.len() % 2 == 1)
    .ok_or_else(|| Error::InvalidArtifact("alphabet table has an even number of characters".into()))?;
  if body[0] != CONTROL_MARKER {
    return Err(Error::InvalidArtifact(format!(
      "alphabet table must start with {:?}, found {:?}",
      CONTROL_MARKER, body[0]
    )));
  };
  if let Some((pos, &c)) = body
    .iter()
    .enumerate()
    .skip(1)
    .step_by(2)
    .find(|(_, &c)| c != ',')
  {
    return Err(Error::InvalidArtifact(format!(
      "expected ',' at position {} of alphabet table, found {:?}",
      pos, c
    )));
  };
  Alphabet::from_symbols(body.iter().copied().skip(2).step_by(2))
}

/// Renders the bitstream line followed by the statistics lines.
pub fn render_compressed(stream: &Bitstream, stats: &CompressionStats) -> String {
  format!(
    "{}\nSize before LZW compression: {} bits\nSize after LZW compression: {} bits\nCompression ratio: {:.3}",
    stream.to_bit_string(),
    stats.bits_before,
    stats.bits_after,
    stats.ratio(),
  )
}

/// Reads the bitstream line of a compressed artifact. The statistics lines are ignored.
pub fn parse_compressed(text: &str) -> Result<Bitstream> {
  let line = text.lines().next().unwrap_or("");
  Bitstream::from_bit_string(line.trim_end_matches('\r'))
}
