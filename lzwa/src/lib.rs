//! Adaptive-width LZW over text.
//!
//! The dictionary is seeded with the distinct characters of the input plus a reserved control
//! entry (code 0). Codes start at the smallest width that addresses the seeded dictionary and
//! widen by one bit each time the dictionary outgrows the current width. The encoder and the
//! decoder replay the same growth schedule, so widths are never stored in the stream; by
//! default the encoder also writes the control code right before each widening.
//!
//! The decoder needs the alphabet the encoder used. It is persisted separately as an alphabet
//! table (see [`artifact`]).

pub mod alphabet;
pub mod artifact;
pub mod bits;
pub mod decoder;
pub mod dictionary;
pub mod encoder;
pub mod error;
pub mod options;
pub mod stats;
pub mod trace;
mod trie;
pub mod width;

pub use alphabet::Alphabet;
pub use alphabet::CONTROL_CODE;
pub use alphabet::CONTROL_MARKER;
pub use bits::Bitstream;
pub use bits::CodeWord;
pub use decoder::decode;
pub use decoder::Decoder;
pub use encoder::encode;
pub use encoder::encode_traced;
pub use encoder::Encoded;
pub use error::Error;
pub use error::Result;
pub use options::CodecOptions;
pub use options::GrowthSignal;
pub use stats::CompressionStats;

/// Encodes `text` and packs the codes. Returns the alphabet the decoder will need.
pub fn compress(text: &str, options: CodecOptions) -> Result<(Alphabet, Bitstream)> {
  let input: Vec<char> = text.chars().collect();
  let encoded = encode(&input, options)?;
  let stream = encoded.bitstream()?;
  Ok((encoded.alphabet, stream))
}

pub fn decompress(stream: &Bitstream, alphabet: &Alphabet, options: CodecOptions) -> Result<String> {
  Ok(decode(stream, alphabet, options)?.into_iter().collect())
}
