use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  /// There are no symbols to seed an alphabet with.
  #[error("input is empty")]
  EmptyInput,

  /// A sequence was inserted into the dictionary twice.
  #[error("sequence already present in dictionary with code {code}")]
  DuplicateSequence { code: u32 },

  /// A code in the bitstream has no valid resolution.
  #[error("corrupt stream at bit {bit_offset}: {reason}")]
  CorruptStream { bit_offset: usize, reason: String },

  /// The bitstream ends in the middle of a code.
  #[error("truncated stream at bit {bit_offset}: needed {needed} bits, {available} available")]
  TruncatedStream {
    bit_offset: usize,
    needed: u32,
    available: usize,
  },

  /// The first code of the bitstream does not name a symbol of the supplied alphabet.
  #[error("alphabet mismatch: first code {code} does not name one of {alphabet_len} alphabet entries")]
  AlphabetMismatch { code: u32, alphabet_len: usize },

  #[error("internal consistency error: {0}")]
  Internal(&'static str),

  /// An alphabet table or bitstream text could not be parsed.
  #[error("invalid artifact: {0}")]
  InvalidArtifact(String),
}

impl Error {
  pub(crate) fn corrupt(bit_offset: usize, reason: impl Into<String>) -> Self {
    Error::CorruptStream {
      bit_offset,
      reason: reason.into(),
    }
  }

  /// Short category name, used in log fields.
  pub fn category(&self) -> &'static str {
    match self {
      Error::EmptyInput => "empty_input",
      Error::DuplicateSequence { .. } => "duplicate_sequence",
      Error::CorruptStream { .. } => "corrupt_stream",
      Error::TruncatedStream { .. } => "truncated_stream",
      Error::AlphabetMismatch { .. } => "alphabet_mismatch",
      Error::Internal(_) => "internal",
      Error::InvalidArtifact(_) => "invalid_artifact",
    }
  }
}
