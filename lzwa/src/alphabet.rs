use crate::error::Error;
use crate::error::Result;
use crate::width::current_width;
use itertools::Itertools;
use rustc_hash::FxHashSet;
use serde::Deserialize;
use serde::Serialize;

/// Code of the reserved entry that signals a bit width increase.
pub const CONTROL_CODE: u32 = 0;
/// How the control entry is written in the alphabet table and in traces.
pub const CONTROL_MARKER: char = '%';

/// The initial symbol set shared by the encoder and the decoder.
///
/// Symbols are stored without the control entry; `symbols()[i]` is seeded with code `i + 1`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alphabet {
  symbols: Vec<char>,
}

impl Alphabet {
  /// Builds the sorted set of distinct symbols of `input`.
  pub fn from_input(input: &[char]) -> Result<Self> {
    if input.is_empty() {
      return Err(Error::EmptyInput);
    };
    let symbols = input
      .iter()
      .copied()
      .collect::<FxHashSet<char>>()
      .into_iter()
      .sorted_unstable()
      .collect_vec();
    Ok(Self { symbols })
  }

  /// Uses `symbols` in the given order, e.g. as read back from an alphabet table.
  pub fn from_symbols(symbols: impl IntoIterator<Item = char>) -> Result<Self> {
    let symbols = symbols.into_iter().collect_vec();
    if symbols.is_empty() {
      return Err(Error::EmptyInput);
    };
    if let Some(dup) = symbols.iter().duplicates().next() {
      return Err(Error::InvalidArtifact(format!(
        "symbol {:?} appears twice in alphabet",
        dup
      )));
    };
    Ok(Self { symbols })
  }

  pub fn symbols(&self) -> &[char] {
    &self.symbols
  }

  /// Number of dictionary slots the alphabet seeds, including the control entry.
  pub fn entry_count(&self) -> usize {
    self.symbols.len() + 1
  }

  /// Width of the first code of a stream.
  pub fn initial_width(&self) -> u32 {
    current_width(self.entry_count())
  }

  /// Entries in code order, the control entry first.
  pub fn entries(&self) -> impl Iterator<Item = char> + '_ {
    std::iter::once(CONTROL_MARKER).chain(self.symbols.iter().copied())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
  }

  #[test]
  fn test_from_input_sorted_distinct() {
    let a = Alphabet::from_input(&chars("BABCA")).unwrap();
    assert_eq!(a.symbols(), &['A', 'B', 'C']);
    assert_eq!(a.entry_count(), 4);
    assert_eq!(a.entries().collect::<String>(), "%ABC");
  }

  #[test]
  fn test_from_input_empty() {
    assert_eq!(Alphabet::from_input(&[]), Err(Error::EmptyInput));
  }

  #[test]
  fn test_control_marker_is_ordinary_symbol() {
    let a = Alphabet::from_input(&chars("a%b")).unwrap();
    assert_eq!(a.symbols(), &['%', 'a', 'b']);
    assert_eq!(a.entry_count(), 4);
  }

  #[test]
  fn test_from_symbols_keeps_order_and_rejects_duplicates() {
    let a = Alphabet::from_symbols(chars("zya")).unwrap();
    assert_eq!(a.symbols(), &['z', 'y', 'a']);
    assert!(matches!(
      Alphabet::from_symbols(chars("aba")),
      Err(Error::InvalidArtifact(_))
    ));
  }

  #[test]
  fn test_initial_width() {
    assert_eq!(Alphabet::from_input(&chars("A")).unwrap().initial_width(), 1);
    assert_eq!(Alphabet::from_input(&chars("AB")).unwrap().initial_width(), 2);
    assert_eq!(Alphabet::from_input(&chars("ABC")).unwrap().initial_width(), 2);
    assert_eq!(Alphabet::from_input(&chars("ABCD")).unwrap().initial_width(), 3);
  }
}
