use crate::bits::CodeWord;
use serde::Deserialize;
use serde::Serialize;

/// Size accounting for one encode run. Reporting only; never needed to decode.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompressionStats {
  /// Input length times the initial code width.
  pub bits_before: u64,
  /// Sum of the widths of every emitted code, control codes included.
  pub bits_after: u64,
}

impl CompressionStats {
  pub fn new(initial_width: u32, input_len: usize, words: &[CodeWord]) -> Self {
    Self {
      bits_before: u64::from(initial_width) * input_len as u64,
      bits_after: words.iter().map(|w| u64::from(w.width)).sum(),
    }
  }

  /// `bits_after / bits_before`; lower is better.
  pub fn ratio(&self) -> f64 {
    if self.bits_before == 0 {
      return 0.0;
    };
    self.bits_after as f64 / self.bits_before as f64
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_stats() {
    let words = [
      CodeWord { code: 1, width: 2 },
      CodeWord { code: 0, width: 2 },
      CodeWord { code: 5, width: 3 },
    ];
    let s = CompressionStats::new(2, 7, &words);
    assert_eq!(s.bits_before, 14);
    assert_eq!(s.bits_after, 7);
    assert_eq!(s.ratio(), 0.5);
  }
}
