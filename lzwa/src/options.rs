use serde::Deserialize;
use serde::Serialize;

/// How a code width increase is communicated to the decoder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthSignal {
  /// The encoder writes the control code, at the old width, right before the first code that
  /// uses the new width.
  #[default]
  Explicit,
  /// No control code is written; the decoder applies the growth rule on its own.
  Implicit,
}

/// Settings both sides of a stream must agree on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecOptions {
  pub growth_signal: GrowthSignal,
}

impl CodecOptions {
  pub fn implicit() -> Self {
    Self {
      growth_signal: GrowthSignal::Implicit,
    }
  }
}
