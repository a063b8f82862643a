use crate::error::Error;
use crate::error::Result;
use bit_vec::BitVec;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/// A code and the number of bits it occupies in the stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeWord {
  pub code: u32,
  pub width: u32,
}

/// Contiguous bit sequence, most significant bit of each byte first.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Bitstream {
  bits: BitVec,
}

impl Bitstream {
  pub fn new() -> Self {
    Self::default()
  }

  /// Length in bits.
  pub fn len(&self) -> usize {
    self.bits.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bits.is_empty()
  }

  /// Packed bytes; the last one is padded with zero bits.
  pub fn to_bytes(&self) -> Vec<u8> {
    self.bits.to_bytes()
  }

  pub fn bit(&self, idx: usize) -> Option<bool> {
    self.bits.get(idx)
  }

  pub fn push(&mut self, bit: bool) {
    self.bits.push(bit);
  }

  /// Drops every bit from `len` onwards.
  pub fn truncate(&mut self, len: usize) {
    self.bits.truncate(len);
  }

  /// Textual form: one `0` or `1` character per bit.
  pub fn to_bit_string(&self) -> String {
    self
      .bits
      .iter()
      .map(|b| if b { '1' } else { '0' })
      .collect()
  }

  pub fn from_bit_string(s: &str) -> Result<Self> {
    let mut out = Self::new();
    for (i, c) in s.chars().enumerate() {
      match c {
        '0' => out.push(false),
        '1' => out.push(true),
        _ => {
          return Err(Error::InvalidArtifact(format!(
            "unexpected character {:?} at position {} of bitstream",
            c, i
          )))
        }
      };
    }
    Ok(out)
  }
}

impl fmt::Debug for Bitstream {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Bitstream({})", self.to_bit_string())
  }
}

pub struct BitWriter {
  out: Bitstream,
}

impl BitWriter {
  pub fn new() -> Self {
    Self {
      out: Bitstream::new(),
    }
  }

  /// Appends the low `width` bits of `value`, most significant first.
  pub fn write(&mut self, value: u32, width: u32) -> Result<()> {
    if width == 0 || width > u32::BITS {
      return Err(Error::Internal("code width out of range"));
    };
    if width < u32::BITS && value >> width != 0 {
      return Err(Error::Internal("code does not fit its width"));
    };
    for shift in (0..width).rev() {
      self.out.push((value >> shift) & 1 != 0);
    }
    Ok(())
  }

  pub fn finish(self) -> Bitstream {
    self.out
  }
}

impl Default for BitWriter {
  fn default() -> Self {
    Self::new()
  }
}

/// Packs `words` into one bitstream, in order, without padding between codes.
pub fn pack(words: &[CodeWord]) -> Result<Bitstream> {
  let mut w = BitWriter::new();
  for word in words {
    w.write(word.code, word.width)?;
  }
  Ok(w.finish())
}

/// Reads codes whose widths are chosen by the caller.
pub struct BitReader<'a> {
  stream: &'a Bitstream,
  pos: usize,
}

impl<'a> BitReader<'a> {
  pub fn new(stream: &'a Bitstream) -> Self {
    Self { stream, pos: 0 }
  }

  /// Bits consumed so far.
  pub fn position(&self) -> usize {
    self.pos
  }

  pub fn remaining(&self) -> usize {
    self.stream.len() - self.pos
  }

  pub fn at_end(&self) -> bool {
    self.remaining() == 0
  }

  pub fn read(&mut self, width: u32) -> Result<u32> {
    if width == 0 || width > u32::BITS {
      return Err(Error::Internal("code width out of range"));
    };
    if self.remaining() < width as usize {
      return Err(Error::TruncatedStream {
        bit_offset: self.pos,
        needed: width,
        available: self.remaining(),
      });
    };
    let mut v = 0u32;
    for i in self.pos..self.pos + width as usize {
      // In range: checked against `remaining` above.
      let bit = self.stream.bit(i).unwrap_or(false);
      v = (v << 1) | u32::from(bit);
    }
    self.pos += width as usize;
    Ok(v)
  }
}
