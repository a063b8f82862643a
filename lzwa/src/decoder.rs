use crate::alphabet::Alphabet;
use crate::alphabet::CONTROL_CODE;
use crate::bits::BitReader;
use crate::bits::Bitstream;
use crate::bits::CodeWord;
use crate::dictionary::Dictionary;
use crate::error::Error;
use crate::error::Result;
use crate::options::CodecOptions;
use crate::options::GrowthSignal;
use crate::width::WidthTracker;
use tracing::debug;
use tracing::trace;

/// A code read from the stream, with what it decoded to. `sequence` is `None` for the control
/// code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedCode {
  pub bit_offset: usize,
  pub word: CodeWord,
  pub sequence: Option<Vec<char>>,
}

/// Rebuilds the encoder's dictionary from the codes alone and yields what each code stands for.
///
/// The encoder inserts one entry after every code that is followed by another one. The decoder
/// only learns that entry's last symbol from the next code, so it runs one insertion behind and
/// checks the growth rule against `dictionary.len() + 1` before reading each code after the
/// first.
pub struct Decoder<'a> {
  reader: BitReader<'a>,
  dict: Dictionary,
  widths: WidthTracker,
  options: CodecOptions,
  previous: Option<Vec<char>>,
  // Set after a control code; a data code must follow it.
  expect_data: bool,
  failed: bool,
}

impl<'a> Decoder<'a> {
  pub fn new(stream: &'a Bitstream, alphabet: &Alphabet, options: CodecOptions) -> Self {
    let dict = Dictionary::seed(alphabet);
    let widths = WidthTracker::new(dict.len());
    Self {
      reader: BitReader::new(stream),
      dict,
      widths,
      options,
      previous: None,
      expect_data: false,
      failed: false,
    }
  }

  pub fn dictionary(&self) -> &Dictionary {
    &self.dict
  }

  pub fn width(&self) -> u32 {
    self.widths.width()
  }

  fn read_first(&mut self) -> Result<DecodedCode> {
    if self.reader.at_end() {
      return Err(Error::TruncatedStream {
        bit_offset: 0,
        needed: self.widths.width(),
        available: 0,
      });
    };
    let bit_offset = self.reader.position();
    let width = self.widths.width();
    let code = self.reader.read(width)?;
    let seq = self
      .dict
      .lookup_sequence(code)
      .ok_or(Error::AlphabetMismatch {
        code,
        alphabet_len: self.dict.len(),
      })?
      .to_vec();
    self.previous = Some(seq.clone());
    Ok(DecodedCode {
      bit_offset,
      word: CodeWord { code, width },
      sequence: Some(seq),
    })
  }

  /// Handles the width increase the encoder performed after its last insertion, if any.
  fn read_growth(&mut self) -> Result<Option<DecodedCode>> {
    let bit_offset = self.reader.position();
    let width = self.widths.width();
    if self.widths.observe(self.dict.len() + 1).is_none() {
      return Ok(None);
    };
    if self.options.growth_signal == GrowthSignal::Implicit {
      return Ok(None);
    };
    let code = self.reader.read(width)?;
    if code != CONTROL_CODE {
      return Err(Error::corrupt(
        bit_offset,
        format!("expected width increase signal, found code {}", code),
      ));
    };
    Ok(Some(DecodedCode {
      bit_offset,
      word: CodeWord { code, width },
      sequence: None,
    }))
  }

  fn read_data(&mut self, previous: Vec<char>) -> Result<DecodedCode> {
    let bit_offset = self.reader.position();
    let width = self.widths.width();
    let code = self.reader.read(width)?;
    if code == CONTROL_CODE {
      return Err(Error::corrupt(
        bit_offset,
        "width increase signal where no increase is due",
      ));
    };
    let next_code = self.dict.next_code()?;
    let seq = match self.dict.lookup_sequence(code) {
      Some(seq) => seq.to_vec(),
      // The encoder emitted the entry it had just created, which starts with `previous`.
      None if code == next_code => {
        let mut seq = previous.clone();
        seq.push(previous[0]);
        seq
      }
      None => {
        return Err(Error::corrupt(
          bit_offset,
          format!(
            "code {} is beyond the next dictionary code {}",
            code, next_code
          ),
        ))
      }
    };
    let mut entry = previous;
    entry.push(seq[0]);
    match self.dict.insert(entry) {
      Ok(_) => {}
      Err(Error::DuplicateSequence { code: existing }) => {
        return Err(Error::corrupt(
          bit_offset,
          format!("code {} implies an entry already held by code {}", code, existing),
        ))
      }
      Err(e) => return Err(e),
    };
    self.previous = Some(seq.clone());
    Ok(DecodedCode {
      bit_offset,
      word: CodeWord { code, width },
      sequence: Some(seq),
    })
  }

  fn step(&mut self) -> Result<Option<DecodedCode>> {
    let Some(previous) = self.previous.take() else {
      return self.read_first().map(Some);
    };
    if !self.expect_data {
      if self.reader.at_end() {
        self.previous = Some(previous);
        return Ok(None);
      };
      if let Some(control) = self.read_growth()? {
        self.previous = Some(previous);
        self.expect_data = true;
        return Ok(Some(control));
      };
    };
    self.expect_data = false;
    self.read_data(previous).map(Some)
  }
}

impl<'a> Iterator for Decoder<'a> {
  type Item = Result<DecodedCode>;

  /// Yields every code of the stream, control codes included. Stops after the first error.
  fn next(&mut self) -> Option<Self::Item> {
    if self.failed {
      return None;
    };
    match self.step() {
      Ok(Some(d)) => {
        trace!(code = d.word.code, width = d.word.width, "read");
        Some(Ok(d))
      }
      Ok(None) => None,
      Err(e) => {
        self.failed = true;
        Some(Err(e))
      }
    }
  }
}

/// Decodes a whole stream. Returns nothing on error; any failure invalidates every later code.
pub fn decode(stream: &Bitstream, alphabet: &Alphabet, options: CodecOptions) -> Result<Vec<char>> {
  let mut decoder = Decoder::new(stream, alphabet, options);
  let mut out = Vec::new();
  let mut codes = 0usize;
  for d in decoder.by_ref() {
    if let Some(seq) = d?.sequence {
      out.extend_from_slice(&seq);
    };
    codes += 1;
  }
  debug!(
    codes,
    output_len = out.len(),
    dictionary_len = decoder.dictionary().len(),
    final_width = decoder.width(),
    "decoded",
  );
  Ok(out)
}
