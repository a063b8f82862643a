use crate::alphabet::Alphabet;
use crate::alphabet::CONTROL_CODE;
use crate::bits::pack;
use crate::bits::Bitstream;
use crate::bits::CodeWord;
use crate::dictionary::Cursor;
use crate::dictionary::Dictionary;
use crate::error::Error;
use crate::error::Result;
use crate::options::CodecOptions;
use crate::options::GrowthSignal;
use crate::stats::CompressionStats;
use crate::trace::Emission;
use crate::trace::TraceStep;
use crate::width::WidthTracker;
use tracing::debug;
use tracing::trace;

/// Result of an encode run: the alphabet to persist and the codes to pack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Encoded {
  pub alphabet: Alphabet,
  pub words: Vec<CodeWord>,
  pub input_len: usize,
  pub options: CodecOptions,
}

impl Encoded {
  pub fn bitstream(&self) -> Result<Bitstream> {
    pack(&self.words)
  }

  pub fn stats(&self) -> CompressionStats {
    CompressionStats::new(self.alphabet.initial_width(), self.input_len, &self.words)
  }
}

fn seq_string(seq: &[char]) -> String {
  seq.iter().collect()
}

struct Encoder<'t> {
  dict: Dictionary,
  widths: WidthTracker,
  options: CodecOptions,
  words: Vec<CodeWord>,
  trace: Option<&'t mut Vec<TraceStep>>,
}

impl<'t> Encoder<'t> {
  fn emit(&mut self, code: u32, width: u32, step: &mut TraceStep) {
    let word = CodeWord { code, width };
    trace!(code, width, "emit");
    self.words.push(word);
    if self.trace.is_some() {
      step.output.push(Emission {
        word,
        sequence: self.dict.lookup_sequence(code).map(seq_string),
      });
    };
  }

  fn record(&mut self, step: TraceStep) {
    if let Some(t) = self.trace.as_mut() {
      t.push(step);
    };
  }

  /// Current match as trace text. Only built when tracing.
  fn buffer(&self, at: Cursor) -> Option<String> {
    if self.trace.is_none() {
      return None;
    };
    self.dict.lookup_sequence(at.code()).map(seq_string)
  }

  fn run(mut self, input: &[char]) -> Result<Vec<CodeWord>> {
    let Some((&first, rest)) = input.split_first() else {
      return Err(Error::EmptyInput);
    };
    let mut current = self
      .dict
      .start(first)
      .ok_or(Error::Internal("first symbol missing from seeded dictionary"))?;
    self.record(TraceStep {
      input: Some(first),
      ..Default::default()
    });

    for &s in rest {
      let mut step = TraceStep {
        buffer: self.buffer(current),
        input: Some(s),
        ..Default::default()
      };
      if let Some(longer) = self.dict.extend(current, s) {
        current = longer;
        self.record(step);
        continue;
      };

      self.emit(current.code(), self.widths.width(), &mut step);
      if let Some(mut seq) = step.buffer.clone() {
        seq.push(s);
        step.new_entry = Some((seq, self.dict.next_code()?));
      };
      self.dict.insert_extension(current, s)?;
      if let Some(old_width) = self.widths.observe(self.dict.len()) {
        if self.options.growth_signal == GrowthSignal::Explicit {
          self.emit(CONTROL_CODE, old_width, &mut step);
        };
      };
      current = self
        .dict
        .start(s)
        .ok_or(Error::Internal("input symbol missing from seeded dictionary"))?;
      self.record(step);
    }

    let mut step = TraceStep {
      buffer: self.buffer(current),
      ..Default::default()
    };
    self.emit(current.code(), self.widths.width(), &mut step);
    self.record(step);

    debug!(
      input_len = input.len(),
      codes = self.words.len(),
      dictionary_len = self.dict.len(),
      final_width = self.widths.width(),
      growths = self.widths.growths(),
      "encoded",
    );
    Ok(self.words)
  }
}

fn encode_inner(
  input: &[char],
  options: CodecOptions,
  trace: Option<&mut Vec<TraceStep>>,
) -> Result<Encoded> {
  let alphabet = Alphabet::from_input(input)?;
  let dict = Dictionary::seed(&alphabet);
  let widths = WidthTracker::new(dict.len());
  let words = Encoder {
    dict,
    widths,
    options,
    words: Vec::new(),
    trace,
  }
  .run(input)?;
  Ok(Encoded {
    alphabet,
    words,
    input_len: input.len(),
    options,
  })
}

/// Greedy LZW over `input`, with a dictionary seeded from the input's own alphabet.
pub fn encode(input: &[char], options: CodecOptions) -> Result<Encoded> {
  encode_inner(input, options, None)
}

/// Like [`encode`], also returning one [`TraceStep`] per symbol plus the final flush.
pub fn encode_traced(input: &[char], options: CodecOptions) -> Result<(Encoded, Vec<TraceStep>)> {
  let mut steps = Vec::with_capacity(input.len() + 1);
  let encoded = encode_inner(input, options, Some(&mut steps))?;
  Ok((encoded, steps))
}
