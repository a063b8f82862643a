//! Step-by-step record of an encode run, rendered as the LZW table CSV.

use crate::alphabet::CONTROL_MARKER;
use crate::bits::CodeWord;
use itertools::Itertools;
use serde::Deserialize;
use serde::Serialize;

pub const TABLE_HEADER: &str = "Buffer,Input,New sequence,Address,Output";

/// One emitted code. `sequence` is `None` for the control code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emission {
  pub word: CodeWord,
  pub sequence: Option<String>,
}

impl Emission {
  fn label(&self) -> String {
    match &self.sequence {
      Some(seq) => format!("@[{}]={}", seq, self.word.code),
      None => format!("@[{}]={}", CONTROL_MARKER, self.word.code),
    }
  }
}

/// One row of the table: the first symbol, each following symbol, or the final flush.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
  /// Longest match before this step; `None` on the first row.
  pub buffer: Option<String>,
  /// Symbol read; `None` on the flush row.
  pub input: Option<char>,
  /// Sequence added to the dictionary and its code.
  pub new_entry: Option<(String, u32)>,
  pub output: Vec<Emission>,
}

fn csv_field(out: &mut String, field: &str) {
  if field.contains(|c: char| matches!(c, ',' | '"' | '\r' | '\n')) {
    out.push('"');
    out.push_str(&field.replace('"', "\"\""));
    out.push('"');
  } else {
    out.push_str(field);
  };
}

/// Renders `steps` with a header row and `\r\n` line endings.
pub fn render_table(steps: &[TraceStep]) -> String {
  let mut out = String::new();
  out.push_str(TABLE_HEADER);
  out.push_str("\r\n");
  for step in steps {
    csv_field(&mut out, step.buffer.as_deref().unwrap_or(""));
    out.push(',');
    csv_field(&mut out, &step.input.map(String::from).unwrap_or_default());
    out.push(',');
    match &step.new_entry {
      Some((seq, code)) => {
        csv_field(&mut out, seq);
        out.push(',');
        out.push_str(&code.to_string());
      }
      None => out.push(','),
    };
    out.push(',');
    csv_field(&mut out, &step.output.iter().map(Emission::label).join(" "));
    out.push_str("\r\n");
  }
  out
}
