use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use lzwa::artifact::parse_alphabet_table;
use lzwa::artifact::parse_compressed;
use lzwa::Alphabet;
use lzwa::CodecOptions;
use lzwa::CompressionStats;
use lzwa::Decoder;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing::warn;

#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
  /// Path to the `.lzw` file.
  lzw_file: PathBuf,

  /// Path to the alphabet table. Defaults to `<stem>_dico.csv` next to the `.lzw` file.
  #[arg(short, long)]
  alphabet: Option<PathBuf>,

  /// The stream was written without width increase codes.
  #[arg(long)]
  implicit_growth: bool,

  /// Print the inspection as JSON.
  #[arg(long)]
  json: bool,
}

static RE_BITS_BEFORE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?m)^Size before LZW compression: (\d+) bits\r?$").unwrap());
static RE_BITS_AFTER: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?m)^Size after LZW compression: (\d+) bits\r?$").unwrap());
static RE_RATIO: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?m)^Compression ratio: (\d+(?:\.\d+)?)\r?$").unwrap());

/// Statistics as written in the artifact. Any of them may be missing.
#[derive(Debug, Default, PartialEq, Serialize)]
struct RecordedStats {
  bits_before: Option<u64>,
  bits_after: Option<u64>,
  ratio: Option<f64>,
}

impl RecordedStats {
  fn parse(artifact: &str) -> Self {
    fn capture<T: std::str::FromStr>(re: &Regex, text: &str) -> Option<T> {
      re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
    }
    Self {
      bits_before: capture(&RE_BITS_BEFORE, artifact),
      bits_after: capture(&RE_BITS_AFTER, artifact),
      ratio: capture(&RE_RATIO, artifact),
    }
  }

  /// Descriptions of every recorded value that disagrees with `computed`.
  fn mismatches(&self, computed: &CompressionStats) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(v) = self.bits_before.filter(|v| *v != computed.bits_before) {
      out.push(format!("bits before: recorded {}, computed {}", v, computed.bits_before));
    };
    if let Some(v) = self.bits_after.filter(|v| *v != computed.bits_after) {
      out.push(format!("bits after: recorded {}, computed {}", v, computed.bits_after));
    };
    // Recorded with three decimals.
    if let Some(v) = self.ratio.filter(|v| (v - computed.ratio()).abs() > 0.0005) {
      out.push(format!("ratio: recorded {}, computed {:.3}", v, computed.ratio()));
    };
    out
  }
}

#[derive(Debug, Serialize)]
struct CodeRow {
  bit_offset: usize,
  code: u32,
  width: u32,
  control: bool,
  sequence: Option<String>,
}

#[derive(Debug, Serialize)]
struct Inspection {
  alphabet: Alphabet,
  initial_width: u32,
  final_width: u32,
  dictionary_len: usize,
  codes: Vec<CodeRow>,
  text: String,
  recorded: RecordedStats,
  computed: CompressionStats,
  error: Option<String>,
}

impl Inspection {
  fn run(artifact: &str, alphabet: Alphabet, options: CodecOptions) -> Result<Self> {
    let stream = parse_compressed(artifact)?;
    let mut decoder = Decoder::new(&stream, &alphabet, options);
    let mut codes = Vec::new();
    let mut text = String::new();
    let mut error = None;
    while let Some(d) = decoder.next() {
      match d {
        Ok(d) => {
          let sequence = d.sequence.map(|s| s.into_iter().collect::<String>());
          if let Some(s) = &sequence {
            text.push_str(s);
          };
          codes.push(CodeRow {
            bit_offset: d.bit_offset,
            code: d.word.code,
            width: d.word.width,
            control: sequence.is_none(),
            sequence,
          });
        }
        Err(e) => error = Some(e.to_string()),
      };
    }
    let final_width = decoder.width();
    let dictionary_len = decoder.dictionary().len();
    let computed = CompressionStats {
      bits_before: u64::from(alphabet.initial_width()) * text.chars().count() as u64,
      bits_after: codes.iter().map(|c| u64::from(c.width)).sum(),
    };
    Ok(Self {
      initial_width: alphabet.initial_width(),
      alphabet,
      final_width,
      dictionary_len,
      codes,
      text,
      recorded: RecordedStats::parse(artifact),
      computed,
      error,
    })
  }

  fn generate_inspection_message(&self) -> String {
    let mut lines = vec![
      format!(
        "alphabet: {} entries, {:?}",
        self.alphabet.entry_count(),
        self.alphabet.entries().collect::<String>()
      ),
      format!(
        "width: {} -> {}, dictionary: {} entries",
        self.initial_width, self.final_width, self.dictionary_len
      ),
      format!("{:>8} {:>5} {:>8}  sequence", "offset", "width", "code"),
    ];
    lines.extend(self.codes.iter().map(|row| {
      let seq = match &row.sequence {
        Some(s) => format!("{:?}", s),
        None => "<width+1>".to_string(),
      };
      format!("{:>8} {:>5} {:>8}  {}", row.bit_offset, row.width, row.code, seq)
    }));
    lines.push(format!(
      "bits before: {}, bits after: {}, ratio: {:.3}",
      self.computed.bits_before,
      self.computed.bits_after,
      self.computed.ratio()
    ));
    lines.extend(
      self
        .recorded
        .mismatches(&self.computed)
        .into_iter()
        .map(|m| format!("stats mismatch: {}", m)),
    );
    if let Some(e) = &self.error {
      lines.push(format!("error: {}", e));
    };
    lines.into_iter().map(|l| l + "\n").collect()
  }
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let cli = Cli::parse();

  let alphabet_path = match cli.alphabet {
    Some(p) => p,
    None => {
      let name = cli
        .lzw_file
        .file_name()
        .and_then(|n| n.to_str())
        .context("lzw file has no usable name")?;
      let stem = name.split('.').next().unwrap_or(name);
      cli.lzw_file.with_file_name(format!("{}_dico.csv", stem))
    }
  };
  let table = fs::read_to_string(&alphabet_path)
    .with_context(|| format!("failed to read {}", alphabet_path.display()))?;
  let alphabet = parse_alphabet_table(&table)?;
  let artifact = fs::read_to_string(&cli.lzw_file)
    .with_context(|| format!("failed to read {}", cli.lzw_file.display()))?;

  let options = if cli.implicit_growth {
    CodecOptions::implicit()
  } else {
    CodecOptions::default()
  };
  let inspection = Inspection::run(&artifact, alphabet, options)?;
  info!(codes = inspection.codes.len(), "inspected");
  for m in inspection.recorded.mismatches(&inspection.computed) {
    warn!(mismatch = %m, "recorded statistics disagree with stream");
  }

  if cli.json {
    println!("{}", serde_json::to_string_pretty(&inspection)?);
  } else {
    print!("{}", inspection.generate_inspection_message());
  };
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  const ARTIFACT: &str = "011000011101\nSize before LZW compression: 14 bits\nSize after LZW compression: 12 bits\nCompression ratio: 0.857";

  fn alphabet() -> Alphabet {
    parse_alphabet_table("%,A,B\r\n").unwrap()
  }

  #[test]
  fn test_recorded_stats() {
    assert_eq!(
      RecordedStats::parse(ARTIFACT),
      RecordedStats {
        bits_before: Some(14),
        bits_after: Some(12),
        ratio: Some(0.857),
      }
    );
    assert_eq!(RecordedStats::parse("0101\n"), RecordedStats::default());
  }

  #[test]
  fn test_inspection() {
    let i = Inspection::run(ARTIFACT, alphabet(), CodecOptions::default()).unwrap();
    assert_eq!(i.text, "ABABABA");
    assert_eq!(i.codes.len(), 5);
    assert!(i.codes[2].control);
    assert_eq!(i.final_width, 3);
    assert_eq!(i.error, None);
    assert!(i.recorded.mismatches(&i.computed).is_empty());
    let msg = i.generate_inspection_message();
    assert!(msg.contains("<width+1>"));
    assert!(!msg.contains("stats mismatch"));
    // Three header lines, one per code, one for the statistics.
    assert_eq!(msg.lines().count(), 3 + 5 + 1);
    assert!(msg.ends_with('\n'));
  }

  #[test]
  fn test_inspection_reports_stats_mismatch_and_error() {
    let artifact = "01100001110\nSize before LZW compression: 14 bits\nSize after LZW compression: 12 bits\n";
    let i = Inspection::run(artifact, alphabet(), CodecOptions::default()).unwrap();
    assert_eq!(i.text, "ABAB");
    assert!(i.error.as_deref().unwrap().contains("truncated"));
    let mismatches = i.recorded.mismatches(&i.computed);
    assert_eq!(mismatches.len(), 2);
  }
}
