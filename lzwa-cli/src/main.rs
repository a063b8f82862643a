use anyhow::anyhow;
use anyhow::Context;
use anyhow::Result;
use clap::ArgGroup;
use clap::Parser;
use lzwa::artifact::parse_alphabet_table;
use lzwa::artifact::parse_compressed;
use lzwa::artifact::render_alphabet_table;
use lzwa::artifact::render_compressed;
use lzwa::trace::render_table;
use lzwa::CodecOptions;
use std::fs;
use std::io::stdout;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing::info;

#[derive(Debug, Parser)]
#[command(version)]
#[command(group(ArgGroup::new("mode").required(true).args(["compress", "uncompress"])))]
struct Cli {
  /// Compress a text file into `<stem>.lzw`, `<stem>_dico.csv` and `<stem>_LZWTable.csv`.
  #[arg(short, long)]
  compress: bool,

  /// Uncompress a `.lzw` file; `<stem>_dico.csv` must sit next to it.
  #[arg(short, long)]
  uncompress: bool,

  /// File to process.
  #[arg(short, long)]
  path: PathBuf,

  /// Directory to write compression artifacts to.
  #[arg(short, long, default_value = ".")]
  dir: PathBuf,

  /// Write uncompressed text to this file instead of stdout.
  #[arg(short, long)]
  out: Option<PathBuf>,

  /// Do not write the width increase code; uncompressing then needs this flag too.
  #[arg(long)]
  implicit_growth: bool,

  /// Do not write the LZW table.
  #[arg(long)]
  no_trace: bool,
}

/// Name shared by every artifact of an input: the file name up to its first `.`.
fn artifact_stem(path: &Path) -> Result<String> {
  let name = path
    .file_name()
    .and_then(|n| n.to_str())
    .ok_or_else(|| anyhow!("{} has no usable file name", path.display()))?;
  let stem = name.split('.').next().unwrap_or(name);
  if stem.is_empty() {
    return Err(anyhow!("{} has an empty file stem", path.display()));
  };
  Ok(stem.to_string())
}

fn compress(cli: &Cli, options: CodecOptions) -> Result<()> {
  let stem = artifact_stem(&cli.path)?;
  let raw = fs::read_to_string(&cli.path)
    .with_context(|| format!("failed to read {}", cli.path.display()))?;
  let input: Vec<char> = raw.trim_end_matches('\n').chars().collect();
  info!(path = %cli.path.display(), symbols = input.len(), "compressing");

  let (encoded, steps) = if cli.no_trace {
    (lzwa::encode(&input, options)?, Vec::new())
  } else {
    lzwa::encode_traced(&input, options)?
  };

  let dico_path = cli.dir.join(format!("{}_dico.csv", stem));
  info!(path = %dico_path.display(), entries = encoded.alphabet.entry_count(), "writing alphabet table");
  fs::write(&dico_path, render_alphabet_table(&encoded.alphabet))
    .with_context(|| format!("failed to write {}", dico_path.display()))?;

  if !cli.no_trace {
    let table_path = cli.dir.join(format!("{}_LZWTable.csv", stem));
    info!(path = %table_path.display(), rows = steps.len(), "writing LZW table");
    fs::write(&table_path, render_table(&steps))
      .with_context(|| format!("failed to write {}", table_path.display()))?;
  };

  let stream = encoded.bitstream()?;
  let stats = encoded.stats();
  let lzw_path = cli.dir.join(format!("{}.lzw", stem));
  info!(path = %lzw_path.display(), bits = stream.len(), "writing compressed stream");
  fs::write(&lzw_path, render_compressed(&stream, &stats))
    .with_context(|| format!("failed to write {}", lzw_path.display()))?;

  info!(
    bits_before = stats.bits_before,
    bits_after = stats.bits_after,
    compression_ratio = stats.ratio(),
    codes = encoded.words.len(),
    "compression performance evaluated",
  );
  Ok(())
}

fn uncompress(cli: &Cli, options: CodecOptions) -> Result<()> {
  let stem = artifact_stem(&cli.path)?;
  let dico_path = cli
    .path
    .parent()
    .unwrap_or_else(|| Path::new(""))
    .join(format!("{}_dico.csv", stem));
  let table = fs::read_to_string(&dico_path)
    .with_context(|| format!("failed to read alphabet table {}", dico_path.display()))?;
  let alphabet = parse_alphabet_table(&table)
    .with_context(|| format!("failed to parse {}", dico_path.display()))?;

  let artifact = fs::read_to_string(&cli.path)
    .with_context(|| format!("failed to read {}", cli.path.display()))?;
  let stream = parse_compressed(&artifact)
    .with_context(|| format!("failed to parse {}", cli.path.display()))?;
  info!(
    path = %cli.path.display(),
    bits = stream.len(),
    alphabet_entries = alphabet.entry_count(),
    "uncompressing",
  );

  let text = lzwa::decompress(&stream, &alphabet, options)?;
  info!(symbols = text.chars().count(), "uncompressed");
  match &cli.out {
    Some(out) => fs::write(out, &text).with_context(|| format!("failed to write {}", out.display()))?,
    None => {
      let mut stdout = stdout().lock();
      writeln!(stdout, "{}", text)?;
    }
  };
  Ok(())
}

fn main() -> ExitCode {
  tracing_subscriber::fmt::init();

  let cli = Cli::parse();
  let options = if cli.implicit_growth {
    CodecOptions::implicit()
  } else {
    CodecOptions::default()
  };
  let res = if cli.compress {
    compress(&cli, options)
  } else {
    uncompress(&cli, options)
  };
  match res {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      let category = e
        .downcast_ref::<lzwa::Error>()
        .map(|e| e.category())
        .unwrap_or("io");
      error!(category, "{:#}", e);
      ExitCode::FAILURE
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_artifact_stem() {
    assert_eq!(artifact_stem(Path::new("data/text.txt")).unwrap(), "text");
    assert_eq!(artifact_stem(Path::new("archive.tar.lzw")).unwrap(), "archive");
    assert_eq!(artifact_stem(Path::new("plain")).unwrap(), "plain");
    assert!(artifact_stem(Path::new(".hidden")).is_err());
  }

  #[test]
  fn test_modes_are_exclusive() {
    assert!(Cli::try_parse_from(["lzwa-cli", "-p", "a.txt"]).is_err());
    assert!(Cli::try_parse_from(["lzwa-cli", "-c", "-u", "-p", "a.txt"]).is_err());
    let cli = Cli::try_parse_from(["lzwa-cli", "-u", "-p", "a.lzw"]).unwrap();
    assert!(cli.uncompress && !cli.compress);
  }
}
