//! Property-based tests for the LZW codec.
//!
//! - encode then decode reproduces the input exactly, for either growth signal
//! - encoding is deterministic
//! - code widths never shrink and grow one bit at a time
//! - the seeded alphabet is exactly the distinct input symbols

use lzwa::artifact::parse_alphabet_table;
use lzwa::artifact::parse_compressed;
use lzwa::artifact::render_alphabet_table;
use lzwa::artifact::render_compressed;
use lzwa::decode;
use lzwa::encode;
use lzwa::Alphabet;
use lzwa::CodecOptions;
use lzwa::Decoder;
use lzwa::CONTROL_CODE;
use proptest::prelude::*;
use std::collections::BTreeSet;

/// Small alphabets produce long matches and many width increases.
fn text_strategy() -> impl Strategy<Value = Vec<char>> {
  prop_oneof![
    prop::collection::vec(prop::sample::select(vec!['a', 'b']), 1..400),
    prop::collection::vec(prop::sample::select(vec!['x', 'y', 'z', '%', ',']), 1..400),
    prop::collection::vec(any::<char>(), 1..200),
  ]
}

fn options_strategy() -> impl Strategy<Value = CodecOptions> {
  prop_oneof![Just(CodecOptions::default()), Just(CodecOptions::implicit())]
}

proptest! {
  #![proptest_config(ProptestConfig {
    cases: 200,
    ..ProptestConfig::default()
  })]

  #[test]
  fn prop_roundtrip(input in text_strategy(), options in options_strategy()) {
    let encoded = encode(&input, options).unwrap();
    let stream = encoded.bitstream().unwrap();
    let decoded = decode(&stream, &encoded.alphabet, options).unwrap();
    prop_assert_eq!(decoded, input);
  }

  #[test]
  fn prop_roundtrip_through_artifacts(input in text_strategy()) {
    let options = CodecOptions::default();
    let encoded = encode(&input, options).unwrap();
    let table = render_alphabet_table(&encoded.alphabet);
    let artifact = render_compressed(&encoded.bitstream().unwrap(), &encoded.stats());
    let alphabet = parse_alphabet_table(&table).unwrap();
    let stream = parse_compressed(&artifact).unwrap();
    prop_assert_eq!(decode(&stream, &alphabet, options).unwrap(), input);
  }

  #[test]
  fn prop_deterministic(input in text_strategy(), options in options_strategy()) {
    prop_assert_eq!(encode(&input, options).unwrap(), encode(&input, options).unwrap());
  }

  #[test]
  fn prop_width_monotonic(input in text_strategy()) {
    let encoded = encode(&input, CodecOptions::default()).unwrap();
    let mut width = encoded.alphabet.initial_width();
    let mut grow_next = false;
    for w in &encoded.words {
      if grow_next {
        width += 1;
        grow_next = false;
      }
      prop_assert_eq!(w.width, width);
      prop_assert!(w.code >> w.width == 0);
      if w.code == CONTROL_CODE {
        grow_next = true;
      }
    }
    // The stream never ends on a control code.
    prop_assert!(!grow_next);
  }

  #[test]
  fn prop_decoder_widths_match_encoder(input in text_strategy()) {
    let options = CodecOptions::default();
    let encoded = encode(&input, options).unwrap();
    let stream = encoded.bitstream().unwrap();
    let mut decoder = Decoder::new(&stream, &encoded.alphabet, options);
    let mut read = Vec::new();
    while let Some(d) = decoder.next() {
      read.push(d.unwrap().word);
      prop_assert!(decoder.dictionary().is_consistent());
    }
    prop_assert_eq!(read, encoded.words);
  }

  #[test]
  fn prop_minimal_seed(input in text_strategy()) {
    let alphabet = Alphabet::from_input(&input).unwrap();
    let distinct: BTreeSet<char> = input.iter().copied().collect();
    prop_assert_eq!(alphabet.symbols().to_vec(), distinct.into_iter().collect::<Vec<_>>());
    prop_assert_eq!(alphabet.entry_count(), alphabet.symbols().len() + 1);
  }

  #[test]
  fn prop_truncated_stream_rejected(input in text_strategy(), cut_seed in 0usize..64) {
    let options = CodecOptions::default();
    let encoded = encode(&input, options).unwrap();
    let mut stream = encoded.bitstream().unwrap();
    let last_width = encoded.words.last().unwrap().width as usize;
    prop_assume!(last_width > 1);
    // Leave a partial final code behind.
    let cut = 1 + cut_seed % (last_width - 1);
    stream.truncate(stream.len() - cut);
    prop_assert!(
      matches!(decode(&stream, &encoded.alphabet, options), Err(lzwa::Error::TruncatedStream { .. })),
      "truncated stream decoded"
    );
  }
}
