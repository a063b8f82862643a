use crate::alphabet::Alphabet;
use crate::error::Error;
use crate::error::Result;
use crate::trie::NodeId;
use crate::trie::Trie;
use crate::trie::ROOT;

/// A dictionary entry located in the reverse index, so the encoder can extend its current match
/// one symbol at a time instead of looking the whole match up again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
  node: NodeId,
  code: u32,
}

impl Cursor {
  pub fn code(&self) -> u32 {
    self.code
  }
}

/// Append-only code table with a reverse index from sequence to code.
///
/// Slot 0 is the control entry and has no sequence. Every other slot holds a distinct,
/// non-empty sequence; codes are never reassigned.
pub struct Dictionary {
  code_to_sequence: Vec<Option<Vec<char>>>,
  sequence_to_code: Trie<char, u32>,
}

impl Dictionary {
  /// Creates a dictionary holding the control entry followed by one single-symbol entry per
  /// alphabet member, in alphabet order.
  pub fn seed(alphabet: &Alphabet) -> Self {
    let mut dict = Self {
      code_to_sequence: Vec::with_capacity(alphabet.entry_count()),
      sequence_to_code: Trie::new(),
    };
    dict.code_to_sequence.push(None);
    for (code, &c) in (1u32..).zip(alphabet.symbols()) {
      dict.code_to_sequence.push(Some(vec![c]));
      // Alphabet symbols are distinct.
      dict.sequence_to_code.insert([c], code);
    }
    dict
  }

  /// Number of allocated codes, including the control entry.
  pub fn len(&self) -> usize {
    self.code_to_sequence.len()
  }

  pub fn is_empty(&self) -> bool {
    self.code_to_sequence.is_empty()
  }

  /// Code the next insertion will receive.
  pub fn next_code(&self) -> Result<u32> {
    u32::try_from(self.code_to_sequence.len())
      .map_err(|_| Error::Internal("dictionary exceeds the code space"))
  }

  pub fn lookup_code(&self, seq: &[char]) -> Option<u32> {
    self.sequence_to_code.get(seq.iter().copied()).copied()
  }

  /// Single-symbol entry for `symbol`.
  pub fn start(&self, symbol: char) -> Option<Cursor> {
    self.extend(Cursor { node: ROOT, code: 0 }, symbol)
  }

  /// Entry for the sequence at `at` followed by `symbol`, if the dictionary holds it.
  pub fn extend(&self, at: Cursor, symbol: char) -> Option<Cursor> {
    let node = self.sequence_to_code.child(at.node, symbol)?;
    let &code = self.sequence_to_code.value(node)?;
    Some(Cursor { node, code })
  }

  /// Returns `None` for the control code and for codes not allocated yet.
  pub fn lookup_sequence(&self, code: u32) -> Option<&[char]> {
    self
      .code_to_sequence
      .get(code as usize)
      .and_then(|s| s.as_deref())
  }

  pub fn insert(&mut self, seq: Vec<char>) -> Result<u32> {
    if seq.is_empty() {
      return Err(Error::Internal("empty sequence inserted into dictionary"));
    };
    if let Some(existing) = self.lookup_code(&seq) {
      return Err(Error::DuplicateSequence { code: existing });
    };
    let code = self.next_code()?;
    self.sequence_to_code.insert(seq.iter().copied(), code);
    self.code_to_sequence.push(Some(seq));
    Ok(code)
  }

  /// Inserts the sequence at `at` followed by `symbol`, without walking the index from its root.
  pub fn insert_extension(&mut self, at: Cursor, symbol: char) -> Result<u32> {
    if let Some(existing) = self.extend(at, symbol) {
      return Err(Error::DuplicateSequence {
        code: existing.code,
      });
    };
    let mut seq = self
      .lookup_sequence(at.code)
      .ok_or(Error::Internal("cursor does not point at a sequence entry"))?
      .to_vec();
    seq.push(symbol);
    let code = self.next_code()?;
    self.sequence_to_code.insert_from(at.node, [symbol], code);
    self.code_to_sequence.push(Some(seq));
    Ok(code)
  }

  /// Sequence entries in code order, skipping the control entry.
  pub fn iter(&self) -> impl Iterator<Item = (u32, &[char])> + '_ {
    self
      .code_to_sequence
      .iter()
      .zip(0u32..)
      .filter_map(|(s, code)| s.as_deref().map(|s| (code, s)))
  }

  /// Whether both directions of the table agree entry for entry.
  pub fn is_consistent(&self) -> bool {
    self.sequence_to_code.len() + 1 == self.code_to_sequence.len()
      && self
        .sequence_to_code
        .iter()
        .all(|(seq, &code)| self.lookup_sequence(code) == Some(seq.as_slice()))
  }
}
