use std::collections::btree_map;
use std::collections::BTreeMap;

/// Index of a node inside its trie. Only valid for the trie that returned it.
pub(crate) type NodeId = usize;

pub(crate) const ROOT: NodeId = 0;

struct TrieNode<K, V> {
  value: Option<V>,
  // Use BTreeMap to iterate in order and deterministically.
  children: BTreeMap<K, NodeId>,
}

impl<K, V> Default for TrieNode<K, V> {
  fn default() -> Self {
    Self {
      value: None,
      children: BTreeMap::new(),
    }
  }
}

pub(crate) struct TrieIter<'a, K, V> {
  trie: &'a Trie<K, V>,
  path: Vec<K>,
  // Unvisited children, one iterator per depth.
  stack: Vec<btree_map::Iter<'a, K, NodeId>>,
}

impl<'a, K: Ord + Copy, V> Iterator for TrieIter<'a, K, V> {
  type Item = (Vec<K>, &'a V);

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      let children = self.stack.last_mut()?;
      let Some((&k, &n)) = children.next() else {
        self.stack.pop();
        self.path.pop();
        continue;
      };
      let node = &self.trie.nodes[n];
      self.path.push(k);
      self.stack.push(node.children.iter());
      if let Some(v) = node.value.as_ref() {
        return Some((self.path.clone(), v));
      };
    }
  }
}

/// Prefix tree keyed by symbol paths, with nodes kept in one arena so a caller can hold on to a
/// node and keep walking from it. The empty path never holds a value.
pub(crate) struct Trie<K, V> {
  nodes: Vec<TrieNode<K, V>>,
  len: usize,
}

impl<K: Ord + Copy, V> Trie<K, V> {
  pub fn new() -> Self {
    Self {
      nodes: vec![TrieNode::default()],
      len: 0,
    }
  }

  /// Number of values held.
  pub fn len(&self) -> usize {
    self.len
  }

  pub fn child(&self, node: NodeId, k: K) -> Option<NodeId> {
    self.nodes[node].children.get(&k).copied()
  }

  pub fn value(&self, node: NodeId) -> Option<&V> {
    self.nodes[node].value.as_ref()
  }

  pub fn get(&self, k: impl IntoIterator<Item = K>) -> Option<&V> {
    let mut cur = ROOT;
    for c in k {
      cur = self.child(cur, c)?;
    }
    self.value(cur)
  }

  /// Sets the value at `k` below `node`, creating missing nodes, and returns the node written to
  /// along with the previous value, if any.
  pub fn insert_from(
    &mut self,
    node: NodeId,
    k: impl IntoIterator<Item = K>,
    v: V,
  ) -> (NodeId, Option<V>) {
    let mut cur = node;
    for c in k {
      cur = match self.child(cur, c) {
        Some(n) => n,
        None => {
          let n = self.nodes.len();
          self.nodes.push(TrieNode::default());
          self.nodes[cur].children.insert(c, n);
          n
        }
      };
    }
    let prev = self.nodes[cur].value.replace(v);
    if prev.is_none() {
      self.len += 1;
    };
    (cur, prev)
  }

  /// Sets the value at `k` and returns the previous one, if any.
  pub fn insert(&mut self, k: impl IntoIterator<Item = K>, v: V) -> Option<V> {
    self.insert_from(ROOT, k, v).1
  }

  pub fn iter(&self) -> TrieIter<'_, K, V> {
    TrieIter {
      trie: self,
      path: Vec::new(),
      stack: vec![self.nodes[ROOT].children.iter()],
    }
  }
}

#[cfg(test)]
mod tests {
  use crate::trie::Trie;
  use crate::trie::ROOT;

  #[test]
  fn test_trie() {
    let mut trie = Trie::new();
    assert_eq!(trie.insert("abc".chars(), 43), None);
    trie.insert("abcd".chars(), 920);
    trie.insert("bcd".chars(), 10600);
    trie.insert("abac".chars(), 6842);
    assert_eq!(trie.insert("abc".chars(), 21), Some(43));
    assert_eq!(trie.len(), 4);
    assert_eq!(trie.get("ab".chars()), None);
    assert_eq!(trie.get("abc".chars()), Some(&21));
    let mut it = trie.iter();
    assert_eq!(it.next(), Some(("abac".chars().collect::<Vec<_>>(), &6842)));
    assert_eq!(it.next(), Some(("abc".chars().collect::<Vec<_>>(), &21)));
    assert_eq!(it.next(), Some(("abcd".chars().collect::<Vec<_>>(), &920)));
    assert_eq!(it.next(), Some(("bcd".chars().collect::<Vec<_>>(), &10600)));
    assert_eq!(it.next(), None);
  }

  #[test]
  fn test_walk_and_insert_from_node() {
    let mut trie = Trie::new();
    let (a, _) = trie.insert_from(ROOT, ['a'], 1);
    assert_eq!(trie.child(ROOT, 'a'), Some(a));
    assert_eq!(trie.value(a), Some(&1));
    let (ab, prev) = trie.insert_from(a, ['b'], 2);
    assert_eq!(prev, None);
    assert_eq!(trie.child(a, 'b'), Some(ab));
    assert_eq!(trie.child(a, 'c'), None);
    assert_eq!(trie.get("ab".chars()), Some(&2));
    assert_eq!(trie.insert_from(a, ['b'], 3), (ab, Some(2)));
    assert_eq!(trie.len(), 2);
  }
}
