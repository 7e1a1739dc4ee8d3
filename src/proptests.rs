use super::{BinaryTrie, Multiplicity, NodeId, TrieValue};

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;

const BITS: u32 = 6;
const DOMAIN: u8 = 1 << BITS;

/// Walks every node reachable from the root and checks count bookkeeping.
fn validate_trie<V: TrieValue, C: Multiplicity>(t: &BinaryTrie<V, C>) {
    let mut stack = vec![(NodeId::ROOT, t.bits)];
    let mut reachable = 0usize;
    let mut terminal_sum = C::ZERO;

    while let Some((id, depth)) = stack.pop() {
        reachable += 1;
        let node = &t.nodes[id];
        assert!(node.subtree >= C::ZERO, "negative subtree count");
        assert!(node.terminal >= C::ZERO, "negative terminal count");

        let mut expected = node.terminal;
        for child in node.children.into_iter().flatten() {
            assert!(depth > 0, "leaf node must not have children");
            expected += t.nodes[child].subtree;
            stack.push((child, depth - 1));
        }
        assert_eq!(
            node.subtree, expected,
            "subtree count must equal terminal plus children"
        );
        if depth > 0 {
            assert_eq!(node.terminal, C::ZERO, "terminal count above leaf depth");
        } else {
            terminal_sum += node.terminal;
        }
    }

    assert_eq!(reachable, t.node_count(), "every arena node must be reachable");
    assert_eq!(terminal_sum, t.total_count());
}

/// Multiset model keyed by actual value.
#[derive(Default)]
struct Model(BTreeMap<u8, u32>);

impl Model {
    fn insert(&mut self, v: u8, n: u32) {
        if n > 0 {
            *self.0.entry(v).or_default() += n;
        }
    }

    fn erase(&mut self, v: u8, n: u32) -> u32 {
        let Some(have) = self.0.get_mut(&v) else {
            return 0;
        };
        let removed = n.min(*have);
        *have -= removed;
        if *have == 0 {
            self.0.remove(&v);
        }
        removed
    }

    fn xor_all(&mut self, m: u8) {
        self.0 = self.0.iter().map(|(&v, &n)| (v ^ m, n)).collect();
    }

    fn count(&self, v: u8) -> u32 {
        self.0.get(&v).copied().unwrap_or(0)
    }

    fn total(&self) -> u32 {
        self.0.values().sum()
    }

    fn sorted(&self) -> Vec<u8> {
        self.0
            .iter()
            .flat_map(|(&v, &n)| std::iter::repeat(v).take(n as usize))
            .collect()
    }
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    Insert(
        #[proptest(strategy = "0u8..DOMAIN")] u8,
        #[proptest(strategy = "0u32..4")] u32,
    ),
    Erase(
        #[proptest(strategy = "0u8..DOMAIN")] u8,
        #[proptest(strategy = "0u32..4")] u32,
    ),
    XorAll(#[proptest(strategy = "0u8..DOMAIN")] u8),
}

fn check_queries(t: &BinaryTrie<u8, u32>, m: &Model) -> Result<(), TestCaseError> {
    let sorted = m.sorted();
    prop_assert_eq!(t.total_count(), m.total());

    for k in 0..=sorted.len() {
        prop_assert_eq!(t.kth(k as u32), sorted.get(k).copied());
    }

    for v in 0..DOMAIN {
        let less = sorted.iter().filter(|&&x| x < v).count() as u32;
        let greater = sorted.iter().filter(|&&x| x > v).count() as u32;
        prop_assert_eq!(t.count(v).unwrap(), m.count(v));
        prop_assert_eq!(t.count_less(v).unwrap(), less);
        prop_assert_eq!(t.count_greater(v).unwrap(), greater);
        prop_assert_eq!(
            t.lower_bound(v).unwrap(),
            m.0.range(v..).next().map(|(&x, _)| x)
        );
        prop_assert_eq!(
            t.prev(v).unwrap(),
            m.0.range(..=v).next_back().map(|(&x, _)| x)
        );
        prop_assert_eq!(t.max_xor(v).unwrap(), m.0.keys().map(|&x| x ^ v).max());
        prop_assert_eq!(t.min_xor(v).unwrap(), m.0.keys().map(|&x| x ^ v).min());
    }

    let got: Vec<(u8, u32)> = t.iter().collect();
    let expected: Vec<(u8, u32)> = m.0.iter().map(|(&v, &n)| (v, n)).collect();
    prop_assert_eq!(got, expected);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in prop::collection::vec(any::<Op>(), 0..=300)) {
        let mut t: BinaryTrie<u8, u32> = BinaryTrie::with_bits(BITS).unwrap();
        let mut m = Model::default();

        for op in ops {
            match op {
                Op::Insert(v, n) => {
                    t.insert_many(v, n).unwrap();
                    m.insert(v, n);
                }
                Op::Erase(v, n) => {
                    let removed = t.erase_many(v, n).unwrap();
                    prop_assert_eq!(removed, m.erase(v, n));
                }
                Op::XorAll(mask) => {
                    t.xor_all(mask).unwrap();
                    m.xor_all(mask);
                }
            }
            prop_assert_eq!(t.total_count(), m.total());
        }

        validate_trie(&t);
        check_queries(&t, &m)?;
    }

    #[test]
    fn prop_xor_toggle_is_transparent(
        values in prop::collection::vec(0u8..DOMAIN, 0..40),
        mask in 0u8..DOMAIN,
    ) {
        let mut t: BinaryTrie<u8, u32> = BinaryTrie::with_bits(BITS).unwrap();
        for &v in &values {
            t.insert(v).unwrap();
        }
        let before: Vec<bool> = (0..DOMAIN).map(|x| t.contains(x).unwrap()).collect();
        let nodes = t.node_count();

        t.xor_all(mask).unwrap();
        prop_assert_eq!(t.node_count(), nodes);
        for x in 0..DOMAIN {
            prop_assert_eq!(t.contains(x).unwrap(), before[(x ^ mask) as usize]);
        }

        t.xor_all(mask).unwrap();
        prop_assert_eq!(t.xor_mask(), 0);
        for x in 0..DOMAIN {
            prop_assert_eq!(t.contains(x).unwrap(), before[x as usize]);
        }
    }

    #[test]
    fn prop_rank_partition(
        values in prop::collection::vec(any::<u16>(), 0..200),
        probes in prop::collection::vec(any::<u16>(), 1..50),
    ) {
        let mut t: BinaryTrie<u16> = BinaryTrie::new();
        for &v in &values {
            t.insert(v).unwrap();
        }
        for v in probes {
            let total = t.count_less(v).unwrap() + t.count(v).unwrap() + t.count_greater(v).unwrap();
            prop_assert_eq!(total, t.total_count());

            if let Some(w) = t.lower_bound(v).unwrap() {
                prop_assert!(w >= v);
                prop_assert!(t.contains(w).unwrap());
                prop_assert_eq!(t.count_less(w).unwrap(), t.count_less(v).unwrap());
            } else {
                prop_assert_eq!(t.count_greater(v).unwrap() + t.count(v).unwrap(), 0);
            }
            if let Some(w) = t.prev(v).unwrap() {
                prop_assert!(w <= v);
                prop_assert!(t.contains(w).unwrap());
                prop_assert_eq!(t.count_greater(w).unwrap(), t.count_greater(v).unwrap());
            } else {
                prop_assert_eq!(t.count_less(v).unwrap() + t.count(v).unwrap(), 0);
            }
        }
        validate_trie(&t);
    }
}

#[test]
fn exhaustive_masks_small_domain() {
    // Every 3-bit subset under every mask, compared against brute force.
    for subset in 0u16..256 {
        for mask in 0u8..8 {
            let mut t: BinaryTrie<u8, i32> = BinaryTrie::with_bits(3).unwrap();
            let members: Vec<u8> = (0u8..8).filter(|&v| subset & (1 << v) != 0).collect();
            for &v in &members {
                t.insert(v).unwrap();
            }
            t.xor_all(mask).unwrap();

            let mut actual: Vec<u8> = members.iter().map(|&v| v ^ mask).collect();
            actual.sort_unstable();

            for (k, &v) in actual.iter().enumerate() {
                assert_eq!(t.kth(k as i32), Some(v), "subset={subset:#x} mask={mask}");
            }
            assert_eq!(t.kth(actual.len() as i32), None);

            for q in 0u8..8 {
                let lower = actual.iter().copied().find(|&x| x >= q);
                let prev = actual.iter().copied().rev().find(|&x| x <= q);
                assert_eq!(t.lower_bound(q).unwrap(), lower);
                assert_eq!(t.prev(q).unwrap(), prev);
                assert_eq!(
                    t.count_less(q).unwrap(),
                    actual.iter().filter(|&&x| x < q).count() as i32
                );
                assert_eq!(t.max_xor(q).unwrap(), actual.iter().map(|&x| x ^ q).max());
                assert_eq!(t.min_xor(q).unwrap(), actual.iter().map(|&x| x ^ q).min());
            }
            validate_trie(&t);
        }
    }
}

#[test]
fn exhaustive_erase_order_small_set() {
    let values = [3u8, 3, 5, 0, 7];
    let mut order: Vec<usize> = (0..values.len()).collect();

    // Heap's algorithm over erase orders.
    fn permute(k: usize, order: &mut Vec<usize>, f: &mut impl FnMut(&[usize])) {
        if k <= 1 {
            f(order.as_slice());
            return;
        }
        for i in 0..k {
            permute(k - 1, order, f);
            let j = if k % 2 == 0 { i } else { 0 };
            order.swap(j, k - 1);
        }
    }

    permute(values.len(), &mut order, &mut |perm: &[usize]| {
        let mut t: BinaryTrie<u8> = BinaryTrie::with_bits(3).unwrap();
        for &v in &values {
            t.insert(v).unwrap();
        }
        let mut left = values.len() as u64;
        for &i in perm {
            assert_eq!(t.erase(values[i]).unwrap(), 1);
            left -= 1;
            assert_eq!(t.total_count(), left);
            validate_trie(&t);
        }
        assert!(t.is_empty());
        assert_eq!(t.iter().count(), 0);
    });
}
