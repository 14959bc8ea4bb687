//! Seeded key computation for name-keyed hash tables.
//!
//! Element and attribute names come straight from the document, so an
//! unrandomized hash invites crafted-collision flooding. Every key mixes in
//! the instance [`Seed`] first; the mixing itself is the shift/xor stir used
//! for name hashing throughout the parser, chosen for distribution rather
//! than cryptographic strength.

use crate::entropy::Seed;

/// Computes hash keys for one parser instance.
///
/// The seed is fixed at construction. Reseeding mid-instance would orphan
/// every entry already placed by earlier keys, so there is deliberately no
/// way to change it.
#[derive(Debug, Clone, Copy)]
pub struct SeededHasher {
    seed: Seed,
}

impl SeededHasher {
    pub fn new(seed: Seed) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> Seed {
        self.seed
    }

    /// Key for a plain name. Identical input under the same seed always
    /// yields the identical key.
    pub fn hash_name(&self, name: &[u8]) -> u64 {
        let mut value = self.seed.value() as u64;
        if let Some(&first) = name.first() {
            value = value.wrapping_add(30 * first as u64);
            for &ch in name {
                value = stir(value, ch);
            }
        }
        value ^ value.wrapping_shl(5).wrapping_add(value.wrapping_shr(3))
    }

    /// Key for a `prefix:local` qualified name, equal to hashing the joined
    /// form so that prefixed and pre-joined spellings land in the same slot.
    pub fn hash_qname(&self, prefix: Option<&[u8]>, local: &[u8]) -> u64 {
        let mut value = self.seed.value() as u64;
        match prefix.filter(|p| !p.is_empty()) {
            Some(prefix) => {
                value = value.wrapping_add(30 * prefix[0] as u64);
                for &ch in prefix {
                    value = stir(value, ch);
                }
                value = stir(value, b':');
            }
            None => {
                if let Some(&first) = local.first() {
                    value = value.wrapping_add(30 * first as u64);
                }
            }
        }
        for &ch in local {
            value = stir(value, ch);
        }
        value ^ value.wrapping_shl(5).wrapping_add(value.wrapping_shr(3))
    }
}

fn stir(value: u64, ch: u8) -> u64 {
    value
        ^ value
            .wrapping_shl(5)
            .wrapping_add(value.wrapping_shr(3))
            .wrapping_add(ch as u64)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::Rng;

    use super::*;
    use crate::entropy::acquire_seed;

    #[test]
    fn same_seed_same_key() {
        let hasher = SeededHasher::new(acquire_seed());
        let a = hasher.hash_name(b"element");
        for _ in 0..100 {
            assert_eq!(hasher.hash_name(b"element"), a);
        }
    }

    #[test]
    fn qname_matches_joined_spelling() {
        let hasher = SeededHasher::new(acquire_seed());
        assert_eq!(
            hasher.hash_qname(Some(b"ns"), b"item"),
            hasher.hash_name(b"ns:item")
        );
        assert_eq!(hasher.hash_qname(None, b"item"), hasher.hash_name(b"item"));
        assert_eq!(
            hasher.hash_qname(Some(b""), b"item"),
            hasher.hash_name(b"item")
        );
    }

    #[test]
    fn distinct_seeds_shuffle_the_key_stream() {
        let mut rng = rand::rng();
        let names: Vec<Vec<u8>> = (0..64)
            .map(|_| (0..12).map(|_| rng.random_range(b'a'..=b'z')).collect())
            .collect();

        let mut streams = HashSet::new();
        for _ in 0..16 {
            let hasher = SeededHasher::new(acquire_seed());
            let stream: Vec<u64> = names.iter().map(|n| hasher.hash_name(n)).collect();
            streams.insert(stream);
        }
        // 16 instances hashing the same names should essentially never
        // agree on the whole key stream.
        assert!(streams.len() > 1);
    }

    #[test]
    fn empty_name_is_stable() {
        let hasher = SeededHasher::new(acquire_seed());
        assert_eq!(hasher.hash_name(b""), hasher.hash_name(b""));
        assert_eq!(hasher.hash_qname(None, b""), hasher.hash_name(b""));
    }
}
