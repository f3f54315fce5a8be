//! Bond and bond set types.

use std::collections::BTreeSet;
use std::collections::btree_set;

/// An undirected bond between two atoms, stored smaller index first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Bond {
    first: usize,
    second: usize,
}

impl Bond {
    /// Bond between atoms `i` and `j` in either order.
    ///
    /// Returns `None` when `i == j`.
    ///
    /// ```
    /// use cube_bonds::Bond;
    ///
    /// assert_eq!(Bond::new(4, 1), Bond::new(1, 4));
    /// assert!(Bond::new(2, 2).is_none());
    /// ```
    #[must_use]
    pub fn new(i: usize, j: usize) -> Option<Self> {
        match i.cmp(&j) {
            std::cmp::Ordering::Less => Some(Self {
                first: i,
                second: j,
            }),
            std::cmp::Ordering::Greater => Some(Self {
                first: j,
                second: i,
            }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Smaller atom index.
    #[must_use]
    pub const fn first(&self) -> usize {
        self.first
    }

    /// Larger atom index.
    #[must_use]
    pub const fn second(&self) -> usize {
        self.second
    }

    /// Both indices, smaller first.
    #[must_use]
    pub const fn pair(&self) -> (usize, usize) {
        (self.first, self.second)
    }

    /// The atom at the other end, or `None` if `atom` is not in the bond.
    #[must_use]
    pub fn other(&self, atom: usize) -> Option<usize> {
        if atom == self.first {
            Some(self.second)
        } else if atom == self.second {
            Some(self.first)
        } else {
            None
        }
    }
}

/// A deduplicated, ordered set of bonds.
///
/// Iteration order is by first index, then second, regardless of the order
/// bonds were inserted in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct BondSet {
    bonds: BTreeSet<Bond>,
}

impl BondSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the bond `i`-`j`.
    ///
    /// Returns `true` if the bond was new. Self-bonds are ignored.
    pub fn insert(&mut self, i: usize, j: usize) -> bool {
        Bond::new(i, j).is_some_and(|bond| self.bonds.insert(bond))
    }

    /// Whether atoms `i` and `j` are bonded.
    #[must_use]
    pub fn contains(&self, i: usize, j: usize) -> bool {
        Bond::new(i, j).is_some_and(|bond| self.bonds.contains(&bond))
    }

    /// Number of bonds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bonds.len()
    }

    /// Check if there are no bonds.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }

    /// Iterate over bonds in order.
    pub fn iter(&self) -> btree_set::Iter<'_, Bond> {
        self.bonds.iter()
    }

    /// Atoms bonded to `atom`, ascending.
    pub fn neighbors(&self, atom: usize) -> impl Iterator<Item = usize> + '_ {
        // bonds ending at `atom` sort before bonds starting at it
        self.bonds.iter().filter_map(move |b| b.other(atom))
    }
}

impl FromIterator<Bond> for BondSet {
    fn from_iter<I: IntoIterator<Item = Bond>>(iter: I) -> Self {
        Self {
            bonds: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for BondSet {
    type Item = Bond;
    type IntoIter = btree_set::IntoIter<Bond>;

    fn into_iter(self) -> Self::IntoIter {
        self.bonds.into_iter()
    }
}

impl<'a> IntoIterator for &'a BondSet {
    type Item = &'a Bond;
    type IntoIter = btree_set::Iter<'a, Bond>;

    fn into_iter(self) -> Self::IntoIter {
        self.bonds.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bond_is_normalised() {
        let bond = Bond::new(7, 3).unwrap();
        assert_eq!(bond.pair(), (3, 7));
        assert_eq!(bond.other(3), Some(7));
        assert_eq!(bond.other(7), Some(3));
        assert_eq!(bond.other(5), None);
    }

    #[test]
    fn both_orders_insert_once() {
        let mut set = BondSet::new();
        assert!(set.insert(0, 2));
        assert!(!set.insert(2, 0));
        assert!(!set.insert(1, 1));

        assert_eq!(set.len(), 1);
        assert!(set.contains(2, 0));
        assert!(!set.contains(1, 1));
    }

    #[test]
    fn iteration_is_ordered() {
        let set: BondSet = [(5, 1), (0, 3), (1, 2), (0, 1)]
            .into_iter()
            .filter_map(|(i, j)| Bond::new(i, j))
            .collect();

        let pairs: Vec<_> = set.iter().map(Bond::pair).collect();
        assert_eq!(pairs, [(0, 1), (0, 3), (1, 2), (1, 5)]);
        assert_eq!(set.neighbors(1).collect::<Vec<_>>(), [0, 2, 5]);
    }
}
