// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Points-to set representation (design component 4.1 / 4.5).
//!
//! [`HybridPointsToSet`] stores small sets as a plain array and promotes to
//! a [`BitVec`] once the element count crosses [`SMALL_SET_CAPACITY`]. The
//! critical operation for the solver is [`PointsToSet::union_diff`]: it
//! returns only the newly-added elements and allocates nothing when that
//! set is empty, since that return value is the unit the worklist
//! propagates (spec §4.1, §4.6).

use std::fmt;
use std::slice;

use crate::util::bit_vec::{BitIter, BitVec, Idx};

const SMALL_SET_CAPACITY: usize = 16;

pub trait PointsToSet<T: Copy>: Clone {
    type Iter<'a>: Iterator<Item = T>
    where
        Self: 'a;

    fn new() -> Self;
    fn clear(&mut self);
    fn count(&self) -> usize;
    fn contains(&self, elem: T) -> bool;
    fn is_empty(&self) -> bool;
    fn superset(&self, other: &Self) -> bool;
    fn insert(&mut self, elem: T) -> bool;
    fn remove(&mut self, elem: T) -> bool;
    /// Adds every element of `other`, returning whether anything changed.
    fn union(&mut self, other: &Self) -> bool;
    fn subtract(&mut self, other: &Self) -> bool;
    fn intersect(&mut self, other: &Self) -> bool;
    fn iter(&self) -> Self::Iter<'_>;

    /// Adds every element of `other`, returning only the elements that were
    /// newly added. Returns `None` (no allocation) when nothing was added.
    fn union_diff(&mut self, other: &Self) -> Option<Self> {
        let mut diff: Option<Self> = None;
        for elem in other.iter() {
            if self.insert(elem) {
                diff.get_or_insert_with(Self::new).insert(elem);
            }
        }
        diff
    }
}

/// Hybrid implementation of a points-to set: a tiny array below
/// `SMALL_SET_CAPACITY`, a bitmap above it.
#[derive(Clone)]
pub struct HybridPointsToSet<T> {
    points_to: HybridSet<T>,
}

impl<T: Idx> fmt::Debug for HybridPointsToSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.points_to.fmt(f)
    }
}

impl<'a, T: Idx> IntoIterator for &'a HybridPointsToSet<T> {
    type Item = T;
    type IntoIter = HybridIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Idx> PointsToSet<T> for HybridPointsToSet<T> {
    type Iter<'a> = HybridIter<'a, T> where T: 'a;

    fn new() -> Self {
        HybridPointsToSet {
            points_to: HybridSet::new(),
        }
    }

    fn clear(&mut self) {
        self.points_to.clear();
    }

    fn count(&self) -> usize {
        self.points_to.count()
    }

    fn contains(&self, elem: T) -> bool {
        self.points_to.contains(elem)
    }

    fn is_empty(&self) -> bool {
        self.points_to.is_empty()
    }

    fn superset(&self, other: &HybridPointsToSet<T>) -> bool {
        self.points_to.superset(&other.points_to)
    }

    fn insert(&mut self, elem: T) -> bool {
        self.points_to.insert(elem)
    }

    fn remove(&mut self, elem: T) -> bool {
        self.points_to.remove(elem)
    }

    fn union(&mut self, other: &HybridPointsToSet<T>) -> bool {
        self.points_to.union(&other.points_to)
    }

    fn subtract(&mut self, other: &HybridPointsToSet<T>) -> bool {
        self.points_to.subtract(&other.points_to)
    }

    fn intersect(&mut self, other: &HybridPointsToSet<T>) -> bool {
        self.points_to.intersect(&other.points_to)
    }

    fn iter(&self) -> HybridIter<'_, T> {
        self.points_to.iter()
    }
}

#[derive(Clone)]
enum HybridSet<T> {
    SmallSet(Vec<T>),
    LargeSet(BitVec<T>),
}

impl<T: Idx> fmt::Debug for HybridSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SmallSet(s) => s.fmt(f),
            Self::LargeSet(s) => s.fmt(f),
        }
    }
}

impl<T: Idx> HybridSet<T> {
    fn new() -> Self {
        HybridSet::SmallSet(Vec::new())
    }

    fn clear(&mut self) {
        match self {
            HybridSet::SmallSet(small) => small.clear(),
            HybridSet::LargeSet(_) => {
                *self = HybridSet::SmallSet(Vec::new());
            }
        }
    }

    fn count(&self) -> usize {
        match self {
            HybridSet::SmallSet(small) => small.len(),
            HybridSet::LargeSet(large) => large.count(),
        }
    }

    fn contains(&self, elem: T) -> bool {
        match self {
            HybridSet::SmallSet(small) => small.contains(&elem),
            HybridSet::LargeSet(large) => large.contains(elem),
        }
    }

    fn superset(&self, other: &HybridSet<T>) -> bool {
        match (self, other) {
            (HybridSet::LargeSet(a), HybridSet::LargeSet(b)) => a.superset(b),
            _ => other.iter().all(|elem| self.contains(elem)),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            HybridSet::SmallSet(small) => small.is_empty(),
            HybridSet::LargeSet(large) => large.is_empty(),
        }
    }

    fn insert(&mut self, elem: T) -> bool {
        match self {
            HybridSet::SmallSet(small) if small.contains(&elem) => false,
            HybridSet::SmallSet(small) if small.len() < SMALL_SET_CAPACITY => {
                small.push(elem);
                true
            }
            HybridSet::SmallSet(small) => {
                let mut large = BitVec::new_empty();
                for elem in small.iter() {
                    large.insert(*elem);
                }
                let changed = large.insert(elem);
                *self = HybridSet::LargeSet(large);
                changed
            }
            HybridSet::LargeSet(large) => large.insert(elem),
        }
    }

    fn remove(&mut self, elem: T) -> bool {
        match self {
            HybridSet::SmallSet(small) => {
                if let Some(pos) = small.iter().position(|x| *x == elem) {
                    small.swap_remove(pos);
                    true
                } else {
                    false
                }
            }
            HybridSet::LargeSet(large) => large.remove(elem),
        }
    }

    fn iter(&self) -> HybridIter<'_, T> {
        match self {
            HybridSet::SmallSet(small) => HybridIter::SmallIter(small.iter()),
            HybridSet::LargeSet(large) => HybridIter::LargeIter(large.iter()),
        }
    }

    fn union(&mut self, other: &HybridSet<T>) -> bool {
        match self {
            HybridSet::LargeSet(self_large) => match other {
                HybridSet::LargeSet(other_large) => self_large.union(other_large),
                HybridSet::SmallSet(other_small) => {
                    let mut changed = false;
                    for elem in other_small.iter() {
                        changed |= self_large.insert(*elem);
                    }
                    changed
                }
            },
            HybridSet::SmallSet(self_small) => match other {
                HybridSet::LargeSet(other_large) => {
                    let mut self_large = BitVec::new_empty();
                    for elem in self_small.iter() {
                        self_large.insert(*elem);
                    }
                    let changed = self_large.union(other_large);
                    *self = HybridSet::LargeSet(self_large);
                    changed
                }
                HybridSet::SmallSet(other_small) => {
                    let mut changed = false;
                    for &elem in other_small.iter() {
                        changed |= self.insert(elem);
                    }
                    changed
                }
            },
        }
    }

    fn subtract(&mut self, other: &HybridSet<T>) -> bool {
        match self {
            HybridSet::LargeSet(self_large) => match other {
                HybridSet::LargeSet(other_large) => self_large.subtract(other_large),
                HybridSet::SmallSet(other_small) => {
                    let mut changed = false;
                    for &elem in other_small.iter() {
                        changed |= self_large.remove(elem);
                    }
                    changed
                }
            },
            HybridSet::SmallSet(self_small) => {
                let mut changed = false;
                self_small.retain(|&elem| {
                    let contains = other.contains(elem);
                    if contains {
                        changed = true;
                    }
                    !contains
                });
                changed
            }
        }
    }

    fn intersect(&mut self, other: &HybridSet<T>) -> bool {
        match self {
            HybridSet::LargeSet(self_large) => match other {
                HybridSet::LargeSet(other_large) => self_large.intersect(other_large),
                HybridSet::SmallSet(other_small) => {
                    let mut self_small = other_small.clone();
                    let mut changed = false;
                    self_small.retain(|&elem| {
                        let contains = self_large.contains(elem);
                        if !contains {
                            changed = true;
                        }
                        contains
                    });
                    *self = HybridSet::SmallSet(self_small);
                    changed
                }
            },
            HybridSet::SmallSet(self_small) => {
                let mut changed = false;
                self_small.retain(|&elem| {
                    let contains = other.contains(elem);
                    if !contains {
                        changed = true;
                    }
                    contains
                });
                changed
            }
        }
    }
}

pub enum HybridIter<'a, T: Idx> {
    SmallIter(slice::Iter<'a, T>),
    LargeIter(BitIter<'a, T>),
}

impl<'a, T: Idx> Iterator for HybridIter<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match self {
            HybridIter::SmallIter(small) => small.next().copied(),
            HybridIter::LargeIter(large) => large.next(),
        }
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use rand::Rng;

    use super::{HybridPointsToSet, HybridSet, PointsToSet, SMALL_SET_CAPACITY};

    fn random_set(len: usize) -> HashSet<u32> {
        let mut rng = rand::thread_rng();
        let mut set = HashSet::new();
        while set.len() < len {
            set.insert(rng.gen_range(1..10_000));
        }
        set
    }

    #[test]
    fn small_set_stays_small_below_capacity() {
        let rand_set = random_set(8);
        let mut set = HybridPointsToSet::<u32>::new();
        for x in &rand_set {
            set.insert(*x);
        }
        assert_eq!(set.count(), 8);
        assert!(matches!(set.points_to, HybridSet::SmallSet(_)));
        assert_eq!(set.iter().collect::<HashSet<_>>(), rand_set);
    }

    #[test]
    fn promotes_to_bitset_above_capacity() {
        let rand_set = random_set(SMALL_SET_CAPACITY + 3);
        let mut set = HybridPointsToSet::<u32>::new();
        for x in &rand_set {
            set.insert(*x);
        }
        assert!(matches!(set.points_to, HybridSet::LargeSet(_)));
        assert_eq!(set.count(), rand_set.len());
        assert_eq!(set.iter().collect::<HashSet<_>>(), rand_set);
    }

    #[test]
    fn union_diff_returns_only_new_elements() {
        let mut a = HybridPointsToSet::<u32>::new();
        a.insert(1);
        a.insert(2);
        let mut b = HybridPointsToSet::<u32>::new();
        b.insert(2);
        b.insert(3);

        let diff = a.union_diff(&b).expect("diff must be non-empty");
        assert_eq!(diff.iter().collect::<HashSet<_>>(), HashSet::from([3]));
        assert_eq!(a.iter().collect::<HashSet<_>>(), HashSet::from([1, 2, 3]));

        // Re-running with the same input yields no change and no diff.
        assert!(a.union_diff(&b).is_none());
    }

    #[test]
    fn subtract_and_intersect() {
        let mut a = HybridPointsToSet::<u32>::new();
        for x in [1, 2, 3] {
            a.insert(x);
        }
        let mut b = HybridPointsToSet::<u32>::new();
        for x in [2, 3, 4] {
            b.insert(x);
        }
        let mut diff = a.clone();
        diff.subtract(&b);
        assert_eq!(diff.iter().collect::<HashSet<_>>(), HashSet::from([1]));

        let mut inter = a.clone();
        inter.intersect(&b);
        assert_eq!(inter.iter().collect::<HashSet<_>>(), HashSet::from([2, 3]));
    }
}
