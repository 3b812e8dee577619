use std::{fmt, marker::PhantomData, num::NonZeroUsize, ops, cmp, hash};

/// A typed index into one of the triangulation's arenas.
///
/// `Option<Idx<T>>` is the same size as `Idx<T>`, which keeps the neighbor slots of a face compact.
#[repr(transparent)]
pub struct Idx<T>(NonZeroUsize, PhantomData<fn() -> T>);

impl<T> fmt::Debug for Idx<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.usize(), f)
    }
}

pub trait IdxDisplay {
    fn fmt(f: &mut fmt::Formatter<'_>, idx: usize) -> fmt::Result;
}

impl<T: IdxDisplay> fmt::Display for Idx<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        T::fmt(f, self.usize())
    }
}

impl<T> Idx<T> {
    pub(crate) fn new(index: usize) -> Self {
        let stored = index.checked_add(1).and_then(NonZeroUsize::new).expect("Index overflow");
        Self(stored, PhantomData)
    }

    /// The position of the indexed element within its arena
    pub fn usize(&self) -> usize {
        self.0.get() - 1
    }
}

// #[derive] does not work where type parameters do not implement the trait
// https://github.com/rust-lang/rust/issues/26925
impl<T> Clone for Idx<T> {
    fn clone(&self) -> Self {
        Self(self.0, PhantomData)
    }
}

impl<T> Copy for Idx<T> { }

impl<T> PartialEq for Idx<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for Idx<T> { }

impl<T> cmp::PartialOrd for Idx<T> {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> cmp::Ord for Idx<T> {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T> hash::Hash for Idx<T> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> ops::Index<Idx<T>> for Vec<T> {
    type Output = T;

    fn index(&self, index: Idx<T>) -> &Self::Output {
        &self[index.usize()]
    }
}

impl<T> ops::IndexMut<Idx<T>> for Vec<T> {
    fn index_mut(&mut self, index: Idx<T>) -> &mut Self::Output {
        &mut self[index.usize()]
    }
}

impl<T> ops::Index<Idx<T>> for [T] {
    type Output = T;

    fn index(&self, index: Idx<T>) -> &Self::Output {
        &self[index.usize()]
    }
}

impl<T> ops::IndexMut<Idx<T>> for [T] {
    fn index_mut(&mut self, index: Idx<T>) -> &mut Self::Output {
        &mut self[index.usize()]
    }
}

pub(crate) trait SliceExt<T> {
    fn iter_index(&self) -> SliceIndexIter<T>;
}

pub(crate) trait VecExt<T> : SliceExt<T> {
    fn push_get_index(&mut self, value: T) -> Idx<T>;

    fn next_index(&self) -> Idx<T>;
}

impl<T> SliceExt<T> for [T] {
    fn iter_index(&self) -> SliceIndexIter<T> {
        SliceIndexIter::new(self.len())
    }
}

impl<T> SliceExt<T> for Vec<T> {
    fn iter_index(&self) -> SliceIndexIter<T> {
        SliceIndexIter::new(self.len())
    }
}

impl<T> VecExt<T> for Vec<T> {
    fn push_get_index(&mut self, value: T) -> Idx<T> {
        let index = Idx::new(self.len());
        self.push(value);
        index
    }

    fn next_index(&self) -> Idx<T> {
        Idx::new(self.len())
    }
}

/// Iterates every [Idx] of an arena, in arena order
pub struct SliceIndexIter<T> {
    len: usize,
    index: usize,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> SliceIndexIter<T> {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            len,
            index: 0,
            _phantom: PhantomData,
        }
    }
}

impl<T> Iterator for SliceIndexIter<T> {
    type Item = Idx<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index < self.len {
            let result = Some(Idx::new(self.index));
            self.index += 1;
            result
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for SliceIndexIter<T> { }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_is_niche_packed() {
        assert_eq!(std::mem::size_of::<Option<Idx<u8>>>(), std::mem::size_of::<usize>());
    }

    #[test]
    fn push_get_index() {
        let mut v = Vec::new();
        assert_eq!(v.next_index(), Idx::<&str>::new(0));
        let i0 = v.push_get_index("a");
        let i1 = v.push_get_index("b");
        assert_eq!(v[i0], "a");
        assert_eq!(v[i1], "b");
        assert!(i0 < i1);
        assert_eq!(v.iter_index().collect::<Vec<_>>(), vec![i0, i1]);
    }
}
