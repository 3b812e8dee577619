/// A growable collection of triangles, each given as three values of type `V` (vertices or their indices)
pub trait List<V> {
    /// Append a triangle
    fn push(&mut self, v0: V, v1: V, v2: V);

    /// The number of triangles, not the number of values
    fn len(&self) -> usize;

    /// Shorten the list to its first `len` triangles, used to roll back a failed triangulation
    fn truncate(&mut self, len: usize);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Flat list, three consecutive values per triangle
impl<V> List<V> for Vec<V> {
    fn push(&mut self, v0: V, v1: V, v2: V) {
        self.extend([v0, v1, v2]);
    }

    fn len(&self) -> usize {
        Vec::len(self) / 3
    }

    fn truncate(&mut self, len: usize) {
        Vec::truncate(self, len * 3)
    }
}

impl<V> List<V> for Vec<[V; 3]> {
    fn push(&mut self, v0: V, v1: V, v2: V) {
        Vec::push(self, [v0, v1, v2]);
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn truncate(&mut self, len: usize) {
        Vec::truncate(self, len)
    }
}

impl<V> List<V> for Vec<(V, V, V)> {
    fn push(&mut self, v0: V, v1: V, v2: V) {
        Vec::push(self, (v0, v1, v2));
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn truncate(&mut self, len: usize) {
        Vec::truncate(self, len)
    }
}

/// Appends to a list owned by the caller
impl<V, L: List<V>> List<V> for &mut L {
    fn push(&mut self, v0: V, v1: V, v2: V) {
        (**self).push(v0, v1, v2)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn truncate(&mut self, len: usize) {
        (**self).truncate(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_list_counts_triangles() {
        let mut flat: Vec<u32> = vec![9];
        List::push(&mut flat, 1, 2, 3);
        List::push(&mut flat, 4, 5, 6);
        assert_eq!(List::<u32>::len(&flat), 2);
        List::<u32>::truncate(&mut flat, 1);
        assert_eq!(flat, vec![9, 1, 2]);
    }
}
