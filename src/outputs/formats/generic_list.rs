use std::marker::PhantomData;

use crate::List;

// Remembers the starting length of a caller-provided list, so a failed triangulation leaves it untouched
pub(crate) struct GenericList<L: List<V>, V> {
    list: L,
    initial_len: usize,
    _phantom: PhantomData<fn(V)>,
}

impl<L: List<V>, V> GenericList<L, V> {
    pub fn new(list: L) -> Self {
        let initial_len = list.len();
        Self {
            list,
            initial_len,
            _phantom: PhantomData,
        }
    }

    pub fn push(&mut self, v0: V, v1: V, v2: V) {
        self.list.push(v0, v1, v2);
    }

    pub fn build(self) -> L {
        self.list
    }

    pub fn fail(mut self) {
        self.list.truncate(self.initial_len);
    }
}
