//! Container types with strongly-typed indexes.

pub(crate) trait Index {
    fn new(i: usize) -> Self;
    fn get(&self) -> usize;
}

/// A `Vec<V>` with strongly-typed indexes, used to improve the type-safety
/// of data storage.
///
/// The `Index` type should be a wrapper around a `usize` and be convertible
/// in both directions; it is typically passed around using `Copy`.  A suitable
/// index type can be constructed with [define_index].
#[derive(Clone, Debug)]
pub(crate) struct IndexVec<V, I> {
    data: Vec<V>,
    _phantom: std::marker::PhantomData<fn(I)>,
}

impl<V, I> Default for IndexVec<V, I> {
    fn default() -> Self {
        Self {
            data: vec![],
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<V, I: Index> IndexVec<V, I> {
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    pub fn clear(&mut self) {
        self.data.clear()
    }
    pub fn get(&self, i: I) -> Option<&V> {
        self.data.get(i.get())
    }
    /// Appends a value, returning its handle
    pub fn push(&mut self, v: V) -> I {
        let out = I::new(self.data.len());
        self.data.push(v);
        out
    }
    /// Moves the value out of the given slot, leaving a default in its place
    pub fn take(&mut self, i: I) -> V
    where
        V: Default,
    {
        std::mem::take(&mut self.data[i.get()])
    }
    pub fn keys(&self) -> impl Iterator<Item = I> + use<V, I> {
        (0..self.data.len()).map(I::new)
    }
}

impl<V, I> FromIterator<V> for IndexVec<V, I> {
    fn from_iter<T: IntoIterator<Item = V>>(iter: T) -> Self {
        Vec::from_iter(iter).into()
    }
}

impl<V, I> std::ops::Index<I> for IndexVec<V, I>
where
    I: Index,
{
    type Output = V;
    fn index(&self, i: I) -> &V {
        &self.data[i.get()]
    }
}

impl<V, I> std::ops::IndexMut<I> for IndexVec<V, I>
where
    I: Index,
{
    fn index_mut(&mut self, i: I) -> &mut V {
        &mut self.data[i.get()]
    }
}

impl<V, I> From<Vec<V>> for IndexVec<V, I> {
    fn from(data: Vec<V>) -> Self {
        Self {
            data,
            _phantom: std::marker::PhantomData,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Defines an index type suitable for use in an [`IndexVec`].
macro_rules! define_index {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(
            Copy, Clone, Default, Debug, Eq, PartialEq, Hash, Ord, PartialOrd,
        )]
        pub struct $name(usize);
        impl crate::context::indexed::Index for $name {
            fn new(i: usize) -> Self {
                Self(i)
            }
            fn get(&self) -> usize {
                self.0
            }
        }
    };
}
pub(crate) use define_index;

#[cfg(test)]
mod test {
    use super::*;

    define_index!(Slot, "Test index");

    #[test]
    fn push_and_take() {
        let mut v: IndexVec<Option<u32>, Slot> = IndexVec::default();
        assert!(v.is_empty());
        let a = v.push(Some(1));
        let b = v.push(None);
        assert_eq!(v.len(), 2);
        assert_eq!(v[a], Some(1));
        assert_eq!(v[b], None);
        assert_eq!(v.take(a), Some(1));
        assert_eq!(v[a], None);
        assert_eq!(v.keys().collect::<Vec<_>>(), vec![a, b]);
    }
}
