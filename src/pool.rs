use crate::error::GameError;

/// Fixed-capacity ordered collection.
///
/// Occupied slots always form the contiguous prefix `[0, len)`: every
/// removal shifts later items left, so there are no tombstones and indices
/// stay dense.  The same type backs the ship's bullets, each martian's
/// bullets, the orphan bullets and the effects.
#[derive(Clone, Debug)]
pub struct Pool<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> Pool<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Append at the back.  A full pool is left untouched.
    pub fn append(&mut self, item: T) -> Result<(), GameError> {
        if self.is_full() {
            return Err(GameError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.items.push(item);
        Ok(())
    }

    /// Remove the oldest item (index 0).
    pub fn dequeue_front(&mut self) -> Option<T> {
        self.extract_at(0)
    }

    /// Remove the item at `index`, keeping the relative order of the rest.
    /// Out-of-range indices are a no-op.
    pub fn extract_at(&mut self, index: usize) -> Option<T> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn get_at(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_at_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Like [`Pool::get_at`] but reports the miss as [`GameError::NotFound`].
    pub fn try_get_at(&self, index: usize) -> Result<&T, GameError> {
        self.items.get(index).ok_or(GameError::NotFound {
            index,
            len: self.items.len(),
        })
    }

    /// Move every item out, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.items.drain(..)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<'a, T> IntoIterator for &'a Pool<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
