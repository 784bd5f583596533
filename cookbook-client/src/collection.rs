use std::fmt;

/// Identifies one entry of a [`Collection`] for as long as it stays in it.
///
/// Positions shift when earlier entries are removed; ids do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    #[error("Index {index} is out of range for a list of {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("No entry with id {0}")]
    UnknownEntry(EntryId),
}

pub type CollectionResult<T> = std::result::Result<T, CollectionError>;

/// An ordered list of draft entries, editable by position or by id.
///
/// Used for both the tag selections and the ingredient lines of a draft.
#[derive(Clone)]
pub struct Collection<E> {
    entries: Vec<(EntryId, E)>,
    next_id: u64,
}

impl<E> Default for Collection<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }
}

impl<E> Collection<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry at the end, returning its new id.
    pub fn add(&mut self, entry: E) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, entry));
        tracing::debug!("Added entry {} at position {}", id, self.entries.len() - 1);
        id
    }

    /// Remove the entry at `index`, shifting later entries left by one.
    pub fn remove_at(&mut self, index: usize) -> CollectionResult<E> {
        self.check_index(index)?;
        let (id, entry) = self.entries.remove(index);
        tracing::debug!("Removed entry {} from position {}", id, index);
        Ok(entry)
    }

    /// Replace the entry at `index` in place, returning the old value.
    pub fn update_at(&mut self, index: usize, value: E) -> CollectionResult<E> {
        self.check_index(index)?;
        Ok(std::mem::replace(&mut self.entries[index].1, value))
    }

    /// Remove the entry with the given id.
    pub fn remove(&mut self, id: EntryId) -> CollectionResult<E> {
        let index = self.position(id)?;
        self.remove_at(index)
    }

    /// Replace the entry with the given id, returning the old value.
    pub fn update(&mut self, id: EntryId, value: E) -> CollectionResult<E> {
        let index = self.position(id)?;
        self.update_at(index, value)
    }

    /// Current position of the entry with the given id.
    pub fn position(&self, id: EntryId) -> CollectionResult<usize> {
        self.entries
            .iter()
            .position(|(entry_id, _)| *entry_id == id)
            .ok_or(CollectionError::UnknownEntry(id))
    }

    pub fn get(&self, id: EntryId) -> CollectionResult<&E> {
        let index = self.position(id)?;
        Ok(&self.entries[index].1)
    }

    pub fn get_at(&self, index: usize) -> Option<&E> {
        self.entries.get(index).map(|(_, entry)| entry)
    }

    /// The id of the entry currently at `index`.
    pub fn id_at(&self, index: usize) -> Option<EntryId> {
        self.entries.get(index).map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry. Ids handed out before are not reused.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The values, in order.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.entries.iter().map(|(_, entry)| entry)
    }

    /// Ids and values, in order.
    pub fn entries(&self) -> impl Iterator<Item = (EntryId, &E)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    fn check_index(&self, index: usize) -> CollectionResult<()> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(CollectionError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }
}

impl<E> FromIterator<E> for Collection<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut collection = Self::new();
        for entry in iter {
            collection.add(entry);
        }
        collection
    }
}

// Ids are bookkeeping; two lists with the same values in the same order are equal.
impl<E: PartialEq> PartialEq for Collection<E> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<E: Eq> Eq for Collection<E> {}

impl<E: fmt::Debug> fmt::Debug for Collection<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
