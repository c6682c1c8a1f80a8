use crate::api::types::EntityId;

/// Anything stored in an [`ActiveSet`].
pub trait Identified {
    fn id(&self) -> EntityId;
}

/// Flat, insertion-ordered storage for the live members of a level
/// (enemies, consumables). Removal is final: a removed member is gone,
/// there is no "inactive" state.
#[derive(Debug, Clone)]
pub struct ActiveSet<T> {
    members: Vec<T>,
}

impl<T: Identified> ActiveSet<T> {
    pub fn new() -> Self {
        Self { members: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            members: Vec::with_capacity(capacity),
        }
    }

    pub fn spawn(&mut self, member: T) {
        self.members.push(member);
    }

    /// Remove a member by ID, keeping the order of the rest.
    pub fn despawn(&mut self, id: EntityId) -> Option<T> {
        let idx = self.members.iter().position(|m| m.id() == id)?;
        Some(self.members.remove(idx))
    }

    /// Remove every member matching `pred` and return them in order.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> Vec<T> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.members.len());
        for member in self.members.drain(..) {
            if pred(&member) {
                removed.push(member);
            } else {
                kept.push(member);
            }
        }
        self.members = kept;
        removed
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.members.iter().find(|m| m.id() == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.members.iter_mut().find(|m| m.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.members.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.members.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.members
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }
}

impl<T: Identified> Default for ActiveSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Identified> FromIterator<T> for ActiveSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}
