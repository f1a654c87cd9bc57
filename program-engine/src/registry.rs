//! Identity registry
//!
//! Maps opaque visual-slot handles to the logical objects they stand for and
//! keeps the visual order in a parallel handle list. Both list engines store
//! their objects here; the presentation layer only ever holds handles.

use crate::types::{EngineError, Result};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Stable, copyable handle to an object stored in a [`Registry`].
///
/// Ids are never reused inside one registry, so a handle to a removed object
/// fails to resolve instead of silently aliasing a newer one.
pub struct Handle<T> {
    id: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    fn new(id: u64) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// Raw numeric id (for logging and display)
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle#{}", self.id)
    }
}

impl<T> fmt::Display for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.id)
    }
}

/// Handle -> object map plus the visual order of handles
pub struct Registry<T> {
    /// Label used in errors and logs ("event", "command")
    kind: &'static str,

    /// All registered objects by handle
    objects: HashMap<Handle<T>, T>,

    /// Visual order, top to bottom
    order: Vec<Handle<T>>,

    /// Next id to hand out
    next_id: u64,
}

impl<T> Registry<T> {
    /// Create an empty registry whose errors are labelled with `kind`
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            objects: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
        }
    }

    fn allocate(&mut self) -> Handle<T> {
        let handle = Handle::new(self.next_id);
        self.next_id += 1;
        handle
    }

    fn not_found(kind: &'static str, handle: Handle<T>) -> EngineError {
        log::error!("Lookup of unregistered {} handle {}", kind, handle);
        EngineError::HandleNotFound { kind, id: handle.id }
    }

    /// Register an object at the end of the visual order
    pub fn register(&mut self, object: T) -> Handle<T> {
        let index = self.order.len();
        self.register_at(index, object)
    }

    /// Register an object at `index`; indices past the end append
    pub fn register_at(&mut self, index: usize, object: T) -> Handle<T> {
        let handle = self.allocate();
        let index = index.min(self.order.len());
        self.objects.insert(handle, object);
        self.order.insert(index, handle);
        handle
    }

    /// Resolve a handle to its object
    pub fn resolve(&self, handle: Handle<T>) -> Result<&T> {
        match self.objects.get(&handle) {
            Some(object) => Ok(object),
            None => Err(Self::not_found(self.kind, handle)),
        }
    }

    /// Resolve a handle to a mutable reference to its object
    pub fn resolve_mut(&mut self, handle: Handle<T>) -> Result<&mut T> {
        match self.objects.get_mut(&handle) {
            Some(object) => Ok(object),
            None => Err(Self::not_found(self.kind, handle)),
        }
    }

    /// Remove a handle and return the object it pointed to
    pub fn unregister(&mut self, handle: Handle<T>) -> Result<T> {
        match self.objects.remove(&handle) {
            Some(object) => {
                self.order.retain(|h| *h != handle);
                Ok(object)
            }
            None => Err(Self::not_found(self.kind, handle)),
        }
    }

    /// Swap the object behind `handle`, keeping the handle and its slot.
    /// Returns the previous object.
    pub fn replace(&mut self, handle: Handle<T>, object: T) -> Result<T> {
        let slot = self.resolve_mut(handle)?;
        Ok(std::mem::replace(slot, object))
    }

    /// Move an existing handle to `index` in the visual order (clamped)
    pub fn move_to(&mut self, handle: Handle<T>, index: usize) -> Result<()> {
        let from = match self.position(handle) {
            Some(from) => from,
            None => return Err(Self::not_found(self.kind, handle)),
        };
        self.order.remove(from);
        let index = index.min(self.order.len());
        self.order.insert(index, handle);
        Ok(())
    }

    /// Visual position of a handle
    pub fn position(&self, handle: Handle<T>) -> Option<usize> {
        self.order.iter().position(|h| *h == handle)
    }

    /// Handle at a visual position
    pub fn handle_at(&self, index: usize) -> Option<Handle<T>> {
        self.order.get(index).copied()
    }

    /// Check whether a handle is registered
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.objects.contains_key(&handle)
    }

    /// All handles in visual order
    pub fn handles(&self) -> &[Handle<T>] {
        &self.order
    }

    /// Objects in visual order (not registration order)
    pub fn ordered(&self) -> impl Iterator<Item = (Handle<T>, &T)> + '_ {
        self.order
            .iter()
            .filter_map(move |h| self.objects.get(h).map(|object| (*h, object)))
    }

    /// Visit every object mutably, top to bottom
    pub fn for_each_ordered_mut(&mut self, mut f: impl FnMut(&mut T)) {
        for handle in &self.order {
            if let Some(object) = self.objects.get_mut(handle) {
                f(object);
            }
        }
    }

    /// Mutable objects, in no particular order
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.objects.values_mut()
    }

    /// Number of registered objects
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drop every object. Handle ids keep increasing afterwards.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.order.clear();
    }

    /// Get registry statistics
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            num_objects: self.objects.len(),
            num_slots: self.order.len(),
            next_id: self.next_id,
        }
    }
}

/// Registry statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    /// Objects in the map
    pub num_objects: usize,
    /// Handles in the visual order (always equal to `num_objects`)
    pub num_slots: usize,
    /// Id the next registration will receive
    pub next_id: u64,
}

impl<T: fmt::Debug> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &self.kind)
            .field("order", &self.order)
            .field("objects", &self.objects)
            .finish()
    }
}
