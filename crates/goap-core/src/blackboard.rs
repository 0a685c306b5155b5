use std::any::Any;
use std::collections::BTreeMap;
use std::marker::PhantomData;

/// Typed key into an agent's [`Blackboard`].
///
/// Keys are plain ids; the type parameter only pins what is stored under them. Two keys with
/// the same id but different `T` refer to the same slot, which is a programming error and
/// panics on access.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BbKey<T: 'static> {
    id: u64,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: 'static> Copy for BbKey<T> {}

impl<T: 'static> Clone for BbKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> BbKey<T> {
    pub const fn new(id: u64) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    pub fn id(self) -> u64 {
        self.id
    }
}

/// Per-agent scratch storage.
///
/// Holds execution data that outlives a single action run but belongs to the agent rather than
/// to the world: the patrol waypoint cursor, trace logs, host-specific notes.
#[derive(Default)]
pub struct Blackboard {
    values: BTreeMap<u64, Box<dyn Any>>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains<T: 'static>(&self, key: BbKey<T>) -> bool {
        self.values.contains_key(&key.id)
    }

    pub fn set<T: 'static>(&mut self, key: BbKey<T>, value: T) {
        self.values.insert(key.id, Box::new(value));
    }

    pub fn get<T: 'static>(&self, key: BbKey<T>) -> Option<&T> {
        let value = self.values.get(&key.id)?;
        Some(value.downcast_ref::<T>().unwrap_or_else(|| mismatch(key.id)))
    }

    pub fn get_mut<T: 'static>(&mut self, key: BbKey<T>) -> Option<&mut T> {
        let value = self.values.get_mut(&key.id)?;
        Some(value.downcast_mut::<T>().unwrap_or_else(|| mismatch(key.id)))
    }

    /// Value under `key`, inserting `make()` first if the slot is empty.
    pub fn get_or_insert_with<T: 'static>(
        &mut self,
        key: BbKey<T>,
        make: impl FnOnce() -> T,
    ) -> &mut T {
        self.values
            .entry(key.id)
            .or_insert_with(|| Box::new(make()))
            .downcast_mut::<T>()
            .unwrap_or_else(|| mismatch(key.id))
    }

    pub fn remove<T: 'static>(&mut self, key: BbKey<T>) -> Option<T> {
        let value = self.values.remove(&key.id)?;
        Some(*value.downcast::<T>().unwrap_or_else(|_| mismatch(key.id)))
    }
}

impl std::fmt::Debug for Blackboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blackboard")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn mismatch(id: u64) -> ! {
    panic!("blackboard type mismatch for key id={id} (stored type differs from requested)")
}
