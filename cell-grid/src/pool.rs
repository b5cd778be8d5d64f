use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::key::IdentifierMap;
use crate::{CellHandle, Size};

/// Behaviour the grid needs from a cell type.
pub trait GridCell {
    /// Called when the cell goes back to its free list.
    fn prepare_for_reuse(&mut self) {}

    /// Size the cell wants given the layout's estimate.
    fn fitting_size(&self, estimated: Size) -> Size {
        estimated
    }
}

type Factory<C> = Box<dyn Fn() -> C>;

struct Registration<C> {
    identifier: String,
    factory: Factory<C>,
    free: Vec<usize>,
}

/// Proof that a factory was registered with a [`ReusePool`].
///
/// Dequeuing through a `ReuseId` cannot miss, so data sources that keep the id returned by
/// [`ReusePool::register`] never have to handle an unknown identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReuseId(usize);

struct Slot<C> {
    registration: usize,
    in_use: bool,
    cell: C,
}

/// An arena of cells with one free list per reuse identifier.
///
/// Cells are never dropped while the pool lives: a cell leaving the screen is pushed on the
/// free list of the identifier it was created for and handed out again by the next
/// [`ReusePool::dequeue`] for that identifier.
pub struct ReusePool<C> {
    identifiers: IdentifierMap,
    registrations: Vec<Registration<C>>,
    slots: Vec<Slot<C>>,
}

impl<C: GridCell> ReusePool<C> {
    pub fn new() -> Self {
        Self {
            identifiers: IdentifierMap::default(),
            registrations: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// Registers the factory used to create cells for `identifier`.
    ///
    /// Registering an identifier again replaces its factory; cells already created keep
    /// being reused.
    pub fn register(
        &mut self,
        identifier: impl Into<String>,
        factory: impl Fn() -> C + 'static,
    ) -> ReuseId {
        let identifier = identifier.into();
        if let Some(&reg) = self.identifiers.get(&identifier) {
            gdebug!(identifier = identifier.as_str(), "re-registering cell factory");
            self.registrations[reg].factory = Box::new(factory);
            return ReuseId(reg);
        }
        gdebug!(identifier = identifier.as_str(), "registering cell factory");
        let reg = self.registrations.len();
        self.registrations.push(Registration {
            identifier: identifier.clone(),
            factory: Box::new(factory),
            free: Vec::new(),
        });
        self.identifiers.insert(identifier, reg);
        ReuseId(reg)
    }

    pub fn reuse_id(&self, identifier: &str) -> Option<ReuseId> {
        self.identifiers.get(identifier).copied().map(ReuseId)
    }

    pub fn is_registered(&self, identifier: &str) -> bool {
        self.identifiers.contains_key(identifier)
    }

    /// Hands out a free cell for `identifier`, creating one when its free list is empty.
    ///
    /// Returns `None` when nothing was registered under `identifier`.
    pub fn dequeue(&mut self, identifier: &str) -> Option<CellHandle> {
        let Some(id) = self.reuse_id(identifier) else {
            gwarn!(identifier, "dequeue: no cell registered for identifier");
            return None;
        };
        Some(self.dequeue_id(id))
    }

    /// Same as [`Self::dequeue`], for an identifier already resolved by `register`.
    ///
    /// `id` must come from this pool.
    pub fn dequeue_id(&mut self, id: ReuseId) -> CellHandle {
        let reg = id.0;
        if let Some(slot) = self.registrations[reg].free.pop() {
            gtrace!(slot, "dequeue: reusing cell");
            self.slots[slot].in_use = true;
            return CellHandle(slot);
        }

        let slot = self.slots.len();
        gtrace!(slot, "dequeue: allocating cell");
        let cell = (self.registrations[reg].factory)();
        self.slots.push(Slot {
            registration: reg,
            in_use: true,
            cell,
        });
        CellHandle(slot)
    }

    /// Returns a cell to its free list. Returns `false` if the handle was not in use.
    pub fn enqueue(&mut self, handle: CellHandle) -> bool {
        let Some(slot) = self.slots.get_mut(handle.0) else {
            gwarn!(slot = handle.0, "enqueue: unknown cell handle");
            return false;
        };
        if !slot.in_use {
            gwarn!(slot = handle.0, "enqueue: cell is already free");
            return false;
        }
        slot.in_use = false;
        slot.cell.prepare_for_reuse();
        self.registrations[slot.registration].free.push(handle.0);
        true
    }

    /// Borrows an in-use cell.
    pub fn get(&self, handle: CellHandle) -> Option<&C> {
        self.slots
            .get(handle.0)
            .filter(|slot| slot.in_use)
            .map(|slot| &slot.cell)
    }

    pub fn get_mut(&mut self, handle: CellHandle) -> Option<&mut C> {
        self.slots
            .get_mut(handle.0)
            .filter(|slot| slot.in_use)
            .map(|slot| &mut slot.cell)
    }

    /// Reuse identifier the cell behind `handle` was created for.
    pub fn identifier_of(&self, handle: CellHandle) -> Option<&str> {
        let slot = self.slots.get(handle.0)?;
        Some(self.registrations[slot.registration].identifier.as_str())
    }

    /// Number of cells ever created.
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }

    pub fn in_use(&self) -> usize {
        self.slots.iter().filter(|slot| slot.in_use).count()
    }

    /// Number of idle cells waiting for `identifier`.
    pub fn free_len(&self, identifier: &str) -> usize {
        self.identifiers
            .get(identifier)
            .map_or(0, |&reg| self.registrations[reg].free.len())
    }
}

impl<C: GridCell> Default for ReusePool<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> core::fmt::Debug for ReusePool<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReusePool")
            .field("registrations", &self.registrations.len())
            .field("allocated", &self.slots.len())
            .finish_non_exhaustive()
    }
}
