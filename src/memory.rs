//! Heap guard: refuse allocations the platform cannot satisfy
//!
//! The device allocator does not reliably return null when the heap runs into
//! the stack, so every scratch buffer goes through [`HeapGuard`], which checks
//! a [`MemoryBudget`] before asking the allocator for anything.

use std::cell::Cell;
use std::mem;
use std::ops::{Deref, DerefMut};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Source of the current free-memory estimate (gap between heap top and stack)
pub trait MemoryBudget {
    fn free_bytes(&self) -> usize;
}

/// A budget with a fixed number of free bytes
#[derive(Debug, Clone, Copy)]
pub struct FixedBudget {
    free: usize,
}

impl FixedBudget {
    pub fn new(free: usize) -> Self {
        Self { free }
    }
}

impl MemoryBudget for FixedBudget {
    fn free_bytes(&self) -> usize {
        self.free
    }
}

/// No limit; for hosts where the system allocator is trusted
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl MemoryBudget for Unbounded {
    fn free_bytes(&self) -> usize {
        usize::MAX
    }
}

/// The underlying allocator the guard delegates to
pub trait RawAllocator {
    /// Allocate `count` default-initialized elements, or `None` on failure
    fn allocate<T: Clone + Default>(&self, count: usize) -> Option<Vec<T>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAllocator;

impl RawAllocator for SystemAllocator {
    fn allocate<T: Clone + Default>(&self, count: usize) -> Option<Vec<T>> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(count).ok()?;
        buf.resize(count, T::default());
        Some(buf)
    }
}

/// Checks every allocation against the budget minus the bytes its own
/// buffers still hold
pub struct HeapGuard<B, A = SystemAllocator> {
    budget: B,
    allocator: A,
    in_use: Cell<usize>,
}

impl<B: MemoryBudget> HeapGuard<B> {
    pub fn new(budget: B) -> Self {
        Self::with_allocator(budget, SystemAllocator)
    }
}

impl<B: MemoryBudget, A: RawAllocator> HeapGuard<B, A> {
    pub fn with_allocator(budget: B, allocator: A) -> Self {
        Self {
            budget,
            allocator,
            in_use: Cell::new(0),
        }
    }

    /// Current free estimate, net of live guarded buffers
    pub fn free_bytes(&self) -> usize {
        self.budget.free_bytes().saturating_sub(self.in_use.get())
    }

    /// Bytes held by buffers this guard handed out and that are still alive
    pub fn in_use(&self) -> usize {
        self.in_use.get()
    }

    /// Allocate a zeroed buffer of `count` elements if the budget allows it
    ///
    /// The allocator can still fail after the budget check passes (a
    /// fragmented heap), which is reported as `OutOfMemory` as well. The
    /// bytes count against the budget until the buffer is dropped.
    pub fn try_allocate<T: Clone + Default>(&self, count: usize) -> Result<Scratch<'_, T>> {
        let available = self.free_bytes();
        let requested = count.saturating_mul(mem::size_of::<T>());

        if requested > available {
            warn!(
                "Refusing allocation of {} bytes ({} free)",
                requested, available
            );
            return Err(Error::OutOfMemory {
                requested,
                available,
            });
        }

        let buf = self.allocator.allocate(count).ok_or(Error::OutOfMemory {
            requested,
            available,
        })?;
        self.in_use.set(self.in_use.get() + requested);
        debug!("Allocated {} bytes", requested);
        Ok(Scratch {
            buf,
            bytes: requested,
            in_use: &self.in_use,
        })
    }
}

/// A buffer from [`HeapGuard::try_allocate`]; returns its bytes to the
/// budget on drop
#[derive(Debug)]
pub struct Scratch<'g, T> {
    buf: Vec<T>,
    bytes: usize,
    in_use: &'g Cell<usize>,
}

impl<T> Deref for Scratch<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.buf
    }
}

impl<T> DerefMut for Scratch<'_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.buf
    }
}

impl<T> Drop for Scratch<'_, T> {
    fn drop(&mut self) {
        self.in_use.set(self.in_use.get().saturating_sub(self.bytes));
    }
}
