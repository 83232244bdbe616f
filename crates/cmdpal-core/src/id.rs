#![forbid(unsafe_code)]

//! Node identity.
//!
//! Every mounted item, group, input, and list gets a [`NodeId`] from the
//! [`IdAllocator`] owned by its root. Ids are unique across roots in the
//! same process, so rendered `id` attributes never collide when several
//! palettes share one document.

use core::fmt;
use std::cell::Cell;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_ROOT: AtomicU32 = AtomicU32::new(1);

/// Identifier of a mounted node within one root instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    root: u32,
    index: u32,
}

impl NodeId {
    /// The root instance this node belongs to.
    #[must_use]
    pub const fn root(self) -> u32 {
        self.root
    }

    /// Allocation index within the root.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }
}

/// Rendered form used for `id` and `aria-*` reference attributes.
impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":r{}-{}:", self.root, self.index)
    }
}

/// Hands out [`NodeId`]s for a single root.
#[derive(Debug)]
pub struct IdAllocator {
    root: u32,
    next: Cell<u32>,
}

impl IdAllocator {
    /// Create an allocator for a fresh root instance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: NEXT_ROOT.fetch_add(1, Ordering::Relaxed),
            next: Cell::new(0),
        }
    }

    /// Root instance number shared by every id this allocator returns.
    #[must_use]
    pub fn root(&self) -> u32 {
        self.root
    }

    /// Allocate the next id.
    pub fn next_id(&self) -> NodeId {
        let index = self.next.get();
        self.next.set(index.wrapping_add(1));
        NodeId {
            root: self.root,
            index,
        }
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
