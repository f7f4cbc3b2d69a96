//! Backing stores shared between buffer views.

use alloc::{rc::Rc, vec::Vec};
use core::{cell::Cell, fmt::Debug};

mod sealed {
    pub trait Sealed {}
}

/// An element type a [`Buffer`](super::Buffer) may hold.
///
/// This trait is sealed. It is implemented for the fixed-width integer and
/// floating point primitives; `u16` is the 16-bit character unit.
pub trait Element: Copy + Default + PartialEq + Debug + 'static + sealed::Sealed {}

macro_rules! element {
    ($($t:ty),*) => {
        $(
            impl sealed::Sealed for $t {}
            impl Element for $t {}
        )*
    };
}

element!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// A reference-counted store. Views hold an `(offset, capacity)` window over
/// one of these, and the allocation is released with the last view.
#[derive(Clone)]
pub(super) enum Store<T> {
    /// Writable heap allocation. Writes through one view are visible through
    /// every other view of the same store.
    Heap(Rc<[Cell<T>]>),
    /// Immutable external sequence. Views over it are always read-only.
    Frozen(Rc<[T]>),
}

impl<T: Element> Store<T> {
    pub(super) fn heap(values: Vec<T>) -> Self {
        Store::Heap(values.into_iter().map(Cell::new).collect())
    }

    pub(super) fn frozen(values: Vec<T>) -> Self {
        Store::Frozen(values.into())
    }

    pub(super) fn is_frozen(&self) -> bool {
        matches!(self, Store::Frozen(_))
    }

    pub(super) fn load(&self, i: usize) -> T {
        match self {
            Store::Heap(cells) => cells[i].get(),
            Store::Frozen(values) => values[i],
        }
    }

    /// Write an element. Writes to a frozen store are dropped; views check
    /// their read-only flag before getting here.
    pub(super) fn store(&self, i: usize, value: T) {
        match self {
            Store::Heap(cells) => cells[i].set(value),
            Store::Frozen(_) => debug_assert!(false, "write to a frozen store"),
        }
    }

    /// Whether two stores share an allocation.
    pub(super) fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Store::Heap(a), Store::Heap(b)) => Rc::ptr_eq(a, b),
            (Store::Frozen(a), Store::Frozen(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}
