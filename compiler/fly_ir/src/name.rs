//! Interned identifiers.
//!
//! Every identifier and namespace path in a compilation unit is interned
//! once. Comparison then becomes equality on a `u32` handle instead of a
//! string compare, and symbol-table keys avoid re-hashing the same string
//! at every lookup.
//!
//! Compilation is single-threaded per `spec.md §5` (the driver runs modules
//! sequentially with no shared mutable state beyond the read-only-after-pass-1
//! symbol registry), so unlike a salsa-style incremental compiler this
//! interner does not need to be `Sync`. A plain `RefCell`-backed table is
//! the idiomatic fit.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// An interned string handle.
///
/// Cheap to copy, compare, and hash; the actual text is recovered through
/// the `Interner` that produced it.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Name(u32);

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

struct InternerData {
    map: FxHashMap<Rc<str>, Name>,
    strings: Vec<Rc<str>>,
}

/// String interner for one compilation unit.
///
/// Owns the canonical storage for every interned string; `Name` values
/// produced by one interner are meaningless against another.
pub struct Interner {
    data: RefCell<InternerData>,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    #[must_use]
    pub fn new() -> Self {
        Interner {
            data: RefCell::new(InternerData {
                map: FxHashMap::default(),
                strings: Vec::new(),
            }),
        }
    }

    /// Intern a string, returning its handle. Interning the same text twice
    /// returns the same handle.
    pub fn intern(&self, text: &str) -> Name {
        let mut data = self.data.borrow_mut();
        if let Some(&name) = data.map.get(text) {
            return name;
        }
        let rc: Rc<str> = Rc::from(text);
        let name = Name(u32::try_from(data.strings.len()).unwrap_or_else(|_| panic!("interner overflow")));
        data.strings.push(rc.clone());
        data.map.insert(rc, name);
        name
    }

    /// Recover the text for a previously interned handle.
    #[must_use]
    pub fn resolve(&self, name: Name) -> Rc<str> {
        self.data.borrow().strings[name.0 as usize].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_same_text_yields_same_handle() {
        let interner = Interner::new();
        let a = interner.intern("foo");
        let b = interner.intern("foo");
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_text_yields_distinct_handles() {
        let interner = Interner::new();
        let a = interner.intern("foo");
        let b = interner.intern("bar");
        assert_ne!(a, b);
        assert_eq!(&*interner.resolve(a), "foo");
        assert_eq!(&*interner.resolve(b), "bar");
    }
}
