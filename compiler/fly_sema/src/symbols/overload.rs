//! Overload table semantics (`spec.md §4.5`).
//!
//! Keyed first by arity, then scanned linearly for a structural parameter-type
//! match — `spec.md` calls out that this two-stage shape (name → arity →
//! small vector) is the point: it avoids hashing full signatures until an
//! ambiguity check is actually needed.

use fly_ir::{Name, Type};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::rc::Rc;

/// Candidates for one `(name, arity)` bucket rarely exceed a handful of
/// overloads, so the bucket is inline-stored rather than heap-allocated in
/// the common case (`spec.md §9`: "a small vector of candidates").
type Candidates<T> = SmallVec<[Rc<T>; 4]>;

/// Anything that can sit in an overload bucket: a free function or a class
/// method/constructor.
pub trait Overloadable {
    fn name(&self) -> Name;
    /// User-visible parameter types, in order (excludes the implicit
    /// leading error pointer and, for instance methods, the receiver).
    fn param_types(&self) -> Vec<Type>;
}

pub struct DuplicateOverload;

/// `name -> arity -> candidates` (`spec.md §4.2`, §4.5).
pub struct OverloadTable<T> {
    by_name: FxHashMap<Name, FxHashMap<usize, Candidates<T>>>,
}

impl<T> Default for OverloadTable<T> {
    fn default() -> Self {
        OverloadTable {
            by_name: FxHashMap::default(),
        }
    }
}

impl<T: Overloadable> OverloadTable<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a candidate. Different arity, or same arity with a
    /// structurally different parameter-type list, is retained alongside
    /// existing candidates. Same arity with an equal parameter-type list is
    /// a duplicate error (`spec.md §4.5`).
    pub fn insert(&mut self, item: Rc<T>) -> Result<(), DuplicateOverload> {
        let name = item.name();
        let arity = item.param_types().len();
        let bucket = self.by_name.entry(name).or_default().entry(arity).or_default();
        for existing in bucket.iter() {
            if existing.param_types() == item.param_types() {
                return Err(DuplicateOverload);
            }
        }
        bucket.push(item);
        Ok(())
    }

    /// All candidates for `name` at the given arity.
    #[must_use]
    pub fn find(&self, name: Name, arity: usize) -> &[Rc<T>] {
        self.by_name
            .get(&name)
            .and_then(|by_arity| by_arity.get(&arity))
            .map_or(&[], Candidates::<T>::as_slice)
    }

    /// All candidates for `name`, any arity (used when the argument count at
    /// a call site hasn't been checked against a specific bucket yet).
    pub fn find_all(&self, name: Name) -> impl Iterator<Item = &Rc<T>> {
        self.by_name
            .get(&name)
            .into_iter()
            .flat_map(|by_arity| by_arity.values())
            .flatten()
    }

    /// Remove every candidate for `name` at `arity` that passes `predicate`,
    /// returning how many were removed. Used to replace the synthesized
    /// auto-default constructor when a user zero-arg constructor is
    /// declared (`spec.md §3` invariant, Open Question ii).
    pub fn remove_where(
        &mut self,
        name: Name,
        arity: usize,
        predicate: impl Fn(&T) -> bool,
    ) -> usize {
        let Some(by_arity) = self.by_name.get_mut(&name) else {
            return 0;
        };
        let Some(bucket) = by_arity.get_mut(&arity) else {
            return 0;
        };
        let before = bucket.len();
        bucket.retain(|item| !predicate(item));
        before - bucket.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fly_ir::{IntBits, Interner};

    struct Fn {
        name: Name,
        params: Vec<Type>,
    }
    impl Overloadable for Fn {
        fn name(&self) -> Name {
            self.name
        }
        fn param_types(&self) -> Vec<Type> {
            self.params.clone()
        }
    }

    #[test]
    fn different_arity_both_retained() {
        let interner = Interner::new();
        let f = interner.intern("f");
        let mut table = OverloadTable::<Fn>::new();
        table
            .insert(Rc::new(Fn {
                name: f,
                params: vec![],
            }))
            .unwrap();
        table
            .insert(Rc::new(Fn {
                name: f,
                params: vec![Type::Bool],
            }))
            .unwrap();
        assert_eq!(table.find(f, 0).len(), 1);
        assert_eq!(table.find(f, 1).len(), 1);
    }

    #[test]
    fn same_signature_is_duplicate() {
        let interner = Interner::new();
        let f = interner.intern("f");
        let mut table = OverloadTable::<Fn>::new();
        table
            .insert(Rc::new(Fn {
                name: f,
                params: vec![Type::Int {
                    bits: IntBits::B32,
                    signed: true,
                }],
            }))
            .unwrap();
        let err = table.insert(Rc::new(Fn {
            name: f,
            params: vec![Type::Int {
                bits: IntBits::B32,
                signed: true,
            }],
        }));
        assert!(err.is_err());
    }

    #[test]
    fn different_param_type_same_arity_both_retained() {
        let interner = Interner::new();
        let f = interner.intern("f");
        let mut table = OverloadTable::<Fn>::new();
        table
            .insert(Rc::new(Fn {
                name: f,
                params: vec![Type::Int {
                    bits: IntBits::B32,
                    signed: true,
                }],
            }))
            .unwrap();
        table
            .insert(Rc::new(Fn {
                name: f,
                params: vec![Type::Float(fly_ir::FloatBits::B64)],
            }))
            .unwrap();
        assert_eq!(table.find(f, 1).len(), 2);
    }
}
