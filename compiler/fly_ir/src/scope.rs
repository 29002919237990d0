//! Declaration scope modifiers (`spec.md` Glossary: "Scope").
//!
//! A declaration carries a visibility plus independent `const`/`static`
//! flags. The builder enforces mutual exclusion (a param cannot be both
//! `const` and carry a visibility modifier) but never semantic sensibility
//! — that is the validator's job (`spec.md §4.1`).

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Visibility {
    /// Unqualified declarations are public across imports
    /// (Open Question i, resolved in `SPEC_FULL.md §4`).
    #[default]
    Default,
    Public,
    Private,
}

/// The resolved set of scope modifiers on one declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Scopes {
    pub visibility: Visibility,
    pub is_const: bool,
    pub is_static: bool,
}

impl Scopes {
    #[must_use]
    pub fn public() -> Self {
        Scopes {
            visibility: Visibility::Public,
            ..Scopes::default()
        }
    }

    #[must_use]
    pub fn is_visible_from_outside(&self) -> bool {
        !matches!(self.visibility, Visibility::Private)
    }
}
