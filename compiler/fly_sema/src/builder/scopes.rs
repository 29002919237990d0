//! Scope-modifier builder (`SPEC_FULL.md §2`, grounded on `SemaBuilderScopes`).
//!
//! The parser accumulates modifiers (`public`, `const`, `static`, ...) as it
//! reads a declaration header, then hands the finished list to whichever
//! `Builder::create_*` call follows. Building validates mutual exclusion;
//! whether the combination makes semantic sense for the declaration it ends
//! up on is the validator's job (`spec.md §4.1`).

use fly_ir::{Scopes, Visibility};

pub struct InvalidScopeCombination;

#[derive(Default)]
pub struct ScopeBuilder {
    scopes: Scopes,
}

impl ScopeBuilder {
    #[must_use]
    pub fn new() -> Self {
        ScopeBuilder::default()
    }

    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.scopes.visibility = visibility;
        self
    }

    #[must_use]
    pub fn constant(mut self, is_const: bool) -> Self {
        self.scopes.is_const = is_const;
        self
    }

    #[must_use]
    pub fn static_(mut self, is_static: bool) -> Self {
        self.scopes.is_static = is_static;
        self
    }

    #[must_use]
    pub fn build(self) -> Scopes {
        self.scopes
    }

    /// A parameter cannot be both `const` and carry an explicit visibility
    /// modifier (`spec.md §4.1` Errors: "impossible scope combination").
    pub fn build_for_param(self) -> Result<Scopes, InvalidScopeCombination> {
        if self.scopes.is_const && self.scopes.visibility != Visibility::Default {
            return Err(InvalidScopeCombination);
        }
        Ok(self.scopes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_rejects_const_plus_visibility() {
        let result = ScopeBuilder::new()
            .constant(true)
            .visibility(Visibility::Public)
            .build_for_param();
        assert!(result.is_err());
    }

    #[test]
    fn param_allows_const_alone() {
        let result = ScopeBuilder::new().constant(true).build_for_param();
        assert!(result.is_ok());
    }
}
