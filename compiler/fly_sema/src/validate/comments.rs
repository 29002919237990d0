//! Doc-comment `@param`/`@return` count validation (`spec.md §4.3`).

/// Counts `@param` tags in a doc comment.
#[must_use]
pub fn count_param_tags(text: &str) -> usize {
    text.matches("@param").count()
}

/// Counts `@return` tags in a doc comment.
#[must_use]
pub fn count_return_tags(text: &str) -> usize {
    text.matches("@return").count()
}

/// When a comment is present, its `@param` count must match the parameter
/// count and its `@return` count must be 0 or 1, matching whether the
/// function returns `Void` (`spec.md §4.3`).
#[must_use]
pub fn comment_matches_signature(text: &str, param_count: usize, returns_void: bool) -> bool {
    if count_param_tags(text) != param_count {
        return false;
    }
    let returns = count_return_tags(text);
    if returns_void {
        returns == 0
    } else {
        returns <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_counts_pass() {
        let doc = "@param a first\n@param b second\n@return the sum";
        assert!(comment_matches_signature(doc, 2, false));
    }

    #[test]
    fn mismatched_param_count_fails() {
        let doc = "@param a first\n@return the sum";
        assert!(!comment_matches_signature(doc, 2, false));
    }

    #[test]
    fn void_function_rejects_return_tag() {
        let doc = "@param a first\n@return nothing";
        assert!(!comment_matches_signature(doc, 1, true));
    }
}
