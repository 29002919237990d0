//! The stable compile-error taxonomy (`spec.md §7`).
//!
//! Ids are stable strings rather than a bare enum discriminant so that
//! external tooling (not part of this crate) can key off them without
//! depending on our enum's representation.

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    pub const MODULE_DUPLICATED: ErrorCode = ErrorCode("module_duplicated");
    pub const NAMESPACE_EMPTY: ErrorCode = ErrorCode("namespace_empty");
    pub const IDENTIFIER_EMPTY: ErrorCode = ErrorCode("identifier_empty");
    pub const IMPORT_UNDEFINED: ErrorCode = ErrorCode("import_undefined");
    pub const NAMESPACE_NOT_FOUND: ErrorCode = ErrorCode("namespace_not_found");
    pub const DUPLICATE_GLOBAL: ErrorCode = ErrorCode("duplicate_global");
    pub const DUPLICATE_FUNCTION: ErrorCode = ErrorCode("duplicate_function");
    pub const DUPLICATE_PARAM: ErrorCode = ErrorCode("duplicate_param");
    pub const DUPLICATE_LOCAL: ErrorCode = ErrorCode("duplicate_local");
    pub const UNREF_VAR: ErrorCode = ErrorCode("unref_var");
    pub const UNREF_CALL: ErrorCode = ErrorCode("unref_call");
    pub const UNREF_TYPE: ErrorCode = ErrorCode("unref_type");
    pub const TYPE_CONVERT: ErrorCode = ErrorCode("type_convert");
    pub const TYPE_ARITH: ErrorCode = ErrorCode("type_arith");
    pub const TYPE_LOGICAL: ErrorCode = ErrorCode("type_logical");
    pub const TYPE_COMPARABLE: ErrorCode = ErrorCode("type_comparable");
    pub const INT_MIN_OVERFLOW: ErrorCode = ErrorCode("int_min_overflow");
    pub const INT_MAX_OVERFLOW: ErrorCode = ErrorCode("int_max_overflow");
    pub const EMPTY_EXPR: ErrorCode = ErrorCode("empty_expr");
    pub const CLASS_FIELD_REDECLARE: ErrorCode = ErrorCode("class_field_redeclare");
    pub const CLASS_METHOD_REDECLARE: ErrorCode = ErrorCode("class_method_redeclare");
    pub const CLASS_ENUM_EXPR: ErrorCode = ErrorCode("class_enum_expr");
    pub const ENUM_VAR: ErrorCode = ErrorCode("enum_var");
    pub const AMBIGUOUS_CALL: ErrorCode = ErrorCode("ambiguous_call");
    pub const LOOP_IN_DYNAMIC_ARRAY: ErrorCode = ErrorCode("loop_in_dynamic_array");
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
