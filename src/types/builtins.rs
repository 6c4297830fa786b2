//! Names of the built-in functions shared by the checker and code generator.

/// Built-in function names. User functions may not reuse them.
pub const BUILT_INS: &[&str] = &[
    "print",
    "input",
    "to_string",
    "to_int",
    "to_double",
    "length",
    "get",
    "concat",
    "list_create",
    "list_add",
    "list_numi",
    "list_numd",
    "list_nums",
    "list_numb",
    "list_rmb",
    "list_avgi",
    "list_avgd",
    "list_change",
    "list_size",
];

/// Internal name the checker gives `length` when applied to an array.
pub const ARRAY_LENGTH: &str = "length@array";

const RETRIEVE_PREFIX: &str = "list<";
const RETRIEVE_SUFFIX: &str = ">retrieve";

pub fn is_builtin(name: &str) -> bool {
    BUILT_INS.contains(&name) || retrieve_element_type(name).is_some()
}

/// The element type embedded in a `list<T>retrieve` name.
pub fn retrieve_element_type(name: &str) -> Option<&str> {
    name.strip_prefix(RETRIEVE_PREFIX)?
        .strip_suffix(RETRIEVE_SUFFIX)
}

/// Built-ins that leave nothing on the operand stack.
pub fn is_void_builtin(name: &str) -> bool {
    matches!(name, "print" | "list_add" | "list_rmb" | "list_change")
}
