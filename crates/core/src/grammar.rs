//! Field grammar -- pure predicates over identifier and type strings.

use regex::Regex;
use std::sync::LazyLock;

static UPPER_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Za-z0-9]*(\[\])?$").expect("valid regex"));

static LOWER_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][A-Za-z0-9]*(\[\])?$").expect("valid regex"));

/// Union suffix marking a nullable type.
pub const NULLABLE_SUFFIX: &str = "|null";

/// Suffix marking a collection of the element type.
pub const ARRAY_SUFFIX: &str = "[]";

/// Type marker that an array-suffixed type collapses to.
pub const COLLECTION_TYPE: &str = "array";

/// Built-in scalar type names that need no import.
pub const PRIMITIVE_TYPES: &[&str] = &[
    "array", "bool", "callable", "float", "int", "iterable", "mixed", "object", "string",
];

/// `^[A-Z][A-Za-z0-9]*(\[\])?$`
pub fn is_upper_identifier(s: &str) -> bool {
    UPPER_IDENTIFIER.is_match(s)
}

/// `^[a-z][A-Za-z0-9]*(\[\])?$`
pub fn is_lower_identifier(s: &str) -> bool {
    LOWER_IDENTIFIER.is_match(s)
}

pub fn has_nullable_suffix(ty: &str) -> bool {
    ty.ends_with(NULLABLE_SUFFIX)
}

/// The type with a trailing `|null` removed. Any other union is left
/// intact so the grammar check rejects it.
pub fn strip_nullable(ty: &str) -> &str {
    ty.strip_suffix(NULLABLE_SUFFIX).unwrap_or(ty)
}

/// Strips `|null` and maps `Type[]` to the collection marker.
pub fn base_type(ty: &str) -> &str {
    let ty = strip_nullable(ty);
    if ty.ends_with(ARRAY_SUFFIX) {
        COLLECTION_TYPE
    } else {
        ty
    }
}

/// Strips `|null` and a trailing `[]`, leaving the name an import must match.
pub fn element_type(ty: &str) -> &str {
    let ty = strip_nullable(ty);
    ty.strip_suffix(ARRAY_SUFFIX).unwrap_or(ty)
}

pub fn is_primitive(ty: &str) -> bool {
    PRIMITIVE_TYPES.contains(&element_type(ty))
}

/// A declared field type is valid when, ignoring a trailing `|null`, it is
/// an upper identifier (optionally `[]`) or a primitive. No other union is
/// accepted.
pub fn is_valid_type(ty: &str) -> bool {
    let ty = strip_nullable(ty);
    is_upper_identifier(ty) || is_primitive(ty)
}

/// Last `\`-separated segment of a fully-qualified import.
pub fn import_short_name(import: &str) -> &str {
    import.rsplit('\\').next().unwrap_or(import)
}

/// `totalAmount` -> `TOTAL_AMOUNT`.
pub fn to_upper_snake(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, ch) in s.chars().enumerate() {
        if ch.is_ascii_uppercase() && i > 0 {
            out.push('_');
        }
        out.push(ch.to_ascii_uppercase());
    }
    out
}

/// `ChargeCard` -> `chargeCard`.
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_identifier() {
        assert!(is_upper_identifier("Billing"));
        assert!(is_upper_identifier("Order2"));
        assert!(is_upper_identifier("Item[]"));
        assert!(!is_upper_identifier("billing"));
        assert!(!is_upper_identifier("Bill_ing"));
        assert!(!is_upper_identifier("Item[][]"));
        assert!(!is_upper_identifier(""));
    }

    #[test]
    fn lower_identifier() {
        assert!(is_lower_identifier("amount"));
        assert!(is_lower_identifier("totalAmount"));
        assert!(is_lower_identifier("items[]"));
        assert!(!is_lower_identifier("Amount"));
        assert!(!is_lower_identifier("total-amount"));
        assert!(!is_lower_identifier("1total"));
    }

    #[test]
    fn nullable_and_base_type() {
        assert!(has_nullable_suffix("Int|null"));
        assert!(!has_nullable_suffix("Int"));
        assert_eq!(base_type("Int|null"), "Int");
        assert_eq!(base_type("Item[]"), "array");
        assert_eq!(base_type("Item[]|null"), "array");
        assert_eq!(base_type("Money"), "Money");
    }

    #[test]
    fn element_type_strips_both_suffixes() {
        assert_eq!(element_type("Item[]|null"), "Item");
        assert_eq!(element_type("Item[]"), "Item");
        assert_eq!(element_type("Item"), "Item");
    }

    #[test]
    fn valid_types_include_primitives() {
        assert!(is_valid_type("Money|null"));
        assert!(is_valid_type("string"));
        assert!(is_valid_type("int[]"));
        assert!(!is_valid_type("money"));
        assert!(!is_valid_type("Mo ney"));
    }

    #[test]
    fn only_a_trailing_null_union_is_accepted() {
        for ty in ["Money|Bogus", "Money|string|int", "Money|null|junk", "null|Money", "string|int"] {
            assert!(!is_valid_type(ty), "{} should be rejected", ty);
        }
        assert!(!has_nullable_suffix("Money|null|junk"));
        assert_eq!(strip_nullable("Money|Bogus"), "Money|Bogus");
        assert_eq!(element_type("Money|Bogus"), "Money|Bogus");
        assert_eq!(base_type("Item[]|null"), "array");
    }

    #[test]
    fn import_short_name_takes_last_segment() {
        assert_eq!(import_short_name("App\\Models\\Invoice"), "Invoice");
        assert_eq!(import_short_name("Invoice"), "Invoice");
    }

    #[test]
    fn case_transforms() {
        assert_eq!(to_upper_snake("totalAmount"), "TOTAL_AMOUNT");
        assert_eq!(to_upper_snake("amount"), "AMOUNT");
        assert_eq!(to_upper_snake("aBC"), "A_B_C");
        assert_eq!(lower_first("ChargeCard"), "chargeCard");
        assert_eq!(lower_first(""), "");
    }
}
