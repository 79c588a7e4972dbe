//! Canonical output identifiers.
//!
//! A caller may name an output with any string. Stored records always use a
//! hyphenated UUID: ids already in that form are kept, anything else is hashed
//! with UUID v5 in the DNS namespace. Changing the namespace would break every
//! id derived from a human-chosen name.

use uuid::Uuid;

/// Returns true if `id` is a hyphenated UUID (8-4-4-4-12 hex digits).
pub fn is_canonical_id(id: &str) -> bool {
    id.len() == 36
        && id.char_indices().all(|(i, c)| match i {
            8 | 13 | 18 | 23 => c == '-',
            _ => c.is_ascii_hexdigit(),
        })
}

/// Map a caller-supplied id to its canonical form. Deterministic across restarts.
pub fn output_id_to_uuid(id: &str) -> String {
    if is_canonical_id(id) {
        return id.to_string();
    }
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, id.as_bytes()).to_string()
}

/// Fresh random id for outputs created without a caller id.
pub fn generate_output_id() -> String {
    Uuid::new_v4().to_string()
}
