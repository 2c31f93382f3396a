//! Positional decomposition of personnel names.

use cds_model::NAME_PREFIXES;

/// A full name split into the CDS first/middle/last destination fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonName {
    pub first: Option<String>,
    pub middle: Option<String>,
    pub last: Option<String>,
}

/// Split a full-name string on whitespace, strip a leading honorific, and
/// assign parts by token count: one token is a last name only, two are
/// first + last, three or more are first, middle, and the remainder joined
/// as the last name.
pub fn decompose_person_name(full_name: &str) -> PersonName {
    let mut tokens: Vec<&str> = full_name.split_whitespace().collect();
    if tokens
        .first()
        .is_some_and(|first| NAME_PREFIXES.contains(first))
    {
        tokens.remove(0);
    }
    match tokens.len() {
        0 => PersonName::default(),
        1 => PersonName {
            last: Some(tokens[0].to_string()),
            ..PersonName::default()
        },
        2 => PersonName {
            first: Some(tokens[0].to_string()),
            last: Some(tokens[1].to_string()),
            ..PersonName::default()
        },
        _ => PersonName {
            first: Some(tokens[0].to_string()),
            middle: Some(tokens[1].to_string()),
            last: Some(tokens[2..].join(" ")),
        },
    }
}
