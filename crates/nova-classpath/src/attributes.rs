use std::path::Path;

use indexmap::IndexMap;
use nova_delta::{AttributeDelta, ChangeFlags};

/// Flags describing how a library's source attachment moved between two
/// snapshots of the same entry.
pub fn source_attachment_flags(old: Option<&Path>, new: Option<&Path>) -> ChangeFlags {
    match (old, new) {
        (None, None) => ChangeFlags::empty(),
        (None, Some(_)) => ChangeFlags::SOURCE_ATTACHED,
        (Some(_), None) => ChangeFlags::SOURCE_DETACHED,
        (Some(old), Some(new)) if old == new => ChangeFlags::empty(),
        (Some(_), Some(_)) => ChangeFlags::SOURCE_ATTACHED | ChangeFlags::SOURCE_DETACHED,
    }
}

/// Attribute deltas between two extra-attribute maps.
///
/// Removed and changed attributes come first in `old` order, followed by
/// added attributes in `new` order.
pub fn diff_extra_attributes(
    old: &IndexMap<String, String>,
    new: &IndexMap<String, String>,
) -> Vec<AttributeDelta> {
    let mut deltas = Vec::new();

    for (name, old_value) in old {
        match new.get(name) {
            None => deltas.push(AttributeDelta::removed(name.as_str(), old_value.as_str())),
            Some(new_value) if new_value != old_value => deltas.push(AttributeDelta::changed(
                name.as_str(),
                old_value.as_str(),
                new_value.as_str(),
            )),
            Some(_) => {}
        }
    }

    for (name, new_value) in new {
        if !old.contains_key(name) {
            deltas.push(AttributeDelta::added(name.as_str(), new_value.as_str()));
        }
    }

    deltas
}
