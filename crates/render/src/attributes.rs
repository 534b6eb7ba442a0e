//! Raw property map to canonical attributes.

use crate::output::Attributes;
use mdvtree_core::{Properties, PropertyNames, Space};

/// Maps raw properties to canonical attribute names, carrying values unchanged.
///
/// `skip` names a raw key consumed during classification. Keys the lookup
/// does not know keep their own name.
pub fn map_attributes(
    properties: &Properties,
    skip: Option<&str>,
    space: Space,
    names: &dyn PropertyNames,
) -> Attributes {
    properties
        .iter()
        .filter(|(key, _)| Some(key.as_str()) != skip)
        .fold(Attributes::new(), |mut acc, (key, value)| {
            let name = names.attribute_name(space, key);
            acc.insert(name.into_owned(), value.clone());
            acc
        })
}
