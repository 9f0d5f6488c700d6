//! Per-entity transport option names.
//!
//! Fields contributed by the framework's shared MQTT fragments only apply
//! when the `mqtt` block is configured. The set of such field names is read
//! from the registry's own fragments rather than hardcoded.

use std::collections::BTreeSet;

use eve_registry::{ComponentRegistry, MQTT_COMMAND_COMPONENT_FRAGMENT, MQTT_COMPONENT_FRAGMENT};

/// Group tag stamped on transport fields.
pub const TRANSPORT_GROUP: &str = "mqtt";

/// Normalized key names of the transport fragments. Missing fragments, or
/// fragments that are not object schemas, contribute nothing.
pub fn transport_field_names(registry: &dyn ComponentRegistry) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for fragment in [MQTT_COMPONENT_FRAGMENT, MQTT_COMMAND_COMPONENT_FRAGMENT] {
        let Some(node) = registry.shared_fragment(fragment) else {
            continue;
        };
        for entry in node.entries().unwrap_or_default() {
            let key = entry.key.normalize();
            if !key.name.is_empty() {
                names.insert(key.name);
            }
        }
    }
    tracing::debug!(count = names.len(), "derived transport field names");
    names
}
