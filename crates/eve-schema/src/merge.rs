//! # Conjunction Merge
//!
//! A conjunction applies several validators to one value. Its members
//! usually refine each other orthogonally, e.g. "ensure a list" plus "each
//! item is a string", or "an int" plus "between 0 and 100". The merged node
//! takes its structure from one base member and layers the scalar
//! constraints of the others on top.

use crate::ui::{fill, UiSchema, UiType};

/// Merge the translated members of a conjunction.
///
/// The base is the first `array` member, else the first member that is not
/// `raw_yaml`, else the first member. Every other member is folded into
/// the base with [`merge_into`], in order.
pub fn merge_conjunction(mut parts: Vec<UiSchema>) -> UiSchema {
    if parts.is_empty() {
        return UiSchema::raw_yaml("Empty conjunction");
    }

    let base = parts
        .iter()
        .position(|p| p.kind() == UiType::Array)
        .or_else(|| parts.iter().position(|p| !p.is_raw_yaml()))
        .unwrap_or(0);

    let mut merged = parts.remove(base);
    for part in &parts {
        merge_into(&mut merged, part);
    }
    merged
}

/// Fold `other` into `acc`.
///
/// `ui` metadata is unioned (see [`crate::ui::UiMeta::union`]). The scalar
/// constraint fields are copied only where `acc` has none. The type and
/// structure of `other` are dropped.
pub fn merge_into(acc: &mut UiSchema, other: &UiSchema) {
    acc.ui.union(&other.ui);

    fill(&mut acc.minimum, &other.minimum);
    fill(&mut acc.maximum, &other.maximum);
    fill(&mut acc.min_length, &other.min_length);
    fill(&mut acc.max_length, &other.max_length);
    fill(&mut acc.pattern, &other.pattern);
    fill(&mut acc.default, &other.default);
    fill(&mut acc.options, &other.options);
}
