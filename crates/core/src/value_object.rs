//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects carry no identity and are compared by their attributes.
/// In this workspace the typical example is the `(name, measurement_unit)`
/// key an ingredient line is grouped under: two keys with the same strings
/// are the same key, wherever they came from.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Measure {
///     name: String,
///     unit: String,
/// }
///
/// impl ValueObject for Measure {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
