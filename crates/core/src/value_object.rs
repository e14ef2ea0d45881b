//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**. Two addresses with the same city, region
//! and street are the same address, whereas two jobs with identical details are
//! still two jobs.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by value. To "modify" one, build a
/// new one.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Address { city: String, region: String, street: String }
///
/// impl ValueObject for Address {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
