#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
use alloc::string::String;
#[cfg(feature = "std")]
use std::collections::HashMap;

/// Reuse identifier → registration slot.
#[cfg(feature = "std")]
pub(crate) type IdentifierMap = HashMap<String, usize>;
#[cfg(not(feature = "std"))]
pub(crate) type IdentifierMap = BTreeMap<String, usize>;
