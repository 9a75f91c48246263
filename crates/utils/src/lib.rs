//! Common utility for extended `std` types
//!
//! These are left public for convenience.
//!
//! For example, writing numbers in the canonical card form or collapsing the
//! whitespace of a joined card are useful everywhere.

// Alias for the format! macro
pub use std::format as f;

// Modules
mod string_ext;
mod value_ext;

// Flatten
pub use string_ext::StringExt;
pub use value_ext::ValueExt;
