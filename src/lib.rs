//! `mcdeck` is a toolkit for building, editing, and validating MCNP input
//! decks
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use mcdeck_input as input;

#[doc(inline)]
pub use mcdeck_utils as utils;

#[cfg(feature = "refdata")]
#[cfg_attr(docsrs, doc(cfg(feature = "refdata")))]
#[doc(inline)]
pub use mcdeck_refdata as refdata;

#[cfg(feature = "validate")]
#[cfg_attr(docsrs, doc(cfg(feature = "validate")))]
#[doc(inline)]
pub use mcdeck_validate as validate;
