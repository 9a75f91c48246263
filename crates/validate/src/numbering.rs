//! Numbering conventions as configuration

// standard library
use std::path::Path;

// external crates
use itertools::Itertools;
use mcdeck_utils::f;
use serde::{Deserialize, Serialize};

// crate modules
use crate::error::{Error, Result};

/// A named block of numbers, e.g. `10000` to `19999` for a shield
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReservedRange {
    pub name: String,
    pub start: u32,
    /// Inclusive
    pub end: u32,
}

impl ReservedRange {
    pub fn contains(&self, number: u32) -> bool {
        (self.start..=self.end).contains(&number)
    }
}

/// Rule for the numbers of one kind of entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NumberingRule {
    /// Allowed digit counts, any count if empty
    pub digits: Vec<usize>,
    /// Named blocks of numbers
    pub reserved: Vec<ReservedRange>,
    /// Numbers outside every reserved range are violations
    pub require_reserved: bool,
}

impl NumberingRule {
    /// Reserved range a number falls in
    pub fn range_of(&self, number: u32) -> Option<&ReservedRange> {
        self.reserved.iter().find(|r| r.contains(number))
    }

    /// Description of how a number breaks the rule, if it does
    ///
    /// ```rust
    /// # use mcdeck_validate::{NumberingRule, ReservedRange};
    /// let rule = NumberingRule {
    ///     digits: vec![5],
    ///     reserved: vec![ReservedRange { name: "shield".into(), start: 10000, end: 19999 }],
    ///     require_reserved: true,
    /// };
    /// assert_eq!(rule.violation(12001), None);
    /// assert_eq!(rule.violation(101).unwrap(), "has 3 digits, expected 5");
    /// assert_eq!(rule.violation(20001).unwrap(), "is outside every reserved range (shield)");
    /// ```
    pub fn violation(&self, number: u32) -> Option<String> {
        let digits = number.to_string().len();
        if !self.digits.is_empty() && !self.digits.contains(&digits) {
            return Some(f!(
                "has {digits} digits, expected {}",
                self.digits.iter().join(" or ")
            ));
        }
        if self.require_reserved && !self.reserved.is_empty() && self.range_of(number).is_none() {
            return Some(f!(
                "is outside every reserved range ({})",
                self.reserved.iter().map(|r| r.name.as_str()).join(", ")
            ));
        }
        None
    }

    fn check(&self, kind: &str) -> Result<()> {
        if self.digits.iter().any(|d| *d == 0 || *d > 10) {
            return Err(Error::InvalidScheme(f!("{kind} digit counts must be 1 to 10")));
        }
        for range in &self.reserved {
            if range.start > range.end {
                return Err(Error::InvalidScheme(f!(
                    "{kind} range \"{}\" starts after it ends",
                    range.name
                )));
            }
        }
        for (a, b) in self.reserved.iter().tuple_combinations() {
            if a.start <= b.end && b.start <= a.end {
                return Err(Error::InvalidScheme(f!(
                    "{kind} ranges \"{}\" and \"{}\" overlap",
                    a.name,
                    b.name
                )));
            }
        }
        Ok(())
    }
}

/// A numbering convention for a whole model
///
/// Entities without a rule are not checked.
///
/// ```rust
/// # use mcdeck_validate::NumberingScheme;
/// let scheme = NumberingScheme::from_json_str(r#"{
///     "name": "XYZSS",
///     "cells": { "digits": [5] },
///     "materials": {
///         "reserved": [
///             { "name": "fuel", "start": 1, "end": 99 },
///             { "name": "structure", "start": 100, "end": 199 }
///         ],
///         "require_reserved": true
///     }
/// }"#).unwrap();
/// assert!(scheme.cells.unwrap().violation(1001).is_some());
/// assert!(scheme.surfaces.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NumberingScheme {
    pub name: Option<String>,
    pub cells: Option<NumberingRule>,
    pub surfaces: Option<NumberingRule>,
    pub materials: Option<NumberingRule>,
    pub universes: Option<NumberingRule>,
    pub transformations: Option<NumberingRule>,
}

impl NumberingScheme {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let scheme: Self = serde_json::from_str(text)?;
        scheme.checked()
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Every rule that is set, with the entity name it applies to
    pub fn rules(&self) -> Vec<(&'static str, &NumberingRule)> {
        [
            ("cell", &self.cells),
            ("surface", &self.surfaces),
            ("material", &self.materials),
            ("universe", &self.universes),
            ("transformation", &self.transformations),
        ]
        .into_iter()
        .filter_map(|(kind, rule)| rule.as_ref().map(|r| (kind, r)))
        .collect()
    }

    pub(crate) fn checked(self) -> Result<Self> {
        for (kind, rule) in self.rules() {
            rule.check(kind)?;
        }
        Ok(self)
    }
}
