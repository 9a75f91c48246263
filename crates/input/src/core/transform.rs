//! Coordinate transformations, `TRn` cards and inline `TRCL` values

use mcdeck_utils::{f, ValueExt};
use nalgebra::{Matrix3, Vector3};

use super::{CardKind, DataCard};
use crate::error::{Error, Result};
use crate::parsers::parse_real;

/// A rigid body transformation
///
/// Points of the auxiliary (surface or cell) frame map to the main frame as
/// `p_main = R p_aux + O`, where the columns of `R` are the auxiliary axes
/// expressed in main coordinates. The nine rotation entries on the card are
/// given in that column order (`xx' yx' zx' xy' ...`).
///
/// ```rust
/// # use mcdeck_input::Transformation;
/// let shift = Transformation::translation(1, [1.0, 2.0, 3.0]);
/// assert_eq!(shift.apply([0.0, 0.0, 0.0]), [1.0, 2.0, 3.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Transformation {
    pub number: u32,
    /// Rotation entries are angles in degrees rather than cosines
    pub degrees: bool,
    pub displacement: [f64; 3],
    pub rotation: Option<[f64; 9]>,
    /// `M = 1`, the displacement is the auxiliary origin in main coordinates
    pub origin_in_main: bool,
}

impl Transformation {
    /// Pure translation
    pub fn translation(number: u32, displacement: [f64; 3]) -> Self {
        Self {
            number,
            degrees: false,
            displacement,
            rotation: None,
            origin_in_main: true,
        }
    }

    /// Build from the values of a card or inline `TRCL`
    ///
    /// Accepts 3 values (translation only), 9 or 10 (two rotation axes, the
    /// third completed by a cross product), or 12 or 13 (full rotation). A
    /// trailing thirteenth value is the `M` flag.
    pub fn from_values(number: u32, degrees: bool, values: &[f64]) -> Result<Self> {
        let text = || {
            values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };

        if values.len() < 3 {
            return Err(Error::parse(text(), "a transformation needs at least 3 values"));
        }
        let displacement = [values[0], values[1], values[2]];

        let (rotation, m) = match &values[3..] {
            [] => (None, None),
            r @ [_, _, _, _, _, _] => (Some(Self::complete(r, degrees)), None),
            [r @ .., m] if r.len() == 6 => (Some(Self::complete(r, degrees)), Some(*m)),
            r @ [_, _, _, _, _, _, _, _, _] => (Some(Self::to_array(r)), None),
            [r @ .., m] if r.len() == 9 => (Some(Self::to_array(r)), Some(*m)),
            _ => {
                return Err(Error::parse(
                    text(),
                    "expected 3, 9, 10, 12, or 13 transformation values",
                ))
            }
        };

        let origin_in_main = match m {
            None => true,
            Some(m) if m == 1.0 => true,
            Some(m) if m == -1.0 => false,
            Some(_) => return Err(Error::parse(text(), "the M flag must be 1 or -1")),
        };

        Ok(Self {
            number,
            degrees,
            displacement,
            rotation,
            origin_in_main,
        })
    }

    /// Read a `TRn` or `*TRn` card
    pub fn from_card(card: &DataCard) -> Result<Self> {
        let CardKind::Transform { number, degrees } = card.kind() else {
            return Err(Error::parse(&card.name, "not a transformation card"));
        };
        let values = card
            .entries
            .iter()
            .map(|e| parse_real(e).ok_or_else(|| Error::parse(card.to_string(), "non-numeric entry")))
            .collect::<Result<Vec<f64>>>()?;
        Self::from_values(number, degrees, &values)
    }

    fn to_array(values: &[f64]) -> [f64; 9] {
        let mut array = [0.0; 9];
        array.copy_from_slice(&values[..9]);
        array
    }

    /// Complete two given axes with their cross product
    fn complete(values: &[f64], degrees: bool) -> [f64; 9] {
        let cosine = |v: f64| match degrees {
            true => v.to_radians().cos(),
            false => v,
        };
        let x = Vector3::new(cosine(values[0]), cosine(values[1]), cosine(values[2]));
        let y = Vector3::new(cosine(values[3]), cosine(values[4]), cosine(values[5]));
        let z = x.cross(&y);
        let mut array = [0.0; 9];
        array[..3].copy_from_slice(x.as_slice());
        array[3..6].copy_from_slice(y.as_slice());
        array[6..].copy_from_slice(z.as_slice());
        // stored in the same convention as the card
        match degrees {
            true => array.map(|c| c.clamp(-1.0, 1.0).acos().to_degrees()),
            false => array,
        }
    }

    /// Rotation matrix with auxiliary axes as columns
    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        match self.rotation {
            None => Matrix3::identity(),
            Some(values) => {
                let cosines = match self.degrees {
                    true => values.map(|a| a.to_radians().cos()),
                    false => values,
                };
                Matrix3::from_column_slice(&cosines)
            }
        }
    }

    /// Auxiliary origin in main coordinates
    pub fn origin(&self) -> Vector3<f64> {
        let d = Vector3::from(self.displacement);
        match self.origin_in_main {
            true => d,
            false => -(self.rotation_matrix() * d),
        }
    }

    /// Map a point from the auxiliary frame to the main frame
    pub fn apply(&self, point: [f64; 3]) -> [f64; 3] {
        let p = self.rotation_matrix() * Vector3::from(point) + self.origin();
        [p.x, p.y, p.z]
    }

    /// This transformation followed by `outer`
    ///
    /// The result is in canonical form: cosines, origin in main coordinates,
    /// and the number of `outer`.
    pub fn then(&self, outer: &Transformation) -> Transformation {
        let r = outer.rotation_matrix() * self.rotation_matrix();
        let o = outer.rotation_matrix() * self.origin() + outer.origin();
        let rotation = match self.rotation.is_some() || outer.rotation.is_some() {
            true => Some(Self::to_array(r.as_slice())),
            false => None,
        };
        Transformation {
            number: outer.number,
            degrees: false,
            displacement: [o.x, o.y, o.z],
            rotation,
            origin_in_main: true,
        }
    }

    /// Values in canonical form, suitable for an inline `TRCL`
    pub fn to_values(&self) -> Vec<f64> {
        let o = self.origin();
        let mut values = vec![o.x, o.y, o.z];
        if self.rotation.is_some() {
            values.extend_from_slice(self.rotation_matrix().as_slice());
        }
        values
    }

    /// Card for this transformation, `*TRn` if rotations are in degrees
    pub fn to_card(&self) -> DataCard {
        let prefix = if self.degrees { "*tr" } else { "tr" };
        let mut entries: Vec<String> = self.displacement.iter().map(|v| v.canonical()).collect();
        if let Some(rotation) = self.rotation {
            entries.extend(rotation.iter().map(|v| v.canonical()));
            if !self.origin_in_main {
                entries.push("-1".to_string());
            }
        }
        DataCard::new(&f!("{prefix}{}", self.number), entries)
    }
}
