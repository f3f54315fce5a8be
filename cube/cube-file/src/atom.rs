//! Atoms listed in the cube file header.

use nalgebra::Point3;

use crate::element::Element;

/// One atom of the molecular geometry.
///
/// The position is in the grid's length unit.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Atom {
    /// Element looked up from the atomic number.
    pub element: &'static Element,
    /// Nuclear charge as written in the file.
    pub charge: f64,
    /// Nuclear position.
    pub position: Point3<f64>,
}

impl Atom {
    /// Create an atom.
    #[must_use]
    pub const fn new(element: &'static Element, charge: f64, position: Point3<f64>) -> Self {
        Self {
            element,
            charge,
            position,
        }
    }

    /// Chemical symbol, `"udf"` for dummy atoms.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        self.element.symbol
    }

    /// Atomic number.
    #[must_use]
    pub const fn atomic_number(&self) -> u8 {
        self.element.atomic_number
    }
}
