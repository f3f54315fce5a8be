//! Gaussian cube file parsing.
//!
//! A cube file holds a molecular geometry and a scalar field (typically the
//! electron density or an orbital) sampled on a regular voxel lattice. This
//! crate reads the text format into a [`CubeFile`]: the two comment lines,
//! the [`Atom`] list and a [`VolumetricGrid`].
//!
//! # Units
//!
//! Lengths are in Bohr unless a voxel count in the header is negative, in
//! which case they are in Angstrom. [`LengthUnit::to_angstrom`] converts.
//!
//! # Example
//!
//! ```
//! use cube_file::{CubeFile, LengthUnit};
//!
//! let text = "\
//! density
//! generated by hand
//!     1   0.000000   0.000000   0.000000
//!     2   0.500000   0.000000   0.000000
//!     2   0.000000   0.500000   0.000000
//!     2   0.000000   0.000000   0.500000
//!     1   1.000000   0.000000   0.000000   0.000000
//!  1.0E-01 2.0E-01 3.0E-01 4.0E-01 5.0E-01 6.0E-01
//!  7.0E-01 8.0E-01
//! ";
//!
//! let cube: CubeFile = text.parse().unwrap();
//! assert_eq!(cube.unit(), LengthUnit::Bohr);
//! assert_eq!(cube.atoms()[0].symbol(), "H");
//! assert_eq!(cube.grid().dimensions(), (2, 2, 2));
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod atom;
mod element;
mod error;
mod grid;
mod parse;

pub use atom::Atom;
pub use element::Element;
pub use error::{CubeError, CubeResult};
pub use grid::{BOHR_TO_ANGSTROM, LengthUnit, VolumetricGrid};
pub use parse::CubeFile;
