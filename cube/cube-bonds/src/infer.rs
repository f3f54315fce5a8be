//! Covalent-radius bond inference.

use cube_file::{Atom, LengthUnit};
use nalgebra::Point3;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::bond::{Bond, BondSet};

/// Parameters for [`infer_bonds`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BondConfig {
    /// Multiplier on the sum of covalent radii.
    ///
    /// Default: `1.3`
    pub tolerance: f64,

    /// Pairs at or below this distance (Angstrom) are never bonded.
    ///
    /// Default: `0.4`
    pub min_distance: f64,

    /// Molecules with fewer atoms are left without bonds.
    ///
    /// Default: `3`
    pub min_atoms: usize,
}

impl Default for BondConfig {
    fn default() -> Self {
        Self {
            tolerance: 1.3,
            min_distance: 0.4,
            min_atoms: 3,
        }
    }
}

impl BondConfig {
    /// Create default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the radius tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the minimum bond length in Angstrom.
    #[must_use]
    pub fn with_min_distance(mut self, min_distance: f64) -> Self {
        self.min_distance = min_distance;
        self
    }

    /// Set the atom count below which inference is skipped.
    #[must_use]
    pub fn with_min_atoms(mut self, min_atoms: usize) -> Self {
        self.min_atoms = min_atoms;
        self
    }

    /// Whether two atoms at distance `d` (Angstrom) are bonded.
    ///
    /// Dummy atoms never bond.
    #[must_use]
    pub fn is_bonded(&self, a: &Atom, b: &Atom, d: f64) -> bool {
        if a.element.is_dummy() || b.element.is_dummy() {
            return false;
        }
        let cutoff = self.tolerance * (a.element.covalent_radius + b.element.covalent_radius);
        d > self.min_distance && d <= cutoff
    }
}

/// Infer bonds from atom positions.
///
/// Positions are read in `unit` and compared in Angstrom. A pair is bonded
/// when its distance lies in `(min_distance, tolerance * (r_i + r_j)]`
/// with the elements' covalent radii.
///
/// The result does not depend on atom order beyond the indices it names.
///
/// # Example
///
/// ```
/// use cube_bonds::{BondConfig, infer_bonds};
/// use cube_file::{Atom, Element, LengthUnit};
/// use nalgebra::Point3;
///
/// let c = Element::from_atomic_number(6).unwrap();
/// let h = Element::from_atomic_number(1).unwrap();
/// let atoms = [
///     Atom::new(c, 6.0, Point3::new(0.0, 0.0, 0.0)),
///     Atom::new(h, 1.0, Point3::new(1.09, 0.0, 0.0)),
///     Atom::new(h, 1.0, Point3::new(-0.36, 1.03, 0.0)),
/// ];
///
/// let bonds = infer_bonds(&atoms, LengthUnit::Angstrom, &BondConfig::default());
/// assert_eq!(bonds.len(), 2);
/// assert!(bonds.contains(0, 1));
/// assert!(!bonds.contains(1, 2));
/// ```
#[must_use]
pub fn infer_bonds(atoms: &[Atom], unit: LengthUnit, config: &BondConfig) -> BondSet {
    if atoms.len() < config.min_atoms {
        debug!(
            atoms = atoms.len(),
            min_atoms = config.min_atoms,
            "Too few atoms, skipping bond inference"
        );
        return BondSet::new();
    }

    let scale = unit.to_angstrom();
    let positions: Vec<Point3<f64>> = atoms.iter().map(|a| a.position * scale).collect();
    let n = atoms.len();

    let bonds: BondSet = (0..n)
        .into_par_iter()
        .flat_map_iter(|i| {
            let positions = &positions;
            (i + 1..n).filter_map(move |j| {
                let d = (positions[j] - positions[i]).norm();
                if config.is_bonded(&atoms[i], &atoms[j], d) {
                    Bond::new(i, j)
                } else {
                    None
                }
            })
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect();

    info!(atoms = n, bonds = bonds.len(), %unit, "Inferred bonds");
    bonds
}

#[cfg(test)]
mod tests {
    use super::*;
    use cube_file::Element;

    fn atom(z: i64, x: f64, y: f64, zc: f64) -> Atom {
        let element = Element::from_atomic_number(z).unwrap();
        Atom::new(element, f64::from(element.atomic_number), Point3::new(x, y, zc))
    }

    fn water() -> Vec<Atom> {
        vec![
            atom(8, 0.739_512, 0.0, 0.0),
            atom(1, -0.369_757, 0.0, 1.472_097),
            atom(1, -0.369_757, 0.0, -1.472_097),
        ]
    }

    #[test]
    fn water_in_bohr_has_two_oh_bonds() {
        let bonds = infer_bonds(&water(), LengthUnit::Bohr, &BondConfig::default());

        let pairs: Vec<_> = bonds.iter().map(Bond::pair).collect();
        assert_eq!(pairs, [(0, 1), (0, 2)]);
    }

    #[test]
    fn unit_matters() {
        // the same numbers read as Angstrom put O-H at 1.84, beyond 1.3 * 0.97
        let bonds = infer_bonds(&water(), LengthUnit::Angstrom, &BondConfig::default());
        assert!(bonds.is_empty());
    }

    #[test]
    fn too_few_atoms() {
        let pair = [atom(1, 0.0, 0.0, 0.0), atom(1, 0.74, 0.0, 0.0)];
        assert!(infer_bonds(&pair, LengthUnit::Angstrom, &BondConfig::default()).is_empty());

        let config = BondConfig::default().with_min_atoms(2);
        assert_eq!(infer_bonds(&pair, LengthUnit::Angstrom, &config).len(), 1);
    }

    #[test]
    fn dummy_atoms_never_bond() {
        let atoms = [
            atom(0, 0.0, 0.0, 0.0),
            atom(6, 1.0, 0.0, 0.0),
            atom(0, 2.0, 0.0, 0.0),
        ];
        let config = BondConfig::default().with_tolerance(100.0);
        assert!(infer_bonds(&atoms, LengthUnit::Angstrom, &config).is_empty());
    }

    #[test]
    fn overlapping_atoms_are_not_bonded() {
        let atoms = [
            atom(6, 0.0, 0.0, 0.0),
            atom(6, 0.3, 0.0, 0.0),
            atom(6, 1.8, 0.0, 0.0),
        ];
        let bonds = infer_bonds(&atoms, LengthUnit::Angstrom, &BondConfig::default());

        assert!(!bonds.contains(0, 1));
        assert!(bonds.contains(1, 2));
        assert!(bonds.contains(0, 2));
    }

    #[test]
    fn cutoff_is_inclusive() {
        let config = BondConfig::default().with_tolerance(1.0);
        let c = atom(6, 0.0, 0.0, 0.0);
        let h = atom(1, 1.07, 0.0, 0.0);
        let cutoff = c.element.covalent_radius + h.element.covalent_radius;
        assert!(config.is_bonded(&c, &h, cutoff));
        assert!(!config.is_bonded(&c, &h, cutoff + 1e-9));
    }
}
