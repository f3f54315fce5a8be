//! Bond sets do not depend on atom order.

use cube_bonds::{BondConfig, BondSet, infer_bonds};
use cube_file::{Atom, Element, LengthUnit};
use nalgebra::Point3;
use proptest::prelude::*;

fn atom_strategy() -> impl Strategy<Value = Atom> {
    (
        prop::sample::select(vec![1i64, 6, 7, 8, 16]),
        -3.0f64..3.0,
        -3.0f64..3.0,
        -3.0f64..3.0,
    )
        .prop_map(|(z, x, y, zc)| {
            let element = Element::from_atomic_number(z).unwrap();
            Atom::new(element, 0.0, Point3::new(x, y, zc))
        })
}

/// Map bonds through `order` back to the original indices.
fn remap(bonds: &BondSet, order: &[usize]) -> BondSet {
    let mut out = BondSet::new();
    for bond in bonds {
        out.insert(order[bond.first()], order[bond.second()]);
    }
    out
}

proptest! {
    #[test]
    fn reversed_atoms_give_same_bonds(atoms in prop::collection::vec(atom_strategy(), 3..24)) {
        let config = BondConfig::default();
        let forward = infer_bonds(&atoms, LengthUnit::Angstrom, &config);

        let order: Vec<usize> = (0..atoms.len()).rev().collect();
        let reversed: Vec<Atom> = order.iter().map(|&i| atoms[i]).collect();
        let backward = infer_bonds(&reversed, LengthUnit::Angstrom, &config);

        prop_assert_eq!(remap(&backward, &order), forward);
    }

    #[test]
    fn bonds_are_normalised_and_in_range(atoms in prop::collection::vec(atom_strategy(), 3..24)) {
        let bonds = infer_bonds(&atoms, LengthUnit::Bohr, &BondConfig::default());
        for bond in &bonds {
            prop_assert!(bond.first() < bond.second());
            prop_assert!(bond.second() < atoms.len());
        }
    }
}

#[test]
fn repeated_runs_are_identical() {
    let c = Element::from_atomic_number(6).unwrap();
    let atoms: Vec<Atom> = (0..40)
        .map(|i| Atom::new(c, 6.0, Point3::new(1.4 * f64::from(i), 0.0, 0.0)))
        .collect();

    let first = infer_bonds(&atoms, LengthUnit::Angstrom, &BondConfig::default());
    assert_eq!(first.len(), 39);
    for _ in 0..5 {
        assert_eq!(infer_bonds(&atoms, LengthUnit::Angstrom, &BondConfig::default()), first);
    }
}
