//! Periodic table lookup for atomic numbers 0 to 96.

/// A chemical element as referenced by a cube file atom line.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Element {
    /// Atomic number; 0 is a dummy atom.
    pub atomic_number: u8,
    /// Chemical symbol, `"udf"` for the dummy atom.
    pub symbol: &'static str,
    /// Single-bond covalent radius in Angstrom (Cordero et al. 2008).
    ///
    /// Zero for the dummy atom.
    pub covalent_radius: f64,
}

impl Element {
    /// Highest atomic number in the table (curium).
    pub const MAX_ATOMIC_NUMBER: u8 = 96;

    /// Look up an element by atomic number.
    ///
    /// Returns `None` outside `0..=96`.
    ///
    /// ```
    /// use cube_file::Element;
    ///
    /// assert_eq!(Element::from_atomic_number(8).unwrap().symbol, "O");
    /// assert_eq!(Element::from_atomic_number(0).unwrap().symbol, "udf");
    /// assert!(Element::from_atomic_number(97).is_none());
    /// ```
    #[must_use]
    pub fn from_atomic_number(z: i64) -> Option<&'static Self> {
        usize::try_from(z).ok().and_then(|i| ELEMENTS.get(i))
    }

    /// The dummy atom (`"udf"`) never takes part in bonding.
    #[must_use]
    pub const fn is_dummy(&self) -> bool {
        self.atomic_number == 0
    }
}

const fn el(atomic_number: u8, symbol: &'static str, covalent_radius: f64) -> Element {
    Element {
        atomic_number,
        symbol,
        covalent_radius,
    }
}

// Mn, Fe and Co use the low-spin radii; C uses sp3.
static ELEMENTS: [Element; 97] = [
    el(0, "udf", 0.0),
    el(1, "H", 0.31),
    el(2, "He", 0.28),
    el(3, "Li", 1.28),
    el(4, "Be", 0.96),
    el(5, "B", 0.84),
    el(6, "C", 0.76),
    el(7, "N", 0.71),
    el(8, "O", 0.66),
    el(9, "F", 0.57),
    el(10, "Ne", 0.58),
    el(11, "Na", 1.66),
    el(12, "Mg", 1.41),
    el(13, "Al", 1.21),
    el(14, "Si", 1.11),
    el(15, "P", 1.07),
    el(16, "S", 1.05),
    el(17, "Cl", 1.02),
    el(18, "Ar", 1.06),
    el(19, "K", 2.03),
    el(20, "Ca", 1.76),
    el(21, "Sc", 1.70),
    el(22, "Ti", 1.60),
    el(23, "V", 1.53),
    el(24, "Cr", 1.39),
    el(25, "Mn", 1.39),
    el(26, "Fe", 1.32),
    el(27, "Co", 1.26),
    el(28, "Ni", 1.24),
    el(29, "Cu", 1.32),
    el(30, "Zn", 1.22),
    el(31, "Ga", 1.22),
    el(32, "Ge", 1.20),
    el(33, "As", 1.19),
    el(34, "Se", 1.20),
    el(35, "Br", 1.20),
    el(36, "Kr", 1.16),
    el(37, "Rb", 2.20),
    el(38, "Sr", 1.95),
    el(39, "Y", 1.90),
    el(40, "Zr", 1.75),
    el(41, "Nb", 1.64),
    el(42, "Mo", 1.54),
    el(43, "Tc", 1.47),
    el(44, "Ru", 1.46),
    el(45, "Rh", 1.42),
    el(46, "Pd", 1.39),
    el(47, "Ag", 1.45),
    el(48, "Cd", 1.44),
    el(49, "In", 1.42),
    el(50, "Sn", 1.39),
    el(51, "Sb", 1.39),
    el(52, "Te", 1.38),
    el(53, "I", 1.39),
    el(54, "Xe", 1.40),
    el(55, "Cs", 2.44),
    el(56, "Ba", 2.15),
    el(57, "La", 2.07),
    el(58, "Ce", 2.04),
    el(59, "Pr", 2.03),
    el(60, "Nd", 2.01),
    el(61, "Pm", 1.99),
    el(62, "Sm", 1.98),
    el(63, "Eu", 1.98),
    el(64, "Gd", 1.96),
    el(65, "Tb", 1.94),
    el(66, "Dy", 1.92),
    el(67, "Ho", 1.92),
    el(68, "Er", 1.89),
    el(69, "Tm", 1.90),
    el(70, "Yb", 1.87),
    el(71, "Lu", 1.87),
    el(72, "Hf", 1.75),
    el(73, "Ta", 1.70),
    el(74, "W", 1.62),
    el(75, "Re", 1.51),
    el(76, "Os", 1.44),
    el(77, "Ir", 1.41),
    el(78, "Pt", 1.36),
    el(79, "Au", 1.36),
    el(80, "Hg", 1.32),
    el(81, "Tl", 1.45),
    el(82, "Pb", 1.46),
    el(83, "Bi", 1.48),
    el(84, "Po", 1.40),
    el(85, "At", 1.50),
    el(86, "Rn", 1.50),
    el(87, "Fr", 2.60),
    el(88, "Ra", 2.21),
    el(89, "Ac", 2.15),
    el(90, "Th", 2.06),
    el(91, "Pa", 2.00),
    el(92, "U", 1.96),
    el(93, "Np", 1.90),
    el(94, "Pu", 1.87),
    el(95, "Am", 1.80),
    el(96, "Cm", 1.69),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_atomic_number() {
        for (i, element) in ELEMENTS.iter().enumerate() {
            assert_eq!(usize::from(element.atomic_number), i);
        }
        assert_eq!(ELEMENTS.len(), usize::from(Element::MAX_ATOMIC_NUMBER) + 1);
    }

    #[test]
    fn symbols_are_unique() {
        for (i, a) in ELEMENTS.iter().enumerate() {
            for b in &ELEMENTS[i + 1..] {
                assert_ne!(a.symbol, b.symbol);
            }
        }
    }

    #[test]
    fn radii_are_positive_except_dummy() {
        assert!(ELEMENTS[0].is_dummy());
        assert!(ELEMENTS[0].covalent_radius.abs() < f64::EPSILON);
        assert!(ELEMENTS[1..].iter().all(|e| e.covalent_radius > 0.0));
    }

    #[test]
    fn lookups() {
        assert_eq!(Element::from_atomic_number(1).map(|e| e.symbol), Some("H"));
        assert_eq!(Element::from_atomic_number(96).map(|e| e.symbol), Some("Cm"));
        assert!(Element::from_atomic_number(-1).is_none());
        assert!(Element::from_atomic_number(97).is_none());
    }
}
