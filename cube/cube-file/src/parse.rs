//! Cube file reader.
//!
//! Layout of a cube file:
//!
//! ```text
//! comment line 1
//! comment line 2
//! natoms  ox oy oz          (natoms < 0: orbital cube)
//! nx      xx xy xz          (any count < 0: lengths in Angstrom)
//! ny      yx yy yz
//! nz      zx zy zz
//! Z  charge  x y z          (natoms times)
//! norb  id1 id2 ...         (orbital cubes only)
//! v v v v v v               (nx * ny * nz * norb values, x slowest)
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use std::str::FromStr;

use nalgebra::{Matrix3, Point3, Vector3};
use tracing::{debug, info};

use crate::atom::Atom;
use crate::element::Element;
use crate::error::{CubeError, CubeResult};
use crate::grid::{LengthUnit, VolumetricGrid};

/// A parsed Gaussian cube file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CubeFile {
    comments: [String; 2],
    grid: VolumetricGrid,
    atoms: Vec<Atom>,
    orbitals: Vec<i64>,
}

impl CubeFile {
    /// Read and parse a cube file from disk.
    ///
    /// The file handle is closed before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::Io`] if the file cannot be opened or read, and
    /// the parse errors of [`CubeFile::from_reader`].
    pub fn open<P: AsRef<Path>>(path: P) -> CubeResult<Self> {
        let path = path.as_ref();
        let cube = Self::from_reader(BufReader::new(File::open(path)?))?;

        let (nx, ny, nz) = cube.grid.dimensions();
        info!(
            path = %path.display(),
            atoms = cube.atoms.len(),
            nx,
            ny,
            nz,
            unit = %cube.grid.unit(),
            "read cube file"
        );
        Ok(cube)
    }

    /// Parse a cube file from a buffered reader.
    ///
    /// # Errors
    ///
    /// - [`CubeError::MalformedHeader`] when a header, atom or orbital line is
    ///   missing, short or not numeric, or a voxel count is zero
    /// - [`CubeError::UnknownElement`] for atomic numbers outside 0-96
    /// - [`CubeError::MalformedData`] when a voxel value does not parse or
    ///   the number of values differs from `nx * ny * nz`
    /// - [`CubeError::Io`] when reading fails
    pub fn from_reader<R: BufRead>(reader: R) -> CubeResult<Self> {
        let mut lines = Lines::new(reader);

        let comments = [
            lines.require("first comment line")?,
            lines.require("second comment line")?,
        ];

        let (atom_count, origin) = lines.numeric::<3>("atom count and origin")?;
        let mut counts = [(0i64, 0usize); 3];
        let mut basis = Matrix3::zeros();
        for (axis, count) in counts.iter_mut().enumerate() {
            let (n, vector) = lines.numeric::<3>("voxel count and axis vector")?;
            *count = (n, lines.number);
            basis.set_row(axis, &Vector3::from(vector).transpose());
        }

        let unit = if counts.iter().any(|&(n, _)| n < 0) {
            LengthUnit::Angstrom
        } else {
            LengthUnit::Bohr
        };
        let [nx, ny, nz] = counts.map(|(n, line)| voxel_count(n, line));
        let dimensions = (nx?, ny?, nz?);
        let voxels = dimensions
            .0
            .checked_mul(dimensions.1)
            .and_then(|n| n.checked_mul(dimensions.2))
            .ok_or_else(|| CubeError::header(counts[2].1, "voxel count too large"))?;

        let has_orbitals = atom_count < 0;
        let atom_count = usize::try_from(atom_count.unsigned_abs())
            .map_err(|_| CubeError::header(3, format!("atom count {atom_count} is too large")))?;

        debug!(
            atoms = atom_count,
            nx = dimensions.0,
            ny = dimensions.1,
            nz = dimensions.2,
            %unit,
            has_orbitals,
            "parsed cube header"
        );

        let mut atoms = Vec::with_capacity(atom_count);
        for _ in 0..atom_count {
            let (z, [charge, x, y, zc]) = lines.numeric::<4>("atom line")?;
            let element = Element::from_atomic_number(z).ok_or(CubeError::UnknownElement {
                line: lines.number,
                atomic_number: z,
            })?;
            atoms.push(Atom::new(element, charge, Point3::new(x, y, zc)));
        }

        let orbitals = if has_orbitals {
            lines.orbital_ids()?
        } else {
            Vec::new()
        };
        let stride = orbitals.len().max(1);
        let expected = voxels
            .checked_mul(stride)
            .ok_or_else(|| CubeError::header(lines.number, "voxel count too large"))?;

        let values = lines.voxel_values(expected, stride)?;

        let grid = VolumetricGrid {
            origin: Point3::from(origin),
            basis,
            dimensions,
            unit,
            values,
        };

        Ok(Self {
            comments,
            grid,
            atoms,
            orbitals,
        })
    }

    /// The two free-form comment lines.
    #[must_use]
    pub fn comments(&self) -> &[String; 2] {
        &self.comments
    }

    /// The volumetric data.
    #[must_use]
    pub fn grid(&self) -> &VolumetricGrid {
        &self.grid
    }

    /// Atoms in file order.
    #[must_use]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Orbital ids listed by an orbital cube; empty for density cubes.
    ///
    /// Only the first orbital's values are kept in [`CubeFile::grid`].
    #[must_use]
    pub fn orbitals(&self) -> &[i64] {
        &self.orbitals
    }

    /// Length unit of the grid and atom positions.
    #[must_use]
    pub fn unit(&self) -> LengthUnit {
        self.grid.unit()
    }

    /// Split into grid and atoms.
    #[must_use]
    pub fn into_parts(self) -> (VolumetricGrid, Vec<Atom>) {
        (self.grid, self.atoms)
    }
}

impl FromStr for CubeFile {
    type Err = CubeError;

    fn from_str(s: &str) -> CubeResult<Self> {
        Self::from_reader(s.as_bytes())
    }
}

/// Absolute voxel count; zero is rejected.
fn voxel_count(raw: i64, line: usize) -> CubeResult<usize> {
    if raw == 0 {
        return Err(CubeError::header(line, "voxel count is zero"));
    }
    usize::try_from(raw.unsigned_abs())
        .map_err(|_| CubeError::header(line, format!("voxel count {raw} is too large")))
}

/// Parse one voxel token.
///
/// Values below 1e-99 lose their exponent marker in the fixed-width output
/// (`0.806033-100`); any token without `E` or `e` reads as zero.
fn voxel_value(token: &str) -> Option<f64> {
    if token.contains(['E', 'e']) {
        token.parse().ok()
    } else {
        Some(0.0)
    }
}

/// Upper bound on the payload buffer reserved before any value is read.
const MAX_PREALLOCATED_VALUES: usize = 1 << 20;

/// Line reader that remembers the 1-based number of the last line read.
struct Lines<R> {
    inner: std::io::Lines<R>,
    number: usize,
}

impl<R: BufRead> Lines<R> {
    fn new(reader: R) -> Self {
        Self {
            inner: reader.lines(),
            number: 0,
        }
    }

    fn next_raw(&mut self) -> std::io::Result<Option<String>> {
        let line = self.inner.next().transpose()?;
        if line.is_some() {
            self.number += 1;
        }
        Ok(line)
    }

    fn next_line(&mut self) -> CubeResult<Option<String>> {
        let line = self.number + 1;
        self.next_raw().map_err(|err| match err.kind() {
            ErrorKind::InvalidData => CubeError::header(line, "line is not valid UTF-8"),
            _ => err.into(),
        })
    }

    fn next_data_line(&mut self) -> CubeResult<Option<String>> {
        let line = self.number + 1;
        self.next_raw().map_err(|err| match err.kind() {
            ErrorKind::InvalidData => CubeError::MalformedData {
                line,
                index: None,
                reason: "line is not valid UTF-8".to_string(),
            },
            _ => err.into(),
        })
    }

    fn require(&mut self, what: &str) -> CubeResult<String> {
        self.next_line()?.ok_or_else(|| {
            CubeError::header(
                self.number + 1,
                format!("unexpected end of file, expected {what}"),
            )
        })
    }

    /// A leading integer followed by `N` floats; trailing tokens are ignored.
    fn numeric<const N: usize>(&mut self, what: &str) -> CubeResult<(i64, [f64; N])> {
        let text = self.require(what)?;
        let line = self.number;
        let mut tokens = text.split_whitespace();

        let first = tokens
            .next()
            .ok_or_else(|| CubeError::header(line, format!("empty line, expected {what}")))?;
        let leading: i64 = first.parse().map_err(|_| {
            CubeError::header(line, format!("expected an integer, found '{first}'"))
        })?;

        let mut floats = [0.0; N];
        for (k, slot) in floats.iter_mut().enumerate() {
            let token = tokens.next().ok_or_else(|| {
                CubeError::header(
                    line,
                    format!("expected {N} numbers after the integer, found {k}"),
                )
            })?;
            *slot = token
                .parse()
                .map_err(|_| CubeError::header(line, format!("'{token}' is not a number")))?;
        }

        Ok((leading, floats))
    }

    /// `norb id1 id2 ...`, possibly wrapped over several lines.
    fn orbital_ids(&mut self) -> CubeResult<Vec<i64>> {
        let text = self.require("orbital line")?;
        let line = self.number;
        let mut tokens: Vec<String> = text.split_whitespace().map(str::to_string).collect();

        let count = tokens
            .first()
            .and_then(|t| t.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .ok_or_else(|| CubeError::header(line, "expected a positive orbital count"))?;
        tokens.remove(0);

        while tokens.len() < count {
            let more = self.require("orbital ids")?;
            tokens.extend(more.split_whitespace().map(str::to_string));
        }

        tokens
            .iter()
            .take(count)
            .map(|t| {
                t.parse().map_err(|_| {
                    CubeError::header(self.number, format!("'{t}' is not an orbital id"))
                })
            })
            .collect()
    }

    /// Read `expected` payload values, keeping every `stride`-th one starting
    /// at the first.
    fn voxel_values(&mut self, expected: usize, stride: usize) -> CubeResult<Vec<f64>> {
        let mut values = Vec::with_capacity((expected / stride).min(MAX_PREALLOCATED_VALUES));
        let mut index = 0usize;

        while let Some(text) = self.next_data_line()? {
            for token in text.split_whitespace() {
                if index == expected {
                    return Err(CubeError::MalformedData {
                        line: self.number,
                        index: Some(index),
                        reason: format!("more than {expected} values"),
                    });
                }
                let value = voxel_value(token).ok_or_else(|| CubeError::MalformedData {
                    line: self.number,
                    index: Some(index),
                    reason: format!("'{token}' is not a number"),
                })?;
                if index % stride == 0 {
                    values.push(value);
                }
                index += 1;
            }
        }

        if index != expected {
            return Err(CubeError::MalformedData {
                line: self.number,
                index: None,
                reason: format!("expected {expected} values, found {index}"),
            });
        }

        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cube(header: &str, atoms: &str, data: &str) -> String {
        format!("comment one\ncomment two\n{header}{atoms}{data}")
    }

    const BOHR_HEADER: &str = "1 0.0 0.0 0.0\n2 0.5 0.0 0.0\n2 0.0 0.5 0.0\n2 0.0 0.0 0.5\n";
    const ONE_ATOM: &str = "8 8.0 0.0 0.0 0.0\n";
    const EIGHT: &str = "1.0E-01 2.0E-01 3.0E-01 4.0E-01 5.0E-01 6.0E-01\n7.0E-01 8.0E-01\n";

    #[test]
    fn reads_small_density_cube() {
        let parsed: CubeFile = cube(BOHR_HEADER, ONE_ATOM, EIGHT).parse().unwrap();

        assert_eq!(parsed.comments()[0], "comment one");
        assert_eq!(parsed.unit(), LengthUnit::Bohr);
        assert_eq!(parsed.grid().dimensions(), (2, 2, 2));
        assert_eq!(parsed.atoms().len(), 1);
        assert_eq!(parsed.atoms()[0].symbol(), "O");
        assert_relative_eq!(parsed.atoms()[0].charge, 8.0);
        assert!(parsed.orbitals().is_empty());

        assert_relative_eq!(parsed.grid().value(0, 0, 1).unwrap(), 0.2);
        assert_relative_eq!(parsed.grid().value(1, 0, 0).unwrap(), 0.5);
        assert_relative_eq!(parsed.grid().value(1, 1, 1).unwrap(), 0.8);
        assert_relative_eq!(
            parsed.grid().simulation_box_size(),
            Vector3::new(0.5, 0.5, 0.5)
        );
    }

    #[test]
    fn negative_counts_mean_angstrom() {
        let header = "1 0.0 0.0 0.0\n-2 0.5 0.0 0.0\n-2 0.0 0.5 0.0\n-2 0.0 0.0 0.5\n";
        let parsed: CubeFile = cube(header, ONE_ATOM, EIGHT).parse().unwrap();

        assert_eq!(parsed.unit(), LengthUnit::Angstrom);
        assert_eq!(parsed.grid().dimensions(), (2, 2, 2));
    }

    #[test]
    fn each_axis_sign_is_checked() {
        let header = "1 0.0 0.0 0.0\n2 0.5 0.0 0.0\n2 0.0 0.5 0.0\n-2 0.0 0.0 0.5\n";
        let parsed: CubeFile = cube(header, ONE_ATOM, EIGHT).parse().unwrap();

        assert_eq!(parsed.unit(), LengthUnit::Angstrom);
        assert_eq!(parsed.grid().dimensions(), (2, 2, 2));
    }

    #[test]
    fn tokens_without_exponent_are_zero() {
        let data = "0.806033-100 2.0E-01 3.0E-01 4.0E-01 5.0E-01 6.0E-01 7.0E-01 8.0e-01\n";
        let parsed: CubeFile = cube(BOHR_HEADER, ONE_ATOM, data).parse().unwrap();

        assert_eq!(parsed.grid().value(0, 0, 0), Some(0.0));
        assert_relative_eq!(parsed.grid().value(1, 1, 1).unwrap(), 0.8);
    }

    #[test]
    fn zero_count_is_malformed_header() {
        let header = "1 0.0 0.0 0.0\n2 0.5 0.0 0.0\n0 0.0 0.5 0.0\n2 0.0 0.0 0.5\n";
        let err = cube(header, ONE_ATOM, EIGHT).parse::<CubeFile>().unwrap_err();
        assert!(matches!(err, CubeError::MalformedHeader { line: 5, .. }));
    }

    #[test]
    fn short_header_line() {
        let header = "1 0.0 0.0 0.0\n2 0.5 0.0\n2 0.0 0.5 0.0\n2 0.0 0.0 0.5\n";
        let err = cube(header, ONE_ATOM, EIGHT).parse::<CubeFile>().unwrap_err();
        assert!(matches!(err, CubeError::MalformedHeader { line: 4, .. }));
        assert_eq!(err.line(), Some(4));
    }

    #[test]
    fn non_integer_leading_token() {
        let header = "1.5 0.0 0.0 0.0\n2 0.5 0.0 0.0\n2 0.0 0.5 0.0\n2 0.0 0.0 0.5\n";
        let err = cube(header, ONE_ATOM, EIGHT).parse::<CubeFile>().unwrap_err();
        assert!(matches!(err, CubeError::MalformedHeader { line: 3, .. }));
    }

    #[test]
    fn truncated_header() {
        let err = "only\ntwo\n1 0.0 0.0 0.0\n".parse::<CubeFile>().unwrap_err();
        assert!(matches!(err, CubeError::MalformedHeader { line: 4, .. }));
    }

    #[test]
    fn unknown_element() {
        let err = cube(BOHR_HEADER, "97 0.0 0.0 0.0 0.0\n", EIGHT)
            .parse::<CubeFile>()
            .unwrap_err();
        assert!(matches!(
            err,
            CubeError::UnknownElement {
                line: 7,
                atomic_number: 97
            }
        ));
    }

    #[test]
    fn dummy_atom_is_udf() {
        let parsed: CubeFile = cube(BOHR_HEADER, "0 0.0 1.0 2.0 3.0\n", EIGHT)
            .parse()
            .unwrap();
        assert_eq!(parsed.atoms()[0].symbol(), "udf");
        assert_eq!(parsed.atoms()[0].atomic_number(), 0);
    }

    #[test]
    fn bad_token_reports_index() {
        let data = "1.0E-01 2.0E-01 3.0E-01\n4.0E-01 5.0Ex01 6.0E-01 7.0E-01 8.0E-01\n";
        let err = cube(BOHR_HEADER, ONE_ATOM, data).parse::<CubeFile>().unwrap_err();
        assert!(matches!(
            err,
            CubeError::MalformedData {
                line: 9,
                index: Some(4),
                ..
            }
        ));
    }

    #[test]
    fn too_few_values() {
        let data = "1.0E-01 2.0E-01 3.0E-01\n";
        let err = cube(BOHR_HEADER, ONE_ATOM, data).parse::<CubeFile>().unwrap_err();
        assert!(matches!(err, CubeError::MalformedData { index: None, .. }));
    }

    #[test]
    fn too_many_values() {
        let data = format!("{EIGHT}9.0E-01\n");
        let err = cube(BOHR_HEADER, ONE_ATOM, &data)
            .parse::<CubeFile>()
            .unwrap_err();
        assert!(matches!(
            err,
            CubeError::MalformedData {
                line: 10,
                index: Some(8),
                ..
            }
        ));
    }

    #[test]
    fn overflowing_voxel_count() {
        let header = "1 0.0 0.0 0.0\n10000000 0.5 0.0 0.0\n10000000 0.0 0.5 0.0\n\
                      10000000 0.0 0.0 0.5\n";
        let err = cube(header, ONE_ATOM, "1.0E-01\n")
            .parse::<CubeFile>()
            .unwrap_err();
        assert!(matches!(err, CubeError::MalformedHeader { line: 6, .. }));
    }

    #[test]
    fn overflowing_orbital_payload() {
        let header = "-1 0.0 0.0 0.0\n2000000 0.5 0.0 0.0\n2000000 0.0 0.5 0.0\n\
                      2000000 0.0 0.0 0.5\n";
        let atoms = "1 1.0 0.0 0.0 0.0\n3 1 2 3\n";
        let err = cube(header, atoms, "1.0E-01\n")
            .parse::<CubeFile>()
            .unwrap_err();
        assert!(matches!(err, CubeError::MalformedHeader { line: 8, .. }));
    }

    #[test]
    fn huge_header_claim_with_short_payload() {
        let header = "1 0.0 0.0 0.0\n100000 0.5 0.0 0.0\n100000 0.0 0.5 0.0\n\
                      100000 0.0 0.0 0.5\n";
        let err = cube(header, ONE_ATOM, "1.0E-01\n")
            .parse::<CubeFile>()
            .unwrap_err();
        assert!(matches!(
            err,
            CubeError::MalformedData {
                line: 8,
                index: None,
                ..
            }
        ));
    }

    #[test]
    fn invalid_utf8_in_payload() {
        let mut bytes = cube(BOHR_HEADER, ONE_ATOM, "").into_bytes();
        bytes.extend_from_slice(b"1.0E-01 \xff\xfe 3.0E-01\n");
        let err = CubeFile::from_reader(bytes.as_slice()).unwrap_err();
        assert!(matches!(
            err,
            CubeError::MalformedData {
                line: 8,
                index: None,
                ..
            }
        ));
        assert_eq!(err.line(), Some(8));
    }

    #[test]
    fn invalid_utf8_in_header() {
        let text = cube(BOHR_HEADER, ONE_ATOM, EIGHT);
        let mut bytes = b"\xff comment\n".to_vec();
        bytes.extend_from_slice(text.split_once('\n').unwrap().1.as_bytes());
        let err = CubeFile::from_reader(bytes.as_slice()).unwrap_err();
        assert!(matches!(err, CubeError::MalformedHeader { line: 1, .. }));
    }

    #[test]
    fn orbital_cube_keeps_first_orbital() {
        let header = "-1 0.0 0.0 0.0\n2 0.5 0.0 0.0\n2 0.0 0.5 0.0\n2 0.0 0.0 0.5\n";
        let atoms = "1 1.0 0.0 0.0 0.0\n2 5 6\n";
        // two values per voxel: first orbital is k, second is -k
        let data: String = (1..=8)
            .map(|k| format!("{k}.0E+00 -{k}.0E+00"))
            .collect::<Vec<_>>()
            .join("\n");
        let parsed: CubeFile = cube(header, atoms, &data).parse().unwrap();

        assert_eq!(parsed.orbitals(), &[5, 6]);
        assert_eq!(parsed.atoms().len(), 1);
        assert_eq!(parsed.grid().values().len(), 8);
        assert_relative_eq!(parsed.grid().value(0, 0, 0).unwrap(), 1.0);
        assert_relative_eq!(parsed.grid().value(1, 1, 1).unwrap(), 8.0);
    }

    #[test]
    fn wrapped_orbital_line() {
        let header = "-1 0.0 0.0 0.0\n2 0.5 0.0 0.0\n2 0.0 0.5 0.0\n2 0.0 0.0 0.5\n";
        let atoms = "1 1.0 0.0 0.0 0.0\n3 1 2\n3\n";
        let data = "1.0E+00 ".repeat(24);
        let parsed: CubeFile = cube(header, atoms, &data).parse().unwrap();
        assert_eq!(parsed.orbitals(), &[1, 2, 3]);
    }

    #[test]
    fn open_reports_missing_file() {
        let err = CubeFile::open("definitely/not/here.cube").unwrap_err();
        assert!(matches!(err, CubeError::Io(_)));
        assert_eq!(err.line(), None);
    }
}
