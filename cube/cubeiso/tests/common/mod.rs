//! Shared fixtures.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

const N: usize = 31;
const ATOMS: [(u8, [f64; 3]); 3] = [
    (8, [0.739_512, 0.0, 0.0]),
    (1, [-0.369_757, 0.0, 1.472_097]),
    (1, [-0.369_757, 0.0, -1.472_097]),
];

/// Sum of Gaussians on the atoms, sampled on a 31^3 Bohr grid of spacing 0.3.
pub fn write_water(dir: &Path) -> PathBuf {
    let mut text = String::from(
        " water\n synthetic density\n    3   -4.500000   -4.500000   -4.500000\n",
    );
    for axis in 0..3 {
        let mut row = [0.0; 3];
        row[axis] = 0.3;
        writeln!(text, "   31 {:11.6} {:11.6} {:11.6}", row[0], row[1], row[2]).unwrap();
    }
    for (z, [x, y, zc]) in ATOMS {
        writeln!(text, "    {z} {:11.6} {x:11.6} {y:11.6} {zc:11.6}", f64::from(z)).unwrap();
    }

    for ix in 0..N {
        for iy in 0..N {
            for iz in 0..N {
                let p = [ix, iy, iz].map(|i| -4.5 + 0.3 * i as f64);
                let density: f64 = ATOMS
                    .iter()
                    .map(|(z, a)| {
                        let r2: f64 = (0..3).map(|k| (p[k] - a[k]).powi(2)).sum();
                        f64::from(*z) * (-1.5 * r2).exp()
                    })
                    .sum();
                write!(text, " {density:12.5E}").unwrap();
                if iz % 6 == 5 || iz == N - 1 {
                    text.push('\n');
                }
            }
        }
    }

    let path = dir.join("water.cube");
    std::fs::write(&path, text).unwrap();
    path
}
