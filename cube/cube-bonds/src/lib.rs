//! Bond inference for molecules read from cube files.
//!
//! Cube files carry atom positions but no connectivity. [`infer_bonds`]
//! recovers the bond graph with the usual covalent-radius heuristic: two
//! atoms are bonded when their distance is no more than a tolerance times
//! the sum of their covalent radii.
//!
//! The result is a [`BondSet`] of normalised [`Bond`]s, so each pair appears
//! once however the atoms were visited.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod bond;
mod infer;

pub use bond::{Bond, BondSet};
pub use infer::{BondConfig, infer_bonds};
