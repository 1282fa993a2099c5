//! Demo scene construction
//!
//! Builds the spin field the viewer shows out of the box.

mod lattice;

pub use lattice::SpinLattice;
