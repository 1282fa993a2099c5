//! Demo spin lattice
//!
//! A regular grid of spin sites carrying a Néel-type vortex texture: spins
//! point down at the core, wind tangentially around it, and relax to +z far
//! away. All directions are unit vectors, as the renderer requires.

use std::f32::consts::PI;

use crate::config::LatticeConfig;

/// Instance data for the demo spin field
pub struct SpinLattice {
    pub positions: Vec<[f32; 3]>,
    pub directions: Vec<[f32; 3]>,
}

impl SpinLattice {
    /// Build a vortex texture on a grid centered at the origin.
    pub fn vortex(config: &LatticeConfig) -> Self {
        let [nx, ny, nz] = config.extent;
        let spacing = config.spacing;
        let core_radius = (config.core_radius * spacing).max(f32::EPSILON);

        let count = (nx * ny * nz) as usize;
        let mut positions = Vec::with_capacity(count);
        let mut directions = Vec::with_capacity(count);

        let offset = |n: u32| (n.saturating_sub(1)) as f32 / 2.0;
        let (ox, oy, oz) = (offset(nx), offset(ny), offset(nz));

        for iz in 0..nz {
            for iy in 0..ny {
                for ix in 0..nx {
                    let x = (ix as f32 - ox) * spacing;
                    let y = (iy as f32 - oy) * spacing;
                    let z = (iz as f32 - oz) * spacing;
                    positions.push([x, y, z]);

                    let r = x.hypot(y);
                    // Polar angle: pi at the core, 0 far away.
                    let theta = PI * (-r / core_radius).exp();
                    // In-plane winding, a quarter turn ahead of the radius.
                    let azimuth = y.atan2(x) + PI / 2.0;
                    directions.push([
                        theta.sin() * azimuth.cos(),
                        theta.sin() * azimuth.sin(),
                        theta.cos(),
                    ]);
                }
            }
        }

        Self {
            positions,
            directions,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(extent: [u32; 3]) -> LatticeConfig {
        LatticeConfig {
            extent,
            spacing: 1.0,
            core_radius: 4.0,
        }
    }

    #[test]
    fn test_site_count() {
        let lattice = SpinLattice::vortex(&config([5, 7, 2]));
        assert_eq!(lattice.len(), 5 * 7 * 2);
        assert_eq!(lattice.positions.len(), lattice.directions.len());
    }

    #[test]
    fn test_directions_are_unit() {
        let lattice = SpinLattice::vortex(&config([9, 9, 1]));
        for d in &lattice.directions {
            let length = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
            assert!((length - 1.0).abs() < 1e-5, "non-unit direction {:?}", d);
        }
    }

    #[test]
    fn test_core_points_down() {
        // Odd extents put a site exactly at the origin; the vortex core
        // points along -z there.
        let lattice = SpinLattice::vortex(&config([9, 9, 1]));
        let core = lattice
            .positions
            .iter()
            .position(|p| p[0] == 0.0 && p[1] == 0.0)
            .unwrap();
        assert!(lattice.directions[core][2] < -0.999);
    }

    #[test]
    fn test_grid_is_centered() {
        let lattice = SpinLattice::vortex(&config([3, 3, 3]));
        let sum = lattice.positions.iter().fold([0.0f32; 3], |acc, p| {
            [acc[0] + p[0], acc[1] + p[1], acc[2] + p[2]]
        });
        for component in sum {
            assert!(component.abs() < 1e-4);
        }
    }

    #[test]
    fn test_empty_extent() {
        let lattice = SpinLattice::vortex(&config([0, 5, 5]));
        assert!(lattice.is_empty());
    }
}
