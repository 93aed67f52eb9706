//! Cross-section constants for line elements
//!
//! Depth is measured along local z and width along local y, so `iy`
//! (bending about local y) is the strong axis of a deep section.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Geometric constants of a member cross-section (SI units)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Area A [m²]
    pub a: f64,
    /// Second moment of area about local y [m⁴]
    pub iy: f64,
    /// Second moment of area about local z [m⁴]
    pub iz: f64,
    /// Polar moment Iy + Iz, used in the geometric stiffness [m⁴]
    pub ix: f64,
    /// St. Venant torsion constant [m⁴]
    pub j: f64,
    /// Shear area for forces along local y in m² (0 = rigid in shear)
    #[serde(default)]
    pub asy: f64,
    /// Shear area for forces along local z in m²
    #[serde(default)]
    pub asz: f64,
    /// Overall depth along local z, for extreme fibre stresses
    #[serde(default)]
    pub depth: Option<f64>,
    /// Overall width along local y
    #[serde(default)]
    pub width: Option<f64>,
}

impl Section {
    /// Create a new section with basic properties, polar inertia Iy + Iz and
    /// no shear deformation
    pub fn new(a: f64, iy: f64, iz: f64, j: f64) -> Self {
        Self {
            a,
            iy,
            iz,
            ix: iy + iz,
            j,
            asy: 0.0,
            asz: 0.0,
            depth: None,
            width: None,
        }
    }

    pub fn with_shear_areas(mut self, asy: f64, asz: f64) -> Self {
        self.asy = asy;
        self.asz = asz;
        self
    }

    /// Solid rectangle
    pub fn rectangular(width: f64, depth: f64) -> Self {
        let a = width * depth;
        let iy = width * depth.powi(3) / 12.0;
        let iz = depth * width.powi(3) / 12.0;

        // Roark's approximation for a solid rectangle
        let (a_dim, b_dim) = if width > depth { (width, depth) } else { (depth, width) };
        let j = a_dim * b_dim.powi(3) / 3.0 * (1.0 - 0.63 * b_dim / a_dim);

        Self {
            a,
            iy,
            iz,
            ix: iy + iz,
            j,
            asy: 5.0 / 6.0 * a,
            asz: 5.0 / 6.0 * a,
            depth: Some(depth),
            width: Some(width),
        }
    }

    /// Solid round bar
    pub fn circular(diameter: f64) -> Self {
        let r = diameter / 2.0;
        let a = PI * r.powi(2);
        let i = PI * r.powi(4) / 4.0;

        Self {
            a,
            iy: i,
            iz: i,
            ix: 2.0 * i,
            j: 2.0 * i,
            asy: 0.9 * a,
            asz: 0.9 * a,
            depth: Some(diameter),
            width: Some(diameter),
        }
    }

    /// Create a hollow circular (pipe) section, the common greenhouse hoop profile
    pub fn pipe(outer_diameter: f64, wall_thickness: f64) -> Self {
        let r_o = outer_diameter / 2.0;
        let r_i = r_o - wall_thickness;

        let a = PI * (r_o.powi(2) - r_i.powi(2));
        let i = PI * (r_o.powi(4) - r_i.powi(4)) / 4.0;

        Self {
            a,
            iy: i,
            iz: i,
            ix: 2.0 * i,
            j: 2.0 * i,
            asy: 0.5 * a,
            asz: 0.5 * a,
            depth: Some(outer_diameter),
            width: Some(outer_diameter),
        }
    }

    /// Doubly symmetric I-section, web along local z
    pub fn wide_flange(
        depth: f64,
        flange_width: f64,
        flange_thickness: f64,
        web_thickness: f64,
    ) -> Self {
        let bf = flange_width;
        let tf = flange_thickness;
        let tw = web_thickness;
        let d = depth;
        let hw = d - 2.0 * tf;

        let a = 2.0 * bf * tf + hw * tw;
        let iy = (bf * d.powi(3) - (bf - tw) * hw.powi(3)) / 12.0;
        let iz = (2.0 * tf * bf.powi(3) + hw * tw.powi(3)) / 12.0;

        // Open thin-walled plates
        let j = (2.0 * bf * tf.powi(3) + hw * tw.powi(3)) / 3.0;

        Self {
            a,
            iy,
            iz,
            ix: iy + iz,
            j,
            asy: 5.0 / 6.0 * 2.0 * bf * tf,
            asz: d * tw,
            depth: Some(d),
            width: Some(bf),
        }
    }

    /// Rectangular hollow section of uniform wall
    pub fn box_section(width: f64, depth: f64, wall_thickness: f64) -> Self {
        let t = wall_thickness;
        let b = width;
        let d = depth;
        let bi = b - 2.0 * t;
        let di = d - 2.0 * t;

        let a = b * d - bi * di;
        let iy = (b * d.powi(3) - bi * di.powi(3)) / 12.0;
        let iz = (d * b.powi(3) - di * bi.powi(3)) / 12.0;

        // Bredt: 4·Am²·t / perimeter
        let am = (b - t) * (d - t);
        let s = 2.0 * (b + d) - 4.0 * t;
        let j = 4.0 * am.powi(2) * t / s;

        Self {
            a,
            iy,
            iz,
            ix: iy + iz,
            j,
            asy: 2.0 * b * t,
            asz: 2.0 * d * t,
            depth: Some(d),
            width: Some(b),
        }
    }

    /// Extreme fibre distances `(cy, cz)` from the centroid
    ///
    /// Without explicit dimensions the section is treated as the rectangle
    /// with the same area and inertias (depth = √(12·Iy/A)).
    pub fn extreme_fibres(&self) -> (f64, f64) {
        let equivalent = |i: f64| if self.a > 0.0 { (12.0 * i / self.a).sqrt() } else { 0.0 };
        let depth = self.depth.unwrap_or_else(|| equivalent(self.iy));
        let width = self.width.unwrap_or_else(|| equivalent(self.iz));
        (width / 2.0, depth / 2.0)
    }

    /// Elastic section modulus about local y
    pub fn sy(&self) -> f64 {
        let (_, cz) = self.extreme_fibres();
        if cz > 0.0 { self.iy / cz } else { 0.0 }
    }

    /// Elastic section modulus about local z
    pub fn sz(&self) -> f64 {
        let (cy, _) = self.extreme_fibres();
        if cy > 0.0 { self.iz / cy } else { 0.0 }
    }

    /// Radius used for torsional shear stress
    pub fn torsion_radius(&self) -> f64 {
        let (cy, cz) = self.extreme_fibres();
        cy.max(cz)
    }

    /// Shear area along local y, the gross area when none is given
    pub fn effective_asy(&self) -> f64 {
        if self.asy > 0.0 { self.asy } else { self.a }
    }

    /// Shear area along local z, the gross area when none is given
    pub fn effective_asz(&self) -> f64 {
        if self.asz > 0.0 { self.asz } else { self.a }
    }
}

impl Default for Section {
    fn default() -> Self {
        // 60 x 2 mm galvanized tube
        Self::pipe(0.060, 0.002)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rectangular_section() {
        let section = Section::rectangular(0.3, 0.5);
        assert_relative_eq!(section.a, 0.15, epsilon = 1e-12);
        assert_relative_eq!(section.iy, 0.3 * 0.125 / 12.0, epsilon = 1e-12);
        assert_relative_eq!(section.sy(), 0.3 * 0.25 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_circular_section() {
        let section = Section::circular(0.5);
        assert_relative_eq!(section.a, PI * 0.0625, epsilon = 1e-12);
        assert_relative_eq!(section.iy, section.iz);
        assert_relative_eq!(section.torsion_radius(), 0.25);
    }

    #[test]
    fn test_equivalent_rectangle_fallback() {
        let rect = Section::rectangular(0.1, 0.2);
        let bare = Section::new(rect.a, rect.iy, rect.iz, rect.j);
        let (cy, cz) = bare.extreme_fibres();
        assert_relative_eq!(cy, 0.05, epsilon = 1e-12);
        assert_relative_eq!(cz, 0.1, epsilon = 1e-12);
        assert_relative_eq!(bare.effective_asy(), bare.a);
    }

    #[test]
    fn test_i_section_strong_axis() {
        let ipe = Section::wide_flange(0.2, 0.1, 0.0085, 0.0056);
        assert!(ipe.iy > 10.0 * ipe.iz);
        assert_relative_eq!(ipe.a, 2.0 * 0.1 * 0.0085 + 0.183 * 0.0056, epsilon = 1e-12);
        assert_eq!(ipe.depth, Some(0.2));
    }
}
