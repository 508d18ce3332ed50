//! Panel and grid geometry for lattice methods.
//!
//! A panel carries one doublet line at quarter chord and a downwash control
//! point at three-quarter chord. The corner numbering and the derived
//! reference points follow the usual lattice convention:
//!
//! ```text
//!                l_2
//!          4 o---------o 3
//!            |         |
//! u -->  b_1 | l  k  j | b_2
//!            |         |
//!          1 o---------o 2
//!      y          l_1
//!      |
//!     z.--- x
//! ```
//!
//! Panels must be defined from left to right so that the normal's
//! out-of-plane component is non-negative; violations are reported as a
//! warning by the influence assembly, not corrected.

use crate::errors::DlmError;
use crate::math::{R3, Scalar};

/// A planar quadrilateral aerodynamic panel with its derived reference points.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Panel {
    /// Unique identifier; the grid ordering defines the matrix index.
    pub id: u32,
    /// Downwash control point at 75 % chord, mid span.
    pub receiving: R3,
    /// Doublet line end point at 25 % chord, 0 % span.
    pub edge_minus: R3,
    /// Doublet line end point at 25 % chord, 100 % span.
    pub edge_plus: R3,
    /// Doublet line mid point at 25 % chord, 50 % span.
    pub sending: R3,
    /// Unit outward normal.
    pub normal: R3,
    /// Streamwise chord length of the panel.
    pub chord: Scalar,
}

impl Panel {
    /// Derives the reference points from the four quadrilateral corners.
    ///
    /// Corners are numbered as in the module sketch: 1-2 along the root
    /// chord, 4-3 along the tip chord.
    #[must_use]
    pub fn from_corners(id: u32, corners: [R3; 4]) -> Self {
        let [p1, p2, p3, p4] = corners;
        let l_1 = p2 - p1;
        let l_2 = p3 - p4;
        let b_1 = p4 - p1;
        let l_m = (l_1 + l_2) / 2.0;
        let n = l_1.cross(&b_1);
        let normal = if n.norm() > 0.0 { n.normalize() } else { R3::zeros() };
        Self {
            id,
            receiving: p1 + 0.75 * l_m + 0.5 * b_1,
            edge_minus: p1 + 0.25 * l_1,
            edge_plus: p4 + 0.25 * l_2,
            sending: p1 + 0.25 * l_m + 0.5 * b_1,
            normal,
            chord: l_m.x,
        }
    }

    /// Half the spanwise extent of the doublet line.
    #[must_use]
    pub fn semi_width(&self) -> Scalar {
        let dy = self.edge_plus.y - self.edge_minus.y;
        let dz = self.edge_plus.z - self.edge_minus.z;
        0.5 * dy.hypot(dz)
    }
}

/// Spanwise frame of a panel's doublet line, precomputed once per assembly.
#[derive(Debug, Clone, Copy)]
pub struct DoubletLine {
    /// Semi-width e of the doublet line.
    pub e: Scalar,
    /// Sine of the dihedral angle.
    pub sin_gamma: Scalar,
    /// Cosine of the dihedral angle.
    pub cos_gamma: Scalar,
    /// Dihedral angle gamma = arcsin(dz / 2e).
    pub gamma: Scalar,
    /// Sweep tangent of the doublet line, dx / 2e.
    pub tan_lambda: Scalar,
    /// Streamwise chord of the carrying panel.
    pub chord: Scalar,
}

/// A read-only collection of panels; ordering defines matrix row/column
/// indices.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct AeroGrid {
    panels: Vec<Panel>,
    coord_desc: String,
}

impl AeroGrid {
    /// Builds a grid from panels, validating that none is degenerate.
    ///
    /// # Errors
    ///
    /// Returns [`DlmError::DegeneratePanel`] for panels with vanishing
    /// semi-width, chord, or normal.
    pub fn new(panels: Vec<Panel>) -> Result<Self, DlmError> {
        for panel in &panels {
            if !(panel.semi_width() > 0.0) {
                return Err(DlmError::DegeneratePanel {
                    id: panel.id,
                    reason: "semi-width is zero".into(),
                });
            }
            if !(panel.chord > 0.0) {
                return Err(DlmError::DegeneratePanel {
                    id: panel.id,
                    reason: "chord is zero or negative".into(),
                });
            }
            if (panel.normal.norm() - 1.0).abs() > 1.0e-6 {
                return Err(DlmError::DegeneratePanel {
                    id: panel.id,
                    reason: "normal is not unit length".into(),
                });
            }
        }
        Ok(Self { panels, coord_desc: "bodyfixed".into() })
    }

    /// Number of panels.
    #[must_use]
    pub fn n(&self) -> usize {
        self.panels.len()
    }

    /// Panel slice in matrix order.
    #[must_use]
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Coordinate-system tag; carried for consistency, not interpreted.
    #[must_use]
    pub fn coord_desc(&self) -> &str {
        &self.coord_desc
    }

    /// True if any panel is wound upside down (normal pointing below the
    /// panel plane).
    #[must_use]
    pub fn has_flipped_panels(&self) -> bool {
        self.panels.iter().any(|p| p.normal.z < 0.0)
    }

    /// Precomputes the doublet-line frame of panel `i`.
    #[must_use]
    pub fn doublet_line(&self, i: usize) -> DoubletLine {
        let p = &self.panels[i];
        let e = p.semi_width();
        let sin_gamma = (p.edge_plus.z - p.edge_minus.z) / (2.0 * e);
        let cos_gamma = (p.edge_plus.y - p.edge_minus.y) / (2.0 * e);
        DoubletLine {
            e,
            sin_gamma,
            cos_gamma,
            gamma: sin_gamma.asin(),
            tan_lambda: (p.edge_plus.x - p.edge_minus.x) / (2.0 * e),
            chord: p.chord,
        }
    }
}
