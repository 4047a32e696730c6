//! Reinforcement descriptors and their resolution to bar positions.
//!
//! Bars are described in the shape's reference orientation. Longitudinal
//! groups carry a [`BarPlacement`]; stirrups and bent bars do not enter the
//! section equilibrium and only need their role.

use serde::{Deserialize, Serialize};

use super::geometry::Profile;
use crate::equations::section::bar_area;
use crate::errors::{CalcError, CalcResult};

/// What a group of bars does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BarRole {
    Tension,
    Compression,
    /// `count` is the number of legs crossing the section
    Stirrup { spacing_mm: f64 },
    BentBar { inclination_deg: f64 },
}

impl BarRole {
    /// Tension and compression bars run along the member.
    pub fn is_longitudinal(&self) -> bool {
        matches!(self, BarRole::Tension | BarRole::Compression)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BarRole::Tension => "Tension",
            BarRole::Compression => "Compression",
            BarRole::Stirrup { .. } => "Stirrup",
            BarRole::BentBar { .. } => "Bent bar",
        }
    }
}

/// Where the bars of a longitudinal group sit.
///
/// Without an explicit spread the bars are distributed across the concrete at
/// that depth (or offset), kept `cover + φ/2` away from the faces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum BarPlacement {
    /// Horizontal layer at a depth from the top edge
    Row {
        depth_mm: f64,
        #[serde(default)]
        spread_mm: Option<[f64; 2]>,
    },
    /// Vertical layer at an offset from the left edge
    Column {
        offset_mm: f64,
        #[serde(default)]
        spread_mm: Option<[f64; 2]>,
    },
    /// Bars on a circle around the gross centroid, the first one at `start_deg`
    /// clockwise from the top
    Ring {
        radius_mm: f64,
        #[serde(default)]
        start_deg: f64,
    },
}

/// A group of identical bars.
///
/// ## JSON Example
///
/// ```json
/// { "diameter_mm": 16, "count": 4, "role": { "kind": "tension" },
///   "placement": { "layout": "row", "depth_mm": 462 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReinforcementBar {
    pub diameter_mm: f64,
    pub count: u32,
    pub role: BarRole,
    #[serde(default)]
    pub placement: Option<BarPlacement>,
}

/// A resolved longitudinal bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteelPoint {
    pub z: f64,
    pub y: f64,
    pub area_mm2: f64,
    pub diameter_mm: f64,
    pub role: BarRole,
}

impl SteelPoint {
    pub fn rotated_ccw(&self, width: f64) -> SteelPoint {
        SteelPoint {
            z: self.y,
            y: width - self.z,
            ..*self
        }
    }
}

fn spaced(count: u32, from: f64, to: f64) -> Vec<f64> {
    if count == 1 {
        return vec![(from + to) / 2.0];
    }
    let step = (to - from) / (count - 1) as f64;
    (0..count).map(|i| from + step * i as f64).collect()
}

/// Lay a row over the solid segments at its depth: one bar per segment, the
/// rest shared in proportion to the usable length (largest remainder first).
/// `None` when there are fewer bars than segments.
fn spread_over(count: u32, segments: &[(f64, f64)], inset: f64) -> Option<Vec<f64>> {
    let usable: Vec<(f64, f64)> = segments
        .iter()
        .map(|&(a, b)| {
            if b - a > 2.0 * inset {
                (a + inset, b - inset)
            } else {
                let mid = (a + b) / 2.0;
                (mid, mid)
            }
        })
        .collect();
    let parts = usable.len() as u32;
    if parts == 0 || count < parts {
        return None;
    }

    let lengths: Vec<f64> = usable.iter().map(|(a, b)| b - a).collect();
    let total: f64 = lengths.iter().sum();
    let extra = (count - parts) as f64;
    let shares: Vec<f64> = lengths
        .iter()
        .map(|l| if total > 0.0 { extra * l / total } else { extra / parts as f64 })
        .collect();
    let mut alloc: Vec<u32> = shares.iter().map(|s| 1 + s.floor() as u32).collect();
    let mut left = count.saturating_sub(alloc.iter().sum());
    let mut order: Vec<usize> = (0..usable.len()).collect();
    order.sort_by(|&i, &j| (shares[j] - shares[j].floor()).total_cmp(&(shares[i] - shares[i].floor())));
    for i in order {
        if left == 0 {
            break;
        }
        alloc[i] += 1;
        left -= 1;
    }

    Some(
        usable
            .iter()
            .zip(alloc)
            .flat_map(|(&(a, b), n)| spaced(n, a, b))
            .collect(),
    )
}

impl ReinforcementBar {
    /// Longitudinal group laid out as a horizontal row.
    pub fn row(diameter_mm: f64, count: u32, depth_mm: f64, role: BarRole) -> Self {
        Self {
            diameter_mm,
            count,
            role,
            placement: Some(BarPlacement::Row {
                depth_mm,
                spread_mm: None,
            }),
        }
    }

    pub fn stirrups(diameter_mm: f64, legs: u32, spacing_mm: f64) -> Self {
        Self {
            diameter_mm,
            count: legs,
            role: BarRole::Stirrup { spacing_mm },
            placement: None,
        }
    }

    pub fn bent(diameter_mm: f64, count: u32, inclination_deg: f64) -> Self {
        Self {
            diameter_mm,
            count,
            role: BarRole::BentBar { inclination_deg },
            placement: None,
        }
    }

    /// Total steel area of the group (mm²)
    pub fn area_mm2(&self) -> f64 {
        bar_area(self.diameter_mm, self.count)
    }

    pub fn validate(&self) -> CalcResult<()> {
        if !(self.diameter_mm > 0.0 && self.diameter_mm.is_finite()) {
            return Err(CalcError::invalid_input(
                "diameter_mm",
                self.diameter_mm.to_string(),
                "Bar diameter must be positive",
            ));
        }
        if self.count == 0 {
            return Err(CalcError::invalid_input("count", "0", "At least one bar is required"));
        }
        match self.role {
            BarRole::Stirrup { spacing_mm } if !(spacing_mm > 0.0) => Err(CalcError::invalid_input(
                "spacing_mm",
                spacing_mm.to_string(),
                "Stirrup spacing must be positive",
            )),
            BarRole::BentBar { inclination_deg } if !(inclination_deg > 0.0 && inclination_deg <= 90.0) => {
                Err(CalcError::invalid_input(
                    "inclination_deg",
                    inclination_deg.to_string(),
                    "Bent-bar inclination must be in (0, 90] degrees",
                ))
            }
            role if role.is_longitudinal() && self.placement.is_none() => Err(CalcError::invalid_input(
                "placement",
                "none",
                "Longitudinal bars need a placement",
            )),
            _ => Ok(()),
        }
    }

    /// Resolve the group to bar positions inside `profile` (reference
    /// orientation). Stirrups and bent bars resolve to nothing.
    pub fn steel_points(&self, profile: &Profile, cover_mm: f64) -> CalcResult<Vec<SteelPoint>> {
        self.validate()?;
        let placement = match (self.role.is_longitudinal(), self.placement) {
            (true, Some(p)) => p,
            _ => return Ok(Vec::new()),
        };
        let inset = cover_mm + self.diameter_mm / 2.0;

        let coords: Vec<(f64, f64)> = match placement {
            BarPlacement::Row { depth_mm, spread_mm } => {
                let zs = match spread_mm {
                    Some([a, b]) => spaced(self.count, a, b),
                    None => {
                        let segments = profile.horizontal_segments(depth_mm)?;
                        if segments.is_empty() {
                            return Err(CalcError::invalid_input(
                                "depth_mm",
                                depth_mm.to_string(),
                                "No concrete at this depth",
                            ));
                        }
                        spread_over(self.count, &segments, inset).ok_or_else(|| {
                            CalcError::invalid_input(
                                "count",
                                self.count.to_string(),
                                format!(
                                    "{} separate concrete segments at depth {depth_mm}: give spread_mm or at least one bar per segment",
                                    segments.len()
                                ),
                            )
                        })?
                    }
                };
                zs.into_iter().map(|z| (z, depth_mm)).collect()
            }
            BarPlacement::Column { offset_mm, spread_mm } => {
                let (y0, y1) = match spread_mm {
                    Some([a, b]) => (a, b),
                    None => {
                        let (a, b) = profile.vertical_extent(offset_mm).ok_or_else(|| {
                            CalcError::invalid_input(
                                "offset_mm",
                                offset_mm.to_string(),
                                "No concrete at this offset",
                            )
                        })?;
                        (a + inset, b - inset)
                    }
                };
                spaced(self.count, y0, y1).into_iter().map(|y| (offset_mm, y)).collect()
            }
            BarPlacement::Ring { radius_mm, start_deg } => {
                let g = profile.gross_properties();
                let step = 360.0 / self.count as f64;
                (0..self.count)
                    .map(|i| {
                        let t = (start_deg + step * i as f64).to_radians();
                        (
                            g.centroid_from_left_mm + radius_mm * t.sin(),
                            g.centroid_from_top_mm - radius_mm * t.cos(),
                        )
                    })
                    .collect()
            }
        };

        let single = bar_area(self.diameter_mm, 1);
        coords
            .into_iter()
            .map(|(z, y)| {
                if !profile.contains(z, y) {
                    return Err(CalcError::invalid_input(
                        "placement",
                        format!("({z:.1}, {y:.1})"),
                        "Bar lies outside the concrete",
                    ));
                }
                Ok(SteelPoint {
                    z,
                    y,
                    area_mm2: single,
                    diameter_mm: self.diameter_mm,
                    role: self.role,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::Shape;
    use approx::assert_relative_eq;

    fn rect() -> Profile {
        Shape::Rectangular {
            width_mm: 300.0,
            height_mm: 500.0,
        }
        .profile()
        .unwrap()
    }

    #[test]
    fn test_row_spread_inside_cover() {
        let bar = ReinforcementBar::row(16.0, 4, 462.0, BarRole::Tension);
        let pts = bar.steel_points(&rect(), 30.0).unwrap();
        assert_eq!(pts.len(), 4);
        assert_relative_eq!(pts[0].z, 38.0);
        assert_relative_eq!(pts[3].z, 262.0);
        assert!(pts.iter().all(|p| p.y == 462.0));
        let total: f64 = pts.iter().map(|p| p.area_mm2).sum();
        assert_relative_eq!(total, bar.area_mm2(), max_relative = 1e-12);
    }

    #[test]
    fn test_single_bar_centred() {
        let bar = ReinforcementBar::row(20.0, 1, 450.0, BarRole::Tension);
        let pts = bar.steel_points(&rect(), 30.0).unwrap();
        assert_relative_eq!(pts[0].z, 150.0);
    }

    #[test]
    fn test_bar_outside_envelope() {
        let bar = ReinforcementBar::row(16.0, 2, 520.0, BarRole::Tension);
        assert!(bar.steel_points(&rect(), 30.0).is_err());

        let bar = ReinforcementBar {
            diameter_mm: 16.0,
            count: 2,
            role: BarRole::Tension,
            placement: Some(BarPlacement::Row {
                depth_mm: 450.0,
                spread_mm: Some([-10.0, 200.0]),
            }),
        };
        let err = bar.steel_points(&rect(), 30.0).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_row_across_trough_walls() {
        let profile = Shape::UShape {
            width_mm: 800.0,
            height_mm: 500.0,
            wall_thickness_mm: 120.0,
            base_thickness_mm: 150.0,
        }
        .profile()
        .unwrap();
        let bar = ReinforcementBar::row(20.0, 4, 40.0, BarRole::Compression);
        let pts = bar.steel_points(&profile, 30.0).unwrap();
        let zs: Vec<f64> = pts.iter().map(|p| p.z).collect();
        // two bars per wall, 40 mm in from each wall face
        assert_eq!(zs.len(), 4);
        for (z, expected) in zs.iter().zip([40.0, 80.0, 720.0, 760.0]) {
            assert_relative_eq!(*z, expected, epsilon = 1e-9);
        }
        assert!(pts.iter().all(|p| profile.contains(p.z, p.y)));
    }

    #[test]
    fn test_row_shared_unevenly_between_box_walls() {
        let profile = Shape::BoxShape {
            width_mm: 600.0,
            height_mm: 600.0,
            wall_thickness_mm: 120.0,
            top_thickness_mm: 120.0,
            bottom_thickness_mm: 120.0,
        }
        .profile()
        .unwrap();
        let bar = ReinforcementBar::row(16.0, 3, 300.0, BarRole::Compression);
        let pts = bar.steel_points(&profile, 30.0).unwrap();
        assert_eq!(pts.len(), 3);
        assert_eq!(pts.iter().filter(|p| p.z < 300.0).count(), 2);
        assert!(pts.iter().all(|p| profile.contains(p.z, p.y)));

        // one bar cannot stand for two walls
        let bar = ReinforcementBar::row(16.0, 1, 300.0, BarRole::Compression);
        let err = bar.steel_points(&profile, 30.0).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(err.to_string().contains("spread_mm"));
    }

    #[test]
    fn test_bar_in_void_rejected() {
        let profile = Shape::BoxShape {
            width_mm: 600.0,
            height_mm: 600.0,
            wall_thickness_mm: 120.0,
            top_thickness_mm: 120.0,
            bottom_thickness_mm: 120.0,
        }
        .profile()
        .unwrap();
        let bar = ReinforcementBar {
            diameter_mm: 16.0,
            count: 1,
            role: BarRole::Compression,
            placement: Some(BarPlacement::Row {
                depth_mm: 300.0,
                spread_mm: Some([300.0, 300.0]),
            }),
        };
        assert!(bar.steel_points(&profile, 30.0).is_err());
    }

    #[test]
    fn test_ring_on_circle() {
        let profile = Shape::Circular { diameter_mm: 400.0 }.profile().unwrap();
        let bar = ReinforcementBar {
            diameter_mm: 16.0,
            count: 6,
            role: BarRole::Tension,
            placement: Some(BarPlacement::Ring {
                radius_mm: 150.0,
                start_deg: 0.0,
            }),
        };
        let pts = bar.steel_points(&profile, 30.0).unwrap();
        assert_relative_eq!(pts[0].y, 50.0, epsilon = 1e-9);
        assert_relative_eq!(pts[3].y, 350.0, epsilon = 1e-9);
        let mean_z: f64 = pts.iter().map(|p| p.z).sum::<f64>() / 6.0;
        assert_relative_eq!(mean_z, 200.0, epsilon = 1e-9);
    }

    #[test]
    fn test_stirrups_resolve_to_nothing() {
        let bar = ReinforcementBar::stirrups(8.0, 2, 200.0);
        assert!(bar.steel_points(&rect(), 30.0).unwrap().is_empty());
        assert!(ReinforcementBar::stirrups(8.0, 2, 0.0).validate().is_err());
        assert!(ReinforcementBar::bent(16.0, 2, 95.0).validate().is_err());
    }

    #[test]
    fn test_longitudinal_needs_placement() {
        let bar = ReinforcementBar {
            diameter_mm: 16.0,
            count: 2,
            role: BarRole::Tension,
            placement: None,
        };
        assert!(bar.validate().is_err());
    }
}
