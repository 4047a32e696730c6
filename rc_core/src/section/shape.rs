//! The eight concrete outlines.
//!
//! Each variant only carries its dimensions (mm) and knows how to validate
//! them and decompose itself into [`Leaf`] pieces in its reference
//! orientation (top edge at `y = 0`, left edge at `z = 0`).

use serde::{Deserialize, Serialize};

use super::geometry::{Leaf, Profile};
use crate::errors::{CalcError, CalcResult};

/// Section outline.
///
/// ## JSON Example
///
/// ```json
/// { "kind": "tee", "flange_width_mm": 800, "flange_thickness_mm": 120,
///   "web_width_mm": 250, "height_mm": 600 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Rectangular {
        width_mm: f64,
        height_mm: f64,
    },
    /// Flange on top, web centred below it
    Tee {
        flange_width_mm: f64,
        flange_thickness_mm: f64,
        web_width_mm: f64,
        height_mm: f64,
    },
    /// Doubly flanged, all parts centred on a common vertical axis
    IShape {
        top_flange_width_mm: f64,
        top_flange_thickness_mm: f64,
        web_width_mm: f64,
        bottom_flange_width_mm: f64,
        bottom_flange_thickness_mm: f64,
        height_mm: f64,
    },
    /// Vertical leg on the left, flange along the bottom
    LShape {
        width_mm: f64,
        height_mm: f64,
        leg_thickness_mm: f64,
        flange_thickness_mm: f64,
    },
    /// Trough open at the top: two walls on a base slab
    UShape {
        width_mm: f64,
        height_mm: f64,
        wall_thickness_mm: f64,
        base_thickness_mm: f64,
    },
    /// Closed hollow rectangle
    BoxShape {
        width_mm: f64,
        height_mm: f64,
        wall_thickness_mm: f64,
        top_thickness_mm: f64,
        bottom_thickness_mm: f64,
    },
    Circular {
        diameter_mm: f64,
    },
    HollowCircular {
        outer_diameter_mm: f64,
        inner_diameter_mm: f64,
    },
}

fn positive(field: &str, value: f64) -> CalcResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(CalcError::invalid_input(field, value.to_string(), "Dimension must be positive"))
    }
}

fn less_than(field: &str, value: f64, limit: f64, what: &str) -> CalcResult<()> {
    if value < limit {
        Ok(())
    } else {
        Err(CalcError::invalid_input(
            field,
            value.to_string(),
            format!("Must be smaller than {what} ({limit})"),
        ))
    }
}

impl Shape {
    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Shape::Rectangular { .. } => "Rectangular",
            Shape::Tee { .. } => "T",
            Shape::IShape { .. } => "I",
            Shape::LShape { .. } => "L",
            Shape::UShape { .. } => "U",
            Shape::BoxShape { .. } => "Box",
            Shape::Circular { .. } => "Circular",
            Shape::HollowCircular { .. } => "Hollow circular",
        }
    }

    /// Validate the dimensions.
    pub fn validate(&self) -> CalcResult<()> {
        match *self {
            Shape::Rectangular { width_mm, height_mm } => {
                positive("width_mm", width_mm)?;
                positive("height_mm", height_mm)
            }
            Shape::Tee {
                flange_width_mm,
                flange_thickness_mm,
                web_width_mm,
                height_mm,
            } => {
                positive("flange_width_mm", flange_width_mm)?;
                positive("flange_thickness_mm", flange_thickness_mm)?;
                positive("web_width_mm", web_width_mm)?;
                positive("height_mm", height_mm)?;
                less_than("flange_thickness_mm", flange_thickness_mm, height_mm, "height")?;
                if web_width_mm > flange_width_mm {
                    return Err(CalcError::invalid_input(
                        "web_width_mm",
                        web_width_mm.to_string(),
                        "Web cannot be wider than the flange",
                    ));
                }
                Ok(())
            }
            Shape::IShape {
                top_flange_width_mm,
                top_flange_thickness_mm,
                web_width_mm,
                bottom_flange_width_mm,
                bottom_flange_thickness_mm,
                height_mm,
            } => {
                positive("top_flange_width_mm", top_flange_width_mm)?;
                positive("top_flange_thickness_mm", top_flange_thickness_mm)?;
                positive("web_width_mm", web_width_mm)?;
                positive("bottom_flange_width_mm", bottom_flange_width_mm)?;
                positive("bottom_flange_thickness_mm", bottom_flange_thickness_mm)?;
                positive("height_mm", height_mm)?;
                less_than(
                    "top_flange_thickness_mm",
                    top_flange_thickness_mm + bottom_flange_thickness_mm,
                    height_mm,
                    "height",
                )?;
                if web_width_mm > top_flange_width_mm.min(bottom_flange_width_mm) {
                    return Err(CalcError::invalid_input(
                        "web_width_mm",
                        web_width_mm.to_string(),
                        "Web cannot be wider than either flange",
                    ));
                }
                Ok(())
            }
            Shape::LShape {
                width_mm,
                height_mm,
                leg_thickness_mm,
                flange_thickness_mm,
            } => {
                positive("width_mm", width_mm)?;
                positive("height_mm", height_mm)?;
                positive("leg_thickness_mm", leg_thickness_mm)?;
                positive("flange_thickness_mm", flange_thickness_mm)?;
                less_than("leg_thickness_mm", leg_thickness_mm, width_mm, "width")?;
                less_than("flange_thickness_mm", flange_thickness_mm, height_mm, "height")
            }
            Shape::UShape {
                width_mm,
                height_mm,
                wall_thickness_mm,
                base_thickness_mm,
            } => {
                positive("width_mm", width_mm)?;
                positive("height_mm", height_mm)?;
                positive("wall_thickness_mm", wall_thickness_mm)?;
                positive("base_thickness_mm", base_thickness_mm)?;
                less_than("wall_thickness_mm", 2.0 * wall_thickness_mm, width_mm, "width")?;
                less_than("base_thickness_mm", base_thickness_mm, height_mm, "height")
            }
            Shape::BoxShape {
                width_mm,
                height_mm,
                wall_thickness_mm,
                top_thickness_mm,
                bottom_thickness_mm,
            } => {
                positive("width_mm", width_mm)?;
                positive("height_mm", height_mm)?;
                positive("wall_thickness_mm", wall_thickness_mm)?;
                positive("top_thickness_mm", top_thickness_mm)?;
                positive("bottom_thickness_mm", bottom_thickness_mm)?;
                less_than("wall_thickness_mm", 2.0 * wall_thickness_mm, width_mm, "width")?;
                less_than(
                    "top_thickness_mm",
                    top_thickness_mm + bottom_thickness_mm,
                    height_mm,
                    "height",
                )
            }
            Shape::Circular { diameter_mm } => positive("diameter_mm", diameter_mm),
            Shape::HollowCircular {
                outer_diameter_mm,
                inner_diameter_mm,
            } => {
                positive("outer_diameter_mm", outer_diameter_mm)?;
                positive("inner_diameter_mm", inner_diameter_mm)?;
                less_than(
                    "inner_diameter_mm",
                    inner_diameter_mm,
                    outer_diameter_mm,
                    "the outer diameter",
                )
            }
        }
    }

    /// Overall `(width, height)` in the reference orientation
    pub fn bounding_box(&self) -> (f64, f64) {
        match *self {
            Shape::Rectangular { width_mm, height_mm }
            | Shape::LShape { width_mm, height_mm, .. }
            | Shape::UShape { width_mm, height_mm, .. }
            | Shape::BoxShape { width_mm, height_mm, .. } => (width_mm, height_mm),
            Shape::Tee {
                flange_width_mm,
                height_mm,
                ..
            } => (flange_width_mm, height_mm),
            Shape::IShape {
                top_flange_width_mm,
                bottom_flange_width_mm,
                height_mm,
                ..
            } => (top_flange_width_mm.max(bottom_flange_width_mm), height_mm),
            Shape::Circular { diameter_mm } => (diameter_mm, diameter_mm),
            Shape::HollowCircular {
                outer_diameter_mm, ..
            } => (outer_diameter_mm, outer_diameter_mm),
        }
    }

    /// Leaf decomposition in the reference orientation
    pub fn leaves(&self) -> Vec<Leaf> {
        match *self {
            Shape::Rectangular { width_mm, height_mm } => {
                vec![Leaf::rect(0.0, width_mm, 0.0, height_mm)]
            }
            Shape::Tee {
                flange_width_mm: b,
                flange_thickness_mm: t,
                web_width_mm: bw,
                height_mm: h,
            } => vec![
                Leaf::rect(0.0, b, 0.0, t),
                Leaf::rect((b - bw) / 2.0, (b + bw) / 2.0, t, h),
            ],
            Shape::IShape {
                top_flange_width_mm: bt,
                top_flange_thickness_mm: tt,
                web_width_mm: bw,
                bottom_flange_width_mm: bb,
                bottom_flange_thickness_mm: tb,
                height_mm: h,
            } => {
                let w = bt.max(bb);
                vec![
                    Leaf::rect((w - bt) / 2.0, (w + bt) / 2.0, 0.0, tt),
                    Leaf::rect((w - bw) / 2.0, (w + bw) / 2.0, tt, h - tb),
                    Leaf::rect((w - bb) / 2.0, (w + bb) / 2.0, h - tb, h),
                ]
            }
            Shape::LShape {
                width_mm: b,
                height_mm: h,
                leg_thickness_mm: tl,
                flange_thickness_mm: tf,
            } => vec![Leaf::rect(0.0, tl, 0.0, h - tf), Leaf::rect(0.0, b, h - tf, h)],
            Shape::UShape {
                width_mm: b,
                height_mm: h,
                wall_thickness_mm: t,
                base_thickness_mm: tb,
            } => vec![
                Leaf::rect(0.0, t, 0.0, h - tb),
                Leaf::rect(b - t, b, 0.0, h - tb),
                Leaf::rect(0.0, b, h - tb, h),
            ],
            Shape::BoxShape {
                width_mm: b,
                height_mm: h,
                wall_thickness_mm: t,
                top_thickness_mm: tt,
                bottom_thickness_mm: tb,
            } => vec![Leaf::rect(0.0, b, 0.0, h), Leaf::void_rect(t, b - t, tt, h - tb)],
            Shape::Circular { diameter_mm } => {
                let r = diameter_mm / 2.0;
                vec![Leaf::disk(r, r, r)]
            }
            Shape::HollowCircular {
                outer_diameter_mm,
                inner_diameter_mm,
            } => {
                let r = outer_diameter_mm / 2.0;
                vec![Leaf::disk(r, r, r), Leaf::void_disk(r, r, inner_diameter_mm / 2.0)]
            }
        }
    }

    /// Validated profile in the reference orientation
    pub fn profile(&self) -> CalcResult<Profile> {
        self.validate()?;
        let (w, h) = self.bounding_box();
        Ok(Profile::new(self.leaves(), w, h))
    }

    /// Rectangle or T in its reference orientation, for closed-form solutions:
    /// `(flange width, flange thickness, web width)`; a rectangle reports a
    /// flange as deep as the section.
    pub fn as_flanged(&self) -> Option<(f64, f64, f64)> {
        match *self {
            Shape::Rectangular { width_mm, height_mm } => Some((width_mm, height_mm, width_mm)),
            Shape::Tee {
                flange_width_mm,
                flange_thickness_mm,
                web_width_mm,
                ..
            } => Some((flange_width_mm, flange_thickness_mm, web_width_mm)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn all_shapes() -> Vec<Shape> {
        vec![
            Shape::Rectangular { width_mm: 300.0, height_mm: 500.0 },
            Shape::Tee {
                flange_width_mm: 800.0,
                flange_thickness_mm: 120.0,
                web_width_mm: 250.0,
                height_mm: 600.0,
            },
            Shape::IShape {
                top_flange_width_mm: 600.0,
                top_flange_thickness_mm: 120.0,
                web_width_mm: 150.0,
                bottom_flange_width_mm: 400.0,
                bottom_flange_thickness_mm: 150.0,
                height_mm: 900.0,
            },
            Shape::LShape {
                width_mm: 500.0,
                height_mm: 600.0,
                leg_thickness_mm: 200.0,
                flange_thickness_mm: 150.0,
            },
            Shape::UShape {
                width_mm: 800.0,
                height_mm: 500.0,
                wall_thickness_mm: 120.0,
                base_thickness_mm: 150.0,
            },
            Shape::BoxShape {
                width_mm: 1000.0,
                height_mm: 800.0,
                wall_thickness_mm: 150.0,
                top_thickness_mm: 180.0,
                bottom_thickness_mm: 150.0,
            },
            Shape::Circular { diameter_mm: 400.0 },
            Shape::HollowCircular {
                outer_diameter_mm: 800.0,
                inner_diameter_mm: 500.0,
            },
        ]
    }

    #[test]
    fn test_all_shapes_valid() {
        for shape in all_shapes() {
            let profile = shape.profile().unwrap();
            let gross = profile.gross_properties();
            assert!(gross.area_mm2 > 0.0, "{}", shape.display_name());
            assert!(gross.ix_mm4 > 0.0);
            assert!(gross.centroid_from_top_mm > 0.0);
            assert!(gross.centroid_from_top_mm < profile.height);
        }
    }

    #[test]
    fn test_tee_centroid() {
        let profile = all_shapes()[1].profile().unwrap();
        let g = profile.gross_properties();
        // flange 800x120 at 60, web 250x480 at 360
        let expected = (96_000.0 * 60.0 + 120_000.0 * 360.0) / 216_000.0;
        assert_relative_eq!(g.centroid_from_top_mm, expected, max_relative = 1e-12);
        assert_relative_eq!(g.centroid_from_left_mm, 400.0, max_relative = 1e-12);
    }

    #[test]
    fn test_hollow_circle() {
        let profile = all_shapes()[7].profile().unwrap();
        let g = profile.gross_properties();
        assert_relative_eq!(g.area_mm2, PI * (400.0_f64.powi(2) - 250.0_f64.powi(2)), max_relative = 1e-12);
        assert_relative_eq!(g.ix_mm4, PI * (800.0_f64.powi(4) - 500.0_f64.powi(4)) / 64.0, max_relative = 1e-12);
        // through the void: outer chord minus inner chord
        let w = profile.width_at_depth(400.0).unwrap();
        assert_relative_eq!(w, 300.0, max_relative = 1e-9);
        // above the void: outer chord only
        let w_top = profile.width_at_depth(100.0).unwrap();
        assert_relative_eq!(w_top, 2.0 * (400.0_f64.powi(2) - 300.0_f64.powi(2)).sqrt());
    }

    #[test]
    fn test_u_widths() {
        let profile = all_shapes()[4].profile().unwrap();
        assert_eq!(profile.width_at_depth(100.0).unwrap(), 240.0);
        assert_eq!(profile.width_at_depth(400.0).unwrap(), 800.0);
    }

    #[test]
    fn test_l_widths() {
        let profile = all_shapes()[3].profile().unwrap();
        assert_eq!(profile.width_at_depth(10.0).unwrap(), 200.0);
        assert_eq!(profile.width_at_depth(500.0).unwrap(), 500.0);
        let g = profile.gross_properties();
        // asymmetric: centroid left of mid-width
        assert!(g.centroid_from_left_mm < 250.0);
        assert!(g.ixy_mm4.abs() > 0.0);
    }

    #[test]
    fn test_invalid_dimensions() {
        let bad = [
            Shape::Rectangular { width_mm: 0.0, height_mm: 500.0 },
            Shape::Tee {
                flange_width_mm: 200.0,
                flange_thickness_mm: 120.0,
                web_width_mm: 250.0,
                height_mm: 600.0,
            },
            Shape::UShape {
                width_mm: 200.0,
                height_mm: 500.0,
                wall_thickness_mm: 100.0,
                base_thickness_mm: 150.0,
            },
            Shape::HollowCircular {
                outer_diameter_mm: 400.0,
                inner_diameter_mm: 400.0,
            },
        ];
        for shape in bad {
            assert_eq!(shape.validate().unwrap_err().error_code(), "INVALID_INPUT");
        }
    }

    #[test]
    fn test_serialization() {
        let json = r#"{ "kind": "circular", "diameter_mm": 350.0 }"#;
        let shape: Shape = serde_json::from_str(json).unwrap();
        assert_eq!(shape, Shape::Circular { diameter_mm: 350.0 });
    }
}
