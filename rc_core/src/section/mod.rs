//! # Section Geometry
//!
//! A [`Section`] is a concrete [`Shape`] plus its reinforcement. It exposes
//! gross properties (concrete only), homogenized properties (steel as
//! `n`-times concrete) and the resolved profile the equilibrium solver
//! integrates over.
//!
//! ## Caching
//!
//! The resolved geometry is recomputed eagerly on every mutation
//! ([`Section::add_bar`], [`Section::rotate_90`], [`Section::set_modular_ratio`])
//! and each mutation bumps [`Section::generation`], so callers holding derived
//! data can tell when it went stale.
//!
//! ## Example
//!
//! ```rust
//! use rc_core::section::{BarRole, ReinforcementBar, Section, Shape};
//!
//! let mut section = Section::new(Shape::Rectangular { width_mm: 300.0, height_mm: 500.0 }).unwrap();
//! section.add_bar(ReinforcementBar::row(16.0, 4, 462.0, BarRole::Tension)).unwrap();
//!
//! let h = section.homogenized(10.0);
//! assert!(h.centroid_from_top_mm > 250.0);
//! ```

pub mod geometry;
pub mod reinforcement;
pub mod shape;

pub use geometry::{AreaMoments, GrossProperties, Leaf, Profile};
pub use reinforcement::{BarPlacement, BarRole, ReinforcementBar, SteelPoint};
pub use shape::Shape;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::materials::Materials;

/// Default concrete cover to the bar surface (mm)
pub const DEFAULT_COVER_MM: f64 = 30.0;

fn default_cover() -> f64 {
    DEFAULT_COVER_MM
}

/// Wire form of a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSpec {
    pub shape: Shape,
    #[serde(default)]
    pub bars: Vec<ReinforcementBar>,
    #[serde(default = "default_cover")]
    pub cover_mm: f64,
    /// Overrides Es/Ec when present
    #[serde(default)]
    pub modular_ratio: Option<f64>,
    /// Counter-clockwise quarter turns applied to the reference orientation
    #[serde(default)]
    pub quarter_turns: u8,
}

/// Properties of the uncracked section with steel counted as `n·As`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomogenizedProperties {
    pub modular_ratio: f64,
    pub area_mm2: f64,
    pub centroid_from_top_mm: f64,
    pub centroid_from_left_mm: f64,
    pub ix_mm4: f64,
    pub iy_mm4: f64,
    pub ixy_mm4: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct Resolved {
    profile: Profile,
    steel: Vec<SteelPoint>,
    gross: GrossProperties,
    integrated: GrossProperties,
}

fn resolve(shape: &Shape, bars: &[ReinforcementBar], cover_mm: f64, quarter_turns: u8) -> CalcResult<Resolved> {
    if !(cover_mm >= 0.0 && cover_mm.is_finite()) {
        return Err(CalcError::invalid_input("cover_mm", cover_mm.to_string(), "Cover cannot be negative"));
    }
    let mut profile = shape.profile()?;
    let mut steel = Vec::new();
    for bar in bars {
        steel.extend(bar.steel_points(&profile, cover_mm)?);
    }
    for _ in 0..quarter_turns % 4 {
        let w = profile.width;
        steel = steel.iter().map(|p| p.rotated_ccw(w)).collect();
        profile = profile.rotated_ccw();
    }
    let gross = profile.gross_properties();
    let integrated = profile.integrated_properties();
    Ok(Resolved {
        profile,
        steel,
        gross,
        integrated,
    })
}

/// A reinforced-concrete cross-section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SectionSpec", into = "SectionSpec")]
pub struct Section {
    shape: Shape,
    bars: Vec<ReinforcementBar>,
    cover_mm: f64,
    modular_ratio: Option<f64>,
    quarter_turns: u8,
    generation: u64,
    resolved: Resolved,
}

impl TryFrom<SectionSpec> for Section {
    type Error = CalcError;

    fn try_from(spec: SectionSpec) -> CalcResult<Self> {
        Section::from_spec(spec)
    }
}

impl From<Section> for SectionSpec {
    fn from(section: Section) -> Self {
        SectionSpec {
            shape: section.shape,
            bars: section.bars,
            cover_mm: section.cover_mm,
            modular_ratio: section.modular_ratio,
            quarter_turns: section.quarter_turns,
        }
    }
}

impl Section {
    /// Unreinforced section in its reference orientation
    pub fn new(shape: Shape) -> CalcResult<Self> {
        Self::from_spec(SectionSpec {
            shape,
            bars: Vec::new(),
            cover_mm: DEFAULT_COVER_MM,
            modular_ratio: None,
            quarter_turns: 0,
        })
    }

    pub fn from_spec(spec: SectionSpec) -> CalcResult<Self> {
        validate_modular_ratio(spec.modular_ratio)?;
        let resolved = resolve(&spec.shape, &spec.bars, spec.cover_mm, spec.quarter_turns)?;
        Ok(Section {
            shape: spec.shape,
            bars: spec.bars,
            cover_mm: spec.cover_mm,
            modular_ratio: spec.modular_ratio,
            quarter_turns: spec.quarter_turns % 4,
            generation: 0,
            resolved,
        })
    }

    /// Add a group of bars. On error the section is left unchanged.
    pub fn add_bar(&mut self, bar: ReinforcementBar) -> CalcResult<()> {
        self.bars.push(bar);
        match resolve(&self.shape, &self.bars, self.cover_mm, self.quarter_turns) {
            Ok(resolved) => {
                self.resolved = resolved;
                self.generation += 1;
                Ok(())
            }
            Err(e) => {
                self.bars.pop();
                Err(e)
            }
        }
    }

    /// Add a horizontal layer of longitudinal bars at `depth_mm` from the top
    /// edge of the reference orientation.
    pub fn add_layer(&mut self, diameter_mm: f64, count: u32, depth_mm: f64, role: BarRole) -> CalcResult<()> {
        self.add_bar(ReinforcementBar::row(diameter_mm, count, depth_mm, role))
    }

    /// Quarter turn counter-clockwise; the bars turn with the concrete.
    pub fn rotate_90(&mut self) {
        let w = self.resolved.profile.width;
        self.resolved.steel = self.resolved.steel.iter().map(|p| p.rotated_ccw(w)).collect();
        self.resolved.profile = self.resolved.profile.rotated_ccw();
        self.resolved.gross = self.resolved.profile.gross_properties();
        self.quarter_turns = (self.quarter_turns + 1) % 4;
        self.generation += 1;
    }

    /// Copy turned a quarter counter-clockwise
    pub fn rotated(&self) -> Section {
        let mut s = self.clone();
        s.rotate_90();
        s
    }

    pub fn set_modular_ratio(&mut self, modular_ratio: Option<f64>) -> CalcResult<()> {
        validate_modular_ratio(modular_ratio)?;
        self.modular_ratio = modular_ratio;
        self.generation += 1;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn bars(&self) -> &[ReinforcementBar] {
        &self.bars
    }

    pub fn cover_mm(&self) -> f64 {
        self.cover_mm
    }

    pub fn quarter_turns(&self) -> u8 {
        self.quarter_turns
    }

    /// Bumped by every mutation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn profile(&self) -> &Profile {
        &self.resolved.profile
    }

    /// Longitudinal bars in the current orientation
    pub fn steel_points(&self) -> &[SteelPoint] {
        &self.resolved.steel
    }

    pub fn gross(&self) -> &GrossProperties {
        &self.resolved.gross
    }

    pub fn width(&self) -> f64 {
        self.resolved.profile.width
    }

    pub fn height(&self) -> f64 {
        self.resolved.profile.height
    }

    pub fn area(&self) -> f64 {
        self.resolved.gross.area_mm2
    }

    pub fn centroid_from_top(&self) -> f64 {
        self.resolved.gross.centroid_from_top_mm
    }

    /// `(Ix, Iy)` of the concrete about its centroid
    pub fn second_moment_about_centroid(&self) -> (f64, f64) {
        (self.resolved.gross.ix_mm4, self.resolved.gross.iy_mm4)
    }

    pub fn section_modulus_top(&self) -> f64 {
        self.resolved.gross.section_modulus_top_mm3()
    }

    pub fn section_modulus_bottom(&self) -> f64 {
        self.resolved.gross.section_modulus_bottom_mm3()
    }

    pub fn width_at_depth(&self, y: f64) -> CalcResult<f64> {
        self.resolved.profile.width_at_depth(y)
    }

    pub fn contains(&self, z: f64, y: f64) -> bool {
        self.resolved.profile.contains(z, y)
    }

    // -------------------------------------------------------------------------
    // Reinforcement sums
    // -------------------------------------------------------------------------

    /// Total longitudinal steel (mm²)
    pub fn steel_area(&self) -> f64 {
        self.resolved.steel.iter().map(|p| p.area_mm2).sum()
    }

    /// Longitudinal steel of one role (mm²)
    pub fn steel_area_by_role(&self, role: BarRole) -> f64 {
        self.resolved
            .steel
            .iter()
            .filter(|p| p.role == role)
            .map(|p| p.area_mm2)
            .sum()
    }

    /// Σ As·y about the top edge (mm³)
    pub fn steel_first_moment(&self) -> f64 {
        self.resolved.steel.iter().map(|p| p.area_mm2 * p.y).sum()
    }

    /// Depth of the centroid of the bars below the gross centroid, if any
    pub fn effective_depth(&self) -> Option<f64> {
        let yg = self.centroid_from_top();
        let (a, s) = self
            .resolved
            .steel
            .iter()
            .filter(|p| p.y > yg)
            .fold((0.0, 0.0), |(a, s), p| (a + p.area_mm2, s + p.area_mm2 * p.y));
        (a > 0.0).then(|| s / a)
    }

    /// Stirrup groups in declaration order
    pub fn stirrups(&self) -> impl Iterator<Item = &ReinforcementBar> {
        self.bars.iter().filter(|b| matches!(b.role, BarRole::Stirrup { .. }))
    }

    pub fn bent_bars(&self) -> impl Iterator<Item = &ReinforcementBar> {
        self.bars.iter().filter(|b| matches!(b.role, BarRole::BentBar { .. }))
    }

    /// Largest longitudinal bar diameter (mm), 0 without bars
    pub fn max_bar_diameter(&self) -> f64 {
        self.resolved.steel.iter().map(|p| p.diameter_mm).fold(0.0, f64::max)
    }

    // -------------------------------------------------------------------------
    // Homogenization
    // -------------------------------------------------------------------------

    /// The override when set, otherwise Es/Ec of the materials
    pub fn modular_ratio_for(&self, materials: &Materials) -> f64 {
        self.modular_ratio.unwrap_or_else(|| materials.modular_ratio())
    }

    pub fn modular_ratio_override(&self) -> Option<f64> {
        self.modular_ratio
    }

    /// Uncracked homogenized properties: each bar adds `(n − 1)·As` at its
    /// position, since the concrete it displaces is already counted.
    pub fn homogenized(&self, n: f64) -> HomogenizedProperties {
        homogenize(&self.resolved.gross, &self.resolved.steel, n)
    }

    /// Homogenized properties over the polygon outlines the solver integrates
    pub(crate) fn integrated_homogenized(&self, n: f64) -> HomogenizedProperties {
        homogenize(&self.resolved.integrated, &self.resolved.steel, n)
    }
}

fn homogenize(g: &GrossProperties, steel: &[SteelPoint], n: f64) -> HomogenizedProperties {
    let k = n - 1.0;
    let mut area = g.area_mm2;
    let mut sz = g.area_mm2 * g.centroid_from_left_mm;
    let mut sy = g.area_mm2 * g.centroid_from_top_mm;
    for p in steel {
        area += k * p.area_mm2;
        sz += k * p.area_mm2 * p.z;
        sy += k * p.area_mm2 * p.y;
    }
    let zc = sz / area;
    let yc = sy / area;

    let dy = g.centroid_from_top_mm - yc;
    let dz = g.centroid_from_left_mm - zc;
    let mut ix = g.ix_mm4 + g.area_mm2 * dy * dy;
    let mut iy = g.iy_mm4 + g.area_mm2 * dz * dz;
    let mut ixy = g.ixy_mm4 + g.area_mm2 * dz * dy;
    for p in steel {
        let a = k * p.area_mm2;
        ix += a * (p.y - yc).powi(2);
        iy += a * (p.z - zc).powi(2);
        ixy += a * (p.z - zc) * (p.y - yc);
    }

    HomogenizedProperties {
        modular_ratio: n,
        area_mm2: area,
        centroid_from_top_mm: yc,
        centroid_from_left_mm: zc,
        ix_mm4: ix,
        iy_mm4: iy,
        ixy_mm4: ixy,
    }
}

fn validate_modular_ratio(n: Option<f64>) -> CalcResult<()> {
    match n {
        Some(v) if !(v > 0.0 && v.is_finite()) => Err(CalcError::invalid_input(
            "modular_ratio",
            v.to_string(),
            "Modular ratio must be positive",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn beam() -> Section {
        let mut s = Section::new(Shape::Rectangular {
            width_mm: 300.0,
            height_mm: 500.0,
        })
        .unwrap();
        s.add_layer(16.0, 4, 462.0, BarRole::Tension).unwrap();
        s.add_layer(12.0, 2, 38.0, BarRole::Compression).unwrap();
        s
    }

    #[test]
    fn test_gross_rectangle() {
        let s = beam();
        assert_relative_eq!(s.area(), 150_000.0);
        assert_relative_eq!(s.centroid_from_top(), 250.0);
        assert_relative_eq!(s.second_moment_about_centroid().0, 3.125e9, max_relative = 1e-12);
        assert_relative_eq!(s.section_modulus_top(), 1.25e7, max_relative = 1e-12);
    }

    #[test]
    fn test_steel_sums() {
        let s = beam();
        let a_t = s.steel_area_by_role(BarRole::Tension);
        let a_c = s.steel_area_by_role(BarRole::Compression);
        assert_relative_eq!(a_t, 804.2477, epsilon = 1e-3);
        assert_relative_eq!(s.steel_area(), a_t + a_c, max_relative = 1e-12);
        assert_relative_eq!(s.steel_first_moment(), a_t * 462.0 + a_c * 38.0, max_relative = 1e-12);
        assert_relative_eq!(s.effective_depth().unwrap(), 462.0);
    }

    #[test]
    fn test_homogenized_adds_n_minus_one() {
        let mut s = Section::new(Shape::Rectangular {
            width_mm: 300.0,
            height_mm: 500.0,
        })
        .unwrap();
        s.add_layer(16.0, 4, 462.0, BarRole::Tension).unwrap();
        let h = s.homogenized(10.0);
        let extra = 9.0 * s.steel_area();
        assert_relative_eq!(h.area_mm2, 150_000.0 + extra, max_relative = 1e-12);
        let yc = (150_000.0 * 250.0 + extra * 462.0) / (150_000.0 + extra);
        assert_relative_eq!(h.centroid_from_top_mm, yc, max_relative = 1e-12);
        // n = 1 leaves the gross section
        let h1 = s.homogenized(1.0);
        assert_relative_eq!(h1.ix_mm4, s.gross().ix_mm4, max_relative = 1e-12);
    }

    #[test]
    fn test_failed_add_leaves_section_unchanged() {
        let mut s = beam();
        let generation = s.generation();
        let before = s.steel_area();
        assert!(s.add_layer(16.0, 2, 700.0, BarRole::Tension).is_err());
        assert_eq!(s.generation(), generation);
        assert_eq!(s.bars().len(), 2);
        assert_eq!(s.steel_area(), before);
    }

    #[test]
    fn test_rotation_moves_bars() {
        let s = beam();
        let r = s.rotated();
        assert_eq!(r.quarter_turns(), 1);
        assert_eq!(r.generation(), s.generation() + 1);
        assert_relative_eq!(r.width(), 500.0);
        assert_relative_eq!(r.height(), 300.0);
        for p in r.steel_points() {
            assert!(r.contains(p.z, p.y));
        }
        // the tension row becomes a column on the right
        let tension: Vec<_> = r
            .steel_points()
            .iter()
            .filter(|p| p.role == BarRole::Tension)
            .collect();
        assert!(tension.iter().all(|p| p.z == 462.0));
        let (ix, iy) = s.second_moment_about_centroid();
        let (rx, ry) = r.second_moment_about_centroid();
        assert_relative_eq!(ix, ry, max_relative = 1e-12);
        assert_relative_eq!(iy, rx, max_relative = 1e-12);
    }

    #[test]
    fn test_four_turns_identity() {
        let s = beam();
        let mut r = s.clone();
        for _ in 0..4 {
            r.rotate_90();
        }
        assert_eq!(r.quarter_turns(), 0);
        for (a, b) in s.steel_points().iter().zip(r.steel_points()) {
            assert_relative_eq!(a.z, b.z, epsilon = 1e-9);
            assert_relative_eq!(a.y, b.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_modular_ratio_override() {
        let mut s = beam();
        assert!(s.set_modular_ratio(Some(0.0)).is_err());
        s.set_modular_ratio(Some(15.0)).unwrap();
        assert_eq!(s.modular_ratio_override(), Some(15.0));
    }

    #[test]
    fn test_serde_round_trip_through_spec() {
        let s = beam().rotated();
        let json = serde_json::to_string(&s).unwrap();
        let back: Section = serde_json::from_str(&json).unwrap();
        assert_eq!(back.quarter_turns(), 1);
        assert_relative_eq!(back.steel_area(), s.steel_area(), max_relative = 1e-12);
    }

    #[test]
    fn test_deserialize_rejects_bad_bar() {
        let json = r#"{
            "shape": { "kind": "rectangular", "width_mm": 300, "height_mm": 500 },
            "bars": [ { "diameter_mm": 16, "count": 2, "role": { "kind": "tension" },
                        "placement": { "layout": "row", "depth_mm": 800 } } ]
        }"#;
        assert!(serde_json::from_str::<Section>(json).is_err());
    }
}
