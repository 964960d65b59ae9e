//! In-memory catalog model.
//!
//! Built once when a catalog loads and read-only afterwards. Curves guarantee
//! their invariants at construction, so the engine never re-checks point
//! counts or flow ordering.

use crate::error::{CatalogError, CatalogResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// One measured operating condition of an impeller at the test speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformancePoint {
    pub flow_m3hr: f64,
    pub head_m: f64,
    /// Percentage in `[0, 100]`.
    pub efficiency_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_kw: Option<f64>,
    /// `None` (or a stored 0) means the vendor gave no NPSH data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npshr_m: Option<f64>,
}

impl PerformancePoint {
    pub fn new(flow_m3hr: f64, head_m: f64, efficiency_pct: f64) -> Self {
        Self {
            flow_m3hr,
            head_m,
            efficiency_pct,
            power_kw: None,
            npshr_m: None,
        }
    }

    pub fn with_power(mut self, power_kw: f64) -> Self {
        self.power_kw = Some(power_kw);
        self
    }

    pub fn with_npshr(mut self, npshr_m: f64) -> Self {
        self.npshr_m = Some(npshr_m);
        self
    }

    /// NPSH required, if the point actually carries a requirement.
    pub fn npshr(&self) -> Option<f64> {
        self.npshr_m.filter(|v| *v > 0.0)
    }

    /// Tabulated shaft power, if present and positive.
    pub fn power(&self) -> Option<f64> {
        self.power_kw.filter(|v| *v > 0.0)
    }
}

/// Performance of one impeller diameter at the pump's test speed.
///
/// Points are sorted by flow with strictly increasing flow values; there are
/// always at least two of them.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceCurve {
    impeller_diameter_mm: f64,
    points: Vec<PerformancePoint>,
    flows: Vec<f64>,
    heads: Vec<f64>,
    efficiencies: Vec<f64>,
    powers: Option<Vec<f64>>,
    npshrs: Option<Vec<f64>>,
}

impl PerformanceCurve {
    /// Build a curve, sorting the points by flow.
    ///
    /// # Errors
    /// Fewer than two points, non-finite values, duplicate flows, negative
    /// flow or head, efficiency outside `[0, 100]`, or a non-positive
    /// impeller diameter.
    pub fn new(impeller_diameter_mm: f64, mut points: Vec<PerformancePoint>) -> CatalogResult<Self> {
        if !impeller_diameter_mm.is_finite() || impeller_diameter_mm <= 0.0 {
            return Err(CatalogError::InvalidValue {
                what: "impeller diameter (mm)",
                value: impeller_diameter_mm,
            });
        }
        if points.len() < 2 {
            return Err(CatalogError::TooFewPoints { got: points.len() });
        }

        for (index, p) in points.iter().enumerate() {
            check_value(p.flow_m3hr, "flow", index)?;
            check_value(p.head_m, "head", index)?;
            check_value(p.efficiency_pct, "efficiency", index)?;
            if let Some(power) = p.power_kw {
                check_value(power, "power", index)?;
            }
            if let Some(npshr) = p.npshr_m {
                check_value(npshr, "NPSHr", index)?;
            }
            if p.flow_m3hr < 0.0 {
                return Err(CatalogError::InvalidValue {
                    what: "flow (m3/h)",
                    value: p.flow_m3hr,
                });
            }
            if p.head_m < 0.0 {
                return Err(CatalogError::InvalidValue {
                    what: "head (m)",
                    value: p.head_m,
                });
            }
            if !(0.0..=100.0).contains(&p.efficiency_pct) {
                return Err(CatalogError::InvalidValue {
                    what: "efficiency (%)",
                    value: p.efficiency_pct,
                });
            }
        }

        points.sort_by(|a, b| a.flow_m3hr.total_cmp(&b.flow_m3hr));
        if let Some(pair) = points.windows(2).find(|w| w[0].flow_m3hr >= w[1].flow_m3hr) {
            return Err(CatalogError::DuplicateFlow {
                flow: pair[1].flow_m3hr,
            });
        }

        let flows = points.iter().map(|p| p.flow_m3hr).collect();
        let heads = points.iter().map(|p| p.head_m).collect();
        let efficiencies = points.iter().map(|p| p.efficiency_pct).collect();
        let powers = points.iter().map(PerformancePoint::power).collect();
        let npshrs = points.iter().map(PerformancePoint::npshr).collect();

        Ok(Self {
            impeller_diameter_mm,
            points,
            flows,
            heads,
            efficiencies,
            powers,
            npshrs,
        })
    }

    pub fn impeller_diameter_mm(&self) -> f64 {
        self.impeller_diameter_mm
    }

    pub fn points(&self) -> &[PerformancePoint] {
        &self.points
    }

    pub fn flows(&self) -> &[f64] {
        &self.flows
    }

    pub fn heads(&self) -> &[f64] {
        &self.heads
    }

    pub fn efficiencies(&self) -> &[f64] {
        &self.efficiencies
    }

    /// Shaft power column, present only when every point tabulates it.
    pub fn tabulated_power(&self) -> Option<&[f64]> {
        self.powers.as_deref()
    }

    /// NPSHr column, present only when every point carries a positive value.
    pub fn npshr(&self) -> Option<&[f64]> {
        self.npshrs.as_deref()
    }

    pub fn has_complete_npsh(&self) -> bool {
        self.npshrs.is_some()
    }

    pub fn has_tabulated_power(&self) -> bool {
        self.powers.is_some()
    }

    /// `(min, max)` measured flow.
    pub fn flow_range(&self) -> (f64, f64) {
        (self.flows[0], self.flows[self.flows.len() - 1])
    }

    pub fn flow_span(&self) -> f64 {
        let (lo, hi) = self.flow_range();
        hi - lo
    }

    /// Measured point with the highest efficiency. Ties keep the lower flow.
    pub fn max_efficiency_point(&self) -> &PerformancePoint {
        let mut best = &self.points[0];
        for p in &self.points[1..] {
            if p.efficiency_pct > best.efficiency_pct {
                best = p;
            }
        }
        best
    }
}

fn check_value(v: f64, field: &'static str, index: usize) -> CatalogResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(CatalogError::NonFinite { field, index })
    }
}

/// Declared operating limits of a pump. Absent values mean "no declared
/// limit"; an absent test speed means speed variation cannot be evaluated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PumpSpecifications {
    pub test_speed_rpm: Option<f64>,
    pub min_speed_rpm: Option<f64>,
    pub max_speed_rpm: Option<f64>,
    pub min_impeller_mm: Option<f64>,
    pub max_impeller_mm: Option<f64>,
}

impl PumpSpecifications {
    pub fn with_test_speed(mut self, rpm: f64) -> Self {
        self.test_speed_rpm = Some(rpm);
        self
    }

    pub fn with_speed_range(mut self, min_rpm: f64, max_rpm: f64) -> Self {
        self.min_speed_rpm = Some(min_rpm);
        self.max_speed_rpm = Some(max_rpm);
        self
    }

    pub fn with_impeller_range(mut self, min_mm: f64, max_mm: f64) -> Self {
        self.min_impeller_mm = Some(min_mm);
        self.max_impeller_mm = Some(max_mm);
        self
    }
}

/// A catalog pump: a family of impeller curves plus declared limits.
#[derive(Debug, Clone, PartialEq)]
pub struct PumpModel {
    pub pump_code: String,
    pub manufacturer: Option<String>,
    pub pump_type: Option<String>,
    pub specifications: PumpSpecifications,
    pub curves: Vec<PerformanceCurve>,
}

impl PumpModel {
    pub fn new(pump_code: impl Into<String>, curves: Vec<PerformanceCurve>) -> Self {
        Self {
            pump_code: pump_code.into(),
            manufacturer: None,
            pump_type: None,
            specifications: PumpSpecifications::default(),
            curves,
        }
    }

    pub fn with_type(mut self, pump_type: impl Into<String>) -> Self {
        self.pump_type = Some(pump_type.into());
        self
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    pub fn with_specifications(mut self, specifications: PumpSpecifications) -> Self {
        self.specifications = specifications;
        self
    }

    /// Case-insensitive pump-type match. Pumps without a declared type never
    /// match a filter.
    pub fn is_type(&self, pump_type: &str) -> bool {
        self.pump_type
            .as_deref()
            .is_some_and(|t| t.trim().eq_ignore_ascii_case(pump_type.trim()))
    }

    /// Largest impeller among the curves.
    pub fn largest_impeller_mm(&self) -> Option<f64> {
        self.curves
            .iter()
            .map(PerformanceCurve::impeller_diameter_mm)
            .reduce(f64::max)
    }
}

/// Read-only collection of pumps keyed by `pump_code`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pumps: Vec<PumpModel>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// # Errors
    /// [`CatalogError::DuplicatePumpCode`] if two pumps share a code.
    pub fn new(pumps: Vec<PumpModel>) -> CatalogResult<Self> {
        let mut index = HashMap::with_capacity(pumps.len());
        for (i, pump) in pumps.iter().enumerate() {
            if index.insert(pump.pump_code.clone(), i).is_some() {
                return Err(CatalogError::DuplicatePumpCode(pump.pump_code.clone()));
            }
        }
        Ok(Self { pumps, index })
    }

    pub fn get(&self, pump_code: &str) -> Option<&PumpModel> {
        self.index.get(pump_code).map(|&i| &self.pumps[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PumpModel> {
        self.pumps.iter()
    }

    pub fn pumps(&self) -> &[PumpModel] {
        &self.pumps
    }

    pub fn len(&self) -> usize {
        self.pumps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pumps.is_empty()
    }

    pub fn curve_count(&self) -> usize {
        self.pumps.iter().map(|p| p.curves.len()).sum()
    }

    /// Distinct declared pump types, sorted.
    pub fn pump_types(&self) -> BTreeSet<&str> {
        self.pumps
            .iter()
            .filter_map(|p| p.pump_type.as_deref())
            .collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a PumpModel;
    type IntoIter = std::slice::Iter<'a, PumpModel>;

    fn into_iter(self) -> Self::IntoIter {
        self.pumps.iter()
    }
}
