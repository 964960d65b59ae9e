//! Catalog file format.
//!
//! Curves are stored column-wise, matching how vendor exports arrive:
//!
//! ```yaml
//! version: 1
//! pumps:
//!   - pump_code: ES-100-250
//!     pump_type: End Suction
//!     specifications: { test_speed_rpm: 1450, min_speed_rpm: 1200, max_speed_rpm: 1750 }
//!     curves:
//!       - impeller_diameter_mm: 250
//!         flow_m3hr: [100, 200, 300]
//!         head_m: [40, 35, 28]
//!         efficiency_pct: [70, 78, 74]
//! ```

use crate::error::{CatalogError, CatalogResult};
use crate::model::{PerformanceCurve, PerformancePoint, PumpSpecifications};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogDef {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub pumps: Vec<PumpDef>,
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PumpDef {
    pub pump_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pump_type: Option<String>,
    #[serde(default)]
    pub specifications: PumpSpecifications,
    #[serde(default)]
    pub curves: Vec<CurveDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurveDef {
    pub impeller_diameter_mm: f64,
    pub flow_m3hr: Vec<f64>,
    pub head_m: Vec<f64>,
    pub efficiency_pct: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_kw: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npshr_m: Option<Vec<f64>>,
}

impl CurveDef {
    /// Zip the columns into a validated curve.
    ///
    /// # Errors
    /// Mismatched column lengths, or anything [`PerformanceCurve::new`]
    /// rejects.
    pub fn to_curve(&self) -> CatalogResult<PerformanceCurve> {
        let n = self.flow_m3hr.len();
        check_len("head_m", n, self.head_m.len())?;
        check_len("efficiency_pct", n, self.efficiency_pct.len())?;
        if let Some(power) = &self.power_kw {
            check_len("power_kw", n, power.len())?;
        }
        if let Some(npshr) = &self.npshr_m {
            check_len("npshr_m", n, npshr.len())?;
        }

        let points = (0..n)
            .map(|i| PerformancePoint {
                flow_m3hr: self.flow_m3hr[i],
                head_m: self.head_m[i],
                efficiency_pct: self.efficiency_pct[i],
                power_kw: self.power_kw.as_ref().map(|v| v[i]),
                npshr_m: self.npshr_m.as_ref().map(|v| v[i]),
            })
            .collect();

        PerformanceCurve::new(self.impeller_diameter_mm, points)
    }
}

fn check_len(field: &'static str, expected: usize, got: usize) -> CatalogResult<()> {
    if expected == got {
        Ok(())
    } else {
        Err(CatalogError::MismatchedLengths {
            field,
            expected,
            got,
        })
    }
}
