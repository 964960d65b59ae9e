//! Duty point and selection request: the engine's input boundary.

use crate::error::{EngineError, EngineResult};
use serde::Serialize;

/// Required hydraulic duty. Flow and head are finite and positive by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DutyPoint {
    flow_m3hr: f64,
    head_m: f64,
}

impl DutyPoint {
    /// # Errors
    /// [`EngineError::InvalidDuty`] for a non-finite or non-positive value.
    pub fn new(flow_m3hr: f64, head_m: f64) -> EngineResult<Self> {
        check_positive("flow", flow_m3hr)?;
        check_positive("head", head_m)?;
        Ok(Self { flow_m3hr, head_m })
    }

    pub fn flow_m3hr(&self) -> f64 {
        self.flow_m3hr
    }

    pub fn head_m(&self) -> f64 {
        self.head_m
    }

    /// Head margin of `delivered_head_m` over the duty, in percent.
    pub fn head_margin_pct(&self, delivered_head_m: f64) -> f64 {
        (delivered_head_m - self.head_m) / self.head_m * 100.0
    }
}

fn check_positive(what: &'static str, value: f64) -> EngineResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidDuty { what, value })
    }
}

/// A catalog-wide selection request.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionRequest {
    pub duty: DutyPoint,
    /// Only pumps of this declared type are evaluated.
    pub pump_type: Option<String>,
    /// Truncate the ranked list after this many pumps.
    pub max_results: Option<usize>,
    /// NPSH available at the suction, when known.
    npsh_available_m: Option<f64>,
}

impl SelectionRequest {
    pub fn new(duty: DutyPoint) -> Self {
        Self {
            duty,
            pump_type: None,
            max_results: None,
            npsh_available_m: None,
        }
    }

    pub fn with_pump_type(mut self, pump_type: impl Into<String>) -> Self {
        self.pump_type = Some(pump_type.into());
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// # Errors
    /// [`EngineError::InvalidDuty`] if `npsh_available_m` is not finite and
    /// positive.
    pub fn with_npsh_available(mut self, npsh_available_m: f64) -> EngineResult<Self> {
        check_positive("NPSH available", npsh_available_m)?;
        self.npsh_available_m = Some(npsh_available_m);
        Ok(self)
    }

    pub fn npsh_available_m(&self) -> Option<f64> {
        self.npsh_available_m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duty_rejects_non_positive_values() {
        assert!(DutyPoint::new(200.0, 35.0).is_ok());
        assert!(DutyPoint::new(0.0, 35.0).is_err());
        assert!(DutyPoint::new(200.0, -1.0).is_err());
        assert!(DutyPoint::new(f64::NAN, 35.0).is_err());
        assert!(DutyPoint::new(200.0, f64::INFINITY).is_err());
    }

    #[test]
    fn head_margin() {
        let duty = DutyPoint::new(100.0, 40.0).unwrap();
        assert_eq!(duty.head_margin_pct(44.0), 10.0);
        assert_eq!(duty.head_margin_pct(40.0), 0.0);
    }

    #[test]
    fn request_builder() {
        let duty = DutyPoint::new(100.0, 40.0).unwrap();
        let req = SelectionRequest::new(duty)
            .with_pump_type("End Suction")
            .with_max_results(5)
            .with_npsh_available(6.0)
            .unwrap();
        assert_eq!(req.pump_type.as_deref(), Some("End Suction"));
        assert_eq!(req.max_results, Some(5));
        assert_eq!(req.npsh_available_m(), Some(6.0));
        assert!(SelectionRequest::new(duty).with_npsh_available(0.0).is_err());
    }
}
