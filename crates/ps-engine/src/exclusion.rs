//! Why a pump was excluded from a selection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of exclusion reasons. A pump may carry several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExclusionReason {
    Undertrim,
    Overtrim,
    Underspeed,
    Overspeed,
    HeadNotMet,
    EfficiencyTooLow,
    NoPerformanceData,
    NpshInsufficient,
    CombinedLimitsExceeded,
    FlowOutOfRange,
    /// Catch-all, used only when nothing more specific applies.
    EnvelopeExceeded,
}

impl ExclusionReason {
    pub fn code(self) -> &'static str {
        match self {
            Self::Undertrim => "UNDERTRIM",
            Self::Overtrim => "OVERTRIM",
            Self::Underspeed => "UNDERSPEED",
            Self::Overspeed => "OVERSPEED",
            Self::HeadNotMet => "HEAD_NOT_MET",
            Self::EfficiencyTooLow => "EFFICIENCY_TOO_LOW",
            Self::NoPerformanceData => "NO_PERFORMANCE_DATA",
            Self::NpshInsufficient => "NPSH_INSUFFICIENT",
            Self::CombinedLimitsExceeded => "COMBINED_LIMITS_EXCEEDED",
            Self::FlowOutOfRange => "FLOW_OUT_OF_RANGE",
            Self::EnvelopeExceeded => "ENVELOPE_EXCEEDED",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Undertrim => "impeller would need trimming below the allowed minimum",
            Self::Overtrim => "impeller would exceed the largest available diameter",
            Self::Underspeed => "required speed is below the allowed minimum",
            Self::Overspeed => "required speed is above the allowed maximum",
            Self::HeadNotMet => "pump cannot deliver the required head",
            Self::EfficiencyTooLow => "efficiency at the duty point is below the floor",
            Self::NoPerformanceData => "no usable performance data at the duty point",
            Self::NpshInsufficient => "NPSH required is not below NPSH available",
            Self::CombinedLimitsExceeded => "trim and speed change together exceed the combined limits",
            Self::FlowOutOfRange => "duty flow lies outside the curve range",
            Self::EnvelopeExceeded => "duty point lies outside the pump's operating envelope",
        }
    }
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
