//! Availability reporting for the on-device text model.

use serde::{Deserialize, Serialize};

/// Whether the on-device model can currently serve requests.
///
/// The unavailable variant carries a reason code drawn from the fixed set
/// the native layer reports, so hosts can explain the state to the user
/// (e.g. prompt them to enable Apple Intelligence) without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ModelAvailability {
    Available,
    #[serde(rename_all = "camelCase")]
    Unavailable { reason_code: UnavailableReason },
}

/// Reason the model is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnavailableReason {
    /// The hardware cannot run the on-device model.
    DeviceNotEligible,
    /// The device is eligible but Apple Intelligence is switched off.
    AppleIntelligenceNotEnabled,
    /// The model assets are still downloading or warming up.
    ModelNotReady,
    /// The native layer reported an unrecognized reason.
    Unknown,
    /// The platform has no native model runtime at all.
    Unsupported,
}

impl ModelAvailability {
    /// Convenience predicate for the boolean availability query.
    pub fn is_available(&self) -> bool {
        matches!(self, ModelAvailability::Available)
    }
}
