//! Static radio telemetry captured once at startup.
use serde::Serialize;

use crate::meshtastic::RadioConfig;

/// Locally known radio configuration quoted in every reply.
///
/// Built once from whatever the transport could report and never mutated
/// afterwards; any field may legitimately be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TelemetrySnapshot {
    tx_power_dbm: Option<i32>,
    region: Option<String>,
    spreading_factor: Option<u32>,
    bandwidth_khz: Option<u32>,
}

impl TelemetrySnapshot {
    pub fn new(
        tx_power_dbm: Option<i32>,
        region: Option<String>,
        spreading_factor: Option<u32>,
        bandwidth_khz: Option<u32>,
    ) -> Self {
        Self {
            tx_power_dbm,
            region: region.filter(|r| !r.trim().is_empty()),
            spreading_factor,
            bandwidth_khz,
        }
    }

    pub fn capture(radio: &RadioConfig) -> Self {
        Self::new(
            radio.tx_power_dbm,
            radio.region.clone(),
            radio.spreading_factor,
            radio.bandwidth_khz,
        )
    }

    pub fn tx_power_dbm(&self) -> Option<i32> {
        self.tx_power_dbm
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn spreading_factor(&self) -> Option<u32> {
        self.spreading_factor
    }

    pub fn bandwidth_khz(&self) -> Option<u32> {
        self.bandwidth_khz
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_region_is_absent() {
        let snap = TelemetrySnapshot::new(Some(20), Some("  ".into()), None, None);
        assert_eq!(snap.region(), None);
        assert_eq!(snap.tx_power_dbm(), Some(20));
        assert!(!snap.is_empty());
        assert!(TelemetrySnapshot::default().is_empty());
    }

    #[test]
    fn capture_copies_radio_fields() {
        let radio = RadioConfig {
            tx_power_dbm: Some(30),
            region: Some("EU_868".into()),
            spreading_factor: Some(11),
            bandwidth_khz: Some(250),
        };
        let snap = TelemetrySnapshot::capture(&radio);
        assert_eq!(snap.region(), Some("EU_868"));
        assert_eq!(snap.spreading_factor(), Some(11));
        assert_eq!(snap.bandwidth_khz(), Some(250));
    }
}
