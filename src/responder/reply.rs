//! Reply text assembly.
//!
//! The reply is a `" | "` joined list of present-only fields in a fixed order.
//! Listeners parse this line, so the order and labels must stay stable:
//!
//! ```text
//! RSSI -85 dBm | SNR 7.2 dB | Hops 2 | Ch 4 | TX 30 dBm | Reg EU_868 | (dBi: not measurable)
//! ```
use super::packet::{IncomingPacket, SignalValue};
use super::telemetry::TelemetrySnapshot;

pub const FIELD_DELIMITER: &str = " | ";

/// Antenna gain cannot be derived from received packets; always said last.
pub const DBI_DISCLAIMER: &str = "(dBi: not measurable)";

#[derive(Debug, Clone, Default)]
pub struct ReplyComposer {
    radio: TelemetrySnapshot,
}

impl ReplyComposer {
    pub fn new(radio: TelemetrySnapshot) -> Self {
        Self { radio }
    }

    pub fn compose(&self, packet: &IncomingPacket) -> String {
        let mut fields: Vec<String> = Vec::with_capacity(9);

        if let Some(rssi) = packet.rx_rssi {
            fields.push(format!("RSSI {} dBm", rssi));
        }
        if let Some(snr) = &packet.rx_snr {
            fields.push(format!("SNR {} dB", format_snr(snr)));
        }
        // Direct hop count wins over the remaining hop budget
        if let Some(hops) = packet.hops_away {
            fields.push(format!("Hops {}", hops));
        } else if let Some(limit) = packet.hop_limit {
            fields.push(format!("HopLimit {}", limit));
        }
        fields.push(format!("Ch {}", packet.channel));

        if let Some(tx) = self.radio.tx_power_dbm() {
            fields.push(format!("TX {} dBm", tx));
        }
        if let Some(region) = self.radio.region() {
            fields.push(format!("Reg {}", region));
        }
        if let Some(sf) = self.radio.spreading_factor() {
            fields.push(format!("SF {}", sf));
        }
        if let Some(bw) = self.radio.bandwidth_khz() {
            fields.push(format!("BW {} kHz", bw));
        }
        fields.push(DBI_DISCLAIMER.to_string());

        fields.join(FIELD_DELIMITER)
    }
}

/// One decimal place for a finite number; text and non-finite values are printed as received.
pub fn format_snr(value: &SignalValue) -> String {
    match value {
        SignalValue::Number(v) if v.is_finite() => format!("{:.1}", v),
        SignalValue::Text(s) => s.clone(),
        raw => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_reply_has_channel_and_disclaimer() {
        let composer = ReplyComposer::default();
        let p = IncomingPacket::text(1, 0, "hi");
        assert_eq!(composer.compose(&p), "Ch 0 | (dBi: not measurable)");
    }

    #[test]
    fn hop_limit_used_only_without_hops_away() {
        let composer = ReplyComposer::default();
        let mut p = IncomingPacket::text(1, 2, "hi");
        p.hop_limit = Some(3);
        assert_eq!(composer.compose(&p), "HopLimit 3 | Ch 2 | (dBi: not measurable)");
        p.hops_away = Some(0);
        assert_eq!(composer.compose(&p), "Hops 0 | Ch 2 | (dBi: not measurable)");
    }

    #[test]
    fn snr_fallbacks() {
        assert_eq!(format_snr(&SignalValue::Number(-3.04)), "-3.0");
        assert_eq!(format_snr(&SignalValue::Number(f64::NAN)), "NaN");
        assert_eq!(format_snr(&SignalValue::Text("6.76".into())), "6.76");
        assert_eq!(format_snr(&SignalValue::Text("weak".into())), "weak");
    }

    #[test]
    fn radio_fields_follow_channel() {
        let composer = ReplyComposer::new(TelemetrySnapshot::new(
            None,
            Some("US".into()),
            Some(11),
            Some(250),
        ));
        let p = IncomingPacket::text(1, 0, "hi");
        assert_eq!(
            composer.compose(&p),
            "Ch 0 | Reg US | SF 11 | BW 250 kHz | (dBi: not measurable)"
        );
    }
}
