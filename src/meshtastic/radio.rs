//! Mapping from the radio's LoRa config message to [`RadioConfig`].
//!
//! Firmware reports either a modem preset (`use_preset = true`) or explicit
//! spreading factor / bandwidth values. Zero and `UNSET` mean "not known".
use crate::protobuf::meshtastic_generated::config::lo_ra_config::{ModemPreset, RegionCode};
use crate::protobuf::meshtastic_generated::config::LoRaConfig;

use super::RadioConfig;

/// Bandwidth (kHz) and spreading factor for a modem preset.
pub fn preset_parameters(preset: ModemPreset) -> (u32, u32) {
    match preset {
        ModemPreset::LongFast => (250, 11),
        ModemPreset::LongSlow => (125, 12),
        ModemPreset::VeryLongSlow => (62, 12),
        ModemPreset::MediumSlow => (250, 10),
        ModemPreset::MediumFast => (250, 9),
        ModemPreset::ShortSlow => (250, 8),
        ModemPreset::ShortFast => (250, 7),
        ModemPreset::LongModerate => (125, 11),
        ModemPreset::ShortTurbo => (500, 7),
    }
}

pub fn radio_config_from_lora(lora: &LoRaConfig) -> RadioConfig {
    let tx_power_dbm = (lora.tx_power != 0).then_some(lora.tx_power);

    let region = match RegionCode::try_from(lora.region) {
        Ok(RegionCode::Unset) | Err(_) => None,
        Ok(code) => Some(code.as_str_name().to_string()),
    };

    let (bandwidth_khz, spreading_factor) = if lora.use_preset {
        match ModemPreset::try_from(lora.modem_preset) {
            Ok(preset) => {
                let (bw, sf) = preset_parameters(preset);
                (Some(bw), Some(sf))
            }
            Err(_) => (None, None),
        }
    } else {
        (
            (lora.bandwidth != 0).then_some(lora.bandwidth),
            (lora.spread_factor != 0).then_some(lora.spread_factor),
        )
    };

    RadioConfig {
        tx_power_dbm,
        region,
        spreading_factor,
        bandwidth_khz,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_config_derives_sf_and_bw() {
        let lora = LoRaConfig {
            use_preset: true,
            modem_preset: ModemPreset::LongFast as i32,
            region: RegionCode::Eu868 as i32,
            tx_power: 27,
            ..Default::default()
        };
        let cfg = radio_config_from_lora(&lora);
        assert_eq!(cfg.tx_power_dbm, Some(27));
        assert_eq!(cfg.region.as_deref(), Some("EU_868"));
        assert_eq!(cfg.spreading_factor, Some(11));
        assert_eq!(cfg.bandwidth_khz, Some(250));
    }

    #[test]
    fn manual_config_uses_explicit_values() {
        let lora = LoRaConfig {
            use_preset: false,
            bandwidth: 125,
            spread_factor: 9,
            region: RegionCode::Us as i32,
            ..Default::default()
        };
        let cfg = radio_config_from_lora(&lora);
        assert_eq!(cfg.spreading_factor, Some(9));
        assert_eq!(cfg.bandwidth_khz, Some(125));
        assert_eq!(cfg.region.as_deref(), Some("US"));
    }

    #[test]
    fn zero_and_unset_are_unknown() {
        let cfg = radio_config_from_lora(&LoRaConfig::default());
        assert_eq!(cfg, RadioConfig::default());
    }

    #[test]
    fn turbo_preset() {
        assert_eq!(preset_parameters(ModemPreset::ShortTurbo), (500, 7));
        assert_eq!(preset_parameters(ModemPreset::VeryLongSlow), (62, 12));
    }
}
