//! Meshtastic protobuf subset
//!
//! Hand-maintained prost definitions for the handful of Meshtastic messages the
//! responder actually touches: the `FromRadio`/`ToRadio` envelopes, `MeshPacket`
//! and its `Data` payload, node identity (`MyNodeInfo`, `NodeInfo`, `User`) and
//! the LoRa section of the device `Config`.
//!
//! Field numbers follow `meshtastic/mesh.proto` and `meshtastic/config.proto`.
//! Anything not declared here (other oneof variants, newer fields) is skipped by
//! prost during decoding, so firmware that sends more than we model still parses.

pub mod meshtastic_generated {
    /// Packet sent from the radio to the client.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct FromRadio {
        #[prost(uint32, tag = "1")]
        pub id: u32,
        #[prost(oneof = "from_radio::PayloadVariant", tags = "2, 3, 4, 5, 6, 7, 8")]
        pub payload_variant: ::core::option::Option<from_radio::PayloadVariant>,
    }

    pub mod from_radio {
        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum PayloadVariant {
            #[prost(message, tag = "2")]
            Packet(super::MeshPacket),
            #[prost(message, tag = "3")]
            MyInfo(super::MyNodeInfo),
            #[prost(message, tag = "4")]
            NodeInfo(super::NodeInfo),
            #[prost(message, tag = "5")]
            Config(super::Config),
            #[prost(message, tag = "6")]
            LogRecord(super::LogRecord),
            #[prost(uint32, tag = "7")]
            ConfigCompleteId(u32),
            #[prost(bool, tag = "8")]
            Rebooted(bool),
        }
    }

    /// Packet sent from the client to the radio.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ToRadio {
        #[prost(oneof = "to_radio::PayloadVariant", tags = "1, 3, 4, 7")]
        pub payload_variant: ::core::option::Option<to_radio::PayloadVariant>,
    }

    pub mod to_radio {
        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum PayloadVariant {
            #[prost(message, tag = "1")]
            Packet(super::MeshPacket),
            #[prost(uint32, tag = "3")]
            WantConfigId(u32),
            #[prost(bool, tag = "4")]
            Disconnect(bool),
            #[prost(message, tag = "7")]
            Heartbeat(super::Heartbeat),
        }
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Heartbeat {
        #[prost(uint32, tag = "1")]
        pub nonce: u32,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct MeshPacket {
        #[prost(fixed32, tag = "1")]
        pub from: u32,
        #[prost(fixed32, tag = "2")]
        pub to: u32,
        #[prost(uint32, tag = "3")]
        pub channel: u32,
        #[prost(oneof = "mesh_packet::PayloadVariant", tags = "4, 5")]
        pub payload_variant: ::core::option::Option<mesh_packet::PayloadVariant>,
        #[prost(fixed32, tag = "6")]
        pub id: u32,
        #[prost(fixed32, tag = "7")]
        pub rx_time: u32,
        #[prost(float, tag = "8")]
        pub rx_snr: f32,
        #[prost(uint32, tag = "9")]
        pub hop_limit: u32,
        #[prost(bool, tag = "10")]
        pub want_ack: bool,
        #[prost(enumeration = "mesh_packet::Priority", tag = "11")]
        pub priority: i32,
        #[prost(int32, tag = "12")]
        pub rx_rssi: i32,
        #[prost(bool, tag = "14")]
        pub via_mqtt: bool,
        #[prost(uint32, tag = "15")]
        pub hop_start: u32,
    }

    pub mod mesh_packet {
        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum PayloadVariant {
            #[prost(message, tag = "4")]
            Decoded(super::Data),
            #[prost(bytes = "vec", tag = "5")]
            Encrypted(::prost::alloc::vec::Vec<u8>),
        }

        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum Priority {
            Unset = 0,
            Min = 1,
            Background = 10,
            Default = 64,
            Reliable = 70,
            Response = 80,
            High = 100,
            Ack = 120,
            Max = 127,
        }
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Data {
        #[prost(enumeration = "PortNum", tag = "1")]
        pub portnum: i32,
        #[prost(bytes = "vec", tag = "2")]
        pub payload: ::prost::alloc::vec::Vec<u8>,
        #[prost(bool, tag = "3")]
        pub want_response: bool,
        #[prost(fixed32, tag = "4")]
        pub dest: u32,
        #[prost(fixed32, tag = "5")]
        pub source: u32,
        #[prost(fixed32, tag = "6")]
        pub request_id: u32,
        #[prost(fixed32, tag = "7")]
        pub reply_id: u32,
        #[prost(fixed32, tag = "8")]
        pub emoji: u32,
        #[prost(uint32, optional, tag = "9")]
        pub bitfield: ::core::option::Option<u32>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum PortNum {
        UnknownApp = 0,
        TextMessageApp = 1,
        RemoteHardwareApp = 2,
        PositionApp = 3,
        NodeinfoApp = 4,
        RoutingApp = 5,
        AdminApp = 6,
        TextMessageCompressedApp = 7,
        WaypointApp = 8,
        DetectionSensorApp = 10,
        ReplyApp = 32,
        RangeTestApp = 66,
        TelemetryApp = 67,
        TracerouteApp = 70,
        NeighborinfoApp = 71,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct MyNodeInfo {
        #[prost(uint32, tag = "1")]
        pub my_node_num: u32,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct NodeInfo {
        #[prost(uint32, tag = "1")]
        pub num: u32,
        #[prost(message, optional, tag = "2")]
        pub user: ::core::option::Option<User>,
        #[prost(float, tag = "4")]
        pub snr: f32,
        #[prost(fixed32, tag = "5")]
        pub last_heard: u32,
        #[prost(uint32, tag = "7")]
        pub channel: u32,
        #[prost(uint32, optional, tag = "9")]
        pub hops_away: ::core::option::Option<u32>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct User {
        #[prost(string, tag = "1")]
        pub id: ::prost::alloc::string::String,
        #[prost(string, tag = "2")]
        pub long_name: ::prost::alloc::string::String,
        #[prost(string, tag = "3")]
        pub short_name: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct LogRecord {
        #[prost(string, tag = "1")]
        pub message: ::prost::alloc::string::String,
        #[prost(fixed32, tag = "2")]
        pub time: u32,
        #[prost(string, tag = "3")]
        pub source: ::prost::alloc::string::String,
    }

    /// Device configuration; only the LoRa section is modelled.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Config {
        #[prost(oneof = "config::PayloadVariant", tags = "6")]
        pub payload_variant: ::core::option::Option<config::PayloadVariant>,
    }

    pub mod config {
        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum PayloadVariant {
            #[prost(message, tag = "6")]
            Lora(LoRaConfig),
        }

        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct LoRaConfig {
            #[prost(bool, tag = "1")]
            pub use_preset: bool,
            #[prost(enumeration = "lo_ra_config::ModemPreset", tag = "2")]
            pub modem_preset: i32,
            #[prost(uint32, tag = "3")]
            pub bandwidth: u32,
            #[prost(uint32, tag = "4")]
            pub spread_factor: u32,
            #[prost(uint32, tag = "5")]
            pub coding_rate: u32,
            #[prost(float, tag = "6")]
            pub frequency_offset: f32,
            #[prost(enumeration = "lo_ra_config::RegionCode", tag = "7")]
            pub region: i32,
            #[prost(uint32, tag = "8")]
            pub hop_limit: u32,
            #[prost(bool, tag = "9")]
            pub tx_enabled: bool,
            #[prost(int32, tag = "10")]
            pub tx_power: i32,
            #[prost(uint32, tag = "11")]
            pub channel_num: u32,
        }

        pub mod lo_ra_config {
            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
            #[repr(i32)]
            pub enum RegionCode {
                Unset = 0,
                Us = 1,
                Eu433 = 2,
                Eu868 = 3,
                Cn = 4,
                Jp = 5,
                Anz = 6,
                Kr = 7,
                Tw = 8,
                Ru = 9,
                In = 10,
                Nz865 = 11,
                Th = 12,
                Lora24 = 13,
                Ua433 = 14,
                Ua868 = 15,
                My433 = 16,
                My919 = 17,
                Sg923 = 18,
                Ph433 = 19,
                Ph868 = 20,
                Ph915 = 21,
                Anz433 = 22,
                Kz433 = 23,
                Kz863 = 24,
                Np865 = 25,
                Br902 = 26,
            }

            impl RegionCode {
                pub fn as_str_name(&self) -> &'static str {
                    match self {
                        RegionCode::Unset => "UNSET",
                        RegionCode::Us => "US",
                        RegionCode::Eu433 => "EU_433",
                        RegionCode::Eu868 => "EU_868",
                        RegionCode::Cn => "CN",
                        RegionCode::Jp => "JP",
                        RegionCode::Anz => "ANZ",
                        RegionCode::Kr => "KR",
                        RegionCode::Tw => "TW",
                        RegionCode::Ru => "RU",
                        RegionCode::In => "IN",
                        RegionCode::Nz865 => "NZ_865",
                        RegionCode::Th => "TH",
                        RegionCode::Lora24 => "LORA_24",
                        RegionCode::Ua433 => "UA_433",
                        RegionCode::Ua868 => "UA_868",
                        RegionCode::My433 => "MY_433",
                        RegionCode::My919 => "MY_919",
                        RegionCode::Sg923 => "SG_923",
                        RegionCode::Ph433 => "PH_433",
                        RegionCode::Ph868 => "PH_868",
                        RegionCode::Ph915 => "PH_915",
                        RegionCode::Anz433 => "ANZ_433",
                        RegionCode::Kz433 => "KZ_433",
                        RegionCode::Kz863 => "KZ_863",
                        RegionCode::Np865 => "NP_865",
                        RegionCode::Br902 => "BR_902",
                    }
                }
            }

            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
            #[repr(i32)]
            pub enum ModemPreset {
                LongFast = 0,
                LongSlow = 1,
                VeryLongSlow = 2,
                MediumSlow = 3,
                MediumFast = 4,
                ShortSlow = 5,
                ShortFast = 6,
                LongModerate = 7,
                ShortTurbo = 8,
            }
        }
    }
}
