//! Persisted form of the port collection.
//!
//! ```xml
//! <Ports>
//!   <Port Name="Port 0">
//!     <PulsesPerRevolution>72</PulsesPerRevolution>
//!     <PulsesPerDetent>4</PulsesPerDetent>
//!     <PulseSwitches>false</PulseSwitches>
//!     <PulseAll>false</PulseAll>
//!     <ValueAtZeroDegrees>0</ValueAtZeroDegrees>
//!     <ValuePerRevolution>1</ValuePerRevolution>
//!   </Port>
//! </Ports>
//! ```
//!
//! Every child element is optional and may appear in any order. Unknown
//! elements are ignored.

use std::error::Error;

use serde::{Deserialize, Deserializer, Serialize};

use crate::routing::port::*;
use crate::routing::{Port, Ports};

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename = "Ports")]
pub struct SerializablePorts {
    #[serde(rename = "Port", default)]
    pub ports: Vec<SerializablePort>,
}

impl From<&Ports> for SerializablePorts {
    fn from(ports: &Ports) -> Self {
        Self {
            ports: ports.iter().map(SerializablePort::from).collect(),
        }
    }
}

impl SerializablePorts {
    pub fn into_ports(self) -> Result<Ports, Box<dyn Error>> {
        let ports = self.ports.into_iter().map(Port::from).collect();
        Ok(Ports::from_ports(ports)?)
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SerializablePort {
    #[serde(rename = "@Name")]
    pub name: String,

    #[serde(
        rename = "PulsesPerRevolution",
        default = "default_pulses_per_revolution"
    )]
    pub pulses_per_revolution: f64,

    #[serde(rename = "PulsesPerDetent", default = "default_pulses_per_detent")]
    pub pulses_per_detent: f64,

    #[serde(
        rename = "PulseSwitches",
        default,
        deserialize_with = "deserialize_bool"
    )]
    pub pulse_switches: bool,

    #[serde(
        rename = "PulseAll",
        default,
        deserialize_with = "deserialize_bool"
    )]
    pub pulse_all: bool,

    #[serde(rename = "ValueAtZeroDegrees", default)]
    pub value_at_zero_degrees: f64,

    #[serde(
        rename = "ValuePerRevolution",
        default = "default_value_per_revolution"
    )]
    pub value_per_revolution: f64,
}

fn default_pulses_per_revolution() -> f64 {
    DEFAULT_PULSES_PER_REVOLUTION
}

fn default_pulses_per_detent() -> f64 {
    DEFAULT_PULSES_PER_DETENT
}

fn default_value_per_revolution() -> f64 {
    DEFAULT_VALUE_PER_REVOLUTION
}

/// Accepts `true`/`false` in any case as well as `1`/`0`, which covers
/// profiles written by hand and by other tools
fn deserialize_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected a boolean, found `{}`",
            other
        ))),
    }
}

impl From<&Port> for SerializablePort {
    fn from(port: &Port) -> Self {
        let config = port.config();
        Self {
            name: port.name().to_string(),
            pulses_per_revolution: config.pulses_per_revolution,
            pulses_per_detent: config.pulses_per_detent,
            pulse_switches: config.pulse_switches,
            pulse_all: config.pulse_all,
            value_at_zero_degrees: config.value_at_zero_degrees,
            value_per_revolution: config.value_per_revolution,
        }
    }
}

impl From<SerializablePort> for Port {
    fn from(port: SerializablePort) -> Self {
        Port::with_config(
            &port.name,
            PortConfig {
                pulses_per_revolution: port.pulses_per_revolution,
                pulses_per_detent: port.pulses_per_detent,
                pulse_switches: port.pulse_switches,
                pulse_all: port.pulse_all,
                value_at_zero_degrees: port.value_at_zero_degrees,
                value_per_revolution: port.value_per_revolution,
            },
        )
    }
}

pub fn ports_to_xml(ports: &Ports) -> Result<String, Box<dyn Error>> {
    let mut xml = String::new();
    let mut serializer = quick_xml::se::Serializer::new(&mut xml);
    serializer.indent(' ', 2);
    SerializablePorts::from(ports).serialize(serializer)?;
    xml.push('\n');
    Ok(xml)
}

pub fn ports_from_xml(xml: &str) -> Result<Ports, Box<dyn Error>> {
    let serialized = quick_xml::de::from_str::<SerializablePorts>(xml)?;
    serialized.into_ports()
}
