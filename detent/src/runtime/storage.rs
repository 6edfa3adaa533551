use std::error::Error;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories_next::BaseDirs;

use super::serialization::{ports_from_xml, ports_to_xml};
use crate::core::prelude::*;
use crate::routing::Ports;

const PORTS_FILE_NAME: &str = "ports.xml";

pub fn config_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|base| base.config_dir().join("Detent"))
}

pub fn default_ports_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(PORTS_FILE_NAME))
}

pub fn save_ports(path: &Path, ports: &Ports) -> Result<(), Box<dyn Error>> {
    let xml = ports_to_xml(ports)?;
    if let Some(parent_dir) = path.parent() {
        fs::create_dir_all(parent_dir)?;
    }
    fs::write(path, xml)?;
    info!("Saved {} ports to {}", ports.len(), path.display());
    Ok(())
}

pub fn load_ports(path: &Path) -> Result<Ports, Box<dyn Error>> {
    let xml = fs::read_to_string(path)?;
    let ports = ports_from_xml(&xml)?;
    info!("Loaded {} ports from {}", ports.len(), path.display());
    Ok(ports)
}

pub fn load_ports_if_exists(
    path: &Path,
) -> Result<Option<Ports>, Box<dyn Error>> {
    match load_ports(path) {
        Ok(ports) => Ok(Some(ports)),
        Err(err) => {
            if err
                .downcast_ref::<std::io::Error>()
                .is_some_and(|e| e.kind() == ErrorKind::NotFound)
            {
                Ok(None)
            } else {
                Err(err)
            }
        }
    }
}

/// Loads the profile at `path`, falling back to the default ports when there
/// is none yet
pub fn load_ports_or_default(path: &Path) -> Result<Ports, Box<dyn Error>> {
    Ok(load_ports_if_exists(path)?.unwrap_or_else(|| {
        info!("No ports profile at {}; using defaults", path.display());
        Ports::default()
    }))
}
