use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};
use crate::error::{Error, Result};
use crate::grib::sections::sect7::png::PNG_DEPTHS;

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
  pub jpeg2000: Jpeg2000Config,
  pub png: PngConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Jpeg2000Config {
  /// Guard bits added when retrying a failed encode
  pub retry_guard_bits: u8,
}

impl Default for Jpeg2000Config {
  fn default() -> Self {
    Self { retry_guard_bits: 4 }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PngConfig {
  /// Smallest pixel depth, one of 8, 16, 24 or 32
  pub minimum_depth: usize,
}

impl Default for PngConfig {
  fn default() -> Self {
    Self { minimum_depth: 8 }
  }
}

impl Config {
  pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Self> {
    let content = fs::read_to_string(path)?;
    Self::from_yaml_str(&content)
  }

  pub fn from_yaml_str(yaml: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(yaml)?;
    config.validate()?;
    Ok(config)
  }

  fn validate(&self) -> Result<()> {
    if !PNG_DEPTHS.contains(&self.png.minimum_depth) {
      return Err(Error::InvalidConfig(format!("png.minimumDepth {} is not one of {:?}", self.png.minimum_depth, PNG_DEPTHS)));
    }
    Ok(())
  }
}
