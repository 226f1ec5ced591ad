#[macro_use]
extern crate log;

pub mod config;
pub mod error;
pub mod grib;

pub use crate::config::Config;
pub use crate::error::{Error, Result};
