use crate::grib;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IoError: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YamlError: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("InvalidConfig: {0}")]
    InvalidConfig(String),

    #[error("GribError: {0}")]
    GribError(#[from] grib::GribError),
}
