use std::{
    fmt, io,
    num::{ParseFloatError, ParseIntError},
    str::Utf8Error,
};

use quick_xml::events::attributes::AttrError;

use crate::data::osm::{FeatureType, OsmId};

#[derive(Debug)]
pub enum Error {
    /// An id that was seeded during graph initialization could not be found
    /// during relationship resolution. This is a logic fault, not bad input.
    Integrity(String),
    /// A state operation addressed a feature absent from the raw maps.
    NotFound { feature_type: FeatureType, id: OsmId },
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Integrity(message) => write!(f, "integrity error: {message}"),
            Error::NotFound { feature_type, id } => {
                write!(f, "no such feature: {} {}", feature_type.name(), id)
            }
            Error::Other(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Error::Other(value.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(value: quick_xml::Error) -> Self {
        Error::Other(value.to_string())
    }
}

impl From<ParseFloatError> for Error {
    fn from(value: ParseFloatError) -> Self {
        Error::Other(value.to_string())
    }
}

impl From<ParseIntError> for Error {
    fn from(value: ParseIntError) -> Self {
        Error::Other(value.to_string())
    }
}

impl From<AttrError> for Error {
    fn from(value: AttrError) -> Self {
        Error::Other(value.to_string())
    }
}

impl From<Utf8Error> for Error {
    fn from(value: Utf8Error) -> Self {
        Error::Other(value.to_string())
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_string())
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
