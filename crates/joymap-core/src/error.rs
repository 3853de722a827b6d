//! Error type shared by the converters and the button-map document layer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ButtonMapError {
    #[error("No <{element}> element to operate on")]
    MissingTarget { element: &'static str },
    #[error("<{element}> tag has no \"{attribute}\" attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    #[error("<{element}> tag has out-of-range \"{attribute}\" value \"{value}\"")]
    OutOfRange {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
    #[error("Failed to append <{element}> element")]
    AppendFailed { element: &'static str },
    #[error("Failed to parse button map: {0}")]
    Parse(String),
    #[error("Failed to write button map: {0}")]
    Write(String),
    #[error("Expected <{expected}> root element, found <{found}>")]
    UnexpectedRoot {
        expected: &'static str,
        found: String,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for ButtonMapError {
    fn from(e: quick_xml::Error) -> Self {
        ButtonMapError::Parse(e.to_string())
    }
}
