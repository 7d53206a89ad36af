//! Error type shared by the sprite, tile sheet and property loading code.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpriteError {
    #[error("Unknown animation property name: {0}")]
    UnknownPropertyName(String),

    #[error("Unknown animation property id: {0}")]
    UnknownPropertyId(i32),

    #[error("Property {property} expects {expected} components, got {actual}")]
    ComponentCount {
        property: String,
        expected: usize,
        actual: usize,
    },

    #[error("Expected namespace '{expected}', found '{found}'")]
    WrongNamespace {
        expected: &'static str,
        found: String,
    },

    #[error("Invalid properties URL: {0}")]
    InvalidUrl(String),

    #[error("Namespace '{path}' not found in {url}")]
    NamespaceNotFound { url: String, path: String },

    #[error("Missing required property: {0}")]
    MissingProperty(&'static str),

    #[error("Invalid value for '{key}': {value}")]
    InvalidValue { key: String, value: String },

    #[error("Tile sheet not found: {0}")]
    TileSheetNotFound(String),

    #[error("Strip already exists: {0}")]
    DuplicateStrip(String),

    #[error("Strip not found: {0}")]
    StripNotFound(String),

    #[error("Frame {frame} out of range for strip {strip}")]
    FrameOutOfRange { strip: usize, frame: usize },

    #[error("Sprite '{sprite}' does not use tile sheet '{sheet}'")]
    SheetMismatch { sprite: String, sheet: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SpriteError>;
