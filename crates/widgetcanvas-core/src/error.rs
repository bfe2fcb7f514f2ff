//! Error handling for WidgetCanvas
//!
//! Each layout component reports failures through its own error type:
//! - Decode errors (templates and saved designs)
//! - Grouping errors (rejected group/ungroup requests)
//! - Selection errors (unknown widgets)
//! - Repository errors (template storage)
//!
//! Resize and drag gestures never fail; out-of-range ticks are dropped.
//! All error types use `thiserror`.

use thiserror::Error;

use crate::identity::WidgetId;

/// Errors raised while decoding a template or a saved design.
///
/// Decoding is all-or-nothing: when one of these is returned no widget
/// has been created.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The payload is not valid JSON or does not match the expected shape
    #[error("Malformed document: {reason}")]
    Malformed {
        /// Parser message.
        reason: String,
    },

    /// The version field names a format this build cannot read
    #[error("Unsupported format version '{version}'")]
    UnsupportedVersion {
        /// The version string found in the payload.
        version: String,
    },

    /// An item lacks the geometry its format version requires
    #[error("Item {index} is missing {field}")]
    MissingGeometry {
        /// Index of the item in the payload.
        index: usize,
        /// Name of the missing field.
        field: String,
    },

    /// A coordinate or dimension is NaN or infinite
    #[error("Non-finite geometry in {item}")]
    NonFiniteGeometry {
        /// Description of the offending item.
        item: String,
    },

    /// A persisted identifier is not a valid widget identifier
    #[error("Invalid widget identifier '{value}'")]
    InvalidIdentifier {
        /// The identifier as stored.
        value: String,
    },

    /// A group record references a member that is absent from the payload
    #[error("Group {group} references missing member {member}")]
    MissingGroupMember {
        /// Group identifier.
        group: String,
        /// Missing member identifier.
        member: String,
    },

    /// The payload could not be read from storage
    #[error("Failed to read document: {reason}")]
    Io {
        /// Underlying I/O message.
        reason: String,
    },
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::Malformed {
            reason: err.to_string(),
        }
    }
}

/// Errors raised when a group or ungroup request is rejected.
///
/// The `Display` text is the user-facing reason shown by the host.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GroupingError {
    /// Fewer than two distinct widgets were supplied
    #[error("Select at least two widgets to group (got {count})")]
    TooFewWidgets {
        /// Number of distinct widgets supplied.
        count: usize,
    },

    /// The conflict policy refused the combination
    #[error("{reason}")]
    Conflict {
        /// Policy explanation.
        reason: String,
    },

    /// A requested widget is not on the canvas
    #[error("Widget {id} is not on the canvas")]
    UnknownWidget {
        /// The unknown identifier.
        id: WidgetId,
    },

    /// Ungroup was requested on a widget that is not a group
    #[error("Widget {id} is not a group")]
    NotAGroup {
        /// The widget identifier.
        id: WidgetId,
    },

    /// A group was offered as a member of a new group
    #[error("Group {id} can't be nested inside another group")]
    NestedGroup {
        /// The group identifier.
        id: WidgetId,
    },
}

/// Errors raised by the selection manager.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// The widget was never registered or has been unregistered
    #[error("Widget {id} is not registered for selection")]
    NotRegistered {
        /// The widget identifier.
        id: WidgetId,
    },
}

/// Errors raised by template repositories.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    /// No template is stored under this identifier
    #[error("Template '{id}' not found")]
    NotFound {
        /// The template identifier.
        id: String,
    },

    /// The identifier cannot be used as a storage key
    #[error("Invalid template identifier '{id}'")]
    InvalidId {
        /// The rejected identifier.
        id: String,
    },

    /// The stored template could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Storage failure
    #[error("Template storage error: {reason}")]
    Io {
        /// Underlying I/O message.
        reason: String,
    },
}

impl From<std::io::Error> for RepositoryError {
    fn from(err: std::io::Error) -> Self {
        RepositoryError::Io {
            reason: err.to_string(),
        }
    }
}

/// Main error type for WidgetCanvas
///
/// Unifies the component errors for callers that do not need to tell them apart.
#[derive(Error, Debug)]
pub enum Error {
    /// Decode error
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Grouping error
    #[error(transparent)]
    Grouping(#[from] GroupingError),

    /// Selection error
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Repository error
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    pub fn is_decode_error(&self) -> bool {
        matches!(self, Error::Decode(_) | Error::Repository(RepositoryError::Decode(_)))
    }

    pub fn is_grouping_error(&self) -> bool {
        matches!(self, Error::Grouping(_))
    }
}

/// Result type alias using the unified error type.
pub type Result<T> = std::result::Result<T, Error>;
