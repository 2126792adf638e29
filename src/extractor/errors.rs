use thiserror::Error;

/// Why a single candidate (an HTML item container, an API item, or a whole
/// API page) could not be turned into canonical records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("missing element: {0}")]
    MissingElement(&'static str),

    #[error("missing attribute '{attribute}' on {element}")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("no identifier in '{0}'")]
    MissingId(String),

    #[error("empty title")]
    EmptyTitle,

    #[error("unclassified link: {0}")]
    UnclassifiedHref(String),

    #[error("no channel id on page for user '{0}'")]
    UnresolvedUser(String),

    #[error("unsupported item kind: {0}")]
    UnsupportedKind(String),

    #[error("malformed item: {0}")]
    MalformedItem(String),

    #[error("invalid json: {0}")]
    InvalidJson(String),

    #[error("api error {code}: {message}")]
    Api { code: u16, message: String },
}
