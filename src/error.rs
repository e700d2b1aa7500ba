//! Consumer errors
//!
//! A resolution error aborts the setup of a single device, with the exception
//! of [`Error::UnresolvableForm`], which is recorded per affordance and only
//! degrades that one property or action. Polling errors are stored on the
//! affected [`PropertySnapshot`](crate::poll::PropertySnapshot) and retried on
//! the next cycle; action errors are returned to the caller and never retried.

/// Any error the consumer engine can report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Error {
    /// The document is not valid JSON, not a JSON object, or lacks the
    /// minimal Thing Description structure.
    #[error("malformed thing description: {0}")]
    MalformedDocument(String),

    /// A form href cannot be resolved to an absolute URL.
    ///
    /// Reported per property or action; the rest of the document still
    /// resolves normally.
    #[error("cannot resolve form href \"{href}\": {reason}")]
    UnresolvableForm { href: String, reason: String },

    /// The device is unreachable or refused the connection.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The request exceeded its time budget.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The device answered, but not with usable HTTP.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The device answered a read with an HTTP error status.
    #[error("unexpected HTTP status {0}")]
    UnexpectedStatus(u16),

    /// Caller-supplied action parameters violate the input schema, or were
    /// given to an action that takes no input.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The action name does not exist in the catalog.
    #[error("unknown action \"{0}\"")]
    UnknownAction(String),

    /// The device rejected an invocation with an HTTP error status.
    #[error("action failed with status {status}")]
    ActionFailed { status: u16, body: String },

    /// A property payload cannot be coerced to its declared type.
    #[error("invalid property value: {0}")]
    InvalidValue(String),

    /// Host-supplied device configuration rejected before session setup.
    #[error("invalid device configuration: {0}")]
    InvalidConfig(String),

    /// No session is registered under this name.
    #[error("unknown session \"{0}\"")]
    UnknownSession(String),

    /// The session was removed while the operation was in flight.
    #[error("session closed")]
    SessionClosed,
}
