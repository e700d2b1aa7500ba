//! Action invocation
//!
//! One-shot, caller-initiated requests. Parameters are validated against the
//! action's input schema before anything touches the network, and a failed
//! invocation is never retried; the caller decides what to do with the error.

use std::{sync::Arc, time::Duration};

use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::Error,
    resolver::ActionCatalog,
    schema::validate_params,
    transport::{Credential, Transport, TransportRequest},
};

/// The result of a successful invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionOutcome {
    pub status: u16,
    /// Parsed JSON response body, if the device returned one.
    pub output: Option<Value>,
}

/// Invokes actions from an [`ActionCatalog`] over a [`Transport`].
#[derive(Clone)]
pub struct ActionInvoker {
    transport: Arc<dyn Transport>,
    timeout: Duration,
}

impl ActionInvoker {
    pub fn new(transport: Arc<dyn Transport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// Invokes `name` with `params`.
    ///
    /// Fails fast with [`Error::UnknownAction`] or
    /// [`Error::InvalidParameters`] without a request; an HTTP error status
    /// from the device becomes [`Error::ActionFailed`].
    pub async fn invoke(
        &self,
        actions: &ActionCatalog,
        credential: &Credential,
        name: &str,
        params: Value,
    ) -> Result<ActionOutcome, Error> {
        let action = actions
            .get(name)
            .ok_or_else(|| Error::UnknownAction(name.to_string()))?;

        match &action.input {
            Some(schema) => validate_params(schema, &params)?,
            None if takes_no_input(&params) => {}
            None => {
                return Err(Error::InvalidParameters(format!(
                    "action \"{name}\" takes no input"
                )));
            }
        }

        let body = (action.method.has_body() && action.input.is_some()).then_some(&params);
        debug!(action = %name, url = %action.url, method = %action.method, "invoking action");
        let response = self
            .transport
            .request(TransportRequest {
                method: action.method,
                url: &action.url,
                credential,
                body,
                timeout: self.timeout,
            })
            .await?;

        if !response.is_success() {
            return Err(Error::ActionFailed {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        let output = if response.body.is_empty() {
            None
        } else {
            serde_json::from_slice(&response.body).ok()
        };

        if let (Some(schema), Some(output)) = (&action.output, &output) {
            // A device response that violates its own output schema is worth
            // a log line but must not fail an already-executed action.
            if let Err(error) = validate_params(schema, output) {
                warn!(action = %name, %error, "action output does not match its schema");
            }
        }

        Ok(ActionOutcome { status: response.status, output })
    }
}

fn takes_no_input(params: &Value) -> bool {
    match params {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
