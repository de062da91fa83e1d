//! Failure-to-response conversion.
//!
//! An [`ExceptionHandler`] is invoked by the surrounding service whenever
//! request handling raises past the point the service is willing to recover
//! from. The default variant returns a fixed, generic message - failure
//! details are logged server-side and never echoed to the caller.

use crate::dispatcher::DispatchError;
use crate::exchange::Exchange;
use crate::service::WebService;
use serde_json::Value;

/// Message returned by [`DefaultExceptionHandler`] for every failure.
pub const INTERNAL_ERROR_MESSAGE: &str =
    "An internal server error occurred! Please contact the server administrator in case you think this is a problem.";

/// Converts a dispatch failure into a response payload.
pub trait ExceptionHandler: Send + Sync {
    /// Produce the response payload for a failed exchange.
    fn handle(&self, exchange: &Exchange, error: &DispatchError) -> Value;

    /// Produce the raw response bytes via the service's response transform.
    fn handle_bytes(
        &self,
        service: &WebService,
        exchange: &Exchange,
        error: &DispatchError,
    ) -> Vec<u8> {
        service.transform_response(&self.handle(exchange, error))
    }
}

/// Default handler: always a generic, non-diagnostic message.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultExceptionHandler;

impl ExceptionHandler for DefaultExceptionHandler {
    fn handle(&self, _exchange: &Exchange, _error: &DispatchError) -> Value {
        Value::String(INTERNAL_ERROR_MESSAGE.to_string())
    }
}
