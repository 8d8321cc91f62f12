//! Fibonacci request handler.
//!
//! This crate is used by:
//! - `fib-lambda` (managed mode, `lambda_runtime`)
//! - `iac-local-adapter` (local HTTP debugging mode)
//!
//! It intentionally knows nothing about HTTP listeners; it only sees [`NativeEvent`] and
//! returns [`NativeResponse`].

pub mod error;
pub mod event;
pub mod fibonacci;
pub mod handler;
pub mod logging;

pub use error::{HandlerError, Result};
pub use event::{NativeEvent, NativeResponse};
pub use handler::{HandlerConfig, RequestHandler, ResponsePayload};
