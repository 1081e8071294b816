//! Middleware stack para el servidor HTTP.
//!
//! - `RequestIdLayer`: genera o propaga `x-request-id`
//! - `LoggingLayer`: span por request y log de la respuesta
//!
//! CORS lo resuelve `tower_http::cors` en `server.rs`.

mod logging;
mod request_id;

pub use logging::{LoggingLayer, LoggingMiddleware};
pub use request_id::{REQUEST_ID_HEADER, RequestIdLayer, RequestIdMiddleware};
