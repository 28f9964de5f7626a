pub mod authenticate;
pub mod cors;
pub mod request_trace;
pub mod role_gate;
pub mod structured_logger;

pub use authenticate::{AuthMode, Authenticate};
pub use cors::cors_middleware;
pub use request_trace::RequestTrace;
pub use role_gate::RequireRole;
pub use structured_logger::StructuredLogger;
