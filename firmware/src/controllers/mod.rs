//! Request controllers
//!
//! Controllers translate network requests into engine commands. They never
//! touch effect state themselves.

mod control_http;

pub use control_http::ControlHttpController;
