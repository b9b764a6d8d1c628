//! Request routing for the control surface

use super::HttpMethod;
use crate::command::CommandName;

const API_PREFIX: &str = "/api";
const STATUS_PATH: &str = "status";

/// Where a request goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Forward to the render loop
    Command(CommandName),
    /// CORS preflight, answered with 204
    Preflight,
    /// Current effect snapshot
    Status,
    NotFound,
    MethodNotAllowed,
}

impl Route {
    /// Status code for routes answered without the render loop
    pub const fn status_code(self) -> Option<u16> {
        match self {
            Self::Preflight => Some(204),
            Self::NotFound => Some(404),
            Self::MethodNotAllowed => Some(405),
            Self::Command(_) | Self::Status => None,
        }
    }
}

/// Map a method and path to a route
///
/// Commands live at `/<name>` and `/api/<name>`; the query string is ignored.
pub fn resolve_route(method: HttpMethod, path: &str) -> Route {
    if method == HttpMethod::Options {
        return Route::Preflight;
    }

    let path = path.split('?').next().unwrap_or(path);
    let path = path.strip_prefix(API_PREFIX).unwrap_or(path);
    let Some(name) = path.strip_prefix('/') else {
        return Route::NotFound;
    };
    let name = name.trim_end_matches('/');

    if name == STATUS_PATH {
        return match method {
            HttpMethod::Get => Route::Status,
            _ => Route::MethodNotAllowed,
        };
    }

    let Some(command) = CommandName::parse_from_str(name) else {
        return Route::NotFound;
    };
    match method {
        HttpMethod::Get | HttpMethod::Post => Route::Command(command),
        _ => Route::MethodNotAllowed,
    }
}
