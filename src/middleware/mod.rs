/*
 * Responsibility
 * - public surface of the middleware (apply functions, route access tags)
 */
pub mod api_version;
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
