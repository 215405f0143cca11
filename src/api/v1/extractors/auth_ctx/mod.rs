/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - hand the authenticated request context (AuthCtx) to handlers
 * - axum-specific code stays in core, the type itself in types
 *
 * Public API:
 * - AuthCtx
 * - AuthCtxExtractor
 */

mod core;
mod types;

pub use self::core::AuthCtxExtractor;
pub use types::AuthCtx;
