/*!
 * Translation orchestration for the lingobridge core.
 *
 * This module owns everything between an incoming translation request and the
 * native inference backend. It is split into several submodules:
 *
 * - `core`: the TranslationService facade and batch API
 * - `router`: pivot routing through the hub language
 * - `pool`: warm engine pool with idle eviction
 * - `cache`: bounded LRU result cache
 */

// Re-export main types for easier usage
pub use self::cache::ResultCache;
pub use self::core::{BatchFailurePolicy, TranslationService};
pub use self::pool::{EnginePool, PairKey};
pub use self::router::PivotRouter;

// Submodules
pub mod cache;
pub mod core;
pub mod pool;
pub mod router;
