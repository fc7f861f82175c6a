/*!
 * # lingobridge
 *
 * The in-process orchestration core of a local machine-translation service.
 * The actual sequence-to-sequence inference happens in an externally supplied
 * native backend; this crate is everything the service does around it:
 *
 * - Keep a bounded pool of warm engine instances, one per language pair,
 *   with idle-timeout eviction
 * - Route pairs without a direct model through a hub language (English)
 * - Cache translation results in a bounded LRU keyed by request fingerprint
 * - Detect the language of arbitrary text over a crash-recovering native
 *   detector, and segment mixed-script text into per-language spans
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `backend`: Adapter traits for the native translation and detection
 *   backends
 * - `translation`: Orchestration between a request and the inference backend:
 *   - `translation::core`: TranslationService facade and batch API
 *   - `translation::router`: Pivot routing through the hub language
 *   - `translation::pool`: Warm engine pool with idle eviction
 *   - `translation::cache`: Bounded LRU result cache
 * - `detection`: Language identification:
 *   - `detection::detector`: Lazy-init, fault-recovering detector
 *   - `detection::segmenter`: Multi-language segmentation
 * - `language_utils`: BCP-47 language tag utilities
 * - `errors`: Custom error types for the crate
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod backend;
pub mod detection;
pub mod errors;
pub mod language_utils;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use detection::{LanguageDetector, Segmenter, TextSegment};
pub use errors::{AppError, DetectorError, EngineError, PivotStage, TranslationError};
pub use language_utils::{HUB_LANGUAGE, language_codes_match, normalize_language_code};
pub use translation::{BatchFailurePolicy, EnginePool, PivotRouter, ResultCache, TranslationService};
