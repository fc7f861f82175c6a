/*!
 * Language detection and multi-language segmentation.
 *
 * - `detector`: single-language classification with lazy initialization and
 *   crash recovery over the native identification backend
 * - `segmenter`: mixed-script splitting, merging, and language capping
 */

// Re-export main types for easier usage
pub use self::detector::{
    DEFAULT_CONFIDENCE_THRESHOLD, DetectionResult, FALLBACK_LANGUAGE, LanguageDetector,
    MAX_DETECTION_LENGTH,
};
pub use self::segmenter::{Segmenter, TextSegment};

// Submodules
pub mod detector;
pub mod segmenter;
