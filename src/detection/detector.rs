/*!
 * Language detection over a crash-recovering native backend.
 *
 * The native detector is initialized lazily; concurrent first calls share one
 * in-flight initialization. A runtime fault discards the native instance and
 * the next call re-initializes from scratch. Detection is advisory, so every
 * handled error resolves to a safe fallback language instead of propagating.
 */

use std::sync::Arc;

use log::{debug, warn};

use crate::backend::{Detection, DetectorBackend, DetectorHandle};
use crate::errors::DetectorError;
use crate::language_utils::normalize_language_code;

/// Safe language returned when detection fails
pub const FALLBACK_LANGUAGE: &str = "en";

/// Default minimum confidence for `detect_with_confidence`
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Maximum number of characters fed to the native detector. Detection cost
/// grows superlinearly with input size while accuracy saturates well before
/// document length.
pub const MAX_DETECTION_LENGTH: usize = 1024;

/// A detection result with its confidence score
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResult {
    /// Normalized language code; empty when not confidently detected
    pub language: String,

    /// Confidence in the 0.0-1.0 range
    pub confidence: f64,
}

/// Lazily initialized, fault-recovering language detector
pub struct LanguageDetector {
    backend: Arc<dyn DetectorBackend>,

    /// `None` is the uninitialized state. Initialization happens while the
    /// lock is held, so concurrent callers await the same attempt instead of
    /// starting their own.
    handle: tokio::sync::Mutex<Option<Arc<dyn DetectorHandle>>>,
}

impl LanguageDetector {
    /// Create a new detector over a native backend; no native work happens
    /// until the first detect call
    pub fn new(backend: Arc<dyn DetectorBackend>) -> Self {
        Self {
            backend,
            handle: tokio::sync::Mutex::new(None),
        }
    }

    /// Classify the dominant language of a text.
    ///
    /// Returns an empty string for empty input and the fallback language for
    /// any detection failure; a native fault additionally resets the detector
    /// so the next call re-initializes.
    pub async fn detect(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        match self.detect_raw(text).await {
            Ok(detection) => normalize_language_code(&detection.language_code),
            Err(e) => {
                warn!("Language detection failed: {}", e);
                FALLBACK_LANGUAGE.to_string()
            }
        }
    }

    /// Classify a text and report confidence, returning an empty language
    /// code when confidence falls below `min_confidence`.
    ///
    /// Low confidence is an expected outcome, not a failure; detection errors
    /// still resolve to the fallback language with zero confidence.
    pub async fn detect_with_confidence(&self, text: &str, min_confidence: f64) -> DetectionResult {
        if text.is_empty() {
            return DetectionResult {
                language: String::new(),
                confidence: 0.0,
            };
        }

        match self.detect_raw(text).await {
            Ok(detection) => {
                let confidence = detection.percent / 100.0;

                if confidence < min_confidence {
                    return DetectionResult {
                        language: String::new(),
                        confidence,
                    };
                }

                DetectionResult {
                    language: normalize_language_code(&detection.language_code),
                    confidence,
                }
            }
            Err(e) => {
                warn!("Language detection with confidence failed: {}", e);
                DetectionResult {
                    language: FALLBACK_LANGUAGE.to_string(),
                    confidence: 0.0,
                }
            }
        }
    }

    /// Whether a native instance is currently resident (for lifecycle tests)
    pub async fn is_ready(&self) -> bool {
        self.handle.lock().await.is_some()
    }

    /// Run one truncated detection call, resetting state on a fault
    pub(crate) async fn detect_raw(&self, text: &str) -> Result<Detection, DetectorError> {
        let handle = self.ensure_initialized().await?;
        let truncated = truncate_chars(text, MAX_DETECTION_LENGTH);

        match handle.detect(truncated, false).await {
            Ok(detection) => Ok(detection),
            Err(e) => {
                if e.is_fault() {
                    self.reset(&handle).await;
                }
                Err(e)
            }
        }
    }

    /// Get the native handle, initializing it if necessary.
    ///
    /// The lock is held across initialization, which is what makes concurrent
    /// first calls share a single attempt.
    async fn ensure_initialized(&self) -> Result<Arc<dyn DetectorHandle>, DetectorError> {
        let mut slot = self.handle.lock().await;

        if let Some(handle) = slot.as_ref() {
            return Ok(handle.clone());
        }

        debug!("Initializing language detector");

        let handle: Arc<dyn DetectorHandle> = Arc::from(self.backend.init_detector().await?);
        *slot = Some(handle.clone());

        debug!("Language detector initialized");

        Ok(handle)
    }

    /// Discard a faulted native instance so the next call re-initializes.
    /// Only the instance that faulted is discarded; a replacement installed
    /// by a concurrent caller stays.
    async fn reset(&self, faulted: &Arc<dyn DetectorHandle>) {
        let mut slot = self.handle.lock().await;
        if slot.as_ref().is_some_and(|current| Arc::ptr_eq(current, faulted)) {
            warn!("Detector crashed, discarding native instance");
            *slot = None;
        }
    }
}

/// Truncate to at most `max_chars` characters on a char boundary
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
