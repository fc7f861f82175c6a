/*!
 * Adapter interfaces between the orchestration core and the native backends.
 *
 * The core never touches a native binding directly; everything it needs is
 * expressed through the traits in this module:
 * - `ModelResolver`: locates the binary resources for a language pair
 * - `TranslationBackend` / `EngineHandle`: the inference engine surface
 * - `DetectorBackend` / `DetectorHandle`: the language-identification surface
 *
 * Keeping these seams explicit means the core depends on a fixed interface
 * rather than the internal object shape of any particular binding, and test
 * code can substitute call-counting stubs for every native surface.
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::{DetectorError, EngineError};

/// Opaque binary buffers needed to initialize a native translation engine
#[derive(Debug, Clone, Default)]
pub struct ModelBuffers {
    /// Model weights
    pub model: Vec<u8>,

    /// Lexical shortlist
    pub lexical_shortlist: Vec<u8>,

    /// Source-side vocabulary
    pub source_vocab: Vec<u8>,

    /// Target-side vocabulary
    pub target_vocab: Vec<u8>,
}

/// Resolves model resources and pair capabilities for the engine pool
///
/// Implementations own model discovery and (when not offline) download; the
/// pool only ever asks for the final buffers.
#[async_trait]
pub trait ModelResolver: Send + Sync + Debug {
    /// Resolve the binary resources for a language pair
    ///
    /// # Arguments
    /// * `from` - Source language code
    /// * `to` - Target language code
    ///
    /// # Returns
    /// * `Result<ModelBuffers, EngineError>` - The buffers, or
    ///   `EngineError::ModelUnavailable` when the pair cannot be resolved
    async fn resolve(&self, from: &str, to: &str) -> Result<ModelBuffers, EngineError>;

    /// Whether a direct (non-hub) model exists for a pair
    fn has_direct_pair(&self, from: &str, to: &str) -> bool;
}

/// Factory surface of the native inference backend
#[async_trait]
pub trait TranslationBackend: Send + Sync + Debug {
    /// Initialize a new native engine from model buffers
    ///
    /// # Returns
    /// * `Result<Box<dyn EngineHandle>, EngineError>` - A ready engine handle,
    ///   or `EngineError::InitFailure` when native initialization errors
    async fn init_engine(&self, buffers: ModelBuffers) -> Result<Box<dyn EngineHandle>, EngineError>;
}

/// A ready-to-use native engine instance
///
/// Dropping the handle releases the native instance; the pool is the only
/// long-term owner of handles.
#[async_trait]
pub trait EngineHandle: Send + Sync + Debug {
    /// Translate a text with this engine
    ///
    /// # Arguments
    /// * `text` - The input text
    /// * `is_html` - Whether the input should be treated as HTML markup
    async fn translate(&self, text: &str, is_html: bool) -> Result<String, EngineError>;
}

/// A single language guess from the native detector
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Detected language code as reported by the backend (not yet normalized)
    pub language_code: String,

    /// Share of the input attributed to this language, 0-100
    pub percent: f64,

    /// Whether the backend considers the guess reliable
    pub is_reliable: bool,
}

/// Factory surface of the native language-identification backend
#[async_trait]
pub trait DetectorBackend: Send + Sync + Debug {
    /// Initialize a new native detector instance
    async fn init_detector(&self) -> Result<Box<dyn DetectorHandle>, DetectorError>;
}

/// A ready-to-use native detector instance
///
/// A `DetectorError::Fault` from `detect` means the native instance trapped
/// and must be discarded; any other error leaves it usable.
#[async_trait]
pub trait DetectorHandle: Send + Sync + Debug {
    /// Classify the dominant language of a text
    async fn detect(&self, text: &str, is_html: bool) -> Result<Detection, DetectorError>;
}
