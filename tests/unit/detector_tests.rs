/*!
 * Tests for the language detector: lazy initialization, normalization,
 * confidence thresholds, and crash recovery
 */

use std::sync::Arc;

use lingobridge::detection::LanguageDetector;
use lingobridge::errors::DetectorError;

use crate::common::StubDetectorBackend;

#[tokio::test]
async fn test_detector_detect_withEmptyInput_shouldReturnEmptyWithoutInit() {
    let backend = Arc::new(StubDetectorBackend::new());
    let detector = LanguageDetector::new(backend.clone());

    assert_eq!(detector.detect("").await, "");
    assert_eq!(backend.init_count(), 0);
    assert!(!detector.is_ready().await);
}

#[tokio::test]
async fn test_detector_detect_withLatinText_shouldReturnEnglish() {
    let backend = Arc::new(StubDetectorBackend::new());
    let detector = LanguageDetector::new(backend.clone());

    assert_eq!(detector.detect("Hello world").await, "en");
    assert_eq!(backend.init_count(), 1);
    assert!(detector.is_ready().await);
}

#[tokio::test]
async fn test_detector_detect_withGenericChinese_shouldNormalizeToSimplified() {
    let backend = Arc::new(StubDetectorBackend::new());
    let detector = LanguageDetector::new(backend);

    assert_eq!(detector.detect("你好世界").await, "zh-Hans");
}

#[tokio::test]
async fn test_detector_detect_withRepeatedCalls_shouldInitializeOnce() {
    let backend = Arc::new(StubDetectorBackend::new());
    let detector = LanguageDetector::new(backend.clone());

    detector.detect("first").await;
    detector.detect("second").await;

    assert_eq!(backend.init_count(), 1);
}

#[tokio::test]
async fn test_detector_detect_withConcurrentFirstCalls_shouldShareOneInit() {
    let backend = Arc::new(StubDetectorBackend::new());
    let detector = Arc::new(LanguageDetector::new(backend.clone()));

    let (a, b) = tokio::join!(detector.detect("hello"), detector.detect("world"));

    assert_eq!(a, "en");
    assert_eq!(b, "en");
    assert_eq!(backend.init_count(), 1);
}

#[tokio::test]
async fn test_detector_detect_withInitFailure_shouldReturnFallback() {
    let backend = Arc::new(StubDetectorBackend::new().with_failing_init());
    let detector = LanguageDetector::new(backend);

    assert_eq!(detector.detect("Hello world").await, "en");
}

#[tokio::test]
async fn test_detector_detect_withFault_shouldReturnFallbackAndRecover() {
    let backend = Arc::new(StubDetectorBackend::new());
    let detector = LanguageDetector::new(backend.clone());

    backend.script_error(DetectorError::Fault("memory access out of bounds".to_string()));

    // The fault is masked behind the fallback, and the faulted instance is
    // discarded
    assert_eq!(detector.detect("Hello world").await, "en");
    assert!(!detector.is_ready().await);

    // The next call re-initializes and succeeds normally
    assert_eq!(detector.detect("你好世界").await, "zh-Hans");
    assert_eq!(backend.init_count(), 2);
}

#[tokio::test]
async fn test_detector_detect_withNonFaultError_shouldKeepInstance() {
    let backend = Arc::new(StubDetectorBackend::new());
    let detector = LanguageDetector::new(backend.clone());

    backend.script_error(DetectorError::NotInitialized);

    assert_eq!(detector.detect("Hello world").await, "en");
    // Instance stays resident; no re-initialization happens
    assert!(detector.is_ready().await);

    detector.detect("Hello again").await;
    assert_eq!(backend.init_count(), 1);
}

#[tokio::test]
async fn test_detector_detectWithConfidence_withEmptyInput_shouldReturnEmpty() {
    let backend = Arc::new(StubDetectorBackend::new());
    let detector = LanguageDetector::new(backend);

    let result = detector.detect_with_confidence("", 0.5).await;

    assert_eq!(result.language, "");
    assert_eq!(result.confidence, 0.0);
}

#[tokio::test]
async fn test_detector_detectWithConfidence_aboveThreshold_shouldReturnLanguage() {
    let backend = Arc::new(StubDetectorBackend::new());
    let detector = LanguageDetector::new(backend);

    let result = detector.detect_with_confidence("Hello world", 0.5).await;

    assert_eq!(result.language, "en");
    assert!((result.confidence - 0.95).abs() < 1e-9);
}

#[tokio::test]
async fn test_detector_detectWithConfidence_belowThreshold_shouldReturnEmptyLanguage() {
    let backend = Arc::new(StubDetectorBackend::new());
    let detector = LanguageDetector::new(backend.clone());

    backend.script_detection("fr", 30.0);

    let result = detector.detect_with_confidence("peut-etre", 0.5).await;

    // Not confidently detected: empty code, real confidence
    assert_eq!(result.language, "");
    assert!((result.confidence - 0.3).abs() < 1e-9);
}

#[tokio::test]
async fn test_detector_detectWithConfidence_withFault_shouldReturnFallbackZeroConfidence() {
    let backend = Arc::new(StubDetectorBackend::new());
    let detector = LanguageDetector::new(backend.clone());

    backend.script_error(DetectorError::Fault("runtime trap".to_string()));

    let result = detector.detect_with_confidence("Hello world", 0.5).await;

    assert_eq!(result.language, "en");
    assert_eq!(result.confidence, 0.0);
    assert!(!detector.is_ready().await);
}
