/*!
 * Multi-language segmentation of mixed-script text.
 *
 * For text mixing multiple writing systems, the segmenter produces an ordered
 * list of language-homogeneous spans instead of one dominant guess: it splits
 * the input into sentence-like units, detects each unit independently, merges
 * adjacent same-language spans, and caps the number of distinct languages in
 * the result.
 */

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use unicode_segmentation::UnicodeSegmentation;

use crate::detection::detector::{FALLBACK_LANGUAGE, LanguageDetector};
use crate::language_utils::normalize_language_code;

/// A contiguous slice of the input believed to be written in one language
#[derive(Debug, Clone, PartialEq)]
pub struct TextSegment {
    /// The text of this segment
    pub text: String,

    /// Normalized language code
    pub language: String,

    /// Byte offset of the segment start in the original text
    pub start: usize,

    /// Byte offset one past the segment end in the original text
    pub end: usize,

    /// Detection confidence in the 0.0-1.0 range
    pub confidence: f64,
}

/// Splits mixed-script text into language-homogeneous segments
pub struct Segmenter {
    detector: Arc<LanguageDetector>,
    default_threshold: f64,
    max_languages: usize,
}

impl Segmenter {
    /// Create a new segmenter over a language detector
    pub fn new(detector: Arc<LanguageDetector>, default_threshold: f64, max_languages: usize) -> Self {
        Self {
            detector,
            default_threshold,
            max_languages,
        }
    }

    /// Segment a text using the configured confidence threshold
    pub async fn detect_multiple_languages(&self, text: &str) -> Vec<TextSegment> {
        self.detect_multiple_languages_with_threshold(text, self.default_threshold)
            .await
    }

    /// Segment a text, relabeling units below `threshold` with the whole-text
    /// fallback language so low-confidence spans never introduce spurious
    /// extra languages.
    ///
    /// The returned segments are contiguous, ordered by start offset, and
    /// concatenate back to the original text exactly. Empty input yields an
    /// empty list.
    pub async fn detect_multiple_languages_with_threshold(
        &self,
        text: &str,
        threshold: f64,
    ) -> Vec<TextSegment> {
        if text.is_empty() {
            return Vec::new();
        }

        let whole_text_language = self.detector.detect(text).await;
        let fallback = if whole_text_language.is_empty() {
            FALLBACK_LANGUAGE.to_string()
        } else {
            whole_text_language
        };

        if !has_mixed_scripts(text) {
            debug!(
                "DetectMultipleLanguages: no mixed scripts, using single language: {}",
                fallback
            );
            return vec![TextSegment {
                text: text.to_string(),
                language: fallback,
                start: 0,
                end: text.len(),
                confidence: 1.0,
            }];
        }

        debug!(
            "DetectMultipleLanguages: mixed scripts detected, fallback={}, threshold={:.2}",
            fallback, threshold
        );

        let mut segments = Vec::new();

        for (offset, sentence) in text.split_sentence_bound_indices() {
            let segment = match self.detector.detect_raw(sentence).await {
                Ok(detection) => {
                    let confidence = detection.percent / 100.0;
                    let detected = normalize_language_code(&detection.language_code);
                    TextSegment {
                        text: sentence.to_string(),
                        language: if confidence >= threshold {
                            detected
                        } else {
                            fallback.clone()
                        },
                        start: offset,
                        end: offset + sentence.len(),
                        confidence,
                    }
                }
                Err(e) => {
                    debug!("Failed to detect language for segment: {}", e);
                    TextSegment {
                        text: sentence.to_string(),
                        language: fallback.clone(),
                        start: offset,
                        end: offset + sentence.len(),
                        confidence: 0.0,
                    }
                }
            };

            segments.push(segment);
        }

        let unit_count = segments.len();
        let merged = merge_adjacent_segments(segments, text);
        let merged_count = merged.len();
        let limited = limit_languages(merged, text, self.max_languages);

        debug!(
            "DetectMultipleLanguages: {} sentences -> {} merged -> {} final segments",
            unit_count,
            merged_count,
            limited.len()
        );

        limited
    }
}

/// Whether a text mixes CJK and Latin writing systems
pub fn has_mixed_scripts(text: &str) -> bool {
    let mut has_cjk = false;
    let mut has_latin = false;

    for ch in text.chars() {
        let code = ch as u32;

        if (0x4e00..=0x9fff).contains(&code)
            || (0x3040..=0x309f).contains(&code)
            || (0x30a0..=0x30ff).contains(&code)
            || (0xac00..=0xd7af).contains(&code)
        {
            has_cjk = true;
        } else if ch.is_ascii_alphabetic() {
            has_latin = true;
        }

        if has_cjk && has_latin {
            return true;
        }
    }

    false
}

/// Merge adjacent segments sharing a language into one span, keeping the
/// maximum confidence observed
fn merge_adjacent_segments(segments: Vec<TextSegment>, original_text: &str) -> Vec<TextSegment> {
    if segments.len() <= 1 {
        return segments;
    }

    let mut merged: Vec<TextSegment> = Vec::new();
    let mut iter = segments.into_iter();
    let Some(mut current) = iter.next() else {
        return merged;
    };

    for next in iter {
        if current.language == next.language {
            current.end = next.end;
            current.text = original_text[current.start..current.end].to_string();
            if next.confidence > current.confidence {
                current.confidence = next.confidence;
            }
        } else {
            merged.push(current);
            current = next;
        }
    }
    merged.push(current);

    merged
}

/// Cap the number of distinct languages by total span, reassigning spans of
/// excluded languages to the single most dominant language and re-merging
fn limit_languages(
    mut segments: Vec<TextSegment>,
    original_text: &str,
    max_languages: usize,
) -> Vec<TextSegment> {
    if segments.len() <= 1 {
        return segments;
    }

    let mut span_per_language: HashMap<String, usize> = HashMap::new();
    for segment in &segments {
        *span_per_language.entry(segment.language.clone()).or_insert(0) +=
            segment.end - segment.start;
    }

    if span_per_language.len() <= max_languages {
        return segments;
    }

    let mut ranked: Vec<(String, usize)> = span_per_language.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let dominant = ranked[0].0.clone();
    let kept: Vec<&str> = ranked
        .iter()
        .take(max_languages)
        .map(|(lang, _)| lang.as_str())
        .collect();

    for segment in &mut segments {
        if !kept.contains(&segment.language.as_str()) {
            segment.language = dominant.clone();
        }
    }

    let result = merge_adjacent_segments(segments, original_text);
    debug!(
        "limit_languages: reduced to {} languages, {} segments",
        max_languages,
        result.len()
    );

    result
}
