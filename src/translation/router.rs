/*!
 * Pivot routing between language pairs.
 *
 * Pairs with a direct model (or with the hub language on either side) get one
 * backend call. Every other pair is bridged through the hub language with two
 * strictly sequential calls, keeping the required model set linear in the
 * number of supported languages instead of quadratic.
 */

use std::sync::Arc;

use log::debug;

use crate::backend::ModelResolver;
use crate::errors::{PivotStage, TranslationError};
use crate::language_utils::HUB_LANGUAGE;
use crate::translation::pool::EnginePool;

/// Routes translations directly or through the hub language
pub struct PivotRouter {
    pool: Arc<EnginePool>,
    resolver: Arc<dyn ModelResolver>,
}

impl PivotRouter {
    /// Create a new router over an engine pool
    pub fn new(pool: Arc<EnginePool>, resolver: Arc<dyn ModelResolver>) -> Self {
        Self { pool, resolver }
    }

    /// Whether a pair has to be bridged through the hub language
    pub fn needs_pivot(&self, from: &str, to: &str) -> bool {
        if from == HUB_LANGUAGE || to == HUB_LANGUAGE {
            return false;
        }

        !self.resolver.has_direct_pair(from, to)
    }

    /// Translate a text, transparently pivoting when no direct model exists.
    ///
    /// A failure on any leg aborts the whole sequence; partial results are
    /// never returned.
    pub async fn translate(
        &self,
        from: &str,
        to: &str,
        text: &str,
        is_html: bool,
    ) -> Result<String, TranslationError> {
        if from == to {
            return Ok(text.to_string());
        }

        if !self.needs_pivot(from, to) {
            return self.translate_leg(from, to, text, is_html, PivotStage::Direct).await;
        }

        debug!("Pivoting {} -> {} through {}", from, to, HUB_LANGUAGE);

        let intermediate = self
            .translate_leg(from, HUB_LANGUAGE, text, is_html, PivotStage::ToHub)
            .await?;

        self.translate_leg(HUB_LANGUAGE, to, &intermediate, is_html, PivotStage::FromHub)
            .await
    }

    /// Run a single backend call for one leg of the route
    async fn translate_leg(
        &self,
        from: &str,
        to: &str,
        text: &str,
        is_html: bool,
        stage: PivotStage,
    ) -> Result<String, TranslationError> {
        let engine = self.pool.acquire(from, to).await?;

        engine
            .translate(text, is_html)
            .await
            .map_err(|e| TranslationError::Backend {
                stage,
                message: e.to_string(),
            })
    }
}
