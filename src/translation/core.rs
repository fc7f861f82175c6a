/*!
 * Core translation service implementation.
 *
 * This module contains the main TranslationService struct, the facade the
 * transport layer calls into. It wires the result cache in front of the pivot
 * router, owns the engine pool lifecycle, and exposes an explicit per-call
 * failure policy for batch translation.
 */

use std::sync::Arc;

use log::{debug, error};

use crate::app_config::Config;
use crate::backend::{ModelResolver, TranslationBackend};
use crate::errors::TranslationError;
use crate::language_utils::normalize_language_code;
use crate::translation::cache::ResultCache;
use crate::translation::pool::EnginePool;
use crate::translation::router::PivotRouter;

/// What a batch translation does when one item fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchFailurePolicy {
    /// The first failing item aborts the whole batch
    Abort,
    /// A failing item yields its input text unchanged
    SubstituteOriginal,
    /// Every item reports its own success or failure
    ReportPerItem,
}

/// Main translation facade: cache in front, pivot routing behind
pub struct TranslationService {
    cache: ResultCache,
    router: PivotRouter,
    pool: Arc<EnginePool>,
}

impl TranslationService {
    /// Create a new translation service from a configuration and the native
    /// backend adapters
    pub fn new(
        config: &Config,
        resolver: Arc<dyn ModelResolver>,
        backend: Arc<dyn TranslationBackend>,
    ) -> Self {
        let pool = Arc::new(EnginePool::new(
            resolver.clone(),
            backend,
            config.engine_idle_timeout(),
            config.engine_init_timeout(),
        ));

        Self {
            cache: ResultCache::new(config.cache_size),
            router: PivotRouter::new(pool.clone(), resolver),
            pool,
        }
    }

    /// Translate a text, consulting the cache first and bridging through the
    /// hub language when the pair has no direct model.
    ///
    /// Successful results are written through to the cache; failed
    /// translations are never cached.
    pub async fn translate_with_pivot(
        &self,
        from: &str,
        to: &str,
        text: &str,
        is_html: bool,
    ) -> Result<String, TranslationError> {
        let from = normalize_language_code(from);
        let to = normalize_language_code(to);

        debug!(
            "TranslateWithPivot: {} -> {}, text length: {}, is_html: {}",
            from,
            to,
            text.len(),
            is_html
        );

        if from == to {
            return Ok(text.to_string());
        }

        if let Some(cached) = self.cache.lookup(&from, &to, text, is_html) {
            return Ok(cached);
        }

        let result = self.router.translate(&from, &to, text, is_html).await?;
        self.cache.store(&from, &to, text, is_html, &result);

        Ok(result)
    }

    /// Translate a batch of texts sequentially, preserving order.
    ///
    /// The failure policy is the caller's choice per call; there is no
    /// implicit fallback. With `Abort` the returned vector is never partial.
    pub async fn translate_batch(
        &self,
        from: &str,
        to: &str,
        texts: &[String],
        is_html: bool,
        policy: BatchFailurePolicy,
    ) -> Result<Vec<Result<String, TranslationError>>, TranslationError> {
        let mut results = Vec::with_capacity(texts.len());

        for (index, text) in texts.iter().enumerate() {
            match self.translate_with_pivot(from, to, text, is_html).await {
                Ok(result) => results.push(Ok(result)),
                Err(e) => match policy {
                    BatchFailurePolicy::Abort => {
                        error!("Batch translation failed at index {}: {}", index, e);
                        return Err(e);
                    }
                    BatchFailurePolicy::SubstituteOriginal => {
                        error!(
                            "Batch translation failed at index {}, substituting original: {}",
                            index, e
                        );
                        results.push(Ok(text.clone()));
                    }
                    BatchFailurePolicy::ReportPerItem => {
                        error!("Batch translation failed at index {}: {}", index, e);
                        results.push(Err(e));
                    }
                },
            }
        }

        Ok(results)
    }

    /// Cache statistics as (hits, misses, hit rate)
    pub fn cache_stats(&self) -> (usize, usize, f64) {
        self.cache.stats()
    }

    /// The engine pool, exposed for lifecycle inspection
    pub fn pool(&self) -> &Arc<EnginePool> {
        &self.pool
    }

    /// Release every pooled engine and refuse further work; idempotent
    pub async fn shutdown(&self) {
        self.pool.shutdown().await;
    }
}
