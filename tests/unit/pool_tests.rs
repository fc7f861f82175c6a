/*!
 * Tests for the engine pool lifecycle: creation, reuse, serialized
 * concurrent creation, idle eviction, and shutdown
 */

use std::sync::Arc;
use std::time::Duration;

use lingobridge::backend::EngineHandle;
use lingobridge::errors::EngineError;
use lingobridge::translation::EnginePool;

use crate::common::{init_test_logging, StubModelResolver, StubTranslationBackend};

fn make_pool(
    resolver: Arc<StubModelResolver>,
    backend: Arc<StubTranslationBackend>,
    idle_secs: u64,
    init_secs: u64,
) -> EnginePool {
    EnginePool::new(
        resolver,
        backend,
        Duration::from_secs(idle_secs),
        Duration::from_secs(init_secs),
    )
}

#[tokio::test]
async fn test_pool_acquire_withRepeatedCalls_shouldInitializeOnce() {
    let resolver = Arc::new(StubModelResolver::new());
    let backend = Arc::new(StubTranslationBackend::new());
    let pool = make_pool(resolver, backend.clone(), 60, 30);

    let first = pool.acquire("en", "fr").await.unwrap();
    let second = pool.acquire("en", "fr").await.unwrap();

    assert_eq!(backend.init_count(), 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert!(pool.contains("en", "fr"));
    assert_eq!(pool.len(), 1);
}

#[tokio::test]
async fn test_pool_acquire_withDistinctPairs_shouldInitializePerPair() {
    let resolver = Arc::new(StubModelResolver::new());
    let backend = Arc::new(StubTranslationBackend::new());
    let pool = make_pool(resolver, backend.clone(), 60, 30);

    pool.acquire("en", "fr").await.unwrap();
    pool.acquire("fr", "en").await.unwrap();

    assert_eq!(backend.init_count(), 2);
    assert_eq!(pool.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_pool_acquire_withConcurrentCallsForSamePair_shouldInitializeOnce() {
    let resolver = Arc::new(StubModelResolver::new());
    let backend = Arc::new(
        StubTranslationBackend::new().with_init_delay(Duration::from_millis(100)),
    );
    let pool = make_pool(resolver, backend.clone(), 60, 30);

    let (first, second) = tokio::join!(pool.acquire("de", "fr"), pool.acquire("de", "fr"));

    assert!(first.is_ok());
    assert!(second.is_ok());
    assert_eq!(backend.init_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_pool_idleTimeout_shouldEvictAndRecreateOnNextAcquire() {
    let resolver = Arc::new(StubModelResolver::new());
    let backend = Arc::new(StubTranslationBackend::new());
    let pool = make_pool(resolver, backend.clone(), 60, 30);

    let first = pool.acquire("en", "fr").await.unwrap();
    assert!(pool.contains("en", "fr"));

    tokio::time::sleep(Duration::from_secs(120)).await;

    assert!(!pool.contains("en", "fr"));
    assert!(pool.is_empty());

    // Recreated transparently with a fresh handle
    let second = pool.acquire("en", "fr").await.unwrap();
    assert_eq!(backend.init_count(), 2);
    assert!(!Arc::ptr_eq(&first, &second));
}

#[tokio::test(start_paused = true)]
async fn test_pool_acquire_shouldRefreshIdleTimer() {
    let resolver = Arc::new(StubModelResolver::new());
    let backend = Arc::new(StubTranslationBackend::new());
    let pool = make_pool(resolver, backend.clone(), 60, 30);

    pool.acquire("en", "fr").await.unwrap();

    // Refresh before the first timer would fire
    tokio::time::sleep(Duration::from_secs(40)).await;
    pool.acquire("en", "fr").await.unwrap();

    // 80s after creation but only 40s after the refresh
    tokio::time::sleep(Duration::from_secs(40)).await;
    assert!(pool.contains("en", "fr"));

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert!(!pool.contains("en", "fr"));

    assert_eq!(backend.init_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_pool_acquire_underEvictionChurn_shouldServeEveryCall() {
    init_test_logging();

    let resolver = Arc::new(StubModelResolver::new());
    let backend = Arc::new(StubTranslationBackend::new());
    let pool = Arc::new(EnginePool::new(
        resolver,
        backend.clone(),
        Duration::from_millis(2),
        Duration::from_secs(30),
    ));

    // Acquires timed to land inside the eviction window, across real
    // threads, so evicting timers and incoming acquires contend on the
    // slot and map locks in every order
    let mut tasks = Vec::new();
    for _ in 0..4 {
        let pool = pool.clone();
        tasks.push(tokio::spawn(async move {
            for _ in 0..25 {
                let engine = pool.acquire("en", "fr").await.unwrap();
                engine.translate("warm", false).await.unwrap();
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    assert!(pool.len() <= 1);

    // After the last acquire idles out, nothing is left behind
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(pool.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_pool_acquire_withSlowInit_shouldTimeOut() {
    let resolver = Arc::new(StubModelResolver::new());
    let backend = Arc::new(
        StubTranslationBackend::new().with_init_delay(Duration::from_secs(120)),
    );
    let pool = make_pool(resolver.clone(), backend, 60, 30);

    let result = pool.acquire("en", "fr").await;

    assert!(matches!(
        result,
        Err(EngineError::InitTimeout { timeout_secs: 30 })
    ));

    // The failed slot is discarded, not cached as a negative result
    assert!(!pool.contains("en", "fr"));
}

#[tokio::test]
async fn test_pool_acquire_withFailingInit_shouldAllowRetry() {
    let resolver = Arc::new(StubModelResolver::new());
    let backend = Arc::new(StubTranslationBackend::new().with_failing_init());
    let pool = make_pool(resolver.clone(), backend, 60, 30);

    assert!(matches!(
        pool.acquire("en", "fr").await,
        Err(EngineError::InitFailure(_))
    ));
    assert!(!pool.contains("en", "fr"));

    // A later acquire starts over from model resolution
    let _ = pool.acquire("en", "fr").await;
    assert_eq!(
        resolver.resolve_calls.load(std::sync::atomic::Ordering::SeqCst),
        2
    );
}

#[tokio::test]
async fn test_pool_acquire_withUnresolvablePair_shouldFailWithModelUnavailable() {
    let resolver = Arc::new(StubModelResolver::new().with_unavailable_pair("en", "xx"));
    let backend = Arc::new(StubTranslationBackend::new());
    let pool = make_pool(resolver, backend.clone(), 60, 30);

    let result = pool.acquire("en", "xx").await;

    assert!(matches!(result, Err(EngineError::ModelUnavailable { .. })));
    assert_eq!(backend.init_count(), 0);
    assert!(!pool.contains("en", "xx"));
}

#[tokio::test]
async fn test_pool_shutdown_shouldReleaseEnginesAndFailNewAcquires() {
    let resolver = Arc::new(StubModelResolver::new());
    let backend = Arc::new(StubTranslationBackend::new());
    let pool = make_pool(resolver, backend.clone(), 60, 30);

    pool.acquire("en", "fr").await.unwrap();
    pool.acquire("en", "de").await.unwrap();

    pool.shutdown().await;

    assert!(pool.is_empty());
    assert!(matches!(
        pool.acquire("en", "fr").await,
        Err(EngineError::PoolClosed)
    ));

    // Idempotent
    pool.shutdown().await;
    assert!(pool.is_empty());
}
