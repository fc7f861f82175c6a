/*!
 * Warm engine pool with idle eviction.
 *
 * The pool owns at most one native engine per (source, target) pair. Engines
 * are created lazily on first acquire, kept warm for reuse, and released
 * after a configurable idle period. Creation for a given pair is serialized
 * through a per-key async slot so two interleaved requests for a never-built
 * pair cannot race to build it twice.
 */

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use log::{debug, info};
use parking_lot::Mutex;
use tokio::sync::OwnedMutexGuard;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::backend::{EngineHandle, ModelResolver, TranslationBackend};
use crate::errors::EngineError;

/// Key identifying one translation direction in the pool
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey {
    /// Source language code
    pub from: String,

    /// Target language code
    pub to: String,
}

impl PairKey {
    /// Create a new pair key
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

impl std::fmt::Display for PairKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// Per-pair slot state, guarded by an async mutex.
///
/// Holding the slot lock is what serializes creation: every acquire for the
/// key locks the slot before looking at the entry, so concurrent callers for
/// an absent engine queue up behind the one doing the initialization.
struct Slot {
    /// The warm engine, if one is resident
    engine: Option<Arc<dyn EngineHandle>>,

    /// Bumped on every acquire; an idle timer only evicts if the generation
    /// it captured is still current when it fires
    generation: u64,

    /// The armed single-shot idle timer task
    timer: Option<JoinHandle<()>>,
}

impl Slot {
    fn empty() -> Self {
        Self {
            engine: None,
            generation: 0,
            timer: None,
        }
    }
}

type SlotRef = Arc<tokio::sync::Mutex<Slot>>;

/// Shared pool state reachable from idle-timer tasks
struct PoolShared {
    slots: Mutex<HashMap<PairKey, SlotRef>>,
    closed: AtomicBool,
}

/// Pool of warm native translation engines, one per language pair
pub struct EnginePool {
    resolver: Arc<dyn ModelResolver>,
    backend: Arc<dyn TranslationBackend>,
    idle_timeout: Duration,
    init_timeout: Duration,
    shared: Arc<PoolShared>,
}

impl EnginePool {
    /// Create a new, empty engine pool
    pub fn new(
        resolver: Arc<dyn ModelResolver>,
        backend: Arc<dyn TranslationBackend>,
        idle_timeout: Duration,
        init_timeout: Duration,
    ) -> Self {
        Self {
            resolver,
            backend,
            idle_timeout,
            init_timeout,
            shared: Arc::new(PoolShared {
                slots: Mutex::new(HashMap::new()),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Get a ready engine for a language pair, creating one if needed.
    ///
    /// Refreshes the idle timer on every call. Fails with
    /// `EngineError::ModelUnavailable` when no resources resolve for the pair,
    /// `EngineError::InitFailure` / `EngineError::InitTimeout` when native
    /// initialization fails, and `EngineError::PoolClosed` after shutdown.
    pub async fn acquire(&self, from: &str, to: &str) -> Result<Arc<dyn EngineHandle>, EngineError> {
        if self.shared.closed.load(Ordering::SeqCst) {
            return Err(EngineError::PoolClosed);
        }

        let key = PairKey::new(from, to);
        let (slot, mut guard) = self.lock_current_slot(&key).await;

        // Shutdown may have happened while waiting for the slot
        if self.shared.closed.load(Ordering::SeqCst) {
            self.discard_slot(&key, &slot, &guard);
            return Err(EngineError::PoolClosed);
        }

        if let Some(engine) = guard.engine.clone() {
            self.arm_idle_timer(&key, &slot, &mut guard);
            return Ok(engine);
        }

        info!("Creating new engine for {} -> {}", key.from, key.to);

        let engine = match self.create_engine(from, to).await {
            Ok(engine) => engine,
            Err(e) => {
                // A failed creation is not cached as a negative result;
                // the next acquire for the pair starts from scratch.
                self.discard_slot(&key, &slot, &guard);
                return Err(e);
            }
        };

        guard.engine = Some(engine.clone());
        self.arm_idle_timer(&key, &slot, &mut guard);

        info!("Engine created successfully for {} -> {}", key.from, key.to);

        Ok(engine)
    }

    /// Number of resident engine slots
    pub fn len(&self) -> usize {
        self.shared.slots.lock().len()
    }

    /// Whether the pool currently holds no engines
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a warm slot exists for a pair
    pub fn contains(&self, from: &str, to: &str) -> bool {
        self.shared
            .slots
            .lock()
            .contains_key(&PairKey::new(from, to))
    }

    /// Release every engine and refuse further acquisitions.
    ///
    /// Idempotent. An acquire that is mid-creation when shutdown runs is
    /// allowed to finish; its engine stays alive through the caller's handle
    /// and is released when that handle drops.
    pub async fn shutdown(&self) {
        if self.shared.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        let drained: Vec<(PairKey, SlotRef)> = self.shared.slots.lock().drain().collect();

        info!(
            "Shutting down engine pool, releasing {} engine(s)",
            drained.len()
        );

        for (key, slot) in drained {
            let mut guard = slot.lock().await;
            if let Some(timer) = guard.timer.take() {
                timer.abort();
            }
            if guard.engine.take().is_some() {
                debug!("Released engine: {}", key);
            }
        }
    }

    /// Resolve model resources and initialize a native engine, bounded by the
    /// configured startup timeout
    async fn create_engine(&self, from: &str, to: &str) -> Result<Arc<dyn EngineHandle>, EngineError> {
        let buffers = self.resolver.resolve(from, to).await?;

        let init = self.backend.init_engine(buffers);
        let handle = match timeout(self.init_timeout, init).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(EngineError::InitTimeout {
                    timeout_secs: self.init_timeout.as_secs(),
                });
            }
        };

        Ok(Arc::from(handle))
    }

    /// Lock the slot that is currently in the map for a key.
    ///
    /// Between fetching the slot and winning its lock, an idle eviction may
    /// remove that slot from the map; building an engine into the orphaned
    /// slot would let a later acquire build a second one for the same pair.
    /// Re-checking identity under the map lock and retrying closes that
    /// window.
    async fn lock_current_slot(&self, key: &PairKey) -> (SlotRef, OwnedMutexGuard<Slot>) {
        loop {
            let slot = {
                let mut slots = self.shared.slots.lock();
                slots
                    .entry(key.clone())
                    .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(Slot::empty())))
                    .clone()
            };

            let guard = slot.clone().lock_owned().await;

            let still_current = self
                .shared
                .slots
                .lock()
                .get(key)
                .is_some_and(|current| Arc::ptr_eq(current, &slot));

            if still_current {
                return (slot, guard);
            }
        }
    }

    /// Remove an engine-less slot from the map (creation failed or the pool
    /// closed underneath the caller)
    fn discard_slot(&self, key: &PairKey, slot: &SlotRef, guard: &Slot) {
        if guard.engine.is_some() {
            return;
        }

        let mut slots = self.shared.slots.lock();
        if slots.get(key).is_some_and(|current| Arc::ptr_eq(current, slot)) {
            slots.remove(key);
        }
    }

    /// Re-arm the single-shot idle timer for a slot.
    ///
    /// The previous timer is aborted and the generation bumped, so a timer
    /// that already fired but has not yet taken the slot lock becomes a
    /// no-op when it observes the stale generation.
    fn arm_idle_timer(&self, key: &PairKey, slot: &SlotRef, guard: &mut Slot) {
        if let Some(old) = guard.timer.take() {
            old.abort();
        }

        guard.generation += 1;
        let generation = guard.generation;

        let shared = self.shared.clone();
        let slot = slot.clone();
        let key = key.clone();
        let idle_timeout = self.idle_timeout;

        guard.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(idle_timeout).await;

            let mut guard = slot.lock().await;
            if guard.generation != generation {
                return;
            }

            if guard.engine.take().is_some() {
                info!("Engine {} idle timeout, stopping", key);
            }
            guard.timer = None;

            // The map entry comes out while the slot lock is still held; an
            // acquire that wins the lock afterwards fails its identity check
            // instead of building into an orphaned slot.
            let mut slots = shared.slots.lock();
            if slots.get(&key).is_some_and(|current| Arc::ptr_eq(current, &slot)) {
                slots.remove(&key);
            }
        }));
    }
}

impl Drop for EnginePool {
    fn drop(&mut self) {
        // A dropped-but-not-shut-down pool should not leave sleep tasks
        // behind; the timers only hold the shared state, not the pool.
        let slots = self.shared.slots.lock();
        for slot in slots.values() {
            if let Ok(mut guard) = slot.try_lock() {
                if let Some(timer) = guard.timer.take() {
                    timer.abort();
                }
            }
        }
    }
}
