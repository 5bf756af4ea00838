//! Per-node hyperlink state machines driven by spawned lookups.

use super::{
    classify, HyperlinkKey, HyperlinkLookup, HyperlinkResolution, ResolutionEvent,
    UnresolvedReason,
};
use crate::model::DocumentInstance;
use futures::FutureExt;
use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;

struct Slot {
    state: HyperlinkResolution,
    /// Distinguishes this slot from one re-created after a discard
    generation: u64,
    task: Option<JoinHandle<()>>,
}

type Slots = Arc<Mutex<HashMap<HyperlinkKey, Slot>>>;

/// Resolves entry hyperlinks through a lookup service.
///
/// Holds the only mutable state of a render: one slot per hyperlink node.
/// A node's first [`resolve`](Self::resolve) spawns its lookup on the
/// runtime; later calls only report the slot's state, so a node is never
/// looked up twice.
pub struct HyperlinkResolver {
    lookup: Arc<dyn HyperlinkLookup>,
    runtime: Handle,
    slots: Slots,
    generation: AtomicU64,
    changed: Arc<Notify>,
    events: mpsc::UnboundedSender<ResolutionEvent>,
}

/// Stream of completed resolutions.
pub struct ResolutionEvents {
    receiver: mpsc::UnboundedReceiver<ResolutionEvent>,
}

impl ResolutionEvents {
    /// Wait for the next completed resolution.
    ///
    /// Returns `None` once the resolver and all its lookups are gone.
    pub async fn next(&mut self) -> Option<ResolutionEvent> {
        self.receiver.recv().await
    }

    /// Take a completed resolution if one is ready.
    pub fn try_next(&mut self) -> Option<ResolutionEvent> {
        self.receiver.try_recv().ok()
    }
}

impl HyperlinkResolver {
    /// Create a resolver spawning its lookups on `runtime`.
    pub fn new(lookup: Arc<dyn HyperlinkLookup>, runtime: Handle) -> (Self, ResolutionEvents) {
        let (events, receiver) = mpsc::unbounded_channel();
        let resolver = Self {
            lookup,
            runtime,
            slots: Arc::new(Mutex::new(HashMap::new())),
            generation: AtomicU64::new(0),
            changed: Arc::new(Notify::new()),
            events,
        };
        (resolver, ResolutionEvents { receiver })
    }

    /// Current state of the hyperlink at `key`, issuing its lookup on first
    /// sight.
    pub fn resolve(&self, key: HyperlinkKey, target: &str, preview: bool) -> HyperlinkResolution {
        let generation = {
            let mut slots = self.slots.lock();
            if let Some(slot) = slots.get(&key) {
                return slot.state.clone();
            }
            let generation = self.generation.fetch_add(1, Ordering::Relaxed);
            slots.insert(
                key.clone(),
                Slot {
                    state: HyperlinkResolution::Pending,
                    generation,
                    task: None,
                },
            );
            generation
        };

        log::debug!("Looking up hyperlink target {} for {}", target, key);
        let task = self.runtime.spawn(run_lookup(
            Arc::clone(&self.lookup),
            Arc::clone(&self.slots),
            Arc::clone(&self.changed),
            self.events.clone(),
            key.clone(),
            target.to_string(),
            preview,
            generation,
        ));

        let mut slots = self.slots.lock();
        match slots.get_mut(&key) {
            Some(slot) if slot.generation == generation => slot.task = Some(task),
            // discarded while spawning
            _ => task.abort(),
        }
        HyperlinkResolution::Pending
    }

    /// State of the hyperlink at `key`, if it was ever resolved.
    pub fn state(&self, key: &HyperlinkKey) -> Option<HyperlinkResolution> {
        self.slots.lock().get(key).map(|slot| slot.state.clone())
    }

    /// Number of lookups still in flight for `instance`.
    pub fn pending_count(&self, instance: DocumentInstance) -> usize {
        self.slots
            .lock()
            .iter()
            .filter(|(key, slot)| key.instance == instance && !slot.state.is_terminal())
            .count()
    }

    /// Wait until no lookup of `instance` is in flight.
    pub async fn settle(&self, instance: DocumentInstance) {
        loop {
            let notified = self.changed.notified();
            let mut notified = std::pin::pin!(notified);
            notified.as_mut().enable();

            if self.pending_count(instance) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Abandon all hyperlink state of `instance`.
    ///
    /// In-flight lookups are aborted and their results, should they still
    /// arrive, are dropped. Returns the number of hyperlinks forgotten.
    pub fn discard(&self, instance: DocumentInstance) -> usize {
        let removed: Vec<Slot> = {
            let mut slots = self.slots.lock();
            let keys: Vec<HyperlinkKey> = slots
                .keys()
                .filter(|key| key.instance == instance)
                .cloned()
                .collect();
            keys.iter().filter_map(|key| slots.remove(key)).collect()
        };

        for slot in &removed {
            if let Some(ref task) = slot.task {
                task.abort();
            }
        }
        if !removed.is_empty() {
            log::debug!("Discarded {} hyperlinks of {}", removed.len(), instance);
            self.changed.notify_waiters();
        }
        removed.len()
    }

    /// Number of hyperlinks tracked, across all documents.
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }
}

impl Drop for HyperlinkResolver {
    fn drop(&mut self) {
        for slot in self.slots.lock().values() {
            if let Some(ref task) = slot.task {
                task.abort();
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_lookup(
    lookup: Arc<dyn HyperlinkLookup>,
    slots: Slots,
    changed: Arc<Notify>,
    events: mpsc::UnboundedSender<ResolutionEvent>,
    key: HyperlinkKey,
    target: String,
    preview: bool,
    generation: u64,
) {
    let outcome = AssertUnwindSafe(async { lookup.lookup(&target, preview).await })
        .catch_unwind()
        .await;
    let state = match outcome {
        Ok(Ok(response)) => classify(&target, response),
        Ok(Err(err)) => {
            log::warn!("Hyperlink lookup for {} failed: {}", target, err);
            HyperlinkResolution::Unresolved(UnresolvedReason::LookupFailed(err.to_string()))
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            log::warn!("Hyperlink lookup for {} panicked: {}", target, message);
            HyperlinkResolution::Unresolved(UnresolvedReason::LookupFailed(format!(
                "lookup panicked: {}",
                message
            )))
        }
    };

    let written = {
        let mut slots = slots.lock();
        match slots.get_mut(&key) {
            Some(slot) if slot.generation == generation && !slot.state.is_terminal() => {
                slot.state = state.clone();
                slot.task = None;
                true
            }
            _ => false,
        }
    };

    if written {
        log::debug!("Hyperlink {} resolved: {:?}", key, state);
        changed.notify_waiters();
        let _ = events.send(ResolutionEvent {
            instance: key.instance,
            path: key.path,
            state,
        });
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hyperlink::StaticLookup;
    use crate::render::NodePath;

    fn key(instance: DocumentInstance, index: usize) -> HyperlinkKey {
        HyperlinkKey::new(instance, NodePath::from_indices(&[0, index]))
    }

    #[tokio::test]
    async fn test_pending_then_page() {
        let lookup = Arc::new(StaticLookup::new().with_page("42", "about"));
        let (resolver, mut events) = HyperlinkResolver::new(lookup, Handle::current());
        let doc = DocumentInstance::new();

        assert_eq!(
            resolver.resolve(key(doc, 0), "42", false),
            HyperlinkResolution::Pending
        );
        resolver.settle(doc).await;

        let event = events.next().await.unwrap();
        assert_eq!(event.path, NodePath::from_indices(&[0, 0]));
        assert!(matches!(event.state, HyperlinkResolution::Page(ref d) if d.slug == "about"));
        assert_eq!(resolver.state(&key(doc, 0)), Some(event.state));
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let (resolver, _events) =
            HyperlinkResolver::new(Arc::new(StaticLookup::new()), Handle::current());
        let doc = DocumentInstance::new();

        resolver.resolve(key(doc, 1), "nope", false);
        resolver.settle(doc).await;
        assert_eq!(
            resolver.resolve(key(doc, 1), "nope", false),
            HyperlinkResolution::Unresolved(UnresolvedReason::NotFound)
        );
    }

    #[test]
    fn test_panic_message() {
        assert_eq!(panic_message(&"boom"), "boom");
        assert_eq!(panic_message(&String::from("bang")), "bang");
        assert_eq!(panic_message(&7_u8), "unknown panic");
    }

    #[tokio::test]
    async fn test_discard_forgets_instance() {
        let (resolver, _events) =
            HyperlinkResolver::new(Arc::new(StaticLookup::new()), Handle::current());
        let keep = DocumentInstance::new();
        let gone = DocumentInstance::new();

        resolver.resolve(key(keep, 0), "a", false);
        resolver.resolve(key(gone, 0), "b", false);
        resolver.resolve(key(gone, 1), "c", false);

        assert_eq!(resolver.discard(gone), 2);
        assert_eq!(resolver.pending_count(gone), 0);
        assert!(resolver.state(&key(gone, 0)).is_none());

        resolver.settle(keep).await;
        assert_eq!(resolver.len(), 1);
    }
}
