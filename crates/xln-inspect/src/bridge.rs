//! Publish/subscribe channel between panels.
//!
//! The bridge is created once by whoever assembles the application and handed
//! to each panel as a cheap clone. Panels never hold references to each other;
//! they publish plain data on a topic and whoever subscribed reacts.
//!
//! Delivery is synchronous and in registration order. `publish` works from a
//! snapshot of the handler list taken before the first call, so a handler may
//! subscribe or unsubscribe (itself or others) while being delivered to. There
//! is no queueing: publishing on a topic with no subscribers drops the event.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use serde::{Deserialize, Serialize};
use serde_json::Value;

type Handler<P> = Arc<dyn Fn(&P) + Send + Sync>;

struct Registry<P> {
    next_id: u64,
    topics: HashMap<String, Vec<(u64, Handler<P>)>>,
}

impl<P> Default for Registry<P> {
    fn default() -> Self {
        Self {
            next_id: 0,
            topics: HashMap::new(),
        }
    }
}

pub struct EventBridge<P> {
    registry: Arc<Mutex<Registry<P>>>,
}

impl<P> Clone for EventBridge<P> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
        }
    }
}

impl<P> Default for EventBridge<P> {
    fn default() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::default())),
        }
    }
}

impl<P> fmt::Debug for EventBridge<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.lock().unwrap();
        f.debug_struct("EventBridge")
            .field("topics", &registry.topics.len())
            .field(
                "handlers",
                &registry.topics.values().map(Vec::len).sum::<usize>(),
            )
            .finish()
    }
}

impl<P> EventBridge<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `topic`. The handler stays registered until the
    /// returned subscription is unsubscribed or the bridge is cleared.
    pub fn subscribe<F>(&self, topic: &str, handler: F) -> Subscription<P>
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock().unwrap();
        let id = registry.next_id;
        registry.next_id += 1;
        registry
            .topics
            .entry(topic.to_string())
            .or_default()
            .push((id, Arc::new(handler)));
        Subscription {
            registry: Arc::downgrade(&self.registry),
            topic: topic.to_string(),
            id,
        }
    }

    /// Delivers `payload` to every handler registered on `topic` when the call
    /// starts. Returns how many handlers were invoked.
    pub fn publish(&self, topic: &str, payload: &P) -> usize {
        let snapshot: Vec<Handler<P>> = {
            let registry = self.registry.lock().unwrap();
            registry
                .topics
                .get(topic)
                .map(|handlers| handlers.iter().map(|(_, h)| h.clone()).collect())
                .unwrap_or_default()
        };
        if snapshot.is_empty() {
            log::debug!("dropping '{topic}' event: no subscribers");
            return 0;
        }
        for handler in &snapshot {
            handler(payload);
        }
        snapshot.len()
    }

    pub fn handler_count(&self, topic: &str) -> usize {
        self.registry
            .lock()
            .unwrap()
            .topics
            .get(topic)
            .map_or(0, Vec::len)
    }

    /// Drops every handler. Used at application teardown; outstanding
    /// subscriptions become no-ops.
    pub fn clear(&self) {
        self.registry.lock().unwrap().topics.clear();
    }
}

/// Handle returned by [`EventBridge::subscribe`]. Holds only a weak reference
/// to the registry, so it can outlive the bridge.
pub struct Subscription<P> {
    registry: Weak<Mutex<Registry<P>>>,
    topic: String,
    id: u64,
}

impl<P> Subscription<P> {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Removes the handler. Idempotent, and a no-op once the bridge is gone.
    pub fn unsubscribe(&self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut registry = registry.lock().unwrap();
        if let Some(handlers) = registry.topics.get_mut(&self.topic) {
            handlers.retain(|(id, _)| *id != self.id);
            if handlers.is_empty() {
                registry.topics.remove(&self.topic);
            }
        }
    }

    pub fn is_active(&self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let registry = registry.lock().unwrap();
        registry
            .topics
            .get(&self.topic)
            .is_some_and(|handlers| handlers.iter().any(|(id, _)| *id == self.id))
    }
}

impl<P> fmt::Debug for Subscription<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .field("id", &self.id)
            .finish()
    }
}

/// Topic names used by the dashboard panels.
pub mod topics {
    pub const ENTITY_SELECTED: &str = "entity-selected";
    pub const SETTINGS_CHANGED: &str = "settings-changed";
    pub const SETTINGS_RESET: &str = "settings-reset";
    pub const CAMERA_FOCUS: &str = "camera-focus";
    pub const CAMERA_UPDATE: &str = "camera-update";
    pub const CAMERA_RESTORE: &str = "camera-restore";
}

/// Payloads carried between panels. Plain data only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum PanelEvent {
    #[serde(rename_all = "camelCase")]
    EntitySelected {
        entity_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        signer_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source_panel: Option<String>,
    },
    SettingsChanged {
        key: String,
        value: Value,
    },
    SettingsReset,
    CameraFocus {
        target: String,
    },
    CameraUpdate {
        position: [f64; 3],
        target: [f64; 3],
    },
    CameraRestore,
}

impl PanelEvent {
    pub fn entity_selected(entity_id: impl Into<String>) -> Self {
        PanelEvent::EntitySelected {
            entity_id: entity_id.into(),
            signer_id: None,
            source_panel: None,
        }
    }

    pub fn topic(&self) -> &'static str {
        match self {
            PanelEvent::EntitySelected { .. } => topics::ENTITY_SELECTED,
            PanelEvent::SettingsChanged { .. } => topics::SETTINGS_CHANGED,
            PanelEvent::SettingsReset => topics::SETTINGS_RESET,
            PanelEvent::CameraFocus { .. } => topics::CAMERA_FOCUS,
            PanelEvent::CameraUpdate { .. } => topics::CAMERA_UPDATE,
            PanelEvent::CameraRestore => topics::CAMERA_RESTORE,
        }
    }
}

impl EventBridge<PanelEvent> {
    /// Publishes on the event's own topic.
    pub fn emit(&self, event: &PanelEvent) -> usize {
        self.publish(event.topic(), event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) -> Box<dyn Fn(&PanelEvent) + Send + Sync>) {
        let log: Arc<Mutex<Vec<String>>> = Arc::default();
        let sink = log.clone();
        let make = move |name: &str| {
            let sink = sink.clone();
            let name = name.to_string();
            Box::new(move |event: &PanelEvent| {
                sink.lock().unwrap().push(format!("{name}:{}", event.topic()));
            }) as Box<dyn Fn(&PanelEvent) + Send + Sync>
        };
        (log, make)
    }

    #[test]
    fn unsubscribed_handler_is_not_called() {
        let bridge = EventBridge::<PanelEvent>::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second: Arc<Mutex<Vec<PanelEvent>>> = Arc::default();

        let counter = first.clone();
        let h1 = bridge.subscribe(topics::ENTITY_SELECTED, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let seen = second.clone();
        let _h2 = bridge.subscribe(topics::ENTITY_SELECTED, move |event| {
            seen.lock().unwrap().push(event.clone());
        });
        h1.unsubscribe();

        let payload = PanelEvent::entity_selected("E1");
        assert_eq!(bridge.emit(&payload), 1);
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(*second.lock().unwrap(), vec![payload]);
    }

    #[test]
    fn delivers_in_registration_order() {
        let bridge = EventBridge::<PanelEvent>::new();
        let (log, make) = recorder();
        let _a = bridge.subscribe(topics::SETTINGS_RESET, make("a"));
        let _b = bridge.subscribe(topics::SETTINGS_RESET, make("b"));
        let _c = bridge.subscribe(topics::CAMERA_RESTORE, make("c"));

        bridge.emit(&PanelEvent::SettingsReset);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["a:settings-reset", "b:settings-reset"]
        );
    }

    #[test]
    fn publish_without_subscribers_drops_event() {
        let bridge = EventBridge::<PanelEvent>::new();
        assert_eq!(bridge.emit(&PanelEvent::CameraRestore), 0);

        // A late subscriber does not see earlier events.
        let (log, make) = recorder();
        let _late = bridge.subscribe(topics::CAMERA_RESTORE, make("late"));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn unsubscribe_is_idempotent_and_survives_bridge_drop() {
        let bridge = EventBridge::<PanelEvent>::new();
        let sub = bridge.subscribe(topics::CAMERA_FOCUS, |_| {});
        assert!(sub.is_active());
        sub.unsubscribe();
        sub.unsubscribe();
        assert!(!sub.is_active());
        assert_eq!(bridge.handler_count(topics::CAMERA_FOCUS), 0);

        let orphan = bridge.subscribe(topics::CAMERA_FOCUS, |_| {});
        drop(bridge);
        orphan.unsubscribe();
        assert!(!orphan.is_active());
    }

    #[test]
    fn handler_can_unsubscribe_itself_during_delivery() {
        let bridge = EventBridge::<PanelEvent>::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let slot: Arc<Mutex<Option<Subscription<PanelEvent>>>> = Arc::default();

        let counter = calls.clone();
        let own = slot.clone();
        let sub = bridge.subscribe(topics::ENTITY_SELECTED, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            if let Some(me) = own.lock().unwrap().take() {
                me.unsubscribe();
            }
        });
        *slot.lock().unwrap() = Some(sub);

        let later = calls.clone();
        let inner_bridge = bridge.clone();
        let _spawner = bridge.subscribe(topics::ENTITY_SELECTED, move |_| {
            // Subscribing mid-delivery must not affect the current publish.
            let later = later.clone();
            let _ = inner_bridge.subscribe(topics::ENTITY_SELECTED, move |_| {
                later.fetch_add(100, Ordering::SeqCst);
            });
        });

        assert_eq!(bridge.emit(&PanelEvent::entity_selected("E1")), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(bridge.handler_count(topics::ENTITY_SELECTED), 2);
    }

    #[test]
    fn clear_detaches_everything() {
        let bridge = EventBridge::<PanelEvent>::new();
        let sub = bridge.subscribe(topics::SETTINGS_CHANGED, |_| {});
        bridge.clear();
        assert!(!sub.is_active());
        assert_eq!(
            bridge.emit(&PanelEvent::SettingsChanged {
                key: "theme".into(),
                value: Value::from("dark"),
            }),
            0
        );
    }

    #[test]
    fn events_serialize_as_plain_records() {
        let event = PanelEvent::EntitySelected {
            entity_id: "E1".into(),
            signer_id: Some("S1".into()),
            source_panel: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "entity-selected");
        assert_eq!(json["entityId"], "E1");
        let back: PanelEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
