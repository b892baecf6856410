//! Observer registration for model change notifications.
//!
//! Two channels: a general channel fired on every configuration change (and
//! on the empty-result export path), and a "visual" channel fired only when
//! a change should make a UI redraw format-dependent widgets. Subscribing
//! returns a [`SubscriptionId`] that detaches the observer when passed to
//! [`ObserverBus::unsubscribe`].

/// Handle identifying one registered observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn Fn() + Send>;

/// Which notification channel an observer listens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    General,
    Visual,
}

/// Broadcast bus with two independent subscription lists.
///
/// Fan-out is synchronous and carries no payload; delivery order follows
/// subscription order.
#[derive(Default)]
pub struct ObserverBus {
    next_id: u64,
    observers: Vec<(SubscriptionId, Channel, Callback)>,
}

impl ObserverBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to the general change channel.
    pub fn on_change(&mut self, callback: impl Fn() + Send + 'static) -> SubscriptionId {
        self.subscribe(Channel::General, Box::new(callback))
    }

    /// Subscribe to the visual change channel.
    pub fn on_visual_change(&mut self, callback: impl Fn() + Send + 'static) -> SubscriptionId {
        self.subscribe(Channel::Visual, Box::new(callback))
    }

    /// Detach an observer. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.observers.retain(|(sub_id, _, _)| *sub_id != id);
    }

    /// Fire the general channel.
    pub fn notify_change(&self) {
        self.notify(Channel::General);
    }

    /// Fire the visual channel.
    pub fn notify_visual_change(&self) {
        self.notify(Channel::Visual);
    }

    fn subscribe(&mut self, channel: Channel, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, channel, callback));
        id
    }

    fn notify(&self, channel: Channel) {
        for (_, observer_channel, callback) in &self.observers {
            if *observer_channel == channel {
                callback();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let clone = Arc::clone(&count);
        (count, move || {
            clone.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_channels_are_independent() {
        let mut bus = ObserverBus::new();
        let (general, on_general) = counter();
        let (visual, on_visual) = counter();
        bus.on_change(on_general);
        bus.on_visual_change(on_visual);

        bus.notify_change();
        assert_eq!(general.load(Ordering::SeqCst), 1);
        assert_eq!(visual.load(Ordering::SeqCst), 0);

        bus.notify_visual_change();
        assert_eq!(general.load(Ordering::SeqCst), 1);
        assert_eq!(visual.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_detaches() {
        let mut bus = ObserverBus::new();
        let (count, on_change) = counter();
        let id = bus.on_change(on_change);

        bus.notify_change();
        bus.unsubscribe(id);
        bus.notify_change();

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fan_out_reaches_all_subscribers() {
        let mut bus = ObserverBus::new();
        let (first, on_first) = counter();
        let (second, on_second) = counter();
        bus.on_change(on_first);
        bus.on_change(on_second);

        bus.notify_change();

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }
}
