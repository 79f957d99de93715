use std::sync::{Mutex, PoisonError};

use super::SharedSubscription;

/// Lazily created [`SharedSubscription`] for one topic of a façade.
///
/// A terminated subscription is replaced on next access, so listeners attaching after a fatal
/// error get a fresh stream instead of the old error.
pub(crate) struct TopicSlot<T> {
    slot: Mutex<Option<SharedSubscription<T>>>,
}

impl<T: Clone + Send + 'static> TopicSlot<T> {
    pub(crate) fn get_or_open(
        &self,
        open: impl FnOnce() -> SharedSubscription<T>,
    ) -> SharedSubscription<T> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);

        match slot.as_ref() {
            Some(subscription) if !subscription.is_terminated() => subscription.clone(),
            _ => {
                let subscription = open();
                *slot = Some(subscription.clone());
                subscription
            }
        }
    }
}

impl<T> Default for TopicSlot<T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl<T> std::fmt::Debug for TopicSlot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            Some(subscription) => std::fmt::Debug::fmt(subscription, f),
            None => f.write_str("TopicSlot(<not opened>)"),
        }
    }
}
