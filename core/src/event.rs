use std::{any::Any, collections::HashMap, fmt, rc::Rc};

use crate::target::TargetId;

/// Extra data attached to an [`Event`].
///
/// Entries are shared behind `Rc`, so cloning a payload clones the entries,
/// not the values. Consumers read with [`Payload::get`], naming the concrete
/// type they expect.
#[derive(Clone, Default)]
pub struct Payload {
    entries: HashMap<String, Rc<dyn Any>>
}

/// A dispatched value: a kind, the usual flags, the identity of the target
/// currently delivering it and an explicit [`Payload`].
#[derive(Clone, Debug)]
pub struct Event {
    kind: String,
    bubbles: bool,
    cancelable: bool,
    current_target: Option<TargetId>,
    payload: Payload
}

impl Payload {
    #[inline]
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    #[inline]
    pub fn insert<T: 'static>(&mut self, key: impl Into<String>, value: T) {
        self.entries.insert(key.into(), Rc::new(value));
    }

    #[inline]
    pub fn get<T: 'static>(&self, key: &str) -> Option<&T> {
        self.entries.get(key)?.downcast_ref()
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Event {
    /// A fresh event: not bubbling, not cancelable, no payload, no target.
    #[inline]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            bubbles: false,
            cancelable: false,
            current_target: None,
            payload: Payload::new()
        }
    }

    #[inline]
    pub fn with_bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;

        self
    }

    #[inline]
    pub fn with_cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;

        self
    }

    #[inline]
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;

        self
    }

    /// Shorthand for inserting a single payload entry.
    #[inline]
    pub fn with<T: 'static>(mut self, key: impl Into<String>, value: T) -> Self {
        self.payload.insert(key, value);

        self
    }

    #[inline]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[inline]
    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    #[inline]
    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    /// Identity of the target delivering this event, or `None` for an event
    /// that hasn't been dispatched.
    #[inline]
    pub fn current_target(&self) -> Option<TargetId> {
        self.current_target
    }

    /// Stamped by [`EventTarget::dispatch`](crate::EventTarget::dispatch)
    /// implementations before their listeners run.
    #[inline]
    pub fn set_current_target(&mut self, id: TargetId) {
        self.current_target = Some(id);
    }

    #[inline]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}
