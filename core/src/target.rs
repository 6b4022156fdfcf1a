use std::{cell::RefCell, collections::HashMap, rc::Rc};

use smallvec::SmallVec;

use crate::event::Event;

/// Callback registered with an [`EventTarget`]. Identity is `Rc` identity:
/// clones of one listener count as the same registration.
pub type Listener = Rc<dyn Fn(&Event)>;

/// Identity token for a target, compared by the `current_target` guard.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TargetId(usize);

impl TargetId {
    /// Identity of a target whose shared state lives behind `rc`.
    #[inline]
    pub fn of<T>(rc: &Rc<T>) -> Self {
        Self(Rc::as_ptr(rc) as usize)
    }
}

/// Capability interface of an event source: registration, removal,
/// synchronous dispatch and identity.
///
/// Implementations must ignore a duplicate registration of the same listener
/// for the same kind, remove by listener identity, treat removal of an
/// unknown pair as a no-op and stamp [`Event::set_current_target`] before
/// their listeners run.
pub trait EventTarget {
    fn add_listener(&self, kind: &str, listener: &Listener);

    fn remove_listener(&self, kind: &str, listener: &Listener);

    fn dispatch(&self, event: Event);

    fn id(&self) -> TargetId;
}

impl<T: EventTarget + ?Sized> EventTarget for Rc<T> {
    #[inline]
    fn add_listener(&self, kind: &str, listener: &Listener) {
        (**self).add_listener(kind, listener);
    }

    #[inline]
    fn remove_listener(&self, kind: &str, listener: &Listener) {
        (**self).remove_listener(kind, listener);
    }

    #[inline]
    fn dispatch(&self, event: Event) {
        (**self).dispatch(event);
    }

    #[inline]
    fn id(&self) -> TargetId {
        (**self).id()
    }
}

/// In-memory [`EventTarget`]: a plain listener table with no propagation
/// tree. Clones share the same table.
pub struct Target {
    state: Rc<RefCell<State>>
}

struct State {
    listeners: HashMap<String, SmallVec<[Listener; 2]>>
}

impl Target {
    #[inline]
    pub fn new() -> Self {
        Self {
            state: Rc::new(
                RefCell::new(
                    State { listeners: HashMap::new() }
                )
            )
        }
    }

    /// Number of listeners currently registered for `kind`.
    #[inline]
    pub fn listener_count(&self, kind: &str) -> usize {
        self.state.borrow().listeners.get(kind).map_or(0, SmallVec::len)
    }
}

impl EventTarget for Target {
    fn add_listener(&self, kind: &str, listener: &Listener) {
        let mut state = self.state.borrow_mut();
        let slot = state.listeners.entry(kind.to_owned()).or_default();

        if slot.iter().any(|registered| Rc::ptr_eq(registered, listener)) {
            return;
        }

        slot.push(Rc::clone(listener));
    }

    fn remove_listener(&self, kind: &str, listener: &Listener) {
        let mut state = self.state.borrow_mut();

        let emptied = if let Some(slot) = state.listeners.get_mut(kind) {
            slot.retain(|registered| !Rc::ptr_eq(registered, listener));
            slot.is_empty()
        } else {
            false
        };

        if emptied {
            state.listeners.remove(kind);
        }
    }

    fn dispatch(&self, mut event: Event) {
        event.set_current_target(self.id());

        // Snapshot so listeners can subscribe or unsubscribe mid-pass.
        let run: SmallVec<[Listener; 2]> = self.state
            .borrow()
            .listeners
            .get(event.kind())
            .cloned()
            .unwrap_or_default();

        for listener in run {
            listener(&event);
        }
    }

    #[inline]
    fn id(&self) -> TargetId {
        TargetId::of(&self.state)
    }
}

impl Clone for Target {
    #[inline]
    fn clone(&self) -> Self {
        Self { state: Rc::clone(&self.state) }
    }
}

impl Default for Target {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
