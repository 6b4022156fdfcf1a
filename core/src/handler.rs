use std::{any::Any, collections::HashMap, fmt, rc::Rc};

use crate::event::Event;

/// Receiver a [`Handler::Scoped`] callable runs against.
pub type Scope = Rc<dyn Any>;

/// Configured reaction to one event kind.
///
/// `R` is the value a handler produces; chain dispatch surfaces the newest
/// contributing link's result.
pub enum Handler<R = ()> {
    /// Plain callable, capturing whatever receiver it needs.
    Direct(Rc<dyn Fn(&Event) -> R>),
    /// Callable invoked against an explicit receiver, downcast by the
    /// callable itself.
    Scoped(Rc<dyn Fn(&Scope, &Event) -> R>, Scope)
}

impl<R> Handler<R> {
    #[inline]
    pub fn direct(f: impl Fn(&Event) -> R + 'static) -> Self {
        Self::Direct(Rc::new(f))
    }

    #[inline]
    pub fn scoped(scope: Scope, f: impl Fn(&Scope, &Event) -> R + 'static) -> Self {
        Self::Scoped(Rc::new(f), scope)
    }

    #[inline]
    pub fn invoke(&self, event: &Event) -> R {
        match self {
            Self::Direct(f) => f(event),
            Self::Scoped(f, scope) => f(scope, event)
        }
    }

    /// Identity comparison: clones of one handler compare equal,
    /// structurally identical handlers do not.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Direct(a), Self::Direct(b)) => Rc::ptr_eq(a, b),
            (Self::Scoped(a, scope_a), Self::Scoped(b, scope_b)) =>
                Rc::ptr_eq(a, b) && Rc::ptr_eq(scope_a, scope_b),
            _ => false
        }
    }
}

impl<R> Clone for Handler<R> {
    #[inline]
    fn clone(&self) -> Self {
        match self {
            Self::Direct(f) => Self::Direct(Rc::clone(f)),
            Self::Scoped(f, scope) => Self::Scoped(Rc::clone(f), Rc::clone(scope))
        }
    }
}

impl<R> fmt::Debug for Handler<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(_) => f.write_str("Direct"),
            Self::Scoped(..) => f.write_str("Scoped")
        }
    }
}

/// Event kind → handler slot table for one link.
///
/// The keys present when a link is attached are the only keys later updates
/// can touch. An empty slot subscribes the kind but reacts to nothing.
pub struct HandlerConfig<R = ()> {
    entries: HashMap<String, Option<Handler<R>>>
}

impl<R> HandlerConfig<R> {
    #[inline]
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    /// Subscribe `kind` with no reaction.
    #[inline]
    pub fn listen(mut self, kind: impl Into<String>) -> Self {
        self.entries.insert(kind.into(), None);

        self
    }

    #[inline]
    pub fn on(
        mut self,
        kind: impl Into<String>,
        f: impl Fn(&Event) -> R + 'static
    ) -> Self {
        self.entries.insert(kind.into(), Some(Handler::direct(f)));

        self
    }

    #[inline]
    pub fn on_scoped(
        mut self,
        kind: impl Into<String>,
        scope: Scope,
        f: impl Fn(&Scope, &Event) -> R + 'static
    ) -> Self {
        self.entries.insert(kind.into(), Some(Handler::scoped(scope, f)));

        self
    }

    #[inline]
    pub fn insert(&mut self, kind: impl Into<String>, handler: Option<Handler<R>>) {
        self.entries.insert(kind.into(), handler);
    }

    /// Whether `kind` belongs to this config's key set.
    #[inline]
    pub fn contains(&self, kind: &str) -> bool {
        self.entries.contains_key(kind)
    }

    /// The configured handler for `kind`, if the key is present and filled.
    #[inline]
    pub fn handler(&self, kind: &str) -> Option<&Handler<R>> {
        self.entries.get(kind)?.as_ref()
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

    /// The slot for an owned `kind`: `None` when the key isn't owned at all.
    pub(crate) fn slot(&self, kind: &str) -> Option<Option<Handler<R>>> {
        self.entries.get(kind).cloned()
    }

    /// Replaces the slot for an owned `kind`; unowned keys are left alone.
    pub(crate) fn set_slot(&mut self, kind: &str, handler: Option<Handler<R>>) {
        if let Some(slot) = self.entries.get_mut(kind) {
            *slot = handler;
        }
    }
}

impl<R> Clone for HandlerConfig<R> {
    #[inline]
    fn clone(&self) -> Self {
        Self { entries: self.entries.clone() }
    }
}

impl<R> Default for HandlerConfig<R> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
