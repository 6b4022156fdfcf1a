use std::{cell::RefCell, rc::Rc};

use smallvec::SmallVec;

use crate::{
    event::Event,
    handler::{Handler, HandlerConfig},
    target::{EventTarget, Listener, TargetId}
};

/// One application of a handler map to the holder: a target, the key set
/// fixed at attach time and an independent listening flag.
struct Link<R> {
    target: Rc<dyn EventTarget>,
    target_id: TargetId,
    config: HandlerConfig<R>,
    listening: bool
}

struct Chain<R> {
    links: SmallVec<[Link<R>; 2]>
}

/// Dispatcher-holder for a stack of handler-map links over event targets.
///
/// Each [`attach`](Self::attach) pushes a link with its own target, key set
/// and listening state; dispatch and lookup walk the stack newest link
/// first. Handlers are swapped at runtime through
/// [`update_handler`](Self::update_handler) /
/// [`update_handlers`](Self::update_handlers) without touching the
/// underlying subscriptions. Clones share the same stack.
///
/// All links share a single registration per target, so stacking several
/// links on one target still delivers each event exactly once per link.
pub struct HandlerMap<R = ()> {
    chain: Rc<RefCell<Chain<R>>>,
    listener: Listener
}

impl<R: 'static> HandlerMap<R> {
    pub fn new() -> Self {
        let chain = Rc::new(
            RefCell::new(
                Chain { links: SmallVec::new() }
            )
        );

        // The registration only weakly holds the chain: a holder dropped
        // without do_not_listen() leaves stale registrations behind as
        // harmless no-ops.
        let listener: Listener = {
            let chain = Rc::downgrade(&chain);

            Rc::new(move |event: &Event| {
                if let Some(chain) = chain.upgrade() {
                    dispatch(&chain, event);
                }
            })
        };

        Self { chain, listener }
    }

    /// Push a link bound to `target` and start listening.
    ///
    /// Starting cascades over the whole stack, re-activating links that
    /// were previously deafened.
    pub fn attach(&self, target: impl EventTarget + 'static, config: HandlerConfig<R>) {
        self.attach_deaf(target, config);
        self.listen();
    }

    /// Push a link without subscribing anything.
    pub fn attach_deaf(&self, target: impl EventTarget + 'static, config: HandlerConfig<R>) {
        let target: Rc<dyn EventTarget> = Rc::new(target);
        let target_id = target.id();

        self.chain.borrow_mut().links.push(Link {
            target,
            target_id,
            config,
            listening: false
        });
    }

    /// Deliver `event` through the stack, newest link first.
    ///
    /// Every link bound to the event's `current_target` whose key set maps
    /// the event's kind to a handler runs it; the newest contributing
    /// link's value is returned. Targets reach this through the shared
    /// registration; call it directly only with an event stamped via
    /// [`Event::set_current_target`].
    pub fn handle_event(&self, event: &Event) -> Option<R> {
        dispatch(&self.chain, event)
    }

    /// Subscribe every deaf link's keys to its target. Idempotent.
    pub fn listen(&self) {
        let len = self.chain.borrow().links.len();

        for i in (0..len).rev() {
            let pending = {
                let mut chain = self.chain.borrow_mut();
                let link = &mut chain.links[i];

                if link.listening {
                    None
                } else {
                    link.listening = true;

                    let kinds: Vec<String> = link.config.keys().map(str::to_owned).collect();
                    Some((Rc::clone(&link.target), kinds))
                }
            };

            if let Some((target, kinds)) = pending {
                for kind in &kinds {
                    target.add_listener(kind, &self.listener);
                }
            }
        }
    }

    /// Unsubscribe every listening link's keys from its target. Idempotent.
    pub fn do_not_listen(&self) {
        let len = self.chain.borrow().links.len();

        for i in (0..len).rev() {
            let pending = {
                let mut chain = self.chain.borrow_mut();
                let link = &mut chain.links[i];

                if link.listening {
                    link.listening = false;

                    let kinds: Vec<String> = link.config.keys().map(str::to_owned).collect();
                    Some((Rc::clone(&link.target), kinds))
                } else {
                    None
                }
            };

            if let Some((target, kinds)) = pending {
                for kind in &kinds {
                    target.remove_listener(kind, &self.listener);
                }
            }
        }
    }

    /// Current spec for `kind`: the newest link owning the key answers,
    /// even when its slot is currently empty; keys unique to older links
    /// fall through to them.
    pub fn handler(&self, kind: &str) -> Option<Handler<R>> {
        let chain = self.chain.borrow();

        for link in chain.links.iter().rev() {
            if let Some(slot) = link.config.slot(kind) {
                return slot;
            }
        }

        None
    }

    /// Merged view of the whole stack, newest owner winning shared keys.
    pub fn handlers(&self) -> HandlerConfig<R> {
        let chain = self.chain.borrow();
        let mut merged = HandlerConfig::new();

        for link in chain.links.iter() {
            for kind in link.config.keys() {
                merged.insert(kind, link.config.slot(kind).flatten());
            }
        }

        merged
    }

    /// Replace the slot for `kind` in every link that owns it and return
    /// the previously resolved spec. Links that never owned the key are
    /// untouched; the key is never created.
    pub fn update_handler(&self, kind: &str, handler: Option<Handler<R>>) -> Option<Handler<R>> {
        let previous = self.handler(kind);

        let mut chain = self.chain.borrow_mut();
        for link in chain.links.iter_mut() {
            link.config.set_slot(kind, handler.clone());
        }

        previous
    }

    /// Reconfigure every link against `new`: each owned key takes the new
    /// set's value for it, or empties out when absent there. Returns the
    /// previous merged view. An empty set therefore clears every slot; keys
    /// never grow.
    pub fn update_handlers(&self, new: &HandlerConfig<R>) -> HandlerConfig<R> {
        let previous = self.handlers();

        let mut chain = self.chain.borrow_mut();
        for link in chain.links.iter_mut() {
            let kinds: Vec<String> = link.config.keys().map(str::to_owned).collect();

            for kind in &kinds {
                link.config.set_slot(kind, new.handler(kind).cloned());
            }
        }

        previous
    }
}

fn dispatch<R>(chain: &Rc<RefCell<Chain<R>>>, event: &Event) -> Option<R> {
    let len = chain.borrow().links.len();
    let mut result = None;

    for i in (0..len).rev() {
        // Snapshot the handler and drop the borrow: handlers may call back
        // into the holder mid-dispatch.
        let handler = {
            let chain = chain.borrow();
            let link = &chain.links[i];

            if event.current_target() != Some(link.target_id) {
                None
            } else {
                link.config.slot(event.kind()).flatten()
            }
        };

        if let Some(handler) = handler {
            let value = handler.invoke(event);

            if result.is_none() {
                result = Some(value);
            }
        }
    }

    result
}

impl<R: 'static> Default for HandlerMap<R> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for HandlerMap<R> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            chain: Rc::clone(&self.chain),
            listener: Rc::clone(&self.listener)
        }
    }
}
