use std::rc::Rc;

use crate::{
    event::Event,
    target::{EventTarget, Listener, Target}
};

/// Re-emits selected kinds from a source dispatcher onto a private
/// [`Target`], decoupling consumers from a non-conforming source.
///
/// Relayed events are fresh: same kind, not bubbling, not cancelable, with
/// a clone of the source event's payload. Call [`cleanup`](Self::cleanup)
/// before discarding: there is no automatic teardown, and a forgotten
/// relay keeps re-emitting.
pub struct Redispatcher {
    source: Rc<dyn EventTarget>,
    kinds: Vec<String>,
    relay: Listener,
    output: Target
}

impl Redispatcher {
    pub fn new<I, S>(source: impl EventTarget + 'static, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        let source: Rc<dyn EventTarget> = Rc::new(source);
        let kinds: Vec<String> = kinds.into_iter().map(Into::into).collect();
        let output = Target::new();

        let relay: Listener = {
            let output = output.clone();

            Rc::new(move |event: &Event| {
                output.dispatch(
                    Event::new(event.kind()).with_payload(event.payload().clone())
                );
            })
        };

        for kind in &kinds {
            source.add_listener(kind, &relay);
        }

        Self { source, kinds, relay, output }
    }

    /// The private target consumers subscribe to.
    #[inline]
    pub fn target(&self) -> Target {
        self.output.clone()
    }

    /// Unsubscribe the relay from every originally given kind.
    pub fn cleanup(&self) {
        for kind in &self.kinds {
            self.source.remove_listener(kind, &self.relay);
        }
    }
}
