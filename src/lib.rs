pub use remit_core::{
    Event, EventTarget, Handler, HandlerConfig, HandlerMap,
    Listener, Payload, Redispatcher, Scope, Target, TargetId
};
