mod event;
mod handler;
mod handler_map;
mod redispatch;
mod target;

pub use event::{Event, Payload};
pub use handler::{Handler, HandlerConfig, Scope};
pub use handler_map::HandlerMap;
pub use redispatch::Redispatcher;
pub use target::{EventTarget, Listener, Target, TargetId};
