use remit::{Event, EventTarget, HandlerConfig, HandlerMap, Redispatcher, Target};

fn main() {
    // A source that tags its events with ad-hoc payload data.
    let source = Target::new();
    let relay = Redispatcher::new(source.clone(), ["online", "offline"]);

    let map = HandlerMap::new();
    map.attach(
        relay.target(),
        HandlerConfig::new()
            .on("online", |event: &Event| {
                println!("online after {:?} attempts", event.payload().get::<u32>("attempts"));
            })
            .on("offline", |_| println!("offline"))
    );

    source.dispatch(Event::new("online").with("attempts", 3u32));
    source.dispatch(Event::new("offline"));
    source.dispatch(Event::new("ignored"));

    relay.cleanup();
    source.dispatch(Event::new("online"));
    println!("relay cleaned up, nothing more arrives");
}
