use remit::{Event, EventTarget, Handler, HandlerConfig, HandlerMap, Target};

fn main() {
    let button = Target::new();
    let map = HandlerMap::new();

    map.attach(
        button.clone(),
        HandlerConfig::new()
            .on("press", |event: &Event| {
                println!("press #{:?}", event.payload().get::<u32>("count"));
            })
            .listen("release")
    );

    button.dispatch(Event::new("press").with("count", 1u32));

    // Swap the reaction at runtime; the subscription stays in place.
    let previous = map.update_handler(
        "press",
        Some(Handler::direct(|_| println!("press (swapped handler)")))
    );
    assert!(previous.is_some());

    button.dispatch(Event::new("press").with("count", 2u32));

    map.do_not_listen();
    button.dispatch(Event::new("press").with("count", 3u32));
    println!("deaf, press #3 dropped");

    map.listen();
    button.dispatch(Event::new("press").with("count", 4u32));
}
