// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `trellis_responder` crate.
//!
//! Elements are plain names here; the tree is `Root -> Panel -> Btn` and the
//! hit path is always root first.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use tracing_test::traced_test;
use trellis_property::OwnerType;
use trellis_responder::{
    EventRouter, Interceptor, RouteContext, RoutedEvent, RoutedEventArgs, RoutedEventRegistry,
    RoutingStrategy,
};

type Element = &'static str;
type Log = Rc<RefCell<Vec<String>>>;

const PATH: [Element; 3] = ["Root", "Panel", "Btn"];

struct Button;

struct Events {
    click: RoutedEvent<()>,
    preview: RoutedEvent<()>,
    focus: RoutedEvent<()>,
}

fn events() -> Events {
    let mut registry = RoutedEventRegistry::new();
    let owner = OwnerType::of::<Button>();
    Events {
        click: registry.register(owner, "Click", RoutingStrategy::Bubble),
        preview: registry.register(owner, "PreviewClick", RoutingStrategy::Tunnel),
        focus: registry.register(owner, "GotFocus", RoutingStrategy::Direct),
    }
}

fn logging(
    router: &mut EventRouter<Element>,
    log: &Log,
    element: Element,
    event: RoutedEvent<()>,
) {
    let log = log.clone();
    router.add_handler(
        element,
        event,
        move |at, _| {
            log.borrow_mut().push(format!("{at}-handler"));
            Ok(())
        },
        false,
    );
}

#[test]
fn click_bubbles_from_button_to_root() {
    let Events { click, .. } = events();
    let log = Log::default();
    let mut router = EventRouter::new();
    logging(&mut router, &log, "Root", click);
    logging(&mut router, &log, "Btn", click);

    let report = router.route_event(&mut RoutedEventArgs::new(click, "Btn", ()), &PATH);
    assert_eq!(*log.borrow(), ["Btn-handler", "Root-handler"]);
    assert_eq!(report.invoked, 2);
    assert!(!report.aborted);
}

#[test]
fn strategies_order_a_three_element_path() {
    let Events {
        click,
        preview,
        focus,
    } = events();
    let log = Log::default();
    let mut router = EventRouter::new();
    for event in [click, preview, focus] {
        for element in PATH {
            logging(&mut router, &log, element, event);
        }
    }

    router.route_event(&mut RoutedEventArgs::new(preview, "Btn", ()), &PATH);
    assert_eq!(*log.borrow(), ["Root-handler", "Panel-handler"]);
    log.borrow_mut().clear();

    router.route_event(&mut RoutedEventArgs::new(focus, "Btn", ()), &PATH);
    assert_eq!(*log.borrow(), ["Btn-handler"]);
    log.borrow_mut().clear();

    router.route_event(&mut RoutedEventArgs::new(click, "Btn", ()), &PATH);
    assert_eq!(*log.borrow(), ["Btn-handler", "Panel-handler", "Root-handler"]);
}

#[test]
fn handled_event_skips_plain_handlers_only() {
    let Events { click, .. } = events();
    let log = Log::default();
    let mut router = EventRouter::new();
    router.add_handler(
        "Btn",
        click,
        |_, args| {
            args.set_handled();
            Ok(())
        },
        false,
    );
    logging(&mut router, &log, "Root", click);
    {
        let log = log.clone();
        router.add_handler(
            "Root",
            click,
            move |_, _| {
                log.borrow_mut().push("Root-handled-too".into());
                Ok(())
            },
            true,
        );
    }

    let mut args = RoutedEventArgs::new(click, "Btn", ());
    let report = router.route_event(&mut args, &PATH);
    assert_eq!(*log.borrow(), ["Root-handled-too"]);
    assert!(args.handled);
    assert!(report.handled);
    assert_eq!(report.invoked, 2);
}

struct Gate {
    log: Log,
    open: bool,
}

impl Interceptor<Element> for Gate {
    fn pre_process(&mut self, cx: &mut RouteContext<Element>) -> bool {
        cx.insert("started", Instant::now());
        self.log.borrow_mut().push(format!("pre:{}", cx.event_name()));
        self.open
    }

    fn post_process(&mut self, cx: &mut RouteContext<Element>) {
        let timed = cx.get::<Instant>("started").is_some();
        self.log.borrow_mut().push(format!(
            "post:aborted={}:timed={timed}",
            cx.is_aborted()
        ));
    }
}

#[test]
fn vetoing_interceptor_blocks_handlers_but_still_post_processes() {
    let Events { click, .. } = events();
    let log = Log::default();
    let mut router = EventRouter::new();
    router.add_interceptor(Gate {
        log: log.clone(),
        open: false,
    });
    logging(&mut router, &log, "Btn", click);
    logging(&mut router, &log, "Root", click);

    let report = router.route_event(&mut RoutedEventArgs::new(click, "Btn", ()), &PATH);
    assert!(report.aborted);
    assert_eq!(report.invoked, 0);
    assert_eq!(*log.borrow(), ["pre:Click", "post:aborted=true:timed=true"]);
}

#[test]
fn open_interceptor_sees_failures_after_delivery() {
    let Events { click, .. } = events();
    let log = Log::default();
    let mut router = EventRouter::new();
    router.add_interceptor(Gate {
        log: log.clone(),
        open: true,
    });
    router.add_handler("Panel", click, |_, _| Err("panel is broken".into()), false);
    logging(&mut router, &log, "Root", click);

    let report = router.route_event(&mut RoutedEventArgs::new(click, "Btn", ()), &PATH);
    assert_eq!(
        *log.borrow(),
        ["pre:Click", "Root-handler", "post:aborted=false:timed=true"]
    );
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].element, "Panel");
    assert_eq!(report.failures[0].error.to_string(), "panel is broken");
}

#[test]
fn removing_a_handler_by_token_stops_delivery() {
    let Events { click, .. } = events();
    let mut router = EventRouter::new();
    let token = router.add_handler(
        "Btn",
        click,
        |_, _| Err("removed handlers never run".into()),
        false,
    );
    assert!(router.remove_handler(token));

    let report = router.route_event(&mut RoutedEventArgs::new(click, "Btn", ()), &PATH);
    assert_eq!(report.invoked, 0);
    assert!(report.failures.is_empty());
}

#[test]
fn payload_changes_are_visible_to_later_handlers() {
    let mut registry = RoutedEventRegistry::new();
    let scroll =
        registry.register::<f64>(OwnerType::of::<Button>(), "Scroll", RoutingStrategy::Bubble);
    let mut router = EventRouter::new();
    router.add_handler(
        "Btn",
        scroll,
        |_, args| {
            args.payload /= 2.0;
            Ok(())
        },
        false,
    );
    router.add_handler(
        "Root",
        scroll,
        |_, args| {
            args.payload += 1.0;
            Ok(())
        },
        false,
    );

    let mut args = RoutedEventArgs::new(scroll, "Btn", 10.0);
    router.route_event(&mut args, &PATH);
    assert_eq!(args.into_payload(), 6.0);
}

#[test]
#[traced_test]
fn failures_and_vetoes_are_logged() {
    let Events { click, .. } = events();
    let mut router = EventRouter::new();
    router.add_handler("Btn", click, |_, _| Err("button is broken".into()), false);

    router.route_event(&mut RoutedEventArgs::new(click, "Btn", ()), &PATH);
    assert!(logs_contain("routed event handler failed"));
    assert!(logs_contain("button is broken"));

    router.add_interceptor(Gate {
        log: Log::default(),
        open: false,
    });
    router.route_event(&mut RoutedEventArgs::new(click, "Btn", ()), &PATH);
    assert!(logs_contain("route vetoed by interceptor"));
}

#[test]
#[should_panic(expected = "handler blew up")]
fn a_panicking_handler_unwinds_out_of_the_route() {
    let Events { click, .. } = events();
    let mut router = EventRouter::new();
    router.add_interceptor(Gate {
        log: Log::default(),
        open: true,
    });
    router.add_handler("Btn", click, |_, _| panic!("handler blew up"), false);
    router.route_event(&mut RoutedEventArgs::new(click, "Btn", ()), &PATH);
}
