use std::cell::{Cell, RefCell};
use std::rc::Rc;

use flick_animation::SpringCallbacks;
use flick_app::{FlickConfig, GestureSession, Trace};
use flick_core::Vec2;
use flick_platform::{ElementId, InputTarget, MouseButtons, MouseEvent, TouchEvent, TouchPoint};
use smallvec::smallvec;

#[derive(Default)]
struct Observed {
    started: Cell<u32>,
    completed: Cell<u32>,
    motion: RefCell<Vec<f32>>,
    offsets: RefCell<Vec<Vec2>>,
}

fn session(config: &FlickConfig) -> (GestureSession, Rc<Observed>) {
    let observed = Rc::new(Observed::default());
    let (start, update, complete, render) = (
        Rc::clone(&observed),
        Rc::clone(&observed),
        Rc::clone(&observed),
        Rc::clone(&observed),
    );
    let callbacks = SpringCallbacks::new()
        .on_start(move || start.started.set(start.started.get() + 1))
        .on_update(move |value| update.motion.borrow_mut().push(value))
        .on_complete(move || complete.completed.set(complete.completed.get() + 1));
    let session = GestureSession::new(config, callbacks, move |offset: Vec2| {
        render.offsets.borrow_mut().push(offset)
    })
    .unwrap();
    (session, observed)
}

fn press(x: f32, y: f32, timestamp: f64) -> MouseEvent {
    MouseEvent::Pressed {
        x,
        y,
        buttons: MouseButtons::PRIMARY,
        timestamp,
    }
}

fn drag(x: f32, y: f32, timestamp: f64) -> MouseEvent {
    MouseEvent::Moved {
        x,
        y,
        buttons: MouseButtons::PRIMARY,
        timestamp,
    }
}

fn release(x: f32, y: f32, timestamp: f64) -> MouseEvent {
    MouseEvent::Released {
        x,
        y,
        buttons: MouseButtons::empty(),
        timestamp,
    }
}

#[test]
fn test_mouse_drag_flings_and_settles() {
    let (mut session, observed) = session(&FlickConfig::default());
    let spring = session.spring();

    assert!(session.handle_event(InputTarget::Root, &press(0.0, 0.0, 0.0).into()));
    session.frame().unwrap();
    session.frame().unwrap();
    assert!(spring.borrow().is_animating());
    assert!(spring.borrow().is_dragging());

    assert!(session.handle_event(InputTarget::Root, &drag(10.0, 0.0, 32.0).into()));
    session.frame().unwrap();
    session.frame().unwrap();
    assert_eq!(spring.borrow().current(), Vec2::new(10.0, 0.0));

    assert!(session.handle_event(InputTarget::Root, &release(10.0, 0.0, 64.0).into()));
    let summary = session.frame().unwrap();
    let gesture = summary.gesture.unwrap();
    assert!(gesture.dispatched);
    assert_eq!(gesture.removed, 1);
    assert_eq!(observed.started.get(), 1);
    assert_eq!(spring.borrow().target(), Vec2::ZERO);
    assert!(session.handler().contacts().is_empty());

    let frames = session.run_until_idle(500).unwrap();
    assert!(frames > 0 && frames < 500);
    assert!(!session.is_active());
    assert_eq!(observed.completed.get(), 1);
    assert_eq!(observed.started.get(), 1);
    assert!(spring.borrow().current().distance() < 0.05);

    let motion = observed.motion.borrow();
    assert!(!motion.is_empty());
    assert!(motion.iter().all(|value| (0.0..=1.0).contains(value)));
    assert_eq!(
        observed.offsets.borrow().last().copied(),
        Some(spring.borrow().current())
    );
}

#[test]
fn test_scoped_session_ignores_root_touch_start() {
    let config = FlickConfig::from_toml_str("[input]\nscoped = true\nelement_id = 3\n").unwrap();
    let (mut session, _) = session(&config);
    let panel = InputTarget::Element(ElementId(3));

    let start = TouchEvent::Started {
        touches: smallvec![TouchPoint::new(1, 5.0, 5.0, 0.5)],
        timestamp: 0.0,
    };
    assert!(!session.handle_event(InputTarget::Root, &start.clone().into()));
    assert!(!session.is_active());

    assert!(session.handle_event(panel, &start.into()));
    assert!(session.is_active());
    assert_eq!(session.handler().contacts().len(), 1);
}

#[test]
fn test_mouse_only_session_ignores_touch() {
    let config = FlickConfig::from_toml_str("[input]\nuse_touch = false\n").unwrap();
    let (mut session, _) = session(&config);

    let start = TouchEvent::Started {
        touches: smallvec![TouchPoint::new(1, 5.0, 5.0, 0.5)],
        timestamp: 0.0,
    };
    assert!(!session.handle_event(InputTarget::Root, &start.into()));
    assert!(session.handle_event(InputTarget::Root, &press(1.0, 1.0, 0.0).into()));
}

#[test]
fn test_detached_session_stops_listening() {
    let (mut session, observed) = session(&FlickConfig::default());
    assert!(session.detach());
    assert!(!session.handle_event(InputTarget::Root, &press(0.0, 0.0, 0.0).into()));
    assert_eq!(session.run_until_idle(10).unwrap(), 0);
    assert_eq!(observed.started.get(), 0);
}

#[test]
fn test_trace_replay_drives_session() {
    let trace = Trace::from_json_str(
        r#"{"steps": [
            {"step": "input", "event": {"touch": {"event": "started", "touches": [{"id": 4, "x": 0, "y": 0}], "timestamp": 0}}},
            {"step": "frames", "count": 2},
            {"step": "input", "event": {"touch": {"event": "moved", "touches": [{"id": 4, "x": 0, "y": 20}], "timestamp": 32}}},
            {"step": "frames", "count": 2},
            {"step": "input", "event": {"touch": {"event": "ended", "touches": [{"id": 4, "x": 0, "y": 20}], "timestamp": 64}}},
            {"step": "input", "element": 8, "event": {"mouse": {"event": "moved", "x": 3, "y": 3, "timestamp": 70}}},
            {"step": "frames", "count": 1}
        ]}"#,
    )
    .unwrap();

    let (mut session, observed) = session(&FlickConfig::default());
    let summary = trace.replay(&mut session).unwrap();

    assert_eq!(summary.events, 3);
    assert_eq!(summary.ignored, 1);
    assert_eq!(summary.frames, 5);
    assert_eq!(observed.started.get(), 1);

    session.run_until_idle(1000).unwrap();
    assert_eq!(observed.completed.get(), 1);
}
