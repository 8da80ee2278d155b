//! Press-move-release gesture handling for one draggable element
//!
//! Data flows: press → [`DragSession`] created, move listener registered →
//! every move runs the drag callback, then writes the anchored edges →
//! release drops the session, removes the move listener, runs the stop callback.

use std::cell::{Cell, RefCell};

use crate::error::DragError;
use crate::fix::{DragPosition, FixOverrides};
use crate::geometry::{Axis, AxisAnchor, Edge, EdgeOffsets, PagePoint, PerAxis, format_px};
use crate::options::Direction;

// ===== HOST SEAMS =====

/// Element whose CSS edge offsets get moved around.
pub trait DragTarget {
    /// Whether the element supports CSS box placement at all
    fn is_positionable(&self) -> bool;
    /// Edge offsets from the computed (not inline) style
    fn computed_offsets(&self) -> EdgeOffsets;
    fn set_edge(&self, edge: Edge, value: &str);
    /// Drop the offset so layout depends only on the opposite edge
    fn unset_edge(&self, edge: Edge);
}

/// Surface-wide scope where pointer movement is observed during a gesture.
pub trait MoveSurface {
    fn listen_move(&mut self);
    fn unlisten_move(&mut self);
}

pub type DragCallback<T> = Box<dyn FnMut(&T, &DragPosition, &mut FixOverrides)>;
pub type StopCallback<T> = Box<dyn FnMut(&T, &DragPosition)>;

// ===== SESSION =====

/// State of one gesture, alive strictly between press and release.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    anchor: AxisAnchor,
    start: PerAxis<f64>,
}

impl DragSession {
    pub fn begin(offsets: &EdgeOffsets, pointer: PagePoint) -> Self {
        let anchor = offsets.anchor();
        let mut start = PerAxis::default();
        for axis in Axis::BOTH {
            let side = anchor.get(axis);
            let edge_value = offsets.get(side.edge(axis)) as f64;
            start.set(axis, pointer.get(axis) - edge_value * side.sign());
        }
        Self { anchor, start }
    }

    pub fn anchor(&self) -> AxisAnchor {
        self.anchor
    }

    pub fn start(&self) -> PerAxis<f64> {
        self.start
    }

    pub fn position(&self, pointer: PagePoint) -> DragPosition {
        DragPosition::new(pointer, self.start)
    }

    fn step(&mut self, axis: Axis, pointer: f64, fix: &FixOverrides, target: &impl DragTarget) {
        let page = fix.page(axis).unwrap_or(pointer);
        if let Some(start) = fix.start(axis) {
            self.start.set(axis, start);
        }
        if fix.skips(axis) {
            return;
        }
        let side = self.anchor.get(axis);
        let value = (page - self.start.get(axis)) * side.sign();
        target.set_edge(side.edge(axis), &format_px(value));
        target.unset_edge(side.opposite().edge(axis));
    }
}

// ===== CONTROLLER =====

/// Gesture state machine for one element.
///
/// All operations take `&self` and the session is never borrowed while a
/// callback runs, so callbacks may re-enter the controller (e.g. end the
/// gesture from the drag callback by dispatching a release). A callback that
/// re-enters itself is skipped for the nested call.
pub struct DragController<T, S> {
    target: T,
    surface: RefCell<S>,
    direction: Direction,
    on_drag: RefCell<Option<DragCallback<T>>>,
    on_stop: RefCell<Option<StopCallback<T>>>,
    session: Cell<Option<DragSession>>,
}

impl<T: DragTarget, S: MoveSurface> DragController<T, S> {
    pub fn new(
        target: T,
        surface: S,
        direction: Direction,
        on_drag: Option<DragCallback<T>>,
        on_stop: Option<StopCallback<T>>,
    ) -> Self {
        Self {
            target,
            surface: RefCell::new(surface),
            direction,
            on_drag: RefCell::new(on_drag),
            on_stop: RefCell::new(on_stop),
            session: Cell::new(None),
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn with_surface<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.surface.borrow_mut())
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_active(&self) -> bool {
        self.session.get().is_some()
    }

    pub fn session(&self) -> Option<DragSession> {
        self.session.get()
    }

    /// Pointer pressed on the target.
    ///
    /// Fails without touching any state when the target cannot be positioned.
    /// A press during an active gesture restarts it in place; the move
    /// listener is only registered once.
    pub fn press(&self, pointer: PagePoint) -> Result<DragPosition, DragError> {
        if !self.target.is_positionable() {
            return Err(DragError::InvalidTargetType);
        }
        let session = DragSession::begin(&self.target.computed_offsets(), pointer);
        let position = session.position(pointer);
        if self.session.replace(Some(session)).is_none() {
            self.surface.borrow_mut().listen_move();
        }
        Ok(position)
    }

    /// Pointer moved somewhere on the surface.
    ///
    /// Returns the position reported to the drag callback, with any start
    /// override of this frame already applied. `None` outside a gesture,
    /// including a gesture released from inside the drag callback.
    pub fn pointer_moved(&self, pointer: PagePoint) -> Option<DragPosition> {
        let session = self.session.get()?;
        let mut fix = FixOverrides::default();
        if let Ok(mut on_drag) = self.on_drag.try_borrow_mut() {
            if let Some(on_drag) = on_drag.as_mut() {
                on_drag(&self.target, &session.position(pointer), &mut fix);
            }
        }

        let mut session = self.session.get()?;
        for axis in Axis::BOTH {
            if self.direction.allows(axis) {
                session.step(axis, pointer.get(axis), &fix, &self.target);
            }
        }
        self.session.set(Some(session));
        Some(session.position(pointer))
    }

    /// Pointer released somewhere on the surface.
    ///
    /// No-op outside a gesture.
    pub fn release(&self, pointer: PagePoint) -> Option<DragPosition> {
        let session = self.session.take()?;
        self.surface.borrow_mut().unlisten_move();
        let position = session.position(pointer);
        if let Ok(mut on_stop) = self.on_stop.try_borrow_mut() {
            if let Some(on_stop) = on_stop.as_mut() {
                on_stop(&self.target, &position);
            }
        }
        Some(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeMap;
    use std::rc::{Rc, Weak};

    #[derive(Default)]
    struct FakeElement {
        positionable: bool,
        computed: BTreeMap<Edge, String>,
        inline: RefCell<BTreeMap<Edge, String>>,
        writes: RefCell<Vec<Edge>>,
    }

    impl FakeElement {
        fn positioned(edges: &[(Edge, &str)]) -> Self {
            Self {
                positionable: true,
                computed: edges.iter().map(|(edge, value)| (*edge, value.to_string())).collect(),
                ..Self::default()
            }
        }

        fn inline(&self, edge: Edge) -> Option<String> {
            self.inline.borrow().get(&edge).cloned()
        }

        fn wrote(&self, edge: Edge) -> bool {
            self.writes.borrow().contains(&edge)
        }
    }

    impl DragTarget for FakeElement {
        fn is_positionable(&self) -> bool {
            self.positionable
        }

        fn computed_offsets(&self) -> EdgeOffsets {
            EdgeOffsets::from_css(|edge| self.computed.get(&edge).cloned())
        }

        fn set_edge(&self, edge: Edge, value: &str) {
            self.writes.borrow_mut().push(edge);
            self.inline.borrow_mut().insert(edge, value.to_string());
        }

        fn unset_edge(&self, edge: Edge) {
            self.writes.borrow_mut().push(edge);
            self.inline.borrow_mut().insert(edge, "unset".to_string());
        }
    }

    #[derive(Clone, Default)]
    struct FakeSurface {
        listening: Rc<Cell<bool>>,
        registrations: Rc<Cell<u32>>,
        removals: Rc<Cell<u32>>,
    }

    impl MoveSurface for FakeSurface {
        fn listen_move(&mut self) {
            self.listening.set(true);
            self.registrations.set(self.registrations.get() + 1);
        }

        fn unlisten_move(&mut self) {
            self.listening.set(false);
            self.removals.set(self.removals.get() + 1);
        }
    }

    type Controller = DragController<FakeElement, FakeSurface>;

    fn new_controller(element: FakeElement, direction: Direction) -> (Controller, FakeSurface) {
        let surface = FakeSurface::default();
        (DragController::new(element, surface.clone(), direction, None, None), surface)
    }

    fn with_drag(
        element: FakeElement,
        direction: Direction,
        on_drag: impl FnMut(&FakeElement, &DragPosition, &mut FixOverrides) + 'static,
    ) -> Controller {
        DragController::new(element, FakeSurface::default(), direction, Some(Box::new(on_drag)), None)
    }

    fn point(x: f64, y: f64) -> PagePoint {
        PagePoint::new(x, y)
    }

    #[test]
    fn test_non_positionable_target_fails_without_mutation() {
        let (controller, surface) = new_controller(FakeElement::default(), Direction::Both);

        assert_eq!(controller.press(point(10.0, 10.0)), Err(DragError::InvalidTargetType));
        assert!(!controller.is_active());
        assert!(!surface.listening.get());
        assert!(controller.target().writes.borrow().is_empty());

        controller.pointer_moved(point(20.0, 20.0));
        assert!(controller.target().writes.borrow().is_empty());
    }

    #[test]
    fn test_move_listener_tracks_gesture() {
        let element = FakeElement::positioned(&[(Edge::Left, "0px"), (Edge::Top, "0px")]);
        let (controller, surface) = new_controller(element, Direction::Both);
        assert!(!surface.listening.get());

        controller.press(point(5.0, 5.0)).unwrap();
        assert!(controller.is_active());
        assert!(surface.listening.get());

        controller.release(point(5.0, 5.0));
        assert!(!controller.is_active());
        assert!(!surface.listening.get());

        controller.press(point(6.0, 6.0)).unwrap();
        assert!(surface.listening.get());
        assert_eq!(surface.registrations.get(), 2);
        assert_eq!(surface.removals.get(), 1);
    }

    #[test]
    fn test_repeated_press_registers_once() {
        let element = FakeElement::positioned(&[(Edge::Left, "0px"), (Edge::Top, "0px")]);
        let (controller, surface) = new_controller(element, Direction::Both);

        controller.press(point(1.0, 1.0)).unwrap();
        controller.press(point(2.0, 2.0)).unwrap();
        assert_eq!(surface.registrations.get(), 1);

        controller.release(point(2.0, 2.0));
        assert_eq!(surface.removals.get(), 1);
        assert!(!surface.listening.get());
    }

    #[test]
    fn test_anchor_selection_from_computed_style() {
        let near = FakeElement::positioned(&[(Edge::Left, "10px"), (Edge::Right, "40px")]);
        let (near_controller, _) = new_controller(near, Direction::Both);
        near_controller.press(point(0.0, 0.0)).unwrap();
        assert_eq!(near_controller.session().unwrap().anchor().x, crate::Anchor::Near);

        let far = FakeElement::positioned(&[(Edge::Left, "40px"), (Edge::Right, "10px")]);
        let (far_controller, _) = new_controller(far, Direction::Both);
        far_controller.press(point(0.0, 0.0)).unwrap();
        assert_eq!(far_controller.session().unwrap().anchor().x, crate::Anchor::Far);

        let unset = FakeElement::positioned(&[(Edge::Left, "0px"), (Edge::Right, "0px")]);
        let (unset_controller, _) = new_controller(unset, Direction::Both);
        unset_controller.press(point(0.0, 0.0)).unwrap();
        assert_eq!(unset_controller.session().unwrap().anchor().x, crate::Anchor::Near);
    }

    #[test]
    fn test_anchor_recomputed_every_gesture() {
        let element = FakeElement::positioned(&[(Edge::Left, "10px"), (Edge::Right, "40px")]);
        let (mut controller, _) = new_controller(element, Direction::Both);
        controller.press(point(0.0, 0.0)).unwrap();
        controller.release(point(0.0, 0.0));

        controller.target.computed.insert(Edge::Left, "90px".to_string());
        controller.target.computed.insert(Edge::Right, "5px".to_string());
        controller.press(point(0.0, 0.0)).unwrap();
        assert_eq!(controller.session().unwrap().anchor().x, crate::Anchor::Far);
    }

    #[test]
    fn test_grab_offset_preserved() {
        let element = FakeElement::positioned(&[(Edge::Left, "10px"), (Edge::Right, "40px")]);
        let (controller, _) = new_controller(element, Direction::Both);

        let position = controller.press(point(110.0, 0.0)).unwrap();
        assert_eq!(position.start_x, 100.0);

        controller.pointer_moved(point(150.0, 0.0));
        assert_eq!(controller.target().inline(Edge::Left).as_deref(), Some("50px"));
        assert_eq!(controller.target().inline(Edge::Right).as_deref(), Some("unset"));
    }

    #[test]
    fn test_far_anchor_moves_against_pointer() {
        let element = FakeElement::positioned(&[
            (Edge::Left, "300px"),
            (Edge::Right, "20px"),
            (Edge::Top, "200px"),
            (Edge::Bottom, "30px"),
        ]);
        let (controller, _) = new_controller(element, Direction::Both);

        let position = controller.press(point(500.0, 400.0)).unwrap();
        assert_eq!(position.start_x, 520.0);
        assert_eq!(position.start_y, 430.0);

        controller.pointer_moved(point(490.0, 410.0));
        let target = controller.target();
        assert_eq!(target.inline(Edge::Right).as_deref(), Some("30px"));
        assert_eq!(target.inline(Edge::Left).as_deref(), Some("unset"));
        assert_eq!(target.inline(Edge::Bottom).as_deref(), Some("20px"));
        assert_eq!(target.inline(Edge::Top).as_deref(), Some("unset"));
    }

    #[test]
    fn test_vertical_direction_never_writes_horizontal() {
        let element = FakeElement::positioned(&[(Edge::Left, "0px"), (Edge::Top, "0px")]);
        let controller = with_drag(element, Direction::Vertical, |_, _, fix| {
            fix.page_x = Some(500.0);
            fix.start_x = Some(-100.0);
        });

        controller.press(point(10.0, 10.0)).unwrap();
        controller.pointer_moved(point(40.0, 30.0));

        let target = controller.target();
        assert!(!target.wrote(Edge::Left));
        assert!(!target.wrote(Edge::Right));
        assert_eq!(target.inline(Edge::Top).as_deref(), Some("20px"));
        assert_eq!(controller.session().unwrap().start().x, 10.0);
    }

    #[test]
    fn test_horizontal_direction_never_writes_vertical() {
        let element = FakeElement::positioned(&[(Edge::Left, "0px"), (Edge::Top, "0px")]);
        let (controller, _) = new_controller(element, Direction::Horizontal);

        controller.press(point(10.0, 10.0)).unwrap();
        controller.pointer_moved(point(40.0, 30.0));

        let target = controller.target();
        assert_eq!(target.inline(Edge::Left).as_deref(), Some("30px"));
        assert!(!target.wrote(Edge::Top));
        assert!(!target.wrote(Edge::Bottom));
    }

    #[test]
    fn test_skip_suppresses_one_frame_only() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let frame = Rc::new(Cell::new(0));
        let element = FakeElement::positioned(&[(Edge::Left, "0px"), (Edge::Top, "0px")]);
        let controller = with_drag(element, Direction::Both, {
            let seen = seen.clone();
            let frame = frame.clone();
            move |_, position, fix| {
                seen.borrow_mut().push(*position);
                if frame.get() == 0 {
                    fix.skip_x = true;
                }
                frame.set(frame.get() + 1);
            }
        });

        controller.press(point(10.0, 10.0)).unwrap();
        controller.pointer_moved(point(50.0, 60.0));
        {
            let target = controller.target();
            assert!(!target.wrote(Edge::Left));
            assert_eq!(target.inline(Edge::Top).as_deref(), Some("50px"));
        }
        assert_eq!(
            seen.borrow()[0],
            DragPosition { page_x: 50.0, start_x: 10.0, page_y: 60.0, start_y: 10.0 }
        );

        controller.pointer_moved(point(70.0, 60.0));
        assert_eq!(controller.target().inline(Edge::Left).as_deref(), Some("60px"));
    }

    #[test]
    fn test_start_override_persists_for_gesture() {
        let frame = Rc::new(Cell::new(0));
        let element = FakeElement::positioned(&[(Edge::Left, "0px"), (Edge::Top, "0px")]);
        let controller = with_drag(element, Direction::Both, {
            let frame = frame.clone();
            move |_, _, fix| {
                if frame.get() == 0 {
                    fix.start_x = Some(0.0);
                }
                frame.set(frame.get() + 1);
            }
        });

        controller.press(point(20.0, 20.0)).unwrap();
        controller.pointer_moved(point(30.0, 20.0));
        assert_eq!(controller.target().inline(Edge::Left).as_deref(), Some("30px"));

        let position = controller.pointer_moved(point(45.0, 20.0)).unwrap();
        assert_eq!(position.start_x, 0.0);
        assert_eq!(controller.target().inline(Edge::Left).as_deref(), Some("45px"));
    }

    #[test]
    fn test_page_override_applies_to_single_frame() {
        let frame = Rc::new(Cell::new(0));
        let element = FakeElement::positioned(&[(Edge::Left, "0px"), (Edge::Top, "0px")]);
        let controller = with_drag(element, Direction::Both, {
            let frame = frame.clone();
            move |_, position, fix| {
                if frame.get() == 0 {
                    fix.page_y = Some(position.page_y.min(25.0));
                }
                frame.set(frame.get() + 1);
            }
        });

        controller.press(point(0.0, 0.0)).unwrap();
        controller.pointer_moved(point(0.0, 100.0));
        assert_eq!(controller.target().inline(Edge::Top).as_deref(), Some("25px"));

        controller.pointer_moved(point(0.0, 100.0));
        assert_eq!(controller.target().inline(Edge::Top).as_deref(), Some("100px"));
    }

    #[test]
    fn test_release_without_press_is_noop() {
        let stops = Rc::new(Cell::new(0));
        let element = FakeElement::positioned(&[(Edge::Left, "0px")]);
        let surface = FakeSurface::default();
        let controller = DragController::new(
            element,
            surface.clone(),
            Direction::Both,
            None,
            Some(Box::new({
                let stops = stops.clone();
                move |_: &FakeElement, _: &DragPosition| stops.set(stops.get() + 1)
            })),
        );

        assert_eq!(controller.release(point(3.0, 4.0)), None);
        assert_eq!(surface.removals.get(), 0);
        assert_eq!(stops.get(), 0);
    }

    #[test]
    fn test_stop_callback_receives_release_position() {
        let stopped = Rc::new(RefCell::new(None));
        let element = FakeElement::positioned(&[
            (Edge::Left, "10px"),
            (Edge::Top, "20px"),
            (Edge::Right, "500px"),
            (Edge::Bottom, "500px"),
        ]);
        let controller = DragController::new(
            element,
            FakeSurface::default(),
            Direction::Both,
            None,
            Some(Box::new({
                let stopped = stopped.clone();
                move |_: &FakeElement, position: &DragPosition| *stopped.borrow_mut() = Some(*position)
            })),
        );

        controller.press(point(15.0, 25.0)).unwrap();
        controller.pointer_moved(point(60.0, 80.0));
        controller.release(point(61.0, 81.0));

        assert_eq!(
            *stopped.borrow(),
            Some(DragPosition { page_x: 61.0, start_x: 5.0, page_y: 81.0, start_y: 5.0 })
        );
    }

    #[test]
    fn test_end_to_end_gesture() {
        let element = FakeElement::positioned(&[(Edge::Left, "0px"), (Edge::Top, "0px")]);
        let (controller, surface) = new_controller(element, Direction::Both);

        controller.press(point(50.0, 50.0)).unwrap();
        controller.pointer_moved(point(80.0, 65.0));
        controller.release(point(80.0, 65.0));

        let target = controller.target();
        assert_eq!(target.inline(Edge::Left).as_deref(), Some("30px"));
        assert_eq!(target.inline(Edge::Top).as_deref(), Some("15px"));
        assert_eq!(target.inline(Edge::Right).as_deref(), Some("unset"));
        assert_eq!(target.inline(Edge::Bottom).as_deref(), Some("unset"));
        assert!(!controller.is_active());
        assert!(!surface.listening.get());
    }

    #[test]
    fn test_release_from_drag_callback() {
        let stops = Rc::new(Cell::new(0));
        let surface = FakeSurface::default();
        let element = FakeElement::positioned(&[(Edge::Left, "0px"), (Edge::Top, "0px")]);
        let controller = Rc::new_cyclic(|this: &Weak<Controller>| {
            let this = this.clone();
            let stops = stops.clone();
            DragController::new(
                element,
                surface.clone(),
                Direction::Both,
                Some(Box::new(move |_: &FakeElement, position: &DragPosition, _: &mut FixOverrides| {
                    if let Some(controller) = this.upgrade() {
                        controller.release(point(position.page_x, position.page_y));
                    }
                })),
                Some(Box::new(move |_: &FakeElement, _: &DragPosition| stops.set(stops.get() + 1))),
            )
        });

        controller.press(point(10.0, 10.0)).unwrap();
        assert_eq!(controller.pointer_moved(point(30.0, 40.0)), None);

        assert_eq!(stops.get(), 1);
        assert!(!controller.is_active());
        assert!(!surface.listening.get());
        assert!(controller.target().writes.borrow().is_empty());

        assert_eq!(controller.pointer_moved(point(50.0, 50.0)), None);
        assert!(controller.target().writes.borrow().is_empty());
    }

    #[test]
    fn test_nested_move_skips_nested_drag_callback() {
        let calls = Rc::new(Cell::new(0));
        let element = FakeElement::positioned(&[(Edge::Left, "0px"), (Edge::Top, "0px")]);
        let controller = Rc::new_cyclic(|this: &Weak<Controller>| {
            let this = this.clone();
            let calls = calls.clone();
            DragController::new(
                element,
                FakeSurface::default(),
                Direction::Both,
                Some(Box::new(move |_: &FakeElement, _: &DragPosition, _: &mut FixOverrides| {
                    calls.set(calls.get() + 1);
                    if let Some(controller) = this.upgrade() {
                        controller.pointer_moved(point(5.0, 5.0));
                    }
                })),
                None,
            )
        });

        controller.press(point(0.0, 0.0)).unwrap();
        controller.pointer_moved(point(20.0, 30.0));

        assert_eq!(calls.get(), 1);
        assert_eq!(controller.target().inline(Edge::Left).as_deref(), Some("20px"));
        assert_eq!(controller.target().inline(Edge::Top).as_deref(), Some("30px"));
    }

    #[test]
    fn test_press_from_stop_callback_starts_new_gesture() {
        let surface = FakeSurface::default();
        let element = FakeElement::positioned(&[(Edge::Left, "0px"), (Edge::Top, "0px")]);
        let controller = Rc::new_cyclic(|this: &Weak<Controller>| {
            let this = this.clone();
            DragController::new(
                element,
                surface.clone(),
                Direction::Both,
                None,
                Some(Box::new(move |_: &FakeElement, position: &DragPosition| {
                    if let Some(controller) = this.upgrade() {
                        controller.press(point(position.page_x, position.page_y)).unwrap();
                    }
                })),
            )
        });

        controller.press(point(0.0, 0.0)).unwrap();
        controller.release(point(10.0, 10.0));

        assert!(controller.is_active());
        assert!(surface.listening.get());
        assert_eq!(surface.registrations.get(), 2);
        assert_eq!(surface.removals.get(), 1);
    }
}
