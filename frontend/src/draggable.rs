//! Wiring of one [`DragController`] into the page's mouse events
//!
//! Data flows: `mousedown` on the element → press → `mousemove` on the window
//! (registered only during a gesture) → `mouseup` on the window → release.
//! Every step also updates the element's [`DragStatus`] and drag event relay.

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::mpsc::UnboundedReceiver;
use js_sys::{Function, Reflect};
use sdrag_shared::{
    DragCallback, DragController, DragError, DragOptions, DragPosition, Direction, FixOverrides, PagePoint,
    StopCallback,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, MouseEvent};
use zoon::Signal;

use crate::relay::Relay;
use crate::status::DragStatus;
use crate::target::{ElementTarget, WindowSurface};

type WebController = DragController<ElementTarget, WindowSurface>;
type MouseListener = Closure<dyn Fn(MouseEvent) -> Result<(), JsValue>>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragEvent {
    Started(DragPosition),
    Moved(DragPosition),
    Stopped(DragPosition),
}

/// First exception thrown by a JS callback during the current handler.
///
/// Callbacks run in the middle of a controller step, so the exception is
/// parked here and thrown once the handler is done with the controller.
#[derive(Clone, Default)]
pub(crate) struct RaisedError(Rc<RefCell<Option<JsValue>>>);

impl RaisedError {
    pub(crate) fn raise(&self, error: JsValue) {
        self.0.borrow_mut().get_or_insert(error);
    }

    fn take(&self) -> Result<(), JsValue> {
        match self.0.borrow_mut().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

pub(crate) fn js_error(error: &DragError) -> JsValue {
    js_sys::Error::new(&error.to_string()).into()
}

/// `pageX`/`pageY` keep their fractional part; `MouseEvent::page_x` truncates.
fn page_point(event: &MouseEvent) -> PagePoint {
    let coordinate = |key: &str, fallback: i32| {
        Reflect::get(event, &JsValue::from_str(key))
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(fallback as f64)
    };
    PagePoint::new(coordinate("pageX", event.page_x()), coordinate("pageY", event.page_y()))
}

// ===== ATTACHMENT =====

struct Attachment {
    element: Element,
    options: DragOptions,
    controller: WebController,
    status: DragStatus,
    drag_event_relay: Relay<DragEvent>,
    raised: RaisedError,
}

impl Attachment {
    fn pressed(&self, event: &MouseEvent) -> Result<(), JsValue> {
        let pointer = page_point(event);
        let position = self.controller.press(pointer).map_err(|error| js_error(&error))?;

        self.status.started(pointer);
        self.drag_event_relay.send(DragEvent::Started(position));
        if self.options.log_events {
            zoon::println!("🖱️ Drag started at ({}, {})", pointer.x, pointer.y);
        }
        self.raised.take()
    }

    fn moved(&self, event: &MouseEvent) -> Result<(), JsValue> {
        let pointer = page_point(event);
        let moved = self.controller.pointer_moved(pointer);
        // A throwing drag callback aborts the frame, so nothing moved.
        self.raised.take()?;

        if let Some(position) = moved {
            self.status.moved(pointer);
            self.drag_event_relay.send(DragEvent::Moved(position));
        }
        Ok(())
    }

    fn released(&self, event: &MouseEvent) -> Result<(), JsValue> {
        let pointer = page_point(event);
        let stopped = self.controller.release(pointer);

        if let Some(position) = stopped {
            self.status.stopped(pointer);
            self.drag_event_relay.send(DragEvent::Stopped(position));
            if self.options.log_events {
                zoon::println!("🏁 Drag stopped at ({}, {})", pointer.x, pointer.y);
            }
        }
        self.raised.take()
    }
}

fn mouse_listener(
    attachment: &Rc<Attachment>,
    handler: fn(&Attachment, &MouseEvent) -> Result<(), JsValue>,
) -> MouseListener {
    let attachment = attachment.clone();
    Closure::wrap(Box::new(move |event: MouseEvent| handler(&attachment, &event))
        as Box<dyn Fn(MouseEvent) -> Result<(), JsValue>>)
}

fn host_error(error: JsValue) -> DragError {
    DragError::Host(format!("{error:?}"))
}

/// Register the press and release listeners for a new controller.
///
/// Listeners live for the rest of the page; there is no detach.
pub(crate) fn attach_with(
    element: &Element,
    options: DragOptions,
    on_drag: Option<DragCallback<ElementTarget>>,
    on_stop: Option<StopCallback<ElementTarget>>,
    raised: RaisedError,
) -> Result<Draggable, DragError> {
    let window = web_sys::window().ok_or_else(|| DragError::Host("no global window".to_string()))?;

    let controller = DragController::new(
        ElementTarget::new(element.clone(), window.clone()),
        WindowSurface::new(window.clone()),
        options.direction,
        on_drag,
        on_stop,
    );
    let attachment = Rc::new(Attachment {
        element: element.clone(),
        options,
        controller,
        status: DragStatus::default(),
        drag_event_relay: Relay::new(),
        raised,
    });

    let on_move = mouse_listener(&attachment, Attachment::moved);
    attachment
        .controller
        .with_surface(|surface| surface.set_listener(on_move.as_ref().unchecked_ref::<Function>().clone()));

    let on_press = mouse_listener(&attachment, Attachment::pressed);
    element
        .add_event_listener_with_callback("mousedown", on_press.as_ref().unchecked_ref())
        .map_err(host_error)?;

    let on_release = mouse_listener(&attachment, Attachment::released);
    if let Err(error) = window.add_event_listener_with_callback("mouseup", on_release.as_ref().unchecked_ref()) {
        let _ = element.remove_event_listener_with_callback("mousedown", on_press.as_ref().unchecked_ref());
        return Err(host_error(error));
    }

    on_move.forget();
    on_press.forget();
    on_release.forget();

    if attachment.options.log_events {
        zoon::println!("🎯 Draggable attached ({:?})", attachment.options.direction);
    }
    Ok(Draggable { attachment })
}

// ===== PUBLIC HANDLE =====

/// Handle to an attached draggable element.
#[derive(Clone)]
pub struct Draggable {
    attachment: Rc<Attachment>,
}

impl Draggable {
    pub fn element(&self) -> &Element {
        &self.attachment.element
    }

    pub fn direction(&self) -> Direction {
        self.attachment.options.direction
    }

    pub fn is_dragging(&self) -> bool {
        self.attachment.status.is_dragging()
    }

    pub fn is_dragging_signal(&self) -> impl Signal<Item = bool> + use<> {
        self.attachment.status.is_dragging_signal()
    }

    /// Last pointer position seen during a gesture
    pub fn pointer_signal(&self) -> impl Signal<Item = Option<PagePoint>> + use<> {
        self.attachment.status.pointer_signal()
    }

    /// Stream of gesture events from now on
    pub fn drag_events(&self) -> UnboundedReceiver<DragEvent> {
        self.attachment.drag_event_relay.subscribe()
    }
}

/// Builder for [`Draggable`] with optional callbacks.
///
/// ```rust,ignore
/// let draggable = DragBuilder::new(&element)
///     .direction(Direction::Horizontal)
///     .on_drag(|_, position, fix| fix.page_x = Some(position.page_x.max(0.0)))
///     .attach()?;
/// ```
pub struct DragBuilder {
    element: Element,
    options: DragOptions,
    on_drag: Option<DragCallback<ElementTarget>>,
    on_stop: Option<StopCallback<ElementTarget>>,
}

impl DragBuilder {
    pub fn new(element: &Element) -> Self {
        Self {
            element: element.clone(),
            options: DragOptions::default(),
            on_drag: None,
            on_stop: None,
        }
    }

    pub fn options(mut self, options: DragOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the options with ones read from a TOML document.
    pub fn options_toml(self, source: &str) -> Result<Self, DragError> {
        Ok(self.options(DragOptions::from_toml_str(source)?))
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.options.direction = direction;
        self
    }

    pub fn on_drag(mut self, mut on_drag: impl FnMut(&Element, &DragPosition, &mut FixOverrides) + 'static) -> Self {
        self.on_drag = Some(Box::new(move |target: &ElementTarget, position: &DragPosition, fix: &mut FixOverrides| {
            on_drag(target.element(), position, fix)
        }));
        self
    }

    pub fn on_stop(mut self, mut on_stop: impl FnMut(&Element, &DragPosition) + 'static) -> Self {
        self.on_stop = Some(Box::new(move |target: &ElementTarget, position: &DragPosition| {
            on_stop(target.element(), position)
        }));
        self
    }

    pub fn attach(self) -> Result<Draggable, DragError> {
        attach_with(&self.element, self.options, self.on_drag, self.on_stop, RaisedError::default())
    }
}
