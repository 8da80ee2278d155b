//! DOM side of the drag controller: the dragged element and the window surface

use js_sys::Function;
use sdrag_shared::{DragTarget, Edge, EdgeOffsets, MoveSurface};
use wasm_bindgen::JsCast;
use web_sys::{CssStyleDeclaration, Element, HtmlElement, SvgElement, Window};

/// CSS keyword that drops an inline offset.
const UNSET: &str = "unset";

pub struct ElementTarget {
    element: Element,
    window: Window,
}

impl ElementTarget {
    pub fn new(element: Element, window: Window) -> Self {
        Self { element, window }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    fn inline_style(&self) -> Option<CssStyleDeclaration> {
        if let Some(html_el) = self.element.dyn_ref::<HtmlElement>() {
            return Some(html_el.style());
        }
        self.element.dyn_ref::<SvgElement>().map(|svg_el| svg_el.style())
    }

    fn write(&self, edge: Edge, value: &str) {
        let Some(style) = self.inline_style() else {
            return;
        };
        if let Err(error) = style.set_property(edge.css_name(), value) {
            zoon::eprintln!("⚠️ Failed to set {} to {}: {:?}", edge.css_name(), value, error);
        }
    }
}

impl DragTarget for ElementTarget {
    fn is_positionable(&self) -> bool {
        self.element.is_instance_of::<HtmlElement>() || self.element.is_instance_of::<SvgElement>()
    }

    fn computed_offsets(&self) -> EdgeOffsets {
        match self.window.get_computed_style(&self.element) {
            Ok(Some(style)) => EdgeOffsets::from_css(|edge| style.get_property_value(edge.css_name()).ok()),
            _ => EdgeOffsets::default(),
        }
    }

    fn set_edge(&self, edge: Edge, value: &str) {
        self.write(edge, value);
    }

    fn unset_edge(&self, edge: Edge) {
        self.write(edge, UNSET);
    }
}

/// `mousemove` registration on the window.
///
/// The listener function is created after the controller that owns this
/// surface, so it is handed in through `set_listener`.
pub struct WindowSurface {
    window: Window,
    listener: Option<Function>,
}

impl WindowSurface {
    pub fn new(window: Window) -> Self {
        Self { window, listener: None }
    }

    pub fn set_listener(&mut self, listener: Function) {
        self.listener = Some(listener);
    }
}

impl MoveSurface for WindowSurface {
    fn listen_move(&mut self) {
        let Some(listener) = &self.listener else {
            return;
        };
        if let Err(error) = self.window.add_event_listener_with_callback("mousemove", listener) {
            zoon::eprintln!("⚠️ Failed to listen for mousemove: {:?}", error);
        }
    }

    fn unlisten_move(&mut self) {
        let Some(listener) = &self.listener else {
            return;
        };
        if let Err(error) = self.window.remove_event_listener_with_callback("mousemove", listener) {
            zoon::eprintln!("⚠️ Failed to remove mousemove listener: {:?}", error);
        }
    }
}
