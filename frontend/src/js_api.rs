//! JavaScript entry points
//!
//! `sdrag(el, onDrag, onStop, direction)` and `Element.prototype.sdrag`
//! behave like the plain-JS helper: `onDrag(el, pageX, startX, pageY, startY, fix)`
//! may fill `fix` with `pageX`, `startX`, `pageY`, `startY`, `skipX`, `skipY`;
//! `onStop(el, pageX, startX, pageY, startY)` runs on release.

use js_sys::{Array, Function, Object, Reflect};
use sdrag_shared::{Direction, DragCallback, DragError, DragOptions, DragPosition, FixOverrides, StopCallback};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::draggable::{RaisedError, attach_with, js_error};
use crate::target::ElementTarget;

// ===== OPTIONS =====

/// Accepts nothing, a direction name, or a full options object.
pub fn options_from_js(value: &JsValue) -> Result<DragOptions, DragError> {
    if value.is_undefined() || value.is_null() {
        return Ok(DragOptions::default());
    }
    if value.is_string() {
        let direction: Direction = serde_wasm_bindgen::from_value(value.clone())
            .map_err(|error| DragError::InvalidOptions(error.to_string()))?;
        return Ok(DragOptions::with_direction(direction));
    }
    serde_wasm_bindgen::from_value(value.clone()).map_err(|error| DragError::InvalidOptions(error.to_string()))
}

// ===== CALLBACK ADAPTERS =====

fn has_key(object: &Object, key: &str) -> bool {
    Reflect::has(object, &JsValue::from_str(key)).unwrap_or(false)
}

/// `key in object ? Number(object[key]) : None`, ignoring non-numbers.
fn number_key(object: &Object, key: &str) -> Option<f64> {
    if !has_key(object, key) {
        return None;
    }
    Reflect::get(object, &JsValue::from_str(key)).ok()?.as_f64()
}

fn read_fix(object: &Object) -> FixOverrides {
    FixOverrides {
        page_x: number_key(object, "pageX"),
        start_x: number_key(object, "startX"),
        page_y: number_key(object, "pageY"),
        start_y: number_key(object, "startY"),
        skip_x: has_key(object, "skipX"),
        skip_y: has_key(object, "skipY"),
    }
}

fn position_args(target: &ElementTarget, position: &DragPosition) -> Array {
    let args = Array::new();
    args.push(target.element());
    args.push(&JsValue::from_f64(position.page_x));
    args.push(&JsValue::from_f64(position.start_x));
    args.push(&JsValue::from_f64(position.page_y));
    args.push(&JsValue::from_f64(position.start_y));
    args
}

fn js_drag_callback(callback: Function, raised: RaisedError) -> DragCallback<ElementTarget> {
    Box::new(move |target: &ElementTarget, position: &DragPosition, fix: &mut FixOverrides| {
        let fix_object = Object::new();
        let args = position_args(target, position);
        args.push(&fix_object);
        match callback.apply(&JsValue::UNDEFINED, &args) {
            Ok(_) => *fix = read_fix(&fix_object),
            Err(error) => {
                // An exception aborts the rest of the frame.
                fix.skip_all();
                raised.raise(error);
            }
        }
    })
}

fn js_stop_callback(callback: Function, raised: RaisedError) -> StopCallback<ElementTarget> {
    Box::new(move |target: &ElementTarget, position: &DragPosition| {
        if let Err(error) = callback.apply(&JsValue::UNDEFINED, &position_args(target, position)) {
            raised.raise(error);
        }
    })
}

// ===== EXPORTS =====

/// Make `target` draggable.
///
/// Non-function callbacks are ignored. `direction` is `"horizontal"`,
/// `"vertical"`, `"both"`, an options object, or nothing.
#[wasm_bindgen]
pub fn sdrag(target: JsValue, on_drag: JsValue, on_stop: JsValue, direction: JsValue) -> Result<(), JsValue> {
    let element = target
        .dyn_into::<Element>()
        .map_err(|_| js_error(&DragError::InvalidTargetType))?;
    let options = options_from_js(&direction).map_err(|error| js_error(&error))?;

    let raised = RaisedError::default();
    let on_drag = on_drag
        .dyn_into::<Function>()
        .ok()
        .map(|callback| js_drag_callback(callback, raised.clone()));
    let on_stop = on_stop
        .dyn_into::<Function>()
        .ok()
        .map(|callback| js_stop_callback(callback, raised.clone()));

    attach_with(&element, options, on_drag, on_stop, raised)
        .map(|_| ())
        .map_err(|error| js_error(&error))
}

#[wasm_bindgen(inline_js = r#"
export function define_sdrag_method(attach) {
  Element.prototype.sdrag = function (onDrag, onStop, direction) {
    return attach(this, onDrag, onStop, direction);
  };
}
"#)]
extern "C" {
    #[wasm_bindgen(catch)]
    fn define_sdrag_method(attach: &JsValue) -> Result<(), JsValue>;
}

/// Define `Element.prototype.sdrag(onDrag, onStop, direction)`.
#[wasm_bindgen]
pub fn install_prototype() -> Result<(), JsValue> {
    let attach = Closure::wrap(Box::new(sdrag)
        as Box<dyn Fn(JsValue, JsValue, JsValue, JsValue) -> Result<(), JsValue>>);
    define_sdrag_method(attach.as_ref())?;
    attach.forget();
    Ok(())
}
