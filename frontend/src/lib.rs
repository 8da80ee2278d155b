//! sdrag: drag positioned DOM elements by their CSS edge offsets
//!
//! Rust usage:
//!
//! ```rust,ignore
//! use sdrag::{Direction, DragBuilder};
//!
//! let draggable = DragBuilder::new(&element)
//!     .direction(Direction::Vertical)
//!     .on_stop(|_, position| zoon::println!("dropped at {}", position.page_y))
//!     .attach()?;
//! ```
//!
//! JavaScript usage, after the module loads:
//!
//! ```js
//! document.getElementById('my_target').sdrag(onDrag, onStop, 'horizontal');
//! ```
//!
//! A gesture only ends on `mouseup`. If the page never sees the release
//! (focus lost mid-drag), the element keeps following the pointer until the
//! next `mouseup` anywhere on the window.

use web_sys::Element;

mod draggable;
mod js_api;
mod relay;
mod status;
mod target;

pub use draggable::{DragBuilder, DragEvent, Draggable};
pub use js_api::{install_prototype, options_from_js, sdrag};
pub use relay::{Relay, RelayError};
pub use sdrag_shared::{Direction, DragError, DragOptions, DragPosition, FixOverrides, PagePoint};
pub use status::DragStatus;
pub use target::{ElementTarget, WindowSurface};

/// Make `element` draggable without callbacks.
pub fn attach(element: &Element, options: DragOptions) -> Result<Draggable, DragError> {
    DragBuilder::new(element).options(options).attach()
}

#[cfg(feature = "auto_install")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() -> Result<(), wasm_bindgen::JsValue> {
    install_prototype()
}
