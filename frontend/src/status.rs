//! Reactive view of a draggable element's gesture state

use sdrag_shared::PagePoint;
use zoon::{Mutable, Signal};

#[derive(Clone, Default)]
pub struct DragStatus {
    dragging: Mutable<bool>,
    /// Last pointer position seen by the controller
    pointer: Mutable<Option<PagePoint>>,
}

impl DragStatus {
    pub fn started(&self, pointer: PagePoint) {
        self.pointer.set_neq(Some(pointer));
        self.dragging.set_neq(true);
    }

    pub fn moved(&self, pointer: PagePoint) {
        self.pointer.set_neq(Some(pointer));
    }

    pub fn stopped(&self, pointer: PagePoint) {
        self.pointer.set_neq(Some(pointer));
        self.dragging.set_neq(false);
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.get()
    }

    pub fn pointer(&self) -> Option<PagePoint> {
        self.pointer.get()
    }

    pub fn is_dragging_signal(&self) -> impl Signal<Item = bool> + use<> {
        self.dragging.signal()
    }

    pub fn pointer_signal(&self) -> impl Signal<Item = Option<PagePoint>> + use<> {
        self.pointer.signal()
    }
}
