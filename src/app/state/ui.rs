use iced::keyboard::Modifiers;

pub struct WindowState {
    pub(in crate::app) width: f32,
    pub(in crate::app) height: f32,
    /// Inner origin on screen, fetched each time a recording starts.
    pub(in crate::app) position: Option<(f32, f32)>,
    pub(in crate::app) fullscreen: bool,
}

pub struct PointerState {
    pub(in crate::app) x: f32,
    pub(in crate::app) y: f32,
    pub(in crate::app) modifiers: Modifiers,
}

impl PointerState {
    pub(in crate::app) fn new() -> Self {
        PointerState {
            x: 0.0,
            y: 0.0,
            modifiers: Modifiers::empty(),
        }
    }
}
