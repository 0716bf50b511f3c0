use std::{
    cell::RefCell,
    fmt::{Debug, Formatter},
    rc::Rc,
};

use wasm_bindgen::{closure::Closure, JsCast};

use crate::{camera::Movement, js, Error};

/// Movement directions in the order they are applied each frame.
const MOVEMENTS: [Movement; 4] =
    [Movement::Forward, Movement::Backward, Movement::Left, Movement::Right];

/// Maps a `KeyboardEvent.code` to a camera movement (WASD, layout independent).
pub fn movement_for_key(code: &str) -> Option<Movement> {
    match code {
        "KeyW" => Some(Movement::Forward),
        "KeyS" => Some(Movement::Backward),
        "KeyA" => Some(Movement::Left),
        "KeyD" => Some(Movement::Right),
        _ => None,
    }
}

const CLOSE_KEY: &str = "Escape";

/// Held movement keys and the close request.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct KeyboardState {
    held: [bool; 4],
    close_requested: bool,
}

impl KeyboardState {
    pub fn key_down(&mut self, code: &str) {
        if code == CLOSE_KEY {
            self.close_requested = true;
        } else if let Some(movement) = movement_for_key(code) {
            self.held[movement_index(movement)] = true;
        }
    }

    pub fn key_up(&mut self, code: &str) {
        if let Some(movement) = movement_for_key(code) {
            self.held[movement_index(movement)] = false;
        }
    }

    pub fn is_held(&self, movement: Movement) -> bool {
        self.held[movement_index(movement)]
    }

    /// Currently held movements: forward, backward, left, right.
    pub fn held_movements(&self) -> impl Iterator<Item = Movement> + '_ {
        MOVEMENTS.into_iter().filter(|m| self.is_held(*m))
    }

    /// Once requested, stays requested.
    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    /// Releases all held keys, e.g. when the page loses focus.
    pub fn release_all(&mut self) {
        self.held = [false; 4];
    }
}

fn movement_index(movement: Movement) -> usize {
    match movement {
        Movement::Forward => 0,
        Movement::Backward => 1,
        Movement::Left => 2,
        Movement::Right => 3,
    }
}

/// Converts absolute pointer positions into look deltas.
///
/// The first sample only records the position. Screen y grows downwards, so
/// the vertical delta is inverted: moving the pointer up yields a positive
/// `dy`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MouseTracker {
    last: Option<(f32, f32)>,
}

impl MouseTracker {
    pub fn track(&mut self, x: f32, y: f32) -> (f32, f32) {
        let (last_x, last_y) = self.last.unwrap_or((x, y));
        self.last = Some((x, y));

        (x - last_x, last_y - y)
    }

    /// Forgets the last position; the next sample produces no delta.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Input accumulated between two frames.
///
/// While the pointer is locked to the canvas, look deltas come from the
/// relative motion of mouse events and are unbounded by the canvas size.
/// Otherwise they are derived from absolute positions by a [`MouseTracker`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InputState {
    keyboard: KeyboardState,
    mouse: MouseTracker,
    pointer_locked: bool,
    look_delta: (f32, f32),
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, code: &str) {
        self.keyboard.key_down(code);
    }

    pub fn key_up(&mut self, code: &str) {
        self.keyboard.key_up(code);
    }

    /// Records a pointer position, accumulating its delta.
    pub fn mouse_moved(&mut self, x: f32, y: f32) {
        let (dx, dy) = self.mouse.track(x, y);
        self.look_delta.0 += dx;
        self.look_delta.1 += dy;
    }

    /// Accumulates relative pointer motion; screen y grows downwards.
    pub fn pointer_moved(&mut self, movement_x: f32, movement_y: f32) {
        self.look_delta.0 += movement_x;
        self.look_delta.1 -= movement_y;
    }

    /// Feeds one mouse event: relative motion while locked, the absolute
    /// position otherwise.
    pub fn mouse_event(&mut self, position: (f32, f32), movement: (f32, f32)) {
        if self.pointer_locked {
            self.pointer_moved(movement.0, movement.1);
        } else {
            self.mouse_moved(position.0, position.1);
        }
    }

    /// Switches between locked and absolute tracking. The absolute tracker
    /// restarts so the switch never produces a jump.
    pub fn set_pointer_locked(&mut self, locked: bool) {
        self.pointer_locked = locked;
        self.mouse.reset();
    }

    pub fn is_pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    /// Pointer left the canvas; re-entering must not produce a jump.
    pub fn mouse_left(&mut self) {
        self.mouse.reset();
    }

    /// Returns the look delta accumulated since the previous call.
    pub fn take_look_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.look_delta)
    }

    pub fn keyboard(&self) -> &KeyboardState {
        &self.keyboard
    }

    pub fn close_requested(&self) -> bool {
        self.keyboard.close_requested()
    }
}

/// Browser listeners feeding a shared [`InputState`].
///
/// Keyboard listeners are attached to the window, pointer listeners to the
/// canvas. Clicking the canvas captures the pointer; the browser releases it
/// on Escape. Listeners are removed by [`InputHandler::cleanup`] or on drop.
pub struct InputHandler {
    window: web_sys::Window,
    document: web_sys::Document,
    canvas: web_sys::HtmlCanvasElement,
    on_key_down: Closure<dyn FnMut(web_sys::KeyboardEvent)>,
    on_key_up: Closure<dyn FnMut(web_sys::KeyboardEvent)>,
    on_blur: Closure<dyn FnMut(web_sys::FocusEvent)>,
    on_mouse_move: Closure<dyn FnMut(web_sys::MouseEvent)>,
    on_mouse_leave: Closure<dyn FnMut(web_sys::MouseEvent)>,
    on_click: Closure<dyn FnMut(web_sys::MouseEvent)>,
    on_pointer_lock_change: Closure<dyn FnMut(web_sys::Event)>,
    state: Rc<RefCell<InputState>>,
}

impl InputHandler {
    pub fn new(canvas: &web_sys::HtmlCanvasElement) -> Result<Self, Error> {
        let window = js::window()?;
        let document = js::document()?;
        let state = Rc::new(RefCell::new(InputState::new()));

        let on_key_down = keyboard_closure(state.clone(), |state, code| state.key_down(code));
        let on_key_up = keyboard_closure(state.clone(), |state, code| state.key_up(code));

        let blur_state = state.clone();
        let on_blur = Closure::wrap(Box::new(move |_: web_sys::FocusEvent| {
            blur_state.borrow_mut().keyboard.release_all();
        }) as Box<dyn FnMut(_)>);

        let move_state = state.clone();
        let on_mouse_move = Closure::wrap(Box::new(move |event: web_sys::MouseEvent| {
            let position = (event.offset_x() as f32, event.offset_y() as f32);
            let movement = (event.movement_x() as f32, event.movement_y() as f32);
            move_state.borrow_mut().mouse_event(position, movement);
        }) as Box<dyn FnMut(_)>);

        let leave_state = state.clone();
        let on_mouse_leave = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            leave_state.borrow_mut().mouse_left();
        }) as Box<dyn FnMut(_)>);

        let lock_target = canvas.clone();
        let on_click = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            lock_target.request_pointer_lock();
        }) as Box<dyn FnMut(_)>);

        let lock_state = state.clone();
        let lock_document = document.clone();
        let canvas_element: web_sys::Element = canvas.clone().into();
        let on_pointer_lock_change = Closure::wrap(Box::new(move |_: web_sys::Event| {
            let locked = lock_document
                .pointer_lock_element()
                .is_some_and(|element| element == canvas_element);
            lock_state.borrow_mut().set_pointer_locked(locked);
            log::debug!("pointer lock {}", if locked { "acquired" } else { "released" });
        }) as Box<dyn FnMut(_)>);

        window
            .add_event_listener_with_callback("keydown", on_key_down.as_ref().unchecked_ref())
            .map_err(|_| Error::listener_failed("keydown"))?;
        window
            .add_event_listener_with_callback("keyup", on_key_up.as_ref().unchecked_ref())
            .map_err(|_| Error::listener_failed("keyup"))?;
        window
            .add_event_listener_with_callback("blur", on_blur.as_ref().unchecked_ref())
            .map_err(|_| Error::listener_failed("blur"))?;
        canvas
            .add_event_listener_with_callback("mousemove", on_mouse_move.as_ref().unchecked_ref())
            .map_err(|_| Error::listener_failed("mousemove"))?;
        canvas
            .add_event_listener_with_callback("mouseleave", on_mouse_leave.as_ref().unchecked_ref())
            .map_err(|_| Error::listener_failed("mouseleave"))?;
        canvas
            .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
            .map_err(|_| Error::listener_failed("click"))?;
        document
            .add_event_listener_with_callback(
                "pointerlockchange",
                on_pointer_lock_change.as_ref().unchecked_ref(),
            )
            .map_err(|_| Error::listener_failed("pointerlockchange"))?;

        log::debug!("attached keyboard and mouse listeners");

        Ok(Self {
            window,
            document,
            canvas: canvas.clone(),
            on_key_down,
            on_key_up,
            on_blur,
            on_mouse_move,
            on_mouse_leave,
            on_click,
            on_pointer_lock_change,
            state,
        })
    }

    /// Shared input state, written by the listeners.
    pub fn state(&self) -> &Rc<RefCell<InputState>> {
        &self.state
    }

    /// Removes all listeners owned by this handler.
    pub fn cleanup(&self) {
        let _ = self.window.remove_event_listener_with_callback(
            "keydown",
            self.on_key_down.as_ref().unchecked_ref(),
        );
        let _ = self.window.remove_event_listener_with_callback(
            "keyup",
            self.on_key_up.as_ref().unchecked_ref(),
        );
        let _ = self
            .window
            .remove_event_listener_with_callback("blur", self.on_blur.as_ref().unchecked_ref());
        let _ = self.canvas.remove_event_listener_with_callback(
            "mousemove",
            self.on_mouse_move.as_ref().unchecked_ref(),
        );
        let _ = self.canvas.remove_event_listener_with_callback(
            "mouseleave",
            self.on_mouse_leave.as_ref().unchecked_ref(),
        );
        let _ = self
            .canvas
            .remove_event_listener_with_callback("click", self.on_click.as_ref().unchecked_ref());
        let _ = self.document.remove_event_listener_with_callback(
            "pointerlockchange",
            self.on_pointer_lock_change.as_ref().unchecked_ref(),
        );

        if self.state.borrow().is_pointer_locked() {
            self.document.exit_pointer_lock();
        }
    }
}

fn keyboard_closure(
    state: Rc<RefCell<InputState>>,
    apply: fn(&mut InputState, &str),
) -> Closure<dyn FnMut(web_sys::KeyboardEvent)> {
    Closure::wrap(Box::new(move |event: web_sys::KeyboardEvent| {
        let code = event.code();
        if code == CLOSE_KEY || movement_for_key(&code).is_some() {
            event.prevent_default();
        }
        apply(&mut state.borrow_mut(), &code);
    }) as Box<dyn FnMut(_)>)
}

impl Drop for InputHandler {
    fn drop(&mut self) {
        self.cleanup();
    }
}

impl Debug for InputHandler {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "InputHandler {{ state: {:?} }}", self.state.borrow())
    }
}
