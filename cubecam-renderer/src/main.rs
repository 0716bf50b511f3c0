use std::{cell::RefCell, rc::Rc};

use cubecam_renderer::{window_canvas_size, Error, Scene};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;
type SharedScene = Rc<RefCell<Option<Scene>>>;

fn main() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    if console_log::init_with_level(log::Level::Debug).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }

    if let Err(e) = run() {
        log::error!("{e}");
    }
}

fn run() -> Result<(), Error> {
    let window = web_sys::window().ok_or(Error::window_not_found())?;

    let mut scene = Scene::builder("#canvas").build()?;
    fit_to_window(&window, &mut scene);

    let scene: SharedScene = Rc::new(RefCell::new(Some(scene)));
    let on_resize = listen_for_resize(&window, scene.clone())?;
    start_animation_loop(window, scene, on_resize)
}

/// Sizes the canvas to the window's inner size.
fn fit_to_window(window: &web_sys::Window, scene: &mut Scene) {
    let inner = |size: Result<JsValue, JsValue>| size.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let (width, height) = window_canvas_size(inner(window.inner_width()), inner(window.inner_height()));
    scene.resize(width, height);
}

fn listen_for_resize(
    window: &web_sys::Window,
    scene: SharedScene,
) -> Result<Closure<dyn FnMut()>, Error> {
    let resize_window = window.clone();
    let on_resize = Closure::wrap(Box::new(move || {
        if let Some(scene) = scene.borrow_mut().as_mut() {
            fit_to_window(&resize_window, scene);
        }
    }) as Box<dyn FnMut()>);

    window
        .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
        .map_err(|_| Error::listener_failed("resize"))?;

    Ok(on_resize)
}

/// Renders a frame per `requestAnimationFrame` until Escape is pressed.
fn start_animation_loop(
    window: web_sys::Window,
    scene: SharedScene,
    on_resize: Closure<dyn FnMut()>,
) -> Result<(), Error> {
    let frame: FrameCallback = Rc::new(RefCell::new(None));
    let next_frame = frame.clone();
    let loop_window = window.clone();
    let mut on_resize = Some(on_resize);

    *frame.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let mut active = scene.borrow_mut();
        let Some(current) = active.as_mut() else { return };

        if current.should_close() {
            if let Some(listener) = on_resize.take() {
                let _ = loop_window.remove_event_listener_with_callback(
                    "resize",
                    listener.as_ref().unchecked_ref(),
                );
            }
            if let Some(closing) = active.take() {
                closing.shutdown();
            }
            // not rescheduled; the loop ends here
            return;
        }

        if let Err(e) = current.render_frame() {
            log::error!("failed to render frame: {e}");
        }

        if let Some(callback) = next_frame.borrow().as_ref() {
            if let Err(e) = loop_window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                log::error!("requestAnimationFrame failed: {e:?}");
            }
        }
    }) as Box<dyn FnMut()>));

    if let Some(callback) = frame.borrow().as_ref() {
        window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(|_| Error::Callback("requestAnimationFrame failed".into()))?;
    }

    log::info!("animation loop started");
    Ok(())
}
