use serde_wasm_bindgen::from_value;
use wasm_bindgen::prelude::*;

use crate::{Error, Scene, SceneConfig};

/// JavaScript wrapper for the cube scene
#[wasm_bindgen]
#[derive(Debug)]
pub struct CubecamScene {
    scene: Option<Scene>,
}

#[wasm_bindgen]
impl CubecamScene {
    /// Create a new scene on the canvas matching `canvas_id`, optionally
    /// configured by a plain JS object shaped like `SceneConfig`.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, config: JsValue) -> Result<CubecamScene, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            SceneConfig::default()
        } else {
            from_value::<SceneConfig>(config)
                .map_err(|e| Error::deserialization_failed(e.to_string()))?
        };

        let scene = Scene::builder(canvas_id).config(config).build()?;
        Ok(CubecamScene { scene: Some(scene) })
    }

    /// Render one frame, applying the input received since the last one
    #[wasm_bindgen(js_name = "renderFrame")]
    pub fn render_frame(&mut self) -> Result<(), JsValue> {
        match self.scene.as_mut() {
            Some(scene) => Ok(scene.render_frame()?),
            None => Err(JsValue::from_str("scene has been disposed")),
        }
    }

    /// Resize the canvas and viewport
    #[wasm_bindgen]
    pub fn resize(&mut self, width: i32, height: i32) {
        if let Some(scene) = self.scene.as_mut() {
            scene.resize(width, height);
        }
    }

    /// Whether Escape has been pressed
    #[wasm_bindgen(js_name = "shouldClose")]
    pub fn should_close(&self) -> bool {
        self.scene.as_ref().is_none_or(Scene::should_close)
    }

    /// Shader diagnostics from building the cube program, one message each
    #[wasm_bindgen(js_name = "shaderDiagnostics")]
    pub fn shader_diagnostics(&self) -> Vec<String> {
        self.scene
            .as_ref()
            .map(|scene| scene.shader().diagnostics().iter().map(|d| d.to_string()).collect())
            .unwrap_or_default()
    }

    /// Release listeners and GPU resources; further frames are rejected
    #[wasm_bindgen]
    pub fn dispose(&mut self) {
        if let Some(scene) = self.scene.take() {
            scene.shutdown();
        }
    }
}

impl From<Error> for JsValue {
    fn from(val: Error) -> Self {
        JsValue::from_str(&val.to_string())
    }
}

/// Initialize the panic hook and console logging
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_ok() {
        log::info!("cubecam WASM module loaded");
    }
}
