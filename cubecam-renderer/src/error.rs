/// Error categories.
///
/// Shader compile and link problems are not errors; they are collected as
/// [`ShaderDiagnostic`](crate::ShaderDiagnostic)s on the program instead.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Failed to initialize WebGL context or retrieve DOM elements.
    #[error("Initialization error: {0}")]
    Initialization(String),

    /// The shader program is missing or unusable.
    #[error("Shader error: {0}")]
    Shader(String),

    /// WebGL resource creation or management errors.
    #[error("Resource error: {0}")]
    Resource(String),

    /// Configuration loading or validation errors.
    #[error("Data error: {0}")]
    Data(String),

    /// Event listener errors, related to keyboard and mouse input handling.
    #[error("Event listener error: {0}")]
    Callback(String),
}

impl Error {
    // Initialization errors
    pub fn window_not_found() -> Self {
        Self::Initialization("Unable to retrieve window".to_string())
    }

    pub fn document_not_found() -> Self {
        Self::Initialization("Unable to retrieve document".to_string())
    }

    pub fn canvas_not_found() -> Self {
        Self::Initialization("Unable to retrieve canvas".to_string())
    }

    pub fn webgl_context_failed() -> Self {
        Self::Initialization("Failed to retrieve WebGL2 rendering context".to_string())
    }

    // Shader errors
    pub fn shader_program_unusable(detail: &str) -> Self {
        Self::Shader(format!("Shader program unusable: {detail}"))
    }

    // Resource errors
    pub fn buffer_creation_failed(buffer_type: &str) -> Self {
        Self::Resource(format!("Failed to create {buffer_type} buffer"))
    }

    pub fn vertex_array_creation_failed() -> Self {
        Self::Resource("Failed to create vertex array object".to_string())
    }

    // Data errors
    pub fn invalid_config(detail: &str) -> Self {
        Self::Data(format!("Invalid configuration: {detail}"))
    }

    pub fn deserialization_failed(message: String) -> Self {
        Self::Data(format!("Failed to deserialize: {message}"))
    }

    // Callback errors
    pub fn listener_failed(event: &str) -> Self {
        Self::Callback(format!("Failed to add {event} listener"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_include_category() {
        assert_eq!(
            Error::canvas_not_found().to_string(),
            "Initialization error: Unable to retrieve canvas"
        );
        assert_eq!(
            Error::buffer_creation_failed("cube-vbo").to_string(),
            "Resource error: Failed to create cube-vbo buffer"
        );
        assert_eq!(
            Error::invalid_config("far plane").to_string(),
            "Data error: Invalid configuration: far plane"
        );
    }
}
