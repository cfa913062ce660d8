use ort::execution_providers::ExecutionProviderDispatch;

/// Hardware execution providers to register on a detector session.
///
/// ONNX Runtime silently falls back to CPU when a listed provider cannot be
/// initialised, so an empty list simply means CPU inference.
pub fn preferred_execution_providers() -> Vec<ExecutionProviderDispatch> {
    #[cfg(target_os = "macos")]
    {
        vec![ort::execution_providers::CoreMLExecutionProvider::default().build()]
    }
    #[cfg(target_os = "windows")]
    {
        vec![ort::execution_providers::DirectMLExecutionProvider::default().build()]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        vec![]
    }
}
