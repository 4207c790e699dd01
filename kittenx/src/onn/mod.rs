pub mod ort_kitten;

/// Initialize ONNX Runtime. Must run before any session is built when the
/// `load-dynamic` feature is active: CUDA builds locate `libonnxruntime.so`
/// either through the `ORT_DYLIB_PATH` environment variable or through the
/// explicit path passed here.
#[cfg(feature = "cuda")]
pub fn init_ort(dylib_path: Option<&str>) -> Result<(), String> {
    match dylib_path {
        Some(path) => {
            let builder = ort::init_from(path)
                .map_err(|e| format!("Failed to load ort from {}: {}", path, e))?;
            if !builder.commit() {
                return Err("Failed to commit ort environment (already initialized?)".to_string());
            }
            Ok(())
        }
        None if std::env::var("ORT_DYLIB_PATH").is_ok() => {
            // ort picks the dylib up from the environment on its own
            if !ort::init().commit() {
                eprintln!("Note: ONNX Runtime environment was already initialized");
            }
            Ok(())
        }
        None => Err(
            "CUDA builds need ORT_DYLIB_PATH (or an explicit dylib path) pointing at \
             libonnxruntime.so from the onnxruntime GPU release"
                .to_string(),
        ),
    }
}

/// No-op for non-CUDA builds, which ship their own ONNX Runtime binaries.
#[cfg(not(feature = "cuda"))]
pub fn init_ort(_dylib_path: Option<&str>) -> Result<(), String> {
    Ok(())
}
