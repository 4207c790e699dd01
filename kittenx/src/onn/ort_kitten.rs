use ndarray::{Array1, Array2, ArrayD, Axis, Ix1, Ix2};
use ort::execution_providers::ExecutionProviderDispatch;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use parking_lot::Mutex;
use std::path::Path;

#[cfg(feature = "cuda")]
use ort::execution_providers::CUDAExecutionProvider;
#[cfg(feature = "coreml")]
use ort::execution_providers::CoreMLExecutionProvider;

use crate::error::{TtsError, TtsResult};

/// ONNX session for the KittenTTS nano acoustic model.
///
/// Inputs: `input_ids` (i64, [1, T]), `style` (f32, [1, 256]),
/// `speed` (f32, [1]). Outputs: `waveform` (f32) and `duration` (i64);
/// only the waveform is consumed here.
pub struct OrtKitten {
    session: Mutex<Session>,
}

impl OrtKitten {
    pub fn from_file(model_path: &Path) -> TtsResult<Self> {
        let mut builder = Session::builder()
            .map_err(|e| TtsError::ModelLoad(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| TtsError::ModelLoad(e.to_string()))?;

        let providers = Self::execution_providers();
        if !providers.is_empty() {
            builder = builder
                .with_execution_providers(providers)
                .map_err(|e| TtsError::ModelLoad(e.to_string()))?;
        }

        let session = builder
            .commit_from_file(model_path)
            .map_err(|e| TtsError::ModelLoad(e.to_string()))?;

        Ok(Self {
            session: Mutex::new(session),
        })
    }

    /// Run one inference step. `tokens` must already carry the pad ids at
    /// both ends.
    pub fn infer(&self, tokens: Vec<i64>, style: Array2<f32>, speed: f32) -> TtsResult<Array1<f32>> {
        let len = tokens.len();
        let input_ids = Array2::from_shape_vec((1, len), tokens)
            .map_err(|e| TtsError::Synthesis(e.to_string()))?;
        let input_tensor =
            Tensor::from_array(input_ids).map_err(|e| TtsError::Synthesis(e.to_string()))?;
        let style_tensor =
            Tensor::from_array(style).map_err(|e| TtsError::Synthesis(e.to_string()))?;
        let speed_tensor = Tensor::from_array(Array1::from_vec(vec![speed]))
            .map_err(|e| TtsError::Synthesis(e.to_string()))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_tensor,
                "style" => style_tensor,
                "speed" => speed_tensor
            ])
            .map_err(|e| TtsError::Synthesis(e.to_string()))?;

        let waveform: ArrayD<f32> = outputs["waveform"]
            .try_extract_array::<f32>()
            .map_err(|e| TtsError::Synthesis(e.to_string()))?
            .to_owned();

        match waveform.ndim() {
            1 => waveform
                .into_dimensionality::<Ix1>()
                .map_err(|e| TtsError::Synthesis(e.to_string())),
            2 => waveform
                .into_dimensionality::<Ix2>()
                .map(|a| a.index_axis(Axis(0), 0).to_owned())
                .map_err(|e| TtsError::Synthesis(e.to_string())),
            _ => Err(TtsError::Synthesis(
                "unexpected waveform tensor rank".to_string(),
            )),
        }
    }

    fn execution_providers() -> Vec<ExecutionProviderDispatch> {
        #[allow(unused_mut)]
        let mut providers = Vec::new();
        #[cfg(feature = "cuda")]
        providers.push(CUDAExecutionProvider::default().build());
        #[cfg(feature = "coreml")]
        providers.push(CoreMLExecutionProvider::default().build());
        providers
    }
}
