use shared::Prediction;
use std::path::Path;
use std::sync::Mutex;
use tch::{CModule, Device, Kind, Tensor};

use super::preprocess::{self, Preprocessing};
use crate::config::{DeviceChoice, ModelConfig};
use crate::error::InferenceError;

/// Anything that turns encoded image bytes into ranked predictions.
pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;

    /// Returns at most `top_k` predictions, descending by probability.
    fn classify(&self, image: &[u8]) -> Result<Vec<Prediction>, InferenceError>;
}

/// TorchScript image classifier (an ImageNet MobileNetV2 export by default).
pub struct TorchClassifier {
    name: String,
    module: Mutex<CModule>,
    device: Device,
    labels: Vec<String>,
    preprocessing: Preprocessing,
    top_k: usize,
}

impl TorchClassifier {
    pub fn load(config: &ModelConfig) -> Result<Self, InferenceError> {
        let device = match config.device {
            DeviceChoice::Auto => Device::cuda_if_available(),
            DeviceChoice::Cpu => Device::Cpu,
            DeviceChoice::Cuda => Device::Cuda(0),
        };
        let labels = read_labels(&config.labels_path)?;
        let mut module = CModule::load_on_device(&config.model_path, device)?;
        module.set_eval();

        log::info!(
            "Loaded {} from {} on {:?} with {} labels",
            config.name,
            config.model_path.display(),
            device,
            labels.len()
        );

        Ok(Self {
            name: config.name.clone(),
            module: Mutex::new(module),
            device,
            labels,
            preprocessing: Preprocessing::from(config),
            top_k: config.top_k,
        })
    }

    fn probabilities(&self, input: Tensor) -> Result<Vec<f32>, InferenceError> {
        let module = self
            .module
            .lock()
            .map_err(|_| InferenceError::ModelLock)?;
        let logits = tch::no_grad(|| module.forward_ts(&[input]))?;
        let probabilities = logits
            .softmax(-1, Kind::Float)
            .view([-1])
            .to_device(Device::Cpu);
        Ok(Vec::<f32>::try_from(&probabilities)?)
    }
}

impl Classifier for TorchClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn classify(&self, image: &[u8]) -> Result<Vec<Prediction>, InferenceError> {
        let decoded = preprocess::decode(image)?;
        let input = preprocess::to_input(&decoded, &self.preprocessing);
        let (n, c, h, w) = input.dim();
        let data = input
            .as_slice()
            .ok_or_else(|| InferenceError::Preprocessing("input is not contiguous".into()))?;

        let tensor = Tensor::from_slice(data)
            .view([n as i64, c as i64, h as i64, w as i64])
            .to_device(self.device);

        let probabilities = self.probabilities(tensor)?;
        let predictions = top_predictions(&probabilities, &self.labels, self.top_k);
        if predictions.is_empty() && !probabilities.is_empty() {
            return Err(InferenceError::Preprocessing(
                "model output contains no finite probabilities".into(),
            ));
        }
        Ok(predictions)
    }
}

fn read_labels(path: &Path) -> Result<Vec<String>, InferenceError> {
    let text = std::fs::read_to_string(path).map_err(|source| InferenceError::Labels {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_labels(&text))
}

/// One label per line; line index is the class index. Blank lines are skipped.
pub fn parse_labels(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Picks the `k` most probable classes, highest first. NaN and infinite
/// entries are never ranked.
pub fn top_predictions(probabilities: &[f32], labels: &[String], k: usize) -> Vec<Prediction> {
    let mut ranked: Vec<(usize, f32)> = probabilities
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, p)| p.is_finite())
        .collect();
    ranked.sort_by(|(_, a), (_, b)| b.total_cmp(a));

    ranked
        .into_iter()
        .take(k)
        .map(|(index, probability)| {
            let label = labels
                .get(index)
                .cloned()
                .unwrap_or_else(|| format!("class {}", index));
            Prediction::new(label, probability as f64)
        })
        .collect()
}
