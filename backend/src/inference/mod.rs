pub mod classifier;
pub mod preprocess;
pub mod provider;

pub use classifier::{Classifier, TorchClassifier};
pub use provider::ModelProvider;
