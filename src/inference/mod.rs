pub mod artifacts;
pub mod encoder;
pub mod label_decoder;
pub mod normalizer;
pub mod prediction;
pub mod predictor;

pub use artifacts::ModelArtifacts;
pub use encoder::{encode, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use label_decoder::LabelEncoder;
pub use normalizer::Scaler;
pub use prediction::NutrientPrediction;
pub use predictor::{DenseNetwork, Predictor, PredictorError, RawPrediction};
