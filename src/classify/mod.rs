pub mod classifier;
pub mod tier;

pub use classifier::{ClassifiedCombo, StrengthClassifier};
pub use tier::StrengthTier;
