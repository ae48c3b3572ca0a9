pub mod label;
pub mod variants;

pub use label::Normalizer;
pub use variants::VariantGenerator;
