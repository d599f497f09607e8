pub mod traits;
pub mod sequential_sampler;
pub mod shuffled_sampler;

pub use traits::Sampler;
pub use sequential_sampler::SequentialSampler;
pub use shuffled_sampler::ShuffledSampler;
