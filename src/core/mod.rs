pub mod builder;
pub mod emit;
pub mod etl;
pub mod extract;
pub mod geometry;

pub use crate::domain::model::{Atlas, BuildOutcome, RawAtlas};
pub use crate::domain::ports::{ConfigProvider, FrameExtractor, Pipeline, Storage};
pub use crate::utils::error::Result;
