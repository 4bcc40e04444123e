pub mod atlas_pipeline;
