pub mod app_orchestrator;
pub mod extraction_pipeline;
pub mod region_definition;
