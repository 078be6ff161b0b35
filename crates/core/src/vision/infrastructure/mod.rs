pub mod moondream_client;
pub mod recorded_vision_model;
