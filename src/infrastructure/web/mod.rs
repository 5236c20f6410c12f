pub mod envelope;
pub mod prediction_controller;
