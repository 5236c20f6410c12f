pub mod predict_annotations;
