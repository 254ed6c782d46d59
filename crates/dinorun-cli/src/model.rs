pub mod trained_model;
