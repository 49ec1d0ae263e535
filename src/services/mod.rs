pub mod clinic_resolution;
