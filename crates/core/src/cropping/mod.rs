pub mod crop_normalizer;
