// Pipeline processing: schema adaptation and normalization

pub mod adapters;
pub mod normalize;
