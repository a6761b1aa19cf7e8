pub mod feeding;
pub mod mood;
pub mod sleep;
