pub mod dispatch;
pub mod envelope;
pub mod errors;
pub mod models;
pub mod normalize;
pub mod policy;
pub mod providers;
