pub mod health;
pub mod metrics;
pub mod upload;

pub use health::health_check;
pub use metrics::metrics_endpoint;
pub use upload::upload_image;
