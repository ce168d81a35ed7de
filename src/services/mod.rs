pub mod metrics;
pub mod providers;
pub mod upload_store;

pub use metrics::{get_metrics, init_metrics};
pub use upload_store::{StoredUpload, UploadStore, UploadedImage};
