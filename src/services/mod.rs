pub mod vision;
pub mod watsonx; // watsonx.ai chat client

pub use vision::CalorieEstimator;
pub use watsonx::WatsonxService;
