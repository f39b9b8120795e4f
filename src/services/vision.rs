use anyhow::Result;

/// Trait for vision-language calorie estimators (watsonx.ai in production,
/// mocks in tests). `Ok` carries the model's free-text answer.
#[async_trait::async_trait]
pub trait CalorieEstimator: Send + Sync {
    async fn estimate_calories(&self, image: &[u8], mime_type: &str) -> Result<String>;
}
