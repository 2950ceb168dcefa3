use async_trait::async_trait;

use crate::{compose::AnalysisRequest, error::Result, types::ViralityReport};

/// The external analysis function: a composed request in, a validated report
/// out. Any failure, including a schema violation, is an `Err`.
#[async_trait]
pub trait AnalysisBackend: Send + Sync + 'static {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<ViralityReport>;
}
