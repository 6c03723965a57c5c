use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::learning_plan::generator::PlanGenerator;
use crate::learning_plan::store::PlanStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    pub config: Config,
    /// Plan persistence. Postgres in production.
    pub plans: Arc<dyn PlanStore>,
    /// Provider chosen once at startup; see `ProviderKind::select`.
    pub generator: PlanGenerator,
}
