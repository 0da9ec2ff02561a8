use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct EsgMetric {
    pub id: Uuid,
    pub user_id: Uuid,
    pub environmental_score: Option<f64>,
    pub social_score: Option<f64>,
    pub governance_score: Option<f64>,
    pub metric_date: NaiveDate,
}
