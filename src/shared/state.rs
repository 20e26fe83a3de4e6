use crate::config::AppConfig;
use crate::shared::db::Database;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: Database,
}
