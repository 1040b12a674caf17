use harvest_infra::output::ErrorLog;
use harvest_infra::reddit::RedditSession;

use crate::config::AppConfig;

pub struct AppState {
    pub config: AppConfig,
    pub session: RedditSession,
    pub error_log: ErrorLog,
}
