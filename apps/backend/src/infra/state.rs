use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: SecurityConfig,
    database_url: Option<String>,
}

impl StateBuilder {
    pub fn new(security_config: SecurityConfig) -> Self {
        Self {
            security_config,
            database_url: None,
        }
    }

    pub fn with_db(mut self, database_url: impl Into<String>) -> Self {
        self.database_url = Some(database_url.into());
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        match self.database_url {
            Some(url) => {
                // single entrypoint: connect + migrate
                let conn = bootstrap_db(&url).await?;
                Ok(AppState::new(conn, self.security_config))
            }
            None => Ok(AppState::new_without_db(self.security_config)),
        }
    }
}

pub fn build_state(security_config: SecurityConfig) -> StateBuilder {
    StateBuilder::new(security_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::db::SQLITE_MEMORY_URL;

    #[tokio::test]
    async fn build_succeeds_without_db() {
        let state = build_state(SecurityConfig::for_tests()).build().await.unwrap();
        assert!(state.db().is_none());
    }

    #[tokio::test]
    async fn build_with_memory_db_attaches_connection() {
        let state = build_state(SecurityConfig::for_tests())
            .with_db(SQLITE_MEMORY_URL)
            .build()
            .await
            .unwrap();
        assert!(state.db().is_some());
    }
}
