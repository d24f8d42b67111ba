//! MySQL camera directory
//!
//! Opens one connection per listing, runs a read-only query over the
//! `cameras` table and closes the connection before returning.

use contracts::{CameraDirectory, CameraRecord, ContractError, DatabaseConfig};
use sqlx::mysql::MySqlConnectOptions;
use sqlx::{Connection, MySqlConnection};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Active cameras, every column read as text (the tenant column may be numeric)
pub const ACTIVE_CAMERAS_QUERY: &str = "SELECT CAST(`zsk_db` AS CHAR), \
     CAST(`name_camera` AS CHAR), CAST(`rtsp_link` AS CHAR) \
     FROM `cameras` WHERE `active` = 1";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Camera directory backed by a MySQL/MariaDB `cameras` table.
pub struct MySqlDirectory {
    options: MySqlConnectOptions,
    host: String,
    database: String,
}

impl MySqlDirectory {
    pub fn new(config: &DatabaseConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name)
            .charset(&config.charset);

        Self {
            options,
            host: format!("{}:{}", config.host, config.port),
            database: config.name.clone(),
        }
    }

    async fn connect(&self) -> Result<MySqlConnection, ContractError> {
        let connect = MySqlConnection::connect_with(&self.options);
        match tokio::time::timeout(CONNECT_TIMEOUT, connect).await {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => Err(ContractError::directory_unavailable(format!(
                "connect to {} failed: {e}",
                self.host
            ))),
            Err(_) => Err(ContractError::directory_unavailable(format!(
                "connect to {} timed out after {}s",
                self.host,
                CONNECT_TIMEOUT.as_secs()
            ))),
        }
    }
}

impl CameraDirectory for MySqlDirectory {
    fn name(&self) -> &str {
        "mysql"
    }

    #[instrument(
        name = "mysql_list_active_cameras",
        skip(self),
        fields(host = %self.host, database = %self.database)
    )]
    async fn list_active_cameras(&self) -> Result<Vec<CameraRecord>, ContractError> {
        let mut conn = self.connect().await?;

        let rows = sqlx::query_as::<_, (Option<String>, Option<String>, Option<String>)>(
            ACTIVE_CAMERAS_QUERY,
        )
        .fetch_all(&mut conn)
        .await;

        if let Err(e) = conn.close().await {
            warn!(error = %e, "Failed to close directory connection cleanly");
        }

        let rows = rows.map_err(|e| {
            ContractError::directory_unavailable(format!("camera query failed: {e}"))
        })?;

        debug!(rows = rows.len(), "Directory query returned");

        // NULL columns map to "" and are rejected when the task is resolved.
        Ok(rows
            .into_iter()
            .map(|(tenant, name, uri)| {
                CameraRecord::new(
                    tenant.unwrap_or_default(),
                    name.unwrap_or_default(),
                    uri.unwrap_or_default(),
                )
            })
            .collect())
    }
}
