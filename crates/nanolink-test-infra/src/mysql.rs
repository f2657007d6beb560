use crate::Result;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::ImageExt;
use testcontainers::{ContainerAsync, GenericImage};
use typed_builder::TypedBuilder;

const MYSQL_IMAGE: &str = "mysql";
const MYSQL_PORT: u16 = 3306;

/// Settings of the disposable MySQL server.
#[derive(Debug, Clone, TypedBuilder)]
pub struct MysqlConfig {
    #[builder(default = "8.4".to_string(), setter(into))]
    tag: String,
    #[builder(default = "nanolink".to_string(), setter(into))]
    database: String,
    #[builder(default = "nanolink".to_string(), setter(into))]
    username: String,
    #[builder(default = "nanolink".to_string(), setter(into))]
    password: String,
    #[builder(default = "root".to_string(), setter(into))]
    root_password: String,
}

impl Default for MysqlConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A MySQL container with its connection address resolved.
///
/// The server starts with a utf8mb4 default charset so `original_url`
/// round-trips arbitrary text; the `short_links` migration picks its own
/// collation for the code column. The container is removed on drop.
pub struct MySqlServer {
    _container: ContainerAsync<GenericImage>,
    config: MysqlConfig,
    host: String,
    port: u16,
}

impl MySqlServer {
    /// Starts a server with [`MysqlConfig::default`].
    pub async fn start() -> Result<Self> {
        Self::new(MysqlConfig::default()).await
    }

    pub async fn new(config: MysqlConfig) -> Result<Self> {
        let container = GenericImage::new(MYSQL_IMAGE, config.tag.as_str())
            .with_exposed_port(MYSQL_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stderr("ready for connections"))
            .with_env_var("MYSQL_DATABASE", config.database.as_str())
            .with_env_var("MYSQL_USER", config.username.as_str())
            .with_env_var("MYSQL_PASSWORD", config.password.as_str())
            .with_env_var("MYSQL_ROOT_PASSWORD", config.root_password.as_str())
            .with_cmd([
                "--character-set-server=utf8mb4",
                "--skip-name-resolve",
            ])
            .start()
            .await?;

        // "ready for connections" is also printed by the init-time server,
        // so callers should still retry their first connection.
        let host = container.get_host().await?.to_string();
        let port = container.get_host_port_ipv4(MYSQL_PORT).await?;

        Ok(Self {
            _container: container,
            config,
            host,
            port,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `mysql://` URL for the application user, suitable for `DATABASE_URL`.
    pub fn database_url(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            self.config.username, self.config.password, self.host, self.port, self.config.database
        )
    }
}
