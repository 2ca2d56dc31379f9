use std::fs;
use std::net::SocketAddr;

use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/config.json";
const AUTO_UP: &str = "AUTO_UP";

#[derive(Debug, Deserialize)]
struct StorageConfig {
    dsn: String,
}

#[derive(Debug, Deserialize)]
struct JwtConfig {
    key: String,
    access_ttl: String,
    refresh_ttl: String,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    port: u16,
    #[serde(default)]
    https: bool,
    storage: StorageConfig,
    jwt: JwtConfig,
}

/// Process configuration, loaded from the JSON file at `--config`
/// (default `config/config.json`), mirroring
/// `examples/original_source/internal/lib/config.go`'s `FromJSON` loader.
#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub https: bool,
    pub database_url: String,
    pub jwt_key: Vec<u8>,
    pub access_ttl: String,
    pub refresh_ttl: String,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path_from_args();
        Self::from_file(&path)
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("can't open {path}: {e}"))?;

        let raw: RawConfig = serde_json::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("can't parse {path}: {e}"))?;

        if raw.storage.dsn == AUTO_UP {
            anyhow::bail!(
                "storage.dsn=AUTO_UP requests ephemeral provisioning, which this build does not \
                 implement; point storage.dsn at a real Postgres instance"
            );
        }

        let addr: SocketAddr = format!("0.0.0.0:{}", raw.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid port {}: {e}", raw.port))?;

        Ok(Self {
            addr,
            https: raw.https,
            database_url: raw.storage.dsn,
            jwt_key: raw.jwt.key.into_bytes(),
            access_ttl: raw.jwt.access_ttl,
            refresh_ttl: raw.jwt.refresh_ttl,
        })
    }
}

/// Parses a single `-config=path` / `--config path` flag, falling back to
/// the default path. Deliberately minimal: this is the one flag the
/// original service recognizes (`config/config.go`'s `flag.String`).
fn config_path_from_args() -> String {
    let args: Vec<String> = std::env::args().collect();

    for (i, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix("-config=") {
            return value.to_string();
        }
        if let Some(value) = arg.strip_prefix("--config=") {
            return value.to_string();
        }
        if (arg == "-config" || arg == "--config") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }

    DEFAULT_CONFIG_PATH.to_string()
}
