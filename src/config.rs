use crate::models::UnknownNamePolicy;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub calculation: CalculationConfig,
    pub table: TableConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 单次请求上传上限 (字节)
    pub max_upload_bytes: usize,
}

/// 计算参数默认值 (请求中未给出时使用)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationConfig {
    pub default_safety_factor: f64,
    pub unknown_name_policy: UnknownNamePolicy,
}

/// 表格列名与分隔符
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    pub delimiter: char,
    pub article_id_column: String,
    pub article_name_column: String,
    pub stock_column: String,
    pub promo_quantity_column: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            default_safety_factor: 0.1,
            unknown_name_policy: UnknownNamePolicy::default(),
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            article_id_column: "Artikelnummer".to_string(),
            article_name_column: "Artikelname".to_string(),
            stock_column: "Bestand Vortag in Stück (ST)".to_string(),
            promo_quantity_column: "Menge Aktion".to_string(),
        }
    }
}

impl AppConfig {
    /// 加载配置: 内置默认值 -> 可选 config.toml -> 环境变量
    ///
    /// 环境变量格式: 前缀后单下划线, 层级之间双下划线, 如 `REORDER_SERVER__PORT=9000`
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    pub fn load_from(file_stem: &str) -> Result<Self, ConfigError> {
        Self::load_with(file_stem, environment())
    }

    fn load_with(file_stem: &str, env: Environment) -> Result<Self, ConfigError> {
        let defaults = Config::try_from(&AppConfig::default())?;

        Config::builder()
            .add_source(defaults)
            .add_source(File::with_name(file_stem).required(false))
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("REORDER")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl TableConfig {
    /// csv 只接受单字节分隔符, 非 ASCII 时退回逗号
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            tracing::warn!("Delimiter {:?} is not ASCII, falling back to ','", self.delimiter);
            b','
        }
    }
}
