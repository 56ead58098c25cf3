//! 服务器配置
//!
//! # 环境变量
//!
//! 所有配置项都可以通过环境变量覆盖：
//!
//! | 环境变量 | 默认值 | 说明 |
//! |----------|--------|------|
//! | WORK_DIR | /var/lib/saffron | 工作目录 |
//! | HTTP_PORT | 3000 | HTTP 服务端口 |
//! | ENVIRONMENT | development | 运行环境 |
//! | RESERVATION_CONFLICT_POLICY | interval_overlap | 预约冲突策略 (interval_overlap \| fixed_window) |
//! | RESERVATION_CONFLICT_WINDOW_MINUTES | 120 | fixed_window 策略的邻近阈值 |
//! | RESERVATION_DEFAULT_DURATION_MINUTES | 120 | 预约默认时长 |
//!
//! # 示例
//!
//! ```ignore
//! WORK_DIR=/data/saffron HTTP_PORT=8080 cargo run
//! ```

use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::reservations::ConflictPolicy;

/// 预约相关配置
#[derive(Debug, Clone)]
pub struct ReservationSettings {
    /// 冲突判定策略，默认真实区间重叠
    pub conflict_policy: ConflictPolicy,
    /// fixed_window 策略下的邻近阈值 (分钟)
    pub conflict_window_minutes: i64,
    /// 未指定时长时的默认预约时长 (分钟)
    pub default_duration_minutes: i64,
}

/// 服务器配置
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 预约配置
    pub reservations: ReservationSettings,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let conflict_policy = std::env::var("RESERVATION_CONFLICT_POLICY")
            .ok()
            .and_then(|v| ConflictPolicy::parse(&v))
            .unwrap_or(ConflictPolicy::IntervalOverlap);

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/saffron".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            reservations: ReservationSettings {
                conflict_policy,
                conflict_window_minutes: std::env::var("RESERVATION_CONFLICT_WINDOW_MINUTES")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(120),
                default_duration_minutes: std::env::var("RESERVATION_DEFAULT_DURATION_MINUTES")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(120),
            },
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// 数据库目录
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 日志目录
    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
