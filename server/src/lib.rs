//! Saffron Server - 餐饮零售在线点单后端
//!
//! # 架构概述
//!
//! 核心是跨实体的事务性业务逻辑：下单时的库存扣减与优惠码核销
//! (带补偿回滚)，以及桌台预约的冲突检测与状态机联动。
//!
//! # 模块结构
//!
//! ```text
//! server/src/
//! ├── core/          # 配置、状态、HTTP 服务器
//! ├── auth/          # JWT 验证、角色中间件、归属判定
//! ├── db/            # 嵌入式 SurrealDB、模型、repository
//! ├── stock.rs       # 库存台账 (原子扣减/回补)
//! ├── promotions/    # 优惠码引擎与折扣计算
//! ├── orders/        # 订单状态机与结账编排
//! ├── reservations/  # 预约排期与桌台状态机
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误、日志、时间工具
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod promotions;
pub mod reservations;
pub mod stock;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService, Role};
pub use core::{Config, Server, ServerState};
pub use orders::OrderService;
pub use promotions::PromotionEngine;
pub use reservations::{ReservationScheduler, TableStateMachine};
pub use stock::StockLedger;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
            __  __
  ___ __ _ / _|/ _|_ __ ___  _ __
 / __/ _` | |_| |_| '__/ _ \| '_ \
 \__ \ (_| |  _|  _| | | (_) | | | |
 |___/\__,_|_| |_| |_|  \___/|_| |_|
    "#
    );
}
