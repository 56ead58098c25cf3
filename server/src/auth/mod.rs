//! 认证模块
//!
//! JWT 验证、角色中间件和资源归属判定。令牌签发属于外部系统。

pub mod jwt;
pub mod middleware;
pub mod policy;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService, Role};
pub use middleware::{require_auth, require_staff};
pub use policy::can_manage_resource;
