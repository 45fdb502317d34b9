//! 流程提交的 HTTP 接口
//!
//! 基于 hyper 1.x，每个连接一个任务：
//!
//! - `POST /api/flows`：提交流程，由 [`FlowRequestHandler`] 处理
//! - `GET /health`：存活检查
//!
//! [`FlowRequestHandler`]: crate::handler::FlowRequestHandler

mod response;
mod router;
mod server;

pub use router::{FLOWS_PATH, HEALTH_PATH, MAX_BODY_BYTES};
pub use server::{ApiServer, ServerConfig};
