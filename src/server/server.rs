//! 服务器启动与连接处理

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use super::router;
use crate::config::env::{EnvConfig, HOST_VAR, PORT_VAR};
use crate::error::{FlowBuilderError, Result};
use crate::handler::FlowRequestHandler;

/// HTTP 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// 读取 `FLOW_BUILDER_HOST` / `FLOW_BUILDER_PORT`，缺失时使用默认值
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            host: EnvConfig::get_env_optional(HOST_VAR).unwrap_or(defaults.host),
            port: EnvConfig::get_env_parsed(PORT_VAR)?.unwrap_or(defaults.port),
        })
    }

    /// 主机名交给 tokio 解析，无法解析时绑定失败
    pub fn bind_target(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// [`FlowRequestHandler`] 的 HTTP 前端
pub struct ApiServer {
    handler: Arc<FlowRequestHandler>,
    listener: TcpListener,
    shutdown_tx: Option<oneshot::Sender<()>>,
    shutdown_rx: Option<oneshot::Receiver<()>>,
}

impl ApiServer {
    /// 绑定监听端口，端口 0 表示随机分配
    pub async fn bind(config: &ServerConfig, handler: FlowRequestHandler) -> Result<Self> {
        let listener = TcpListener::bind(config.bind_target()).await.map_err(|e| {
            FlowBuilderError::Http(format!("failed to bind {}:{}: {e}", config.host, config.port))
        })?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        Ok(Self {
            handler: Arc::new(handler),
            listener,
            shutdown_tx: Some(shutdown_tx),
            shutdown_rx: Some(shutdown_rx),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// 取出用于停止 [`ApiServer::run`] 的发送端
    pub fn shutdown_handle(&mut self) -> Option<oneshot::Sender<()>> {
        self.shutdown_tx.take()
    }

    /// 运行直到收到关闭信号
    pub async fn run(mut self) -> Result<()> {
        let mut shutdown_rx = match self.shutdown_rx.take() {
            Some(rx) => rx,
            None => return Ok(()),
        };

        tracing::info!(addr = %self.local_addr()?, "API server started");

        loop {
            tokio::select! {
                result = self.listener.accept() => {
                    let (stream, remote_addr) = match result {
                        Ok(accepted) => accepted,
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to accept connection");
                            continue;
                        }
                    };

                    let io = TokioIo::new(stream);
                    let handler = Arc::clone(&self.handler);

                    tokio::spawn(async move {
                        let service = service_fn(move |req| {
                            let handler = Arc::clone(&handler);
                            async move { router::route(req, handler).await }
                        });

                        if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                            if !e.is_incomplete_message() {
                                tracing::warn!(
                                    remote = %remote_addr,
                                    error = %e,
                                    "HTTP connection error"
                                );
                            }
                        }
                    });
                }
                _ = &mut shutdown_rx => {
                    tracing::info!("API server shutting down");
                    break;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn server_config_bind_target() {
        let config = ServerConfig::new("0.0.0.0", 9000);
        assert_eq!(config.bind_target(), ("0.0.0.0", 9000));
    }

    #[tokio::test]
    async fn unresolvable_host_fails_to_bind() {
        let config = ServerConfig::new("my-host.invalid", 0);
        let handler = FlowRequestHandler::new(
            crate::config::FlowServiceConfig::with_api_key("pk_test"),
            Arc::new(crate::klaviyo::RecordingFlowsApi::new()),
        );

        let result = ApiServer::bind(&config, handler).await;
        assert!(matches!(result, Err(FlowBuilderError::Http(_))));
    }
}
