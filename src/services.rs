use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::repositories::ApiError;

pub mod auth;
pub mod console;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("Not signed in. Run `pakads-admin login` first.")]
    Unauthenticated,
    #[error("Access denied: admin role required")]
    Forbidden,
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
    #[error("Communication error: {0} - {1}")]
    Communication(String, String),
}

#[async_trait]
pub trait RequestHandler<T>: Send + Sync + 'static
where
    T: Send + 'static,
{
    async fn handle_request(&self, request: T);
}

#[async_trait]
pub trait Service<T, H>: Send + Sync + 'static
where
    T: Send + 'static,
    H: RequestHandler<T> + Clone + Send,
{
    async fn run(&mut self, handler: H, receiver: &mut mpsc::Receiver<T>) {
        while let Some(request) = receiver.recv().await {
            let handler = handler.clone();

            tokio::spawn(async move {
                handler.handle_request(request).await;
            });
        }
    }
}
