pub mod loading;
pub mod query;
pub mod upload;

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::errors::AppError;

/// Runs `request` until it finishes or `token` is cancelled. A token that
/// is already cancelled wins over a ready request.
pub async fn cancellable<T, F>(token: &CancellationToken, request: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(AppError::Cancelled),
        result = request => result,
    }
}
