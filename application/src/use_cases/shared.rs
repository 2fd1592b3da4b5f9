//! Shared utilities for use cases.

use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
///
/// Returns `Err(())` if the token exists and is cancelled; callers map
/// the unit error onto their own cancellation variant.
pub(crate) fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), ()> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(());
    }
    Ok(())
}
