//! Recovery boundary wrapped around every service operation.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use opencart_core::error::CoreError;
use opencart_db::StoreError;
use tokio_util::sync::CancellationToken;

use crate::ServiceResult;

/// Run `operation` to completion unless `cancel` fires first.
///
/// A panic inside the operation is logged and becomes
/// [`CoreError::Unexpected`]; cancellation drops the in-flight store call and
/// becomes [`CoreError::Cancelled`].
pub(crate) async fn guarded<T, F>(
    operation: &'static str,
    user_id: &str,
    cancel: &CancellationToken,
    fut: F,
) -> ServiceResult<T>
where
    F: Future<Output = ServiceResult<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::warn!(operation, user_id, "Operation cancelled");
            Err(CoreError::Cancelled)
        }
        result = recover(operation, user_id, fut) => result,
    }
}

/// Catch a panic raised while polling `fut`.
pub(crate) async fn recover<T, F>(operation: &'static str, user_id: &str, fut: F) -> ServiceResult<T>
where
    F: Future<Output = ServiceResult<T>>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => {
            tracing::error!(
                operation,
                user_id,
                panic = %panic_message(payload.as_ref()),
                "Operation panicked",
            );
            Err(CoreError::unexpected())
        }
    }
}

/// Log a store failure with its context and hide the detail from the caller.
pub(crate) fn store_failure(operation: &'static str, user_id: &str, err: StoreError) -> CoreError {
    tracing::error!(operation, user_id, error = %err, "Store call failed");
    CoreError::unexpected()
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_through_result() {
        let cancel = CancellationToken::new();
        let result = guarded("op", "u", &cancel, async { Ok::<_, CoreError>(7) }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn panic_becomes_unexpected() {
        let cancel = CancellationToken::new();
        let result: ServiceResult<()> =
            guarded("op", "u", &cancel, async {
                if should_panic() {
                    panic!("boom");
                }
                Ok(())
            })
            .await;
        assert_eq!(result, Err(CoreError::unexpected()));
    }

    #[tokio::test]
    async fn cancelled_token_wins() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = guarded("op", "u", &cancel, std::future::pending::<ServiceResult<()>>()).await;
        assert_eq!(result, Err(CoreError::Cancelled));
    }

    fn should_panic() -> bool {
        true
    }

    #[test]
    fn extracts_panic_messages() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(owned.as_ref()), "owned");
        let borrowed: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(borrowed.as_ref()), "static");
    }
}
