use shared::{
    domain::{EnumMappingError, OrderStatus},
    errors::ServiceError,
};
use std::{future::Future, time::Duration};
use tokio::{sync::oneshot, task::JoinHandle, time::timeout};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderStatusChange {
    pub order_id: String,
    pub status: OrderStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum OrderClientError {
    #[error("Order service call failed: {0}")]
    Transport(ServiceError),

    #[error("Order service applied {returned:?} instead of {requested:?}")]
    StatusMismatch {
        requested: OrderStatus,
        returned: OrderStatus,
    },

    #[error("Order service did not answer within {0:?}")]
    DeadlineExceeded(Duration),

    #[error("Order service reply carried no order")]
    MissingData,

    #[error("Order status task ended without a reply")]
    Abandoned,

    #[error(transparent)]
    UnknownStatus(#[from] EnumMappingError),
}

pub type OrderUpdateResult = Result<OrderStatusChange, OrderClientError>;

/// Handle to an order status change running on its own task.
///
/// The task sends exactly one result through a oneshot channel. Dropping the
/// handle aborts the task, which drops the in-flight RPC future with it.
#[derive(Debug)]
pub struct PendingOrderUpdate {
    reply: oneshot::Receiver<OrderUpdateResult>,
    task: JoinHandle<()>,
}

impl PendingOrderUpdate {
    pub fn spawn<F>(deadline: Duration, call: F) -> Self
    where
        F: Future<Output = OrderUpdateResult> + Send + 'static,
    {
        let (tx, reply) = oneshot::channel();

        let task = tokio::spawn(async move {
            let result = match timeout(deadline, call).await {
                Ok(result) => result,
                Err(_) => Err(OrderClientError::DeadlineExceeded(deadline)),
            };
            let _ = tx.send(result);
        });

        Self { reply, task }
    }

    pub async fn wait(mut self) -> OrderUpdateResult {
        (&mut self.reply)
            .await
            .unwrap_or_else(|_| Err(OrderClientError::Abandoned))
    }
}

impl Drop for PendingOrderUpdate {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    };

    struct SetOnDrop(Arc<AtomicBool>);

    impl Drop for SetOnDrop {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    fn change(status: OrderStatus) -> OrderStatusChange {
        OrderStatusChange {
            order_id: "o1".into(),
            status,
        }
    }

    #[tokio::test]
    async fn delivers_the_call_result_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let pending = PendingOrderUpdate::spawn(Duration::from_secs(1), async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(change(OrderStatus::Processing))
        });

        let result = pending.wait().await.unwrap();
        assert_eq!(result, change(OrderStatus::Processing));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn slow_call_hits_the_deadline() {
        let pending = PendingOrderUpdate::spawn(Duration::from_millis(20), async {
            std::future::pending::<OrderUpdateResult>().await
        });

        assert!(matches!(
            pending.wait().await,
            Err(OrderClientError::DeadlineExceeded(d)) if d == Duration::from_millis(20)
        ));
    }

    #[tokio::test]
    async fn dropping_the_handle_cancels_the_call() {
        let dropped = Arc::new(AtomicBool::new(false));
        let guard = SetOnDrop(dropped.clone());

        let pending = PendingOrderUpdate::spawn(Duration::from_secs(30), async move {
            let _guard = guard;
            std::future::pending::<OrderUpdateResult>().await
        });
        tokio::task::yield_now().await;
        drop(pending);

        for _ in 0..100 {
            if dropped.load(Ordering::SeqCst) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    #[allow(unreachable_code)]
    async fn panicking_call_is_reported_as_abandoned() {
        let pending = PendingOrderUpdate::spawn(Duration::from_secs(1), async {
            let result: OrderUpdateResult = panic!("order client blew up");
            result
        });

        assert!(matches!(pending.wait().await, Err(OrderClientError::Abandoned)));
    }
}
