use crate::{
    abstract_trait::{
        OrderGrpcClientTrait, PaymentGatewayTrait,
        payment::{PaymentCommandRepositoryTrait, PaymentQueryRepositoryTrait},
    },
    domain::requests::payment::CreatePaymentRecordRequest,
    gateway::{GatewayError, StkPushReceipt},
    grpc_client::{OrderClientError, OrderStatusChange, PendingOrderUpdate},
    model::payment::Payment,
};
use async_trait::async_trait;
use chrono::Utc;
use opentelemetry::Context;
use shared::{
    domain::{EnumMapping, OrderStatus, PaymentMethod, PaymentStatus},
    errors::{RepositoryError, ServiceError},
};
use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use uuid::Uuid;

#[derive(Default)]
pub struct MockPaymentRepository {
    pub payments: Mutex<HashMap<Uuid, Payment>>,
    pub fail_create: AtomicBool,
    pub fail_transition: AtomicBool,
    /// When set, a transition finds this status already written by someone else.
    pub race_to: Mutex<Option<PaymentStatus>>,
}

impl MockPaymentRepository {
    pub fn insert_pending(&self, order_id: &str, merchant_request_id: &str) -> Uuid {
        let now = Utc::now().naive_utc();
        let payment = Payment {
            id: Uuid::new_v4(),
            order_id: order_id.into(),
            customer_id: "c1".into(),
            payment_method: PaymentMethod::Mpesa.as_storage().into(),
            merchant_request_id: merchant_request_id.into(),
            checkout_request_id: format!("ws_{merchant_request_id}"),
            amount: 10.0,
            currency: "KES".into(),
            status: PaymentStatus::Pending.as_storage().into(),
            description: format!("Payment for order {order_id}"),
            shipping_cost: 5.0,
            product_cost: 5.0,
            mpesa_receipt_number: None,
            created_at: Some(now),
            updated_at: Some(now),
        };
        let id = payment.id;
        self.payments.lock().unwrap().insert(id, payment);
        id
    }

    pub fn status_of(&self, id: Uuid) -> String {
        self.payments.lock().unwrap()[&id].status.clone()
    }

    pub fn receipt_of(&self, id: Uuid) -> Option<String> {
        self.payments.lock().unwrap()[&id].mpesa_receipt_number.clone()
    }

    pub fn count(&self) -> usize {
        self.payments.lock().unwrap().len()
    }
}

#[async_trait]
impl PaymentQueryRepositoryTrait for MockPaymentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>, RepositoryError> {
        Ok(self.payments.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_merchant_request_id(
        &self,
        merchant_request_id: &str,
    ) -> Result<Option<Payment>, RepositoryError> {
        Ok(self
            .payments
            .lock()
            .unwrap()
            .values()
            .find(|p| p.merchant_request_id == merchant_request_id)
            .cloned())
    }
}

#[async_trait]
impl PaymentCommandRepositoryTrait for MockPaymentRepository {
    async fn create_payment(
        &self,
        req: &CreatePaymentRecordRequest,
    ) -> Result<Payment, RepositoryError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(RepositoryError::Custom("connection reset".into()));
        }

        let now = Utc::now().naive_utc();
        let payment = Payment {
            id: Uuid::new_v4(),
            order_id: req.order_id.clone(),
            customer_id: req.customer_id.clone(),
            payment_method: req.payment_method.as_storage().into(),
            merchant_request_id: req.merchant_request_id.clone(),
            checkout_request_id: req.checkout_request_id.clone(),
            amount: req.amount,
            currency: req.currency.clone(),
            status: PaymentStatus::Pending.as_storage().into(),
            description: req.description.clone(),
            shipping_cost: req.shipping_cost,
            product_cost: req.product_cost,
            mpesa_receipt_number: None,
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.payments
            .lock()
            .unwrap()
            .insert(payment.id, payment.clone());
        Ok(payment)
    }

    async fn transition_status(
        &self,
        id: Uuid,
        from: PaymentStatus,
        to: PaymentStatus,
        receipt_number: Option<&str>,
    ) -> Result<Option<Payment>, RepositoryError> {
        if self.fail_transition.load(Ordering::SeqCst) {
            return Err(RepositoryError::Custom("connection reset".into()));
        }

        let mut payments = self.payments.lock().unwrap();
        let Some(payment) = payments.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(winner) = self.race_to.lock().unwrap().take() {
            payment.status = winner.as_storage().into();
        }

        if payment.status != from.as_storage() {
            return Ok(None);
        }

        payment.status = to.as_storage().into();
        if let Some(receipt) = receipt_number {
            payment.mpesa_receipt_number = Some(receipt.into());
        }
        Ok(Some(payment.clone()))
    }
}

#[derive(Default)]
pub struct MockGateway {
    pub calls: Mutex<Vec<(String, String, f64)>>,
    pub fail: AtomicBool,
}

impl MockGateway {
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PaymentGatewayTrait for MockGateway {
    async fn initiate_stk_push(
        &self,
        order_id: &str,
        phone: &str,
        amount: f64,
    ) -> Result<StkPushReceipt, GatewayError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push((order_id.into(), phone.into(), amount));

        if self.fail.load(Ordering::SeqCst) {
            return Err(GatewayError::Rejected {
                code: "500.001.1001".into(),
                message: "Unable to lock subscriber".into(),
            });
        }

        Ok(StkPushReceipt {
            merchant_request_id: format!("MR{}", calls.len()),
            checkout_request_id: format!("CR{}", calls.len()),
        })
    }
}

#[derive(Default)]
pub struct MockOrderClient {
    pub calls: Mutex<Vec<(String, OrderStatus)>>,
    pub fail: AtomicBool,
}

impl MockOrderClient {
    pub fn calls(&self) -> Vec<(String, OrderStatus)> {
        self.calls.lock().unwrap().clone()
    }
}

impl OrderGrpcClientTrait for MockOrderClient {
    fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        deadline: Duration,
        _cx: &Context,
    ) -> PendingOrderUpdate {
        self.calls
            .lock()
            .unwrap()
            .push((order_id.to_string(), status));

        let fail = self.fail.load(Ordering::SeqCst);
        let order_id = order_id.to_string();

        PendingOrderUpdate::spawn(deadline, async move {
            if fail {
                return Err(OrderClientError::Transport(ServiceError::Unavailable(
                    "order service down".into(),
                )));
            }
            Ok(OrderStatusChange { order_id, status })
        })
    }
}
