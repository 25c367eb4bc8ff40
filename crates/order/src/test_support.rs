use crate::{
    abstract_trait::{
        CustomerQueryRepositoryTrait, PaymentGrpcClientTrait, PaymentIntentRepositoryTrait,
        ProductQueryRepositoryTrait,
        order::{OrderCommandRepositoryTrait, OrderQueryRepositoryTrait},
    },
    domain::{
        requests::{
            order::{CreateOrderRecordRequest, UpdateOrderRecordRequest},
            payment::PaymentInitiation,
        },
        response::payment::PaymentResponse,
    },
    model::{
        catalog::{Customer, Product},
        order::{Address, Order, OrderDetails},
        payment_intent::{PaymentIntent, PaymentIntentState},
    },
};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use opentelemetry::Context;
use shared::{
    domain::{EnumMapping, OrderStatus, PaymentMethod, PaymentStatus},
    errors::{RepositoryError, ServiceError, grpc_status_to_service_error},
};
use sqlx::types::Json;
use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};
use tonic::{Code, Status};
use uuid::Uuid;

pub fn address() -> Address {
    Address {
        street: "Moi Avenue 1".into(),
        city: "Nairobi".into(),
        state: "Nairobi".into(),
        postal_code: "00100".into(),
        country: "KE".into(),
    }
}

/// Orders, their details, payment markers and the catalog in one place, so a
/// single create can be observed across all of them.
#[derive(Default)]
pub struct MockOrderStore {
    pub orders: Mutex<HashMap<Uuid, Order>>,
    pub details: Mutex<HashMap<Uuid, OrderDetails>>,
    pub intents: Mutex<HashMap<Uuid, PaymentIntent>>,
    pub products: Mutex<HashMap<Uuid, Product>>,
    pub customers: Mutex<HashMap<Uuid, Customer>>,
    pub fail_create: AtomicBool,
    /// When set, the next conditional update finds this status written by someone else.
    pub race_to: Mutex<Option<OrderStatus>>,
}

impl MockOrderStore {
    pub fn add_product(&self, price: f64, is_available: bool) -> Uuid {
        let now = Utc::now().naive_utc();
        let product = Product {
            id: Uuid::new_v4(),
            name: "Kettle".into(),
            sku: format!("KT-{}", self.products.lock().unwrap().len()),
            category: "kitchen".into(),
            brand: "Ramtons".into(),
            model: "RM-1".into(),
            price,
            stock_quantity: 10,
            is_available,
            created_at: Some(now),
            updated_at: Some(now),
        };
        let id = product.id;
        self.products.lock().unwrap().insert(id, product);
        id
    }

    pub fn add_customer(&self, phone_number: &str) -> Uuid {
        let now = Utc::now().naive_utc();
        let customer = Customer {
            id: Uuid::new_v4(),
            name: "Wanjiru".into(),
            email: format!("{}@example.com", Uuid::new_v4()),
            phone_number: phone_number.into(),
            address: Json(address()),
            created_at: Some(now),
            updated_at: Some(now),
        };
        let id = customer.id;
        self.customers.lock().unwrap().insert(id, customer);
        id
    }

    pub fn insert_order(&self, status: OrderStatus) -> Uuid {
        let now = Utc::now().naive_utc();
        let order = Order {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            pickup_address: Json(address()),
            delivery_address: Json(address()),
            shipping_method: "express".into(),
            order_status: status.as_storage().into(),
            scheduled_pickup_datetime: None,
            scheduled_delivery_datetime: None,
            tracking_number: String::new(),
            payment_method: PaymentMethod::Mpesa.as_storage().into(),
            invoice_number: "INV-1".into(),
            special_instructions: String::new(),
            shipping_cost: 5.0,
            created_at: Some(now),
            updated_at: Some(now),
            deleted_at: None,
        };
        let id = order.id;
        self.orders.lock().unwrap().insert(id, order);
        id
    }

    pub fn set_intent(&self, order_id: Uuid, state: PaymentIntentState, updated_at: NaiveDateTime) {
        let intent = PaymentIntent {
            order_id,
            state: state.as_str().into(),
            payment_id: None,
            last_error: (state == PaymentIntentState::Failed).then(|| "payment down".into()),
            attempts: 0,
            created_at: updated_at,
            updated_at,
        };
        self.intents.lock().unwrap().insert(order_id, intent);
    }

    pub fn order_status(&self, id: Uuid) -> String {
        self.orders.lock().unwrap()[&id].order_status.clone()
    }

    pub fn intent_state(&self, order_id: Uuid) -> Option<PaymentIntentState> {
        self.intents
            .lock()
            .unwrap()
            .get(&order_id)
            .map(|intent| intent.state().unwrap())
    }

    pub fn order_count(&self) -> usize {
        self.orders.lock().unwrap().len()
    }

    fn move_intent(
        &self,
        order_id: Uuid,
        from: PaymentIntentState,
        to: PaymentIntentState,
        payment_id: Option<&str>,
        reason: Option<&str>,
    ) -> Option<PaymentIntent> {
        let mut intents = self.intents.lock().unwrap();
        let intent = intents.get_mut(&order_id)?;
        if intent.state != from.as_str() {
            return None;
        }
        intent.state = to.as_str().into();
        if let Some(payment_id) = payment_id {
            intent.payment_id = Some(payment_id.into());
        }
        if let Some(reason) = reason {
            intent.last_error = Some(reason.into());
        }
        intent.attempts += 1;
        intent.updated_at = Utc::now().naive_utc();
        Some(intent.clone())
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for MockOrderStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, RepositoryError> {
        Ok(self.products.lock().unwrap().get(&id).cloned())
    }
}

#[async_trait]
impl CustomerQueryRepositoryTrait for MockOrderStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, RepositoryError> {
        Ok(self.customers.lock().unwrap().get(&id).cloned())
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for MockOrderStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, RepositoryError> {
        Ok(self.orders.lock().unwrap().get(&id).cloned())
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for MockOrderStore {
    async fn create_order_with_details(
        &self,
        req: &CreateOrderRecordRequest,
    ) -> Result<(Order, OrderDetails), RepositoryError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(RepositoryError::Custom("insert failed".into()));
        }

        let now = Utc::now().naive_utc();
        let order = Order {
            id: Uuid::new_v4(),
            customer_id: req.customer_id,
            pickup_address: Json(req.pickup_address.clone()),
            delivery_address: Json(req.delivery_address.clone()),
            shipping_method: req.shipping_method.clone(),
            order_status: OrderStatus::Pending.as_storage().into(),
            scheduled_pickup_datetime: req.scheduled_pickup_datetime,
            scheduled_delivery_datetime: req.scheduled_delivery_datetime,
            tracking_number: req.tracking_number.clone(),
            payment_method: req.payment_method.as_storage().into(),
            invoice_number: req.invoice_number.clone(),
            special_instructions: req.special_instructions.clone(),
            shipping_cost: req.shipping_cost,
            created_at: Some(now),
            updated_at: Some(now),
            deleted_at: None,
        };
        let details = OrderDetails {
            id: Uuid::new_v4(),
            order_id: order.id,
            product_id: req.product_id,
            quantity: req.quantity,
            created_at: Some(now),
            updated_at: Some(now),
        };

        self.orders.lock().unwrap().insert(order.id, order.clone());
        self.details.lock().unwrap().insert(details.id, details.clone());
        self.set_intent(order.id, PaymentIntentState::Pending, now);

        Ok((order, details))
    }

    async fn update_order(
        &self,
        req: &UpdateOrderRecordRequest,
    ) -> Result<Option<Order>, RepositoryError> {
        let mut orders = self.orders.lock().unwrap();
        let Some(order) = orders.get_mut(&req.order_id) else {
            return Ok(None);
        };

        if let Some(winner) = self.race_to.lock().unwrap().take() {
            order.order_status = winner.as_storage().into();
        }
        if order.order_status != req.expected_status.as_storage() {
            return Ok(None);
        }

        let patch = &req.patch;
        if let Some(status) = patch.order_status {
            order.order_status = status.as_storage().into();
        }
        if let Some(value) = &patch.tracking_number {
            order.tracking_number = value.clone();
        }
        if let Some(value) = &patch.shipping_method {
            order.shipping_method = value.clone();
        }
        if let Some(value) = &patch.special_instructions {
            order.special_instructions = value.clone();
        }
        if let Some(value) = &patch.invoice_number {
            order.invoice_number = value.clone();
        }
        order.updated_at = Some(Utc::now().naive_utc());

        Ok(Some(order.clone()))
    }
}

#[async_trait]
impl PaymentIntentRepositoryTrait for MockOrderStore {
    async fn mark_initiated(
        &self,
        order_id: Uuid,
        payment_id: &str,
    ) -> Result<Option<PaymentIntent>, RepositoryError> {
        Ok(self.move_intent(
            order_id,
            PaymentIntentState::Pending,
            PaymentIntentState::Initiated,
            Some(payment_id),
            None,
        ))
    }

    async fn mark_failed(
        &self,
        order_id: Uuid,
        reason: &str,
    ) -> Result<Option<PaymentIntent>, RepositoryError> {
        Ok(self.move_intent(
            order_id,
            PaymentIntentState::Pending,
            PaymentIntentState::Failed,
            None,
            Some(reason),
        ))
    }

    async fn mark_compensated(
        &self,
        order_id: Uuid,
    ) -> Result<Option<PaymentIntent>, RepositoryError> {
        Ok(self.move_intent(
            order_id,
            PaymentIntentState::Failed,
            PaymentIntentState::Compensated,
            None,
            None,
        ))
    }

    async fn find_stale(
        &self,
        state: PaymentIntentState,
        older_than: NaiveDateTime,
        limit: i64,
    ) -> Result<Vec<PaymentIntent>, RepositoryError> {
        let orders = self.orders.lock().unwrap();
        let mut stale: Vec<PaymentIntent> = self
            .intents
            .lock()
            .unwrap()
            .values()
            .filter(|intent| intent.state == state.as_str() && intent.updated_at < older_than)
            .filter(|intent| {
                orders
                    .get(&intent.order_id)
                    .is_some_and(|order| order.order_status == OrderStatus::Pending.as_storage())
            })
            .cloned()
            .collect();

        stale.sort_by_key(|intent| intent.updated_at);
        stale.truncate(limit as usize);
        Ok(stale)
    }
}

#[derive(Default)]
pub struct MockPaymentClient {
    pub requests: Mutex<Vec<PaymentInitiation>>,
    pub fail_with: Mutex<Option<Code>>,
}

impl MockPaymentClient {
    pub fn calls(&self) -> Vec<PaymentInitiation> {
        self.requests.lock().unwrap().clone()
    }

    pub fn fail_with(&self, code: Code) {
        *self.fail_with.lock().unwrap() = Some(code);
    }
}

#[async_trait]
impl PaymentGrpcClientTrait for MockPaymentClient {
    async fn create_payment(
        &self,
        req: &PaymentInitiation,
        _cx: &Context,
    ) -> Result<PaymentResponse, ServiceError> {
        let n = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(req.clone());
            requests.len()
        };

        if let Some(code) = *self.fail_with.lock().unwrap() {
            return Err(grpc_status_to_service_error(Status::new(
                code,
                "payment service refused",
            )));
        }

        Ok(PaymentResponse {
            id: Uuid::new_v4().to_string(),
            order_id: req.order_id.clone(),
            merchant_request_id: format!("MR{n}"),
            payment_method: req.payment_method,
            status: PaymentStatus::Pending,
            amount: req.amount,
            currency: "KES".into(),
        })
    }
}
