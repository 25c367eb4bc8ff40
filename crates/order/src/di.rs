use crate::{
    abstract_trait::{
        DynCustomerQueryRepository, DynPaymentGrpcClient, DynPaymentIntentRepository,
        DynProductQueryRepository,
        order::{
            DynOrderCommandRepository, DynOrderCommandService, DynOrderQueryRepository,
            DynOrderQueryService,
        },
    },
    grpc_client::{GrpcClients, PaymentGrpcClientService},
    repository::{
        CustomerQueryRepository, OrderCommandRepository, OrderQueryRepository,
        PaymentIntentRepository, ProductQueryRepository,
    },
    service::{
        OrderCommandService, OrderCommandServiceDeps, OrderQueryService, PaymentIntentReconciler,
        PaymentIntentReconcilerDeps,
    },
};
use prometheus_client::registry::Registry;
use shared::{config::ConnectionPool, utils::SagaMetrics};
use std::{fmt, sync::Arc, time::Duration};

#[derive(Clone)]
pub struct DependenciesInjectDeps {
    pub pool: ConnectionPool,
    pub reconcile_interval: Duration,
    pub reconcile_grace: Duration,
}

#[derive(Clone)]
pub struct DependenciesInject {
    pub order_command: DynOrderCommandService,
    pub order_query: DynOrderQueryService,
    pub reconciler: Arc<PaymentIntentReconciler>,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("order_command", &"DynOrderCommandService")
            .field("order_query", &"DynOrderQueryService")
            .field("reconciler", &"PaymentIntentReconciler")
            .finish()
    }
}

impl DependenciesInject {
    pub fn new(
        deps: DependenciesInjectDeps,
        clients: GrpcClients,
        registry: &mut Registry,
    ) -> Self {
        let DependenciesInjectDeps {
            pool,
            reconcile_interval,
            reconcile_grace,
        } = deps;

        let saga = SagaMetrics::default();
        saga.register(registry);

        let product: DynProductQueryRepository =
            Arc::new(ProductQueryRepository::new(pool.clone()));
        let customer: DynCustomerQueryRepository =
            Arc::new(CustomerQueryRepository::new(pool.clone()));
        let query_repo: DynOrderQueryRepository = Arc::new(OrderQueryRepository::new(pool.clone()));
        let command_repo: DynOrderCommandRepository =
            Arc::new(OrderCommandRepository::new(pool.clone()));
        let intents: DynPaymentIntentRepository = Arc::new(PaymentIntentRepository::new(pool));

        let payment_client: DynPaymentGrpcClient =
            Arc::new(PaymentGrpcClientService::new(clients.payment_client));

        let order_command = Arc::new(OrderCommandService::new(
            OrderCommandServiceDeps {
                product,
                customer,
                query: query_repo.clone(),
                command: command_repo.clone(),
                intents: intents.clone(),
                payment_client,
                saga: saga.clone(),
            },
            registry,
        )) as DynOrderCommandService;

        let order_query =
            Arc::new(OrderQueryService::new(query_repo, registry)) as DynOrderQueryService;

        let reconciler = Arc::new(PaymentIntentReconciler::new(PaymentIntentReconcilerDeps {
            intents,
            command: command_repo,
            saga,
            interval: reconcile_interval,
            grace: reconcile_grace,
        }));

        Self {
            order_command,
            order_query,
            reconciler,
        }
    }
}
