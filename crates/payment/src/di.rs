use crate::{
    abstract_trait::{
        DynCallbackService, DynOrderGrpcClient, DynPaymentGateway,
        payment::{
            DynPaymentCommandRepository, DynPaymentCommandService, DynPaymentQueryRepository,
            DynPaymentQueryService,
        },
    },
    config::MpesaConfig,
    gateway::MpesaClient,
    grpc_client::{GrpcClients, OrderGrpcClientService},
    repository::{PaymentCommandRepository, PaymentQueryRepository},
    service::{
        CallbackService, CallbackServiceDeps, PaymentCommandService, PaymentCommandServiceDeps,
        PaymentQueryService,
    },
};
use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use shared::{config::ConnectionPool, utils::SagaMetrics};
use std::{fmt, sync::Arc, time::Duration};

#[derive(Clone)]
pub struct DependenciesInjectDeps {
    pub pool: ConnectionPool,
    pub mpesa: MpesaConfig,
    pub order_rpc_timeout: Duration,
}

#[derive(Clone)]
pub struct DependenciesInject {
    pub payment_command: DynPaymentCommandService,
    pub payment_query: DynPaymentQueryService,
    pub callback: DynCallbackService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("payment_command", &"DynPaymentCommandService")
            .field("payment_query", &"DynPaymentQueryService")
            .field("callback", &"DynCallbackService")
            .finish()
    }
}

impl DependenciesInject {
    pub fn new(
        deps: DependenciesInjectDeps,
        clients: GrpcClients,
        registry: &mut Registry,
    ) -> Result<Self> {
        let DependenciesInjectDeps {
            pool,
            mpesa,
            order_rpc_timeout,
        } = deps;

        let saga = SagaMetrics::default();
        saga.register(registry);

        let query_repo: DynPaymentQueryRepository =
            Arc::new(PaymentQueryRepository::new(pool.clone()));
        let command_repo: DynPaymentCommandRepository =
            Arc::new(PaymentCommandRepository::new(pool));

        let gateway: DynPaymentGateway =
            Arc::new(MpesaClient::new(mpesa).context("Failed to build M-Pesa client")?);
        let order_client: DynOrderGrpcClient =
            Arc::new(OrderGrpcClientService::new(clients.order_client));

        let payment_command = Arc::new(PaymentCommandService::new(
            PaymentCommandServiceDeps {
                gateway,
                command: command_repo.clone(),
                saga: saga.clone(),
            },
            registry,
        )) as DynPaymentCommandService;

        let payment_query = Arc::new(PaymentQueryService::new(query_repo.clone(), registry))
            as DynPaymentQueryService;

        let callback = Arc::new(CallbackService::new(
            CallbackServiceDeps {
                query: query_repo,
                command: command_repo,
                order_client,
                order_rpc_timeout,
                saga,
            },
            registry,
        )) as DynCallbackService;

        Ok(Self {
            payment_command,
            payment_query,
            callback,
        })
    }
}
