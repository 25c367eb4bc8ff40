use crate::errors::{repository::RepositoryError, service::ServiceError};
use thiserror::Error;
use tonic::Status;

#[derive(Debug, Error)]
pub enum AppErrorGrpc {
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
    #[error("Unhandled: {0}")]
    Unhandled(String),
}

impl From<AppErrorGrpc> for Status {
    fn from(err: AppErrorGrpc) -> Self {
        match err {
            AppErrorGrpc::Service(service_err) => match service_err {
                ServiceError::Validation(errors) => {
                    Status::invalid_argument(format!("Validation failed: {}", errors.join("; ")))
                }

                ServiceError::NotFound(msg) => Status::not_found(msg),

                ServiceError::InvalidTransition(msg) => Status::failed_precondition(msg),

                ServiceError::Conflict(msg) => Status::aborted(msg),

                ServiceError::Repo(repo_err) => match repo_err {
                    RepositoryError::NotFound => Status::not_found("Not found"),
                    RepositoryError::Conflict(msg) => Status::aborted(msg),
                    RepositoryError::AlreadyExists(msg) => Status::already_exists(msg),
                    RepositoryError::ForeignKey(msg) => {
                        Status::failed_precondition(format!("Foreign key constraint: {msg}"))
                    }
                    RepositoryError::Sqlx(_) => Status::internal("Database error"),
                    RepositoryError::Custom(_) => Status::internal("Database error"),
                },

                ServiceError::Gateway(_) => Status::internal("Payment gateway error"),

                ServiceError::Unavailable(msg) => Status::unavailable(msg),

                ServiceError::Internal(msg) => Status::internal(msg),

                ServiceError::Custom(msg) => Status::internal(msg),
            },

            AppErrorGrpc::Unhandled(msg) => Status::internal(format!("Unhandled error: {msg}")),
        }
    }
}

impl From<Status> for AppErrorGrpc {
    fn from(status: Status) -> Self {
        let message = status.message().to_string();

        match status.code() {
            tonic::Code::InvalidArgument => {
                AppErrorGrpc::Service(ServiceError::Validation(vec![message]))
            }

            tonic::Code::NotFound => AppErrorGrpc::Service(ServiceError::NotFound(message)),

            tonic::Code::FailedPrecondition => {
                AppErrorGrpc::Service(ServiceError::InvalidTransition(message))
            }

            tonic::Code::Aborted => AppErrorGrpc::Service(ServiceError::Conflict(message)),

            tonic::Code::AlreadyExists => AppErrorGrpc::Service(ServiceError::Repo(
                RepositoryError::AlreadyExists(message),
            )),

            tonic::Code::Unavailable | tonic::Code::DeadlineExceeded | tonic::Code::Cancelled => {
                AppErrorGrpc::Service(ServiceError::Unavailable(message))
            }

            tonic::Code::Internal => AppErrorGrpc::Service(ServiceError::Internal(message)),

            _ => AppErrorGrpc::Unhandled(format!("gRPC error: {} - {}", status.code(), message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_invalid_argument() {
        let status: Status = AppErrorGrpc::from(ServiceError::Validation(vec![
            "order_id: required".into(),
            "amount: mismatch".into(),
        ]))
        .into();

        assert_eq!(status.code(), tonic::Code::InvalidArgument);
        assert!(status.message().contains("order_id: required; amount: mismatch"));
    }

    #[test]
    fn database_details_are_not_echoed() {
        let status: Status = AppErrorGrpc::from(ServiceError::Repo(RepositoryError::Sqlx(
            sqlx::Error::PoolTimedOut,
        )))
        .into();

        assert_eq!(status.code(), tonic::Code::Internal);
        assert_eq!(status.message(), "Database error");
    }

    #[test]
    fn gateway_errors_are_internal() {
        let status: Status =
            AppErrorGrpc::from(ServiceError::Gateway("token exchange returned 401".into())).into();

        assert_eq!(status.code(), tonic::Code::Internal);
        assert_eq!(status.message(), "Payment gateway error");
    }

    #[test]
    fn remote_status_round_trips_to_service_error() {
        let err = AppErrorGrpc::from(Status::not_found("order missing"));
        assert!(matches!(
            err,
            AppErrorGrpc::Service(ServiceError::NotFound(ref msg)) if msg == "order missing"
        ));

        let err = AppErrorGrpc::from(Status::deadline_exceeded("slow"));
        assert!(matches!(
            err,
            AppErrorGrpc::Service(ServiceError::Unavailable(_))
        ));
    }
}
