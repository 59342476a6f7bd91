use actix_web::{
    body::{BoxBody, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures_util::{
    future::{ok, LocalBoxFuture, Ready},
    FutureExt,
};
use std::{any::Any, panic::AssertUnwindSafe, rc::Rc, task::{Context, Poll}};

use crate::errors::AppError;

/// Catches a panic anywhere in the wrapped service, sync or async, and
/// turns it into a single `AppError::InternalError`. Errors that the
/// handlers return normally pass through untouched.
pub struct FaultBarrier;

impl<S, B> Transform<S, ServiceRequest> for FaultBarrier
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = FaultBarrierService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(FaultBarrierService {
            service: Rc::new(service),
        })
    }
}

pub struct FaultBarrierService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for FaultBarrierService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let path = req.path().to_string();

        Box::pin(async move {
            let handled = AssertUnwindSafe(async move { service.call(req).await })
                .catch_unwind()
                .await;

            match handled {
                Ok(result) => result.map(ServiceResponse::map_into_boxed_body),
                // rendered by AppError's ResponseError impl
                Err(panic) => Err(AppError::InternalError(format!(
                    "handler panicked on {}: {}",
                    path,
                    panic_message(panic.as_ref())
                ))
                .into()),
            }
        })
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic.downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
