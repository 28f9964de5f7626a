use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    HttpMessage,
};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use uuid::Uuid;

use crate::trace_ctx::{self, TraceId};

/// Assigns every request a trace id, scopes the rest of the pipeline to it,
/// and echoes it back as `x-trace-id`. Wrap outermost.
pub struct RequestTrace;

impl<S, B> Transform<S, ServiceRequest> for RequestTrace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequestTraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTraceMiddleware { service }))
    }
}

pub struct RequestTraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestTraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = Uuid::new_v4().to_string();

        req.extensions_mut().insert(TraceId(trace_id.clone()));

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = trace_ctx::with_trace_id(trace_id.clone(), fut).await?;

            res.headers_mut().insert(
                header::HeaderName::from_static("x-trace-id"),
                header::HeaderValue::from_str(&trace_id)
                    .unwrap_or_else(|_| header::HeaderValue::from_static("invalid-uuid")),
            );

            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App, HttpRequest, HttpResponse};

    use super::*;

    async fn echo_trace(req: HttpRequest) -> HttpResponse {
        let from_extensions = req
            .extensions()
            .get::<TraceId>()
            .map(|t| t.0.clone())
            .unwrap_or_default();
        HttpResponse::Ok().body(format!("{}|{}", trace_ctx::trace_id(), from_extensions))
    }

    #[actix_web::test]
    async fn test_header_matches_task_local_and_extension() {
        let app = test::init_service(
            App::new()
                .wrap(RequestTrace)
                .route("/trace", web::get().to(echo_trace)),
        )
        .await;

        let mut seen = Vec::new();
        for _ in 0..2 {
            let req = test::TestRequest::get().uri("/trace").to_request();
            let resp = test::call_service(&app, req).await;
            let header = resp
                .headers()
                .get("x-trace-id")
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
                .unwrap();
            let body = test::read_body(resp).await;

            assert!(Uuid::parse_str(&header).is_ok());
            assert_eq!(body.as_ref(), format!("{header}|{header}").as_bytes());
            seen.push(header);
        }

        assert_ne!(seen[0], seen[1]);
    }
}
