use crate::http::{full_body, make_error_response};
use http_body_util::combinators::BoxBody;
use hyper::body::Bytes;
use hyper::service::Service;
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::future::{Ready, ready};

/// Serves the liveness and readiness probes on the admin listener.
///
/// `is_ready` is evaluated on every `/ready` request.
pub struct AdminService<F> {
    is_ready: F,
}

impl<F> AdminService<F>
where
    F: Fn() -> bool,
{
    pub fn new(is_ready: F) -> Self {
        Self { is_ready }
    }
}

impl<F, B> Service<Request<B>> for AdminService<F>
where
    F: Fn() -> bool,
{
    type Response = Response<BoxBody<Bytes, Infallible>>;
    type Error = Infallible;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn call(&self, req: Request<B>) -> Self::Future {
        if req.method() != Method::GET {
            return ready(Ok(make_error_response(StatusCode::METHOD_NOT_ALLOWED)));
        }

        let res = match req.uri().path() {
            "/health" => Response::new(full_body("ok\n")),
            "/ready" => match (self.is_ready)() {
                true => Response::new(full_body("ok\n")),
                false => make_error_response(StatusCode::SERVICE_UNAVAILABLE),
            },
            _ => make_error_response(StatusCode::NOT_FOUND),
        };
        ready(Ok(res))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn get(path: &str) -> Request<()> {
        Request::builder().uri(path).body(()).unwrap()
    }

    #[tokio::test]
    async fn test_health_and_ready() {
        let ready_flag = Arc::new(AtomicBool::new(false));
        let flag = ready_flag.clone();
        let admin = AdminService::new(move || flag.load(Ordering::Relaxed));

        let res = admin.call(get("/health")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = admin.call(get("/ready")).await.unwrap();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

        ready_flag.store(true, Ordering::Relaxed);
        let res = admin.call(get("/ready")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = admin.call(get("/metrics")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rejects_non_get() {
        let admin = AdminService::new(|| true);
        let req = Request::builder()
            .method(Method::POST)
            .uri("/health")
            .body(())
            .unwrap();

        let res = admin.call(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
