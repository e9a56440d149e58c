use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Keeps a caller-supplied `x-request-id` or assigns a fresh UUID, and
/// echoes it on the response.
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let header = HeaderName::from_static(REQUEST_ID_HEADER);

    let existing = req
        .headers()
        .get(&header)
        .filter(|v| !v.is_empty())
        .cloned();

    let request_id = match existing {
        Some(v) => v,
        None => {
            let generated = HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"));
            req.headers_mut().insert(header.clone(), generated.clone());
            generated
        }
    };

    let mut response = next.run(req).await;
    response.headers_mut().insert(header, request_id);
    response
}
