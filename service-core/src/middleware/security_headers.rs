use axum::{
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};

/// Response hardening headers applied by [`security_headers_middleware`].
#[derive(Debug, Clone)]
pub struct SecurityHeaders {
    content_security_policy: HeaderValue,
}

impl SecurityHeaders {
    /// Policy for server-rendered pages: same-origin assets, plus images from
    /// `img_origins`.
    pub fn pages(img_origins: &[&str]) -> Result<Self, header::InvalidHeaderValue> {
        let mut img_src = String::from("'self' data:");
        for origin in img_origins {
            img_src.push(' ');
            img_src.push_str(origin);
        }

        let policy = format!(
            "default-src 'self'; img-src {}; style-src 'self'; script-src 'none'; \
             form-action 'self'; frame-ancestors 'none'",
            img_src
        );

        Ok(Self {
            content_security_policy: HeaderValue::from_str(&policy)?,
        })
    }
}

pub async fn security_headers_middleware(
    State(policy): State<SecurityHeaders>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        policy.content_security_policy.clone(),
    );

    response
}
