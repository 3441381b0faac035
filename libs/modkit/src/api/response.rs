use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

/// 201 Created + `Location` header + JSON body.
pub fn created_at<T: serde::Serialize>(location: &str, value: T) -> Response {
    let mut resp = (StatusCode::CREATED, Json(value)).into_response();
    if let Ok(v) = HeaderValue::from_str(location) {
        resp.headers_mut().insert(header::LOCATION, v);
    }
    resp
}
