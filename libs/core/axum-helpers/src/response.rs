//! Success responses in the standard envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use core_errors::RequestContext;
use core_errors::context;
use core_errors::envelope::{
    self, CREATED_KEY, DELETED_KEY, PaginatedEnvelope, Pagination, SUCCESS_KEY, SuccessEnvelope,
    UPDATED_KEY,
};
use serde::Serialize;
use serde_json::Value;

use crate::errors::set_request_id_header;

/// Success envelope ready to be returned from a handler.
///
/// ```ignore
/// async fn get_user() -> HttpResult<ApiResponse<SuccessEnvelope<User>>> {
///     let user = repo.find(id).await?;
///     Ok(ApiResponse::ok(user))
/// }
/// ```
///
/// The request context is captured once when the body is built, so the
/// `x-request-id` header always matches `meta.request_id`.
#[derive(Debug)]
pub struct ApiResponse<B> {
    status: StatusCode,
    body: B,
    ctx: RequestContext,
}

impl<T: Serialize> ApiResponse<SuccessEnvelope<T>> {
    /// 200 with the `success` message.
    pub fn ok(data: T) -> Self {
        Self::ok_with_message(SUCCESS_KEY, data)
    }

    /// 200 with a caller-chosen message key.
    pub fn ok_with_message(message_key: &str, data: T) -> Self {
        let ctx = context::current();
        let body = envelope::format_success(&ctx, message_key, data);
        Self {
            status: StatusCode::OK,
            body,
            ctx,
        }
    }

    /// 201 Created.
    pub fn created(data: T) -> Self {
        let ctx = context::current();
        let body = envelope::format_created(&ctx, CREATED_KEY, data);
        Self {
            status: StatusCode::CREATED,
            body,
            ctx,
        }
    }

    pub fn updated(data: T) -> Self {
        let ctx = context::current();
        let body = envelope::format_updated(&ctx, UPDATED_KEY, data);
        Self {
            status: StatusCode::OK,
            body,
            ctx,
        }
    }
}

impl ApiResponse<SuccessEnvelope<Value>> {
    /// 200 with `data: null`.
    pub fn deleted() -> Self {
        let ctx = context::current();
        let body = envelope::format_deleted(&ctx, DELETED_KEY);
        Self {
            status: StatusCode::OK,
            body,
            ctx,
        }
    }
}

impl<T: Serialize> ApiResponse<PaginatedEnvelope<T>> {
    pub fn paginated(pagination: Pagination, data: Vec<T>) -> Self {
        let ctx = context::current();
        let body = envelope::format_pagination(&ctx, SUCCESS_KEY, pagination, data);
        Self {
            status: StatusCode::OK,
            body,
            ctx,
        }
    }
}

impl<B> ApiResponse<B> {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn request_id(&self) -> &str {
        self.ctx.request_id()
    }
}

impl<B: Serialize> IntoResponse for ApiResponse<B> {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();
        set_request_id_header(&mut response, &self.ctx);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_errors::RequestContext;
    use core_errors::context::REQUEST_ID_HEADER;
    use serde_json::json;
    use test_utils::json_body;

    #[tokio::test]
    async fn test_ok_response() {
        let ctx = RequestContext::with_request_id("req-1");
        let response = context::scope(ctx, async {
            ApiResponse::ok(json!({"id": 7})).into_response()
        })
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-1");
        let body: Value = json_body(response.into_body()).await;
        assert_eq!(
            body,
            json!({
                "meta": {"request_id": "req-1", "code": 200, "message": "Success"},
                "data": {"id": 7}
            })
        );
    }

    #[tokio::test]
    async fn test_header_matches_body_outside_request_scope() {
        let response = ApiResponse::ok(json!(1)).into_response();

        let header = response.headers()[REQUEST_ID_HEADER]
            .to_str()
            .unwrap()
            .to_string();
        let body: Value = json_body(response.into_body()).await;
        assert_eq!(body["meta"]["request_id"], header.as_str());
    }

    #[tokio::test]
    async fn test_spawned_task_keeps_its_own_request_id() {
        let ctx = RequestContext::with_request_id("req-outer");
        let response = context::scope(ctx, async {
            tokio::spawn(async { ApiResponse::created(json!({"id": 3})) })
                .await
                .unwrap()
        })
        .await;

        let id = response.request_id().to_string();
        let response = response.into_response();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], id.as_str());
        let body: Value = json_body(response.into_body()).await;
        assert_eq!(body["meta"]["request_id"], id.as_str());
    }

    #[tokio::test]
    async fn test_created_response_is_201() {
        let response = ApiResponse::created(json!({"id": 1}));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.body().meta.code, 201);
        assert_eq!(response.body().meta.message, "Created successfully");
    }

    #[tokio::test]
    async fn test_deleted_response_has_null_data() {
        let response = ApiResponse::deleted().into_response();
        let body: Value = json_body(response.into_body()).await;
        assert_eq!(body["data"], Value::Null);
        assert_eq!(body["meta"]["message"], "Deleted successfully");
    }

    #[tokio::test]
    async fn test_paginated_response_in_locale() {
        let ctx = RequestContext::with_request_id("req-2").with_locale("id");
        let response = context::scope(ctx, async {
            ApiResponse::paginated(Pagination::new(2, 10, 25), vec![json!({"id": 11})])
                .into_response()
        })
        .await;

        let body: Value = json_body(response.into_body()).await;
        assert_eq!(
            body["pagination"],
            json!({"page": 2, "size": 10, "limit": 10, "total_row": 25})
        );
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["meta"]["code"], 200);
    }
}
