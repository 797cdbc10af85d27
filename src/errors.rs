use actix_web::http::StatusCode;
use actix_web::{HttpResponse, HttpResponseBuilder, ResponseError};
use askama::Template;
use std::fmt;

use crate::api::ApiError;
use crate::templates_structs::ErrorPageTemplate;

#[derive(Debug)]
pub enum AppError {
    Api(ApiError),
    Template(askama::Error),
    Csrf,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Api(e) => write!(f, "API error: {e}"),
            AppError::Template(e) => write!(f, "Template error: {e}"),
            AppError::Csrf => write!(f, "Invalid or missing CSRF token"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Csrf => {
                HttpResponse::Forbidden().body("Invalid or missing CSRF token")
            }
            AppError::Api(e) => {
                log::error!("{self}");
                let status = e
                    .status()
                    .and_then(|code| StatusCode::from_u16(code).ok())
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                error_page(status)
            }
            AppError::Template(_) => {
                log::error!("{self}");
                error_page(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        AppError::Api(e)
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Template(e)
    }
}

/// Render a template into a 200 HTML response.
pub fn render<T: Template>(tmpl: T) -> Result<HttpResponse, AppError> {
    let body = tmpl.render()?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}

/// The generic error view, carrying the given status on the response.
pub fn error_page(status: StatusCode) -> HttpResponse {
    let tmpl = ErrorPageTemplate {
        status_code: status.as_u16(),
    };
    match tmpl.render() {
        Ok(body) => HttpResponseBuilder::new(status)
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("Failed to render error page: {e}");
            HttpResponseBuilder::new(status).finish()
        }
    }
}
