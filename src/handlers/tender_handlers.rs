use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::templates_structs::{PageContext, TenderListTemplate};

/// GET /tenders
/// Renders the tender listing straight from the backend.
pub async fn list(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let tenders = api.list_tenders()?;
    let ctx = PageContext::build(&session, &config);

    let tmpl = TenderListTemplate { ctx, tenders };
    render(tmpl)
}
