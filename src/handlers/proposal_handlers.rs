use actix_session::Session;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};

use crate::api::ApiClient;
use crate::cache::{PageCache, PageProps};
use crate::config::AppConfig;
use crate::csrf;
use crate::errors::{AppError, error_page, render};
use crate::models::proposal::{ProposalForm, SubmitError, Submitter};
use crate::models::tender::Tender;
use crate::session::set_flash;
use crate::templates_structs::{PageContext, TenderPageTemplate};

/// Resolve the page's tender, or the error view for the loader's status
/// code. Transport errors without a status render as 500.
fn tender_or_error(props: PageProps) -> Result<Tender, HttpResponse> {
    match props.tender {
        Some(tender) => Ok(tender),
        None => {
            let status = props
                .status_code
                .and_then(|code| StatusCode::from_u16(code).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            Err(error_page(status))
        }
    }
}

/// GET /tenders/{id}/create-proposal
/// Renders the tender summary and the proposal form.
pub async fn form(
    cache: web::Data<PageCache>,
    api: web::Data<ApiClient>,
    submitter: web::Data<Submitter>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let tender_id = path.into_inner();

    let props = cache.get_or_load(&api, tender_id);
    let tender = match tender_or_error(props) {
        Ok(tender) => tender,
        Err(response) => return Ok(response),
    };

    let ctx = PageContext::build(&session, &config);
    let tmpl = TenderPageTemplate {
        ctx,
        tender,
        description: String::new(),
        offer: String::new(),
        errors: vec![],
        submitting: submitter.is_in_flight(tender_id),
    };
    render(tmpl)
}

/// POST /tenders/{id}/create-proposal
/// Validates the form and submits the proposal to the backend.
pub async fn submit(
    cache: web::Data<PageCache>,
    api: web::Data<ApiClient>,
    submitter: web::Data<Submitter>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<ProposalForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let tender_id = path.into_inner();

    // A proposal can only be attached to a tender this page has loaded.
    let props = cache.get_or_load(&api, tender_id);
    let tender = match tender_or_error(props) {
        Ok(tender) => tender,
        Err(response) => return Ok(response),
    };

    // The payload carries the loaded tender's id, not form input.
    let payload = match form.into_payload(tender.id) {
        Ok(payload) => payload,
        Err(errors) => {
            let ctx = PageContext::build(&session, &config);
            let tmpl = TenderPageTemplate {
                ctx,
                tender,
                description: form.description.clone(),
                offer: form.offer.clone(),
                errors,
                submitting: submitter.is_in_flight(tender_id),
            };
            return render(tmpl);
        }
    };

    match submitter.submit(&payload) {
        Ok(_) => set_flash(&session, "Proposal submitted successfully"),
        Err(SubmitError::InFlight) => {
            set_flash(&session, "A submission for this tender is already in progress")
        }
        Err(SubmitError::Api(_)) => {
            // Already logged by the submitter; surface it to the user.
            set_flash(&session, "Submission failed. Please try again.")
        }
    }

    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", format!("/tenders/{tender_id}/create-proposal")))
        .finish())
}
