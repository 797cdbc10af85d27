use actix_session::Session;
use askama::Template;

use crate::config::AppConfig;
use crate::csrf;
use crate::models::tender::Tender;
use crate::session::take_flash;

/// Common context shared by all pages.
/// Templates access these as `ctx.app_name`, `ctx.flash`, etc.
pub struct PageContext {
    pub app_name: String,
    pub host: String,
    pub flash: Option<String>,
    pub csrf_token: String,
}

impl PageContext {
    pub fn build(session: &Session, config: &AppConfig) -> Self {
        Self {
            app_name: config.app_name.clone(),
            host: config.host.clone(),
            flash: take_flash(session),
            csrf_token: csrf::get_or_create_token(session),
        }
    }
}

#[derive(Template)]
#[template(path = "tenders/list.html")]
pub struct TenderListTemplate {
    pub ctx: PageContext,
    pub tenders: Vec<Tender>,
}

#[derive(Template)]
#[template(path = "tenders/detail.html")]
pub struct TenderPageTemplate {
    pub ctx: PageContext,
    pub tender: Tender,
    /// Entered form values, echoed back on a validation re-render.
    pub description: String,
    pub offer: String,
    pub errors: Vec<String>,
    /// True while a submission for this tender is in flight.
    pub submitting: bool,
}

#[derive(Template)]
#[template(path = "errors/error.html")]
pub struct ErrorPageTemplate {
    pub status_code: u16,
}
