//! Shared test infrastructure: an in-process stand-in for the tender backend.
//!
//! The backend runs a real HTTP server on its own OS thread (port 0) so the
//! blocking API client can talk to it from plain `#[test]` functions. It
//! records every proposal it accepts and counts endpoint hits.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

use actix_web::{App, HttpResponse, HttpServer, web};
use serde_json::{Value, json};

#[derive(Clone, Default)]
pub struct BackendOptions {
    /// GET /tenders answers 500 when set.
    pub fail_listing: bool,
    /// POST /proposal answers 500 when set.
    pub fail_proposals: bool,
    /// Delay applied to POST /proposal, for in-flight assertions.
    pub proposal_delay_ms: u64,
}

struct BackendState {
    tenders: Vec<Value>,
    options: BackendOptions,
    list_hits: Arc<AtomicUsize>,
    detail_hits: Arc<AtomicUsize>,
    proposals: Arc<Mutex<Vec<Value>>>,
}

pub struct MockBackend {
    pub base_url: String,
    list_hits: Arc<AtomicUsize>,
    detail_hits: Arc<AtomicUsize>,
    proposals: Arc<Mutex<Vec<Value>>>,
}

impl MockBackend {
    pub fn list_hits(&self) -> usize {
        self.list_hits.load(Ordering::SeqCst)
    }

    pub fn detail_hits(&self) -> usize {
        self.detail_hits.load(Ordering::SeqCst)
    }

    pub fn recorded_proposals(&self) -> Vec<Value> {
        self.proposals
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// A tender record the way the backend serializes it.
pub fn tender_fixture(id: i64, title: &str, closing_at: &str) -> Value {
    json!({
        "ID": id,
        "Buyer_ID": 1,
        "Buyer": {
            "ID": 1,
            "Name": "Acme Constructions",
            "Logo": "",
            "Description": "",
            "State_ID": 1,
            "City_ID": 1,
        },
        "PublishedAt": "2022-03-01",
        "ClosingAt": closing_at,
        "Title": title,
        "Description": "Description",
        "HeadingImage": "https://example.com/heading.jpg",
        "State_ID": 1,
        "State": { "ID": 1, "Name": "City", "Acronym": "CIT" },
        "City_ID": 1,
        "City": { "ID": 1, "Name": "Cool City", "State_ID": 1 },
        "Offer": 2323.23,
        "SupplyCategories": [
            { "ID": 1, "Name": "Concrete", "Description": "" },
        ],
        "DeletedAt": null,
        "CreatedAt": "2022-03-01",
        "UpdatedAt": "2022-03-01",
    })
}

pub fn default_tenders() -> Vec<Value> {
    vec![
        tender_fixture(1, "Road resurfacing", "2022-05-10"),
        tender_fixture(2, "X", "2021-04-29"),
    ]
}

pub fn spawn_backend() -> MockBackend {
    spawn_backend_with(default_tenders(), BackendOptions::default())
}

pub fn spawn_backend_with(tenders: Vec<Value>, options: BackendOptions) -> MockBackend {
    let list_hits = Arc::new(AtomicUsize::new(0));
    let detail_hits = Arc::new(AtomicUsize::new(0));
    let proposals = Arc::new(Mutex::new(Vec::new()));

    let state = web::Data::new(BackendState {
        tenders,
        options,
        list_hits: list_hits.clone(),
        detail_hits: detail_hits.clone(),
        proposals: proposals.clone(),
    });

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        actix_web::rt::System::new().block_on(async move {
            let server = HttpServer::new(move || {
                App::new()
                    .app_data(state.clone())
                    .route("/tenders", web::get().to(list_tenders))
                    .route("/tenders/{id}", web::get().to(get_tender))
                    .route("/proposal", web::post().to(create_proposal))
            })
            .workers(1)
            .bind(("127.0.0.1", 0))
            .expect("bind mock backend");
            let addr = server.addrs()[0];
            tx.send(addr).expect("report mock backend addr");
            server.run().await.expect("mock backend stopped");
        });
    });

    let addr = rx.recv().expect("mock backend failed to start");
    MockBackend {
        base_url: format!("http://{addr}"),
        list_hits,
        detail_hits,
        proposals,
    }
}

async fn list_tenders(state: web::Data<BackendState>) -> HttpResponse {
    state.list_hits.fetch_add(1, Ordering::SeqCst);
    if state.options.fail_listing {
        return HttpResponse::InternalServerError().finish();
    }
    HttpResponse::Ok().json(&state.tenders)
}

async fn get_tender(state: web::Data<BackendState>, path: web::Path<i64>) -> HttpResponse {
    state.detail_hits.fetch_add(1, Ordering::SeqCst);
    let id = path.into_inner();
    let found = state
        .tenders
        .iter()
        .find(|t| t.get("ID").and_then(Value::as_i64) == Some(id));
    match found {
        Some(tender) => HttpResponse::Ok().json(tender),
        None => HttpResponse::NotFound().finish(),
    }
}

async fn create_proposal(state: web::Data<BackendState>, body: web::Json<Value>) -> HttpResponse {
    if state.options.proposal_delay_ms > 0 {
        actix_web::rt::time::sleep(Duration::from_millis(state.options.proposal_delay_ms)).await;
    }
    if state.options.fail_proposals {
        return HttpResponse::InternalServerError().finish();
    }
    state
        .proposals
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .push(body.into_inner());
    HttpResponse::Ok().json(json!({ "Status": "created" }))
}
