//! End-to-end tests of `HttpApi` and `Portal` against an in-process backend.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde_json::{json, Value};

use bloodportal::config::ApiConfig;
use bloodportal::portal::{ADD_DONOR_FAILED, SAVE_DONATION_FAILED};
use bloodportal::render;
use bloodportal::{DonorApi, Error, FormState, HttpApi, Portal};

#[derive(Debug, Default)]
struct Store {
    donors: Vec<Value>,
    donations: Vec<Value>,
    next_id: u32,
    reject_writes: bool,
    requests: Vec<(String, Value)>,
}

type Shared = Arc<Mutex<Store>>;

impl Store {
    fn id(&mut self) -> String {
        self.next_id += 1;
        format!("65f{:05}", self.next_id)
    }
}

fn rejected() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "write failed"})),
    )
        .into_response()
}

async fn list_donors(State(store): State<Shared>) -> Json<Value> {
    Json(Value::Array(store.lock().unwrap().donors.clone()))
}

async fn create_donor(State(store): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut store = store.lock().unwrap();
    store.requests.push(("create_donor".to_string(), body.clone()));
    if store.reject_writes {
        return rejected();
    }
    let mut donor = body;
    donor["_id"] = Value::String(store.id());
    store.donors.push(donor);
    Json(json!({"status": "Donor added"})).into_response()
}

async fn delete_donor(State(store): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut store = store.lock().unwrap();
    store.requests.push(("delete_donor".to_string(), body.clone()));
    if store.reject_writes {
        return rejected();
    }
    let id = body["id"].clone();
    store.donors.retain(|d| d["_id"] != id);
    Json(json!({"status": "Donor deleted"})).into_response()
}

async fn list_donations(State(store): State<Shared>) -> Json<Value> {
    let store = store.lock().unwrap();
    let expanded: Vec<Value> = store
        .donations
        .iter()
        .map(|n| {
            let mut n = n.clone();
            if n.get("donor").is_none() {
                let donor = store
                    .donors
                    .iter()
                    .find(|d| d["_id"] == n["donorId"])
                    .map_or(Value::Null, |d| json!({"_id": d["_id"], "name": d["name"]}));
                n["donor"] = donor;
            }
            // Stored the way a document database returns dates.
            if let Some(day) = n["date"].as_str().map(str::to_string) {
                n["date"] = Value::String(format!("{day}T00:00:00.000Z"));
            }
            n
        })
        .collect();
    Json(Value::Array(expanded))
}

async fn create_donation(State(store): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut store = store.lock().unwrap();
    store.requests.push(("create_donation".to_string(), body.clone()));
    if store.reject_writes {
        return rejected();
    }
    let mut donation = body;
    donation["_id"] = Value::String(store.id());
    store.donations.push(donation);
    Json(json!({"status": "Donation saved"})).into_response()
}

async fn spawn_backend() -> (SocketAddr, Shared) {
    let store = Shared::default();
    let app = Router::new()
        .route("/api/donors", get(list_donors).post(create_donor))
        .route("/api/donors/delete", post(delete_donor))
        .route("/api/donations", get(list_donations).post(create_donation))
        .with_state(store.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, store)
}

fn client(addr: SocketAddr) -> HttpApi {
    HttpApi::new(&ApiConfig {
        base_url: format!("http://{addr}"),
        timeout_secs: Some(5),
    })
    .unwrap()
}

#[tokio::test]
async fn test_empty_backend_lists() {
    let (addr, _store) = spawn_backend().await;
    let api = client(addr);

    assert!(api.list_donors().await.unwrap().is_empty());
    assert!(api.list_donations().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_donor_lifecycle_through_portal() {
    let (addr, store) = spawn_backend().await;
    let mut portal = Portal::new(client(addr));
    portal.load().await;
    assert!(portal.donors().is_empty());

    let form = portal.donor_form_mut();
    form.name = "Asha Rao".to_string();
    form.blood_group = "O+".to_string();
    form.city = "Pune".to_string();
    portal.create_donor().await.unwrap();

    assert_eq!(portal.message(), Some("Donor added"));
    assert_eq!(portal.donors().len(), 1);
    let donor = portal.donors()[0].clone();
    assert_eq!(donor.name, "Asha Rao");
    assert_eq!(donor.blood_group, "O+");
    assert_eq!(donor.city.as_deref(), Some("Pune"));
    assert!(portal.donor_form().name.is_empty());

    {
        let store = store.lock().unwrap();
        let (op, body) = &store.requests[0];
        assert_eq!(op, "create_donor");
        assert_eq!(body, &json!({"name": "Asha Rao", "bloodGroup": "O+", "city": "Pune"}));
    }

    portal.delete_donor(&donor.id).await.unwrap();
    assert_eq!(portal.message(), Some("Donor deleted"));
    assert!(portal.donors().iter().all(|d| d.id != donor.id));

    let store = store.lock().unwrap();
    assert_eq!(store.requests[1].1, json!({"id": donor.id}));
}

#[tokio::test]
async fn test_donation_lifecycle_through_portal() {
    let (addr, store) = spawn_backend().await;
    let api = client(addr);
    store.lock().unwrap().donors.push(json!({
        "_id": "d1",
        "name": "Asha",
        "bloodGroup": "A+"
    }));
    let mut portal = Portal::new(api);
    portal.load().await;
    assert_eq!(portal.donor_options()[0].label, "Asha (A+)");

    let form = portal.donation_form_mut();
    form.donor_id = "d1".to_string();
    form.quantity = 2;
    form.date = NaiveDate::from_ymd_opt(2024, 6, 14);
    form.location = "City Hospital".to_string();
    portal.create_donation().await.unwrap();

    assert_eq!(portal.message(), Some("Donation saved"));
    assert_eq!(portal.donation_form().quantity, 1);

    let donations = portal.donations();
    assert_eq!(donations.len(), 1);
    assert_eq!(donations[0].quantity, 2);
    assert_eq!(donations[0].date, NaiveDate::from_ymd_opt(2024, 6, 14));
    assert_eq!(donations[0].location.as_deref(), Some("City Hospital"));
    assert_eq!(donations[0].donor_name(), Some("Asha"));

    let store = store.lock().unwrap();
    assert_eq!(
        store.requests[0].1,
        json!({"donorId": "d1", "quantity": 2, "date": "2024-06-14", "location": "City Hospital"})
    );
}

#[tokio::test]
async fn test_rejected_writes_surface_fixed_messages() {
    let (addr, store) = spawn_backend().await;
    store.lock().unwrap().reject_writes = true;
    let mut portal = Portal::new(client(addr));

    portal.donor_form_mut().name = "Ben".to_string();
    portal.donor_form_mut().blood_group = "B-".to_string();
    let err = portal.create_donor().await.unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(portal.message(), Some(ADD_DONOR_FAILED));
    assert_eq!(portal.donor_form().name, "Ben");
    assert_eq!(portal.donor_form_state(), FormState::Failed);

    let form = portal.donation_form_mut();
    form.donor_id = "d1".to_string();
    form.date = NaiveDate::from_ymd_opt(2024, 1, 1);
    portal.create_donation().await.unwrap_err();
    assert_eq!(portal.message(), Some(SAVE_DONATION_FAILED));
    assert_eq!(portal.donation_form().donor_id, "d1");
}

#[tokio::test]
async fn test_odd_donation_rows_keep_the_rest_of_the_list() {
    let (addr, store) = spawn_backend().await;
    {
        let mut store = store.lock().unwrap();
        store.donors.push(json!({"_id": "d1", "name": "Asha", "bloodGroup": "A+"}));
        store.donations.push(json!({
            "_id": "n1", "donorId": "d1", "quantity": 1, "date": "2024-06-01"
        }));
        store.donations.push(json!({
            "_id": "n2", "donor": {"_id": "d9"}, "quantity": 2, "date": null
        }));
        store.donations.push(json!({
            "_id": "n3", "donorId": "d1", "quantity": "3", "date": "2024-06-03"
        }));
    }
    let mut portal = Portal::new(client(addr));

    portal.refresh_donations().await;

    let donations = portal.donations();
    assert_eq!(donations.len(), 3);
    assert_eq!(donations[0].donor_name(), Some("Asha"));
    assert_eq!(donations[1].donor_name(), None);
    assert!(donations[1].date.is_none());
    assert_eq!(donations[2].quantity, 3);

    let table = render::donation_table(donations).to_string();
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines[3], "2  —      2    —");
}

#[tokio::test]
async fn test_unknown_route_is_http_error() {
    let (addr, _store) = spawn_backend().await;
    let api = HttpApi::new(&ApiConfig {
        base_url: format!("http://{addr}/v2"),
        timeout_secs: None,
    })
    .unwrap();

    let err = api.list_donors().await.unwrap_err();
    assert!(matches!(err, Error::Http { status, .. } if status == reqwest::StatusCode::NOT_FOUND));
}
