//! HTTP-level tests covering the full request path: bearer auth, handlers,
//! domain services and the in-memory store, mounted exactly as production
//! mounts them.

use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::{App, Error, test, web};
use serde_json::{Value, json};

use bhulekh_backend::server::{AppSettings, build_http_state};

const CITIZEN: (&str, &str) = ("Authorization", "Bearer tok-citizen");
const OTHER_CITIZEN: (&str, &str) = ("Authorization", "Bearer tok-other");
const REGISTRAR: (&str, &str) = ("Authorization", "Bearer tok-registrar");

fn settings() -> AppSettings {
    AppSettings {
        auth_tokens: Some(vec![
            "tok-citizen=user-1".to_owned(),
            "tok-other=user-9".to_owned(),
            "tok-registrar=registrar-1:registrar".to_owned(),
        ]),
        ..AppSettings::default()
    }
}

async fn spawn_app()
-> impl Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = Error> {
    let state = build_http_state(&settings()).expect("state builds");
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/v1").configure(bhulekh_backend::server::configure_api)),
    )
    .await
}

async fn register_property<S>(app: &S, survey: &str) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/properties")
        .insert_header(CITIZEN)
        .set_json(json!({
            "surveyNumber": survey,
            "address": "12 MG Road",
            "areaSqft": 1200,
        }))
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    test::read_body_json(res).await
}

async fn create_mutation<S>(app: &S, property_id: &str, new_owner: &str) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/mutations")
        .insert_header(CITIZEN)
        .set_json(json!({
            "propertyId": property_id,
            "newOwnerId": new_owner,
            "reason": "Sale",
        }))
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    test::read_body_json(res).await
}

async fn approve<S>(app: &S, mutation_id: &str) -> ServiceResponse<BoxBody>
where
    S: Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/mutations/{mutation_id}/approve"))
        .insert_header(REGISTRAR)
        .set_json(json!({}))
        .to_request();
    test::call_service(app, req).await
}

#[actix_web::test]
async fn transfer_scenario_end_to_end() {
    let app = spawn_app().await;

    let property = register_property(&app, "45/2").await;
    let property_id = property["id"].as_str().expect("property id").to_owned();
    assert_eq!(property["ownerId"], json!("user-1"));

    let mutation = create_mutation(&app, &property_id, "user-9").await;
    assert_eq!(mutation["status"], json!("pending"));
    let mutation_id = mutation["id"].as_str().expect("mutation id").to_owned();

    let res = approve(&app, &mutation_id).await;
    assert_eq!(res.status(), StatusCode::OK);
    let approved: Value = test::read_body_json(res).await;
    assert_eq!(approved["status"], json!("approved"));
    assert!(approved["approvedDate"].is_string());
    // 1200 sq ft at the default schedule.
    assert_eq!(approved["stampDutyInr"], json!(210_000));
    assert_eq!(approved["registrationFeeInr"], json!(42_000));
    assert!(
        approved["registryNumber"]
            .as_str()
            .is_some_and(|n| n.starts_with("EREG/"))
    );

    // Ownership moved exactly once; the new owner sees the parcel now.
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/properties/{property_id}"))
        .insert_header(OTHER_CITIZEN)
        .to_request();
    let reloaded: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reloaded["ownerId"], json!("user-9"));

    // A second approval of the same mutation is an invalid state, and the
    // owner does not change again.
    let res = approve(&app, &mutation_id).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let err: Value = test::read_body_json(res).await;
    assert_eq!(err["code"], json!("invalid_state"));
}

#[actix_web::test]
async fn writes_require_a_known_bearer_token() {
    let app = spawn_app().await;

    let no_token = test::TestRequest::post()
        .uri("/api/v1/properties")
        .set_json(json!({
            "surveyNumber": "1/1",
            "address": "somewhere",
            "areaSqft": 100,
        }))
        .to_request();
    let res = test::call_service(&app, no_token).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let bad_token = test::TestRequest::get()
        .uri("/api/v1/properties")
        .insert_header((header::AUTHORIZATION, "Bearer who-is-this"))
        .to_request();
    let res = test::call_service(&app, bad_token).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn duplicate_survey_numbers_are_rejected_with_400() {
    let app = spawn_app().await;
    register_property(&app, "123/456").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/properties")
        .insert_header(CITIZEN)
        .set_json(json!({
            "surveyNumber": "123/456",
            "address": "elsewhere",
            "areaSqft": 900,
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: Value = test::read_body_json(res).await;
    assert_eq!(err["code"], json!("invalid_request"));
}

#[actix_web::test]
async fn zero_area_registrations_are_rejected() {
    let app = spawn_app().await;
    let req = test::TestRequest::post()
        .uri("/api/v1/properties")
        .insert_header(CITIZEN)
        .set_json(json!({
            "surveyNumber": "7/7",
            "address": "nowhere",
            "areaSqft": 0,
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn uploaded_documents_verify_by_exact_hash_only() {
    let app = spawn_app().await;
    let property = register_property(&app, "45/3").await;
    let property_id = property["id"].as_str().expect("property id");

    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/v1/properties/{property_id}/documents?documentType=sale_deed&fileName=deed.pdf"
        ))
        .insert_header(CITIZEN)
        .set_payload(&b"registered sale deed bytes"[..])
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let document: Value = test::read_body_json(res).await;
    let hash = document["contentHash"].as_str().expect("content hash");
    assert_eq!(hash.len(), 64);

    // Public verification by the exact hash succeeds without a token.
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/verify/document?hash={hash}"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    // A prefix (padded back to 64 chars) must not attest.
    let truncated = format!("{}{}", &hash[..32], "0".repeat(32));
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/verify/document?hash={truncated}"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // The parcel record tracks the latest upload.
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/properties/{property_id}"))
        .insert_header(CITIZEN)
        .to_request();
    let reloaded: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reloaded["titleDocumentHash"], json!(hash));
}

#[actix_web::test]
async fn oversize_uploads_fail_with_400() {
    let app = spawn_app().await;
    let property = register_property(&app, "45/4").await;
    let property_id = property["id"].as_str().expect("property id");

    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/v1/properties/{property_id}/documents?documentType=other&fileName=big.bin"
        ))
        .insert_header(CITIZEN)
        .set_payload(vec![0_u8; 11 * 1024 * 1024])
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn unknown_document_types_fail_with_400() {
    let app = spawn_app().await;
    let property = register_property(&app, "45/5").await;
    let property_id = property["id"].as_str().expect("property id");

    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/v1/properties/{property_id}/documents?documentType=passport&fileName=p.pdf"
        ))
        .insert_header(CITIZEN)
        .set_payload(&b"bytes"[..])
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn citizens_cannot_approve_mutations() {
    let app = spawn_app().await;
    let property = register_property(&app, "45/6").await;
    let property_id = property["id"].as_str().expect("property id");
    let mutation = create_mutation(&app, property_id, "user-9").await;
    let mutation_id = mutation["id"].as_str().expect("mutation id");

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/mutations/{mutation_id}/approve"))
        .insert_header(CITIZEN)
        .set_json(json!({}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn no_op_transfers_are_rejected() {
    let app = spawn_app().await;
    let property = register_property(&app, "45/7").await;
    let property_id = property["id"].as_str().expect("property id");

    let req = test::TestRequest::post()
        .uri("/api/v1/mutations")
        .insert_header(CITIZEN)
        .set_json(json!({
            "propertyId": property_id,
            "newOwnerId": "user-1",
            "reason": "Sale",
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn cancelled_mutations_leave_listings_but_stay_retrievable() {
    let app = spawn_app().await;
    let property = register_property(&app, "45/8").await;
    let property_id = property["id"].as_str().expect("property id");
    let mutation = create_mutation(&app, property_id, "user-9").await;
    let mutation_id = mutation["id"].as_str().expect("mutation id");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/mutations/{mutation_id}"))
        .insert_header(CITIZEN)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let cancelled: Value = test::read_body_json(res).await;
    assert_eq!(cancelled["status"], json!("cancelled"));
    assert!(cancelled["cancelledDate"].is_string());

    // Cancelling again is an invalid state.
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/mutations/{mutation_id}"))
        .insert_header(CITIZEN)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Gone from the default listing, still retrievable by id.
    let req = test::TestRequest::get()
        .uri("/api/v1/mutations")
        .insert_header(CITIZEN)
        .to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(0));

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/mutations/{mutation_id}"))
        .insert_header(CITIZEN)
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["status"], json!("cancelled"));
}

#[actix_web::test]
async fn cancelling_an_approved_mutation_fails() {
    let app = spawn_app().await;
    let property = register_property(&app, "45/9").await;
    let property_id = property["id"].as_str().expect("property id");
    let mutation = create_mutation(&app, property_id, "user-9").await;
    let mutation_id = mutation["id"].as_str().expect("mutation id").to_owned();

    let res = approve(&app, &mutation_id).await;
    assert_eq!(res.status(), StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/mutations/{mutation_id}"))
        .insert_header(CITIZEN)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn rejection_records_the_reason_and_leaves_the_owner() {
    let app = spawn_app().await;
    let property = register_property(&app, "46/1").await;
    let property_id = property["id"].as_str().expect("property id");
    let mutation = create_mutation(&app, property_id, "user-9").await;
    let mutation_id = mutation["id"].as_str().expect("mutation id");

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/mutations/{mutation_id}/reject"))
        .insert_header(REGISTRAR)
        .set_json(json!({ "reason": "Incomplete documentation" }))
        .to_request();
    let rejected: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(rejected["status"], json!("rejected"));
    assert_eq!(rejected["rejectionReason"], json!("Incomplete documentation"));

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/properties/{property_id}"))
        .insert_header(CITIZEN)
        .to_request();
    let reloaded: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reloaded["ownerId"], json!("user-1"));
}

#[actix_web::test]
async fn verification_endpoints_are_public_and_case_insensitive() {
    let app = spawn_app().await;
    let property = register_property(&app, "46/2").await;
    let property_id = property["id"].as_str().expect("property id");
    let mutation = create_mutation(&app, property_id, "user-9").await;
    let transaction_id = mutation["transactionId"]
        .as_str()
        .expect("transaction id")
        .to_owned();

    // Survey lookup without any token.
    let req = test::TestRequest::get()
        .uri("/api/v1/verify/property?surveyNumber=46/2")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    // Transaction lookup accepts lowercase.
    let lowered = transaction_id.to_ascii_lowercase();
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/verify/transaction?id={lowered}"))
        .to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found["transactionId"], json!(transaction_id));

    // Unknown survey numbers are a plain 404.
    let req = test::TestRequest::get()
        .uri("/api/v1/verify/property?surveyNumber=999/999")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn citizens_only_see_their_own_records() {
    let app = spawn_app().await;
    let property = register_property(&app, "46/3").await;
    let property_id = property["id"].as_str().expect("property id");

    // The other citizen cannot read the parcel...
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/properties/{property_id}"))
        .insert_header(OTHER_CITIZEN)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // ...and their listing is empty while the owner sees one parcel.
    let req = test::TestRequest::get()
        .uri("/api/v1/properties")
        .insert_header(OTHER_CITIZEN)
        .to_request();
    let theirs: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(theirs.as_array().map(Vec::len), Some(0));

    let req = test::TestRequest::get()
        .uri("/api/v1/properties")
        .insert_header(CITIZEN)
        .to_request();
    let mine: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(mine.as_array().map(Vec::len), Some(1));
}
