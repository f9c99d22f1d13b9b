//! End-to-end registration: typing, address lookup, submission.

use cadastro::lookup::{LookupOutcome, RetryPolicy, ViaCepClient};
use cadastro::{Field, FormSession, SubmissionOutcome, SubmissionState};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn viacep_body(cep: &str, street: &str, district: &str) -> serde_json::Value {
    serde_json::json!({
        "cep": cep,
        "logradouro": street,
        "complemento": "",
        "bairro": district,
        "localidade": "São Paulo",
        "uf": "SP"
    })
}

async fn directory(server: &MockServer) -> Arc<ViaCepClient> {
    let client = ViaCepClient::with_base_url(server.uri(), Duration::from_secs(2))
        .expect("client build")
        .with_retry_policy(RetryPolicy::immediate(2));
    Arc::new(client)
}

#[tokio::test]
async fn typed_postal_code_fills_address_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ws/01001000/json/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(viacep_body("01001-000", "Praça da Sé", "Sé")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut session = FormSession::new(directory(&server).await);
    session.change(Field::Street, "Rua que eu digitei");

    let mut outcomes = Vec::new();
    for c in "010010009".chars() {
        if let Some(request) = session.input_char(Field::PostalCode, c) {
            outcomes.push(session.run_lookup(request).await);
        }
    }

    assert_eq!(outcomes, vec![LookupOutcome::Applied]);
    assert_eq!(session.record().postal_code, "01001-000");
    assert_eq!(session.record().street, "Praça da Sé");
    assert_eq!(session.record().district, "Sé");
    assert!(session.lookup().error().is_none());
}

#[tokio::test]
async fn stale_lookup_never_overwrites_newer_address() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ws/01001000/json/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(viacep_body("01001-000", "Praça da Sé", "Sé"))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ws/02002000/json/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(viacep_body("02002-000", "Rua Dr. Olavo Egídio", "Santana")),
        )
        .mount(&server)
        .await;

    let client = directory(&server).await;
    let mut session = FormSession::new(Arc::clone(&client));

    let first = session.change(Field::PostalCode, "01001000").expect("first lookup");
    let second = session.change(Field::PostalCode, "02002000").expect("second lookup");

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    for request in [first, second] {
        let client = Arc::clone(&client);
        let tx = tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(request.send(&*client).await);
        });
    }
    drop(tx);

    let mut applied = Vec::new();
    while let Some(response) = rx.recv().await {
        let postal_code = response.request().postal_code().to_string();
        applied.push((postal_code, session.apply_lookup(response)));
    }

    assert_eq!(
        applied,
        vec![
            ("02002000".to_string(), LookupOutcome::Applied),
            ("01001000".to_string(), LookupOutcome::Superseded),
        ]
    );
    assert_eq!(session.record().postal_code, "02002-000");
    assert_eq!(session.record().street, "Rua Dr. Olavo Egídio");
    assert_eq!(session.record().district, "Santana");
}

#[tokio::test]
async fn complete_registration_submits_normalized_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ws/01001000/json/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(viacep_body("01001-000", "Praça da Sé", "Sé")),
        )
        .mount(&server)
        .await;

    let mut session = FormSession::new(directory(&server).await);

    session.change(Field::FullName, "Maria da Silva");
    session.change(Field::DocumentNumber, "123.456.789-00");
    session.change(Field::Birthdate, "15/03/1990");
    session.change(Field::Email, "maria@example.com");
    session.change(Field::Phone, "11987654321");
    let outcome = session.change_and_lookup(Field::PostalCode, "01001000").await;
    assert_eq!(outcome, Some(LookupOutcome::Applied));
    session.change(Field::AddressNumber, "100");
    session.change(Field::Country, "Brasil");
    session.change(Field::EducationLevel, "Ensino superior completo");
    session.change(Field::Income, "325050");
    session.change(Field::Password, "s3nha-segura");
    session.change(Field::ConfirmPassword, "s3nha-segura");

    let outcome = session.submit_on(today()).expect("normalize");
    let SubmissionOutcome::Accepted(submission) = outcome else {
        panic!("rejected: {:?}", session.errors());
    };

    assert_eq!(submission.payload.document_number, "12345678900");
    assert_eq!(submission.payload.postal_code, "01001000");
    assert_eq!(submission.payload.phone, "11987654321");
    assert_eq!(submission.payload.income, 3250.5);
    assert_eq!(submission.payload.street, "Praça da Sé");
    assert_eq!(submission.record.income, "R$\u{a0}3.250,50");

    let summary = submission.summary();
    assert_eq!(summary.sections.len(), 3);
    assert!(matches!(session.state(), SubmissionState::Confirmed(_)));
}

#[tokio::test]
async fn not_found_lets_user_enter_address_manually() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "erro": "true" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = FormSession::new(directory(&server).await);
    session.change(Field::City, "Campinas");

    let outcome = session.change_and_lookup(Field::PostalCode, "13000-000").await;

    assert_eq!(outcome, Some(LookupOutcome::NotFound));
    assert_eq!(session.record().city, "Campinas");
    assert_eq!(
        session.field(Field::PostalCode).error.as_deref(),
        Some("postal code not found")
    );

    session.change(Field::Street, "Rua Manual");
    assert_eq!(session.record().street, "Rua Manual");
}
