mod common;

use serde_json::{json, Value};

#[tokio::test]
async fn templates_are_listed_with_their_fields() {
    let app = common::spawn_app().await;

    let response = app.get("/templates").await;
    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    let templates = body["templates"].as_array().unwrap();
    let ids: Vec<_> = templates.iter().map(|t| t["id"].as_str().unwrap()).collect();
    assert_eq!(
        ids,
        vec![
            "caste_certificate_application",
            "police_complaint",
            "rti_application"
        ]
    );

    let complaint = &templates[1];
    assert_eq!(complaint["title"], "Police Complaint");
    let fields: Vec<_> = complaint["fields"]
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect();
    assert_eq!(
        fields,
        vec!["name", "address", "police_station", "incident_date", "details"]
    );
}

#[tokio::test]
async fn generated_document_can_be_downloaded() {
    let app = common::spawn_app().await;

    let response = app
        .post_json(
            "/document/generate",
            &json!({
                "template_name": "police_complaint",
                "user_inputs": {
                    "name": "John Doe",
                    "address": "12 MG Road, Pune",
                    "police_station": "Shivajinagar Police Station",
                    "incident_date": "1 October 2026",
                    "details": "My bicycle was stolen from the building parking."
                },
                "user_query": "Draft a complaint about my stolen bicycle"
            }),
        )
        .await;
    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Document generated successfully");
    let preview = body["content_preview"].as_str().unwrap();
    assert!(preview.contains("I, John Doe, residing at 12 MG Road, Pune"));
    assert!(preview.chars().count() <= 500);

    let pdf_url = body["pdf_url"].as_str().unwrap();
    assert!(pdf_url.starts_with(&format!("{}/generated_documents/police_complaint_", app.address)));
    assert!(pdf_url.ends_with(".pdf"));

    let download = app.client.get(pdf_url).send().await.unwrap();
    assert_eq!(200, download.status().as_u16());
    let bytes = download.bytes().await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    let file_name = pdf_url.rsplit('/').next().unwrap();
    assert!(app.output_dir.join(file_name).exists());
}

#[tokio::test]
async fn missing_fields_are_left_blank() {
    let app = common::spawn_app().await;

    let body: Value = app
        .post_json(
            "/document/generate",
            &json!({
                "template_name": "rti_application",
                "user_inputs": {"applicant_name": "Meera Iyer"}
            }),
        )
        .await
        .json()
        .await
        .unwrap();

    let preview = body["content_preview"].as_str().unwrap();
    assert!(preview.contains("1. Name of the applicant: Meera Iyer"));
    assert!(preview.contains("2. Address: __________"));
}

#[tokio::test]
async fn unknown_template_is_not_found() {
    let app = common::spawn_app().await;

    let response = app
        .post_json(
            "/document/generate",
            &json!({"template_name": "divorce_petition", "user_inputs": {}}),
        )
        .await;

    assert_eq!(404, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("divorce_petition"));
}

#[tokio::test]
async fn template_name_cannot_escape_the_templates_dir() {
    let app = common::spawn_app().await;

    let response = app
        .post_json(
            "/document/generate",
            &json!({"template_name": "../Cargo", "user_inputs": {}}),
        )
        .await;

    assert_eq!(400, response.status().as_u16());
}
