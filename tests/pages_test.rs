//! Integration tests for the browser pages and form actions.

mod helpers;

use axum::http::{StatusCode, header};

#[tokio::test]
async fn test_index_lists_escaped_folder_names() {
    let app = helpers::TestApp::new().await;
    app.create_folder("<i>tax & co").await;

    let response = app.request("GET", "/", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(
        response
            .header(header::CONTENT_TYPE)
            .unwrap()
            .starts_with("text/html")
    );
    let page = response.text();
    assert!(page.contains("&lt;i&gt;tax &amp; co"));
    assert!(!page.contains("<i>tax"));
}

#[tokio::test]
async fn test_form_create_upload_and_delete() {
    let app = helpers::TestApp::new().await;

    let response = app.form("/folders", "name=reports").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    let location = response.header(header::LOCATION).unwrap();
    assert!(location.starts_with("/folders/"));
    let folder_id = location.trim_start_matches("/folders/").to_string();

    let response = app
        .upload(&format!("/folders/{folder_id}/upload"), "summary.txt", b"hello")
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), Some(location.clone()));

    let response = app.request("GET", &location, None).await;
    assert_eq!(response.status, StatusCode::OK);
    let page = response.text();
    assert!(page.contains("summary.txt"));
    assert!(page.contains("/view"));

    let response = app
        .request("GET", &format!("/api/folders/{folder_id}/documents"), None)
        .await;
    let document_id = response.body["data"][0]["id"].as_str().unwrap().to_string();

    let response = app
        .form(&format!("/documents/{document_id}/delete"), "")
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), Some(location));
    assert!(!app.storage_root().join("reports/summary.txt").exists());

    let response = app.form(&format!("/folders/{folder_id}/delete"), "").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION).as_deref(), Some("/"));
    assert!(!app.storage_root().join("reports").exists());
}

#[tokio::test]
async fn test_missing_folder_page_is_html_404() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("GET", "/folders/00000000-0000-0000-0000-999999999999", None)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.text().contains("NOT_FOUND"));
}

#[tokio::test]
async fn test_form_rejects_unsafe_name() {
    let app = helpers::TestApp::new().await;

    let response = app.form("/folders", "name=..%2Fescape").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.text().contains("VALIDATION_ERROR"));
}
