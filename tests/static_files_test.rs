mod common;

use axum::http::StatusCode;
use common::TestApp;
use std::path::Path;

#[tokio::test]
async fn root_serves_the_public_index_page() {
    let app = TestApp::spawn().await;

    let index = "<!doctype html><title>vision qa</title><h1>Ask about an image</h1>";
    tokio::fs::write(Path::new(&app.public_dir).join("index.html"), index)
        .await
        .expect("Failed to write index page");

    let response = reqwest::get(format!("{}/", app.address))
        .await
        .expect("Failed to execute request.");

    assert_eq!(StatusCode::OK, response.status());
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Ask about an image"));

    app.cleanup().await;
}

#[tokio::test]
async fn named_static_files_are_served() {
    let app = TestApp::spawn().await;

    tokio::fs::write(Path::new(&app.public_dir).join("app.css"), "body{margin:0}")
        .await
        .expect("Failed to write stylesheet");

    let response = reqwest::get(format!("{}/app.css", app.address))
        .await
        .expect("Failed to execute request.");

    assert_eq!(StatusCode::OK, response.status());
    assert_eq!(
        "body{margin:0}",
        response.text().await.expect("Failed to read body")
    );

    app.cleanup().await;
}

#[tokio::test]
async fn unknown_paths_fall_through_to_not_found() {
    let app = TestApp::spawn().await;

    let response = reqwest::get(format!("{}/no-such-page.html", app.address))
        .await
        .expect("Failed to execute request.");

    assert_eq!(StatusCode::NOT_FOUND, response.status());

    app.cleanup().await;
}
