//! End-to-end tests against a live server with the real JPEG optimizer.

use std::io::Cursor;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use reqwest::multipart::{Form, Part};
use slimjpg_web::config::AppConfig;
use slimjpg_web::JpegOptimizer;

mod common;

use common::{embedded_payload, start_server, FakeOptimizer, Reply};

fn png_picture() -> Vec<u8> {
    let img: RgbImage = ImageBuffer::from_fn(96, 64, |x, y| {
        Rgb([(x * 2) as u8, (y * 3) as u8, ((x * y) % 256) as u8])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn test_upload_png_with_real_optimizer() {
    let server = start_server(AppConfig::default(), Arc::new(JpegOptimizer::new())).await;
    let source = png_picture();

    let form = Form::new().part(
        "picture",
        Part::bytes(source.clone())
            .file_name("gradient.png")
            .mime_str("image/png")
            .unwrap(),
    );
    let response = client()
        .post(server.url("/optimize"))
        .multipart(form)
        .send()
        .await
        .expect("server reachable");

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["x-engine"], "axum");
    let html = response.text().await.unwrap();

    let original = STANDARD
        .decode(embedded_payload(&html, "data:image/png;base64,"))
        .unwrap();
    assert_eq!(original, source);

    let optimized = STANDARD
        .decode(embedded_payload(&html, "data:image/jpeg;base64,"))
        .unwrap();
    assert!(optimized.starts_with(&[0xFF, 0xD8]));
    assert!(html.contains("The optimization was a success"));

    server.stop().await;
}

#[tokio::test]
async fn test_undecodable_upload_shows_failure() {
    let server = start_server(AppConfig::default(), Arc::new(JpegOptimizer::new())).await;

    let form = Form::new().part(
        "picture",
        Part::bytes(b"this is not an image".to_vec())
            .file_name("notes.jpg")
            .mime_str("image/jpeg")
            .unwrap(),
    );
    let response = client()
        .post(server.url("/optimize"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let html = response.text().await.unwrap();
    assert!(html.contains("The optimization failed"));
    assert!(html.contains("File an issue"));

    server.stop().await;
}

#[tokio::test]
async fn test_index_over_the_wire() {
    let server = start_server(AppConfig::default(), FakeOptimizer::new(Reply::Same)).await;

    let response = client().get(server.url("/")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-request-id"));
    assert!(response.text().await.unwrap().contains("Slim JPG"));

    server.stop().await;
}

#[tokio::test]
async fn test_form_fields_are_passed_over() {
    let optimizer = FakeOptimizer::new(Reply::Resize {
        len: 10,
        quality: 50,
    });
    let server = start_server(AppConfig::default(), optimizer.clone()).await;

    let form = Form::new()
        .text("caption", "sunset")
        .part(
            "picture",
            Part::bytes(vec![5u8; 4096])
                .file_name("sunset.jpg")
                .mime_str("image/jpeg")
                .unwrap(),
        );
    let response = client()
        .post(server.url("/optimize"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(optimizer.calls(), 1);
    assert_eq!(optimizer.sources()[0].len(), 4096);

    server.stop().await;
}
