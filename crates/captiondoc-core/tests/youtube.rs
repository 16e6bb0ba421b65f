use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use axum::{Router, http::StatusCode, routing::get};
use tokio::net::TcpListener;

use captiondoc_core::{
    CaptionDocError, CaptionEntry, HostingConfig, MetadataSource, TranscriptSource, VideoId,
    YoutubeClient, generate_documents,
};

const WATCH_PAGE: &str = r#"<html><script>var ytInitialPlayerResponse = {"playabilityStatus":{"status":"OK"},"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"BASE/api/timedtext?v=abc123&lang=en","languageCode":"en"}],"audioTracks":[{"defaultCaptionTrackIndex":0}]}}};</script></html>"#;

const TIMEDTEXT: &str = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.4" dur="1">Hello</text><text start="75.2" dur="1">World</text></transcript>"#;

/// Binds a local listener and serves the router built for its base URL.
async fn serve(build: impl FnOnce(&str) -> Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let app = build(&base);
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    base
}

fn client_for(base: &str) -> YoutubeClient {
    YoutubeClient::new(HostingConfig {
        watch_url: format!("{base}/watch"),
        oembed_url: format!("{base}/oembed"),
        ..HostingConfig::default()
    })
    .unwrap()
}

fn video() -> VideoId {
    VideoId::new("abc123").unwrap()
}

fn oembed_status(status: StatusCode) -> Router {
    Router::new().route("/oembed", get(move || async move { (status, "Not Found") }))
}

fn watch_page_with_track(base: &str, timedtext: &'static str) -> Router {
    let page = WATCH_PAGE.replace("BASE", base);
    Router::new()
        .route(
            "/oembed",
            get(|| async { r#"{"title":"Test Video","thumbnail_url":"https://i.ytimg.com/vi/abc123/hqdefault.jpg"}"# }),
        )
        .route("/watch", get(move || async move { page }))
        .route("/api/timedtext", get(move || async move { timedtext }))
}

#[tokio::test]
async fn unknown_video_is_a_metadata_failure() {
    for (status, expected) in [
        (StatusCode::NOT_FOUND, "does not exist"),
        (StatusCode::BAD_REQUEST, "does not exist"),
        (StatusCode::UNAUTHORIZED, "private"),
        (StatusCode::FORBIDDEN, "private"),
        (StatusCode::INTERNAL_SERVER_ERROR, "unexpected response status"),
    ] {
        let base = serve(|_| oembed_status(status)).await;

        let err = client_for(&base)
            .resolve_metadata(&video())
            .await
            .expect_err("non-2xx oEmbed response");

        match err {
            CaptionDocError::MetadataLookup { message } => {
                assert!(message.contains(expected), "{status}: {message}");
            }
            other => panic!("{status}: unexpected error: {other}"),
        }
    }
}

#[tokio::test]
async fn metadata_is_read_from_oembed() {
    let base = serve(|base| watch_page_with_track(base, TIMEDTEXT)).await;

    let metadata = client_for(&base).resolve_metadata(&video()).await.unwrap();

    assert_eq!(metadata.title, "Test Video");
    assert_eq!(
        metadata.thumbnail_url.as_deref(),
        Some("https://i.ytimg.com/vi/abc123/hqdefault.jpg")
    );
}

#[tokio::test]
async fn nonexistent_video_never_reaches_the_watch_page() {
    let watch_hits = Arc::new(AtomicUsize::new(0));
    let hits = watch_hits.clone();
    let base = serve(move |_| {
        oembed_status(StatusCode::NOT_FOUND).route(
            "/watch",
            get(move || async move {
                hits.fetch_add(1, Ordering::SeqCst);
                "<html></html>"
            }),
        )
    })
    .await;
    let client = client_for(&base);

    let err = generate_documents(&video(), &client, &client)
        .await
        .expect_err("oEmbed 404 stops the pipeline");

    assert!(matches!(err, CaptionDocError::MetadataLookup { ref message } if !message.is_empty()));
    assert_eq!(watch_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn watch_page_error_is_a_transcript_failure() {
    let base = serve(|_| {
        Router::new().route(
            "/watch",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "try later") }),
        )
    })
    .await;

    let err = client_for(&base)
        .resolve_transcript(&video())
        .await
        .expect_err("503 watch page");

    assert!(matches!(err, CaptionDocError::TranscriptLookup { .. }));
}

#[tokio::test]
async fn empty_caption_response_is_a_transcript_failure() {
    let base = serve(|base| watch_page_with_track(base, "")).await;

    let err = client_for(&base)
        .resolve_transcript(&video())
        .await
        .expect_err("empty timedtext body");

    match err {
        CaptionDocError::TranscriptLookup { message } => {
            assert!(message.contains("unreadable caption track"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn default_track_is_fetched_and_parsed() {
    let base = serve(|base| watch_page_with_track(base, TIMEDTEXT)).await;
    let client = client_for(&base);

    let entries = client.resolve_transcript(&video()).await.unwrap();
    assert_eq!(
        entries,
        vec![CaptionEntry::new(0, "Hello"), CaptionEntry::new(75, "World")]
    );

    let bundle = generate_documents(&video(), &client, &client).await.unwrap();
    assert_eq!(bundle.metadata.title, "Test Video");
    assert_eq!(bundle.docx.file_name, "Test_Video.docx");
    assert_eq!(bundle.entries.len(), 2);
}
