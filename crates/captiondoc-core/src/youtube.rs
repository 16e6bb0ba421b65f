use std::borrow::Cow;

use quick_xml::{Reader, events::Event};
use reqwest::{StatusCode, Url, header};
use serde::Deserialize;

use crate::{
    config::HostingConfig,
    error::{CaptionDocError, Result},
    source::{MetadataSource, TranscriptSource},
    types::{CaptionEntry, VideoId, VideoMetadata},
};

const PLAYER_RESPONSE_MARKER: &str = "ytInitialPlayerResponse";
const FORMATTING_TAGS: &[&str] = &[
    "b", "i", "u", "em", "strong", "font", "mark", "small", "sub", "sup", "del", "ins",
];

#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    title: String,
    thumbnail_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Captions {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    tracklist: Option<CaptionTracklist>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTracklist {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
    #[serde(default)]
    audio_tracks: Vec<AudioTrack>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AudioTrack {
    default_caption_track_index: Option<usize>,
}

/// HTTP client for the hosting service's public endpoints.
#[derive(Debug, Clone)]
pub struct YoutubeClient {
    http: reqwest::Client,
    config: HostingConfig,
}

impl YoutubeClient {
    pub fn new(config: HostingConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| CaptionDocError::Config {
                reason: format!("could not build HTTP client: {e}"),
            })?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &HostingConfig {
        &self.config
    }

    async fn fetch_watch_page(&self, video_id: &VideoId) -> Result<String> {
        let url = self
            .config
            .watch_page_url(video_id.as_str())
            .map_err(CaptionDocError::transcript)?;
        tracing::debug!(%url, "fetching watch page");

        let response = self
            .http
            .get(url)
            .header(header::ACCEPT_LANGUAGE, &self.config.accept_language)
            .header(header::COOKIE, "CONSENT=YES+cb")
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(CaptionDocError::transcript)?;

        response.text().await.map_err(CaptionDocError::transcript)
    }

    async fn fetch_timedtext(&self, track: &CaptionTrack) -> Result<String> {
        let url = track.base_url.replace("&fmt=srv3", "");
        tracing::debug!(
            language = track.language_code.as_deref().unwrap_or("?"),
            "fetching caption track"
        );

        let response = self
            .http
            .get(&url)
            .header(header::ACCEPT_LANGUAGE, &self.config.accept_language)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(CaptionDocError::transcript)?;

        response.text().await.map_err(CaptionDocError::transcript)
    }
}

impl MetadataSource for YoutubeClient {
    async fn resolve_metadata(&self, video_id: &VideoId) -> Result<VideoMetadata> {
        let watch_url = self
            .config
            .watch_page_url(video_id.as_str())
            .map_err(CaptionDocError::metadata)?;
        let url = Url::parse_with_params(
            &self.config.oembed_url,
            &[("url", watch_url.as_str()), ("format", "json")],
        )
        .map_err(CaptionDocError::metadata)?;
        tracing::debug!(%url, "looking up video metadata");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(CaptionDocError::metadata)?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => {
                return Err(CaptionDocError::metadata(format!(
                    "video {video_id} does not exist"
                )));
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(CaptionDocError::metadata(format!(
                    "video {video_id} is private or cannot be embedded"
                )));
            }
            status if !status.is_success() => {
                return Err(CaptionDocError::metadata(format!(
                    "unexpected response status {status}"
                )));
            }
            _ => {}
        }

        let body = response.text().await.map_err(CaptionDocError::metadata)?;
        parse_oembed(&body)
    }
}

impl TranscriptSource for YoutubeClient {
    async fn resolve_transcript(&self, video_id: &VideoId) -> Result<Vec<CaptionEntry>> {
        let html = self.fetch_watch_page(video_id).await?;
        let player = extract_player_response(&html)?;
        let tracklist = caption_tracklist(video_id, player)?;
        let track = select_default_track(&tracklist).ok_or_else(|| {
            CaptionDocError::transcript(format!("no transcripts were found for video {video_id}"))
        })?;

        let xml = self.fetch_timedtext(track).await?;
        let entries = parse_timedtext(&xml)?;
        tracing::debug!(count = entries.len(), "parsed caption entries");

        if let Some(pair) = entries
            .windows(2)
            .find(|w| w[1].start_seconds < w[0].start_seconds)
        {
            tracing::warn!(
                previous = pair[0].start_seconds,
                next = pair[1].start_seconds,
                "caption entries are not in chronological order, keeping service order"
            );
        }

        Ok(entries)
    }
}

fn parse_oembed(body: &str) -> Result<VideoMetadata> {
    let oembed: OEmbedResponse = serde_json::from_str(body)
        .map_err(|e| CaptionDocError::metadata(format!("unreadable metadata response: {e}")))?;

    if oembed.title.trim().is_empty() {
        return Err(CaptionDocError::metadata("the video has no title"));
    }

    Ok(VideoMetadata {
        title: oembed.title,
        thumbnail_url: oembed.thumbnail_url.filter(|u| !u.is_empty()),
    })
}

fn extract_player_response(html: &str) -> Result<PlayerResponse> {
    let not_found = || CaptionDocError::transcript("could not find player data in the watch page");

    // The name also shows up in unrelated scripts; only the `= {` assignment carries the data.
    for (pos, _) in html.match_indices(PLAYER_RESPONSE_MARKER) {
        let rest = html[pos + PLAYER_RESPONSE_MARKER.len()..].trim_start();
        let Some(rest) = rest.strip_prefix('=') else {
            continue;
        };
        let rest = rest.trim_start();
        if !rest.starts_with('{') {
            continue;
        }

        return serde_json::Deserializer::from_str(rest)
            .into_iter::<PlayerResponse>()
            .next()
            .ok_or_else(not_found)?
            .map_err(|e| CaptionDocError::transcript(format!("unreadable player data: {e}")));
    }

    Err(not_found())
}

fn caption_tracklist(video_id: &VideoId, player: PlayerResponse) -> Result<CaptionTracklist> {
    if let Some(status) = &player.playability_status {
        if status.status != "OK" {
            let reason = status
                .reason
                .clone()
                .unwrap_or_else(|| status.status.to_lowercase());
            return Err(CaptionDocError::transcript(format!(
                "video {video_id} is unavailable: {reason}"
            )));
        }
    }

    player
        .captions
        .and_then(|c| c.tracklist)
        .ok_or_else(|| {
            CaptionDocError::transcript(format!("subtitles are disabled for video {video_id}"))
        })
}

fn select_default_track(tracklist: &CaptionTracklist) -> Option<&CaptionTrack> {
    let preferred = tracklist
        .audio_tracks
        .first()
        .and_then(|a| a.default_caption_track_index);

    preferred
        .and_then(|i| tracklist.caption_tracks.get(i))
        .or_else(|| tracklist.caption_tracks.first())
}

fn timedtext_error(e: impl std::fmt::Display) -> CaptionDocError {
    CaptionDocError::transcript(format!("unreadable caption track: {e}"))
}

fn parse_timedtext(xml: &str) -> Result<Vec<CaptionEntry>> {
    let mut reader = Reader::from_str(xml);
    let mut entries = Vec::new();
    let mut current: Option<(f64, String)> = None;
    let mut seen_root = false;

    loop {
        match reader.read_event().map_err(timedtext_error)? {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"transcript" => {
                seen_root = true;
            }
            Event::Start(e) if e.name().as_ref() == b"text" => {
                let start = match e.try_get_attribute("start").map_err(timedtext_error)? {
                    Some(attr) => attr
                        .unescape_value()
                        .map_err(timedtext_error)?
                        .trim()
                        .parse::<f64>()
                        .map_err(timedtext_error)?,
                    None => 0.0,
                };
                current = Some((start, String::new()));
            }
            Event::Text(t) => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push_str(&t.unescape().map_err(timedtext_error)?);
                }
            }
            Event::End(e) if e.name().as_ref() == b"text" => {
                if let Some((start, raw)) = current.take() {
                    if !raw.is_empty() {
                        entries.push(CaptionEntry::from_offset(start, clean_caption_text(&raw)));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    // An empty or HTML body means the service refused the track, not that it has no captions.
    if !seen_root {
        return Err(timedtext_error("no <transcript> element in the response"));
    }

    Ok(entries)
}

/// Caption payloads are HTML-escaped inside the XML and may carry inline styling tags.
fn clean_caption_text(raw: &str) -> String {
    let unescaped = quick_xml::escape::unescape(raw).unwrap_or(Cow::Borrowed(raw));
    strip_formatting_tags(&unescaped)
}

fn strip_formatting_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let candidate = &rest[open..];
        match candidate.find('>') {
            Some(close) if is_formatting_tag(&candidate[1..close]) => {
                rest = &candidate[close + 1..];
            }
            _ => {
                out.push('<');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_formatting_tag(inner: &str) -> bool {
    let name = inner
        .trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or_default();
    FORMATTING_TAGS
        .iter()
        .any(|tag| tag.eq_ignore_ascii_case(name))
}

/// Accepts a bare id or any of the usual watch, short-link, shorts and embed URLs.
pub fn parse_video_id(input: &str) -> Result<VideoId> {
    let trimmed = input.trim();
    let looks_like_url = trimmed.contains("://")
        || trimmed.starts_with("www.")
        || trimmed.starts_with("youtube.com")
        || trimmed.starts_with("m.youtube.com")
        || trimmed.starts_with("youtu.be");

    if !looks_like_url {
        return VideoId::new(trimmed);
    }

    let with_scheme: Cow<str> = if trimmed.contains("://") {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(format!("https://{trimmed}"))
    };

    let Ok(url) = Url::parse(&with_scheme) else {
        return VideoId::new(trimmed);
    };

    let host = url.host_str().unwrap_or_default();
    let mut segments = url.path_segments().into_iter().flatten();

    let id = if host.ends_with("youtu.be") {
        segments.next().map(str::to_string)
    } else if let Some((_, v)) = url.query_pairs().find(|(k, _)| k == "v") {
        Some(v.into_owned())
    } else {
        match segments.next() {
            Some("shorts" | "embed" | "live" | "v") => segments.next().map(str::to_string),
            _ => None,
        }
    };

    VideoId::new(id.unwrap_or_default())
}
