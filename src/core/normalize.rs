//! Payload normalization for snapstory-dl
//!
//! Walks the known shape of the embedded payload and maps the heterogeneous
//! raw snap records (story / highlight / spotlight) into the uniform [`Snap`]
//! entity. Pure in-memory transformation, no I/O.
//!
//! Every optional upstream field is individually checked: a missing field
//! never aborts normalization of the whole result, only of that field. The
//! decision sequence short-circuits with a specific error kind at the first
//! unmet structural expectation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

use crate::core::error::{Error, Result};
use crate::core::model::{MediaType, Snap, SnapSource, StoryResult, UserProfile};

/// Sequence for generated fallback ids, so two id-less snaps normalized in
/// the same instant still come out distinct.
static FALLBACK_ID_SEQ: AtomicU64 = AtomicU64::new(0);

fn fallback_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let seq = FALLBACK_ID_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("snap-{nanos:x}-{seq:x}")
}

/// Accept an upstream value that may be a JSON number or a numeric string
fn as_flexible_i64(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

fn as_flexible_u64(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Map one raw snap record into the normalized shape.
///
/// Total and defensive: works with whatever subset of fields the record
/// actually carries.
fn normalize_snap(raw: &Value, source: SnapSource, collection_title: Option<&str>) -> Snap {
    // 1 = video, everything else (including absent) = image
    let media_type = match raw.get("snapMediaType").and_then(Value::as_i64) {
        Some(1) => MediaType::Video,
        _ => MediaType::Image,
    };

    let media_url = non_empty_str(raw.pointer("/snapUrls/mediaUrl"))
        .unwrap_or("")
        .to_string();

    let thumbnail_url = match media_type {
        MediaType::Video => non_empty_str(raw.pointer("/snapUrls/mediaPreviewUrl/value"))
            .unwrap_or("")
            .to_string(),
        MediaType::Image => media_url.clone(),
    };

    // Id priority: native snap id, then the raw timestamp, then a token
    let id = non_empty_str(raw.pointer("/snapId/value"))
        .map(str::to_string)
        .or_else(|| {
            raw.get("timestamp").and_then(|v| {
                v.as_str()
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .or_else(|| v.as_i64().map(|n| n.to_string()))
            })
        })
        .unwrap_or_else(fallback_id);

    // Untrusted page content; an absurd seconds value collapses to None
    // instead of overflowing
    let timestamp = raw
        .pointer("/timestampInSec/value")
        .and_then(as_flexible_i64)
        .and_then(|secs| secs.checked_mul(1000));

    Snap {
        id,
        source,
        media_type,
        media_url,
        thumbnail_url,
        timestamp,
        duration: raw.get("duration").and_then(Value::as_f64),
        title: non_empty_str(raw.get("title")).map(str::to_string),
        collection_title: collection_title.map(str::to_string),
    }
}

/// Map a flat snap list, tagging each snap with its source
fn normalize_snap_list(list: Option<&Value>, source: SnapSource) -> Vec<Snap> {
    list.and_then(Value::as_array)
        .map(|snaps| {
            snaps
                .iter()
                .map(|raw| normalize_snap(raw, source, None))
                .collect()
        })
        .unwrap_or_default()
}

/// Map a groups-of-groups collection (highlights, spotlight); each outer
/// group contributes its title to every snap it contains
fn normalize_grouped(list: Option<&Value>, source: SnapSource) -> Vec<Snap> {
    list.and_then(Value::as_array)
        .map(|groups| {
            groups
                .iter()
                .flat_map(|group| {
                    let title = non_empty_str(group.get("title"));
                    group
                        .get("snapList")
                        .and_then(Value::as_array)
                        .map(|snaps| {
                            snaps
                                .iter()
                                .map(|raw| normalize_snap(raw, source, title))
                                .collect::<Vec<_>>()
                        })
                        .unwrap_or_default()
                })
                .collect()
        })
        .unwrap_or_default()
}

fn build_profile(profile: &Value, username: &str) -> UserProfile {
    let public_info = profile.get("publicProfileInfo");

    let display_name = public_info
        .and_then(|p| non_empty_str(p.get("title")))
        .unwrap_or(username)
        .to_string();

    let avatar_url = public_info
        .and_then(|p| non_empty_str(p.get("snapcodeImageUrl")))
        .or_else(|| non_empty_str(profile.get("profilePictureUrl")))
        .map(str::to_string);

    // The live payload serializes subscriberCount as a decimal string
    let subscriber_count = public_info
        .and_then(|p| p.get("subscriberCount"))
        .and_then(as_flexible_u64);

    let bio = public_info
        .and_then(|p| non_empty_str(p.get("bio")))
        .map(str::to_string);

    UserProfile {
        username: username.to_string(),
        display_name,
        avatar_url,
        subscriber_count,
        bio,
    }
}

/// Normalize an extracted payload into a [`StoryResult`].
///
/// Checks run in a fixed order and the first unmet expectation wins:
/// pageProps present, not-found sentinels, public profile present, at least
/// one snap across the three categories.
pub fn normalize(next_data: &Value, username: &str) -> Result<StoryResult> {
    let page_props = next_data
        .pointer("/props/pageProps")
        .filter(|v| v.is_object())
        .ok_or_else(|| Error::PageStructure("pageProps missing".to_string()))?;

    let status = page_props.get("status").and_then(Value::as_i64);
    let page_type = page_props.get("pageType").and_then(Value::as_str);
    if status == Some(2) || page_type == Some("NOT_FOUND") {
        return Err(Error::UserNotFound(username.to_string()));
    }

    // The profile lives top-level or nested under the story; first match wins
    let profile = page_props
        .get("userProfile")
        .filter(|v| !v.is_null())
        .or_else(|| {
            page_props
                .pointer("/story/userProfile")
                .filter(|v| !v.is_null())
        })
        .ok_or_else(|| Error::PrivateAccount(username.to_string()))?;

    let stories = normalize_snap_list(page_props.pointer("/story/snapList"), SnapSource::Story);
    let highlights = normalize_grouped(page_props.get("curatedHighlights"), SnapSource::Highlight);
    let spotlight = normalize_grouped(
        page_props.get("spotlightHighlights"),
        SnapSource::Spotlight,
    );

    // Fixed concatenation order; downstream indexing relies on it
    let mut all_snaps = Vec::with_capacity(stories.len() + highlights.len() + spotlight.len());
    all_snaps.extend(stories.iter().cloned());
    all_snaps.extend(highlights.iter().cloned());
    all_snaps.extend(spotlight.iter().cloned());

    if all_snaps.is_empty() {
        return Err(Error::NoContent(username.to_string()));
    }

    log::debug!(
        "normalized {} snaps for '{}' ({} story, {} highlight, {} spotlight)",
        all_snaps.len(),
        username,
        stories.len(),
        highlights.len(),
        spotlight.len()
    );

    Ok(StoryResult {
        user_profile: build_profile(profile, username),
        stories,
        highlights,
        spotlight,
        all_snaps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(page_props: Value) -> Value {
        json!({ "props": { "pageProps": page_props } })
    }

    fn video_snap(id: &str) -> Value {
        json!({
            "snapId": { "value": id },
            "snapMediaType": 1,
            "snapUrls": {
                "mediaUrl": format!("https://cdn.example/{id}.mp4"),
                "mediaPreviewUrl": { "value": format!("https://cdn.example/{id}_preview.jpg") }
            },
            "timestampInSec": { "value": "1700000000" },
            "duration": 9.9
        })
    }

    fn image_snap(id: &str) -> Value {
        json!({
            "snapId": { "value": id },
            "snapMediaType": 0,
            "snapUrls": { "mediaUrl": format!("https://cdn.example/{id}.jpg") },
            "timestampInSec": { "value": 1700000123 }
        })
    }

    fn full_payload() -> Value {
        payload(json!({
            "userProfile": {
                "publicProfileInfo": {
                    "title": "Ghost Example",
                    "snapcodeImageUrl": "https://cdn.example/snapcode.svg",
                    "subscriberCount": "12345",
                    "bio": "boo"
                }
            },
            "story": { "snapList": [video_snap("s1"), image_snap("s2")] },
            "curatedHighlights": [
                { "title": "Trip", "snapList": [image_snap("h1")] },
                { "snapList": [video_snap("h2")] }
            ],
            "spotlightHighlights": [
                { "title": "Clips", "snapList": [video_snap("c1")] }
            ]
        }))
    }

    #[test]
    fn test_full_payload_counts_and_order() {
        let result = normalize(&full_payload(), "ghost").unwrap();
        assert_eq!(result.stories.len(), 2);
        assert_eq!(result.highlights.len(), 2);
        assert_eq!(result.spotlight.len(), 1);
        assert_eq!(
            result.all_snaps.len(),
            result.stories.len() + result.highlights.len() + result.spotlight.len()
        );

        // stories ++ highlights ++ spotlight, in that order
        let ids: Vec<&str> = result.all_snaps.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s2", "h1", "h2", "c1"]);
        assert_eq!(result.all_snaps[0].source, SnapSource::Story);
        assert_eq!(result.all_snaps[2].source, SnapSource::Highlight);
        assert_eq!(result.all_snaps[4].source, SnapSource::Spotlight);
    }

    #[test]
    fn test_video_snap_uses_preview_thumbnail() {
        let result = normalize(&full_payload(), "ghost").unwrap();
        let video = &result.stories[0];
        assert_eq!(video.media_type, MediaType::Video);
        assert_eq!(video.media_url, "https://cdn.example/s1.mp4");
        assert_eq!(video.thumbnail_url, "https://cdn.example/s1_preview.jpg");
    }

    #[test]
    fn test_image_snap_thumbnail_is_media_url() {
        let result = normalize(&full_payload(), "ghost").unwrap();
        let image = &result.stories[1];
        assert_eq!(image.media_type, MediaType::Image);
        assert_eq!(image.thumbnail_url, image.media_url);
    }

    #[test]
    fn test_timestamp_seconds_scaled_to_millis() {
        let result = normalize(&full_payload(), "ghost").unwrap();
        // String-typed seconds
        assert_eq!(result.stories[0].timestamp, Some(1_700_000_000_000));
        // Number-typed seconds
        assert_eq!(result.stories[1].timestamp, Some(1_700_000_123_000));
    }

    #[test]
    fn test_timestamp_overflow_collapses_to_none() {
        let raw = json!({
            "snapMediaType": 0,
            "snapId": { "value": "huge" },
            "timestampInSec": { "value": i64::MAX }
        });
        let snap = normalize_snap(&raw, SnapSource::Story, None);
        assert_eq!(snap.timestamp, None);
    }

    #[test]
    fn test_collection_titles() {
        let result = normalize(&full_payload(), "ghost").unwrap();
        assert_eq!(result.highlights[0].collection_title.as_deref(), Some("Trip"));
        assert_eq!(result.highlights[1].collection_title, None);
        assert_eq!(result.spotlight[0].collection_title.as_deref(), Some("Clips"));
        assert_eq!(result.stories[0].collection_title, None);
    }

    #[test]
    fn test_id_falls_back_to_timestamp() {
        let raw = json!({
            "snapMediaType": 0,
            "timestamp": "1699999999",
            "snapUrls": { "mediaUrl": "https://cdn.example/x.jpg" }
        });
        let snap = normalize_snap(&raw, SnapSource::Story, None);
        assert_eq!(snap.id, "1699999999");
    }

    #[test]
    fn test_id_falls_back_to_generated_token() {
        let raw = json!({ "snapMediaType": 0 });
        let a = normalize_snap(&raw, SnapSource::Story, None);
        let b = normalize_snap(&raw, SnapSource::Story, None);
        assert!(!a.id.is_empty());
        assert!(!b.id.is_empty());
        // The sequence component keeps same-instant tokens apart
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_missing_media_url_is_empty_string() {
        let raw = json!({ "snapId": { "value": "bare" }, "snapMediaType": 1 });
        let snap = normalize_snap(&raw, SnapSource::Spotlight, None);
        assert_eq!(snap.media_url, "");
        assert_eq!(snap.thumbnail_url, "");
        assert_eq!(snap.timestamp, None);
        assert_eq!(snap.duration, None);
    }

    #[test]
    fn test_missing_page_props() {
        let err = normalize(&json!({ "props": {} }), "ghost").unwrap_err();
        assert!(matches!(err, Error::PageStructure(_)));
    }

    #[test]
    fn test_status_sentinel_is_user_not_found() {
        let err = normalize(&payload(json!({ "status": 2 })), "ghost").unwrap_err();
        assert!(matches!(err, Error::UserNotFound(_)));
    }

    #[test]
    fn test_page_type_sentinel_is_user_not_found() {
        let err = normalize(&payload(json!({ "pageType": "NOT_FOUND" })), "ghost").unwrap_err();
        assert!(matches!(err, Error::UserNotFound(_)));
    }

    #[test]
    fn test_missing_profile_is_private_account() {
        let err = normalize(
            &payload(json!({ "story": { "snapList": [image_snap("s1")] } })),
            "ghost",
        )
        .unwrap_err();
        assert!(matches!(err, Error::PrivateAccount(_)));
    }

    #[test]
    fn test_profile_nested_under_story() {
        let result = normalize(
            &payload(json!({
                "story": {
                    "userProfile": { "publicProfileInfo": { "title": "Nested" } },
                    "snapList": [image_snap("s1")]
                }
            })),
            "ghost",
        )
        .unwrap();
        assert_eq!(result.user_profile.display_name, "Nested");
    }

    #[test]
    fn test_zero_snaps_is_no_content() {
        let err = normalize(
            &payload(json!({
                "userProfile": { "publicProfileInfo": { "title": "Ghost" } },
                "story": { "snapList": [] },
                "curatedHighlights": [],
                "spotlightHighlights": []
            })),
            "ghost",
        )
        .unwrap_err();
        assert!(matches!(err, Error::NoContent(_)));
    }

    #[test]
    fn test_profile_fields_and_fallbacks() {
        let result = normalize(&full_payload(), "ghost").unwrap();
        let profile = &result.user_profile;
        assert_eq!(profile.username, "ghost");
        assert_eq!(profile.display_name, "Ghost Example");
        assert_eq!(
            profile.avatar_url.as_deref(),
            Some("https://cdn.example/snapcode.svg")
        );
        assert_eq!(profile.subscriber_count, Some(12345));
        assert_eq!(profile.bio.as_deref(), Some("boo"));

        // No public title: display name falls back to the input username
        let bare = normalize(
            &payload(json!({
                "userProfile": { "profilePictureUrl": "https://cdn.example/pic.jpg" },
                "story": { "snapList": [image_snap("s1")] }
            })),
            "ghost",
        )
        .unwrap();
        assert_eq!(bare.user_profile.display_name, "ghost");
        assert_eq!(
            bare.user_profile.avatar_url.as_deref(),
            Some("https://cdn.example/pic.jpg")
        );
        assert_eq!(bare.user_profile.subscriber_count, None);
    }
}
