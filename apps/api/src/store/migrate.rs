use chrono::NaiveDate;
use serde_json::{json, Map, Value};

use crate::models::profile::{Profile, SCHEMA_VERSION};

/// Upgrades a raw profile record of any prior schema version to the current
/// `Profile` shape. Pure and total over well-formed records: every field a
/// prior version lacks is filled with its explicit zero value, the legacy
/// `dailyVotes` series is renamed to `dailyUpvotes`, and `level` is
/// reconciled with `xp`. Records already at the current version deserialize
/// unchanged.
///
/// Runs at the store read boundary — the core never sees a partial record.
pub fn upgrade(raw: Value, today: NaiveDate) -> Result<Profile, serde_json::Error> {
    if raw.get("schemaVersion").and_then(Value::as_u64) == Some(SCHEMA_VERSION as u64) {
        return serde_json::from_value(raw);
    }

    let mut obj = match raw {
        Value::Object(map) => map,
        other => return serde_json::from_value(other),
    };

    // v1 kept upvote history under `dailyVotes`.
    if !has(&obj, "dailyUpvotes") {
        let legacy = obj.remove("dailyVotes").unwrap_or_else(|| json!([]));
        obj.insert("dailyUpvotes".to_string(), legacy);
    }

    let fallback_code = obj
        .get("id")
        .and_then(Value::as_str)
        .map(fallback_referral_code)
        .unwrap_or_default();

    fill(&mut obj, "quote", json!(""));
    fill(&mut obj, "bio", json!(""));
    fill(&mut obj, "links", json!([]));
    fill(&mut obj, "interests", json!([]));
    fill(&mut obj, "projects", json!([]));
    fill(&mut obj, "views", json!(0));
    fill(&mut obj, "upvotes", json!(0));
    fill(&mut obj, "rank", json!(0));
    fill(&mut obj, "badges", json!([]));
    fill(&mut obj, "streak", json!(0));
    fill(&mut obj, "lastActiveDate", json!(0));
    fill(&mut obj, "lastSeenDate", json!(today.to_string()));
    fill(&mut obj, "dailyViews", json!([]));
    fill(
        &mut obj,
        "location",
        json!({"lat": 0.0, "lng": 0.0, "city": "", "country": ""}),
    );
    fill(&mut obj, "metrics", json!({"mapClicks": 0}));
    fill(&mut obj, "followers", json!([]));
    fill(&mut obj, "following", json!([]));
    fill(&mut obj, "xp", json!(0));
    fill(&mut obj, "referralCode", json!(fallback_code));
    fill(&mut obj, "referralCount", json!(0));
    fill(&mut obj, "hideLocation", json!(false));
    fill(&mut obj, "themePreference", json!("light"));
    fill(&mut obj, "dailyStats", json!([]));
    fill(&mut obj, "achievements", json!([]));
    fill(&mut obj, "streakFreezes", json!(0));
    fill(&mut obj, "featuredCount", json!(0));
    fill(&mut obj, "firstUpvoteReceived", json!(false));
    fill(&mut obj, "linkMasterUnlocked", json!(false));
    fill(&mut obj, "earlyAdopter", json!(false));
    fill(&mut obj, "hallOfFamer", json!(false));
    fill(&mut obj, "creativeUnlocked", json!(false));
    fill(&mut obj, "connectedUnlocked", json!(false));
    fill(&mut obj, "quickRiseUnlocked", json!(false));
    fill(&mut obj, "hotStreakUnlocked", json!(false));
    fill(&mut obj, "rareBadges", json!([]));

    // Old social objects may have any subset of the four handles.
    if !has(&obj, "social") {
        obj.insert("social".to_string(), json!({}));
    }
    if let Some(social) = obj.get_mut("social").and_then(Value::as_object_mut) {
        for key in ["x", "github", "website", "linkedin"] {
            fill(social, key, json!(""));
        }
    }

    // Level is a pure function of XP; reconcile rather than trust stale data.
    let xp = obj.get("xp").and_then(Value::as_u64).unwrap_or(0);
    obj.insert("level".to_string(), json!(xp / 500 + 1));

    obj.insert("schemaVersion".to_string(), json!(SCHEMA_VERSION));

    serde_json::from_value(Value::Object(obj))
}

fn has(obj: &Map<String, Value>, key: &str) -> bool {
    matches!(obj.get(key), Some(v) if !v.is_null())
}

fn fill(obj: &mut Map<String, Value>, key: &str, default: Value) {
    if !has(obj, key) {
        obj.insert(key.to_string(), default);
    }
}

/// Deterministic referral code for records that predate referral codes:
/// FNV-1a over the profile id, rendered as six uppercase hex chars. Keeps
/// `upgrade` pure; fresh signups get a random uuid-derived code instead.
fn fallback_referral_code(id: &str) -> String {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in id.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x1000_0000_01b3);
    }
    format!("{:06X}", hash & 0xFF_FFFF)
}
