//! Plan stage: cadence → monthly content plan
//!
//! Synthesizes one `PlanItem` per scheduled post for the month: pillars,
//! services, and angles rotate round-robin; platforms follow the cadence
//! mix. Output is `plan.json`, consumed by generation.

use std::path::{Path, PathBuf};
use tracing::info;

use cce_config::load_client_config;
use cce_utils::types::{PlanDocument, PlanItem, TargetLength};
use cce_utils::{EngineError, persist};

use crate::paths::ClientPaths;

/// Editorial angles rotated across the month.
const ANGLES: [&str; 6] = [
    "myth vs fact",
    "what to expect",
    "safety & trust",
    "process clarity",
    "common mistakes",
    "reassurance",
];

/// Outcome of the plan stage, for the CLI summary line.
#[derive(Debug, Clone)]
pub struct PlanSummary {
    pub posts: usize,
    pub month: String,
    pub out_path: PathBuf,
}

/// Parse a `YYYY-MM` month token.
///
/// # Errors
///
/// Returns `EngineError::InvalidMonth` for anything that is not a
/// zero-padded, calendar-valid year-month.
pub fn parse_month(month: &str) -> Result<(i32, u32), EngineError> {
    let invalid = || EngineError::InvalidMonth {
        month: month.to_string(),
    };

    let (year_str, month_str) = month.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year_str.parse().map_err(|_| invalid())?;
    let month_num: u32 = month_str.parse().map_err(|_| invalid())?;

    // Reject unpadded or out-of-range tokens ("2025-6", "2025-13").
    if format!("{year:04}-{month_num:02}") != month
        || chrono::NaiveDate::from_ymd_opt(year, month_num, 1).is_none()
    {
        return Err(invalid());
    }
    Ok((year, month_num))
}

fn days_in_month(year: i32, month: u32) -> i64 {
    let first = chrono::NaiveDate::from_ymd_opt(year, month, 1).expect("validated by parse_month");
    let next = if month == 12 {
        chrono::NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        chrono::NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .expect("first of month is always valid");
    next.signed_duration_since(first).num_days()
}

/// Expand the cadence mix into a platform per post.
///
/// Each platform gets `floor(total * weight)` slots; the remainder is
/// distributed round-robin in descending-weight order. The sequence is
/// grouped by platform, heaviest first. An empty mix schedules
/// everything on instagram.
fn platform_sequence(mix: &std::collections::BTreeMap<String, f64>, total: usize) -> Vec<String> {
    if mix.is_empty() {
        return vec!["instagram".to_string(); total];
    }

    let mut platforms: Vec<&String> = mix.keys().collect();
    platforms.sort_by(|a, b| {
        mix[*b]
            .partial_cmp(&mix[*a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut counts: std::collections::BTreeMap<&String, usize> = platforms
        .iter()
        .map(|p| (*p, (total as f64 * mix[*p]) as usize))
        .collect();

    let mut assigned: usize = counts.values().sum();
    let mut idx = 0;
    while assigned < total {
        let p = platforms[idx % platforms.len()];
        *counts.get_mut(p).expect("platform present") += 1;
        assigned += 1;
        idx += 1;
    }

    let mut seq = Vec::with_capacity(total);
    for p in &platforms {
        seq.extend(std::iter::repeat_n((*p).clone(), counts[*p]));
    }
    seq.truncate(total);
    seq
}

/// Run the plan stage for a client and month.
///
/// # Errors
///
/// Returns `EngineError::InvalidMonth` for a bad month token,
/// `EngineError::Config` when the client profile defines no pillars or
/// services, plus config-loading and IO failures.
pub fn run_plan(client_dir: &Path, month: &str) -> Result<PlanSummary, EngineError> {
    let (year, month_num) = parse_month(month)?;
    let paths = ClientPaths::new(client_dir);
    let client = load_client_config(&paths.client_config())?;

    let pillars = &client.content_strategy.pillars;
    if pillars.is_empty() {
        return Err(EngineError::Config(
            "client.yaml must define at least one content pillar".to_string(),
        ));
    }
    if client.services.is_empty() {
        return Err(EngineError::Config(
            "client.yaml must define at least one service".to_string(),
        ));
    }

    let days = days_in_month(year, month_num);
    let weekly = f64::from(client.content_strategy.cadence.posts_per_week);
    let total_posts = ((weekly * days as f64 / 7.0).round() as usize).max(1);

    let platforms = platform_sequence(&client.content_strategy.cadence.mix, total_posts);

    let items: Vec<PlanItem> = (0..total_posts)
        .map(|i| {
            let platform = platforms[i % platforms.len()].clone();
            let target_length = if platform == "instagram" || platform == "tiktok" {
                TargetLength::Short
            } else {
                TargetLength::Medium
            };
            PlanItem {
                id: format!("{year:04}{month_num:02}-{:03}", i + 1),
                pillar: pillars[i % pillars.len()].name.clone(),
                service: client.services[i % client.services.len()].clone(),
                platform,
                angle: ANGLES[i % ANGLES.len()].to_string(),
                target_length,
            }
        })
        .collect();

    let out_path = paths.plan_file(month);
    persist::write_json(
        &out_path,
        &PlanDocument {
            month: month.to_string(),
            items: items.clone(),
        },
    )?;

    info!(posts = items.len(), month, "plan complete");

    Ok(PlanSummary {
        posts: items.len(),
        month: month.to_string(),
        out_path,
    })
}
