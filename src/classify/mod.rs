//! Client classification.
//!
//! Pure predicates mapping a status snapshot and a [`ClassificationPolicy`] to the
//! client categories a report asks for. Nothing here touches the network.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{ApiError, ApiResult};
use crate::models::ClientStatus;

/// Age threshold used by `stale` and `unseen` when the policy names none (two days).
pub const DEFAULT_THRESHOLD_MINUTES: u64 = 2880;

/// Client categories a report can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    All,
    Ok,
    Failed,
    Stale,
    Blank,
    Unseen,
    Online,
    Offline,
    Active,
    Outdated,
    Removed,
}

impl Category {
    pub const VARIANTS: [Category; 11] = [
        Category::All,
        Category::Ok,
        Category::Failed,
        Category::Stale,
        Category::Blank,
        Category::Unseen,
        Category::Online,
        Category::Offline,
        Category::Active,
        Category::Outdated,
        Category::Removed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Ok => "ok",
            Category::Failed => "failed",
            Category::Stale => "stale",
            Category::Blank => "blank",
            Category::Unseen => "unseen",
            Category::Online => "online",
            Category::Offline => "offline",
            Category::Active => "active",
            Category::Outdated => "outdated",
            Category::Removed => "removed",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::VARIANTS
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ApiError::InvalidPolicy(format!("unknown category: {}", s)))
    }
}

/// Per-query classification options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationPolicy {
    /// Admit clients pending removal into every category
    pub include_removed: bool,
    pub include_file_backups: bool,
    pub include_image_backups: bool,
    /// Keep clients without a completed backup in stale/failed/online/offline/unseen
    pub include_blank: bool,
    /// Count file backups with issues as failed
    pub fail_on_file_issues: bool,
    pub time_threshold_minutes: Option<u64>,
    /// `Some("")` selects the default group; `None` applies no group filter
    pub group_name: Option<String>,
}

impl Default for ClassificationPolicy {
    fn default() -> Self {
        Self {
            include_removed: false,
            include_file_backups: true,
            include_image_backups: true,
            include_blank: true,
            fail_on_file_issues: false,
            time_threshold_minutes: None,
            group_name: None,
        }
    }
}

impl ClassificationPolicy {
    /// Reject contradictory options before any work is done.
    pub fn validate(&self) -> ApiResult<()> {
        if !self.include_file_backups && !self.include_image_backups {
            return Err(ApiError::InvalidPolicy(
                "at least one of file or image backups must be considered".to_string(),
            ));
        }
        Ok(())
    }

    fn threshold(&self) -> u64 {
        self.time_threshold_minutes.unwrap_or(DEFAULT_THRESHOLD_MINUTES)
    }
}

/// One backup kind of a client, seen through the policy.
struct KindView {
    considered: bool,
    disabled: bool,
    /// Last backup succeeded, with strict issue handling applied
    healthy: bool,
    last_backup: i64,
}

impl KindView {
    fn file(c: &ClientStatus, p: &ClassificationPolicy) -> Self {
        Self {
            considered: p.include_file_backups,
            disabled: c.file_disabled,
            healthy: c.file_ok && (!p.fail_on_file_issues || c.last_filebackup_issues == 0),
            last_backup: c.last_file_backup,
        }
    }

    // Strict mode never applies to images.
    fn image(c: &ClientStatus, p: &ClassificationPolicy) -> Self {
        Self {
            considered: p.include_image_backups,
            disabled: c.image_disabled,
            healthy: c.image_ok,
            last_backup: c.last_image_backup,
        }
    }

    fn both(c: &ClientStatus, p: &ClassificationPolicy) -> [Self; 2] {
        [Self::file(c, p), Self::image(c, p)]
    }

    fn relevant(&self) -> bool {
        self.considered && !self.disabled
    }

    fn is_blank(&self) -> bool {
        self.last_backup == 0
    }

    fn blank_excluded(&self, p: &ClassificationPolicy) -> bool {
        !p.include_blank && self.is_blank()
    }
}

/// Whole minutes elapsed since `epoch` (floored), or `None` if it never happened.
pub fn age_minutes(now: i64, epoch: i64) -> Option<i64> {
    if epoch == 0 {
        return None;
    }
    Some(now.saturating_sub(epoch).div_euclid(60))
}

/// Inclusive threshold check. Something that never happened is always old enough.
pub fn older_than(now: i64, epoch: i64, threshold_minutes: u64) -> bool {
    match age_minutes(now, epoch) {
        None => true,
        Some(age) => age >= i64::try_from(threshold_minutes).unwrap_or(i64::MAX),
    }
}

pub fn is_ok(c: &ClientStatus, p: &ClassificationPolicy) -> bool {
    KindView::both(c, p).iter().any(|k| k.relevant() && k.healthy)
}

pub fn is_failed(c: &ClientStatus, p: &ClassificationPolicy) -> bool {
    KindView::both(c, p)
        .iter()
        .any(|k| k.relevant() && !k.blank_excluded(p) && !k.healthy)
}

pub fn is_stale(c: &ClientStatus, p: &ClassificationPolicy, now: i64) -> bool {
    KindView::both(c, p).iter().any(|k| {
        k.relevant() && !k.blank_excluded(p) && older_than(now, k.last_backup, p.threshold())
    })
}

/// No completed backup for some considered, enabled kind.
pub fn is_blank(c: &ClientStatus, p: &ClassificationPolicy) -> bool {
    KindView::both(c, p).iter().any(|k| k.relevant() && k.is_blank())
}

fn blank_excluded(c: &ClientStatus, p: &ClassificationPolicy) -> bool {
    !p.include_blank && is_blank(c, p)
}

pub fn is_unseen(c: &ClientStatus, p: &ClassificationPolicy, now: i64) -> bool {
    !blank_excluded(c, p) && older_than(now, c.last_seen, p.threshold())
}

pub fn is_online(c: &ClientStatus, p: &ClassificationPolicy) -> bool {
    !blank_excluded(c, p) && c.online
}

pub fn is_offline(c: &ClientStatus, p: &ClassificationPolicy) -> bool {
    !blank_excluded(c, p) && !c.online
}

pub fn is_active(c: &ClientStatus) -> bool {
    c.is_active()
}

pub fn is_outdated(c: &ClientStatus) -> bool {
    c.outdated
}

pub fn is_removed(c: &ClientStatus) -> bool {
    c.delete_pending
}

/// Group and removal pre-filter applied before any category predicate.
pub fn in_scope(c: &ClientStatus, category: Category, p: &ClassificationPolicy) -> bool {
    if let Some(group) = &p.group_name {
        if c.group != *group {
            return false;
        }
    }
    match category {
        Category::Removed => true,
        _ => p.include_removed || !c.delete_pending,
    }
}

/// Category predicate for a single in-scope client.
pub fn matches(category: Category, c: &ClientStatus, p: &ClassificationPolicy, now: i64) -> bool {
    match category {
        Category::All => true,
        Category::Ok => is_ok(c, p),
        Category::Failed => is_failed(c, p),
        Category::Stale => is_stale(c, p, now),
        Category::Blank => is_blank(c, p),
        Category::Unseen => is_unseen(c, p, now),
        Category::Online => is_online(c, p),
        Category::Offline => is_offline(c, p),
        Category::Active => is_active(c),
        Category::Outdated => is_outdated(c),
        Category::Removed => is_removed(c),
    }
}

/// Select the clients of `snapshot` that fall into `category` at time `now`.
pub fn classify(
    category: Category,
    snapshot: &[ClientStatus],
    policy: &ClassificationPolicy,
    now: i64,
) -> ApiResult<Vec<ClientStatus>> {
    policy.validate()?;

    Ok(snapshot
        .iter()
        .filter(|c| in_scope(c, category, policy) && matches(category, c, policy, now))
        .cloned()
        .collect())
}

/// [`classify`] against the current wall clock.
pub fn classify_now(
    category: Category,
    snapshot: &[ClientStatus],
    policy: &ClassificationPolicy,
) -> ApiResult<Vec<ClientStatus>> {
    classify(category, snapshot, policy, Utc::now().timestamp())
}
