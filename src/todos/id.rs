//! Todo identifier generation.
//!
//! Identifiers are a slug of the task text plus a 4-character random hex
//! suffix, e.g. `buy-milk-3f2a`. Ids are generated once at creation and never
//! reused; uniqueness comes from the suffix, not the slug, so two todos with
//! identical task text still get distinct ids.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Maximum slug length before the random suffix.
const MAX_SLUG_LEN: usize = 40;

static USE_DETERMINISTIC_IDS: AtomicBool = AtomicBool::new(false);
static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Use a counter instead of random hex for id suffixes (test support).
pub fn enable_deterministic_ids() {
    USE_DETERMINISTIC_IDS.store(true, Ordering::SeqCst);
    TEST_COUNTER.store(0, Ordering::SeqCst);
}

/// Restore random id suffixes.
pub fn disable_deterministic_ids() {
    USE_DETERMINISTIC_IDS.store(false, Ordering::SeqCst);
}

/// Convert task text to a lowercase ascii slug, capped at [`MAX_SLUG_LEN`].
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len().min(MAX_SLUG_LEN));
    for c in text.chars() {
        if slug.len() >= MAX_SLUG_LEN {
            break;
        }
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[allow(clippy::cast_possible_truncation)]
fn random_suffix() -> String {
    if USE_DETERMINISTIC_IDS.load(Ordering::SeqCst) {
        let count = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        format!("{count:04x}")
    } else {
        use std::collections::hash_map::RandomState;
        use std::hash::{BuildHasher, Hasher};

        let mut hasher = RandomState::new().build_hasher();
        hasher.write_u64(
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map_or(0, |d| d.as_nanos() as u64),
        );
        format!("{:04x}", hasher.finish() & 0xFFFF)
    }
}

/// Generate an id for a todo with the given task text.
#[must_use]
pub fn generate_todo_id(task: &str) -> String {
    let slug = slugify(task);
    let suffix = random_suffix();

    if slug.is_empty() {
        format!("todo-{suffix}")
    } else {
        format!("{slug}-{suffix}")
    }
}
