//! Unicode normalization and structural diff for JSON catalog snapshots.
//!
//! Two documents are considered the same catalog when, after both are run
//! through [`normalize`], [`diff`] reports nothing.
//!
//! ```
//! use catsync_diff::compare;
//! use serde_json::json;
//!
//! let existing = json!({ "name": "cafe\u{0301}" });
//! let fresh = json!({ "name": "caf\u{00e9}" });
//! assert!(compare(&existing, &fresh).is_empty());
//! ```

mod diff;
mod normalize;

pub use diff::{Difference, deep_equal, diff};
pub use normalize::{normalize, normalize_in_place};

use serde_json::Value;

/// Normalize both documents and diff them.
pub fn compare(existing: &Value, fresh: &Value) -> Vec<Difference> {
    diff(&normalize(existing), &normalize(fresh))
}
