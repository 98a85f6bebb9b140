//! Fuzz target: reasoner label canonicalisation
//!
//! Feeds arbitrary UTF-8 labels through `canonical_label` and the label
//! diff and verifies:
//! - No panics on any input (IRIs, separators, multi-byte characters)
//! - Canonicalisation is idempotent
//! - The diff is symmetric and empty against itself
//!
//! cargo fuzz run fuzz_label_canonicalize

#![no_main]

use std::collections::BTreeSet;

use libfuzzer_sys::fuzz_target;
use smartroom::reconcile::{canonical_label, diff_labels};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let once = canonical_label(text);
    assert_eq!(canonical_label(&once), once, "not idempotent for {text:?}");

    // Split into two label sets on newlines / tabs.
    let (left, right) = text.split_once('\t').unwrap_or((text, ""));
    let a: BTreeSet<String> = left.lines().map(str::to_owned).collect();
    let b: BTreeSet<String> = right.lines().map(str::to_owned).collect();

    assert_eq!(diff_labels(&a, &b), diff_labels(&b, &a));
    assert!(diff_labels(&a, &a).is_empty());
});
