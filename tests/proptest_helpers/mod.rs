#![allow(dead_code)]

use compass_data::DatasetSource;
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// A single path segment such as `gsm8k` or `dev_ann.json`.
pub fn arb_segment() -> impl Strategy<Value = String> {
    "[a-z0-9_][a-z0-9_.-]{0,11}".prop_filter("not a dot segment", |s| s != "." && s != "..")
}

/// A relative dataset path with optional `./` prefix and trailing `/`.
pub fn arb_relative_path() -> impl Strategy<Value = String> {
    (
        any::<bool>(),
        prop::collection::vec(arb_segment(), 1..5),
        any::<bool>(),
    )
        .prop_map(|(dot_prefix, segments, trailing)| {
            let mut path = segments.join("/");
            if dot_prefix {
                path.insert_str(0, "./");
            }
            if trailing {
                path.push('/');
            }
            path
        })
}

/// An absolute path made of arbitrary segments.
pub fn arb_absolute_path() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_segment(), 0..5)
        .prop_map(|segments| format!("/{}", segments.join("/")))
}

pub fn arb_source() -> impl Strategy<Value = Option<DatasetSource>> {
    prop_oneof![
        Just(None),
        Just(Some(DatasetSource::ModelScope)),
        Just(Some(DatasetSource::OpenMind)),
        Just(Some(DatasetSource::HuggingFace)),
    ]
}
