//! Archive-table key spellings.
//!
//! Archive tables are keyed inconsistently (`data/x`, `/x/`, `./data/x`), so
//! a relative dataset path is looked up under every conventional spelling
//! before the table is declared to have no entry for it.

/// Returns the exact-match keys to try for `path`, in lookup order.
///
/// Order: the path as given, without a leading `./`, without a leading `/`,
/// with a leading `/`; then the same four with the trailing `/` toggled.
/// Duplicates keep their first position.
pub fn candidate_keys(path: &str) -> Vec<String> {
    let without_dot = path.strip_prefix("./").unwrap_or(path);
    let core = without_dot.trim_start_matches('/');

    let primary = [
        path.to_string(),
        without_dot.to_string(),
        core.to_string(),
        format!("/{core}"),
    ];

    let toggled = primary.iter().map(|key| match key.strip_suffix('/') {
        Some(trimmed) => trimmed.to_string(),
        None => format!("{key}/"),
    });

    let mut keys: Vec<String> = Vec::with_capacity(primary.len() * 2);
    for key in primary.iter().cloned().chain(toggled) {
        if key.is_empty() || key == "/" {
            continue;
        }
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

/// Checks whether `key`, trimmed of leading and trailing `/` and `.`,
/// occurs anywhere inside `path`.
///
/// Returns the length of the trimmed key so callers can prefer the longest
/// match. A key that trims to nothing never matches.
pub fn containment_match(key: &str, path: &str) -> Option<usize> {
    let core = key.trim_matches(|c| c == '/' || c == '.');
    if core.is_empty() {
        return None;
    }
    path.contains(core).then_some(core.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_keys_for_dotted_dir() {
        assert_eq!(
            candidate_keys("./data/gsm8k/"),
            vec![
                "./data/gsm8k/",
                "data/gsm8k/",
                "/data/gsm8k/",
                "./data/gsm8k",
                "data/gsm8k",
                "/data/gsm8k",
            ]
        );
    }

    #[test]
    fn candidate_keys_for_plain_relative_path() {
        assert_eq!(
            candidate_keys("data/fake_dataset"),
            vec![
                "data/fake_dataset",
                "/data/fake_dataset",
                "data/fake_dataset/",
                "/data/fake_dataset/",
            ]
        );
    }

    #[test]
    fn candidate_keys_for_rooted_path() {
        let keys = candidate_keys("/longbenchv2");
        assert_eq!(keys[0], "/longbenchv2");
        assert_eq!(keys[1], "longbenchv2");
        assert!(keys.contains(&"/longbenchv2/".to_string()));
    }

    #[test]
    fn candidate_keys_skip_empty_spellings() {
        assert_eq!(candidate_keys("/"), Vec::<String>::new());
        assert_eq!(candidate_keys(""), Vec::<String>::new());
    }

    #[test]
    fn containment_matches_trimmed_key_anywhere_in_path() {
        assert_eq!(containment_match("/gsm8k/", "./data/gsm8k/"), Some(5));
        assert_eq!(containment_match("/aime", "./data/aime.jsonl"), Some(4));
        assert_eq!(containment_match("/longbench", "./data/longbenchv2"), Some(9));
        assert_eq!(
            containment_match("data/adv_glue", "./data/adv_glue/dev_ann.json"),
            Some(13)
        );
        assert_eq!(containment_match("/math/", "./data/gsm8k/"), None);
    }

    #[test]
    fn noise_only_keys_never_match() {
        assert_eq!(containment_match("/", "./data/x"), None);
        assert_eq!(containment_match("./", "./data/x"), None);
        assert_eq!(containment_match("", "./data/x"), None);
    }
}
