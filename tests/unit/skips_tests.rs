//! Unit tests for skip record merging

#[cfg(test)]
mod tests {
    use report_merge::models::SkipInfo;
    use report_merge::services::skips::SkipList;

    fn skip(suite: &str, browser: &str, comment: Option<&str>) -> SkipInfo {
        SkipInfo {
            suite: suite.to_string(),
            browser: browser.to_string(),
            comment: comment.map(str::to_string),
        }
    }

    #[test]
    fn test_merge_appends_only_new_records() {
        let mut list = SkipList::new(vec![skip("suite", "yabro", None)]);

        let added = list.merge(vec![
            skip("suite", "yabro", None),
            skip("suite", "foobro", None),
        ]);

        assert_eq!(added, 1);
        assert_eq!(
            list.into_vec(),
            vec![skip("suite", "yabro", None), skip("suite", "foobro", None)]
        );
    }

    #[test]
    fn test_comment_is_part_of_identity() {
        let mut list = SkipList::new(vec![skip("suite", "yabro", Some("flaky"))]);

        let added = list.merge(vec![skip("suite", "yabro", Some("broken"))]);

        assert_eq!(added, 1);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_duplicates_within_one_batch_are_collapsed() {
        let mut list = SkipList::default();
        assert!(list.is_empty());

        let added = list.merge(vec![
            skip("suite", "yabro", None),
            skip("suite", "yabro", None),
        ]);

        assert_eq!(added, 1);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_initial_records_are_kept_as_given() {
        let initial = vec![skip("suite", "yabro", None), skip("suite", "yabro", None)];

        let list = SkipList::new(initial.clone());

        assert_eq!(list.into_vec(), initial);
    }
}
