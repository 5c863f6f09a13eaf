//! Unit tests for attempt history linearization

#[cfg(test)]
mod tests {
    use crate::fixtures::{browser, result, result_with_image};
    use report_merge::models::Status;
    use report_merge::services::linearize::linearize;

    #[test]
    fn test_source_result_becomes_current() {
        let mut target = browser("yabro", result(Status::SUCCESS, 0), vec![]);
        let source = browser("yabro", result(Status::FAIL, 0), vec![]);

        linearize(&mut target, source);

        assert_eq!(target.result, result(Status::FAIL, 1));
        assert_eq!(target.retries, vec![result(Status::SUCCESS, 0)]);
    }

    #[test]
    fn test_histories_are_concatenated_and_renumbered() {
        let mut target = browser(
            "yabro",
            result(Status::ERROR, 1),
            vec![result(Status::ERROR, 0)],
        );
        let source = browser(
            "yabro",
            result(Status::FAIL, 1),
            vec![result(Status::FAIL, 0)],
        );

        linearize(&mut target, source);

        let attempts: Vec<_> = target.attempts().map(|a| (a.status, a.attempt)).collect();
        assert_eq!(
            attempts,
            vec![
                (Status::ERROR, 0),
                (Status::ERROR, 1),
                (Status::FAIL, 2),
                (Status::FAIL, 3),
            ]
        );
    }

    #[test]
    fn test_stale_attempt_numbers_are_overwritten() {
        let mut target = browser(
            "yabro",
            result(Status::FAIL, 7),
            vec![result(Status::FAIL, 7), result(Status::FAIL, 7)],
        );
        let source = browser("yabro", result(Status::SUCCESS, 9), vec![]);

        linearize(&mut target, source);

        let numbers: Vec<u32> = target.attempts().map(|a| a.attempt).collect();
        assert_eq!(numbers, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_attempt_payload_is_kept() {
        let mut target = browser(
            "yabro",
            result_with_image(Status::FAIL, 0, "images/a_0.png"),
            vec![],
        );
        let source = browser(
            "yabro",
            result_with_image(Status::SUCCESS, 0, "images/b_1.png"),
            vec![],
        );

        linearize(&mut target, source);

        let first = target.retries[0].images_info[0].actual_img.as_ref().unwrap();
        let current = target.result.images_info[0].actual_img.as_ref().unwrap();
        assert_eq!(first.path, "images/a_0.png");
        assert_eq!(current.path, "images/b_1.png");
    }

    #[test]
    fn test_target_name_and_fields_are_kept() {
        let mut target = browser("yabro", result(Status::SUCCESS, 0), vec![]);
        target
            .extra
            .insert("comment".to_string(), serde_json::json!("target"));
        let mut source = browser("yabro", result(Status::FAIL, 0), vec![]);
        source
            .extra
            .insert("comment".to_string(), serde_json::json!("source"));

        linearize(&mut target, source);

        assert_eq!(target.name, "yabro");
        assert_eq!(target.extra["comment"], serde_json::json!("target"));
    }
}
