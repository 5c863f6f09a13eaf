//! Unit tests for report counters

#[cfg(test)]
mod tests {
    use crate::fixtures::{browser, result, suite_tree, suite_tree_at};
    use report_merge::models::{StatCounters, Status};
    use report_merge::services::stats::Stats;

    fn counters(total: u64, passed: u64, failed: u64, skipped: u64, retries: u64) -> StatCounters {
        StatCounters {
            total,
            passed,
            failed,
            skipped,
            retries,
        }
    }

    #[test]
    fn test_record_new_counts_test_and_history() {
        let mut stats = Stats::default();

        stats.record_new(&browser(
            "yabro",
            result(Status::FAIL, 2),
            vec![result(Status::FAIL, 0), result(Status::ERROR, 1)],
        ));

        assert_eq!(stats.totals, counters(1, 0, 1, 0, 2));
        assert_eq!(stats.per_browser["yabro"], counters(1, 0, 1, 0, 2));
    }

    #[test]
    fn test_updated_counts_as_passed() {
        let mut stats = Stats::default();

        stats.record_new(&browser("yabro", result(Status::UPDATED, 0), vec![]));

        assert_eq!(stats.totals.passed, 1);
    }

    #[test]
    fn test_pending_browser_is_not_a_test() {
        let mut stats = Stats::default();

        stats.record_new(&browser("yabro", result(Status::RUNNING, 0), vec![]));

        assert_eq!(stats.totals.total, 0);
    }

    #[test]
    fn test_record_update_moves_between_buckets() {
        let mut stats = Stats::new(counters(1, 1, 0, 0, 0), Default::default());
        stats
            .per_browser
            .insert("yabro".to_string(), counters(1, 1, 0, 0, 0));

        stats.record_update("yabro", Status::SUCCESS, Status::FAIL, 0, 1);

        assert_eq!(stats.totals, counters(1, 0, 1, 0, 1));
        assert_eq!(stats.per_browser["yabro"], counters(1, 0, 1, 0, 1));
    }

    #[test]
    fn test_decrement_saturates_at_zero() {
        let mut stats = Stats::default();

        stats.record_update("yabro", Status::SUCCESS, Status::SKIPPED, 0, 1);

        assert_eq!(stats.totals, counters(0, 0, 0, 1, 1));
    }

    #[test]
    fn test_from_suites_walks_nested_nodes() {
        let suites = vec![
            suite_tree(vec![
                browser("yabro", result(Status::SUCCESS, 1), vec![result(Status::FAIL, 0)]),
                browser("foobro", result(Status::SKIPPED, 0), vec![]),
            ]),
            suite_tree_at(
                "other",
                "state",
                vec![browser("yabro", result(Status::ERROR, 0), vec![])],
            ),
        ];

        let stats = Stats::from_suites(&suites);

        assert_eq!(stats.totals, counters(3, 1, 1, 1, 1));
        assert_eq!(stats.per_browser["yabro"], counters(2, 1, 1, 0, 1));
        assert_eq!(stats.per_browser["foobro"], counters(1, 0, 0, 1, 0));
    }
}
