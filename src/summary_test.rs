/// Tests for summary module
#[cfg(test)]
mod tests {
    use crate::document::ResultDocument;
    use crate::format::NOT_AVAILABLE;
    use crate::summary::*;
    use serde_json::json;

    const SAMPLE: &str = include_str!("../tests/fixtures/summary.json");

    fn sample_summary() -> ResultSummary {
        let doc = ResultDocument::parse(SAMPLE).expect("sample should parse");
        summarize(&doc, "API Performance Test", "staging")
    }

    fn value_of<'a>(summary: &'a ResultSummary, label: &str) -> &'a str {
        summary
            .metrics
            .iter()
            .find(|m| m.label == label)
            .map(|m| m.value.as_str())
            .unwrap_or_else(|| panic!("no metric row labelled {}", label))
    }

    #[test]
    fn test_metric_rows_in_fixed_order() {
        let summary = sample_summary();
        let labels: Vec<&str> = summary.metrics.iter().map(|m| m.label.as_str()).collect();

        assert_eq!(
            labels,
            vec![
                "Response Time (avg)",
                "Response Time (min)",
                "Response Time (med)",
                "Response Time (max)",
                "Response Time (p90)",
                "Response Time (p95)",
                "Time to First Byte (avg)",
                "Connection Time (avg)",
                "TLS Handshake (avg)",
                "Sending Time (avg)",
                "Receiving Time (avg)",
                "Blocking Time (avg)",
                "Data Received",
                "Data Sent",
                "Total Requests",
                "Request Rate",
                "Iterations",
                "Iteration Rate",
                "Virtual Users",
                "Success Rate",
            ]
        );
    }

    #[test]
    fn test_sample_values() {
        let summary = sample_summary();

        assert_eq!(value_of(&summary, "Response Time (avg)"), "76.24ms");
        assert_eq!(value_of(&summary, "Response Time (max)"), "139.28ms");
        assert_eq!(value_of(&summary, "Data Received"), "274.55 KB/s");
        assert_eq!(value_of(&summary, "Data Sent"), "1.28 KB/s");
        assert_eq!(value_of(&summary, "Total Requests"), "130");
        assert_eq!(value_of(&summary, "Request Rate"), "12.64/s");
        assert_eq!(value_of(&summary, "Virtual Users"), "1");
        assert_eq!(value_of(&summary, "Success Rate"), "100.00%");
    }

    #[test]
    fn test_zero_failure_rate_passes() {
        let summary = sample_summary();
        assert_eq!(summary.status, RunStatus::Passed);
        assert_eq!(summary.status.to_string(), "passed");
    }

    #[test]
    fn test_positive_failure_rate_fails() {
        let doc = ResultDocument::from_json(&json!({
            "metrics": { "http_req_failed": { "values": { "rate": 0.05 } } }
        }))
        .unwrap();
        let summary = summarize(&doc, "t", "e");

        assert_eq!(summary.status, RunStatus::Failed);
        assert_eq!(summary.status.as_str(), "failed");
        assert_eq!(value_of(&summary, "Success Rate"), "95.00%");
    }

    #[test]
    fn test_empty_document_degrades_to_not_available() {
        let doc = ResultDocument::parse("{}").unwrap();
        let summary = summarize(&doc, "API Performance Test", "staging");

        assert_eq!(summary.status, RunStatus::Passed);
        assert_eq!(summary.metrics.len(), 20);
        assert!(summary.metrics.iter().all(|m| m.value == NOT_AVAILABLE), "every row should be N/A");
        assert!(summary.checks.is_empty());
    }

    #[test]
    fn test_partial_metric_keeps_row() {
        let doc = ResultDocument::from_json(&json!({
            "metrics": { "http_req_duration": { "values": { "avg": 10.0 } } }
        }))
        .unwrap();
        let summary = summarize(&doc, "t", "e");

        assert_eq!(value_of(&summary, "Response Time (avg)"), "10.00ms");
        assert_eq!(value_of(&summary, "Response Time (max)"), NOT_AVAILABLE);
    }

    #[test]
    fn test_test_name_and_environment_carried() {
        let doc = ResultDocument::parse("{}").unwrap();
        let summary = summarize(&doc, "Checkout flow", "production");
        assert_eq!(summary.test_name, "Checkout flow");
        assert_eq!(summary.environment, "production");
    }

    #[test]
    fn test_checks_merged_by_name() {
        let summary = sample_summary();
        let names: Vec<&str> = summary.checks.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["status is 200", "body not empty", "cart has items"]);

        let status = &summary.checks[0];
        assert_eq!((status.passes, status.fails), (130, 0));
        assert_eq!(status.rate, "100.00%");

        assert_eq!(summary.checks[1].rate, "100%");
        assert_eq!(summary.checks[2].rate, "80.00%");
    }

    fn export_document(fail_ratio: f64) -> ResultDocument {
        ResultDocument::from_json(&json!({
            "metrics": {
                "http_req_duration": {
                    "avg": 76.24, "min": 40.5, "med": 70.1, "max": 139.28, "p(90)": 120.5, "p(95)": 130.25,
                    "thresholds": { "p(95)<500": false }
                },
                "http_req_failed": { "passes": 2, "fails": 128, "value": fail_ratio },
                "http_reqs": { "count": 130, "rate": 12.64 },
                "vus": { "value": 1, "min": 1, "max": 1 }
            },
            "root_group": {
                "name": "",
                "groups": {
                    "checkout": {
                        "name": "checkout",
                        "groups": {},
                        "checks": {
                            "cart has items": { "name": "cart has items", "path": "::checkout::cart has items", "passes": 8, "fails": 2 }
                        }
                    }
                },
                "checks": {
                    "status is 200": { "name": "status is 200", "path": "::status is 200", "passes": 130, "fails": 0 }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_summary_export_layout() {
        let summary = summarize(&export_document(0.0), "t", "e");

        assert_eq!(summary.status, RunStatus::Passed);
        assert_eq!(value_of(&summary, "Response Time (avg)"), "76.24ms");
        assert_eq!(value_of(&summary, "Response Time (max)"), "139.28ms");
        assert_eq!(value_of(&summary, "Total Requests"), "130");
        assert_eq!(value_of(&summary, "Request Rate"), "12.64/s");
        assert_eq!(value_of(&summary, "Virtual Users"), "1");
        assert_eq!(value_of(&summary, "Success Rate"), "100.00%");

        let names: Vec<&str> = summary.checks.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["status is 200", "cart has items"]);
        assert_eq!(summary.checks[1].rate, "80.00%");
    }

    #[test]
    fn test_summary_export_failure_ratio() {
        let summary = summarize(&export_document(0.05), "t", "e");

        assert_eq!(summary.status, RunStatus::Failed);
        assert_eq!(value_of(&summary, "Success Rate"), "95.00%");
    }
}
