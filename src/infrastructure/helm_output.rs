//! Parsers for helm's tabular text output
//!
//! Every listing helm prints starts with a header line and a separator
//! line, followed by one row per entry. Rows that do not have the expected
//! shape are skipped so a format drift degrades to partial results instead
//! of failing the whole listing.

use std::collections::BTreeMap;

/// Lines preceding the first data row
const HEADER_LINES: usize = 2;

/// Data rows of a helm listing
fn rows(output: &str) -> impl Iterator<Item = &str> {
    output.lines().skip(HEADER_LINES)
}

/// `helm repo list`: repository name → URL (empty when the row has no URL column)
pub fn parse_repo_list(output: &str) -> BTreeMap<String, String> {
    rows(output)
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let name = fields.next()?;
            let url = fields.next().unwrap_or_default();
            Some((name.to_string(), url.to_string()))
        })
        .collect()
}

/// `helm search <chart> --versions`: the version column, in helm's order
pub fn parse_chart_versions(output: &str) -> Vec<String> {
    rows(output)
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(str::to_string)
        .collect()
}

/// `helm list`: release name → status, from tab-separated rows of more than three fields
pub fn parse_release_statuses(output: &str) -> BTreeMap<String, String> {
    rows(output)
        .filter_map(|line| {
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() > 3 {
                Some((fields[0].trim().to_string(), fields[3].trim().to_string()))
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repo_list() {
        let output = "NAME\tURL\n---\nrepo1\thttp://a\nrepo2\n";
        let repos = parse_repo_list(output);
        assert_eq!(repos.len(), 2);
        assert_eq!(repos["repo1"], "http://a");
        assert_eq!(repos["repo2"], "");
    }

    #[test]
    fn test_parse_repo_list_skips_blank_rows_and_extra_columns() {
        let output = "NAME    URL\n\nstable  https://charts.example.com  extra\n   \nlocal   http://127.0.0.1:8879/charts";
        let repos = parse_repo_list(output);
        assert_eq!(repos.len(), 2);
        assert_eq!(repos["stable"], "https://charts.example.com");
        assert_eq!(repos["local"], "http://127.0.0.1:8879/charts");
    }

    #[test]
    fn test_header_rows_always_skipped() {
        // The first two lines are dropped even when they look like data
        let output = "repo0 http://zero\nrepo00 http://zerozero\nrepo1 http://one";
        let repos = parse_repo_list(output);
        assert_eq!(repos.keys().collect::<Vec<_>>(), vec!["repo1"]);
    }

    #[test]
    fn test_short_output_yields_nothing() {
        assert!(parse_repo_list("").is_empty());
        assert!(parse_repo_list("NAME URL").is_empty());
        assert!(parse_chart_versions("NAME").is_empty());
        assert!(parse_release_statuses("").is_empty());
    }

    #[test]
    fn test_parse_chart_versions() {
        let output = "NAME\tCHART VERSION\tAPP VERSION\tDESCRIPTION\n\nmychart\t1.2.0\n";
        assert_eq!(parse_chart_versions(output), vec!["1.2.0"]);
    }

    #[test]
    fn test_parse_chart_versions_preserves_order_and_duplicates() {
        let output = "NAME CHART VERSION\n--\n\
                      stable/app 0.3.0 1.0 App\n\
                      stable/app 0.2.0 1.0 App\n\
                      lonely\n\
                      stable/app 0.3.0 1.0 App";
        assert_eq!(
            parse_chart_versions(output),
            vec!["0.3.0", "0.2.0", "0.3.0"]
        );
    }

    #[test]
    fn test_parse_release_statuses() {
        let output = "NAME\tREVISION\tUPDATED\tSTATUS\n\nrel\tx\ty\tDEPLOYED\n";
        let statuses = parse_release_statuses(output);
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses["rel"], "DEPLOYED");
    }

    #[test]
    fn test_parse_release_statuses_drops_short_rows_and_trims() {
        let output = "NAME\tREVISION\tUPDATED\tSTATUS\tCHART\n\n\
                      short\t1\tMon\n\
                      web   \t3\tTue Jan  2 10:00:00 2018\t FAILED \tweb-0.1.0\n\
                      plain row without tabs";
        let statuses = parse_release_statuses(output);
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses["web"], "FAILED");
    }
}
