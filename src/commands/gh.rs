use crate::external::Tools;

/// Number of the merged pull request whose head is `branch`, if any.
/// jq prints `null` for an empty result list.
pub fn merged_pr(tools: &dyn Tools, branch: &str) -> Option<String> {
    let args = [
        "pr", "list", "--head", branch, "--state", "merged", "--json", "number", "--jq",
        ".[0].number",
    ];
    tools.run("gh", &args).filter(|n| n != "null")
}
