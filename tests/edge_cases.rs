use gitparse::error::ParseError;
use gitparse::parser::{LineKind, parse_config_with};
use gitparse::{
    EmailPolicy, GitOutputParser, OutputKind, ParsedOutput, ParserConfig, parse_branches,
    parse_config, parse_diff, parse_log, parse_ls_remote, parse_remotes, parse_status, parse_tags,
};

/// Test parsing completely empty git output
#[test]
fn test_parse_empty_outputs() {
    assert!(parse_diff("").unwrap().is_empty());
    assert!(parse_log("").unwrap().is_empty());
    assert!(parse_config("").unwrap().is_empty());
    assert!(parse_branches("").unwrap().is_empty());
    assert!(parse_tags("").unwrap().is_empty());
    assert!(parse_remotes("").unwrap().is_empty());
    assert!(parse_ls_remote("").unwrap().is_empty());

    // Status is the only parser that needs something to read
    assert!(matches!(parse_status(""), Err(ParseError::MalformedInput(_))));
}

/// Test parsing very long file paths
#[test]
fn test_parse_very_long_paths() {
    let long_path = "a/".repeat(100) + "file.txt";
    let output = format!("## main\nM  {}\n", long_path);
    let status = parse_status(&output).unwrap();

    assert_eq!(status.files.len(), 1);
    assert!(status.files.contains_key(&long_path));
}

/// Test parsing unicode file names
#[test]
fn test_parse_unicode_paths() {
    let status = parse_status("## main\n?? données/été.txt\n").unwrap();
    assert!(status.files["données/été.txt"].is_new);

    let diffs = parse_diff("diff --git a/日本.txt b/日本.txt\nold mode 100644\nnew mode 100755\n").unwrap();
    assert_eq!(diffs[0].b_path, "日本.txt");
}

/// Test status lines shorter than the code + separator
#[test]
fn test_parse_truncated_status_line() {
    let status = parse_status("## main\nM\n").unwrap();
    assert_eq!(status.files.len(), 1);
    assert!(status.files.contains_key(""));
}

/// Test parsing commits with very long messages
#[test]
fn test_parse_commits_long_messages() {
    let long_msg = "A".repeat(10000);
    let output = format!("commit abc\nAuthor: A <a@x>\n\n    {}\n", long_msg);
    let commits = parse_log(&output).unwrap();

    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].message.len(), 10000);
}

/// Test a message line that mentions a commit without starting a new record
#[test]
fn test_message_mentioning_commit() {
    let output = "commit abc\nAuthor: A <a@x>\n\n    Revert\n\n    This reverts commit 123.\n";
    let commits = parse_log(output).unwrap();

    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].message, "Revert\n\nThis reverts commit 123.");
}

/// Test parsing many commits in sequence
#[test]
fn test_parse_many_commits() {
    let mut output = String::new();
    for i in 0..50 {
        output.push_str(&format!("commit {:040x}\nAuthor: Dev <dev@example.com>\n\n    Change {}\n\n", i, i));
    }
    let commits = parse_log(&output).unwrap();

    assert_eq!(commits.len(), 50);
    assert!(commits.iter().enumerate().all(|(i, c)| c.message == format!("Change {}", i)));
}

/// Test a malformed second commit aborts the whole log parse
#[test]
fn test_log_error_discards_partial_results() {
    let output = "commit abc\nAuthor: A <a@x>\n\n    fine\n\ncommit def\nCommit: nobody\n\n    bad\n";

    assert_eq!(parse_log(output).unwrap().len(), 2);

    let err = parse_log_strict(output).unwrap_err();
    assert_eq!(err.raw_line(), Some("Commit: nobody"));
}

fn parse_log_strict(output: &str) -> Result<Vec<gitparse::Commit>, ParseError> {
    let mut config = ParserConfig::default();
    config.log.missing_email = EmailPolicy::Strict;
    GitOutputParser::new(config).log(output)
}

/// Test parsing branch names with special characters
#[test]
fn test_parse_branches_special_chars() {
    let output = "* feature/FOO-123\n  bugfix/issue-456\n  release/v1.0.0";
    let result = parse_branches(output).unwrap();

    assert_eq!(result.len(), 3);
    assert_eq!(result[0].name, "feature/FOO-123");
    assert!(result[0].current);
    assert_eq!(result[1].name, "bugfix/issue-456");
    assert_eq!(result[2].name, "release/v1.0.0");
}

/// Test Windows line endings are accepted everywhere
#[test]
fn test_crlf_line_endings() {
    assert_eq!(parse_tags("v1\r\nv2\r\n").unwrap(), vec!["v1", "v2"]);
    assert_eq!(parse_branches("* main\r\n  dev\r\n").unwrap()[1].name, "dev");
    assert_eq!(parse_status("## main\r\nM  a.rs\r\n").unwrap().branch, "main");

    let commits = parse_log("commit abc\r\nAuthor: A <a@x>\r\n\r\n    hi\r\n").unwrap();
    assert_eq!(commits[0].message, "hi");
}

/// Test a diff whose body contains text that looks like headers
#[test]
fn test_diff_body_with_header_like_lines() {
    let output = "\
diff --git a/README.md b/README.md
index 1111111..2222222 100644
--- a/README.md
+++ b/README.md
@@ -1,2 +1,2 @@
 index of things
---- horizontal rule
+++++ bold rule
";
    let diffs = parse_diff(output).unwrap();
    let lines = &diffs[0].lines;

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1].kind(), LineKind::Context);
    assert_eq!(lines[2].kind(), LineKind::Removed);
    assert_eq!(lines[3].kind(), LineKind::Added);
}

/// Test that a bad hunk header in the middle does not panic and reports its line
#[test]
fn test_diff_bad_hunk_header() {
    let output = "diff --git a/x b/x\nindex 1..2\n--- a/x\n+++ b/x\n@@ -a +b @@\n";
    match parse_diff(output) {
        Err(ParseError::MalformedHeader { line_number, line }) => {
            assert_eq!(line_number, 5);
            assert_eq!(line, "@@ -a +b @@");
        }
        other => panic!("expected MalformedHeader, got {:?}", other),
    }
}

/// Test the documented `=` truncation and its opt-out
#[test]
fn test_config_values_with_equals() {
    let output = "remote.origin.fetch=+refs/heads/*:refs/remotes/origin/*\nalias.x=log --format=%h\n";

    let truncated = parse_config(output).unwrap();
    assert_eq!(truncated["remote.origin.fetch"], "+refs/heads/*:refs/remotes/origin/*");
    assert_eq!(truncated["alias.x"], "log --format");

    let full = parse_config_with(output, true).unwrap();
    assert_eq!(full["alias.x"], "log --format=%h");
}

/// Test ls-remote output with peeled tags and a `From` banner
#[test]
fn test_ls_remote_peeled_tags() {
    let sha = "f".repeat(40);
    let output = format!("From https://example.com/repo.git\n{sha}\trefs/tags/v1\n{sha}\trefs/tags/v1^{{}}\n");
    let refs = parse_ls_remote(&output).unwrap();

    assert_eq!(refs.len(), 2);
    assert_eq!(refs[1].name, "refs/tags/v1^{}");
}

/// Test parsed output serializes for callers that want JSON
#[test]
fn test_parsed_output_serializes() {
    let parser = GitOutputParser::default();
    let parsed = parser.parse_as(OutputKind::Branch, "* main\n").unwrap();
    let json = serde_json::to_value(&parsed).unwrap();

    assert_eq!(json, serde_json::json!([{ "name": "main", "current": true }]));
    assert!(matches!(parsed, ParsedOutput::Branches(_)));
}
