//! Porcelain-v2 line grammar. See SPEC_FULL.md §4.4 for the line shapes.

use super::model::{BranchRef, ChangeType, FileEntry, RepoState};
use crate::error::ParseError;
use std::path::PathBuf;

enum ParsedLine {
    BranchHead(String),
    BranchUpstream(String),
    Changed { xy: (ChangeType, ChangeType), path: PathBuf },
    RenamedOrCopied { xy: (ChangeType, ChangeType), new_path: PathBuf },
    Unmerged { path: PathBuf },
    Untracked { path: PathBuf },
    Ignored,
}

fn parse_xy(field: &str) -> Result<(ChangeType, ChangeType), ParseError> {
    let mut chars = field.chars();
    let (Some(x), Some(y), None) = (chars.next(), chars.next(), chars.next()) else {
        return Err(ParseError::InvalidXY(field.to_string()));
    };
    Ok((ChangeType::from_char(x)?, ChangeType::from_char(y)?))
}

fn field<'a>(parts: &mut impl Iterator<Item = &'a str>, name: &'static str, line: &str) -> Result<&'a str, ParseError> {
    parts
        .next()
        .ok_or_else(|| ParseError::MissingField(name, line.to_string()))
}

fn parse_line(line: &str) -> Result<Option<ParsedLine>, ParseError> {
    if line.is_empty() {
        return Ok(None);
    }

    if let Some(rest) = line.strip_prefix("# branch.head ") {
        return Ok(Some(ParsedLine::BranchHead(rest.to_string())));
    }
    if let Some(rest) = line.strip_prefix("# branch.upstream ") {
        return Ok(Some(ParsedLine::BranchUpstream(rest.to_string())));
    }
    if line.starts_with('#') {
        return Ok(None);
    }

    if let Some(path) = line.strip_prefix("? ") {
        return Ok(Some(ParsedLine::Untracked {
            path: PathBuf::from(path),
        }));
    }
    if line.strip_prefix('!').is_some() {
        return Ok(Some(ParsedLine::Ignored));
    }

    if let Some(rest) = line.strip_prefix("1 ") {
        // 7 fixed fields, then "path" is the rest of the line verbatim
        // (it may itself contain spaces).
        let mut parts = rest.splitn(8, ' ');
        let xy = parse_xy(field(&mut parts, "XY", line)?)?;
        let _sub = field(&mut parts, "sub", line)?;
        let _m_h = field(&mut parts, "mH", line)?;
        let _m_i = field(&mut parts, "mI", line)?;
        let _m_w = field(&mut parts, "mW", line)?;
        let _o_h = field(&mut parts, "oH", line)?;
        let _o_i = field(&mut parts, "oI", line)?;
        let path = field(&mut parts, "path", line)?;
        return Ok(Some(ParsedLine::Changed {
            xy,
            path: PathBuf::from(path),
        }));
    }

    if let Some(rest) = line.strip_prefix("2 ") {
        let mut parts = rest.splitn(9, ' ');
        let xy = parse_xy(field(&mut parts, "XY", line)?)?;
        let _sub = field(&mut parts, "sub", line)?;
        let _m_h = field(&mut parts, "mH", line)?;
        let _m_i = field(&mut parts, "mI", line)?;
        let _m_w = field(&mut parts, "mW", line)?;
        let _o_h = field(&mut parts, "oH", line)?;
        let _o_i = field(&mut parts, "oI", line)?;
        let score = field(&mut parts, "score", line)?;
        if !score.starts_with('R') && !score.starts_with('C') {
            return Err(ParseError::InvalidScoreType(score.to_string()));
        }
        let path_pair = field(&mut parts, "path_pair", line)?;
        let new_path = path_pair
            .split_once('\t')
            .map(|(new, _old)| new)
            .unwrap_or(path_pair);
        return Ok(Some(ParsedLine::RenamedOrCopied {
            xy,
            new_path: PathBuf::from(new_path),
        }));
    }

    if let Some(rest) = line.strip_prefix("u ") {
        let mut parts = rest.splitn(10, ' ');
        let _xy = field(&mut parts, "XY", line)?;
        let _sub = field(&mut parts, "sub", line)?;
        let _m1 = field(&mut parts, "m1", line)?;
        let _m2 = field(&mut parts, "m2", line)?;
        let _m3 = field(&mut parts, "m3", line)?;
        let _m_w = field(&mut parts, "mW", line)?;
        let _o1 = field(&mut parts, "o1", line)?;
        let _o2 = field(&mut parts, "o2", line)?;
        let _o3 = field(&mut parts, "o3", line)?;
        let path = field(&mut parts, "path", line)?;
        return Ok(Some(ParsedLine::Unmerged {
            path: PathBuf::from(path),
        }));
    }

    Ok(None)
}

/// Parses a full `git status --branch --porcelain=v2` buffer into a
/// [`RepoState`] (branch head/upstream and the three unsorted `staged` /
/// `unstaged` / `untracked` projections — callers sort afterwards, per
/// §4.4 step 5).
pub fn parse_porcelain_v2(raw_status: &str) -> Result<RepoState, ParseError> {
    let mut state = RepoState {
        raw_status: raw_status.to_string(),
        ..Default::default()
    };

    for line in raw_status.lines() {
        match parse_line(line)? {
            None => {}
            Some(ParsedLine::BranchHead(name)) => state.branch_head = Some(name),
            Some(ParsedLine::BranchUpstream(name)) => state.branch_upstream = Some(name),
            Some(ParsedLine::Ignored) => {}
            Some(ParsedLine::Untracked { path }) => {
                state.untracked.push(FileEntry::new(path, "untracked"));
            }
            Some(ParsedLine::Unmerged { path }) => {
                state.unstaged.push(FileEntry::new(path, "unmerged"));
            }
            Some(ParsedLine::Changed { xy: (x, y), path }) => {
                project_xy(&mut state, x, y, path);
            }
            Some(ParsedLine::RenamedOrCopied { xy: (x, y), new_path }) => {
                project_xy(&mut state, x, y, new_path);
            }
        }
    }

    state.staged.sort_by(|a, b| a.path.cmp(&b.path));
    state.unstaged.sort_by(|a, b| a.path.cmp(&b.path));
    state.untracked.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(state)
}

fn project_xy(state: &mut RepoState, x: ChangeType, y: ChangeType, path: PathBuf) {
    if x != ChangeType::Unmodified {
        state.staged.push(FileEntry::new(path.clone(), x.name()));
    }
    if y != ChangeType::Unmodified {
        state.unstaged.push(FileEntry::new(path, y.name()));
    }
}

/// Parses one non-empty line of `git branch --format=...` (see §4.4 step
/// 3); tab-separated `is_head_marker / objectname / refname / subject /
/// upstream`.
pub fn parse_branch_line(line: &str) -> Option<BranchRef> {
    if line.trim().is_empty() {
        return None;
    }
    let mut parts = line.split('\t');
    let is_head_marker = parts.next()?;
    let objectname = parts.next()?.to_string();
    let refname = parts.next()?.to_string();
    let subject = parts.next()?.to_string();
    let upstream = parts.next().unwrap_or("").to_string();

    Some(BranchRef {
        is_head: is_head_marker.as_bytes().first() == Some(&b'+'),
        objectname,
        refname,
        subject,
        upstream,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# branch.head main
# branch.upstream origin/main
1 M. N... 100644 100644 100644 1111111111111111111111111111111111111111 2222222222222222222222222222222222222222 staged_only.rs
1 .M N... 100644 100644 100644 1111111111111111111111111111111111111111 2222222222222222222222222222222222222222 unstaged_only.rs
1 MM N... 100644 100644 100644 1111111111111111111111111111111111111111 2222222222222222222222222222222222222222 both.rs
2 R. N... 100644 100644 100644 1111111111111111111111111111111111111111 2222222222222222222222222222222222222222 R100 new_name.rs\told_name.rs
u UU N... 100644 100644 100644 100644 1111111111111111111111111111111111111111 2222222222222222222222222222222222222222 3333333333333333333333333333333333333333 conflict.rs
? untracked_file.rs
! ignored_file.rs
";

    #[test]
    fn parses_branch_head_and_upstream() {
        let state = parse_porcelain_v2(SAMPLE).unwrap();
        assert_eq!(state.branch_head.as_deref(), Some("main"));
        assert_eq!(state.branch_upstream.as_deref(), Some("origin/main"));
    }

    #[test]
    fn projects_staged_and_unstaged_from_xy() {
        let state = parse_porcelain_v2(SAMPLE).unwrap();
        let staged_paths: Vec<_> = state.staged.iter().map(|e| e.path.to_str().unwrap().to_string()).collect();
        let unstaged_paths: Vec<_> = state.unstaged.iter().map(|e| e.path.to_str().unwrap().to_string()).collect();

        assert!(staged_paths.contains(&"staged_only.rs".to_string()));
        assert!(staged_paths.contains(&"both.rs".to_string()));
        assert!(unstaged_paths.contains(&"unstaged_only.rs".to_string()));
        assert!(unstaged_paths.contains(&"both.rs".to_string()));
    }

    #[test]
    fn renamed_entry_uses_new_path() {
        let state = parse_porcelain_v2(SAMPLE).unwrap();
        assert!(state
            .staged
            .iter()
            .any(|e| e.path.to_str() == Some("new_name.rs")));
        assert!(!state
            .staged
            .iter()
            .any(|e| e.path.to_str() == Some("old_name.rs")));
    }

    #[test]
    fn unmerged_entry_lands_in_unstaged_with_label() {
        let state = parse_porcelain_v2(SAMPLE).unwrap();
        let entry = state
            .unstaged
            .iter()
            .find(|e| e.path.to_str() == Some("conflict.rs"))
            .unwrap();
        assert_eq!(entry.status_name, "unmerged");
    }

    #[test]
    fn untracked_entry_is_labeled_untracked_and_ignored_is_dropped() {
        let state = parse_porcelain_v2(SAMPLE).unwrap();
        assert_eq!(state.untracked.len(), 1);
        assert_eq!(state.untracked[0].status_name, "untracked");
        assert!(state
            .untracked
            .iter()
            .all(|e| e.path.to_str() != Some("ignored_file.rs")));
    }

    #[test]
    fn sections_are_sorted_by_path() {
        let state = parse_porcelain_v2(SAMPLE).unwrap();
        let mut sorted_staged = state.staged.clone();
        sorted_staged.sort_by(|a, b| a.path.cmp(&b.path));
        assert_eq!(state.staged, sorted_staged);
    }

    #[test]
    fn invalid_xy_is_an_error() {
        let err = parse_porcelain_v2("1 X N... 100644 100644 100644 aa bb path.rs");
        assert!(err.is_err());
    }

    #[test]
    fn invalid_score_prefix_is_an_error() {
        let line = "2 R. N... 100644 100644 100644 aa bb Z100 new.rs\told.rs";
        assert!(parse_porcelain_v2(line).is_err());
    }

    #[test]
    fn branch_line_parses_head_marker_and_fields() {
        let head = parse_branch_line("+\tabc123\trefs/heads/main\tInitial commit\torigin/main").unwrap();
        assert!(head.is_head);
        assert_eq!(head.refname, "refs/heads/main");

        let other = parse_branch_line("-\tdef456\trefs/heads/feature\tWIP\t").unwrap();
        assert!(!other.is_head);
        assert_eq!(other.upstream, "");
    }

    #[test]
    fn empty_branch_lines_are_skipped() {
        assert!(parse_branch_line("").is_none());
        assert!(parse_branch_line("   ").is_none());
    }
}
