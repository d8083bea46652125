//! Coverage profiles: the textual block format produced by the standard
//! test tooling.
//!
//! A profile stream starts with a mode header (`mode: set`, `mode:
//! count` or `mode: atomic`) followed by one block per line:
//!
//! ```text
//! file-name:start-line.start-col,end-line.end-col stmt-count exec-count
//! ```
//!
//! File names are package-qualified paths with forward slashes. Parsing
//! and emission are byte-compatible with that grammar up to block
//! ordering.

mod merge;

pub use merge::{add_profile, add_profiles, apply_exclusions};

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use crate::result::{CourtneyError, CourtneyResult};

/// The counting mode a profile was collected under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Boolean coverage: blocks are hit or not.
    Set,
    /// Hit counting.
    Count,
    /// Hit counting with atomic increments.
    Atomic,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Set => "set",
            Self::Count => "count",
            Self::Atomic => "atomic",
        };
        f.write_str(s)
    }
}

impl FromStr for Mode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "set" => Ok(Self::Set),
            "count" => Ok(Self::Count),
            "atomic" => Ok(Self::Atomic),
            _ => Err(()),
        }
    }
}

/// One contiguous statement region of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// 1-based first line.
    pub start_line: u32,
    /// 1-based column on the first line.
    pub start_col: u32,
    /// 1-based last line.
    pub end_line: u32,
    /// 1-based column on the last line.
    pub end_col: u32,
    /// Number of statements in the block.
    pub statements: u32,
    /// Execution count observed by the test run.
    pub count: u64,
}

impl Block {
    /// Position key for ordering and identity: blocks are the same block
    /// iff start and end coincide.
    #[must_use]
    pub const fn key(&self) -> (u32, u32, u32, u32) {
        (self.start_line, self.start_col, self.end_line, self.end_col)
    }

    /// Whether two blocks intersect in line/column range.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        (self.start_line, self.start_col) <= (other.end_line, other.end_col)
            && (other.start_line, other.start_col) <= (self.end_line, self.end_col)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{},{}.{} {} {}",
            self.start_line, self.start_col, self.end_line, self.end_col, self.statements, self.count
        )
    }
}

/// All blocks recorded for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Package-qualified file name.
    pub file_name: String,
    /// Counting mode.
    pub mode: Mode,
    /// Blocks, ordered by start position.
    pub blocks: Vec<Block>,
}

/// Parse a profile stream. Blocks are grouped per file and sorted by
/// start position; the profiles come back sorted by file name.
pub fn parse_profiles(text: &str) -> CourtneyResult<Vec<Profile>> {
    let mut lines = text.lines();
    let Some(header) = lines.next() else {
        return Ok(Vec::new());
    };
    let mode = header
        .strip_prefix("mode: ")
        .and_then(|m| Mode::from_str(m.trim()).ok())
        .ok_or_else(|| CourtneyError::ProfileSyntax {
            line: header.to_string(),
        })?;

    let mut by_name: Vec<Profile> = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let (name, block) = parse_block_line(line)?;
        match by_name.binary_search_by(|p| p.file_name.as_str().cmp(name)) {
            Ok(i) => by_name[i].blocks.push(block),
            Err(i) => by_name.insert(
                i,
                Profile {
                    file_name: name.to_string(),
                    mode,
                    blocks: vec![block],
                },
            ),
        }
    }
    for profile in &mut by_name {
        profile.blocks.sort_by_key(Block::key);
    }
    Ok(by_name)
}

/// Read and parse a profile file.
pub fn read_profiles(path: &Path) -> CourtneyResult<Vec<Profile>> {
    let text = fs::read_to_string(path).map_err(|e| CourtneyError::io(path, e))?;
    parse_profiles(&text)
}

/// One block line: `name:SL.SC,EL.EC stmts count`. The name is split off
/// at the last colon so paths containing colons survive.
fn parse_block_line(line: &str) -> CourtneyResult<(&str, Block)> {
    let syntax = || CourtneyError::ProfileSyntax {
        line: line.to_string(),
    };

    let (name, rest) = line.rsplit_once(':').ok_or_else(syntax)?;
    let mut fields = rest.split_whitespace();
    let range = fields.next().ok_or_else(syntax)?;
    let statements = fields
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(syntax)?;
    let count = fields
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(syntax)?;
    if fields.next().is_some() || name.is_empty() {
        return Err(syntax());
    }

    let (start, end) = range.split_once(',').ok_or_else(syntax)?;
    let (start_line, start_col) = parse_pos(start).ok_or_else(syntax)?;
    let (end_line, end_col) = parse_pos(end).ok_or_else(syntax)?;

    Ok((
        name,
        Block {
            start_line,
            start_col,
            end_line,
            end_col,
            statements,
            count,
        },
    ))
}

fn parse_pos(s: &str) -> Option<(u32, u32)> {
    let (line, col) = s.split_once('.')?;
    Some((line.parse().ok()?, col.parse().ok()?))
}

/// Emit profiles in the textual format. The mode header comes from the
/// first profile; every block becomes one line.
pub fn write_profiles<W: Write>(profiles: &[Profile], out: &mut W) -> std::io::Result<()> {
    let Some(first) = profiles.first() else {
        return Ok(());
    };
    writeln!(out, "mode: {}", first.mode)?;
    for profile in profiles {
        for block in &profile.blocks {
            writeln!(out, "{}:{}", profile.file_name, block)?;
        }
    }
    Ok(())
}

/// Render profiles to a string.
#[must_use]
pub fn profiles_to_string(profiles: &[Profile]) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_profiles(profiles, &mut buf);
    String::from_utf8(buf).unwrap_or_default()
}

/// Write profiles to a file.
pub fn save_profiles(profiles: &[Profile], path: &Path) -> CourtneyResult<()> {
    let mut file = fs::File::create(path).map_err(|e| CourtneyError::io(path, e))?;
    write_profiles(profiles, &mut file).map_err(|e| CourtneyError::io(path, e))?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = "mode: count\n\
        ns/a/a.go:1.10,3.2 2 1\n\
        ns/a/a.go:4.1,5.2 1 0\n\
        ns/b/b.go:10.1,12.2 3 7\n";

    #[test]
    fn parse_groups_by_file_and_sorts() {
        let profiles = parse_profiles(SAMPLE).unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].file_name, "ns/a/a.go");
        assert_eq!(profiles[0].mode, Mode::Count);
        assert_eq!(profiles[0].blocks.len(), 2);
        assert_eq!(profiles[1].file_name, "ns/b/b.go");
        assert_eq!(
            profiles[1].blocks[0],
            Block {
                start_line: 10,
                start_col: 1,
                end_line: 12,
                end_col: 2,
                statements: 3,
                count: 7
            }
        );
    }

    #[test]
    fn round_trip_is_byte_equivalent() {
        let profiles = parse_profiles(SAMPLE).unwrap();
        assert_eq!(profiles_to_string(&profiles), SAMPLE);
    }

    #[test]
    fn out_of_order_blocks_are_sorted() {
        let text = "mode: set\n\
            ns/a/a.go:10.1,12.2 1 0\n\
            ns/a/a.go:1.1,3.2 1 1\n";
        let profiles = parse_profiles(text).unwrap();
        assert_eq!(profiles[0].blocks[0].start_line, 1);
        assert_eq!(profiles[0].blocks[1].start_line, 10);
    }

    #[test]
    fn name_splits_at_last_colon() {
        let text = "mode: set\nC:/work/ns/a.go:1.1,2.2 1 1\n";
        let profiles = parse_profiles(text).unwrap();
        assert_eq!(profiles[0].file_name, "C:/work/ns/a.go");
    }

    #[test]
    fn bad_header_is_rejected() {
        assert!(matches!(
            parse_profiles("mode: bogus\n"),
            Err(CourtneyError::ProfileSyntax { .. })
        ));
        assert!(matches!(
            parse_profiles("not a header\n"),
            Err(CourtneyError::ProfileSyntax { .. })
        ));
    }

    #[test]
    fn bad_block_lines_are_rejected() {
        for line in [
            "ns/a/a.go:1.1,2.2 1",      // missing count
            "ns/a/a.go:1.1 1 1",        // missing end position
            "ns/a/a.go 1.1,2.2 1 1",    // missing colon
            "ns/a/a.go:1.1,2.2 1 1 9",  // trailing field
            "ns/a/a.go:a.b,2.2 1 1",    // non-numeric
        ] {
            let text = format!("mode: set\n{line}\n");
            assert!(
                matches!(
                    parse_profiles(&text),
                    Err(CourtneyError::ProfileSyntax { .. })
                ),
                "expected rejection of {line:?}"
            );
        }
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(parse_profiles("").unwrap().is_empty());
        assert!(parse_profiles("mode: set\n").unwrap().is_empty());
    }

    #[test]
    fn overlap_detection() {
        let a = Block {
            start_line: 1,
            start_col: 1,
            end_line: 3,
            end_col: 10,
            statements: 1,
            count: 0,
        };
        let b = Block {
            start_line: 3,
            start_col: 5,
            end_line: 6,
            end_col: 2,
            statements: 1,
            count: 0,
        };
        let c = Block {
            start_line: 3,
            start_col: 11,
            end_line: 6,
            end_col: 2,
            statements: 1,
            count: 0,
        };
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }
}
