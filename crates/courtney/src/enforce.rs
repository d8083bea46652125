//! Enforcing 100% coverage after exclusions.
//!
//! Once exclusions are applied, any block left with a zero count is code
//! that is neither tested nor excused. Enforcement collects those blocks,
//! merges adjacent ones, attaches source excerpts and reports them as a
//! structured failure.

use std::fmt;
use std::fs;

use serde::{Deserialize, Serialize};

use crate::paths::PathMapper;
use crate::profile::{Block, Profile};
use crate::result::{CourtneyError, CourtneyResult};

/// A contiguous run of untested lines in one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UntestedRegion {
    /// Package-qualified file name, as it appears in the profile.
    pub file_name: String,
    /// 1-based first untested line.
    pub start_line: u32,
    /// 1-based last untested line.
    pub end_line: u32,
    /// The source lines of the region, indentation normalised.
    pub excerpt: String,
}

impl fmt::Display for UntestedRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:\n{}",
            self.file_name, self.start_line, self.end_line, self.excerpt
        )
    }
}

/// Fail if any zero-count blocks remain in the results.
///
/// Adjacent zero-count blocks (next start line at most one past the
/// previous end line) merge into a single region. On failure the regions
/// come back inside [`CourtneyError::Untested`], with source excerpts
/// read through `mapper`.
pub fn enforce(results: &[Profile], mapper: &dyn PathMapper) -> CourtneyResult<()> {
    let mut regions = Vec::new();

    for profile in results {
        let untested = zero_runs(&profile.blocks);
        if untested.is_empty() {
            continue;
        }

        let path = mapper.file_path(&profile.file_name)?;
        let text = fs::read_to_string(&path).map_err(|e| CourtneyError::io(&path, e))?;
        let lines: Vec<&str> = text.lines().collect();

        for (start_line, end_line) in untested {
            let from = start_line.saturating_sub(1) as usize;
            let to = (end_line as usize).min(lines.len());
            let excerpt = if from < to {
                undent(&lines[from..to]).join("\n")
            } else {
                String::new()
            };
            regions.push(UntestedRegion {
                file_name: profile.file_name.clone(),
                start_line,
                end_line,
                excerpt,
            });
        }
    }

    if regions.is_empty() {
        Ok(())
    } else {
        Err(CourtneyError::Untested { regions })
    }
}

/// Line ranges of zero-count blocks, adjacent ones merged.
fn zero_runs(blocks: &[Block]) -> Vec<(u32, u32)> {
    let mut runs: Vec<(u32, u32)> = Vec::new();
    for block in blocks.iter().filter(|b| b.count == 0) {
        if let Some(last) = runs.last_mut() {
            if block.start_line <= last.1 + 1 {
                last.1 = last.1.max(block.end_line);
                continue;
            }
        }
        runs.push((block.start_line, block.end_line));
    }
    runs
}

/// Normalise a run of source lines to a single tab of indentation: strip
/// the smallest leading-tab depth shared by the lines, then indent each
/// by one tab. Empty lines pass through unchanged.
fn undent(lines: &[&str]) -> Vec<String> {
    let mut min_indent: Option<usize> = None;
    for line in lines {
        // Lines of nothing but tabs don't constrain the depth.
        if let Some(i) = line.find(|c| c != '\t') {
            min_indent = Some(min_indent.map_or(i, |m| m.min(i)));
        }
    }
    let min_indent = min_indent.unwrap_or(0);

    lines
        .iter()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("\t{}", &line[min_indent.min(line.len())..])
            }
        })
        .collect()
}
