//! Union-merging profiles and subtracting exclusions.

use crate::exclude::ExclusionSet;
use crate::paths::PathMapper;
use crate::result::{CourtneyError, CourtneyResult};

use super::{Block, Profile};

/// Fold one profile into the accumulated results.
///
/// Results stay sorted by file name. Blocks for a file already present
/// are merged positionally: identical blocks add their counts, blocks
/// that intersect without coinciding are an input error.
pub fn add_profile(results: &mut Vec<Profile>, profile: Profile) -> CourtneyResult<()> {
    match results.binary_search_by(|p| p.file_name.cmp(&profile.file_name)) {
        Err(i) => {
            let mut profile = profile;
            profile.blocks.sort_by_key(Block::key);
            results.insert(i, profile);
            Ok(())
        }
        Ok(i) => merge_into(&mut results[i], profile),
    }
}

/// Fold a batch of profiles into the accumulated results.
pub fn add_profiles(
    results: &mut Vec<Profile>,
    profiles: impl IntoIterator<Item = Profile>,
) -> CourtneyResult<()> {
    for profile in profiles {
        add_profile(results, profile)?;
    }
    Ok(())
}

fn merge_into(existing: &mut Profile, incoming: Profile) -> CourtneyResult<()> {
    if existing.mode != incoming.mode {
        return Err(CourtneyError::ModeMismatch {
            file: existing.file_name.clone(),
            existing: existing.mode,
            incoming: incoming.mode,
        });
    }
    for block in incoming.blocks {
        merge_block(existing, block)?;
    }
    Ok(())
}

fn merge_block(profile: &mut Profile, block: Block) -> CourtneyResult<()> {
    let overlap = |existing: &Block, incoming: &Block| CourtneyError::MergeOverlap {
        file: profile.file_name.clone(),
        existing: existing.to_string(),
        incoming: incoming.to_string(),
    };

    match profile.blocks.binary_search_by_key(&block.key(), Block::key) {
        Ok(i) => {
            // The same block, observed by another run: counts add,
            // statement counts must agree.
            let existing = &mut profile.blocks[i];
            if existing.statements != block.statements {
                return Err(overlap(existing, &block));
            }
            existing.count += block.count;
            Ok(())
        }
        Err(i) => {
            if i > 0 && profile.blocks[i - 1].overlaps(&block) {
                return Err(overlap(&profile.blocks[i - 1], &block));
            }
            if let Some(next) = profile.blocks.get(i) {
                if next.overlaps(&block) {
                    return Err(overlap(next, &block));
                }
            }
            profile.blocks.insert(i, block);
            Ok(())
        }
    }
}

/// Drop never-executed blocks that touch an excluded line.
///
/// Profile file names are package-qualified; `mapper` converts them to
/// the on-disk paths the exclusion set is keyed by. Blocks with a
/// nonzero count always survive, even on excluded lines.
pub fn apply_exclusions(
    results: &mut Vec<Profile>,
    excludes: &ExclusionSet,
    mapper: &dyn PathMapper,
) -> CourtneyResult<()> {
    for profile in results.iter_mut() {
        let path = mapper.file_path(&profile.file_name)?;
        let Some(lines) = excludes.lines(&path) else {
            continue;
        };
        profile.blocks.retain(|block| {
            block.count > 0
                || lines
                    .range(block.start_line..=block.end_line)
                    .next()
                    .is_none()
        });
    }
    Ok(())
}
