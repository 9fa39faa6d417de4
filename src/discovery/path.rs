//! Path classification
//!
//! Turns a file path under the data root into an `ExtractionKey` and the
//! `(year, quarter, state)` coordinates encoded in its directories.

use super::types::DiscoveredFile;
use crate::error::{Error, Result};
use crate::types::{Category, Coordinates, DataType, ExtractionKey, Scope, StateName};
use std::path::Path;

/// Directory marker that introduces a per-state subtree
const STATE_MARKER: &str = "state";

/// Classify one file relative to the data root
///
/// Returns `None` when no path segment is a data-type marker (the file is
/// not part of the dataset). Otherwise returns the discovered file, or the
/// reason it has to be skipped.
pub fn classify(root: &Path, path: &Path) -> Option<Result<DiscoveredFile>> {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    let marker = segments
        .iter()
        .position(|s| DataType::from_segment(s).is_some())?;

    Some(classify_segments(path, &segments, marker))
}

fn classify_segments(path: &Path, segments: &[String], marker: usize) -> Result<DiscoveredFile> {
    let data_type_segment = &segments[marker];
    let data_type = DataType::from_segment(data_type_segment)
        .ok_or_else(|| Error::malformed_path(path, "missing data type"))?;

    // The file itself is the last segment, so a category needs at least one
    // more directory after the marker.
    let file_index = segments.len() - 1;
    let category_index = marker + 1;
    if category_index >= file_index {
        return Err(Error::malformed_path(path, "no category directory"));
    }

    let category_segment = &segments[category_index];
    let Some(category) = Category::from_segment(category_segment) else {
        return Err(Error::UnregisteredShape {
            path: path.to_path_buf(),
            data_type: data_type_segment.clone(),
            category: category_segment.clone(),
        });
    };

    let year_index = file_index - 1;
    if year_index <= category_index {
        return Err(Error::malformed_path(path, "no year directory"));
    }

    let state = state_slug(path, segments, category_index, year_index)?;
    let year = parse_year(path, &segments[year_index])?;
    let quarter = parse_quarter(path)?;

    let (scope, coords) = match state {
        Some(slug) => (
            Scope::State,
            Coordinates::state(year, quarter, StateName::new(slug)),
        ),
        None => (Scope::Country, Coordinates::country(year, quarter)),
    };

    Ok(DiscoveredFile {
        path: path.to_path_buf(),
        key: ExtractionKey::new(data_type, category, scope),
        coords,
    })
}

/// Slug of the per-state folder, if the file lives under one
///
/// The slug must directly contain the year directory.
fn state_slug<'a>(
    path: &Path,
    segments: &'a [String],
    category_index: usize,
    year_index: usize,
) -> Result<Option<&'a str>> {
    let Some(offset) = segments[category_index + 1..year_index]
        .iter()
        .position(|s| s == STATE_MARKER)
    else {
        return Ok(None);
    };

    let slug_index = category_index + 1 + offset + 1;
    if slug_index + 1 != year_index {
        return Err(Error::malformed_path(
            path,
            "state directory must contain <state>/<year>",
        ));
    }

    Ok(Some(segments[slug_index].as_str()))
}

fn parse_year(path: &Path, segment: &str) -> Result<i32> {
    segment
        .parse()
        .map_err(|_| Error::malformed_path(path, format!("year '{segment}' is not numeric")))
}

fn parse_quarter(path: &Path) -> Result<u8> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    match stem.parse::<u8>() {
        Ok(quarter @ 1..=4) => Ok(quarter),
        Ok(quarter) => Err(Error::malformed_path(
            path,
            format!("quarter {quarter} is outside 1-4"),
        )),
        Err(_) => Err(Error::malformed_path(
            path,
            format!("quarter '{stem}' is not numeric"),
        )),
    }
}
