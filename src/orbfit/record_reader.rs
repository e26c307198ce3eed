//! Line-oriented access to semi-structured OrbFit files.
//!
//! OrbFit writes labelled blocks (`! Cartesian position and velocity vectors`,
//! `! Equinoctial elements: …`) followed by fixed-layout rows. A file may hold
//! several solutions; the most refined one is written last, so lookups always
//! select the **last** occurrence of a marker.
use camino::Utf8Path;

use crate::orbprep_errors::OrbprepError;

/// Split file contents into lines, accepting both `\n` and `\r\n` endings.
pub fn split_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}

/// Read a whole file as lines.
///
/// Arguments
/// -----------------
/// * `path` – path of the text file.
///
/// Return
/// ----------
/// * The lines of the file, line endings removed, or an [`OrbprepError::IoError`].
pub fn read_lines(path: &Utf8Path) -> Result<Vec<String>, OrbprepError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(split_lines(&contents))
}

/// Index of the last line equal to `marker`, ignoring trailing whitespace.
pub fn find_last(lines: &[String], marker: &str) -> Option<usize> {
    lines
        .iter()
        .rposition(|line| line.trim_end() == marker.trim_end())
}

/// Window of at most `window` lines starting at `start` (clamped to the end of file).
pub fn window_at(lines: &[String], start: usize, window: usize) -> &[String] {
    let end = start.saturating_add(window).min(lines.len());
    &lines[start.min(end)..end]
}

/// Locate the last `marker` line and return it with the lines following it.
///
/// The returned slice starts with the marker itself and holds at most `window`
/// lines. A missing marker is a normal outcome (older files carry no Cartesian
/// block) and yields `None`.
pub fn last_block<'a>(lines: &'a [String], marker: &str, window: usize) -> Option<&'a [String]> {
    find_last(lines, marker).map(|start| window_at(lines, start, window))
}

#[cfg(test)]
mod record_reader_test {
    use super::*;
    use crate::constants::CARTESIAN_MARKER;

    fn lines_of(text: &str) -> Vec<String> {
        split_lines(text)
    }

    #[test]
    fn test_crlf_lines_match_marker() {
        let lines = lines_of("head\r\n! Cartesian position and velocity vectors\r\n CAR 1 2 3 4 5 6\r\n");
        let block = last_block(&lines, CARTESIAN_MARKER, 25).unwrap();
        assert_eq!(block.len(), 2);
        assert_eq!(block[1], " CAR 1 2 3 4 5 6");
    }

    #[test]
    fn test_last_occurrence_wins() {
        let lines = lines_of(
            "! Cartesian position and velocity vectors\n first\n! Cartesian position and velocity vectors\n second\n",
        );
        let block = last_block(&lines, CARTESIAN_MARKER, 25).unwrap();
        assert_eq!(block[1], " second");
        assert_eq!(find_last(&lines, CARTESIAN_MARKER), Some(2));
    }

    #[test]
    fn test_window_is_bounded() {
        let mut text = String::from("! Cartesian position and velocity vectors\n");
        for i in 0..40 {
            text.push_str(&format!("line {i}\n"));
        }
        let lines = lines_of(&text);
        let block = last_block(&lines, CARTESIAN_MARKER, 25).unwrap();
        assert_eq!(block.len(), 25);
        assert_eq!(block[24], "line 23");
    }

    #[test]
    fn test_missing_marker() {
        let lines = lines_of("! Equinoctial elements\n EQU 1 2 3 4 5 6\n");
        assert!(last_block(&lines, CARTESIAN_MARKER, 25).is_none());
    }

    #[test]
    fn test_read_lines_missing_file() {
        let err = read_lines(Utf8Path::new("does/not/exist.eq")).unwrap_err();
        assert!(matches!(err, OrbprepError::IoError(_)));
    }
}
