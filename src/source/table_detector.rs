//! Table detection from text positions (stream mode).
//!
//! Grade sheets draw their tables with ruling lines that are not reliable
//! across generators, so tables are found from text alignment alone: rows
//! are baselines, columns are left edges that line up across rows.

use std::collections::{HashMap, HashSet};

use crate::model::TableFragment;

use super::spans::{group_rows, SpanRow, TextSpan};

/// Width of the buckets left edges are counted in, in points.
const EDGE_BUCKET: f32 = 5.0;
/// How far a span may sit from a column edge and still align with it.
const ALIGN_TOLERANCE: f32 = 5.0;
/// Widest vertical gap inside one table, in line pitches.
const MAX_ROW_GAP: f32 = 2.0;

/// Table detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Y tolerance for grouping spans into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum share of a row's spans that must sit on column edges
    pub min_alignment_ratio: f32,
    /// Minimum gap between columns (points)
    pub min_column_gap: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
        }
    }
}

/// Detects table fragments in the spans of one page.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a detector with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detector with a custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &TableDetectorConfig {
        &self.config
    }

    /// Detect the tables of a page, top of the page first.
    pub fn detect(&self, spans: &[TextSpan]) -> Vec<TableFragment> {
        if spans.len() < self.config.min_rows * self.config.min_columns {
            log::debug!("TableDetector: not enough spans ({})", spans.len());
            return Vec::new();
        }

        let rows = group_rows(spans, self.config.y_tolerance_factor);
        if rows.len() < self.config.min_rows {
            return Vec::new();
        }

        let columns = self.detect_columns(&rows);
        log::debug!(
            "TableDetector: {} rows, column edges {:?}",
            rows.len(),
            columns
        );
        if columns.len() < self.config.min_columns {
            return Vec::new();
        }

        let mut fragments = Vec::new();
        for (start, end) in self.find_regions(&rows, &columns) {
            let region = &rows[start..=end];
            let region_columns = self.detect_columns(region);

            if region_columns.len() < self.config.min_columns {
                continue;
            }
            if region_columns.len() > self.config.max_columns {
                log::debug!(
                    "TableDetector: skipping region, too many columns ({} > {})",
                    region_columns.len(),
                    self.config.max_columns
                );
                continue;
            }
            if is_list_pattern(region, &region_columns) {
                log::debug!("TableDetector: skipping region, detected as list pattern");
                continue;
            }

            fragments.push(to_fragment(region, &region_columns));
        }

        fragments
    }

    /// Column edges from left edges that recur across rows.
    ///
    /// Only rows holding two spans or more vote, unless there are too few of
    /// them, in which case every row does.
    fn detect_columns(&self, rows: &[SpanRow]) -> Vec<f32> {
        let multi: Vec<&SpanRow> = rows.iter().filter(|r| r.spans.len() >= 2).collect();
        let voters: Vec<&SpanRow> = if multi.len() >= self.config.min_rows {
            multi
        } else {
            rows.iter().collect()
        };
        if voters.is_empty() {
            return Vec::new();
        }

        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        for row in &voters {
            let buckets: HashSet<i32> = row
                .spans
                .iter()
                .map(|s| (s.x / EDGE_BUCKET).round() as i32)
                .collect();
            for bucket in buckets {
                *edge_counts.entry(bucket).or_insert(0) += 1;
            }
        }

        let min_occurrences =
            ((voters.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);

        let mut edges: Vec<f32> = edge_counts
            .into_iter()
            .filter(|(_, count)| *count >= min_occurrences)
            .map(|(bucket, _)| bucket as f32 * EDGE_BUCKET)
            .collect();
        edges.sort_by(f32::total_cmp);

        let mut merged: Vec<f32> = Vec::new();
        for edge in edges {
            match merged.last() {
                Some(&last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }
        merged
    }

    /// Contiguous runs of aligned rows, as inclusive index ranges.
    ///
    /// A run ends at a row holding fewer than `min_columns` spans (titles,
    /// metadata lines, page headers) and at a vertical gap wider than
    /// `MAX_ROW_GAP` line pitches.
    fn find_regions(&self, rows: &[SpanRow], columns: &[f32]) -> Vec<(usize, usize)> {
        let max_gap = line_pitch(rows).map(|pitch| pitch * MAX_ROW_GAP);
        let mut regions = Vec::new();
        let mut start: Option<usize> = None;

        let close = |start: Option<usize>, end: usize, regions: &mut Vec<(usize, usize)>| {
            if let Some(s) = start {
                if end + 1 - s >= self.config.min_rows {
                    regions.push((s, end));
                }
            }
        };

        for (i, row) in rows.iter().enumerate() {
            let gap_break = i > 0 && max_gap.is_some_and(|gap| rows[i - 1].y - row.y > gap);
            if gap_break {
                close(start.take(), i - 1, &mut regions);
            }

            let is_table_row = row.spans.len() >= self.config.min_columns
                && alignment_score(row, columns) >= self.config.min_alignment_ratio;
            if is_table_row {
                start.get_or_insert(i);
            } else if i > 0 {
                close(start.take(), i - 1, &mut regions);
            }
        }
        if !rows.is_empty() {
            close(start, rows.len() - 1, &mut regions);
        }

        regions
    }
}

/// Median baseline distance between consecutive rows.
fn line_pitch(rows: &[SpanRow]) -> Option<f32> {
    let mut gaps: Vec<f32> = rows
        .windows(2)
        .map(|pair| pair[0].y - pair[1].y)
        .filter(|gap| *gap > 0.0)
        .collect();
    if gaps.is_empty() {
        return None;
    }
    gaps.sort_by(f32::total_cmp);
    Some(gaps[gaps.len() / 2])
}

fn alignment_score(row: &SpanRow, columns: &[f32]) -> f32 {
    if row.spans.is_empty() || columns.is_empty() {
        return 0.0;
    }
    let aligned = row
        .spans
        .iter()
        .filter(|s| columns.iter().any(|c| (s.x - c).abs() <= ALIGN_TOLERANCE))
        .count();
    aligned as f32 / row.spans.len() as f32
}

/// Lay out region rows into cells; a column with no span stays `None`.
fn to_fragment(rows: &[SpanRow], columns: &[f32]) -> TableFragment {
    let mut fragment = TableFragment::new();
    for row in rows {
        let mut cells: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];
        for span in &row.spans {
            cells[column_for(span.x, columns)].push(span.text.trim());
        }
        fragment.add_row(
            cells
                .into_iter()
                .map(|parts| (!parts.is_empty()).then(|| parts.join(" ")))
                .collect(),
        );
    }
    fragment
}

/// Index of the column a span starting at `x` belongs to.
///
/// Spans may start up to 10pt before their column edge.
fn column_for(x: f32, columns: &[f32]) -> usize {
    columns
        .iter()
        .rposition(|&edge| x >= edge - 10.0)
        .unwrap_or(0)
}

/// Check whether aligned rows are really a bulleted or numbered list.
fn is_list_pattern(rows: &[SpanRow], columns: &[f32]) -> bool {
    if columns.len() < 2 || rows.is_empty() {
        return false;
    }

    let (mut bullets, mut numbers) = (0, 0);
    for row in rows {
        if let Some(first) = row.spans.first() {
            let text = first.text.trim();
            if is_bullet_marker(text) {
                bullets += 1;
            } else if is_number_marker(text) {
                numbers += 1;
            }
        }
    }

    let total = rows.len() as f32;
    bullets as f32 / total >= 0.5 || (columns.len() == 2 && (bullets + numbers) as f32 / total >= 0.5)
}

fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "►" | "■" | "●" | "□" | "◆" | "▶"
    )
}

/// "1.", "12)", "3", "a." and the like.
fn is_number_marker(text: &str) -> bool {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return false;
    }
    if cleaned.parse::<u32>().is_ok() {
        return true;
    }

    let Some(body) = cleaned.strip_suffix(|c| c == '.' || c == ')') else {
        return false;
    };
    (!body.is_empty() && body.chars().all(|c| c.is_ascii_digit()))
        || (body.chars().count() == 1 && body.chars().all(char::is_alphabetic))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x: f32, y: f32) -> TextSpan {
        TextSpan::new(text, x, y, 10.0)
    }

    fn grade_spans() -> Vec<TextSpan> {
        let mut spans = Vec::new();
        let rows: [(&str, &str, &str, &str, &str); 3] = [
            ("Matière", "Note/Barème", "Résultat", "Session", "Crédits"),
            ("UE1 Algebra", "15/20", "Validé", "S1", "6"),
            ("UE2 Analyse", "11/20", "Validé", "S1", "6"),
        ];
        for (i, (a, b, c, d, e)) in rows.iter().enumerate() {
            let y = 500.0 - i as f32 * 15.0;
            spans.push(span(a, 40.0, y));
            spans.push(span(b, 160.0, y));
            spans.push(span(c, 240.0, y));
            spans.push(span(d, 320.0, y));
            spans.push(span(e, 400.0, y));
        }
        spans
    }

    #[test]
    fn test_detect_grade_table() {
        let fragments = TableDetector::new().detect(&grade_spans());
        assert_eq!(fragments.len(), 1);

        let table = &fragments[0];
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 5);
        assert_eq!(table.cell(0, 1), Some("Note/Barème"));
        assert_eq!(table.cell(2, 0), Some("UE2 Analyse"));
    }

    #[test]
    fn test_metadata_on_table_margin_stays_out() {
        let mut spans = vec![
            span("Université de Lyon", 40.0, 780.0),
            span("Session unique 2023-2024", 40.0, 766.0),
            span("Jane Doe", 40.0, 752.0),
            span("N° Etudiant: 12345", 40.0, 738.0),
        ];
        spans.extend(grade_spans());

        let fragments = TableDetector::new().detect(&spans);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].cell(0, 0), Some("Matière"));
        assert_eq!(fragments[0].row_count(), 3);
    }

    #[test]
    fn test_page_header_above_continuation_rows() {
        let mut spans = vec![span("Relevé de notes (suite)", 40.0, 515.0)];
        spans.extend(grade_spans().into_iter().filter(|s| s.y < 500.0));

        let fragments = TableDetector::new().detect(&spans);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].cell(0, 0), Some("UE1 Algebra"));
    }

    #[test]
    fn test_wide_gap_splits_tables() {
        let mut spans = grade_spans();
        for (i, subject) in ["UE3 Stage", "UE4 Projet"].iter().enumerate() {
            let y = 300.0 - i as f32 * 15.0;
            spans.push(span(subject, 40.0, y));
            spans.push(span("12/20", 160.0, y));
            spans.push(span("Validé", 240.0, y));
        }

        let fragments = TableDetector::new().detect(&spans);
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].row_count(), 3);
        assert_eq!(fragments[1].cell(0, 0), Some("UE3 Stage"));
    }

    #[test]
    fn test_line_pitch() {
        assert_eq!(line_pitch(&group_rows(&grade_spans(), 0.4)), Some(15.0));
        assert_eq!(line_pitch(&[]), None);
    }

    #[test]
    fn test_missing_cell_is_none() {
        let mut spans = grade_spans();
        spans.retain(|s| s.text != "11/20");
        let fragments = TableDetector::new().detect(&spans);
        assert_eq!(fragments[0].cell(2, 1), None);
        assert_eq!(fragments[0].cell(2, 2), Some("Validé"));
    }

    #[test]
    fn test_max_columns() {
        let config = TableDetectorConfig {
            max_columns: 4,
            ..Default::default()
        };
        assert!(TableDetector::with_config(config).detect(&grade_spans()).is_empty());
    }

    #[test]
    fn test_single_column_is_not_a_table() {
        let spans = vec![
            span("Line 1", 10.0, 100.0),
            span("Line 2", 10.0, 85.0),
            span("Line 3", 10.0, 70.0),
        ];
        assert!(TableDetector::new().detect(&spans).is_empty());
    }

    #[test]
    fn test_bullet_list_is_not_a_table() {
        let spans = vec![
            span("-", 50.0, 400.0),
            span("Stage obligatoire", 80.0, 400.0),
            span("-", 50.0, 370.0),
            span("Mémoire", 80.0, 370.0),
            span("-", 50.0, 340.0),
            span("Soutenance", 80.0, 340.0),
        ];
        assert!(TableDetector::new().detect(&spans).is_empty());
    }

    #[test]
    fn test_list_markers() {
        assert!(is_number_marker("1."));
        assert!(is_number_marker("12)"));
        assert!(is_number_marker("1 ."));
        assert!(is_number_marker("3"));
        assert!(is_number_marker("a."));
        assert!(is_bullet_marker("•"));

        assert!(!is_number_marker("UE1"));
        assert!(!is_number_marker("15/20"));
        assert!(!is_number_marker(""));
        assert!(!is_number_marker("Validé"));
        assert!(!is_bullet_marker("Validé"));
    }

    #[test]
    fn test_column_for() {
        let columns = [40.0, 160.0, 240.0];
        assert_eq!(column_for(40.0, &columns), 0);
        assert_eq!(column_for(155.0, &columns), 1);
        assert_eq!(column_for(300.0, &columns), 2);
        assert_eq!(column_for(0.0, &columns), 0);
    }
}
