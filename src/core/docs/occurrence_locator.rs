// Occurrence locator: exact substring matches over flattened spans.
//
// Docs addresses text in UTF-16 code units while Rust slices by byte, so
// every byte position found here is converted before it leaves the module.

use super::document_models::{OffsetRange, TextSpan};
use super::markdown_table::table_lines;

fn utf16_len(text: &str) -> u32 {
    text.encode_utf16().count() as u32
}

/// Every match of `target`, in document order.
///
/// The search resumes one character after the previous match start, so a
/// target that overlaps itself (`"aba"` in `"ababab"`) is reported at every
/// position it occurs. Matches never cross span boundaries.
pub fn locate_occurrences(spans: &[TextSpan], target: &str) -> Vec<OffsetRange> {
    if target.is_empty() {
        return Vec::new();
    }

    let target_len = utf16_len(target);
    let mut ranges = Vec::new();

    for span in spans {
        let mut from = 0;
        while let Some(found) = span.text[from..].find(target) {
            let byte_index = from + found;
            let start = span.start_offset + utf16_len(&span.text[..byte_index]);
            ranges.push(OffsetRange {
                start,
                end: start + target_len,
            });

            let step = span.text[byte_index..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            from = byte_index + step;
        }
    }

    ranges
}

/// Whether `[start, end)` is covered by span text that is all whitespace.
fn only_whitespace_between(spans: &[TextSpan], start: u32, end: u32) -> bool {
    let mut covered = 0;
    for span in spans {
        let mut offset = span.start_offset;
        for ch in span.text.chars() {
            if offset >= end {
                break;
            }
            let width = ch.len_utf16() as u32;
            if offset >= start {
                if !ch.is_whitespace() {
                    return false;
                }
                covered += width;
            }
            offset += width;
        }
    }
    covered >= end - start
}

/// Range covering a markdown table's source text inside the document.
///
/// Every table line has to follow the previous one with only whitespace in
/// between, starting from an occurrence of the first line. The first
/// occurrence where the whole table lines up wins.
pub fn locate_table_source(spans: &[TextSpan], table_text: &str) -> Option<OffsetRange> {
    let lines = table_lines(table_text);
    let (first_line, rest) = lines.split_first()?;
    let following: Vec<Vec<OffsetRange>> = rest
        .iter()
        .map(|line| locate_occurrences(spans, line))
        .collect();

    locate_occurrences(spans, first_line)
        .into_iter()
        .find_map(|first| {
            let mut end = first.end;
            for occurrences in &following {
                let next = occurrences.iter().find(|range| range.start >= end)?;
                if !only_whitespace_between(spans, end, next.start) {
                    return None;
                }
                end = next.end;
            }
            Some(OffsetRange {
                start: first.start,
                end,
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, start_offset: u32) -> TextSpan {
        TextSpan {
            text: text.to_string(),
            start_offset,
        }
    }

    #[test]
    fn test_overlapping_matches_continue_by_one() {
        let ranges = locate_occurrences(&[span("ababab", 0)], "aba");
        assert_eq!(
            ranges,
            vec![
                OffsetRange { start: 0, end: 3 },
                OffsetRange { start: 2, end: 5 },
            ]
        );
    }

    #[test]
    fn test_matches_in_document_order_across_spans() {
        let spans = vec![span("Intro text\n", 1), span("More Intro\n", 12)];
        let ranges = locate_occurrences(&spans, "Intro");
        assert_eq!(
            ranges,
            vec![
                OffsetRange { start: 1, end: 6 },
                OffsetRange { start: 17, end: 22 },
            ]
        );
    }

    #[test]
    fn test_no_match_and_empty_target() {
        let spans = vec![span("hello\n", 1)];
        assert!(locate_occurrences(&spans, "bye").is_empty());
        assert!(locate_occurrences(&spans, "").is_empty());
        assert!(locate_occurrences(&[], "hello").is_empty());
    }

    #[test]
    fn test_offsets_are_utf16_code_units() {
        // "😀" is one char, four bytes, two UTF-16 units.
        let ranges = locate_occurrences(&[span("😀 café café\n", 1)], "café");
        assert_eq!(
            ranges,
            vec![
                OffsetRange { start: 4, end: 8 },
                OffsetRange { start: 9, end: 13 },
            ]
        );
    }

    #[test]
    fn test_locate_table_source_spans_paragraphs() {
        let spans = vec![
            span("Before\n", 1),
            span("| A | B |\n", 8),
            span("|---|---|\n", 18),
            span("| 1 | 2 |\n", 28),
            span("After\n", 38),
        ];
        let range = locate_table_source(&spans, "| A | B |\n|---|---|\n| 1 | 2 |").unwrap();
        assert_eq!(range, OffsetRange { start: 8, end: 37 });
    }

    #[test]
    fn test_locate_table_source_last_row_repeats_earlier_row() {
        let spans = vec![
            span("| H | H |\n", 1),
            span("|---|---|\n", 11),
            span("| 0 | 0 |\n", 21),
            span("| 1 | 1 |\n", 31),
            span("| 0 | 0 |\n", 41),
        ];
        let text = "| H | H |\n|---|---|\n| 0 | 0 |\n| 1 | 1 |\n| 0 | 0 |";
        assert_eq!(
            locate_table_source(&spans, text),
            Some(OffsetRange { start: 1, end: 50 })
        );
    }

    #[test]
    fn test_locate_table_source_last_row_equals_header() {
        let spans = vec![span("| x |\n", 1), span("|---|\n", 7), span("| x |\n", 13)];
        assert_eq!(
            locate_table_source(&spans, "| x |\n|---|\n| x |"),
            Some(OffsetRange { start: 1, end: 18 })
        );
    }

    #[test]
    fn test_locate_table_source_skips_scattered_lines() {
        // The header also appears earlier, away from the rest of the table.
        let spans = vec![
            span("| A | B |\n", 1),
            span("Notes\n", 11),
            span("| A | B |\n", 17),
            span("| 1 | 2 |\n", 27),
        ];
        assert_eq!(
            locate_table_source(&spans, "| A | B |\n| 1 | 2 |"),
            Some(OffsetRange { start: 17, end: 36 })
        );
    }

    #[test]
    fn test_locate_table_source_missing() {
        let spans = vec![span("| A | B |\n", 1)];
        assert_eq!(locate_table_source(&spans, "| X | Y |\n| 1 | 2 |"), None);
        assert_eq!(locate_table_source(&spans, "plain words"), None);
    }
}
