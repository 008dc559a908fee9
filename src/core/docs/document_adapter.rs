// Flattens the nested Docs body into spans that can be scanned locally.
//
// Every text run already carries its absolute `startIndex`, so no offset is
// accumulated here; skipped elements can't skew anything that follows.

use super::document_models::{Document, StructuralElement, TextSpan};

/// Returns every text run of the body in document order.
///
/// Table cells are descended into. An absent or empty body yields no spans.
pub fn flatten_spans(document: &Document) -> Vec<TextSpan> {
    let mut spans = Vec::new();
    if let Some(body) = &document.body {
        collect_spans(&body.content, &mut spans);
    }
    spans
}

fn collect_spans(elements: &[StructuralElement], spans: &mut Vec<TextSpan>) {
    for element in elements {
        if let Some(paragraph) = &element.paragraph {
            for para_element in &paragraph.elements {
                let (Some(text_run), Some(start_offset)) =
                    (&para_element.text_run, para_element.start_index)
                else {
                    continue;
                };

                if let Some(content) = &text_run.content {
                    if !content.is_empty() {
                        spans.push(TextSpan {
                            text: content.clone(),
                            start_offset,
                        });
                    }
                }
            }
        }

        if let Some(table) = &element.table {
            for row in &table.table_rows {
                for cell in &row.table_cells {
                    collect_spans(&cell.content, spans);
                }
            }
        }
    }
}

/// Offset one past the final newline of the body (1 for an empty body).
///
/// The body always ends with a newline that can't be deleted, so the last
/// writable position is `body_end_offset - 1`.
pub fn body_end_offset(document: &Document) -> u32 {
    document
        .body
        .as_ref()
        .and_then(|body| body.content.iter().filter_map(|e| e.end_index).max())
        .unwrap_or(1)
}

/// Plain text of the document with headings and tables rendered as markdown.
pub fn plain_text(document: &Document) -> String {
    let mut output = String::new();
    if let Some(body) = &document.body {
        for element in &body.content {
            render_element(element, &mut output);
        }
    }
    output
}

fn render_element(element: &StructuralElement, output: &mut String) {
    if let Some(paragraph) = &element.paragraph {
        let prefix = paragraph
            .paragraph_style
            .as_ref()
            .and_then(|style| style.named_style_type.as_deref())
            .and_then(|style_type| match style_type {
                "HEADING_1" => Some("# "),
                "HEADING_2" => Some("## "),
                "HEADING_3" => Some("### "),
                _ => None,
            });
        if let Some(prefix) = prefix {
            output.push_str(prefix);
        }

        for para_element in &paragraph.elements {
            if let Some(content) = para_element
                .text_run
                .as_ref()
                .and_then(|run| run.content.as_deref())
            {
                output.push_str(content);
            }
        }
    }

    if let Some(table) = &element.table {
        for row in &table.table_rows {
            let cells: Vec<String> = row
                .table_cells
                .iter()
                .map(|cell| {
                    let mut cell_text = String::new();
                    for cell_element in &cell.content {
                        render_element(cell_element, &mut cell_text);
                    }
                    cell_text.trim().to_string()
                })
                .collect();
            output.push_str(&format!("| {} |\n", cells.join(" | ")));
        }
    }
}
