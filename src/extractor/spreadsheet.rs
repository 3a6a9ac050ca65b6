use super::{find_body_section, inner_text, ContentExtractor, TABLE_NS, TEXT_NS};
use crate::error::Result;
use roxmltree::Node;

const DEFAULT_SHEET_NAME: &str = "Sheet";

/// Renders every sheet of an `office:spreadsheet` body.
///
/// Each sheet starts with a `## <name>` line followed by one tab-separated
/// line per row, and ends with a blank line. Repeated rows and columns are
/// written out in full.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpreadsheetExtractor;

impl ContentExtractor for SpreadsheetExtractor {
    fn extract(&self, markup: &str) -> Result<String> {
        let doc = roxmltree::Document::parse(markup)?;

        let Some(spreadsheet) = find_body_section(&doc, "spreadsheet") else {
            log::debug!("no office:spreadsheet section, nothing to extract");
            return Ok(String::new());
        };

        let mut lines: Vec<String> = Vec::new();

        for table in spreadsheet
            .children()
            .filter(|n| n.is_element() && n.has_tag_name((TABLE_NS, "table")))
        {
            let sheet_name = table
                .attribute((TABLE_NS, "name"))
                .unwrap_or(DEFAULT_SHEET_NAME);
            lines.push(format!("## {}", sheet_name));

            let mut row_count = 0usize;
            for row in table
                .children()
                .filter(|n| n.is_element() && n.has_tag_name((TABLE_NS, "table-row")))
            {
                let repeat = parse_repeat(row.attribute((TABLE_NS, "number-rows-repeated")));
                let rendered = render_row(row);

                lines.extend(std::iter::repeat(rendered).take(repeat));
                row_count += repeat;
            }
            log::debug!("sheet {:?}: {} rows", sheet_name, row_count);

            lines.push(String::new());
        }

        let mut rendered = lines.join("\n").trim_end().to_string();
        rendered.push('\n');
        Ok(rendered)
    }
}

/// Parse a repeat-count attribute, falling back to 1.
///
/// Missing, unparsable, zero and negative values all count as a single
/// occurrence.
pub fn parse_repeat(value: Option<&str>) -> usize {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|count| *count >= 1)
        .and_then(|count| usize::try_from(count).ok())
        .unwrap_or(1)
}

fn render_row(row: Node) -> String {
    let mut cells: Vec<String> = Vec::new();

    for cell in row
        .children()
        .filter(|n| n.is_element() && n.has_tag_name((TABLE_NS, "table-cell")))
    {
        let repeat = parse_repeat(cell.attribute((TABLE_NS, "number-columns-repeated")));
        let text = cell_text(cell);
        cells.extend(std::iter::repeat(text).take(repeat));
    }

    cells.join("\t").trim_end().to_string()
}

fn cell_text(cell: Node) -> String {
    cell.children()
        .filter(|n| n.is_element() && n.has_tag_name((TEXT_NS, "p")))
        .map(|p| inner_text(p).trim().to_string())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::OFFICE_NS;

    fn spreadsheet(tables: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content xmlns:office="{OFFICE_NS}" xmlns:table="{TABLE_NS}" xmlns:text="{TEXT_NS}">
  <office:body><office:spreadsheet>{tables}</office:spreadsheet></office:body>
</office:document-content>"#
        )
    }

    fn extract(markup: &str) -> String {
        SpreadsheetExtractor.extract(markup).unwrap()
    }

    #[test]
    fn test_repeated_row_is_materialized() {
        let markup = spreadsheet(
            r#"<table:table table:name="Data">
                 <table:table-row table:number-rows-repeated="2">
                   <table:table-cell><text:p>A</text:p></table:table-cell>
                   <table:table-cell><text:p>B</text:p></table:table-cell>
                 </table:table-row>
               </table:table>"#,
        );
        assert_eq!(extract(&markup), "## Data\nA\tB\nA\tB\n");
    }

    #[test]
    fn test_repeated_columns_are_materialized() {
        let markup = spreadsheet(
            r#"<table:table table:name="Grid">
                 <table:table-row>
                   <table:table-cell table:number-columns-repeated="3"><text:p>x</text:p></table:table-cell>
                   <table:table-cell><text:p>y</text:p></table:table-cell>
                 </table:table-row>
               </table:table>"#,
        );
        assert_eq!(extract(&markup), "## Grid\nx\tx\tx\ty\n");
    }

    #[test]
    fn test_trailing_empty_cells_are_trimmed() {
        let markup = spreadsheet(
            r#"<table:table table:name="S">
                 <table:table-row>
                   <table:table-cell/>
                   <table:table-cell><text:p>v</text:p></table:table-cell>
                   <table:table-cell table:number-columns-repeated="1020"/>
                 </table:table-row>
               </table:table>"#,
        );
        assert_eq!(extract(&markup), "## S\n\tv\n");
    }

    #[test]
    fn test_multiple_sheets_are_separated() {
        let markup = spreadsheet(
            r#"<table:table table:name="One">
                 <table:table-row><table:table-cell><text:p>1</text:p></table:table-cell></table:table-row>
               </table:table>
               <table:table>
                 <table:table-row><table:table-cell><text:p>2</text:p></table:table-cell></table:table-row>
               </table:table>"#,
        );
        assert_eq!(extract(&markup), "## One\n1\n\n## Sheet\n2\n");
    }

    #[test]
    fn test_cell_paragraphs_are_space_joined() {
        let markup = spreadsheet(
            r#"<table:table table:name="Notes">
                 <table:table-row>
                   <table:table-cell><text:p> first </text:p><text:p>second <text:span>part</text:span></text:p></table:table-cell>
                 </table:table-row>
               </table:table>"#,
        );
        assert_eq!(extract(&markup), "## Notes\nfirst second part\n");
    }

    #[test]
    fn test_only_direct_rows_are_rendered() {
        let markup = spreadsheet(
            r#"<table:table table:name="H">
                 <table:table-header-rows>
                   <table:table-row><table:table-cell><text:p>head</text:p></table:table-cell></table:table-row>
                 </table:table-header-rows>
                 <table:table-row><table:table-cell><text:p>body</text:p></table:table-cell></table:table-row>
               </table:table>"#,
        );
        assert_eq!(extract(&markup), "## H\nbody\n");
    }

    #[test]
    fn test_empty_rows_inside_sheet_are_kept() {
        let markup = spreadsheet(
            r#"<table:table table:name="Gap">
                 <table:table-row><table:table-cell><text:p>a</text:p></table:table-cell></table:table-row>
                 <table:table-row table:number-rows-repeated="2"><table:table-cell/></table:table-row>
                 <table:table-row><table:table-cell><text:p>b</text:p></table:table-cell></table:table-row>
               </table:table>"#,
        );
        assert_eq!(extract(&markup), "## Gap\na\n\n\nb\n");
    }

    #[test]
    fn test_spreadsheet_without_sheets() {
        assert_eq!(extract(&spreadsheet("")), "\n");
    }

    #[test]
    fn test_missing_spreadsheet_section() {
        let markup = format!(
            r#"<office:document-content xmlns:office="{OFFICE_NS}"><office:body><office:text/></office:body></office:document-content>"#
        );
        assert_eq!(extract(&markup), "");
    }

    #[test]
    fn test_malformed_markup_is_an_error() {
        assert!(SpreadsheetExtractor.extract("not xml at all <").is_err());
    }

    #[test]
    fn test_parse_repeat_fallbacks() {
        assert_eq!(parse_repeat(None), 1);
        assert_eq!(parse_repeat(Some("3")), 3);
        assert_eq!(parse_repeat(Some(" 4 ")), 4);
        assert_eq!(parse_repeat(Some("0")), 1);
        assert_eq!(parse_repeat(Some("-5")), 1);
        assert_eq!(parse_repeat(Some("many")), 1);
        assert_eq!(parse_repeat(Some("")), 1);
    }
}
