//! OVER/XOVER/XZVER overview rows

/// Overview row split on tabs
///
/// Field order follows LIST OVERVIEW.FMT; by convention it starts with the
/// article number, subject, from, date, message-id, references, bytes and
/// lines. Empty fields are preserved so positions stay aligned.
pub fn parse_overview_line(line: &str) -> Vec<String> {
    line.trim_matches(' ').split('\t').map(str::to_string).collect()
}

/// Split every line of an overview block
pub fn parse_overview(lines: &[String]) -> Vec<Vec<String>> {
    lines.iter().map(|line| parse_overview_line(line)).collect()
}
