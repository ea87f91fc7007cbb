use std::io::Write;

use anyhow::Result;
use standings_scraper::config::Heuristics;
use standings_scraper::fetch::{parse_document, FilePageSource, PageSource};
use standings_scraper::notify::build_message;
use standings_scraper::pipeline::run_pipeline;
use standings_scraper::schema::Schema;
use tempfile::NamedTempFile;

fn write_page(html: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    write!(file, "{}", html)?;
    Ok(file)
}

const RANK_POINTS_PAGE: &str = r#"<html><body>
<h1>Weekly tournament</h1>
<table>
  <tr><th>#</th><th>Name</th><th>Pts</th><th>W</th><th>L</th></tr>
  <tr><td>2</td><td>Bob</td><td>9</td><td>3</td><td>2</td></tr>
  <tr><td>3</td><td>The Unstoppable Rocket Squadron</td><td>7</td><td>2</td><td>3</td></tr>
  <tr><td>1</td><td>Alice</td><td>12</td><td>4</td><td>1</td></tr>
</table>
</body></html>"#;

#[tokio::test]
async fn rank_points_page_renders_the_full_payload() -> Result<()> {
    let file = write_page(RANK_POINTS_PAGE)?;
    let location = file.path().to_string_lossy().into_owned();

    let page = FilePageSource.fetch_page(&location).await?;
    let block = run_pipeline(
        &page.context,
        Schema::RankPoints,
        &Heuristics::default(),
        Schema::RankPoints.default_max_rows(),
    );
    let message = build_message(block.as_deref(), &location);

    let expected = [
        "*Daily Challonge leaderboard*",
        "```",
        "#  Name                      Pts   W   L",
        " 1  Alice                      12   4   1",
        " 2  Bob                         9   3   2",
        " 3  The Unstoppable Rocket …    7   2   3",
        "```",
        location.as_str(),
    ]
    .join("\n");
    assert_eq!(message, expected);
    Ok(())
}

const EMBEDDED_PAGE: &str = r#"<html><body>
<p>Bracket embedded below.</p>
<iframe srcdoc='<table><tr><th>Name</th><th>W</th><th>L</th></tr><tr><td>Alice</td><td>4</td><td>1</td></tr><tr><td>Bob</td><td>3</td><td>2</td></tr></table>'></iframe>
</body></html>"#;

#[tokio::test]
async fn standings_inside_an_inline_frame_are_found() -> Result<()> {
    let file = write_page(EMBEDDED_PAGE)?;
    let location = file.path().to_string_lossy().into_owned();

    let page = FilePageSource.fetch_page(&location).await?;
    let block = run_pipeline(&page.context, Schema::WinLoss, &Heuristics::default(), None)
        .expect("embedded table should render");

    let expected = [
        "```",
        "Name                      W   L",
        "Alice                      4   1",
        "Bob                        3   2",
        "```",
    ]
    .join("\n");
    assert_eq!(block, expected);
    Ok(())
}

#[tokio::test]
async fn header_only_page_falls_back_to_the_no_table_message() -> Result<()> {
    let file = write_page("<table><tr><th>Name</th><th>W</th><th>L</th></tr></table>")?;
    let location = file.path().to_string_lossy().into_owned();

    let page = FilePageSource.fetch_page(&location).await?;
    let block = run_pipeline(&page.context, Schema::WinLoss, &Heuristics::default(), None);
    assert_eq!(block, None);

    let message = build_message(block.as_deref(), &location);
    assert_eq!(message, format!("No standings table found.\n{}", location));
    Ok(())
}

#[test]
fn win_loss_tie_schema_orders_by_record_then_name() {
    let html = "<table><tr><th>Team</th><th>W</th><th>L</th><th>T</th></tr>\
        <tr><td>A</td><td>3</td><td>1</td><td>0</td></tr>\
        <tr><td>B</td><td>3</td><td>0</td><td>1</td></tr>\
        <tr><td>C</td><td>5</td><td>2</td><td>0</td></tr></table>";
    let parsed = parse_document(html, None);
    let block = run_pipeline(&parsed.context, Schema::WinLossTie, &Heuristics::default(), None)
        .expect("block");

    let expected = [
        "```",
        "Name                      W   L   T",
        "C                          5   2   0",
        "B                          3   0   1",
        "A                          3   1   0",
        "```",
    ]
    .join("\n");
    assert_eq!(block, expected);
}

#[test]
fn tuned_heuristics_unlock_a_sparse_record_column() -> Result<()> {
    let html = "<table><tr><th>Name</th><th>Record</th></tr>\
        <tr><td>Alice</td><td>4-1</td></tr>\
        <tr><td>Bob</td><td>tbd</td></tr></table>";
    let parsed = parse_document(html, None);

    // Half the rows match the combined pattern, under the stock 0.6 rate.
    let stock = run_pipeline(&parsed.context, Schema::WinLoss, &Heuristics::default(), None)
        .expect("block");
    assert!(stock.contains("Alice                      0   0"));

    let mut file = NamedTempFile::new()?;
    writeln!(file, "record_hit_rate = 0.4")?;
    let tuned = Heuristics::load(file.path().to_str().expect("utf8 path"))?;

    let block = run_pipeline(&parsed.context, Schema::WinLoss, &tuned, None).expect("block");
    assert!(block.contains("Alice                      4   1"));
    assert!(block.contains("Bob                        0   0"));
    Ok(())
}

#[test]
fn combined_record_column_beats_numeric_guessing() {
    // Column 2 is a plausible numeric column, but 8 of 10 rows in column 1
    // carry a combined record, so wins and losses come from its capture.
    let mut html = String::from(
        "<table><tr><th>Name</th><th>Record</th><th>Streak</th></tr>",
    );
    for i in 1..=8 {
        html.push_str(&format!(
            "<tr><td>Player {i}</td><td>{i}-{}</td><td>{i}</td></tr>",
            10 - i
        ));
    }
    html.push_str("<tr><td>Ivan</td><td>tbd</td><td>9</td></tr>");
    html.push_str("<tr><td>Judy</td><td>tbd</td><td>10</td></tr>");
    html.push_str("</table>");

    let parsed = parse_document(&html, None);
    let block = run_pipeline(&parsed.context, Schema::WinLoss, &Heuristics::default(), None)
        .expect("block");

    assert!(block.contains("Player 1                   1   9"));
    assert!(block.contains("Player 8                   8   2"));
    // Unmatched cells default both counts, not read from the streak column.
    assert!(block.contains("Ivan                       0   0"));
}

#[test]
fn rank_points_schema_caps_rendered_rows_at_its_default() {
    let mut html =
        String::from("<table><tr><th>#</th><th>Name</th><th>Pts</th><th>W</th><th>L</th></tr>");
    for i in 1..=14 {
        html.push_str(&format!(
            "<tr><td>{i}</td><td>Player {i}</td><td>{}</td><td>3</td><td>2</td></tr>",
            30 - i
        ));
    }
    html.push_str("</table>");

    let parsed = parse_document(&html, None);
    let block = run_pipeline(
        &parsed.context,
        Schema::RankPoints,
        &Heuristics::default(),
        Schema::RankPoints.default_max_rows(),
    )
    .expect("block");

    let lines: Vec<&str> = block.lines().collect();
    assert_eq!(lines.len(), 15);
    assert!(block.contains("Player 12"));
    assert!(!block.contains("Player 13"));
}
