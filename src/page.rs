use std::fmt::Write as _;

use anyhow::Context as _;

use crate::charts;
use crate::cli::RenderArgs;
use crate::config::NotionConfig;
use crate::loader::Loader;
use crate::record::Table;
use crate::stats;

pub const PAGE_TITLE: &str = "💡 나의 알고리즘 대시보드 💡";
pub const TREND_HEADING: &str = "📆 날짜별로 쌓이는 문제 풀이 📊";
pub const CATEGORY_HEADING: &str = "🖥️ 알고리즘 유형별 문제 비율 🍩";
pub const DIFFICULTY_HEADING: &str = "🎯 난이도별 문제 개수 분포 🔥🆙";

/// Column headers of the raw table, in the fixed column order of a record.
const TABLE_HEADERS: [&str; 7] = [
    "알고리즘",
    "제목",
    "난이도",
    "정답률",
    "Github",
    "문제 URL",
    "일자",
];

/// Renders the whole single-page dashboard: fixed heading, the three
/// charts, the raw table. Pure function of the table; each chart consumes
/// its own projection and none depends on another's output.
pub fn render_dashboard(table: &Table) -> anyhow::Result<String> {
    let trend = charts::trend_chart(&stats::daily_trend(table)).context("render trend chart")?;
    let pie =
        charts::category_pie(&stats::category_shares(table)).context("render category chart")?;
    let difficulty = charts::difficulty_chart(&stats::difficulty_counts(table))
        .context("render difficulty chart")?;

    let mut out = String::new();
    out.push_str("<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", html_escape(PAGE_TITLE));
    out.push_str(
        "<style>\n\
         body { font-family: sans-serif; max-width: 1000px; margin: 0 auto; }\n\
         h1 { text-align: center; font-size: 1.2em; }\n\
         h2 { font-size: 1em; }\n\
         section { margin-bottom: 2em; }\n\
         svg { max-width: 100%; height: auto; }\n\
         table { border-collapse: collapse; width: 100%; }\n\
         th, td { border: 1px solid #ddd; padding: 4px 8px; text-align: left; }\n\
         </style>\n",
    );
    out.push_str("</head>\n<body>\n");
    let _ = writeln!(out, "<h1>{}</h1>", html_escape(PAGE_TITLE));

    for (heading, svg) in [
        (TREND_HEADING, &trend),
        (CATEGORY_HEADING, &pie),
        (DIFFICULTY_HEADING, &difficulty),
    ] {
        out.push_str("<section>\n");
        let _ = writeln!(out, "<h2>{}</h2>", html_escape(heading));
        out.push_str(svg);
        out.push_str("\n</section>\n");
    }

    out.push_str("<section>\n<h2>Data</h2>\n");
    out.push_str(&table_html(table));
    out.push_str("</section>\n</body>\n</html>\n");

    Ok(out)
}

/// Verbatim table view: the fixed column order, source row order.
fn table_html(table: &Table) -> String {
    let mut out = String::new();
    out.push_str("<table>\n<thead>\n<tr>");
    for header in TABLE_HEADERS {
        let _ = write!(out, "<th>{}</th>", html_escape(header));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");

    for record in table.records() {
        out.push_str("<tr>");
        let _ = write!(out, "<td>{}</td>", html_escape(&record.category));
        let _ = write!(out, "<td>{}</td>", html_escape(&record.title));
        let _ = write!(out, "<td>{}</td>", record.difficulty);
        let _ = write!(out, "<td>{}</td>", html_escape(&record.accuracy_display));
        let _ = write!(out, "<td>{}</td>", link_cell(record.source_link.as_deref()));
        let _ = write!(out, "<td>{}</td>", link_cell(record.problem_link.as_deref()));
        let _ = write!(out, "<td>{}</td>", record.recorded_date.format("%Y-%m-%d"));
        out.push_str("</tr>\n");
    }

    out.push_str("</tbody>\n</table>\n");
    out
}

fn link_cell(link: Option<&str>) -> String {
    match link {
        Some(link) => html_escape(link),
        None => String::new(),
    }
}

fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// `render` subcommand: load once, write the page to disk.
pub async fn run(args: RenderArgs) -> anyhow::Result<()> {
    let config = NotionConfig::from_env().context("load notion config")?;
    let loader = Loader::new(config);

    let table = loader.load().await.context("load practice records")?;
    let html = render_dashboard(&table)?;

    tokio::fs::write(&args.out, html)
        .await
        .with_context(|| format!("write {}", args.out))?;
    tracing::info!(out = %args.out, "dashboard page written");
    Ok(())
}
