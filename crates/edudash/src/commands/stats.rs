//! Statistics command handlers.
//!
//! Each subcommand loads one analytics view through a `ReportView` and
//! renders it as stacked tables (or serializes the report as is).

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tabled::Tabled;
use tracing::debug;

use edudash_core::date_range::DEFAULT_WINDOW_DAYS;
use edudash_core::{
    ContentReport, CurrencyFormatter, Dashboard, DateRange, Distribution, FavoritesReport, GroupBy,
    MetricPoint, OverviewReport, PaymentReport, RankedEntry, ReportRequest, ReportView,
    UserReport, ViewState, VisitReport,
};

use crate::cli::{GlobalOpts, GroupByArg, StatsArgs, StatsCommand, StatsQuery};
use crate::error::CliError;
use crate::output;

use super::util;

const BAR_WIDTH: u16 = 20;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct TotalRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

impl TotalRow {
    fn new(metric: &'static str, value: impl ToString) -> Self {
        Self {
            metric,
            value: value.to_string(),
        }
    }
}

#[derive(Tabled)]
struct PointRow {
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct RankedRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Count")]
    count: String,
    #[tabled(rename = "Price")]
    price: String,
}

#[derive(Tabled)]
struct SliceRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Count")]
    count: String,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "")]
    bar: String,
}

/// Rendering context shared by the detail views.
struct Style<'a> {
    color: bool,
    currency: &'a CurrencyFormatter,
}

// ── Request building ────────────────────────────────────────────────

fn parse_date(value: &str, field: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("invalid date '{value}' (use YYYY-MM-DD)"),
    })
}

fn group_by(arg: GroupByArg) -> GroupBy {
    match arg {
        GroupByArg::Day => GroupBy::Day,
        GroupByArg::Week => GroupBy::Week,
        GroupByArg::Month => GroupBy::Month,
        GroupByArg::Year => GroupBy::Year,
    }
}

/// `--from`/`--to`/`--days` into a request. Without `--from` the window
/// trails `--to` (default today) by `--days` (default 30).
fn build_request(query: &StatsQuery, today: NaiveDate) -> Result<ReportRequest, CliError> {
    let end = query
        .to
        .as_deref()
        .map(|s| parse_date(s, "to"))
        .transpose()?
        .unwrap_or(today);

    let range = match query.from.as_deref() {
        Some(from) => DateRange::new(parse_date(from, "from")?, end)?,
        None => DateRange::trailing(end, query.days.unwrap_or(DEFAULT_WINDOW_DAYS)),
    };

    let mut request = ReportRequest::new(range);
    if let Some(g) = query.group_by {
        request = request.group_by(group_by(g));
    }
    if let Some(limit) = query.limit {
        request = request.limit(limit);
    }
    Ok(request)
}

fn query_of(command: &StatsCommand) -> &StatsQuery {
    match command {
        StatsCommand::Overview(q)
        | StatsCommand::Visits(q)
        | StatsCommand::Content(q)
        | StatsCommand::Users(q)
        | StatsCommand::Payments(q)
        | StatsCommand::Favorites(q) => q,
    }
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load a view with a spinner; Ctrl-C cancels the in-flight request.
async fn load_view<T: Send + Sync + 'static>(
    view: &ReportView<T>,
    request: ReportRequest,
    quiet: bool,
) -> Result<Arc<T>, CliError> {
    let sp = output::spinner(&format!("Loading {}", view.kind()), quiet);
    let result = tokio::select! {
        result = view.load(request) => result.map_err(CliError::from),
        _ = tokio::signal::ctrl_c() => {
            view.cancel();
            Err(CliError::Internal("interrupted".into()))
        }
    };
    sp.finish_and_clear();

    if let ViewState::Failed { message } = view.state() {
        debug!(%message, "view failed");
    }
    result
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: StatsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let request = build_request(query_of(&args.command), Local::now().date_naive())?;
    let dashboard = util::connect(global).await?;

    // Log out whether or not the view loaded.
    let result = render_report(&dashboard, &args.command, request, global).await;
    dashboard.logout().await;

    output::print_output(&result?, global.quiet);
    Ok(())
}

async fn render_report(
    dashboard: &Dashboard,
    command: &StatsCommand,
    request: ReportRequest,
    global: &GlobalOpts,
) -> Result<String, CliError> {
    let color = output::should_color(&global.color);

    Ok(match command {
        StatsCommand::Overview(_) => {
            let report = load_view(&dashboard.overview_view(), request, global.quiet).await?;
            let style = Style {
                color,
                currency: dashboard.currency(),
            };
            output::render_single(
                &global.output,
                &*report,
                |r| overview_detail(r, &style),
                overview_plain,
            )
        }
        StatsCommand::Visits(_) => {
            let report = load_view(&dashboard.visits_view(), request, global.quiet).await?;
            output::render_single(
                &global.output,
                &*report,
                |r| visits_detail(r, color),
                |r| ranked_plain(&r.top_pages),
            )
        }
        StatsCommand::Content(_) => {
            let report = load_view(&dashboard.content_view(), request, global.quiet).await?;
            let style = Style {
                color,
                currency: dashboard.currency(),
            };
            output::render_single(
                &global.output,
                &*report,
                |r| content_detail(r, &style),
                |r| ranked_plain(&r.top_courses),
            )
        }
        StatsCommand::Users(_) => {
            let report = load_view(&dashboard.users_view(), request, global.quiet).await?;
            output::render_single(
                &global.output,
                &*report,
                |r| users_detail(r, color),
                |r| ranked_plain(&r.most_active),
            )
        }
        StatsCommand::Payments(_) => {
            let report = load_view(&dashboard.payments_view(), request, global.quiet).await?;
            let currency = dashboard.currency_for(&report);
            let style = Style {
                color,
                currency: &currency,
            };
            output::render_single(
                &global.output,
                &*report,
                |r| payments_detail(r, &style),
                |r| currency.format_f64(r.total_revenue),
            )
        }
        StatsCommand::Favorites(_) => {
            let report = load_view(&dashboard.favorites_view(), request, global.quiet).await?;
            let style = Style {
                color,
                currency: dashboard.currency(),
            };
            output::render_single(
                &global.output,
                &*report,
                |r| favorites_detail(r, &style),
                |r| ranked_plain(&r.top_courses),
            )
        }
    })
}

// ── Section renderers ───────────────────────────────────────────────

fn fmt_count(count: f64) -> String {
    if count.fract().abs() < f64::EPSILON {
        format!("{count:.0}")
    } else {
        format!("{count:.1}")
    }
}

fn section(out: &mut String, title: &str, body: &str, color: bool) {
    if !out.is_empty() {
        out.push('\n');
    }
    let _ = writeln!(out, "{}", output::heading(title, color));
    out.push_str(body);
    out.push('\n');
}

fn totals_table(rows: &[TotalRow]) -> String {
    output::render_table(rows)
}

fn series_table(points: &[MetricPoint], fmt: impl Fn(f64) -> String) -> String {
    if points.is_empty() {
        return "(no data)".into();
    }
    let rows: Vec<PointRow> = points
        .iter()
        .map(|p| PointRow {
            period: p.period.clone(),
            value: fmt(p.value),
        })
        .collect();
    output::render_table(&rows)
}

fn ranked_table(entries: &[RankedEntry], currency: Option<&CurrencyFormatter>) -> String {
    if entries.is_empty() {
        return "(no data)".into();
    }
    let rows: Vec<RankedRow> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| RankedRow {
            rank: i + 1,
            name: e.display_label.clone(),
            count: fmt_count(e.count),
            price: match (e.price, currency) {
                (Some(price), Some(fmt)) => fmt.format_f64(price),
                _ => String::new(),
            },
        })
        .collect();
    output::render_table(&rows)
}

fn distribution_table(dist: &Distribution, color: bool) -> String {
    if dist.is_empty() {
        return "(no data)".into();
    }
    let rows: Vec<SliceRow> = dist
        .iter()
        .map(|s| SliceRow {
            category: s.category.clone(),
            count: fmt_count(s.count),
            share: format!("{:.1}%", s.percentage),
            bar: output::pct_bar(s.percentage, BAR_WIDTH, color),
        })
        .collect();
    output::render_table(&rows)
}

fn ranked_plain(entries: &[RankedEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{}\t{}", e.label, fmt_count(e.count)))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Per-view detail ─────────────────────────────────────────────────

fn overview_detail(r: &OverviewReport, style: &Style<'_>) -> String {
    let mut out = String::new();
    let totals = totals_table(&[
        TotalRow::new("Users", r.total_users),
        TotalRow::new("New users", r.new_users),
        TotalRow::new("Active users", r.active_users),
        TotalRow::new("Courses", r.total_courses),
        TotalRow::new("Programs", r.total_programs),
        TotalRow::new("Visits", r.total_visits),
        TotalRow::new("Favorites", r.total_favorites),
        TotalRow::new("Revenue", style.currency.format_f64(r.total_revenue)),
    ]);
    section(&mut out, "Overview", &totals, style.color);
    section(
        &mut out,
        "Visits",
        &series_table(&r.visits_trend, fmt_count),
        style.color,
    );
    out
}

fn overview_plain(r: &OverviewReport) -> String {
    [
        ("users", r.total_users),
        ("new_users", r.new_users),
        ("active_users", r.active_users),
        ("courses", r.total_courses),
        ("programs", r.total_programs),
        ("visits", r.total_visits),
        ("favorites", r.total_favorites),
    ]
    .iter()
    .map(|(k, v)| format!("{k}\t{v}"))
    .collect::<Vec<_>>()
    .join("\n")
}

fn visits_detail(r: &VisitReport, color: bool) -> String {
    let mut out = String::new();
    let totals = totals_table(&[
        TotalRow::new("Visits", r.total_visits),
        TotalRow::new("Unique visitors", r.unique_visitors),
    ]);
    section(&mut out, "Visits", &totals, color);
    section(&mut out, "Over time", &series_table(&r.series, fmt_count), color);
    section(&mut out, "Top pages", &ranked_table(&r.top_pages, None), color);
    section(&mut out, "By device", &distribution_table(&r.by_device, color), color);
    out
}

fn content_detail(r: &ContentReport, style: &Style<'_>) -> String {
    let mut out = String::new();
    let totals = totals_table(&[
        TotalRow::new("Courses", r.total_courses),
        TotalRow::new("Programs", r.total_programs),
    ]);
    section(&mut out, "Content", &totals, style.color);
    section(
        &mut out,
        "Most viewed courses",
        &ranked_table(&r.top_courses, Some(style.currency)),
        style.color,
    );
    section(
        &mut out,
        "Most viewed programs",
        &ranked_table(&r.top_programs, Some(style.currency)),
        style.color,
    );
    section(
        &mut out,
        "By category",
        &distribution_table(&r.by_category, style.color),
        style.color,
    );
    out
}

fn users_detail(r: &UserReport, color: bool) -> String {
    let mut out = String::new();
    let totals = totals_table(&[
        TotalRow::new("Users", r.total_users),
        TotalRow::new("New users", r.new_users),
        TotalRow::new("Active users", r.active_users),
    ]);
    section(&mut out, "Users", &totals, color);
    section(
        &mut out,
        "Registrations",
        &series_table(&r.registrations, fmt_count),
        color,
    );
    section(&mut out, "By role", &distribution_table(&r.by_role, color), color);
    section(&mut out, "Most active", &ranked_table(&r.most_active, None), color);
    out
}

fn payments_detail(r: &PaymentReport, style: &Style<'_>) -> String {
    let mut out = String::new();
    let totals = totals_table(&[
        TotalRow::new("Revenue", style.currency.format_f64(r.total_revenue)),
        TotalRow::new("Payments", r.total_payments),
    ]);
    section(&mut out, "Payments", &totals, style.color);
    section(
        &mut out,
        "Revenue over time",
        &series_table(&r.revenue, |v| style.currency.format_f64(v)),
        style.color,
    );
    section(
        &mut out,
        "By status",
        &distribution_table(&r.by_status, style.color),
        style.color,
    );
    out
}

fn favorites_detail(r: &FavoritesReport, style: &Style<'_>) -> String {
    let mut out = String::new();
    let totals = totals_table(&[TotalRow::new("Favorites", r.total_favorites)]);
    section(&mut out, "Favorites", &totals, style.color);
    section(
        &mut out,
        "Top courses",
        &ranked_table(&r.top_courses, Some(style.currency)),
        style.color,
    );
    section(
        &mut out,
        "Top programs",
        &ranked_table(&r.top_programs, Some(style.currency)),
        style.color,
    );
    out
}
