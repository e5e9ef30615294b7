//! HTML rendering of the search page.

use crate::session::{Outcome, Session};
use common::JobRecord;
use common::filters::{LOCATIONS, MAX_DAYS_POSTED, MIN_DAYS_POSTED, PAGE_SIZES};
use std::fmt::Write;

/// Characters of the description shown on a collapsed card.
const DESCRIPTION_PREVIEW: usize = 300;

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); min-height: 100vh; }
.layout { display: flex; gap: 2rem; padding: 2rem; }
.sidebar { flex: 0 0 260px; background: white; padding: 1.5rem; border-radius: 12px; align-self: flex-start; }
.sidebar label { display: block; margin: 1rem 0 0.25rem; font-weight: 600; }
.sidebar select, .sidebar input[type=range] { width: 100%; }
.main { flex: 1; }
.header-container { background: white; padding: 2rem; border-radius: 12px; margin-bottom: 2rem; text-align: center; }
.app-title { font-size: 2.5rem; font-weight: 800; color: #667eea; }
.app-subtitle { font-size: 1.2rem; color: #4a5568; }
.job-card { background: white; padding: 1.5rem; border-radius: 12px; margin-bottom: 1rem; border-left: 4px solid #667eea; }
.job-title { font-size: 1.4rem; font-weight: 700; color: #1a202c; margin-bottom: 0.5rem; }
.job-company { font-size: 1.1rem; color: #4a5568; margin-bottom: 0.5rem; }
.job-meta { font-size: 0.9rem; color: #718096; margin-bottom: 0.5rem; }
.badge { display: inline-block; padding: 0.25rem 0.75rem; border-radius: 12px; font-size: 0.85rem; font-weight: 600; margin: 0 0.5rem 0.5rem 0; }
.badge-remote { background: #d4edda; color: #155724; }
.badge-location { background: #cce5ff; color: #004085; }
.badge-type { background: #fff3cd; color: #856404; }
.description { white-space: pre-wrap; color: #2d3748; }
.notice { padding: 1rem; border-radius: 8px; margin-bottom: 1rem; }
.notice-success { background: #d4edda; color: #155724; }
.notice-warning { background: #fff3cd; color: #856404; }
.notice-error { background: #f8d7da; color: #721c24; }
.notice-info { background: #cce5ff; color: #004085; }
.tiles { display: flex; gap: 1rem; }
.info-tile { flex: 1; background: white; padding: 1.5rem; border-radius: 12px; text-align: center; }
.pagination { display: flex; justify-content: space-between; align-items: center; color: white; }
button, .apply { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; border: none; padding: 0.6rem 1.2rem; border-radius: 8px; font-weight: 600; cursor: pointer; text-decoration: none; }
.sidebar button { width: 100%; margin-top: 1.5rem; }
.link-button { background: none; color: #667eea; padding: 0; }
#loading { display: none; position: fixed; inset: 0; background: rgba(0, 0, 0, 0.4); color: white; font-size: 1.5rem; align-items: center; justify-content: center; }
body.searching #loading { display: flex; }
footer { text-align: center; color: white; padding: 1rem; }
"#;

/// Renders the whole page for a session.
pub fn page(session: &Session) -> String {
    let mut html = String::with_capacity(16 * 1024);

    html.push_str("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">");
    html.push_str("<title>SAP Job Finder</title><style>");
    html.push_str(STYLE);
    html.push_str("</style></head><body>");
    html.push_str("<div id=\"loading\">🔍 Searching for SAP jobs...</div>");
    html.push_str("<div class=\"layout\">");
    sidebar(&mut html, session);
    html.push_str("<main class=\"main\">");
    html.push_str(
        "<div class=\"header-container\"><div class=\"app-title\">💼 SAP Job Finder</div>\
         <div class=\"app-subtitle\">Find SAP jobs recently posted on LinkedIn</div></div>",
    );

    if let Some(error) = session.error() {
        notice(&mut html, "error", &format!("❌ Error: {}", error));
    }
    results(&mut html, session);

    html.push_str("</main></div>");
    html.push_str(
        "<footer><p>💼 SAP Job Finder | Powered by LinkedIn via RapidAPI</p></footer>",
    );
    // Blocks the page behind a loading overlay until the server answers.
    html.push_str(
        "<script>document.querySelectorAll('form').forEach(f => \
         f.addEventListener('submit', () => document.body.classList.add('searching')));</script>",
    );
    html.push_str("</body></html>");
    html
}

fn sidebar(html: &mut String, session: &Session) {
    let filters = session.filters();
    let selected = filters.location().unwrap_or(LOCATIONS[0]);

    html.push_str("<aside class=\"sidebar\"><h2>🔍 Search Filters</h2>");
    html.push_str("<form method=\"post\" action=\"/search\">");

    html.push_str("<label for=\"location\">Location</label><select id=\"location\" name=\"location\">");
    let mut known = false;
    for location in LOCATIONS {
        let is_selected = location == selected;
        known |= is_selected;
        option(html, location, is_selected);
    }
    if !known {
        option(html, selected, true);
    }
    html.push_str("</select>");

    let _ = write!(
        html,
        "<label><input type=\"checkbox\" name=\"remote\" value=\"true\"{}> Remote Jobs Only</label>",
        if filters.remote_only() { " checked" } else { "" }
    );

    let _ = write!(
        html,
        "<label for=\"days\">Posted Within (Days): <output id=\"days-value\">{days}</output></label>\
         <input type=\"range\" id=\"days\" name=\"days\" min=\"{min}\" max=\"{max}\" value=\"{days}\" \
         oninput=\"document.getElementById('days-value').value = this.value\">",
        days = filters.days_posted(),
        min = MIN_DAYS_POSTED,
        max = MAX_DAYS_POSTED,
    );

    html.push_str("<label for=\"page_size\">Results Per Page</label><select id=\"page_size\" name=\"page_size\">");
    for size in PAGE_SIZES {
        option(html, &size.to_string(), size == filters.page_size());
    }
    html.push_str("</select>");

    html.push_str("<button type=\"submit\">🔎 Search Jobs</button></form></aside>");
}

fn option(html: &mut String, value: &str, selected: bool) {
    let value = escape(value);
    let _ = write!(
        html,
        "<option value=\"{value}\"{}>{value}</option>",
        if selected { " selected" } else { "" }
    );
}

fn results(html: &mut String, session: &Session) {
    match session.outcome() {
        Outcome::Idle => welcome(html),
        Outcome::NoResults if session.page() > 0 => {
            notice(html, "warning", "⚠️ No more SAP jobs on this page.");
            pagination(html, session);
        }
        Outcome::NoResults => notice(
            html,
            "warning",
            "⚠️ No SAP jobs found matching your criteria. Try adjusting your filters.",
        ),
        Outcome::Results(jobs) => {
            notice(html, "success", &format!("✅ Found {} SAP jobs!", jobs.len()));
            for (index, job) in jobs.iter().enumerate() {
                card(html, index, job, session.is_expanded(index));
            }
            pagination(html, session);
        }
    }
}

fn welcome(html: &mut String) {
    notice(
        html,
        "info",
        "👈 Use the sidebar to set your search filters and click 'Search Jobs' to find SAP opportunities!",
    );
    html.push_str("<div class=\"tiles\">");
    for (icon, title, text) in [
        ("🎯", "Targeted Search", "Find SAP-specific roles"),
        ("⚡", "Fresh Listings", "Jobs from the last days"),
        ("🌐", "Global Reach", "Jobs from worldwide"),
    ] {
        let _ = write!(
            html,
            "<div class=\"info-tile\"><div style=\"font-size: 2.5rem\">{icon}</div>\
             <div><strong>{title}</strong></div><div>{text}</div></div>"
        );
    }
    html.push_str("</div>");
}

fn card(html: &mut String, index: usize, job: &JobRecord, expanded: bool) {
    html.push_str("<div class=\"job-card\">");
    let _ = write!(
        html,
        "<div class=\"job-title\">{}</div><div class=\"job-company\">🏢 {}</div>",
        escape(&job.title),
        escape(&job.company)
    );

    html.push_str("<div class=\"job-meta\">");
    let _ = write!(
        html,
        "<span class=\"badge badge-location\">📍 {}</span>",
        escape(&job.location)
    );
    if job.remote {
        html.push_str("<span class=\"badge badge-remote\">🌐 Remote</span>");
    }
    let _ = write!(
        html,
        "<span class=\"badge badge-type\">⏰ {}</span></div>",
        escape(&job.posted_date)
    );

    let _ = write!(
        html,
        "<div class=\"job-meta\">💼 {} · 💰 {} · 🏭 {}</div>",
        escape(&job.employment_type),
        escape(&job.salary),
        escape(&job.industry)
    );

    let (text, truncated) = preview(&job.description_text, expanded);
    let _ = write!(html, "<div class=\"description\">{}</div>", escape(&text));

    html.push_str("<div class=\"job-meta\">");
    if truncated || expanded {
        let _ = write!(
            html,
            "<form method=\"post\" action=\"/cards/{index}/toggle\" style=\"display: inline\">\
             <button type=\"submit\" class=\"link-button\">📄 {}</button></form> ",
            if expanded { "Hide Full Description" } else { "View Full Description" }
        );
    }
    if let Some(url) = job.apply_link() {
        let _ = write!(
            html,
            "<a class=\"apply\" href=\"{}\" target=\"_blank\" rel=\"noopener\">Apply Now</a>",
            escape(url)
        );
    }
    html.push_str("</div></div>");
}

fn pagination(html: &mut String, session: &Session) {
    html.push_str("<hr><div class=\"pagination\"><div>");
    if session.has_previous() {
        html.push_str(
            "<form method=\"post\" action=\"/page/previous\"><button type=\"submit\">⬅️ Previous Page</button></form>",
        );
    }
    let _ = write!(html, "</div><div>Page {}</div><div>", session.page() + 1);
    if session.has_next() {
        html.push_str(
            "<form method=\"post\" action=\"/page/next\"><button type=\"submit\">Next Page ➡️</button></form>",
        );
    }
    html.push_str("</div></div>");
}

fn notice(html: &mut String, kind: &str, message: &str) {
    let _ = write!(
        html,
        "<div class=\"notice notice-{kind}\">{}</div>",
        escape(message)
    );
}

/// Description text for a card and whether it was cut short.
fn preview(description: &str, expanded: bool) -> (String, bool) {
    if expanded {
        return (description.to_string(), false);
    }
    match description.char_indices().nth(DESCRIPTION_PREVIEW) {
        Some((cut, _)) => (format!("{}…", description[..cut].trim_end()), true),
        None => (description.to_string(), false),
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
