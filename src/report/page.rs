//! HTML assembly for the status page.

use crate::report::scripts::ScriptBadge;

/// Stylesheet used when none is configured.
pub const DEFAULT_STYLESHEET: &str = "\
body { font-family: sans-serif; margin: 0; }\n\
.topbox { padding: 8px 12px; background: #222; color: #eee; }\n\
.trigger_run_now { margin-right: 24px; }\n\
.trigger_run_now a { color: #8cf; }\n\
.state { white-space: nowrap; }\n\
.left { float: left; width: 30%; padding: 12px; }\n\
.left.active { background: #e8f4e8; }\n\
.left.inactive { background: #f4f4f4; }\n\
.right { margin-left: 32%; padding: 12px; }\n\
.state_ok { color: #2a7; }\n\
.state_bad { color: #c33; font-weight: bold; }\n\
.output { font-family: monospace; }\n";

/// Everything the page template needs for one render.
pub struct PageView<'a> {
    /// Whether the background job is currently running.
    pub running: bool,
    /// State line for the top bar.
    pub state: &'a str,
    /// Latest job output.
    pub output: &'a str,
    /// Combined state-script output; may already embed failure spans.
    pub summary: &'a str,
    /// Trigger scripts with their pass/fail state.
    pub badges: &'a [ScriptBadge],
    /// Auto-refresh period in milliseconds, used only while running.
    pub refresh_ms: u64,
    /// Inline stylesheet text.
    pub stylesheet: &'a str,
}

/// Maps plain text onto the page: newlines become line breaks, tabs become
/// runs of non-breaking spaces.
pub fn to_html_text(text: &str) -> String {
    text.replace('\n', "<br/>")
        .replace('\t', "&nbsp;&nbsp;&nbsp;&nbsp;")
}

fn refresh_script(period_ms: u64) -> String {
    format!(
        "<script type='text/javascript'>\
         setTimeout(function(){{ window.location.reload(1);}}, {});\
         </script>",
        period_ms
    )
}

fn badge_spans(badges: &[ScriptBadge]) -> String {
    let mut html = String::new();
    for badge in badges {
        let class = if badge.ok { "state_ok" } else { "state_bad" };
        html.push_str(&format!("<span class='{}'>{}</span><br/>", class, badge.name));
    }
    html
}

/// Renders the full status page document.
///
/// The auto-refresh script is emitted only while the job is running, so an
/// idle page holds still until the operator reloads or triggers a run.
pub fn render(view: &PageView) -> String {
    let refresh = if view.running {
        refresh_script(view.refresh_ms)
    } else {
        String::new()
    };
    let active_class = if view.running { "active" } else { "inactive" };

    let summary = if view.summary.is_empty() {
        String::new()
    } else {
        format!("{}<br>", to_html_text(view.summary.trim_end_matches('\n')))
    };

    format!(
        "<html>\
         <head><style>{stylesheet}</style></head>\
         <body>{refresh}\
         <div class='topbox'>\
         <span class='trigger_run_now'><a href=\"/force-run\">Trigger run now</a></span>\
         <span class='state'>{state}</span>\
         </div>\
         <div class='left {active_class}'>\
         <div class='scripts'><h1>Scripts</h1></div>\
         <div class='triggerState'>{badges}</div>\
         </div>\
         <div class='right'>\
         <div class='summaryHeader'><h1>Summary</h1></div>\
         <div class='additionalInfo'>{summary}</div>\
         <div class='outputHeader'><strong>Output</strong><br/></div>\
         <div class='output'>{output}</div>\
         </div>\
         </body></html>",
        stylesheet = view.stylesheet,
        refresh = refresh,
        state = to_html_text(view.state),
        active_class = active_class,
        badges = badge_spans(view.badges),
        summary = summary,
        output = to_html_text(view.output),
    )
}
