// Dashboard page rendering
use crate::application::page_service::PageSnapshot;
use crate::domain::dashboard::{Tab, ViewState};
use crate::presentation::heatmap::render_heatmap;

pub fn render_dashboard(snapshot: &PageSnapshot, state: ViewState, title: &str) -> String {
    let dark = state.mode.is_dark();
    let active = state.tab.active();

    let notice = snapshot
        .notice
        .as_deref()
        .map(|text| format!(r#"<div class="notice" role="alert">{}</div>"#, html_escape(text)))
        .unwrap_or_default();

    let tabs: String = Tab::ALL
        .into_iter()
        .map(|tab| render_tab(tab, state))
        .collect();

    // Only the active panel gets content; the views panel stays a placeholder
    let panels: String = Tab::ALL
        .into_iter()
        .map(|tab| {
            let body = match tab {
                Tab::Clones if active == tab => render_heatmap(&snapshot.data.clones, dark),
                _ => String::new(),
            };
            let hidden = if active == tab { "" } else { " hidden" };
            format!(
                r#"<section class="panel" id="panel-{slug}" role="tabpanel"{hidden}>{body}</section>"#,
                slug = tab.slug(),
            )
        })
        .collect();

    INDEX_HTML
        .replace("{{THEME}}", state.mode.slug())
        .replace("{{TITLE}}", &html_escape(title))
        .replace("{{TOGGLE_HREF}}", &format!("/?{}", state.toggled().query_string()))
        .replace("{{DARK}}", if dark { "true" } else { "false" })
        .replace("{{MODE_LABEL}}", state.mode.label())
        .replace("{{NOTICE}}", &notice)
        .replace("{{TABS}}", &tabs)
        .replace("{{PANELS}}", &panels)
        .replace(
            "{{GENERATED}}",
            &snapshot.generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        )
}

fn render_tab(tab: Tab, state: ViewState) -> String {
    let label = tab.label();
    let slug = tab.slug();
    if !tab.enabled() {
        return format!(
            r#"<button class="tab" id="tab-{slug}" role="tab" disabled aria-disabled="true">{label}</button>"#
        );
    }
    let selected = state.tab.active() == tab;
    let class = if selected { "tab active" } else { "tab" };
    format!(
        r#"<a class="{class}" id="tab-{slug}" role="tab" aria-selected="{selected}" href="/?{query}">{label}</a>"#,
        query = state.with_tab(tab).query_string(),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    :root {
      --bg: #f6f8fa;
      --card: #ffffff;
      --ink: #1f2328;
      --muted: #57606a;
      --border: #d0d7de;
      --accent: #0969da;
      --warn-bg: #fff8c5;
      --warn-ink: #7d4e00;
    }

    body.dark {
      --bg: #0d1117;
      --card: #161b22;
      --ink: #e6edf3;
      --muted: #8b949e;
      --border: #30363d;
      --accent: #2f81f7;
      --warn-bg: #3b2e00;
      --warn-ink: #f2cc60;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(980px, 100%);
      margin: 0 auto;
      background: var(--card);
      border: 1px solid var(--border);
      border-radius: 12px;
      padding: 28px;
      display: grid;
      gap: 20px;
    }

    header {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    h1 {
      margin: 0;
      font-size: 1.6rem;
    }

    .mode-toggle {
      display: inline-flex;
      align-items: center;
      gap: 10px;
      color: var(--ink);
      text-decoration: none;
      font-weight: 600;
    }

    .mode-toggle .track {
      width: 42px;
      height: 22px;
      border-radius: 999px;
      background: var(--border);
      position: relative;
    }

    .mode-toggle .track::after {
      content: "";
      position: absolute;
      top: 3px;
      left: 3px;
      width: 16px;
      height: 16px;
      border-radius: 50%;
      background: var(--card);
      transition: left 150ms ease;
    }

    .mode-toggle[aria-checked="true"] .track {
      background: var(--accent);
    }

    .mode-toggle[aria-checked="true"] .track::after {
      left: 23px;
    }

    .notice {
      background: var(--warn-bg);
      color: var(--warn-ink);
      border: 1px solid var(--border);
      border-radius: 8px;
      padding: 12px 16px;
    }

    .tabs {
      display: flex;
      gap: 4px;
      border-bottom: 1px solid var(--border);
    }

    .tab {
      background: transparent;
      border: none;
      border-bottom: 2px solid transparent;
      padding: 10px 14px;
      font: inherit;
      font-weight: 600;
      color: var(--muted);
      text-decoration: none;
    }

    .tab.active {
      color: var(--accent);
      border-bottom-color: var(--accent);
    }

    .tab[disabled] {
      opacity: 0.45;
      cursor: not-allowed;
    }

    .panel {
      padding: 8px 0;
      overflow-x: auto;
    }

    .heatmap-legend {
      display: flex;
      align-items: center;
      justify-content: flex-end;
      gap: 4px;
      font-size: 0.75rem;
      color: var(--muted);
    }

    .heatmap-legend .swatch {
      width: 12px;
      height: 12px;
      border-radius: 2px;
    }

    .heatmap-empty {
      color: var(--muted);
    }

    footer {
      font-size: 0.8rem;
      color: var(--muted);
    }
  </style>
</head>
<body class="{{THEME}}">
  <main class="app">
    <header>
      <h1>{{TITLE}}</h1>
      <a class="mode-toggle" role="switch" aria-checked="{{DARK}}" href="{{TOGGLE_HREF}}">
        <span class="track"></span>
        <span>{{MODE_LABEL}}</span>
      </a>
    </header>
    {{NOTICE}}
    <nav class="tabs" role="tablist" aria-label="dashboard tabs">{{TABS}}</nav>
    {{PANELS}}
    <footer>Generated {{GENERATED}}</footer>
  </main>
</body>
</html>
"#;
