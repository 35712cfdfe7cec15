//! HTML pages for the browser form

use axum::response::Html;

use crate::printing::TaskRecord;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Task Printer</title>
  <style>
    body { font-family: system-ui, sans-serif; max-width: 28rem; margin: 2rem auto; padding: 0 1rem; }
    label { display: block; margin-top: 1rem; font-weight: 600; }
    input, textarea, select { width: 100%; box-sizing: border-box; padding: .4rem; font: inherit; }
    button { margin-top: 1.5rem; padding: .6rem 1.2rem; font: inherit; }
  </style>
</head>
<body>
  <h1>Print a task</h1>
  <form method="post" action="/print">
    <label for="title">Title</label>
    <input id="title" name="title" required autofocus>

    <label for="notes">Notes</label>
    <textarea id="notes" name="notes" rows="4"></textarea>

    <label for="created_at">Created</label>
    <input id="created_at" name="created_at" type="datetime-local">

    <label for="due_at">Due</label>
    <input id="due_at" name="due_at" type="datetime-local">

    <label for="priority">Priority</label>
    <select id="priority" name="priority">
      <option value="LOW">Low</option>
      <option value="MEDIUM" selected>Medium</option>
      <option value="HIGH">High</option>
    </select>

    <button type="submit">Print</button>
  </form>
</body>
</html>
"#;

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Page shown after a card was printed
pub fn confirmation(task: &TaskRecord) -> String {
    let mut rows = format!("<dt>Title</dt><dd>{}</dd>", escape(&task.title));
    if let Some(created_at) = task.created_at {
        rows.push_str(&format!(
            "<dt>Created</dt><dd>{}</dd>",
            created_at.format("%Y-%m-%d %H:%M")
        ));
    }
    if let Some(due_at) = task.due_at {
        rows.push_str(&format!(
            "<dt>Due</dt><dd>{}</dd>",
            due_at.format("%Y-%m-%d %H:%M")
        ));
    }
    rows.push_str(&format!(
        "<dt>Priority</dt><dd>{}</dd>",
        task.resolved_priority()
    ));
    if !task.notes.trim().is_empty() {
        rows.push_str(&format!(
            "<dt>Notes</dt><dd style=\"white-space: pre-wrap\">{}</dd>",
            escape(task.notes.trim())
        ));
    }

    page(
        "Printed",
        &format!("<h1>Task printed</h1><dl>{}</dl><p><a href=\"/\">Print another</a></p>", rows),
    )
}

pub fn error_page(message: &str) -> String {
    page(
        "Print failed",
        &format!(
            "<h1>Print failed</h1><p>{}</p><p><a href=\"/\">Back</a></p>",
            escape(message)
        ),
    )
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>{}</body>\n</html>\n",
        title, body
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
