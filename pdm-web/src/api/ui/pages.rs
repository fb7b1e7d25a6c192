//! HTML page rendering
//!
//! Plain `format!` templates; every user-supplied string goes through
//! [`escape`] before it is embedded.

use crate::dashboard::DashboardReport;

const STYLE: &str = r#"
    * { box-sizing: border-box; }
    body {
        font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
        background-color: #1a1a1a;
        color: #e0e0e0;
        margin: 0;
        line-height: 1.6;
    }
    header {
        background-color: #2a2a2a;
        border-bottom: 1px solid #3a3a3a;
        padding: 16px 24px;
    }
    header a { color: #4a9eff; margin-right: 16px; text-decoration: none; }
    main { padding: 24px; max-width: 720px; }
    label { display: block; margin-top: 10px; }
    input, select { width: 100%; padding: 6px; background: #2a2a2a; color: #e0e0e0; border: 1px solid #3a3a3a; }
    button { margin-top: 16px; padding: 8px 20px; background: #4a9eff; color: #fff; border: none; cursor: pointer; }
    .message { margin-top: 20px; font-size: 18px; color: #ffd166; }
    table { border-collapse: collapse; margin-top: 12px; }
    td, th { border: 1px solid #3a3a3a; padding: 4px 12px; text-align: left; }
    footer { padding: 12px 24px; color: #888; font-family: 'Courier New', monospace; font-size: 12px; }
"#;

/// Minimal HTML escaping for text and attribute values
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{style}</style>
</head>
<body>
    <header>
        <a href="/">Single prediction</a>
        <a href="/upload">Batch upload</a>
    </header>
    <main>
        <h1>{title}</h1>
{body}
    </main>
    <footer>pdm-web v{version} [{git_hash}]</footer>
</body>
</html>
"#,
        title = escape(title),
        style = STYLE,
        body = body,
        version = env!("CARGO_PKG_VERSION"),
        git_hash = env!("GIT_HASH"),
    )
}

fn message_block(message: Option<&str>) -> String {
    match message {
        Some(m) => format!(r#"        <p class="message">{}</p>"#, escape(m)),
        None => String::new(),
    }
}

/// Landing page with the single-record form
pub fn index_page(message: Option<&str>) -> String {
    let body = format!(
        r#"        <form action="/predict" method="post">
            <label for="air_temperature">Air temperature [K]</label>
            <input id="air_temperature" name="air_temperature" type="text" required>
            <label for="process_temperature">Process temperature [K]</label>
            <input id="process_temperature" name="process_temperature" type="text" required>
            <label for="rotational_speed">Rotational speed [rpm]</label>
            <input id="rotational_speed" name="rotational_speed" type="text" required>
            <label for="torque">Torque [Nm]</label>
            <input id="torque" name="torque" type="text" required>
            <label for="tool_wear">Tool wear [min]</label>
            <input id="tool_wear" name="tool_wear" type="text" required>
            <label for="machine_type">Machine type</label>
            <select id="machine_type" name="machine_type">
                <option value="Low">Low</option>
                <option value="Medium">Medium</option>
                <option value="High">High</option>
            </select>
            <button type="submit">Predict</button>
        </form>
{message}"#,
        message = message_block(message),
    );
    layout("Predictive Maintenance", &body)
}

/// Dashboard for one prediction
pub fn dashboard_page(report: &DashboardReport) -> String {
    let r = &report.reading;
    let recommendation = match report.recommendation {
        Some(rec) => format!(
            r#"        <p class="message">Recommendation: {}</p>"#,
            escape(rec.as_str())
        ),
        None => String::new(),
    };
    let body = format!(
        r#"        <table>
            <tr><th>Air temperature [K]</th><td>{air}</td></tr>
            <tr><th>Process temperature [K]</th><td>{process}</td></tr>
            <tr><th>Rotational speed [rpm]</th><td>{speed}</td></tr>
            <tr><th>Torque [Nm]</th><td>{torque}</td></tr>
            <tr><th>Tool wear [min]</th><td>{wear}</td></tr>
            <tr><th>Machine type</th><td>{machine}</td></tr>
            <tr><th>Maintenance needed</th><td>{outcome}</td></tr>
            <tr><th>Efficiency</th><td>{efficiency:.1}%</td></tr>
        </table>
{recommendation}"#,
        air = r.air_temperature,
        process = r.process_temperature,
        speed = r.rotational_speed,
        torque = r.torque,
        wear = r.tool_wear,
        machine = escape(&r.machine_type),
        outcome = report.outcome,
        efficiency = report.efficiency,
        recommendation = recommendation,
    );
    layout("Dashboard", &body)
}

/// Batch upload form
pub fn upload_page(message: Option<&str>) -> String {
    let body = format!(
        r#"        <form action="/upload" method="post" enctype="multipart/form-data">
            <label for="upload_csv">CSV file</label>
            <input id="upload_csv" name="file" type="file" accept=".csv">
            <button type="submit">Upload</button>
        </form>
{message}"#,
        message = message_block(message),
    );
    layout("Batch Prediction", &body)
}

/// Stand-alone message page used for errors
pub fn message_page(title: &str, message: &str) -> String {
    layout(title, &message_block(Some(message)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::DashboardReport;
    use pdm_common::{BinaryOutcome, SensorReading};

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_index_embeds_escaped_message() {
        let html = index_page(Some("<b>hi</b>"));
        assert!(html.contains("&lt;b&gt;hi&lt;/b&gt;"));
        assert!(html.contains(r#"name="machine_type""#));
    }

    #[test]
    fn test_index_without_message() {
        assert!(!index_page(None).contains(r#"class="message""#));
    }

    #[test]
    fn test_dashboard_page() {
        let reading = SensorReading {
            air_temperature: 298.6,
            process_temperature: 308.9,
            rotational_speed: 2986,
            torque: 30.9,
            tool_wear: 206,
            machine_type: "Low".to_string(),
        };
        let html = dashboard_page(&DashboardReport::new(reading, BinaryOutcome::No));
        assert!(html.contains("17.6%"));
        assert!(html.contains("Change of Tools required"));
        assert!(html.contains("<td>No</td>"));
    }

    #[test]
    fn test_upload_page_uses_file_field() {
        assert!(upload_page(None).contains(r#"name="file""#));
    }
}
