use std::fmt::Write as _;

use decl_config::OutputFormat;

use crate::report::Record;

/// Render records in the requested format.
pub fn render(records: &[Record], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Raw => Ok(serde_json::to_string(records)?),
        OutputFormat::Text => Ok(render_text(records)),
    }
}

/// Print records in the requested format.
pub fn output(records: &[Record], format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(records, format)?;
    println!("{rendered}");
    Ok(())
}

fn render_text(records: &[Record]) -> String {
    if records.is_empty() {
        return String::from("(no declarations)");
    }
    let mut out = String::new();
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}  ({})", record.description, record.location);
        for line in &record.comments {
            let _ = writeln!(out, "    {line}");
        }
        if let Some(directives) = &record.directives {
            for (key, value) in directives {
                let _ = writeln!(out, "    = {key}: {value}");
            }
        }
        for member in &record.members {
            let _ = writeln!(out, "  {}", member.description);
            for line in &member.comments {
                let _ = writeln!(out, "      {line}");
            }
        }
    }
    out.truncate(out.trim_end().len());
    out
}
