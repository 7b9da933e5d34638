//! Handler for the `publish` command.

use chrono::Utc;

use crate::app::App;
use crate::cli::{output, PublishArgs};
use crate::config::Config;
use crate::domain::TriggerSource;
use crate::error::Result;

/// Execute the publish command.
pub async fn execute(config: Config, args: &PublishArgs) -> Result<()> {
    // Validation fails loudly here, never inside the merge.
    let trigger: TriggerSource = args.trigger.parse()?;
    let date = args.date.unwrap_or_else(|| Utc::now().date_naive());

    let app = App::new(config)?;
    let report = app.publish(date, trigger).await?;

    output::section(&format!("Publish {date}"));
    output::key_value("trigger", trigger.as_str());
    output::key_value("picks", report.summary.total);
    output::key_value("algorithm", report.summary.algorithm);
    output::key_value("manual", report.summary.manual);
    output::key_value("locked", report.summary.locked);
    output::key_value("new", report.summary.new);
    output::key_value("dropped", report.summary.dropped);

    if report.snapshot_written {
        output::ok("locked snapshot written");
    } else {
        output::warn("locked snapshot write failed (merge result still rendered)");
    }
    if report.audit_written {
        output::ok("audit record appended");
    } else {
        output::warn("audit append failed");
    }
    if report.artifact_written {
        output::ok(&format!("artifact published: {}", report.artifact_name));
    } else {
        output::warn("artifact not published");
    }

    Ok(())
}
