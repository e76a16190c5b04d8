use colored::Colorize;
use infracat_controller::RefreshSummary;
use tabled::builder::Builder;
use tabled::settings::Style;

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_refresh_summary(summary: &RefreshSummary) {
    if summary.passes.is_empty() {
        println!("No parent systems monitored.");
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(["Parent", "Id", "Status", "Created", "Deleted", "Failures"]);
    for pass in &summary.passes {
        let dash = || "-".to_string();
        let (status, created, deleted, failures) = match &pass.outcome {
            Ok(report) if report.is_skipped() => (
                format!("skipped: {}", report.skipped.as_deref().unwrap_or("-")),
                dash(),
                dash(),
                dash(),
            ),
            Ok(report) => (
                "ok".to_string(),
                report.created_count().to_string(),
                report.deleted_count().to_string(),
                report.failures.len().to_string(),
            ),
            Err(e) => (format!("failed: {e}"), dash(), dash(), dash()),
        };
        builder.push_record([
            pass.label.clone(),
            pass.parent_id.to_string(),
            status,
            created,
            deleted,
            failures,
        ]);
    }
    println!("{}", builder.build().with(Style::rounded()));

    let totals = format!(
        "{} created, {} deleted, {} child failures, {} failed passes",
        summary.created(),
        summary.deleted(),
        summary.child_failures(),
        summary.failed_passes()
    );
    if summary.failed_passes() > 0 || summary.child_failures() > 0 {
        println!("{}", totals.yellow());
    } else {
        println!("{}", totals.green());
    }
}
