use chrono::{DateTime, Utc};
use dockhand_config::Config;
use dockhand_core::{Error, Result, TaskName};
use dockhand_env::RunContext;
use dockhand_task::{CommandExecutorFactory, TaskRunner};
use uuid::Uuid;

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    config: Config,
    task: String,
    args: Vec<String>,
    interval_start: Option<String>,
    interval_end: Option<String>,
    run_id: Option<String>,
    dry_run: bool,
) -> Result<()> {
    let task = TaskName::from(task);
    let context = build_context(&task, interval_start, interval_end, run_id)?;
    let runner = TaskRunner::new(CommandExecutorFactory::system());

    if dry_run {
        let invocation = runner.plan(&config, &task, &context, &args)?;
        println!(
            "docker {}",
            invocation.args().into_inner().join(" ")
        );
        println!();
        println!("environment:");
        for (name, _) in invocation.env.to_sorted_vec() {
            println!("  {name}");
        }
        return Ok(());
    }

    let outcome = runner.run(&config, &task, &context, &args).await?;
    std::process::exit(outcome.exit_code);
}

/// Build the run context from CLI flags
///
/// The end of the data interval defaults to now, the start to the end, so an
/// ad-hoc run processes a zero-width interval at the current instant.
fn build_context(
    task: &TaskName,
    interval_start: Option<String>,
    interval_end: Option<String>,
    run_id: Option<String>,
) -> Result<RunContext> {
    let end = match interval_end {
        Some(raw) => parse_timestamp("--interval-end", &raw)?,
        None => Utc::now(),
    };
    let start = match interval_start {
        Some(raw) => parse_timestamp("--interval-start", &raw)?,
        None => end,
    };
    if start > end {
        return Err(Error::configuration(format!(
            "interval start {start} is after interval end {end}"
        )));
    }

    let run_id = run_id.unwrap_or_else(|| format!("manual__{}", Uuid::new_v4()));
    Ok(RunContext::new(start, end, run_id, task.as_str()))
}

fn parse_timestamp(flag: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            Error::configuration(format!("{flag}: '{raw}' is not an RFC 3339 timestamp: {e}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_defaults_to_zero_width_interval() {
        let context =
            build_context(&TaskName::from("ingest"), None, None, Some("r1".into())).unwrap();
        assert_eq!(context.data_interval_start, context.data_interval_end);
        assert_eq!(context.run_id, "r1");
        assert_eq!(context.task_id, "ingest");
    }

    #[test]
    fn explicit_interval_is_parsed() {
        let context = build_context(
            &TaskName::from("t"),
            Some("2026-08-01T00:00:00Z".into()),
            Some("2026-08-02T00:00:00Z".into()),
            None,
        )
        .unwrap();
        assert!(context.data_interval_start < context.data_interval_end);
        assert!(context.run_id.starts_with("manual__"));
    }

    #[test]
    fn inverted_interval_is_rejected() {
        let err = build_context(
            &TaskName::from("t"),
            Some("2026-08-03T00:00:00Z".into()),
            Some("2026-08-02T00:00:00Z".into()),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("after"));
    }

    #[test]
    fn malformed_timestamp_names_the_flag() {
        let err =
            build_context(&TaskName::from("t"), Some("tomorrow".into()), None, None).unwrap_err();
        assert!(err.to_string().contains("--interval-start"));
    }
}
