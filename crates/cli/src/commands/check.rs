use dockhand_config::Config;
use dockhand_core::Result;

pub fn execute(config: &Config) -> Result<()> {
    let problems = config.manifest.problems();

    if problems.is_empty() {
        println!(
            "manifest OK: {} task(s), {} connection(s)",
            config.manifest.tasks.len(),
            config.manifest.connections.len()
        );
        return Ok(());
    }

    for problem in &problems {
        eprintln!("problem: {problem}");
    }
    eprintln!("{} problem(s) found", problems.len());
    std::process::exit(1);
}
