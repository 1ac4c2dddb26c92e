use dockhand_config::Config;
use dockhand_core::Result;

pub fn execute(config: &Config, verbose: bool) -> Result<()> {
    if config.manifest.tasks.is_empty() {
        println!("no tasks declared");
        return Ok(());
    }

    let width = config
        .manifest
        .tasks
        .keys()
        .map(|name| name.as_str().len())
        .max()
        .unwrap_or(0);

    for name in config.task_names() {
        let task = config.resolve_task(name)?;
        let description = task.description.as_deref().unwrap_or("");
        println!(
            "{:width$}  {}  {}",
            name.as_str(),
            task.image,
            description,
            width = width
        );

        if verbose {
            if !task.connections.is_empty() {
                let ids: Vec<&str> = task.connections.iter().map(|id| id.as_str()).collect();
                println!("{:width$}  connections: {}", "", ids.join(", "), width = width);
            }
            let mut command = vec![task.entrypoint.clone()];
            command.extend(task.file.clone());
            command.extend(task.args.iter().cloned());
            let command: Vec<String> =
                command.into_iter().filter(|s| !s.is_empty()).collect();
            if !command.is_empty() {
                println!("{:width$}  command: {}", "", command.join(" "), width = width);
            }
        }
    }
    Ok(())
}
