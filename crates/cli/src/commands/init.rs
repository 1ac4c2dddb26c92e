use dockhand_core::{Error, Result, MANIFEST_FILENAME};
use std::path::Path;

const EXAMPLE_MANIFEST: &str = r#"# dockhand environment manifest
#
# Connections become DOCKHAND_CONN__<ID>__* variables inside task
# containers; the data interval and run id arrive as DOCKHAND_CTX__RUN__*.

[defaults]
entrypoint = "python"
network = "host"
tty = true
auto_remove = "on-success"
timeout_secs = 3600

[connections.warehouse]
kind = "postgres"
host = "localhost"
port = 5432
username = "etl"
password = "change-me"
database = "analytics"

[tasks.example]
description = "Example task"
image = "acme/example:latest"
file = "/app/main.py"
connections = ["warehouse"]
"#;

pub async fn execute(force: bool) -> Result<()> {
    let path = Path::new(MANIFEST_FILENAME);

    if path.exists() && !force {
        return Err(Error::configuration(format!(
            "{MANIFEST_FILENAME} already exists; use --force to overwrite"
        )));
    }

    tokio::fs::write(path, EXAMPLE_MANIFEST)
        .await
        .map_err(|e| Error::file_system(path, "write", e))?;

    println!("wrote {MANIFEST_FILENAME}");
    Ok(())
}
