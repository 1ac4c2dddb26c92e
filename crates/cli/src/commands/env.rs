use dockhand_config::Config;
use dockhand_core::{
    EnvironmentVariables, Result, TaskName, CONTEXT_ENV_PREFIX, CONTEXT_ENV_SCOPE,
};
use dockhand_env::{context, is_sensitive_var, EnvScope};
use dockhand_task::static_env;

const MASK: &str = "********";

pub fn execute(config: &Config, task: &str, show_secrets: bool) -> Result<()> {
    let task = config.resolve_task(&TaskName::from(task))?;
    let env = static_env(config, &task)?;

    print_env(&env, show_secrets);
    println!();
    println!("# run context variables are added at launch time:");
    let scope = EnvScope::new(CONTEXT_ENV_PREFIX, CONTEXT_ENV_SCOPE);
    for field in [
        context::DATA_INTERVAL_START,
        context::DATA_INTERVAL_END,
        context::RUN_ID,
        context::TASK_ID,
    ] {
        println!("# {}", scope.var_name(field));
    }
    Ok(())
}

fn print_env(env: &EnvironmentVariables, show_secrets: bool) {
    for (name, value) in env.to_sorted_vec() {
        if !show_secrets && is_sensitive_var(&name) {
            println!("{name}={MASK}");
        } else {
            println!("{name}={value}");
        }
    }
}
