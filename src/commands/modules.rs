//! `dops modules`: list, search, count and describe the commands.

use anyhow::Result;
use dops_core::modules;

use crate::cli::ModulesArgs;

pub(crate) fn run_modules_command(args: &ModulesArgs) -> Result<()> {
    print!("{}", render_modules_output(args)?);
    Ok(())
}

/// Output for the first selected flag: search, list, describe, markdown,
/// count. Nothing is printed when no flag is given.
fn render_modules_output(args: &ModulesArgs) -> Result<String> {
    if let Some(pattern) = args.search.as_deref() {
        let found = modules::search(pattern)?;
        if found.is_empty() {
            let hint = modules::suggest(pattern)
                .map(|name| format!(" Did you mean '{name}'?"))
                .unwrap_or_default();
            return Ok(format!("No module matches '{pattern}'.{hint}\n"));
        }
        return Ok(lines(&found));
    }
    if args.list {
        return Ok(lines(&modules::names()));
    }
    if args.describe {
        return Ok(modules::describe());
    }
    if args.markdown {
        return Ok(modules::markdown());
    }
    if args.count {
        return Ok(format!("{}\n", modules::count()));
    }
    Ok(String::new())
}

fn lines(names: &[&str]) -> String {
    names.iter().map(|name| format!("{name}\n")).collect()
}
