#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use anyhow::{Context, Result};
use clap::Parser;

use gapstore::cli::CliArgs;
use gapstore::dump::ManagerDump;
use gapstore::manager::BufferManager;
use gapstore::script::Script;

fn main() -> Result<()> {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    let args = CliArgs::parse();
    gapstore::tracing::init(args.log_file);

    let config = args.load_config();
    let script = Script::load(&args.script)?;

    let mut manager = BufferManager::new(config);
    let summary = script
        .run(&mut manager)
        .with_context(|| format!("while running {}", args.script.display()))?;
    tracing::info!(
        steps = summary.steps,
        cursor = summary.cursor,
        buffers = manager.buffer_count(),
        "script finished"
    );

    if !args.quiet {
        if let Some(current) = manager.current() {
            print!("{}", current.buffer());
        }
    }

    if args.dump {
        println!("{}", ManagerDump::capture(&manager).to_json());
    }

    Ok(())
}
