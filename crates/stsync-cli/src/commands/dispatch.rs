use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Sync(args) => commands::sync::handle(&args, ctx, flags).await,
        Commands::CopyPo(args) => commands::copy_po::handle(&args, ctx, flags).await,
        Commands::Verify => commands::verify::handle(ctx, flags).await,
        Commands::Crosswalk { action } => commands::crosswalk::handle(&action, ctx, flags).await,
        Commands::Schema(args) => commands::schema::handle(&args, flags),
    }
}
