use clap::Parser;

use self::calculate::CalculateArg;

mod calculate;

/// Compute per-tier payout probabilities whose expected payout matches a target RTP.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[clap(flatten)]
    calculate: CalculateArg,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    calculate::run(&args.calculate)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition_is_valid() {
        CommandArgs::command().debug_assert();
    }
}
