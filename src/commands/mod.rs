mod utils;
mod vectorize;

use crate::cli::Cli;
use pixv::PixvResult;

/// The main function to run the command based on CLI input.
pub fn run(cli: Cli) -> PixvResult<()> {
    vectorize::run(cli)
}
