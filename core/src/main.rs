use tagspend_core::cli;
use tagspend_core::spend::{spend, EnvHost};

fn main() {
    let (config, args) = cli::get_configuration_from_cli();

    let output = spend(&EnvHost, &config, args.mode, &args.payload);

    println!("{output}");
}
