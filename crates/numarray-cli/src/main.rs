use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use clap::{Arg, Command, ValueHint};
use log::LevelFilter;

use numarray::Kernel;
use numarray_cli::config::EvalConfig;
use numarray_cli::eval::{evaluate, write_output, Op};
use numarray_cli::input::load_input;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("NUMARRAY_LOG", "error,numarray=info"))
        .init();

    let op_names: Vec<&'static str> = Op::ALL.iter().map(|op| op.name()).collect();
    let matches = Command::new("numarray")
        .version(clap::crate_version!())
        .author("Justin Sing <justincsing@gmail.com>")
        .about("Evaluate one array operation on JSON operands")
        .arg_required_else_help(true)
        .arg(
            Arg::new("op")
                .help("Operation to apply")
                .required(true)
                .value_parser(op_names),
        )
        .arg(
            Arg::new("lhs")
                .help("Path to the left operand (JSON)")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("rhs")
                .help("Path to the right operand (JSON) for binary operations")
                .required(false)
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to an evaluation JSON configuration file")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("dtype")
                .short('t')
                .long("dtype")
                .help("Dtype for operands that do not name one. Overrides the configuration file.")
                .value_parser(["int32", "int64", "float32", "float64"]),
        )
        .arg(
            Arg::new("precision")
                .short('p')
                .long("precision")
                .help("Digits after the decimal point when printing")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("broadcasting")
                .short('b')
                .long("broadcasting")
                .help("Shape rule for element-wise operations. Overrides the configuration file.")
                .value_parser(["strict", "numpy"]),
        )
        .arg(
            Arg::new("output_file")
                .short('o')
                .long("output")
                .help("Path to write the result as JSON. Defaults to printing it.")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Written by {author-with-newline}Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    let op_name: &String = matches.get_one("op").expect("op is a required argument");
    let op = Op::from_str(op_name).map_err(anyhow::Error::msg)?;
    let config = EvalConfig::from_arguments(
        matches.get_one::<PathBuf>("config").map(PathBuf::as_path),
        &matches,
    )?;
    let kernel = Kernel::new(config.kernel.clone());

    let lhs_path: &PathBuf = matches.get_one("lhs").expect("lhs is a required argument");
    let lhs = load_input(lhs_path, config.dtype)?.into_array()?;
    let rhs = matches
        .get_one::<PathBuf>("rhs")
        .map(|path| load_input(path, config.dtype))
        .transpose()?;

    let output = match evaluate(&kernel, op, &lhs, rhs.as_ref()) {
        Ok(output) => output,
        Err(e) => {
            log::error!("{} failed: {:#}", op, e);
            std::process::exit(1)
        }
    };

    match matches.get_one::<PathBuf>("output_file") {
        Some(path) => write_output(path, &output)?,
        None => println!("{}", output.render(config.precision)),
    }
    Ok(())
}
