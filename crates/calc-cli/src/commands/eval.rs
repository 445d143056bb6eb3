use std::error::Error;

use calc_core::{CalcError, ErrorInfo, Number, Operation};
use clap::Args;
use tracing::debug;

#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Left operand.
    #[arg(allow_hyphen_values = true)]
    pub x: String,
    /// Operation name (`add`, `subtract`, `multiply`, `divide`) or symbol.
    #[arg(allow_hyphen_values = true)]
    pub op: Operation,
    /// Right operand.
    #[arg(allow_hyphen_values = true)]
    pub y: String,
    /// Treat operands as 64-bit integers; division truncates toward zero.
    #[arg(long)]
    pub integer: bool,
}

pub fn run(args: &EvalArgs) -> Result<(), Box<dyn Error>> {
    let rendered = if args.integer {
        evaluate::<i64>(args)?
    } else {
        evaluate::<f64>(args)?
    };
    println!("{rendered}");
    Ok(())
}

fn evaluate<T>(args: &EvalArgs) -> Result<String, CalcError>
where
    T: Number + std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let x = parse_operand::<T>(&args.x)?;
    let y = parse_operand::<T>(&args.y)?;
    let result = args.op.apply(x, y)?;
    debug!(%x, op = args.op.name(), %y, %result, "evaluated");
    Ok(result.to_string())
}

fn parse_operand<T>(raw: &str) -> Result<T, CalcError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|err| {
        CalcError::InvalidArgument(
            ErrorInfo::new("calc_cli.operand_parse", err.to_string()).with_context("operand", raw),
        )
    })
}
