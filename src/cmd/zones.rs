use keyheat::analysis::ZoneTables;
use keyheat::error::HmResult;

/// Prints the built-in zone tables as a starting point for `--zones`.
pub fn run() -> HmResult<()> {
    println!("{}", ZoneTables::default().to_json()?);
    Ok(())
}
