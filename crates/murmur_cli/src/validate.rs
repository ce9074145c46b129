//! Implementation of the `murmur validate` command.

/// Runs the `murmur validate` command.
///
/// Exits with 0 when the text is well-formed, reporting the parse failure as
/// an error otherwise.
pub fn run(text: &str) -> Result<i32, Box<dyn std::error::Error>> {
    murmur_synth::validate(text)?;
    println!("ok");
    Ok(0)
}
