//! The `synthia prompts` command.

use synthia_core::EXAMPLE_PROMPTS;

/// Print example prompts, one per line.
pub fn execute() {
    println!("Example prompts (be specific about what you want):");
    for prompt in EXAMPLE_PROMPTS {
        println!("  {prompt}");
    }
}
