// # Process Runner Trait
//
// Abstracts "run this program with these arguments and give me its output".
//
// ## Implementations
//
// - `tokio::process`: [`crate::process::TokioProcessRunner`]
// - Tests: fakes that script responses and record invocations
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::traits::ProcessRunner;
//
// let out = runner.run("aws", &["--version".to_string()]).await?;
// println!("{}", out.stdout);
// ```

use async_trait::async_trait;

use crate::process::{ProcessError, ProcessOutput};

/// Trait for running external programs
///
/// A run succeeds only if the program started and exited with status 0.
/// Spawn failures and non-zero exits are both errors.
///
/// Implementations must not retry; one call is one process.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `program` with `args` and wait for it to finish
    ///
    /// # Returns
    ///
    /// - `Ok(ProcessOutput)`: The program exited with status 0
    /// - `Err(ProcessError)`: It could not be started, exited non-zero or timed out
    async fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput, ProcessError>;
}
