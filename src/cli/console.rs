//! Value-style console state.
//!
//! A `Console` carries everything a command may observe or produce: the
//! argument list, the interactivity flag, queued input lines, environment
//! variables, accumulated output/error chunks and the exit code. Updates are
//! functional: `output`, `error`, `exit` and `read` consume the console and
//! return the next state, which is what `run_cli` ultimately yields.

use std::collections::VecDeque;

/// Console state threaded through command execution.
#[derive(Debug, Clone, Default)]
pub struct Console {
    arguments: Vec<String>,
    interactive: bool,
    inputs: VecDeque<String>,
    variables: Vec<(String, String)>,
    outputs: Vec<String>,
    errors: Vec<String>,
    exit_code: Option<i32>,
}

impl Console {
    /// Build a console from explicit state. The first argument is the script
    /// name; the command name, if any, follows it.
    pub fn in_memory<A, I, K, V>(
        arguments: impl IntoIterator<Item = A>,
        interactive: bool,
        inputs: impl IntoIterator<Item = I>,
        variables: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        A: Into<String>,
        I: Into<String>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            arguments: arguments.into_iter().map(Into::into).collect(),
            interactive,
            inputs: inputs.into_iter().map(Into::into).collect(),
            variables: variables
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            outputs: Vec::new(),
            errors: Vec::new(),
            exit_code: None,
        }
    }

    /// Append a chunk to the output stream.
    #[must_use]
    pub fn output(mut self, chunk: impl Into<String>) -> Self {
        self.outputs.push(chunk.into());
        self
    }

    /// Append a chunk to the error stream.
    #[must_use]
    pub fn error(mut self, chunk: impl Into<String>) -> Self {
        self.errors.push(chunk.into());
        self
    }

    /// Set the exit code.
    #[must_use]
    pub fn exit(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }

    /// Pop the next queued input line, if any.
    #[must_use]
    pub fn read(mut self) -> (Option<String>, Self) {
        let line = self.inputs.pop_front();
        (line, self)
    }

    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// First positional argument after the script name, i.e. the invoked
    /// command name during dispatch.
    #[must_use]
    pub fn command_argument(&self) -> Option<&str> {
        self.arguments.get(1).map(String::as_str)
    }

    #[must_use]
    pub fn interactive(&self) -> bool {
        self.interactive
    }

    pub fn variables(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }
}
