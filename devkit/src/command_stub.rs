/*!
Stub command runner

Stands in for `SystemRunner` so command-driven hosts can be exercised
without the real diagnostic tools. Records every invocation; programs with
no canned response behave like a failed command (`None`).
*/

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use sysprobe::CommandRunner;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubCall {
    pub program: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct StubRunner {
    responses: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<Mutex<Vec<StubCall>>>,
}

impl StubRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canned stdout for every invocation of `program`
    pub fn respond(self, program: &str, output: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(program.to_string(), output.to_string());
        self
    }

    pub fn calls(&self) -> Vec<StubCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, program: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.program == program)
            .count()
    }
}

impl CommandRunner for StubRunner {
    fn run(&self, program: &str, args: &[&str]) -> Option<String> {
        self.calls.lock().unwrap().push(StubCall {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        });

        let output = self.responses.lock().unwrap().get(program).cloned();
        tracing::debug!(
            "[STUB] {} {:?} -> {}",
            program,
            args,
            if output.is_some() { "canned" } else { "no output" }
        );
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_calls() {
        let runner = StubRunner::new().respond("ps", "header\n");

        assert_eq!(runner.run("ps", &["aux"]).as_deref(), Some("header\n"));
        assert_eq!(runner.run("wmic", &["cpu"]), None);

        assert_eq!(runner.call_count("ps"), 1);
        assert_eq!(runner.calls()[1].args, vec!["cpu"]);
    }

    #[test]
    fn test_clones_share_state() {
        let runner = StubRunner::new();
        let clone = runner.clone();
        clone.run("ps", &[]);
        assert_eq!(runner.call_count("ps"), 1);
    }
}
