//! Output rendering for command results

use serde::Serialize;

use crate::commands::CommandOutput;
use crate::error::CliError;
use crate::events::Diagnostic;

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    output: &'a CommandOutput,
    diagnostics: &'a [Diagnostic],
}

/// Output renderer for command results
pub struct OutputRenderer {
    json_mode: bool,
}

impl OutputRenderer {
    pub fn new(json_mode: bool) -> Self {
        Self { json_mode }
    }

    pub fn render(
        &self,
        output: &CommandOutput,
        diagnostics: &[Diagnostic],
    ) -> Result<(), CliError> {
        if self.json_mode {
            let report = JsonReport {
                output,
                diagnostics,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            Self::render_plain(output);
        }
        Ok(())
    }

    fn render_plain(output: &CommandOutput) {
        match output {
            CommandOutput::TimeFormat { text, .. } => println!("{text}"),
            CommandOutput::Swap {
                value,
                swapped,
                network,
                host_order,
                network_bytes,
            } => {
                println!("value:         {value:#018x}");
                println!("swapped:       {swapped:#018x}");
                println!("network order: {network:#018x} (host is {host_order:?}-endian)");
                println!("wire bytes:    {network_bytes}");
            }
            CommandOutput::Fuzzy {
                equal, sentinel, ..
            } => {
                println!("{}", if *equal { "equal" } else { "not equal" });
                if let Some(sentinel) = sentinel {
                    println!("first value is the {sentinel:?} sentinel");
                }
            }
            CommandOutput::LockCheck {
                threads,
                rounds,
                counted,
            } => println!("{threads} threads x {rounds} rounds: counted {counted}"),
            CommandOutput::Atoul { value, .. } => println!("{value}"),
        }
    }
}
