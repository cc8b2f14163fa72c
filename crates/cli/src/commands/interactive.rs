//! Question-and-answer planning session

use anyhow::{Context, Result};
use colored::Colorize;
use sizer_lib::{
    ControlPlaneWorkload, DataPlaneWorkload, ExtraMetadataClients, Placement, PlanRequest, VmFlavor,
};
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::client::ApiClient;
use crate::commands::plan;
use crate::config::Settings;

/// Reads answers from `input`, re-asking until each answer is valid
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask_raw(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{} ", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).context("Failed to read answer")? == 0 {
            anyhow::bail!("Input closed before the session finished");
        }
        Ok(line.trim().to_string())
    }

    /// Ask a yes/no question
    pub fn ask_yes_no(&mut self, question: &str) -> Result<bool> {
        let question = format!("{} (yes, no)", question);
        loop {
            match self.ask_raw(&question)?.to_lowercase().as_str() {
                "yes" | "y" => return Ok(true),
                "no" | "n" => return Ok(false),
                _ => writeln!(self.output, "{}", "Please answer 'yes' or 'no'".yellow())?,
            }
        }
    }

    /// Ask for a non-negative number
    pub fn ask_number<T: FromStr>(&mut self, question: &str) -> Result<T> {
        loop {
            match self.ask_raw(question)?.parse() {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(self.output, "{}", "Please enter a whole non-negative number".yellow())?,
            }
        }
    }

    /// Ask for a number that must be one of `valid`
    pub fn ask_choice<T: FromStr + PartialEq + Display>(&mut self, question: &str, valid: &[T]) -> Result<T> {
        let listed = valid.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        let question = format!("{} (valid values: {})", question, listed);
        loop {
            let value: T = self.ask_number(&question)?;
            if valid.contains(&value) {
                return Ok(value);
            }
            writeln!(self.output, "{}", format!("{} is not one of: {}", value, listed).yellow())?;
        }
    }
}

/// Walk through the questions and build a planning request
pub fn collect_request<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    event_sizes: &[u64],
) -> Result<PlanRequest> {
    let cpu_cores = prompter.ask_number("How many CPU cores does each VM have?")?;
    let ram_gb = prompter.ask_number("How much RAM in GB does each VM have?")?;
    let mut request = PlanRequest::new(VmFlavor::new(cpu_cores, ram_gb));

    if prompter.ask_yes_no("Do you want to provision redundant instances to tolerate failures?")? {
        request = request.with_failures(
            prompter.ask_number("How many instance/VM failures should the cluster tolerate?")?,
        );
        if prompter.ask_yes_no("Must each VM run a single service type?")? {
            request = request.with_placement(Placement::Dedicated);
        }
    }

    if prompter.ask_yes_no("Do you want to right-size the data plane for a write workload?")? {
        let events_per_second = prompter.ask_number("How many events/second will the cluster handle?")?;
        let event_size = prompter.ask_choice("What is the typical event size in bytes?", event_sizes)?;
        let target_p95_latency_ms =
            prompter.ask_number("What is the target 95th percentile write latency in milliseconds?")?;
        request = request.with_data_plane(DataPlaneWorkload {
            events_per_second,
            event_size,
            target_p95_latency_ms,
        });
    }

    if prompter.ask_yes_no("Do you want to right-size the control plane for the stream workload?")? {
        let mut workload = ControlPlaneWorkload {
            streams: prompter.ask_number("How many streams will the cluster store?")?,
            ..Default::default()
        };
        if prompter.ask_yes_no("Are streams configured with a retention policy?")? {
            workload.retention_hours =
                Some(prompter.ask_number("What is the typical stream retention period in hours?")?);
        }
        if prompter.ask_yes_no("Are streams configured with a scaling policy?")? {
            workload.scales_per_hour =
                Some(prompter.ask_number("How many scale events per stream per hour are expected?")?);
        }
        workload.writers = prompter.ask_number("How many writers will write data?")?;
        workload.readers = prompter.ask_number("How many readers will read data?")?;
        if prompter.ask_yes_no("Are other clients executing metadata operations (listing or inspecting streams)?")? {
            workload.extra_metadata = Some(ExtraMetadataClients {
                clients: prompter.ask_number("How many clients execute extra metadata operations?")?,
                ops_per_hour: prompter.ask_number("How many extra metadata operations per client per hour?")?,
            });
        }
        if prompter.ask_yes_no("Do writers use transactions?")? {
            workload.transactions_per_hour =
                Some(prompter.ask_number("How many transactions per writer per hour?")?);
        }
        request = request.with_control_plane(workload);
    }

    Ok(request)
}

/// Run `ssz interactive` against stdin/stdout
pub async fn run(remote: bool, settings: &Settings) -> Result<()> {
    let event_sizes = if remote {
        ApiClient::new(&settings.api_url)?
            .profile()
            .await?
            .event_sizes
    } else {
        settings.load_profile()?.event_sizes
    };

    println!("{}", "### Provisioning model for streaming clusters ###".bold());
    let request = {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let mut prompter = Prompter::new(stdin.lock(), stdout.lock());
        collect_request(&mut prompter, &event_sizes)?
    };
    println!();

    plan::execute(&request, remote, settings).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SIZES: [u64; 3] = [10, 100, 1000];

    fn collect(answers: &str) -> (Result<PlanRequest>, String) {
        let mut output = Vec::new();
        let result = {
            let mut prompter = Prompter::new(Cursor::new(answers.to_string()), &mut output);
            collect_request(&mut prompter, &SIZES)
        };
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_declining_every_pass() {
        let (request, _) = collect("8\n32\nno\nno\nno\n");
        assert_eq!(request.unwrap(), PlanRequest::new(VmFlavor::new(8, 32)));
    }

    #[test]
    fn test_full_session() {
        let answers = [
            "8", "32", // flavor
            "yes", "1", "no", // availability, shared placement
            "yes", "100000", "100", "10", // data plane
            "yes", "10", // streams
            "yes", "24", // retention
            "no", // scaling
            "10", "10", // writers, readers
            "no", // extra clients
            "yes", "360", // transactions
        ]
        .join("\n");

        let (request, _) = collect(&answers);
        let request = request.unwrap();

        assert_eq!(request.failures_to_tolerate, Some(1));
        assert_eq!(request.placement, Placement::Shared);
        assert_eq!(
            request.workload.data_plane,
            Some(DataPlaneWorkload {
                events_per_second: 100_000,
                event_size: 100,
                target_p95_latency_ms: 10,
            })
        );
        assert_eq!(
            request.workload.control_plane,
            Some(ControlPlaneWorkload {
                streams: 10,
                retention_hours: Some(24),
                scales_per_hour: None,
                writers: 10,
                readers: 10,
                extra_metadata: None,
                transactions_per_hour: Some(360),
            })
        );
    }

    #[test]
    fn test_invalid_answers_are_asked_again() {
        let answers = "eight\n8\n-32\n32\nmaybe\nyes\n1\nno\nyes\n1000\n512\n100\n10\nno\n";
        let (request, output) = collect(answers);
        let request = request.unwrap();

        assert_eq!(request.vm_flavor, VmFlavor::new(8, 32));
        assert_eq!(request.workload.data_plane.unwrap().event_size, 100);
        assert_eq!(output.matches("Please enter a whole non-negative number").count(), 2);
        assert!(output.contains("Please answer 'yes' or 'no'"));
        assert!(output.contains("512 is not one of: 10, 100, 1000"));
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let (request, _) = collect("8\n");
        assert!(request.is_err());
    }
}
