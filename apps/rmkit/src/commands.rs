//! Subcommand implementations

use chrono::{DateTime, FixedOffset, Local};
use rmkit_config::constants::MAX_TIME_BUFFER;
use rmkit_config::Config;
use rmkit_endian::ByteOrder;
use rmkit_types::Sentinel;
use serde::Serialize;

use crate::cli::Commands;
use crate::error::CliError;

/// Result of a subcommand, rendered as text or JSON
#[derive(Debug, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CommandOutput {
    TimeFormat {
        format: String,
        max: isize,
        text: String,
    },
    Swap {
        value: u64,
        swapped: u64,
        network: u64,
        host_order: ByteOrder,
        network_bytes: String,
    },
    Fuzzy {
        a: f64,
        b: f64,
        equal: bool,
        sentinel: Option<Sentinel>,
    },
    LockCheck {
        threads: usize,
        rounds: u64,
        counted: u64,
    },
    Atoul {
        text: String,
        value: u64,
    },
}

pub async fn execute(command: Commands, config: &Config) -> Result<CommandOutput, CliError> {
    match command {
        Commands::TimeFormat { format, max, at } => {
            let format = format.unwrap_or_else(|| config.time.format.clone());
            let max = match max {
                Some(max) => max,
                None => isize::try_from(config.time.buffer_size).unwrap_or(isize::MAX),
            };
            time_format(format, max, at.as_deref())
        }
        Commands::Swap { value } => swap(&value),
        Commands::Fuzzy { a, b } => Ok(CommandOutput::Fuzzy {
            a,
            b,
            equal: rmkit_types::fuzzy_equal(a, b),
            sentinel: Sentinel::classify(a),
        }),
        Commands::LockCheck { threads, rounds } => {
            let thread_config = config.threads.clone();
            tokio::task::spawn_blocking(move || lock_check(&thread_config, threads, rounds))
                .await
                .map_err(|e| CliError::Core(rmkit_errors::Error::internal(e.to_string())))?
        }
        Commands::Atoul { text } => {
            let value = rmkit_types::atoul(&text);
            Ok(CommandOutput::Atoul { text, value })
        }
    }
}

fn time_format(format: String, max: isize, at: Option<&str>) -> Result<CommandOutput, CliError> {
    let time: DateTime<FixedOffset> = match at {
        Some(text) => DateTime::parse_from_rfc3339(text)
            .map_err(|e| CliError::InvalidArguments(format!("--at {text}: {e}")))?,
        None => Local::now().fixed_offset(),
    };

    let len = usize::try_from(max).unwrap_or(0);
    if len > MAX_TIME_BUFFER {
        return Err(CliError::InvalidArguments(format!(
            "--max {max} exceeds the {MAX_TIME_BUFFER} byte limit"
        )));
    }

    let mut buf = vec![0_u8; len];
    let len = rmkit_platform::format_bounded(&mut buf, max, &format, &time);
    let text = String::from_utf8_lossy(&buf[..len]).into_owned();
    Ok(CommandOutput::TimeFormat { format, max, text })
}

fn parse_u64(text: &str) -> Result<u64, CliError> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => text.replace('_', "").parse(),
    };
    parsed.map_err(|e| CliError::InvalidArguments(format!("{text}: {e}")))
}

fn swap(text: &str) -> Result<CommandOutput, CliError> {
    let value = parse_u64(text)?;
    let mut bytes = [0_u8; 8];
    rmkit_endian::put_u64(&mut bytes, value)
        .ok_or_else(|| CliError::InvalidArguments("buffer too small".to_string()))?;
    let network_bytes = bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ");

    Ok(CommandOutput::Swap {
        value,
        swapped: rmkit_endian::swap_u64(value),
        network: rmkit_endian::hton_u64(value),
        host_order: ByteOrder::HOST,
        network_bytes,
    })
}

#[cfg(all(unix, feature = "threads"))]
fn lock_check(
    config: &rmkit_config::ThreadConfig,
    threads: usize,
    rounds: u64,
) -> Result<CommandOutput, CliError> {
    use std::sync::Arc;

    use rmkit_platform::{attr_init, call_site, Guarded};

    if threads == 0 {
        return Err(CliError::InvalidArguments("--threads must be at least 1".to_string()));
    }

    let counter: Arc<Guarded<u64>> = Arc::new(Guarded::new(0, call_site!()));

    let mut handles = Vec::with_capacity(threads);
    for index in 0..threads {
        let counter = Arc::clone(&counter);
        let attr = attr_init!(config);
        let handle = attr.spawn(format!("lock-check-{index}"), move || {
            for _ in 0..rounds {
                counter.with(call_site!(), |n| *n += 1)?;
            }
            Ok::<(), rmkit_errors::PlatformError>(())
        })?;
        handles.push(handle);
    }

    for handle in handles {
        handle.join().map_err(|_| {
            CliError::Core(rmkit_errors::Error::internal("lock-check thread panicked"))
        })??;
    }

    let counted = Arc::try_unwrap(counter)
        .map_err(|_| CliError::Core(rmkit_errors::Error::internal("counter still shared")))?
        .into_inner(call_site!());

    let expected = u64::try_from(threads).unwrap_or(u64::MAX).saturating_mul(rounds);
    if counted != expected {
        return Err(CliError::LockCheckFailed {
            expected,
            observed: counted,
        });
    }
    Ok(CommandOutput::LockCheck {
        threads,
        rounds,
        counted,
    })
}

#[cfg(not(all(unix, feature = "threads")))]
fn lock_check(
    _config: &rmkit_config::ThreadConfig,
    _threads: usize,
    _rounds: u64,
) -> Result<CommandOutput, CliError> {
    Err(CliError::Platform(rmkit_errors::PlatformError::CapabilityUnavailable {
        capability: "threads".to_string(),
    }))
}
