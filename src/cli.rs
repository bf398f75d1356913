use anyhow::Result;

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum CliCommand {
    Watch { interval: Option<u64>, json: bool },
    Interfaces,
    Help,
    Version,
}

pub(crate) fn version_text() -> String {
    format!("netreach {}", env!("CARGO_PKG_VERSION"))
}

pub(crate) fn usage_text() -> String {
    format!(
        "{version}
netreach — Network Reachability Monitor

Watches the set of internet-capable networks and reports every
availability transition.

Usage:
  netreach [watch] [--interval <SECS>] [--json]
  netreach interfaces
  netreach --help
  netreach --version

Options:
      --interval <SECS>  Interface poll interval in seconds
      --json             Emit reachability events as JSON lines
  -h, --help             Show this help text
  -V, --version          Show version",
        version = version_text()
    )
}

fn parse_u64_arg(flag: &str, raw: &str) -> Result<u64> {
    raw.parse::<u64>().ok().filter(|v| *v > 0).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid value for {}: '{}'. Expected a positive integer.\n\n{}",
            flag,
            raw,
            usage_text()
        )
    })
}

pub(crate) fn parse_cli_args<I, S>(args: I) -> Result<CliCommand>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut iter = args.into_iter();
    let _program_name = iter.next();

    let mut command: Option<String> = None;
    let mut interval: Option<u64> = None;
    let mut json = false;

    while let Some(arg) = iter.next() {
        let arg = arg.as_ref();
        match arg {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "-V" | "--version" => return Ok(CliCommand::Version),
            "watch" | "interfaces" => {
                if command.as_deref().is_some_and(|existing| existing != arg) {
                    return Err(anyhow::anyhow!(
                        "Multiple commands provided. Use only one command.\n\n{}",
                        usage_text()
                    ));
                }
                command = Some(arg.to_string());
            }
            "--interval" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow::anyhow!("Missing value for --interval.\n\n{}", usage_text())
                })?;
                interval = Some(parse_u64_arg("--interval", value.as_ref())?);
            }
            "--json" => {
                json = true;
            }
            _ if arg.starts_with("--interval=") => {
                let value = arg.split_once('=').map(|(_, v)| v).unwrap_or_default();
                if value.is_empty() {
                    return Err(anyhow::anyhow!(
                        "Missing value for --interval.\n\n{}",
                        usage_text()
                    ));
                }
                interval = Some(parse_u64_arg("--interval", value)?);
            }
            _ => {
                return Err(anyhow::anyhow!(
                    "Unknown argument: {arg}\n\n{}",
                    usage_text()
                ));
            }
        }
    }

    match command.as_deref().unwrap_or("watch") {
        "watch" => Ok(CliCommand::Watch { interval, json }),
        "interfaces" => {
            if interval.is_some() || json {
                return Err(anyhow::anyhow!(
                    "--interval/--json are only valid with watch.\n\n{}",
                    usage_text()
                ));
            }
            Ok(CliCommand::Interfaces)
        }
        other => Err(anyhow::anyhow!(
            "Unknown command: {other}\n\n{}",
            usage_text()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliCommand> {
        parse_cli_args(std::iter::once("netreach").chain(args.iter().copied()))
    }

    #[test]
    fn test_default_command_is_watch() {
        assert_eq!(
            parse(&[]).unwrap(),
            CliCommand::Watch {
                interval: None,
                json: false
            }
        );
    }

    #[test]
    fn test_watch_with_interval_and_json() {
        assert_eq!(
            parse(&["watch", "--interval", "10", "--json"]).unwrap(),
            CliCommand::Watch {
                interval: Some(10),
                json: true
            }
        );
        assert_eq!(
            parse(&["--interval=3"]).unwrap(),
            CliCommand::Watch {
                interval: Some(3),
                json: false
            }
        );
    }

    #[test]
    fn test_interfaces_rejects_watch_flags() {
        assert!(parse(&["interfaces", "--json"]).is_err());
        assert!(parse(&["interfaces", "--interval", "5"]).is_err());
        assert_eq!(parse(&["interfaces"]).unwrap(), CliCommand::Interfaces);
    }

    #[test]
    fn test_invalid_interval_is_rejected() {
        assert!(parse(&["watch", "--interval", "0"]).is_err());
        assert!(parse(&["watch", "--interval", "abc"]).is_err());
        assert!(parse(&["watch", "--interval"]).is_err());
    }

    #[test]
    fn test_help_and_version_flags() {
        assert_eq!(parse(&["--help"]).unwrap(), CliCommand::Help);
        assert_eq!(parse(&["-V"]).unwrap(), CliCommand::Version);
    }

    #[test]
    fn test_multiple_commands_rejected() {
        assert!(parse(&["watch", "interfaces"]).is_err());
    }

    #[test]
    fn test_unknown_argument_rejected() {
        assert!(parse(&["--frobnicate"]).is_err());
    }
}
