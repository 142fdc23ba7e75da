use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use mayday_core::{init_logging, InterceptPolicy, Interceptor, LogFormat};
use mayday_identity::{package_manifest, ExplicitSource, MetadataResolver, ResolverConfig};
use mayday_report::{call_site, CrashReporter, ReportConfig};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct SimulatedFailure(String);

fn cli() -> Command {
    Command::new("mayday")
        .version(mayday_core::VERSION)
        .about("Friendly crash reports for guarded operations")
        .arg(
            Arg::new("config-dir")
                .long("config-dir")
                .global(true)
                .default_value(".")
                .value_parser(value_parser!(PathBuf))
                .help("Directory searched for application.yml / application.properties"),
        )
        .arg(
            Arg::new("report-dir")
                .long("report-dir")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Crash report directory (default: $MAYDAY_REPORT_DIR or crash-reports)"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .global(true)
                .default_value("text")
                .value_parser(["text", "json"])
                .help("Diagnostic log format"),
        )
        .subcommand(Command::new("identity").about("Print the resolved application identity"))
        .subcommand(
            Command::new("crash")
                .about("Run a guarded operation that fails")
                .arg(
                    Arg::new("message")
                        .long("message")
                        .default_value("")
                        .help("Custom notice text"),
                )
                .arg(
                    Arg::new("reason")
                        .long("reason")
                        .default_value("simulated failure")
                        .help("Failure message of the operation"),
                )
                .arg(
                    Arg::new("no-report")
                        .long("no-report")
                        .action(ArgAction::SetTrue)
                        .help("Skip crash report creation"),
                )
                .arg(
                    Arg::new("silent")
                        .long("silent")
                        .action(ArgAction::SetTrue)
                        .help("Suppress the user notice"),
                )
                .arg(
                    Arg::new("trace")
                        .long("trace")
                        .action(ArgAction::SetTrue)
                        .help("Print the raw failure trace"),
                )
                .arg(
                    Arg::new("panic")
                        .long("panic")
                        .action(ArgAction::SetTrue)
                        .help("Fail by panicking instead of returning an error"),
                )
                .arg(
                    Arg::new("exit-code")
                        .long("exit-code")
                        .default_value("0")
                        .value_parser(value_parser!(i32))
                        .help("Terminate with this code after handling"),
                ),
        )
        .subcommand(Command::new("reports").about("List crash reports, newest first"))
}

fn report_config(args: &ArgMatches) -> ReportConfig {
    match args.get_one::<PathBuf>("report-dir") {
        Some(dir) => ReportConfig::new().with_dir(dir.clone()),
        None => ReportConfig::from_env(),
    }
}

fn resolver(args: &ArgMatches) -> MetadataResolver {
    let search_dir = args
        .get_one::<PathBuf>("config-dir")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));
    MetadataResolver::standard(
        &ResolverConfig::new().with_search_dir(search_dir),
        ExplicitSource::from_env(),
        Some(package_manifest!()),
    )
}

fn crash(args: &ArgMatches) -> u32 {
    let interceptor = Interceptor::builder()
        .with_resolver(resolver(args))
        .with_reporter(Arc::new(CrashReporter::new(report_config(args))))
        .build();

    let policy = InterceptPolicy::new()
        .with_message(args.get_one::<String>("message").cloned().unwrap_or_default())
        .with_report(!args.get_flag("no-report"))
        .silent(args.get_flag("silent"))
        .with_raw_trace(args.get_flag("trace"))
        .with_exit_code(args.get_one::<i32>("exit-code").copied().unwrap_or(0));
    let reason = args
        .get_one::<String>("reason")
        .cloned()
        .unwrap_or_default();
    let panic = args.get_flag("panic");

    interceptor.wrap_at(&call_site!("simulate"), &policy, || {
        if panic {
            panic!("{reason}");
        }
        Err::<u32, _>(SimulatedFailure(reason))
    })
}

fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    let format = matches
        .get_one::<String>("log-format")
        .and_then(|f| LogFormat::parse(f))
        .unwrap_or_default();
    init_logging(format);

    match matches.subcommand() {
        Some(("identity", args)) => {
            let identity = resolver(args).resolve();
            let json = serde_json::to_string_pretty(&identity)
                .context("failed to serialize identity")?;
            println!("{json}");
        }
        Some(("crash", args)) => {
            let value = crash(args);
            println!("operation returned substitute value {value}");
        }
        Some(("reports", args)) => {
            let reporter = CrashReporter::new(report_config(args));
            let reports = reporter.list_reports();
            if reports.is_empty() {
                println!("No crash reports in {}", reporter.config().dir.display());
            }
            for path in reports {
                println!("{}", path.display());
            }
        }
        Some((other, _)) => bail!("unknown command `{other}`"),
        None => {
            cli().print_help().context("failed to print help")?;
        }
    }
    Ok(())
}
