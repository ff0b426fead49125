use std::io::Read;
use std::process::ExitCode;

use chrono::{Duration, Utc};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mcpayment::{
    Config, CreateRecurringRequest, CreateSchedule, IntervalUnit, McPaymentError,
    MissedChargeAction, Outcome, RecurringGateway, UpdateRecurringRequest, UpdateSchedule,
};

/// Manage MCPayment recurring schedules from the command line.
///
/// Configuration comes from MCPAYMENT_* environment variables (a `.env` file
/// is loaded if present).
#[derive(Parser)]
#[command(name = "mcpayment-recurring", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a new recurring schedule
    Create(CreateArgs),
    /// Show the current state of a schedule
    Get { register_id: String },
    /// Update a schedule's mutable fields
    Update {
        register_id: String,
        #[command(flatten)]
        fields: UpdateArgs,
    },
    /// Resume a disabled schedule
    Enable { register_id: String },
    /// Pause an active schedule
    Disable { register_id: String },
    /// Terminate a schedule
    Finish { register_id: String },
    /// Verify a callback body read from a file, or stdin with `-`
    VerifyCallback { path: String },
    /// Print the signature a callback for REGISTER_ID must carry
    Sign { register_id: String },
}

#[derive(Args)]
struct CreateArgs {
    #[arg(long)]
    register_id: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    amount: u64,
    #[arg(long)]
    token: String,
    #[arg(long)]
    callback_url: String,
    #[arg(long, default_value_t = 1)]
    interval: u32,
    #[arg(long, default_value = "month")]
    unit: IntervalUnit,
    /// RFC 3339 start time (default: one minute from now)
    #[arg(long)]
    start_time: Option<String>,
    #[arg(long)]
    missed_charge_action: Option<MissedChargeAction>,
}

#[derive(Args)]
struct UpdateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    amount: Option<u64>,
    #[arg(long)]
    token: String,
    #[arg(long)]
    callback_url: String,
    #[arg(long, default_value_t = 1)]
    interval: u32,
    #[arg(long, default_value = "month")]
    unit: IntervalUnit,
    #[arg(long)]
    missed_charge_action: Option<MissedChargeAction>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level().directive().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!(?config, "loaded configuration");

    let gateway = match RecurringGateway::from_config(config) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&gateway, cli.command).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ERROR: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(
    gateway: &RecurringGateway<mcpayment::HttpTransport>,
    command: Command,
) -> Result<ExitCode, McPaymentError> {
    match command {
        Command::Create(args) => {
            let start_time = args.start_time.unwrap_or_else(|| {
                mcpayment::format_start_time(Utc::now() + Duration::minutes(1))
            });
            let req = CreateRecurringRequest {
                register_id: args.register_id,
                name: args.name,
                amount: args.amount,
                token: args.token,
                callback_url: args.callback_url,
                schedule: CreateSchedule {
                    interval: args.interval,
                    interval_unit: Some(args.unit),
                    start_time,
                },
                missed_charge_action: args.missed_charge_action,
            };
            print_outcome(gateway.create(&req).await?)
        }
        Command::Get { register_id } => print_outcome(gateway.get(&register_id).await?),
        Command::Update {
            register_id,
            fields,
        } => {
            let req = UpdateRecurringRequest {
                name: fields.name,
                amount: fields.amount,
                token: fields.token,
                callback_url: fields.callback_url,
                schedule: UpdateSchedule::new(fields.interval, fields.unit),
                missed_charge_action: fields.missed_charge_action,
            };
            print_outcome(gateway.update(&register_id, &req).await?)
        }
        Command::Enable { register_id } => print_outcome(gateway.enable(&register_id).await?),
        Command::Disable { register_id } => print_outcome(gateway.disable(&register_id).await?),
        Command::Finish { register_id } => print_outcome(gateway.finish(&register_id).await?),
        Command::VerifyCallback { path } => {
            let body = match read_input(&path) {
                Ok(b) => b,
                Err(e) => {
                    eprintln!("ERROR: failed to read {path}: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            };
            match gateway.verify_callback(&body) {
                Some(payload) => {
                    let report = serde_json::json!({"trusted": true, "callback": payload});
                    println!("{}", serde_json::to_string_pretty(&report)?);
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    println!("{}", serde_json::json!({"trusted": false}));
                    Ok(ExitCode::from(2))
                }
            }
        }
        Command::Sign { register_id } => {
            println!("{}", gateway.expected_signature(&register_id));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_outcome<T: serde::Serialize>(outcome: Outcome<T>) -> Result<ExitCode, McPaymentError> {
    match outcome {
        Outcome::Accepted(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Rejected(r) => {
            println!("{}", serde_json::to_string_pretty(&r)?);
            Ok(ExitCode::from(2))
        }
    }
}

fn read_input(path: &str) -> std::io::Result<Vec<u8>> {
    if path == "-" {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read(path)
    }
}
