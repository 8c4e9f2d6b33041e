//! `esim`: command-line tool for the ESIM sensor module.

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use esim_host::{Client, SerialTransport, TransactionError};
use esim_protocol::{Param, ParamValue};

#[derive(Parser)]
#[command(name = "esim", about = "Talk to an ESIM sensor module over a serial link")]
struct Cli {
    /// Serial device or PTY path (e.g. /dev/ttyUSB0, ./pty.link).
    #[arg(long)]
    port: String,

    /// Serial baud rate.
    #[arg(long, default_value_t = 115200)]
    baud: u32,

    /// Per-read response timeout in milliseconds.
    #[arg(long, default_value_t = 1000)]
    timeout_ms: u64,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Query the module's status report.
    Status,
    /// Read a parameter value.
    GetParam {
        /// Parameter to read.
        param: CliParam,
    },
    /// Set a parameter value.
    SetParam {
        /// Parameter to set.
        param: CliParam,
        /// New value (for sensor-enable: 0 = off, nonzero = on).
        value: u16,
    },
    /// Reset the module (fire-and-forget).
    Reset,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliParam {
    SensorSampleRate,
    StatusPeriodMs,
    SensorEnable,
}

impl From<CliParam> for Param {
    fn from(param: CliParam) -> Param {
        match param {
            CliParam::SensorSampleRate => Param::SensorSampleRate,
            CliParam::StatusPeriodMs => Param::StatusPeriodMs,
            CliParam::SensorEnable => Param::SensorEnable,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let transport = match SerialTransport::open(&cli.port, cli.baud) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("failed to open {}: {}", cli.port, e);
            return ExitCode::FAILURE;
        }
    };
    let mut client = Client::new(transport, Duration::from_millis(cli.timeout_ms));

    let result = match cli.command {
        CliCommand::Status => client.get_status().map(|report| {
            println!("state:        {}", report.state);
            println!("uptime:       {} ms", report.uptime_ms);
            println!("error flags:  0x{:08X}", report.error_flags);
            println!("rx errors:    {}", report.rx_errors);
            println!("tx errors:    {}", report.tx_errors);
            println!("sensor fault: 0x{:02X}", report.sensor_fault);
        }),

        CliCommand::GetParam { param } => {
            let param = Param::from(param);
            client.get_param(param).map(|value| {
                println!("{} = {}", param, value);
            })
        }

        CliCommand::SetParam { param, value } => {
            let value = match Param::from(param) {
                Param::SensorSampleRate => ParamValue::SensorSampleRate(value),
                Param::StatusPeriodMs => ParamValue::StatusPeriodMs(value),
                Param::SensorEnable => ParamValue::SensorEnable(value != 0),
            };
            client.set_param(value).map(|()| {
                println!("{} = {}", value.param(), value);
            })
        }

        CliCommand::Reset => client.reset_module().map(|()| {
            println!("reset triggered");
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(TransactionError::Rejected { code }) => {
            eprintln!("rejected by module (code 0x{:02X})", code);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
