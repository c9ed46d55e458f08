use anyhow::bail;
use clap::{Parser, ValueEnum};
use core::fmt;

pub const WIDTH_ENV: &str = "ONEID_WIDTH";
pub const COUNT_ENV: &str = "ONEID_COUNT";
pub const SERVER_BITS_ENV: &str = "ONEID_SERVER_BITS";
pub const PROCESS_BITS_ENV: &str = "ONEID_PROCESS_BITS";
pub const SEQUENCE_BITS_ENV: &str = "ONEID_SEQUENCE_BITS";

/// Integer width of the generated ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Width {
    #[value(name = "u32")]
    U32,
    #[value(name = "u64")]
    U64,
    #[value(name = "i64")]
    I64,
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Width::U32 => write!(f, "u32"),
            Width::U64 => write!(f, "u64"),
            Width::I64 => write!(f, "i64"),
        }
    }
}

/// Command line configuration for the `oneid` binary.
///
/// The server and process ids themselves always come from `SERVER_ID` and
/// `PROCESS_ID`, so several processes can share one invocation script and
/// differ only in their environment.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "oneid",
    version,
    about = "Print coordinator-free, time-ordered numeric ids"
)]
pub struct CliArgs {
    /// Integer width of the ids.
    ///
    /// Environment variable: `ONEID_WIDTH`
    #[arg(long, env = WIDTH_ENV, value_enum, default_value_t = Width::U64)]
    pub width: Width,

    /// Number of ids to print.
    ///
    /// Environment variable: `ONEID_COUNT`
    #[arg(short = 'n', long, env = COUNT_ENV, default_value_t = 1)]
    pub count: usize,

    /// Bits reserved for the server id. Omit all three bit options to use the
    /// width's default layout.
    ///
    /// Environment variable: `ONEID_SERVER_BITS`
    #[arg(long, env = SERVER_BITS_ENV)]
    pub server_bits: Option<u32>,

    /// Bits reserved for the process id.
    ///
    /// Environment variable: `ONEID_PROCESS_BITS`
    #[arg(long, env = PROCESS_BITS_ENV)]
    pub process_bits: Option<u32>,

    /// Bits reserved for the per-tick sequence. The sequence also absorbs any
    /// bits the other fields leave unused.
    ///
    /// Environment variable: `ONEID_SEQUENCE_BITS`
    #[arg(long, env = SEQUENCE_BITS_ENV)]
    pub sequence_bits: Option<u32>,

    /// Print the decoded fields next to every id.
    #[arg(short, long, default_value_t = false)]
    pub decompose: bool,
}

/// Field widths requested on the command line, before correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutRequest {
    pub server_bits: u32,
    pub process_bits: u32,
    pub sequence_bits: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub width: Width,
    pub count: usize,
    pub layout: Option<LayoutRequest>,
    pub decompose: bool,
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.count == 0 {
            bail!("{COUNT_ENV} must be greater than 0");
        }

        // Missing fields fall back to zero, which the layout calculator
        // raises to each field's minimum.
        let layout = match (args.server_bits, args.process_bits, args.sequence_bits) {
            (None, None, None) => None,
            (server_bits, process_bits, sequence_bits) => Some(LayoutRequest {
                server_bits: server_bits.unwrap_or_default(),
                process_bits: process_bits.unwrap_or_default(),
                sequence_bits: sequence_bits.unwrap_or_default(),
            }),
        };

        Ok(Self {
            width: args.width,
            count: args.count,
            layout,
            decompose: args.decompose,
        })
    }
}
