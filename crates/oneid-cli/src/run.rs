use std::io::Write;

use anyhow::Context;
use oneid::{EnvIds, LockOneIdGenerator, MonotonicClock, OneId};
use tracing::info;

use crate::config::{Config, LayoutRequest, Width};

/// Reads `SERVER_ID` and `PROCESS_ID` and writes `config.count` ids to `out`,
/// one per line.
pub fn run(config: &Config, out: &mut impl Write) -> anyhow::Result<()> {
    match config.width {
        Width::U32 => run_width::<u32>(config, out),
        Width::U64 => run_width::<u64>(config, out),
        Width::I64 => run_width::<i64>(config, out),
    }
}

fn run_width<ID: OneId>(config: &Config, out: &mut impl Write) -> anyhow::Result<()> {
    let ids = EnvIds::<ID>::from_env()
        .with_context(|| format!("reading {} ids from the environment", ID::NAME))?;
    emit(config, ids, out)
}

fn build<ID: OneId>(request: Option<LayoutRequest>) -> LockOneIdGenerator<ID, MonotonicClock> {
    match request {
        Some(request) => LockOneIdGenerator::with_bits(
            request.server_bits,
            request.process_bits,
            request.sequence_bits,
        ),
        None => LockOneIdGenerator::default(),
    }
}

fn emit<ID: OneId>(config: &Config, ids: EnvIds<ID>, out: &mut impl Write) -> anyhow::Result<()> {
    let generator = build::<ID>(config.layout);
    let layout = *generator.layout();
    info!(
        width = ID::NAME,
        server_id = %ids.server_id,
        process_id = %ids.process_id,
        count = config.count,
        "generating ids with {layout:?}"
    );

    for _ in 0..config.count {
        let id = generator.generate(ids.server_id, ids.process_id);
        if config.decompose {
            writeln!(out, "{id}\t{}", layout.decompose(id))?;
        } else {
            writeln!(out, "{id}")?;
        }
    }
    out.flush()?;
    Ok(())
}
